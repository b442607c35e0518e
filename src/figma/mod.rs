// src/figma/mod.rs
// =============================================================================
// Everything that knows about Figma itself.
//
// Submodules:
// - url_parser: Parses Figma URLs into file id / node id / file name
// - client: Calls the Figma REST API
//
// Callers only see the re-exported items below, so `figma::parse(...)` and
// `figma::FigmaClient` read naturally from the command handlers.
// =============================================================================

mod client;
mod url_parser;

pub use client::{FigmaClient, FigmaError, FileSummary, NodesResponse, DEFAULT_BASE_URL};
pub use url_parser::{
    format_file_id, format_node_id, is_valid_figma_url, parse, to_api_node_id, FigmaUrl, UrlError,
};
