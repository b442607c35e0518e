// src/output/mod.rs
// =============================================================================
// This module saves downloaded documents as JSON files.
//
// Submodules:
// - writer: Directory creation, file naming, overwrite checks, size display
// =============================================================================

mod writer;

pub use writer::{
    default_file_name, format_file_size, sanitize_file_name, save_json, SaveOptions, SaveResult,
    WriteError,
};
