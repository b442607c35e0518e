// src/lib.rs
// =============================================================================
// figma-json: download Figma files and nodes as JSON.
//
// The binary (src/main.rs) is a thin wrapper around these modules so the URL
// parser, the API client, the token store and the file writer can be used
// and tested on their own.
// =============================================================================

pub mod cli;        // src/cli.rs - command-line parsing
pub mod commands;   // src/commands/ - handlers for each command
pub mod figma;      // src/figma/ - URL parsing and the REST API client
pub mod logging;    // src/logging.rs - tracing setup
pub mod output;     // src/output/ - writing JSON to disk
pub mod token;      // src/token/ - stored API token
