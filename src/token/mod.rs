// src/token/mod.rs
// =============================================================================
// This module stores the Figma API token between runs.
//
// Submodules:
// - store: Reads and writes ~/.figma-json/config.json with owner-only access
// =============================================================================

mod store;

pub use store::{mask_token, TokenError, TokenStore, CONFIG_DIR_ENV};
