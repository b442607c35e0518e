// src/commands/mod.rs
// =============================================================================
// Handlers behind each CLI command.
//
// Submodules:
// - fetch: figma-json <URL> / figma-json fetch <URL>
// - token: figma-json token set|get|remove|verify
//
// Every handler returns anyhow::Result<()>; main turns an Err into a message
// on stderr and exit code 1.
// =============================================================================

mod fetch;
mod token;

pub use fetch::run as fetch;
pub use token::run as token;

// Shown whenever there is no token to work with
const SET_TOKEN_HINT: &str = "use `figma-json token set <your-token>` to store one";
