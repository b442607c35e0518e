// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up diagnostic logging (stderr, controlled by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the handler for the URL, `fetch` or `token`
// 4. Exit with proper code (0 = success, 1 = any failure)
// =============================================================================

use anyhow::Result;
use clap::{CommandFactory, Parser};

use figma_json::cli::{self, Cli, Commands};
use figma_json::{commands, logging};

#[tokio::main]
async fn main() {
    logging::init_logging();

    // try_parse so usage errors get our exit code instead of clap's 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::parse_error_exit_code(&e));
        }
    };

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("❌ Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Fetch { url, options }) => commands::fetch(&url, &options).await,
        Some(Commands::Token { action }) => commands::token(&action).await,
        None => match cli.fetch.url {
            Some(url) => commands::fetch(&url, &cli.fetch.options).await,
            // No URL and no subcommand: show what the tool can do
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        },
    }
}
