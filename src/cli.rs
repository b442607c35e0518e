// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two ways to download:
//   figma-json <URL> [options]
//   figma-json fetch <URL> [options]
//
// And a subcommand family for the API token:
//   figma-json token set <TOKEN> [--verify]
//   figma-json token get [--show] [--path]
//   figma-json token remove [--confirm]     (alias: rm)
//   figma-json token verify
//
// Rust concepts:
// - Derive macros: Parser, Args and Subcommand generate the parsing code
// - #[command(flatten)]: Reuses one struct of options in several places
// - Option<T>: For arguments that may be left out
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// args_conflicts_with_subcommands lets a bare URL sit next to the
// subcommands: `figma-json <URL>` and `figma-json token get` both work, but
// mixing the two is an error.
#[derive(Parser, Debug)]
#[command(
    name = "figma-json",
    version,
    about = "Download Figma files and nodes as JSON",
    long_about = "figma-json downloads the JSON representation of a Figma file, or of a single \
                  node in it, through the Figma REST API and saves it to disk.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

/// Arguments of the default (no subcommand) form.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Figma file URL (e.g., https://www.figma.com/design/<fileId>/<name>)
    pub url: Option<String>,

    #[command(flatten)]
    pub options: FetchOptions,
}

/// Options shared by `figma-json <URL>` and `figma-json fetch <URL>`.
#[derive(Args, Debug, Clone)]
pub struct FetchOptions {
    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Custom output file name (default: <name>_<timestamp>.json)
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Pretty-print the JSON output (default)
    #[arg(long, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Write compact JSON
    #[arg(long = "no-pretty", overrides_with = "pretty")]
    pub no_pretty: bool,

    /// Replace the output file if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Only download the node from the URL's node-id
    #[arg(long)]
    pub node_only: bool,

    /// Show the file's name and last modification time instead of downloading
    #[arg(long)]
    pub info: bool,

    /// Figma API token to use instead of the stored one
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl FetchOptions {
    /// Pretty output unless --no-pretty came last.
    pub fn pretty_output(&self) -> bool {
        self.pretty || !self.no_pretty
    }
}

/// Exit code for an argument-parsing failure.
///
/// --help and --version also arrive as clap errors but print to stdout and
/// exit 0; every real usage error exits 1 like any other failure.
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a Figma file or node as JSON
    ///
    /// Example: figma-json fetch "https://www.figma.com/design/abc123/Name?node-id=1-2" --node-only
    Fetch {
        /// Figma file URL
        url: String,

        #[command(flatten)]
        options: FetchOptions,
    },

    /// Manage the stored Figma API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Save a Figma personal access token
    Set {
        /// The token (create one under Settings > Security in Figma)
        token: String,

        /// Check the token against the API before saving it
        #[arg(long)]
        verify: bool,
    },

    /// Print the stored token (masked by default)
    Get {
        /// Print the whole token
        #[arg(long)]
        show: bool,

        /// Also print the config file location
        #[arg(long)]
        path: bool,
    },

    /// Delete the stored token
    #[command(alias = "rm")]
    Remove {
        /// Actually delete it
        #[arg(long)]
        confirm: bool,
    },

    /// Check whether the stored token is accepted by the API
    Verify,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_url_with_defaults() {
        let cli = Cli::try_parse_from(["figma-json", "https://www.figma.com/file/abc/Name"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(
            cli.fetch.url.as_deref(),
            Some("https://www.figma.com/file/abc/Name")
        );
        let options = cli.fetch.options;
        assert_eq!(options.output, PathBuf::from("."));
        assert!(options.pretty_output());
        assert!(!options.overwrite);
        assert!(!options.node_only);
        assert!(!options.info);
    }

    #[test]
    fn test_no_pretty_flag() {
        let cli = Cli::try_parse_from(["figma-json", "url", "--no-pretty"]).unwrap();
        assert!(!cli.fetch.options.pretty_output());

        let cli = Cli::try_parse_from(["figma-json", "url", "--no-pretty", "--pretty"]).unwrap();
        assert!(cli.fetch.options.pretty_output());
    }

    #[test]
    fn test_fetch_subcommand_options() {
        let cli = Cli::try_parse_from([
            "figma-json",
            "fetch",
            "https://www.figma.com/design/abc/Name?node-id=1-2",
            "-o",
            "out",
            "-f",
            "node.json",
            "--overwrite",
            "--node-only",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Fetch { url, options }) => {
                assert!(url.ends_with("node-id=1-2"));
                assert_eq!(options.output, PathBuf::from("out"));
                assert_eq!(options.filename.as_deref(), Some("node.json"));
                assert!(options.overwrite);
                assert!(options.node_only);
            }
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_token_subcommands() {
        let cli = Cli::try_parse_from(["figma-json", "token", "set", "figd_x", "--verify"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Token {
                action: TokenAction::Set { ref token, verify: true }
            }) if token == "figd_x"
        ));

        let cli = Cli::try_parse_from(["figma-json", "token", "rm", "--confirm"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Token {
                action: TokenAction::Remove { confirm: true }
            })
        ));
    }

    #[test]
    fn test_usage_errors_exit_with_one() {
        for args in [
            vec!["figma-json", "--bogus"],
            vec!["figma-json", "token"],
            vec!["figma-json", "token", "set"],
        ] {
            let err = Cli::try_parse_from(args.clone()).unwrap_err();
            assert_eq!(parse_error_exit_code(&err), 1, "args: {:?}", args);
        }
    }

    #[test]
    fn test_help_and_version_exit_with_zero() {
        for flag in ["--help", "--version"] {
            let err = Cli::try_parse_from(["figma-json", flag]).unwrap_err();
            assert_eq!(parse_error_exit_code(&err), 0, "flag: {}", flag);
        }
    }

    #[test]
    fn test_url_and_subcommand_conflict() {
        assert!(Cli::try_parse_from(["figma-json", "-o", "out", "token", "get"]).is_err());
    }
}
