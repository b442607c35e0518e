// src/token/store.rs
// =============================================================================
// This module keeps the Figma personal access token on disk.
//
// Layout:
//   ~/.figma-json/            (mode 700 when we create it)
//   ~/.figma-json/config.json (mode 600, {"token": "..."})
//
// The directory can be moved with the FIGMA_JSON_CONFIG_DIR environment
// variable. Keys other than "token" in config.json are kept as they are.
//
// Rust concepts:
// - #[cfg(unix)]: Compile-time platform switches for file permissions
// - #[serde(flatten)]: Collects unknown JSON keys into a map
// =============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "FIGMA_JSON_CONFIG_DIR";

const CONFIG_DIR_NAME: &str = ".figma-json";
const CONFIG_FILE_NAME: &str = "config.json";

const DIR_MODE: u32 = 0o700;
const FILE_MODE: u32 = 0o600;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token must not be empty")]
    EmptyToken,

    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

// Contents of config.json
#[derive(Debug, Default, Serialize, Deserialize)]
struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// File-backed storage for a single token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
    path: PathBuf,
}

impl TokenStore {
    /// Opens the store in `$FIGMA_JSON_CONFIG_DIR` or `~/.figma-json`.
    pub fn new() -> Result<Self, TokenError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::at(dir));
        }

        let home = dirs::home_dir().ok_or(TokenError::NoHomeDir)?;
        Ok(Self::at(home.join(CONFIG_DIR_NAME)))
    }

    /// Opens the store in an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(CONFIG_FILE_NAME);
        Self { dir, path }
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored token, if any.
    pub fn get(&self) -> Option<String> {
        self.read_config().token.filter(|token| !token.is_empty())
    }

    pub fn has(&self) -> bool {
        self.get().is_some()
    }

    /// Stores `token` (trimmed), replacing any previous one.
    pub fn set(&self, token: &str) -> Result<(), TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::EmptyToken);
        }

        let mut config = self.read_config();
        config.token = Some(token.to_string());
        self.write_config(&config)
    }

    /// Deletes the stored token. Other config keys survive.
    pub fn remove(&self) -> Result<(), TokenError> {
        let mut config = self.read_config();
        config.token = None;
        self.write_config(&config)
    }

    // A missing file is an empty config. A broken one is too, but we warn.
    fn read_config(&self) -> Config {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Config::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read config file");
                return Config::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to parse config file");
            Config::default()
        })
    }

    fn write_config(&self, config: &Config) -> Result<(), TokenError> {
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(config)?;
        let io_err = |source| TokenError::Io {
            path: self.path.clone(),
            source,
        };

        fs::write(&self.path, content).map_err(io_err)?;
        set_mode(&self.path, FILE_MODE).map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), "config written");
        Ok(())
    }

    // Only a directory we create gets its mode tightened
    fn ensure_dir(&self) -> Result<(), TokenError> {
        if self.dir.is_dir() {
            return Ok(());
        }

        let io_err = |source| TokenError::Io {
            path: self.dir.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        set_mode(&self.dir, DIR_MODE).map_err(io_err)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Shows the first 8 and last 4 characters of a token: `figd_abc...wxyz`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let head: String = chars.iter().take(8).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}
