// src/output/writer.rs
// =============================================================================
// This module writes downloaded JSON to disk.
//
// How it works:
// 1. Make sure the output directory exists (create it if needed)
// 2. Pick a file name: the one the user gave, or one derived from the data
// 3. Refuse to clobber an existing file unless overwriting is allowed
// 4. Serialize (pretty or compact) and write the file in one go
// 5. Report where it went and how big it is
//
// Rust concepts:
// - tokio::fs: Async versions of std::fs operations
// - PathBuf vs &Path: owned vs borrowed paths
// - Iterators over chars for string sanitizing
// =============================================================================

use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

// Used when the data carries no usable name
const DEFAULT_BASE_NAME: &str = "figma-data";

// Longest base name we keep (in characters)
const MAX_BASE_NAME_CHARS: usize = 100;

// Characters that are unsafe in file names on at least one common platform
const UNSAFE_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Errors returned by [`save_json`].
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("file {} already exists, use --overwrite to replace it", .0.display())]
    FileExists(PathBuf),

    #[error("could not create directory {}: {source}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where and how to save a document.
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Output directory, created if missing
    pub directory: PathBuf,
    /// Explicit file name; derived from the data when `None`
    pub filename: Option<String>,
    /// Two-space indented JSON instead of a single line
    pub pretty: bool,
    /// Replace an existing file instead of failing
    pub overwrite: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            filename: None,
            pretty: true,
            overwrite: true,
        }
    }
}

/// What [`save_json`] wrote.
#[derive(Debug, Clone)]
pub struct SaveResult {
    pub file_path: PathBuf,
    pub file_name: String,
    /// Size on disk in bytes
    pub file_size: u64,
}

// Saves a JSON value to disk
//
// Parameters:
//   data: any JSON value (usually a Figma file or node document)
//   options: directory, file name, formatting and overwrite policy
//
// Returns: SaveResult with the final path and size, or a WriteError
pub async fn save_json(data: &Value, options: &SaveOptions) -> Result<SaveResult, WriteError> {
    ensure_directory(&options.directory).await?;

    let file_name = match &options.filename {
        Some(name) => name.clone(),
        None => default_file_name(data),
    };
    let file_path = options.directory.join(&file_name);

    if !options.overwrite && path_exists(&file_path).await {
        return Err(WriteError::FileExists(file_path));
    }

    let content = if options.pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };

    let write_failed = |source| WriteError::WriteFailed {
        path: file_path.clone(),
        source,
    };

    tokio::fs::write(&file_path, content.as_bytes())
        .await
        .map_err(write_failed)?;
    let metadata = tokio::fs::metadata(&file_path).await.map_err(write_failed)?;

    tracing::debug!(path = %file_path.display(), bytes = metadata.len(), "saved JSON");

    Ok(SaveResult {
        file_path,
        file_name,
        file_size: metadata.len(),
    })
}

// Creates the directory (and parents) when it doesn't exist yet
async fn ensure_directory(directory: &Path) -> Result<(), WriteError> {
    if path_exists(directory).await {
        return Ok(());
    }

    tracing::debug!(path = %directory.display(), "creating output directory");
    tokio::fs::create_dir_all(directory)
        .await
        .map_err(|source| WriteError::DirectoryCreateFailed {
            path: directory.to_path_buf(),
            source,
        })
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Builds `<name>_<timestamp>.json` from the data's `name` (or
/// `document.name`), falling back to `figma-data`.
pub fn default_file_name(data: &Value) -> String {
    let raw_name = data
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .or_else(|| {
            data.get("document")
                .and_then(|doc| doc.get("name"))
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
        });

    let base_name = raw_name
        .map(sanitize_file_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());

    format!("{}_{}.json", base_name, file_timestamp())
}

/// Makes a name safe to use as a file name.
///
/// Unsafe characters, whitespace and underscores all become `_`, runs of `_`
/// collapse into one, a leading/trailing `_` is dropped and the result is
/// capped at 100 characters.
pub fn sanitize_file_name(name: &str) -> String {
    let mut collapsed = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if UNSAFE_CHARS.contains(&c) || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.strip_prefix('_').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix('_').unwrap_or(trimmed);

    trimmed.chars().take(MAX_BASE_NAME_CHARS).collect()
}

// ISO-8601 UTC with ':' and '.' swapped for '-', e.g. 2024-05-01T10-20-30-123Z
fn file_timestamp() -> String {
    Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`...
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rounded, UNITS[unit])
}
