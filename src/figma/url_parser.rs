// src/figma/url_parser.rs
// =============================================================================
// This module turns a Figma URL into the pieces the rest of the tool needs.
//
// Supported shapes:
//   https://www.figma.com/file/{fileId}/{fileName}
//   https://www.figma.com/design/{fileId}/{fileName}?node-id=12-1590&m=dev
//   https://www.figma.com/proto/{fileId}/{fileName}?node-id=12%3A1590
//
// Steps (fail fast, first error wins):
// 1. Reject empty input
// 2. Parse it as an absolute URL with the `url` crate
// 3. Check that the host contains "figma.com"
// 4. Pull the file id out of the path
// 5. Pull the node id out of the `node-id` query parameter
// 6. Pull the (percent-decoded) file name out of the third path segment
//
// Rust concepts:
// - thiserror: Derives std::error::Error + Display for our error enum
// - Option combinators: find_map, filter, map
// - Cow<str>: Borrowed-or-owned strings returned by decoders
// =============================================================================

use serde::Serialize;
use thiserror::Error;
use url::Url;

// The substring a host must contain to count as a Figma host.
//
// NOTE: this is containment, not a suffix check, so a host such as
// `evil-figma.com.attacker.net` is accepted. See DESIGN.md.
const FIGMA_DOMAIN: &str = "figma.com";

// Path prefixes that carry a file id, tried in this order
const FILE_ID_PREFIXES: [&str; 3] = ["/file/", "/design/", "/proto/"];

// Query parameter that holds the selected node
const NODE_ID_PARAM: &str = "node-id";

/// Everything that can go wrong while parsing a Figma URL.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is empty")]
    EmptyInput,

    #[error("malformed URL '{url}': {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("not a Figma URL (host '{0}')")]
    NotFigmaHost(String),

    #[error("could not find a file id in path '{0}'")]
    MissingFileId(String),
}

/// The parsed form of a Figma URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FigmaUrl {
    /// Alphanumeric file id, never empty
    pub file_id: String,
    /// Node id exactly as the URL carries it (`12-1590` or `12:1590`)
    pub node_id: Option<String>,
    /// Human-readable file name from the path, percent-decoded
    pub file_name: Option<String>,
}

impl FigmaUrl {
    /// Node id in the colon form the REST API uses as `nodes` map keys.
    pub fn api_node_id(&self) -> Option<String> {
        self.node_id.as_deref().map(to_api_node_id)
    }
}

// Parses a raw string into a FigmaUrl
//
// Parameters:
//   raw: anything the user typed, including an empty string
//
// Returns: the descriptor, or the first UrlError encountered
//
// Example:
//   parse("https://www.figma.com/design/abc123/My-File?node-id=1-2")
//   -> FigmaUrl { file_id: "abc123", node_id: Some("1-2"), file_name: Some("My-File") }
pub fn parse(raw: &str) -> Result<FigmaUrl, UrlError> {
    if raw.is_empty() {
        return Err(UrlError::EmptyInput);
    }

    let url = Url::parse(raw).map_err(|source| UrlError::MalformedUrl {
        url: raw.to_string(),
        source,
    })?;

    // URLs like `mailto:` have no host at all, which can't be Figma either
    let host = url.host_str().unwrap_or_default();
    if !host.contains(FIGMA_DOMAIN) {
        return Err(UrlError::NotFigmaHost(host.to_string()));
    }

    let path = url.path();
    let file_id =
        extract_file_id(path).ok_or_else(|| UrlError::MissingFileId(path.to_string()))?;

    Ok(FigmaUrl {
        file_id,
        node_id: extract_node_id(&url),
        file_name: extract_file_name(path),
    })
}

/// Returns true when `raw` parses as a Figma URL, whatever the failure kind.
pub fn is_valid_figma_url(raw: &str) -> bool {
    parse(raw).is_ok()
}

/// Strips every character that is not an ASCII letter or digit.
pub fn format_file_id(id: &str) -> String {
    id.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Replaces the first `:` with `-` (`12:1590` -> `12-1590`).
///
/// Only the first colon is touched; file naming relies on that.
pub fn format_node_id(id: &str) -> String {
    id.replacen(':', "-", 1)
}

/// Converts a dash-form node id (`12-1590`) into the API's colon form.
/// Ids that already contain a colon are returned unchanged.
pub fn to_api_node_id(id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        id.replacen('-', ":", 1)
    }
}

// Tries each known prefix anchored at the start of the path and takes the
// run of alphanumerics right after it
fn extract_file_id(path: &str) -> Option<String> {
    FILE_ID_PREFIXES.iter().find_map(|prefix| {
        let rest = path.strip_prefix(prefix)?;
        let id: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        (!id.is_empty()).then_some(id)
    })
}

// query_pairs() already form-decodes the value (like a browser would).
// Figma sometimes double-encodes the colon, so one literal "%3A" survives
// that first pass and is undone here. Nothing else is decoded.
fn extract_node_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == NODE_ID_PARAM)
        .map(|(_, value)| value.replacen("%3A", ":", 1))
        .filter(|value| !value.is_empty())
}

// Segments look like ["file" | "design" | "proto", fileId, fileName, ...]
fn extract_file_name(path: &str) -> Option<String> {
    let segment = path.split('/').filter(|part| !part.is_empty()).nth(2)?;

    let decoded = match urlencoding::decode(segment) {
        Ok(name) => name.into_owned(),
        // Percent escapes that aren't valid UTF-8: keep what we can
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes()))
            .into_owned(),
    };

    Some(decoded)
}
