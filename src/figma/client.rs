// src/figma/client.rs
// =============================================================================
// This module talks to the Figma REST API (https://api.figma.com/v1).
//
// Key functionality:
// - Sends the personal access token in the X-Figma-Token header
// - Fetches whole files, selected nodes, file summaries and the current user
// - Turns HTTP failures into a small set of error kinds (401, 403, 404, 429...)
//
// No retries: one request, 30 second timeout, and any failure goes straight
// back to the caller.
//
// Rust concepts:
// - async/await: reqwest's client is async, so every call is awaited
// - Generics with trait bounds: get_json<T: DeserializeOwned>
// - serde_json::Value: for documents whose shape we don't model
// =============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::url_parser::to_api_node_id;

/// Base URL of the public Figma REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.figma.com/v1";

// Sent as X-Figma-Token; header names are case-insensitive
const TOKEN_HEADER: &str = "x-figma-token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned by [`FigmaClient`].
#[derive(Debug, Error)]
pub enum FigmaError {
    #[error("Figma token is empty")]
    MissingToken,

    #[error("Figma token contains characters that cannot be sent in a header")]
    MalformedToken,

    #[error("invalid Figma token, check your credentials")]
    InvalidCredential,

    #[error("access denied, check the file permissions or the token scopes")]
    Forbidden,

    #[error("file or node not found")]
    NotFound,

    #[error("too many requests, try again later")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error, check your connection: {0}")]
    Network(#[source] reqwest::Error),

    #[error("could not decode the API response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("no node ids given")]
    NoNodeIds,

    #[error("node {0} does not exist")]
    NodeNotFound(String),
}

/// Name and modification time of a file, as shown by `--info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub name: String,
    pub last_modified: String,
}

/// Body of `GET /files/{key}/nodes`.
///
/// Each value holds `document`, `components` and `styles` for one node, or
/// `null` when the id doesn't exist in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodesResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: BTreeMap<String, Value>,
}

// Figma error bodies look like {"status": 404, "err": "Not found"}
#[derive(Deserialize)]
struct ApiErrorBody {
    err: Option<String>,
}

/// Thin async client over the Figma REST API.
#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: Client,
    base_url: String,
}

impl FigmaClient {
    /// Creates a client for the public API.
    pub fn new(token: &str) -> Result<Self, FigmaError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Creates a client against another base URL (a mock server in tests).
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, FigmaError> {
        if token.trim().is_empty() {
            return Err(FigmaError::MissingToken);
        }

        let mut token_value =
            HeaderValue::from_str(token.trim()).map_err(|_| FigmaError::MalformedToken)?;
        // Keeps the token out of Debug output
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token_value);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FigmaError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Downloads the full JSON document of a file.
    pub async fn get_file(&self, file_id: &str) -> Result<Value, FigmaError> {
        self.get_json(&format!("/files/{}", file_id), &[]).await
    }

    /// Downloads the given nodes of a file in one request.
    pub async fn get_nodes(
        &self,
        file_id: &str,
        node_ids: &[&str],
    ) -> Result<NodesResponse, FigmaError> {
        if node_ids.is_empty() {
            return Err(FigmaError::NoNodeIds);
        }

        let ids = node_ids.join(",");
        self.get_json(&format!("/files/{}/nodes", file_id), &[("ids", ids.as_str())])
            .await
    }

    /// Downloads a single node.
    ///
    /// `node_id` may be in either the dash or the colon form; the response
    /// map is searched for both.
    pub async fn get_node(&self, file_id: &str, node_id: &str) -> Result<Value, FigmaError> {
        let api_id = to_api_node_id(node_id);
        let mut response = self.get_nodes(file_id, &[api_id.as_str()]).await?;

        [api_id.as_str(), node_id]
            .iter()
            .find_map(|key| response.nodes.remove(*key))
            .filter(|node| !node.is_null())
            .ok_or_else(|| FigmaError::NodeNotFound(node_id.to_string()))
    }

    /// Checks the token against `GET /me`. Every failure counts as invalid.
    pub async fn validate_token(&self) -> bool {
        match self.get_json::<Value>("/me", &[]).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "token validation failed");
                false
            }
        }
    }

    /// Fetches just the name and last-modified time of a file.
    pub async fn get_file_info(&self, file_id: &str) -> Result<FileSummary, FigmaError> {
        // depth=1 keeps the document tree out of the response
        self.get_json(&format!("/files/{}", file_id), &[("depth", "1")])
            .await
    }

    // Sends one GET request and decodes the JSON body into T
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FigmaError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "sending request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(FigmaError::Network)?;

        if !response.status().is_success() {
            return Err(classify_failure(response).await);
        }

        response.json::<T>().await.map_err(FigmaError::Decode)
    }
}

// Maps a non-2xx response onto a FigmaError
//
// HTTP status codes:
// - 401: bad or expired token
// - 403: token can't see this file
// - 404: file or node doesn't exist
// - 429: rate limited
// - anything else: generic API error with Figma's own message if present
async fn classify_failure(response: Response) -> FigmaError {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "request failed");

    match status {
        StatusCode::UNAUTHORIZED => FigmaError::InvalidCredential,
        StatusCode::FORBIDDEN => FigmaError::Forbidden,
        StatusCode::NOT_FOUND => FigmaError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => FigmaError::RateLimited,
        _ => {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.err)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

            FigmaError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}
