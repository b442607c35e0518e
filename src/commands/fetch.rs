// src/commands/fetch.rs
// =============================================================================
// Downloads a Figma file (or one node of it) and saves it as JSON.
//
// Flow:
// 1. Parse the URL (print the supported shapes if that fails)
// 2. Find a token: --token / FIGMA_TOKEN first, then the token store
// 3. --info: print name + last modified and stop
// 4. --node-only with a node-id: fetch that node, otherwise the whole file
// 5. Save the JSON and print where it went
// =============================================================================

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use super::SET_TOKEN_HINT;
use crate::cli::FetchOptions;
use crate::figma::{self, FigmaClient, FigmaUrl, FileSummary};
use crate::output::{self, SaveOptions};
use crate::token::TokenStore;

const SUPPORTED_FORMATS: [&str; 3] = [
    "https://www.figma.com/file/{fileId}/{fileName}",
    "https://www.figma.com/design/{fileId}/{fileName}",
    "https://www.figma.com/proto/{fileId}/{fileName}",
];

pub async fn run(url: &str, options: &FetchOptions) -> Result<()> {
    let target = parse_target(url)?;

    let token = resolve_token(options.token.as_deref())?;

    let client = FigmaClient::new(&token)?;
    let file_id = figma::format_file_id(&target.file_id);

    if options.info {
        let info = fetch_info(&client, &file_id).await?;
        print_summary(&info);
        return Ok(());
    }

    let (data, kind) = fetch_data(&client, &file_id, &target, options.node_only).await?;
    println!("✅ Data fetched");

    println!("💾 Saving file...");
    let save_options = SaveOptions {
        directory: options.output.clone(),
        filename: options.filename.clone(),
        pretty: options.pretty_output(),
        overwrite: options.overwrite,
    };
    let saved = output::save_json(&data, &save_options).await?;

    println!("✅ File saved");
    println!("   Path: {}", saved.file_path.display());
    println!("   Size: {}", output::format_file_size(saved.file_size));
    println!("   Type: {}", kind);

    Ok(())
}

// Parses and reports the URL; runs before any token lookup
fn parse_target(url: &str) -> Result<FigmaUrl> {
    println!("🔍 Parsing URL...");
    let target = match figma::parse(url) {
        Ok(target) => target,
        Err(e) => {
            print_supported_formats();
            return Err(e).context("invalid Figma URL");
        }
    };

    println!("✅ URL parsed");
    for line in describe_target(&target) {
        println!("   {}", line);
    }
    Ok(target)
}

async fn fetch_info(client: &FigmaClient, file_id: &str) -> Result<FileSummary> {
    println!("📋 Fetching file info...");
    client
        .get_file_info(file_id)
        .await
        .context("failed to fetch file info")
}

// Returns the document plus a label for what it is ("node" or "file")
async fn fetch_data(
    client: &FigmaClient,
    file_id: &str,
    target: &FigmaUrl,
    node_only: bool,
) -> Result<(Value, &'static str)> {
    match (&target.node_id, node_only) {
        (Some(node_id), true) => {
            println!("📥 Fetching node data...");
            let node = client
                .get_node(file_id, node_id)
                .await
                .with_context(|| format!("failed to fetch node {}", node_id))?;
            Ok((node, "node"))
        }
        (None, true) => {
            println!("⚠️  URL has no node-id, fetching the whole file instead");
            fetch_file(client, file_id).await
        }
        (_, false) => fetch_file(client, file_id).await,
    }
}

async fn fetch_file(client: &FigmaClient, file_id: &str) -> Result<(Value, &'static str)> {
    println!("📥 Fetching file data...");
    let file = client
        .get_file(file_id)
        .await
        .with_context(|| format!("failed to fetch file {}", file_id))?;
    Ok((file, "file"))
}

// An explicit token (flag or FIGMA_TOKEN) wins over the stored one
fn resolve_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|token| !token.is_empty()) {
        tracing::debug!("using token from --token / FIGMA_TOKEN");
        return Ok(token.to_string());
    }

    let store = TokenStore::new()?;
    tracing::debug!(path = %store.config_path().display(), "reading stored token");
    store
        .get()
        .ok_or_else(|| anyhow!("no Figma token found, {}", SET_TOKEN_HINT))
}

// Node id is shown exactly as the URL carried it
fn describe_target(target: &FigmaUrl) -> Vec<String> {
    let mut lines = vec![format!("File ID: {}", target.file_id)];
    if let Some(node_id) = &target.node_id {
        lines.push(format!("Node ID: {}", node_id));
    }
    if let Some(file_name) = &target.file_name {
        lines.push(format!("File name: {}", file_name));
    }
    lines
}

fn print_summary(info: &FileSummary) {
    println!("📄 File info:");
    println!("   Name: {}", info.name);
    println!("   Last modified: {}", info.last_modified);
}

fn print_supported_formats() {
    eprintln!("Supported URL formats:");
    for format in SUPPORTED_FORMATS {
        eprintln!("   {}", format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FILE_BODY: &str = r#"{"name":"Design System","lastModified":"2024-05-01T10:20:30Z"}"#;

    fn target(node_id: Option<&str>) -> FigmaUrl {
        FigmaUrl {
            file_id: "abc123".to_string(),
            node_id: node_id.map(str::to_string),
            file_name: Some("Design-System".to_string()),
        }
    }

    async fn mount_file(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(FILE_BODY, "application/json"))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    async fn mount_nodes(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/files/abc123/nodes"))
            .and(query_param("ids", "12:1590"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nodes": {
                    "12:1590": { "document": { "id": "12:1590", "name": "Button" } }
                }
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> FigmaClient {
        FigmaClient::with_base_url("figd_test", &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_node_only_fetches_the_node() {
        let server = MockServer::start().await;
        mount_nodes(&server, 1).await;
        mount_file(&server, 0).await;

        let (data, kind) = fetch_data(&client_for(&server), "abc123", &target(Some("12-1590")), true)
            .await
            .unwrap();

        assert_eq!(kind, "node");
        assert_eq!(data["document"]["name"], "Button");
    }

    #[tokio::test]
    async fn test_node_only_without_node_id_fetches_the_file() {
        let server = MockServer::start().await;
        mount_nodes(&server, 0).await;
        mount_file(&server, 1).await;

        let (data, kind) = fetch_data(&client_for(&server), "abc123", &target(None), true)
            .await
            .unwrap();

        assert_eq!(kind, "file");
        assert_eq!(data["name"], "Design System");
    }

    #[tokio::test]
    async fn test_node_id_is_ignored_without_node_only() {
        let server = MockServer::start().await;
        mount_nodes(&server, 0).await;
        mount_file(&server, 1).await;

        let (_, kind) = fetch_data(&client_for(&server), "abc123", &target(Some("12-1590")), false)
            .await
            .unwrap();

        assert_eq!(kind, "file");
    }

    #[tokio::test]
    async fn test_info_requests_shallow_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/abc123"))
            .and(query_param("depth", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(FILE_BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let info = fetch_info(&client_for(&server), "abc123").await.unwrap();

        assert_eq!(info.name, "Design System");
        assert_eq!(info.last_modified, "2024-05-01T10:20:30Z");
    }

    #[tokio::test]
    async fn test_fetch_errors_carry_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetch_data(&client_for(&server), "abc123", &target(None), false)
            .await
            .unwrap_err();

        assert_eq!(
            format!("{:#}", err),
            "failed to fetch file abc123: file or node not found"
        );
    }

    #[test]
    fn test_describe_target_keeps_node_id_as_parsed() {
        assert_eq!(
            describe_target(&target(Some("12:1590"))),
            vec![
                "File ID: abc123".to_string(),
                "Node ID: 12:1590".to_string(),
                "File name: Design-System".to_string(),
            ]
        );
        assert_eq!(
            describe_target(&target(Some("12-1590")))[1],
            "Node ID: 12-1590"
        );
    }

    #[test]
    fn test_parse_target_needs_no_token() {
        let parsed = parse_target("https://www.figma.com/design/abc123/Name?node-id=12%3A1590").unwrap();
        assert_eq!(parsed.node_id.as_deref(), Some("12:1590"));

        let err = parse_target("https://example.com/file/abc123").unwrap_err();
        assert!(format!("{:#}", err).starts_with("invalid Figma URL: "));
    }

    #[test]
    fn test_explicit_token_wins() {
        assert_eq!(resolve_token(Some("  figd_flag ")).unwrap(), "figd_flag");
    }
}
