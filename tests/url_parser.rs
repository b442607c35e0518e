// Parsing real-world Figma URLs through the public API.

use figma_json::figma::{
    format_file_id, format_node_id, is_valid_figma_url, parse, FigmaUrl, UrlError,
};

const FILE_ID: &str = "w2zcI883J2XrHRdLHUu3uk";

fn design_url(query: &str) -> String {
    format!(
        "https://www.figma.com/design/{}/%E8%B5%84%E6%BA%90%E5%85%B1%E4%BA%AB%E5%BA%93{}",
        FILE_ID, query
    )
}

#[test]
fn dev_mode_link_with_node() {
    let parsed = parse(&design_url("?node-id=12-1590&m=dev")).unwrap();

    assert_eq!(
        parsed,
        FigmaUrl {
            file_id: FILE_ID.to_string(),
            node_id: Some("12-1590".to_string()),
            file_name: Some("资源共享库".to_string()),
        }
    );
    assert!(is_valid_figma_url(&design_url("?node-id=12-1590&m=dev")));
}

#[test]
fn different_node_same_file() {
    let parsed = parse(&design_url("?node-id=9-1439&t=abc123-0")).unwrap();
    assert_eq!(parsed.file_id, FILE_ID);
    assert_eq!(parsed.node_id.as_deref(), Some("9-1439"));
}

#[test]
fn link_without_node() {
    let parsed = parse(&design_url("")).unwrap();
    assert_eq!(parsed.node_id, None);
    assert_eq!(parsed.file_name.as_deref(), Some("资源共享库"));
}

#[test]
fn legacy_file_and_prototype_links() {
    let file = parse("https://www.figma.com/file/abc123/Old-Style?node-id=0%3A1").unwrap();
    assert_eq!(file.file_id, "abc123");
    assert_eq!(file.node_id.as_deref(), Some("0:1"));

    let proto = parse("https://www.figma.com/proto/abc123/Prototype?node-id=3-4&scaling=min-zoom")
        .unwrap();
    assert_eq!(proto.file_id, "abc123");
    assert_eq!(proto.node_id.as_deref(), Some("3-4"));
}

#[test]
fn rejected_inputs() {
    assert!(matches!(parse(""), Err(UrlError::EmptyInput)));
    assert!(matches!(
        parse("invalid-url"),
        Err(UrlError::MalformedUrl { .. })
    ));
    assert!(matches!(
        parse("https://example.com"),
        Err(UrlError::NotFigmaHost(_))
    ));
    assert!(matches!(
        parse("https://www.figma.com/community/file"),
        Err(UrlError::MissingFileId(_))
    ));

    for bad in ["", "invalid-url", "https://example.com/file/abc123"] {
        assert!(!is_valid_figma_url(bad));
    }
}

#[test]
fn formatting_helpers() {
    assert_eq!(format_file_id("ABC-123_XYZ"), "ABC123XYZ");
    assert_eq!(format_node_id("123:456"), "123-456");
    assert_eq!(format_node_id("1:2:3"), "1-2:3");

    let parsed = parse(&design_url("?node-id=12%3A1590")).unwrap();
    assert_eq!(format_file_id(&parsed.file_id), parsed.file_id);
    assert_eq!(format_node_id(parsed.node_id.as_deref().unwrap()), "12-1590");
}
