use ormdoctor::mcp::{OrmDoctorMcpServer, types::ScanRelationshipsParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{
    McpTestFixture, assert_pagination, extract_tool_result_json, fixture_with_posts,
};

fn params(fixture: &McpTestFixture) -> ScanRelationshipsParams {
    ScanRelationshipsParams {
        project_root_path: fixture.root(),
        substring_fallback: None,
        limit: None,
        offset: None,
    }
}

// ============================================================================
// scan_relationships tests
// ============================================================================

#[tokio::test]
async fn test_scan_relationships_items() {
    let fixture = fixture_with_posts().unwrap();
    let server = OrmDoctorMcpServer::new();

    let result = server
        .scan_relationships(Parameters(params(&fixture)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 4);
    assert_eq!(json_result["ambiguousCount"], 3);
    assert_eq!(json_result["unresolvableCount"], 1);
    assert_eq!(json_result["parseErrorCount"], 0);
    assert_eq!(json_result["modelFileCount"], 2);
    assert_pagination(&json_result, 0, 20, false);

    let items = json_result["items"].as_array().unwrap();
    let post_file = format!("{}/models/post.py", fixture.root());
    let user_file = format!("{}/models/user.py", fixture.root());

    assert_eq!(
        items[0],
        json!({
            "status": "ambiguous",
            "filePath": post_file,
            "line": 8,
            "col": 5,
            "entity": "Post",
            "alias": "author",
            "target": "User",
            "inverse": "posts",
            "direction": "many-to-one",
            "holder": "Post",
            "candidates": ["author_id", "editor_id"],
            "resolvedField": "author_id",
            "rule": "alias-id",
            "argument": "foreign_keys=[author_id]"
        })
    );
    assert_eq!(items[1]["alias"], "editor");
    assert_eq!(items[1]["resolvedField"], "editor_id");

    assert_eq!(items[2]["status"], "unresolvable");
    assert_eq!(items[2]["alias"], "watcher");
    assert_eq!(
        items[2]["error"],
        "no naming rule matched `watcher` (candidates: author_id, editor_id)"
    );
    assert!(items[2].get("resolvedField").is_none());

    assert_eq!(items[3]["filePath"], user_file);
    assert_eq!(items[3]["alias"], "posts");
    assert_eq!(items[3]["direction"], "one-to-many");
    assert_eq!(items[3]["rule"], "inverse-alias");
    assert_eq!(items[3]["argument"], "foreign_keys=\"Post.author_id\"");
}

#[tokio::test]
async fn test_scan_relationships_pagination() {
    let fixture = fixture_with_posts().unwrap();
    let server = OrmDoctorMcpServer::new();

    let mut first = params(&fixture);
    first.limit = Some(2);
    let result = server.scan_relationships(Parameters(first)).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["items"].as_array().unwrap().len(), 2);
    assert_eq!(json_result["totalCount"], 4);
    assert_pagination(&json_result, 0, 2, true);

    let mut second = params(&fixture);
    second.limit = Some(2);
    second.offset = Some(2);
    let result = server.scan_relationships(Parameters(second)).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    let items = json_result["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["alias"], "watcher");
    assert_pagination(&json_result, 2, 2, false);
}

#[tokio::test]
async fn test_scan_relationships_limit_is_capped() {
    let fixture = fixture_with_posts().unwrap();
    let server = OrmDoctorMcpServer::new();

    let mut request = params(&fixture);
    request.limit = Some(500);
    let result = server.scan_relationships(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_pagination(&json_result, 0, 100, false);
}

#[tokio::test]
async fn test_scan_relationships_empty_project() {
    let fixture = McpTestFixture::new().unwrap();
    let server = OrmDoctorMcpServer::new();

    let result = server
        .scan_relationships(Parameters(params(&fixture)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["totalCount"], 0);
    assert_eq!(json_result["modelFileCount"], 0);
    assert_eq!(json_result["items"], json!([]));
}

#[tokio::test]
async fn test_scan_relationships_counts_parse_errors() {
    let fixture = fixture_with_posts().unwrap();
    fixture
        .write_model(
            "broken.py",
            "class Broken(Base):\n    __tablename__ = \"broken\"\n    owner = relationship(\"User\",\n",
        )
        .unwrap();
    let server = OrmDoctorMcpServer::new();

    let result = server
        .scan_relationships(Parameters(params(&fixture)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["parseErrorCount"], 1);
    assert_eq!(json_result["totalCount"], 4);
}

#[tokio::test]
async fn test_scan_relationships_substring_fallback() {
    let fixture = McpTestFixture::with_models(vec![
        ("user.py", "class User(Base):\n    __tablename__ = \"users\"\n    id = Column(Integer, primary_key=True)\n"),
        (
            "invite.py",
            "class Invite(Base):\n    __tablename__ = \"invites\"\n    primary_contact_id = Column(ForeignKey(\"users.id\"))\n    billing_ref = Column(ForeignKey(\"users.id\"))\n    contact = relationship(\"User\")\n",
        ),
    ])
    .unwrap();
    let server = OrmDoctorMcpServer::new();

    let result = server
        .scan_relationships(Parameters(params(&fixture)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["unresolvableCount"], 1);

    let mut request = params(&fixture);
    request.substring_fallback = Some(true);
    let result = server.scan_relationships(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["ambiguousCount"], 1);
    assert_eq!(json_result["items"][0]["resolvedField"], "primary_contact_id");
    assert_eq!(json_result["items"][0]["rule"], "substring");
}

#[tokio::test]
async fn test_scan_relationships_can_disable_configured_substring_fallback() {
    let fixture = McpTestFixture::with_models(vec![
        ("user.py", "class User(Base):\n    __tablename__ = \"users\"\n    id = Column(Integer, primary_key=True)\n"),
        (
            "invite.py",
            "class Invite(Base):\n    __tablename__ = \"invites\"\n    primary_contact_id = Column(ForeignKey(\"users.id\"))\n    billing_ref = Column(ForeignKey(\"users.id\"))\n    contact = relationship(\"User\")\n",
        ),
    ])
    .unwrap();
    fixture
        .write_config(&json!({ "substringFallback": true }))
        .unwrap();
    let server = OrmDoctorMcpServer::new();

    let result = server
        .scan_relationships(Parameters(params(&fixture)))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["ambiguousCount"], 1);
    assert_eq!(json_result["items"][0]["rule"], "substring");

    let mut request = params(&fixture);
    request.substring_fallback = Some(false);
    let result = server.scan_relationships(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["ambiguousCount"], 0);
    assert_eq!(json_result["unresolvableCount"], 1);
}
