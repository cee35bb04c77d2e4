use ormdoctor::mcp::{OrmDoctorMcpServer, types::ResolveRelationshipParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

fn params(alias: &str, candidates: &[&str]) -> ResolveRelationshipParams {
    ResolveRelationshipParams {
        alias: alias.to_string(),
        candidates: candidates.iter().map(|c| c.to_string()).collect(),
        inverse: None,
        substring_fallback: None,
        project_root_path: None,
    }
}

// ============================================================================
// resolve_relationship tests
// ============================================================================

#[tokio::test]
async fn test_resolve_relationship_alias_user_id() {
    let server = OrmDoctorMcpServer::new();

    let result = server
        .resolve_relationship(Parameters(params("host", &["host_user_id", "cohost_user_id"])))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["resolved"], true);
    assert_eq!(json_result["field"], "host_user_id");
    assert_eq!(json_result["rule"], "alias-user-id");
    assert!(json_result.get("error").is_none());
}

#[tokio::test]
async fn test_resolve_relationship_inverse() {
    let server = OrmDoctorMcpServer::new();

    let mut request = params("referrals_made", &["referrer_id", "referred_user_id"]);
    request.inverse = Some("referrer".to_string());
    let result = server.resolve_relationship(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["field"], "referrer_id");
    assert_eq!(json_result["rule"], "inverse-alias");
}

#[tokio::test]
async fn test_resolve_relationship_unresolvable() {
    let server = OrmDoctorMcpServer::new();

    let result = server
        .resolve_relationship(Parameters(params("unknown_role", &["col_a", "col_b"])))
        .await
        .unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["resolved"], false);
    assert_eq!(
        json_result["error"],
        "no naming rule matched `unknown_role` (candidates: col_a, col_b)"
    );
    assert_eq!(
        json_result["ruleChain"],
        json!([
            "alias-id",
            "alias-user-id",
            "inverse-alias",
            "role-stem",
            "user-id",
            "single-candidate"
        ])
    );
}

#[tokio::test]
async fn test_resolve_relationship_project_roles() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({"roles": [{"role": "buyer", "stem": "customer"}]}))
        .unwrap();
    let server = OrmDoctorMcpServer::new();

    let mut request = params("buyer", &["customer_id", "seller_id"]);
    request.project_root_path = Some(fixture.root());
    let result = server.resolve_relationship(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["field"], "customer_id");
    assert_eq!(json_result["rule"], "role-stem");
}

#[tokio::test]
async fn test_resolve_relationship_substring_override() {
    let server = OrmDoctorMcpServer::new();

    let mut request = params("contact", &["primary_contact_id", "billing_ref"]);
    request.substring_fallback = Some(true);
    let result = server.resolve_relationship(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["field"], "primary_contact_id");
    assert_eq!(json_result["rule"], "substring");
}

#[tokio::test]
async fn test_resolve_relationship_can_disable_configured_substring_fallback() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({ "substringFallback": true }))
        .unwrap();
    let server = OrmDoctorMcpServer::new();

    let mut request = params("contact", &["primary_contact_id", "billing_ref"]);
    request.project_root_path = Some(fixture.root());
    let result = server.resolve_relationship(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["rule"], "substring");

    let mut request = params("contact", &["primary_contact_id", "billing_ref"]);
    request.project_root_path = Some(fixture.root());
    request.substring_fallback = Some(false);
    let result = server.resolve_relationship(Parameters(request)).await.unwrap();
    let json_result = extract_tool_result_json(&result);
    assert_eq!(json_result["resolved"], false);
}
