use ormdoctor::mcp::{OrmDoctorMcpServer, types::GetConfigParams};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;

use crate::{McpTestFixture, extract_tool_result_json};

// ============================================================================
// get_config tests
// ============================================================================

#[tokio::test]
async fn test_get_config_defaults() {
    let fixture = McpTestFixture::new().unwrap();
    let server = OrmDoctorMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], false);
    assert_eq!(
        json_result["config"]["includes"],
        json!(["models", "backend/models", "app/models"])
    );
    assert_eq!(json_result["config"]["defaultRoles"], true);
    assert_eq!(json_result["config"]["substringFallback"], false);
    assert_eq!(json_result["effectiveRoles"][0], json!({"role": "author", "stem": "author"}));
}

#[tokio::test]
async fn test_get_config_custom_roles_first() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({
            "roles": [{"role": "buyer", "stem": "customer"}],
            "substringFallback": true
        }))
        .unwrap();
    let server = OrmDoctorMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(json_result["fromFile"], true);
    assert_eq!(json_result["config"]["substringFallback"], true);
    assert_eq!(
        json_result["config"]["roles"],
        json!([{"role": "buyer", "stem": "customer"}])
    );
    assert_eq!(json_result["effectiveRoles"][0]["role"], "buyer");
    assert_eq!(json_result["effectiveRoles"][1]["role"], "author");
}

#[tokio::test]
async fn test_get_config_without_default_roles() {
    let fixture = McpTestFixture::new().unwrap();
    fixture
        .write_config(&json!({
            "roles": [{"role": "buyer", "stem": "customer"}],
            "defaultRoles": false
        }))
        .unwrap();
    let server = OrmDoctorMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    let result = server.get_config(params).await.unwrap();
    let json_result = extract_tool_result_json(&result);

    assert_eq!(
        json_result["effectiveRoles"],
        json!([{"role": "buyer", "stem": "customer"}])
    );
}

#[tokio::test]
async fn test_get_config_invalid_file_is_an_error() {
    let fixture = McpTestFixture::new().unwrap();
    std::fs::write(fixture.root_path().join(".ormdoctorrc.json"), "{ not json").unwrap();
    let server = OrmDoctorMcpServer::new();

    let params = Parameters(GetConfigParams {
        project_root_path: fixture.root(),
    });

    assert!(server.get_config(params).await.is_err());
}
