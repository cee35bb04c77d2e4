use std::path::{Path, PathBuf};

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;

use super::types::{
    ConfigDto, ConfigValues, GetConfigParams, Pagination, RelationshipItem,
    RelationshipScanResult, ResolveRelationshipParams, ResolveResult, ScanRelationshipsParams,
    role_entries,
};
use crate::{
    config::{Config, load_config},
    core::{CheckContext, Resolver},
    rules::relationships::check_relationship_issues,
};

#[derive(Clone)]
pub struct OrmDoctorMcpServer {
    tool_router: ToolRouter<Self>,
}

impl Default for OrmDoctorMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Project config (defaults without a root) with the tool's
/// `substringFallback` applied on top, in either direction.
fn project_config(
    project_root_path: Option<&str>,
    substring_fallback: Option<bool>,
) -> Result<Config, McpError> {
    let mut config = match project_root_path {
        Some(path) => {
            load_config(Path::new(path))
                .map_err(|e| {
                    McpError::internal_error(format!("Failed to load config: {}", e), None)
                })?
                .config
        }
        None => Config::default(),
    };
    if let Some(enabled) = substring_fallback {
        config.substring_fallback = enabled;
    }
    Ok(config)
}

fn to_json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

#[tool_router]
impl OrmDoctorMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// List ambiguous and unresolvable relationships
    #[tool(
        description = "Scan SQLAlchemy models for relationships linked by several foreign-key columns. Ambiguous items carry the resolved column and the foreign_keys= argument to add; unresolvable items list their candidates. Returns paginated list."
    )]
    pub async fn scan_relationships(
        &self,
        params: Parameters<ScanRelationshipsParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let limit = params.limit.map(|v| v as usize).unwrap_or(20).min(100);
        let offset = params.offset.map(|v| v as usize).unwrap_or(0);

        let config = project_config(
            Some(params.project_root_path.as_str()),
            params.substring_fallback,
        )?;
        let ctx =
            CheckContext::with_config(config, PathBuf::from(&params.project_root_path), false);

        let issues = check_relationship_issues(&ctx);
        let ambiguous_count = issues.ambiguous.len();
        let unresolvable_count = issues.unresolvable.len();

        let mut all_items: Vec<RelationshipItem> = issues
            .ambiguous
            .iter()
            .map(RelationshipItem::from)
            .chain(issues.unresolvable.iter().map(RelationshipItem::from))
            .collect();
        all_items.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.line.cmp(&b.line))
                .then_with(|| a.col.cmp(&b.col))
        });

        let total_count = all_items.len();
        let items: Vec<RelationshipItem> =
            all_items.into_iter().skip(offset).take(limit).collect();
        let has_more = offset + items.len() < total_count;

        to_json_result(&RelationshipScanResult {
            total_count,
            ambiguous_count,
            unresolvable_count,
            parse_error_count: ctx.parsed_files_errors().len(),
            model_file_count: ctx.files.len(),
            items,
            pagination: Pagination {
                offset,
                limit,
                has_more,
            },
        })
    }

    /// Run the naming rules on one alias
    #[tool(
        description = "Pick the foreign-key column for a relationship name from a list of candidate columns, using naming conventions and the project's role table. Reports the rule that matched, or that none did."
    )]
    pub async fn resolve_relationship(
        &self,
        params: Parameters<ResolveRelationshipParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let config = project_config(
            params.project_root_path.as_deref(),
            params.substring_fallback,
        )?;
        let resolver =
            Resolver::new(config.role_table()).with_substring_fallback(config.substring_fallback);
        let rule_chain = resolver.chain().iter().map(|r| r.to_string()).collect();

        let result = match resolver.resolve_names(
            &params.alias,
            params.inverse.as_deref(),
            params.candidates,
        ) {
            Ok(resolution) => ResolveResult {
                resolved: true,
                field: Some(resolution.field),
                rule: Some(resolution.rule.to_string()),
                error: None,
                rule_chain,
            },
            Err(err) => ResolveResult {
                resolved: false,
                field: None,
                rule: None,
                error: Some(err.to_string()),
                rule_chain,
            },
        };

        to_json_result(&result)
    }

    /// Get project configuration
    #[tool(
        description = "Get ormdoctor configuration: scanned directories, ignores, custom roles and the effective role table."
    )]
    pub async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = Path::new(&params.0.project_root_path);

        let result = load_config(path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {}", e), None))?;

        let effective_roles = role_entries(&result.config.role_table());
        to_json_result(&ConfigDto {
            from_file: result.from_file,
            config: ConfigValues::from(result.config),
            effective_roles,
        })
    }
}

#[tool_handler]
impl ServerHandler for OrmDoctorMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "ormdoctor MCP helps AI agents fix ambiguous SQLAlchemy relationships.\n\n\
                 Available tools:\n\
                 1. get_config - Get project configuration and the role table\n\
                 2. scan_relationships - List relationships that need foreign_keys= (paginated)\n\
                 3. resolve_relationship - Pick a column for one relationship name\n\n\
                 Recommended Workflow:\n\
                 1. Use scan_relationships to find ambiguous and unresolvable relationships\n\
                 2. Add the suggested foreign_keys= argument to each ambiguous relationship\n\
                 3. For unresolvable ones, choose a column from the candidates and write it explicitly"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = OrmDoctorMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
