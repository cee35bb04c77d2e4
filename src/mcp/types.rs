use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    core::{RoleTable, resolve::RoleStem},
    issues::{AmbiguousRelationshipIssue, UnresolvableRelationshipIssue},
};

// ============================================================
// Tool Parameters
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Absolute path to the project root
    pub project_root_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRelationshipsParams {
    /// Absolute path to the project root
    pub project_root_path: String,
    /// Enable the substring naming rule (overrides config file)
    pub substring_fallback: Option<bool>,
    /// Maximum number of items to return (default 20, max 100)
    pub limit: Option<u32>,
    /// Number of items to skip
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRelationshipParams {
    /// Relationship name, e.g. "author"
    pub alias: String,
    /// Candidate reference field names, e.g. ["author_id", "editor_id"]
    pub candidates: Vec<String>,
    /// Name of the inverse relationship, if any
    pub inverse: Option<String>,
    /// Enable the substring naming rule
    pub substring_fallback: Option<bool>,
    /// Project root whose config supplies custom roles
    pub project_root_path: Option<String>,
}

// ============================================================
// Config Types (get_config)
// ============================================================

/// Configuration DTO for MCP
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    pub config: ConfigValues,
    /// Role table the resolver uses, in lookup order
    pub effective_roles: Vec<RoleEntry>,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValues {
    pub ignores: Vec<String>,
    pub includes: Vec<String>,
    pub ignore_test_files: bool,
    pub roles: Vec<RoleEntry>,
    pub default_roles: bool,
    pub substring_fallback: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RoleEntry {
    pub role: String,
    pub stem: String,
}

impl From<&RoleStem> for RoleEntry {
    fn from(entry: &RoleStem) -> Self {
        Self {
            role: entry.role.clone(),
            stem: entry.stem.clone(),
        }
    }
}

impl From<Config> for ConfigValues {
    fn from(c: Config) -> Self {
        Self {
            ignores: c.ignores,
            includes: c.includes,
            ignore_test_files: c.ignore_test_files,
            roles: c.roles.iter().map(RoleEntry::from).collect(),
            default_roles: c.default_roles,
            substring_fallback: c.substring_fallback,
        }
    }
}

pub fn role_entries(table: &RoleTable) -> Vec<RoleEntry> {
    table.entries().iter().map(RoleEntry::from).collect()
}

// ============================================================
// Relationship Scan Types (scan_relationships)
// ============================================================

/// Result of scan_relationships operation
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipScanResult {
    pub total_count: usize,
    pub ambiguous_count: usize,
    pub unresolvable_count: usize,
    pub parse_error_count: usize,
    pub model_file_count: usize,
    pub items: Vec<RelationshipItem>,
    pub pagination: Pagination,
}

/// One relationship that needs `foreign_keys=`.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipItem {
    /// "ambiguous" (resolved) or "unresolvable"
    pub status: String,
    pub file_path: String,
    pub line: usize,
    pub col: usize,
    pub entity: String,
    pub alias: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
    /// "many-to-one" or "one-to-many"
    pub direction: String,
    /// Entity declaring the candidate fields
    pub holder: String,
    pub candidates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Keyword argument to add to the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&AmbiguousRelationshipIssue> for RelationshipItem {
    fn from(issue: &AmbiguousRelationshipIssue) -> Self {
        Self {
            status: "ambiguous".to_string(),
            file_path: issue.context.file_path().to_string(),
            line: issue.context.line(),
            col: issue.context.col(),
            entity: issue.entity.clone(),
            alias: issue.alias.clone(),
            target: issue.target.clone(),
            inverse: issue.inverse.clone(),
            direction: issue.candidates.direction.to_string(),
            holder: issue.candidates.holder.clone(),
            candidates: issue.candidates.fields.iter().cloned().collect(),
            resolved_field: Some(issue.resolution.field.clone()),
            rule: Some(issue.resolution.rule.to_string()),
            argument: Some(issue.argument.clone()),
            error: None,
        }
    }
}

impl From<&UnresolvableRelationshipIssue> for RelationshipItem {
    fn from(issue: &UnresolvableRelationshipIssue) -> Self {
        Self {
            status: "unresolvable".to_string(),
            file_path: issue.context.file_path().to_string(),
            line: issue.context.line(),
            col: issue.context.col(),
            entity: issue.entity.clone(),
            alias: issue.alias.clone(),
            target: issue.target.clone(),
            inverse: issue.inverse.clone(),
            direction: issue.candidates.direction.to_string(),
            holder: issue.candidates.holder.clone(),
            candidates: issue.candidates.fields.iter().cloned().collect(),
            resolved_field: None,
            rule: None,
            argument: None,
            error: Some(issue.error.to_string()),
        }
    }
}

// ============================================================
// Resolve Types (resolve_relationship)
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResult {
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rules tried, in order
    pub rule_chain: Vec<String>,
}

// ============================================================
// Common Types
// ============================================================

/// Pagination information
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}
