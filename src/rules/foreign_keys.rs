//! Foreign-key map and multi-reference suggestions.

use serde::Serialize;

use crate::core::{CheckContext, ReferenceTarget, Schema};

/// One reference column of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyEntry {
    pub field: String,
    /// Referenced table; for `ForeignKey(Class.col)` the class's table when
    /// it was scanned, otherwise the class name.
    pub referred_table: String,
    pub referred_column: String,
    pub line: usize,
}

/// Reference columns declared by one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityForeignKeys {
    pub entity: String,
    pub table: String,
    pub file_path: String,
    pub foreign_keys: Vec<ForeignKeyEntry>,
}

/// Entity pair linked by two or more columns. Relationships between them
/// need `foreign_keys=` to be unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiReference {
    pub holder: String,
    pub table: String,
    pub referred_table: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyMap {
    /// Entities with at least one reference column, sorted by table.
    pub entities: Vec<EntityForeignKeys>,
    pub multi_references: Vec<MultiReference>,
}

pub fn build_foreign_key_map_from(ctx: &CheckContext) -> ForeignKeyMap {
    build_foreign_key_map(ctx.schema())
}

pub fn build_foreign_key_map(schema: &Schema) -> ForeignKeyMap {
    let mut entities: Vec<EntityForeignKeys> = schema
        .entities()
        .iter()
        .filter(|entity| !entity.reference_fields.is_empty())
        .map(|entity| EntityForeignKeys {
            entity: entity.name.clone(),
            table: entity.table.clone(),
            file_path: entity.file_path.clone(),
            foreign_keys: entity
                .reference_fields
                .iter()
                .map(|field| ForeignKeyEntry {
                    field: field.name.clone(),
                    referred_table: match &field.target {
                        ReferenceTarget::Table(table) => table.clone(),
                        ReferenceTarget::Entity(name) => schema
                            .entity(name)
                            .map(|e| e.table.clone())
                            .unwrap_or_else(|| name.clone()),
                    },
                    referred_column: field.target_column.clone(),
                    line: field.context.line(),
                })
                .collect(),
        })
        .collect();
    entities.sort_by(|a, b| a.table.cmp(&b.table).then_with(|| a.entity.cmp(&b.entity)));

    let mut multi_references: Vec<MultiReference> = schema
        .multi_reference_pairs()
        .into_iter()
        .map(|(holder, target, fields)| MultiReference {
            holder: holder.name.clone(),
            table: holder.table.clone(),
            referred_table: target.table.clone(),
            fields: fields.into_iter().collect(),
        })
        .collect();
    multi_references.sort_by(|a, b| {
        a.table
            .cmp(&b.table)
            .then_with(|| a.referred_table.cmp(&b.referred_table))
    });

    ForeignKeyMap {
        entities,
        multi_references,
    }
}
