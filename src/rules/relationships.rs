//! Ambiguous and unresolvable relationship detection.
//!
//! A relationship is checked when it names no column explicitly, does not
//! join through an association table, and two or more reference fields link
//! its two entities. Each such relationship is passed to the resolver; the
//! outcome becomes either an [`AmbiguousRelationshipIssue`] carrying the
//! fix, or an [`UnresolvableRelationshipIssue`].

use crate::{
    core::{
        CandidateSet, CheckContext, Direction, Entity, RelationshipAlias, ResolveQuery, Resolver,
        Schema,
    },
    issues::{AmbiguousRelationshipIssue, Issue, UnresolvableRelationshipIssue},
};

/// Outcome of checking every relationship in a schema.
#[derive(Debug, Default)]
pub struct RelationshipIssues {
    pub ambiguous: Vec<AmbiguousRelationshipIssue>,
    pub unresolvable: Vec<UnresolvableRelationshipIssue>,
}

impl RelationshipIssues {
    pub fn is_empty(&self) -> bool {
        self.ambiguous.is_empty() && self.unresolvable.is_empty()
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.ambiguous
            .into_iter()
            .map(Issue::AmbiguousRelationship)
            .chain(
                self.unresolvable
                    .into_iter()
                    .map(Issue::UnresolvableRelationship),
            )
            .collect()
    }
}

pub fn check_relationship_issues(ctx: &CheckContext) -> RelationshipIssues {
    check_relationships(ctx.schema(), &ctx.resolver())
}

/// Check every relationship of every entity, collecting all outcomes.
pub fn check_relationships(schema: &Schema, resolver: &Resolver) -> RelationshipIssues {
    let mut issues = RelationshipIssues::default();

    for entity in schema.entities() {
        for rel in &entity.relationships {
            if rel.is_explicit() || rel.secondary {
                continue;
            }
            let Some(candidates) = schema.candidates(entity, rel) else {
                log::debug!(
                    "{}.{}: no reference field links {} and {}",
                    entity.name,
                    rel.name,
                    entity.name,
                    rel.target
                );
                continue;
            };
            if !candidates.is_ambiguous() {
                continue;
            }

            let inverse = schema.inverse_of(entity, rel);
            let query = ResolveQuery::new(&rel.name, inverse.as_deref(), &candidates.fields);

            match resolver.resolve(&query) {
                Ok(resolution) => {
                    let argument =
                        foreign_keys_argument(entity, rel, &candidates, &resolution.field);
                    issues.ambiguous.push(AmbiguousRelationshipIssue {
                        context: rel.context.clone(),
                        entity: entity.name.clone(),
                        alias: rel.name.clone(),
                        target: rel.target.clone(),
                        inverse,
                        candidates,
                        resolution,
                        argument,
                        call: rel.call,
                        call_text: rel.call_text.clone(),
                    });
                }
                Err(error) => {
                    issues
                        .unresolvable
                        .push(UnresolvableRelationshipIssue {
                            context: rel.context.clone(),
                            entity: entity.name.clone(),
                            alias: rel.name.clone(),
                            target: rel.target.clone(),
                            inverse,
                            candidates,
                            error,
                        });
                }
            }
        }
    }

    issues
}

/// Keyword argument naming `field` on the relationship.
///
/// A column of the declaring class that appears above the relationship can
/// be referenced directly; anything else uses the lazily evaluated
/// `"Entity.column"` string.
pub fn foreign_keys_argument(
    declaring: &Entity,
    rel: &RelationshipAlias,
    candidates: &CandidateSet,
    field: &str,
) -> String {
    let declared_above = candidates.direction == Direction::ManyToOne
        && declaring
            .field(field)
            .is_some_and(|column| column.offset < rel.offset);

    if declared_above {
        format!("foreign_keys=[{}]", field)
    } else {
        format!("foreign_keys=\"{}.{}\"", candidates.holder, field)
    }
}
