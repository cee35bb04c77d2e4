//! Ambiguous-reference resolution.
//!
//! Given a relationship name, the name of its inverse and the set of
//! reference fields that could carry the link, pick exactly one field or
//! report that no rule applies.
//!
//! ## Rule chain
//!
//! ```text
//! {alias}_id → {alias}_user_id → {inverse}_id / {inverse}_user_id
//!     → role table stems → user_id → [substring] → single candidate
//! ```
//!
//! The first rule that selects a candidate wins. The resolver is pure: it
//! never looks at files and never picks arbitrarily.

mod error;
mod roles;
mod rules;

use std::collections::BTreeSet;

pub use error::ResolveError;
pub use roles::{DEFAULT_ROLES, RoleStem, RoleTable};
pub use rules::{NamingRule, ResolveQuery};

/// A successful resolution and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub field: String,
    pub rule: NamingRule,
}

/// Ordered rule chain with an injectable role table.
#[derive(Debug, Clone)]
pub struct Resolver {
    roles: RoleTable,
    chain: &'static [NamingRule],
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(RoleTable::builtin())
    }
}

impl Resolver {
    pub fn new(roles: RoleTable) -> Self {
        Self {
            roles,
            chain: NamingRule::BASELINE,
        }
    }

    /// Enable the substring rule.
    pub fn with_substring_fallback(mut self, enabled: bool) -> Self {
        self.chain = if enabled {
            NamingRule::WITH_SUBSTRING
        } else {
            NamingRule::BASELINE
        };
        self
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn chain(&self) -> &[NamingRule] {
        self.chain
    }

    /// Pick the reference field for `query`.
    pub fn resolve(&self, query: &ResolveQuery<'_>) -> Result<Resolution, ResolveError> {
        self.chain
            .iter()
            .find_map(|rule| {
                rule.select(query, &self.roles).map(|field| Resolution {
                    field,
                    rule: *rule,
                })
            })
            .ok_or_else(|| ResolveError::Unresolvable {
                alias: query.alias.to_string(),
                candidates: query.candidates.iter().cloned().collect(),
            })
    }

    /// Convenience wrapper over [`Resolver::resolve`] for owned inputs.
    pub fn resolve_names<I, S>(
        &self,
        alias: &str,
        inverse: Option<&str>,
        candidates: I,
    ) -> Result<Resolution, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates: BTreeSet<String> = candidates.into_iter().map(Into::into).collect();
        self.resolve(&ResolveQuery::new(alias, inverse, &candidates))
    }
}
