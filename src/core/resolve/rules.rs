use std::{collections::BTreeSet, fmt};

use serde::Serialize;

use super::roles::RoleTable;

/// What the resolver is asked to decide.
#[derive(Debug, Clone, Copy)]
pub struct ResolveQuery<'a> {
    /// Relationship name being resolved (`referrer`).
    pub alias: &'a str,
    /// Name of the relationship on the other side (`referrals_made`).
    pub inverse: Option<&'a str>,
    /// Reference fields that could carry the link.
    pub candidates: &'a BTreeSet<String>,
}

impl<'a> ResolveQuery<'a> {
    pub fn new(alias: &'a str, inverse: Option<&'a str>, candidates: &'a BTreeSet<String>) -> Self {
        Self {
            alias,
            inverse,
            candidates,
        }
    }
}

/// One step of the naming heuristic.
///
/// Rules are evaluated in list order and the first one that selects a
/// candidate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingRule {
    /// `{alias}_id`
    AliasId,
    /// `{alias}_user_id`
    AliasUserId,
    /// `{inverse}_id`, then `{inverse}_user_id`
    InverseAlias,
    /// `{stem}_id`, then `{stem}_user_id` for roles named by alias or inverse
    RoleStem,
    /// The literal `user_id`
    UserIdLiteral,
    /// Exactly one candidate contains the alias (or inverse) as a substring.
    Substring,
    /// Only one candidate exists.
    SingleCandidate,
}

impl NamingRule {
    /// Exact-name chain.
    pub const BASELINE: &'static [NamingRule] = &[
        NamingRule::AliasId,
        NamingRule::AliasUserId,
        NamingRule::InverseAlias,
        NamingRule::RoleStem,
        NamingRule::UserIdLiteral,
        NamingRule::SingleCandidate,
    ];

    /// Exact-name chain plus substring matching before the last resort.
    pub const WITH_SUBSTRING: &'static [NamingRule] = &[
        NamingRule::AliasId,
        NamingRule::AliasUserId,
        NamingRule::InverseAlias,
        NamingRule::RoleStem,
        NamingRule::UserIdLiteral,
        NamingRule::Substring,
        NamingRule::SingleCandidate,
    ];

    /// Apply this rule. Returns the chosen candidate, if any.
    pub fn select(&self, query: &ResolveQuery<'_>, roles: &RoleTable) -> Option<String> {
        let candidates = query.candidates;
        match self {
            NamingRule::AliasId => pick(candidates, &format!("{}_id", query.alias)),
            NamingRule::AliasUserId => pick(candidates, &format!("{}_user_id", query.alias)),
            NamingRule::InverseAlias => query.inverse.and_then(|inverse| stem_fields(candidates, inverse)),
            NamingRule::RoleStem => roles
                .matching(query.alias, query.inverse)
                .find_map(|entry| stem_fields(candidates, &entry.stem)),
            NamingRule::UserIdLiteral => pick(candidates, "user_id"),
            NamingRule::Substring => unique_containing(candidates, query.alias)
                .or_else(|| query.inverse.and_then(|inverse| unique_containing(candidates, inverse))),
            NamingRule::SingleCandidate => {
                if candidates.len() == 1 {
                    candidates.iter().next().cloned()
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for NamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingRule::AliasId => write!(f, "alias-id"),
            NamingRule::AliasUserId => write!(f, "alias-user-id"),
            NamingRule::InverseAlias => write!(f, "inverse-alias"),
            NamingRule::RoleStem => write!(f, "role-stem"),
            NamingRule::UserIdLiteral => write!(f, "user-id"),
            NamingRule::Substring => write!(f, "substring"),
            NamingRule::SingleCandidate => write!(f, "single-candidate"),
        }
    }
}

fn pick(candidates: &BTreeSet<String>, name: &str) -> Option<String> {
    candidates.contains(name).then(|| name.to_string())
}

fn stem_fields(candidates: &BTreeSet<String>, stem: &str) -> Option<String> {
    pick(candidates, &format!("{}_id", stem)).or_else(|| pick(candidates, &format!("{}_user_id", stem)))
}

fn unique_containing(candidates: &BTreeSet<String>, needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let mut matches = candidates.iter().filter(|c| c.contains(needle));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only.clone()),
        _ => None,
    }
}
