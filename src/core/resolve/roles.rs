//! Role vocabulary used by the role-stem naming rule.
//!
//! A role is a common relationship name (`author`, `host`, ...) and its stem
//! is the prefix the matching column is expected to carry (`author_id`,
//! `host_user_id`). The table is ordered: when both the alias and its inverse
//! name a role, the entry declared first is tried first.

use serde::{Deserialize, Serialize};

/// Built-in role table, in lookup order.
pub const DEFAULT_ROLES: &[(&str, &str)] = &[
    ("author", "author"),
    ("approver", "approver"),
    ("assignee", "assignee"),
    ("sender", "sender"),
    ("recipient", "recipient"),
    ("referrer", "referrer"),
    ("referred_user", "referred_user"),
    ("host", "host"),
    ("cohost", "cohost"),
    ("moderator", "moderator"),
    ("target", "target_user"),
    ("created_by", "created_by"),
    ("invited_by", "invited_by"),
    ("viewer", "viewer"),
    ("owner", "owner"),
    ("reviewer", "reviewer"),
];

/// A single `role -> stem` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStem {
    pub role: String,
    pub stem: String,
}

impl RoleStem {
    pub fn new(role: impl Into<String>, stem: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            stem: stem.into(),
        }
    }
}

/// Ordered role table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleTable {
    entries: Vec<RoleStem>,
}

impl RoleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self {
            entries: DEFAULT_ROLES
                .iter()
                .map(|(role, stem)| RoleStem::new(*role, *stem))
                .collect(),
        }
    }

    /// Build a table from user entries layered over the optional built-ins.
    ///
    /// User entries come first. A user entry replaces a built-in entry with
    /// the same role.
    pub fn layered(custom: &[RoleStem], include_builtin: bool) -> Self {
        let mut table = Self::empty();
        for entry in custom {
            table.push(entry.clone());
        }
        if include_builtin {
            for (role, stem) in DEFAULT_ROLES {
                table.push(RoleStem::new(*role, *stem));
            }
        }
        table
    }

    /// Append an entry unless its role is already present.
    pub fn push(&mut self, entry: RoleStem) {
        if !self.entries.iter().any(|e| e.role == entry.role) {
            self.entries.push(entry);
        }
    }

    /// Entries whose role equals `alias` or `inverse`, in table order.
    pub fn matching<'a>(
        &'a self,
        alias: &'a str,
        inverse: Option<&'a str>,
    ) -> impl Iterator<Item = &'a RoleStem> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.role == alias || inverse.is_some_and(|inv| e.role == inv))
    }

    pub fn entries(&self) -> &[RoleStem] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
