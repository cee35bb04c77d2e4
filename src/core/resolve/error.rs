use thiserror::Error;

/// Failure of the resolver to pick a reference field.
///
/// There is exactly one kind: no naming rule matched. The full candidate list
/// is carried so the operator can fix the declaration by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no naming rule matched `{alias}` (candidates: {})", .candidates.join(", "))]
    Unresolvable {
        alias: String,
        candidates: Vec<String>,
    },
}

impl ResolveError {
    pub fn alias(&self) -> &str {
        match self {
            ResolveError::Unresolvable { alias, .. } => alias,
        }
    }

    pub fn candidates(&self) -> &[String] {
        match self {
            ResolveError::Unresolvable { candidates, .. } => candidates,
        }
    }
}
