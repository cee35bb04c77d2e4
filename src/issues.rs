//! Issue types for relationship analysis results.
//!
//! Each issue is self-contained with everything needed by:
//! - Reporter: to display the issue (CLI, MCP)
//! - Action: to fix the issue (insert `foreign_keys=`)

use enum_dispatch::enum_dispatch;

use crate::core::{CandidateSet, Direction, Resolution, ResolveError, SourceContext, Span};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    AmbiguousRelationship,
    UnresolvableRelationship,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::AmbiguousRelationship => write!(f, "ambiguous-relationship"),
            Rule::UnresolvableRelationship => write!(f, "unresolvable-relationship"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Relationship with several candidate columns and no `foreign_keys=`.
/// The resolver picked one; fixing writes it into the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousRelationshipIssue {
    pub context: SourceContext,
    /// Declaring entity.
    pub entity: String,
    pub alias: String,
    pub target: String,
    pub inverse: Option<String>,
    pub candidates: CandidateSet,
    pub resolution: Resolution,
    /// Keyword argument to insert, e.g. `foreign_keys=[author_id]`.
    pub argument: String,
    /// Span of the `relationship(...)` parens in the file.
    pub call: Span,
    /// File text at `call` when the issue was detected.
    pub call_text: String,
}

impl AmbiguousRelationshipIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::AmbiguousRelationship
    }
}

/// Ambiguous relationship that no naming rule could settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvableRelationshipIssue {
    pub context: SourceContext,
    pub entity: String,
    pub alias: String,
    pub target: String,
    pub inverse: Option<String>,
    pub candidates: CandidateSet,
    pub error: ResolveError,
}

impl UnresolvableRelationshipIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::UnresolvableRelationship
    }
}

/// Model file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue enum and Report trait
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    AmbiguousRelationship(AmbiguousRelationshipIssue),
    UnresolvableRelationship(UnresolvableRelationshipIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }

    pub fn file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.file_path(),
            ReportLocation::File { path } => path,
        }
    }

    fn sort_position(&self) -> (usize, usize) {
        match self.location() {
            ReportLocation::Source(ctx) => (ctx.line(), ctx.col()),
            ReportLocation::File { .. } => (0, 0),
        }
    }
}

/// Where an issue points.
pub enum ReportLocation<'a> {
    /// Source location with the line text for context display.
    Source(&'a SourceContext),
    /// File-level only (parse errors).
    File { path: &'a str },
}

/// Uniform view of an issue for reporters.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// How to fix it, if known.
    fn hint(&self) -> Option<String> {
        None
    }

    /// Extra context shown as a `note:` line.
    fn details(&self) -> Option<String> {
        None
    }
}

fn describe_candidates(candidates: &CandidateSet) -> String {
    let fields: Vec<&str> = candidates.fields.iter().map(String::as_str).collect();
    let side = match candidates.direction {
        Direction::ManyToOne => "on",
        Direction::OneToMany => "on target",
    };
    format!(
        "candidates {} {}: {}",
        side,
        candidates.holder,
        fields.join(", ")
    )
}

impl Report for AmbiguousRelationshipIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("{}.{} -> {}", self.entity, self.alias, self.target)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<String> {
        Some(format!(
            "add `{}` (matched by {} rule)",
            self.argument, self.resolution.rule
        ))
    }

    fn details(&self) -> Option<String> {
        Some(describe_candidates(&self.candidates))
    }
}

impl Report for UnresolvableRelationshipIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        format!("{}.{} -> {}", self.entity, self.alias, self.target)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<String> {
        Some(
            "name the column with `foreign_keys=`, or map this alias in `roles` of .ormdoctorrc.json"
                .to_string(),
        )
    }

    fn details(&self) -> Option<String> {
        Some(format!("{}; {}", self.error, describe_candidates(&self.candidates)))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.file_path()
            .cmp(other.file_path())
            .then_with(|| self.sort_position().cmp(&other.sort_position()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
