//! SQLAlchemy declarative model extraction.
//!
//! Recognises, inside `class Name(...):` bodies at class-body indentation:
//!
//! ```text
//! __tablename__ = "users"
//! author_id: Mapped[int] = mapped_column(ForeignKey("users.id"))
//! author_id = Column(Integer, ForeignKey(User.id))
//! author: Mapped["User"] = relationship("User", back_populates="posts")
//! ```
//!
//! Only classes with a `__tablename__` become entities.

use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;

use super::call::{CallExtent, scan_call, string_literal};
use crate::core::{
    Direction, Entity, ExplicitReference, ReferenceField, ReferenceTarget, RelationshipAlias,
    SourceContext, SourceLocation, Span,
};
use crate::utils::LineIndex;

static CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+([A-Za-z_]\w*)\s*(?:\([^)]*\))?\s*:").unwrap());

static TABLENAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s+__tablename__\s*(?::[^=]+)?=\s*["']([\w.]+)["']"#).unwrap()
});

static ASSIGN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\s+)([A-Za-z_]\w*)\s*(?::\s*([^=]+?))?\s*=\s*(?:(?:sa|db|orm)\.)?(mapped_column|Column|relationship)\s*\(",
    )
    .unwrap()
});

static FK_STRING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ForeignKey\(\s*["']([\w.]+)["']"#).unwrap());

static FK_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ForeignKey\(\s*([A-Za-z_]\w*)\.([A-Za-z_]\w*)\s*[,)]").unwrap()
});

static IDENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][\w.]*$").unwrap());

/// Annotation wrappers peeled off `Mapped[...]` to find the target class.
const ANNOTATION_WRAPPERS: &[&str] = &[
    "Mapped[",
    "Optional[",
    "List[",
    "list[",
    "Set[",
    "set[",
    "Sequence[",
    "WriteOnlyMapped[",
    "DynamicMapped[",
];

/// Wrappers that make a relationship a collection.
const COLLECTION_WRAPPERS: &[&str] = &[
    "List[",
    "list[",
    "Set[",
    "set[",
    "Sequence[",
    "WriteOnlyMapped[",
    "DynamicMapped[",
];

/// Entities extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModule {
    pub file_path: String,
    pub entities: Vec<Entity>,
}

/// Parse a Python model file.
///
/// Fails when a `mapped_column`/`Column`/`relationship` call is never
/// closed, since nothing after it can be located reliably.
pub fn parse_python_source(code: &str, file_path: &str) -> Result<ParsedModule> {
    let index = LineIndex::new(code);
    let lines: Vec<(usize, &str)> = line_offsets(code);
    let mut entities = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let (_, line) = lines[i];
        let Some(caps) = CLASS_REGEX.captures(line) else {
            i += 1;
            continue;
        };
        let class_name = caps[1].to_string();
        let class_line = i + 1;

        // Class body: following lines that are blank, indented, or comments.
        let body_start = i + 1;
        let mut body_end = body_start;
        while body_end < lines.len() {
            let text = lines[body_end].1;
            let trimmed = text.trim();
            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || text.starts_with(' ')
                || text.starts_with('\t')
            {
                body_end += 1;
            } else {
                break;
            }
        }

        let entity = parse_class_body(
            code,
            &index,
            &lines[body_start..body_end],
            &class_name,
            class_line,
            file_path,
        )?;
        if let Some(entity) = entity {
            log::debug!(
                "{}: entity `{}` ({} reference fields, {} relationships)",
                file_path,
                entity.name,
                entity.reference_fields.len(),
                entity.relationships.len()
            );
            entities.push(entity);
        }
        i = body_end;
    }

    Ok(ParsedModule {
        file_path: file_path.to_string(),
        entities,
    })
}

fn parse_class_body(
    code: &str,
    index: &LineIndex<'_>,
    body: &[(usize, &str)],
    class_name: &str,
    class_line: usize,
    file_path: &str,
) -> Result<Option<Entity>> {
    let body_indent = body
        .iter()
        .map(|(_, line)| *line)
        .find(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(leading_whitespace);
    let Some(body_indent) = body_indent else {
        return Ok(None);
    };

    let mut table = None;
    let mut reference_fields = Vec::new();
    let mut relationships = Vec::new();
    let mut skip_until = 0usize;

    for &(line_start, line) in body {
        if line_start < skip_until {
            continue;
        }
        if leading_whitespace(line) != body_indent {
            continue;
        }

        if let Some(caps) = TABLENAME_REGEX.captures(line) {
            table = Some(caps[1].to_string());
            continue;
        }

        let Some(caps) = ASSIGN_REGEX.captures(line) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let name = caps[2].to_string();
        let annotation = caps.get(3).map(|m| m.as_str().trim());
        let callee = &caps[4];
        let offset = line_start + caps[1].len();
        let open = line_start + whole.end() - 1;

        let extent = scan_call(code, open).ok_or_else(|| {
            anyhow!(
                "unterminated `{}(` call for `{}.{}` at line {}",
                callee,
                class_name,
                name,
                index.line_of(open)
            )
        })?;
        skip_until = extent.close + 1;

        let (line_no, col) = index.line_col(offset);
        let context = SourceContext::new(
            SourceLocation::new(file_path, line_no, col),
            index.line_text(line_no),
        );

        if callee == "relationship" {
            let call_text = &code[extent.open..=extent.close];
            if let Some(rel) =
                relationship_from_call(&name, annotation, &extent, call_text, context, offset)
            {
                relationships.push(rel);
            }
        } else if let Some(field) = reference_from_call(&name, code, &extent, context, offset) {
            reference_fields.push(field);
        }
    }

    Ok(table.map(|table| Entity {
        name: class_name.to_string(),
        table,
        file_path: file_path.to_string(),
        line: class_line,
        reference_fields,
        relationships,
    }))
}

fn reference_from_call(
    name: &str,
    code: &str,
    extent: &CallExtent,
    context: SourceContext,
    offset: usize,
) -> Option<ReferenceField> {
    let call_text = &code[extent.open..=extent.close];

    let (target, target_column) = if let Some(caps) = FK_STRING_REGEX.captures(call_text) {
        // "schema.table.column" or "table.column"
        let mut parts = caps[1].rsplit('.');
        let column = parts.next()?.to_string();
        let table = parts.next()?.to_string();
        (ReferenceTarget::Table(table), column)
    } else if let Some(caps) = FK_ATTR_REGEX.captures(call_text) {
        (ReferenceTarget::Entity(caps[1].to_string()), caps[2].to_string())
    } else {
        return None;
    };

    Some(ReferenceField {
        name: name.to_string(),
        target,
        target_column,
        context,
        offset,
    })
}

fn relationship_from_call(
    name: &str,
    annotation: Option<&str>,
    extent: &CallExtent,
    call_text: &str,
    context: SourceContext,
    offset: usize,
) -> Option<RelationshipAlias> {
    let target = extent
        .positional()
        .next()
        .and_then(|arg| target_from_argument(&arg.text))
        .or_else(|| annotation.and_then(target_from_annotation))?;

    let inverse = extent
        .keyword("back_populates")
        .and_then(string_literal)
        .or_else(|| extent.keyword("backref").and_then(backref_name))
        .map(String::from);

    let explicit = extent
        .keyword("foreign_keys")
        .map(|v| ExplicitReference::ForeignKeys(v.to_string()))
        .or_else(|| {
            extent
                .keyword("primaryjoin")
                .map(|v| ExplicitReference::PrimaryJoin(v.to_string()))
        });

    Some(RelationshipAlias {
        name: name.to_string(),
        target,
        inverse,
        explicit,
        secondary: extent.keyword("secondary").is_some(),
        direction: relationship_direction(annotation, extent),
        context,
        offset,
        call: Span::new(extent.open, extent.close + 1),
        call_text: call_text.to_string(),
    })
}

/// `"User"`, `"backend.models.user.User"` or a bare `User` identifier.
fn target_from_argument(arg: &str) -> Option<String> {
    let raw = string_literal(arg).unwrap_or(arg);
    if !IDENT_REGEX.is_match(raw) {
        return None;
    }
    raw.rsplit('.').next().map(String::from)
}

/// Strip quotes and wrappers, returning the wrappers removed and the rest.
fn peel_annotation(annotation: &str) -> (Vec<&'static str>, String) {
    let mut rest: String = annotation.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let mut peeled = Vec::new();
    loop {
        let trimmed = rest.trim_start();
        let Some(wrapper) = ANNOTATION_WRAPPERS.iter().find(|w| trimmed.starts_with(**w)) else {
            break;
        };
        peeled.push(*wrapper);
        rest = trimmed[wrapper.len()..].to_string();
    }
    (peeled, rest)
}

/// `Mapped["User"]`, `Mapped[List["User"]]`, `Mapped[Optional["User"]]`.
fn target_from_annotation(annotation: &str) -> Option<String> {
    let (_, rest) = peel_annotation(annotation);
    let ident: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
        .collect();
    if ident.is_empty() {
        return None;
    }
    ident.rsplit('.').next().map(String::from)
}

/// `uselist=` wins, then the `Mapped[...]` annotation, then a dynamic or
/// write-only `lazy=` loader, which only collections support.
fn relationship_direction(annotation: Option<&str>, extent: &CallExtent) -> Option<Direction> {
    match extent.keyword("uselist") {
        Some("True") => return Some(Direction::OneToMany),
        Some("False") => return Some(Direction::ManyToOne),
        _ => {}
    }

    if let Some(annotation) = annotation {
        let (peeled, _) = peel_annotation(annotation);
        if peeled.iter().any(|w| COLLECTION_WRAPPERS.contains(w)) {
            return Some(Direction::OneToMany);
        }
        if peeled.first() == Some(&"Mapped[") {
            return Some(Direction::ManyToOne);
        }
    }

    match extent.keyword("lazy").and_then(string_literal) {
        Some("dynamic" | "write_only") => Some(Direction::OneToMany),
        _ => None,
    }
}

/// `backref="posts"` or `backref=backref("posts", lazy="dynamic")`.
fn backref_name(value: &str) -> Option<&str> {
    if let Some(name) = string_literal(value) {
        return Some(name);
    }
    let inner = value.strip_prefix("backref(")?;
    let first = inner.split(',').next()?.trim().trim_end_matches(')');
    string_literal(first)
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn line_offsets(code: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    code.split('\n')
        .map(|line| {
            let start = offset;
            offset += line.len() + 1;
            (start, line.trim_end_matches('\r'))
        })
        .collect()
}
