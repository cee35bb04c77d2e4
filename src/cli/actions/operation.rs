//! Low-level text edits.

use std::{
    fs,
    io::{self, Write},
};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::{SourceContext, Span};

/// A single file edit produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Replace the bytes at `span` with `replacement`, provided they still
    /// read `original`.
    ReplaceSpan {
        context: SourceContext,
        span: Span,
        original: String,
        replacement: String,
    },
}

/// Result of applying the operations of one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOutcome {
    pub applied: usize,
    /// Operations whose original text was no longer present.
    pub stale: usize,
}

/// One line of a preview diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context { line: usize, text: String },
    Removed { line: usize, text: String },
    Added { text: String },
}

impl Operation {
    pub fn context(&self) -> &SourceContext {
        match self {
            Operation::ReplaceSpan { context, .. } => context,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Operation::ReplaceSpan { span, .. } => *span,
        }
    }

    /// Apply to in-memory text. Returns `false` when the text at the span
    /// no longer matches.
    pub fn apply_to(&self, content: &mut String) -> bool {
        match self {
            Operation::ReplaceSpan {
                span,
                original,
                replacement,
                ..
            } => {
                if content.get(span.start..span.end) != Some(original.as_str()) {
                    return false;
                }
                content.replace_range(span.start..span.end, replacement);
                true
            }
        }
    }

    /// Apply every operation of one file, last span first so earlier
    /// offsets stay valid. Writes the file only if something changed.
    pub fn apply_file(file_path: &str, ops: &[&Operation]) -> Result<FileOutcome> {
        let mut content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {}", file_path))?;

        let mut ordered: Vec<&Operation> = ops.to_vec();
        ordered.sort_by_key(|op| std::cmp::Reverse(op.span().start));

        let mut outcome = FileOutcome::default();
        for op in ordered {
            if op.apply_to(&mut content) {
                outcome.applied += 1;
            } else {
                outcome.stale += 1;
                log::warn!(
                    "{}:{}: source changed since it was analyzed, skipping edit",
                    file_path,
                    op.context().line()
                );
            }
        }

        if outcome.applied > 0 {
            fs::write(file_path, &content)
                .with_context(|| format!("Failed to write file: {}", file_path))?;
        }

        Ok(outcome)
    }

    /// Line diff between the declaration before and after the edit.
    pub fn diff(&self) -> Vec<DiffLine> {
        match self {
            Operation::ReplaceSpan {
                context,
                original,
                replacement,
                ..
            } => {
                let source_line = context.source_line.as_str();

                let (before, after) = if original.contains('\n') {
                    // The call's first line is the tail of the declaration line.
                    let first = original.lines().next().unwrap_or_default();
                    let prefix = source_line
                        .strip_suffix(first.trim_end_matches('\r'))
                        .unwrap_or_default();
                    (
                        format!("{}{}", prefix, original),
                        format!("{}{}", prefix, replacement),
                    )
                } else {
                    (
                        source_line.to_string(),
                        source_line.replacen(original.as_str(), replacement, 1),
                    )
                };
                line_diff(&before, &after, context.line())
            }
        }
    }

    pub fn preview(&self) {
        self.preview_to(&mut io::stdout().lock());
    }

    pub fn preview_to<W: Write>(&self, writer: &mut W) {
        let ctx = self.context();
        let diff = self.diff();
        let width = diff
            .iter()
            .filter_map(|line| match line {
                DiffLine::Context { line, .. } | DiffLine::Removed { line, .. } => Some(*line),
                DiffLine::Added { .. } => None,
            })
            .max()
            .unwrap_or(ctx.line())
            .to_string()
            .len();

        let _ = writeln!(
            writer,
            "  {} {}:{}:{}",
            "-->".blue(),
            ctx.file_path(),
            ctx.line(),
            ctx.col()
        );
        let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = width);
        for line in diff {
            let _ = match line {
                DiffLine::Context { line, text } => writeln!(
                    writer,
                    "{:>width$} {}   {}",
                    line.to_string().blue(),
                    "|".blue(),
                    text,
                    width = width
                ),
                DiffLine::Removed { line, text } => writeln!(
                    writer,
                    "{:>width$} {} {} {}",
                    line.to_string().blue(),
                    "|".blue(),
                    "-".red(),
                    text.red(),
                    width = width
                ),
                DiffLine::Added { text } => writeln!(
                    writer,
                    "{:>width$} {} {} {}",
                    "",
                    "|".blue(),
                    "+".green(),
                    text.green(),
                    width = width
                ),
            };
        }
        let _ = writeln!(writer);
    }
}

/// Diff of two snippets that differ in one contiguous block of lines.
fn line_diff(before: &str, after: &str, first_line: usize) -> Vec<DiffLine> {
    let old: Vec<&str> = before.lines().map(|l| l.trim_end_matches('\r')).collect();
    let new: Vec<&str> = after.lines().map(|l| l.trim_end_matches('\r')).collect();

    let head = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let tail = old[head..]
        .iter()
        .rev()
        .zip(new[head..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut diff = Vec::new();
    for (idx, text) in old[..head].iter().enumerate() {
        diff.push(DiffLine::Context {
            line: first_line + idx,
            text: text.to_string(),
        });
    }
    for (idx, text) in old[head..old.len() - tail].iter().enumerate() {
        diff.push(DiffLine::Removed {
            line: first_line + head + idx,
            text: text.to_string(),
        });
    }
    for text in &new[head..new.len() - tail] {
        diff.push(DiffLine::Added {
            text: text.to_string(),
        });
    }
    for (idx, text) in old[old.len() - tail..].iter().enumerate() {
        diff.push(DiffLine::Context {
            line: first_line + old.len() - tail + idx,
            text: text.to_string(),
        });
    }
    diff
}
