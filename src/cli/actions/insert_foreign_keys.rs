//! InsertForeignKeys action.
//!
//! Adds the resolved `foreign_keys=` argument to ambiguous `relationship(...)`
//! calls. Used by the `ormdoctor fix` command.

use anyhow::Result;

use super::{
    operation::Operation,
    traits::{Action, ActionStats, execute_operations},
};
use crate::{core::parsers::call::scan_call, issues::AmbiguousRelationshipIssue};

/// Action to insert `foreign_keys=` into relationship calls.
pub struct InsertForeignKeys;

impl InsertForeignKeys {
    /// Rewrite `call_text` (a `(...)` argument list) with `argument` added
    /// as the last argument.
    ///
    /// A call whose `)` sits on its own line gets a new argument line,
    /// indented like the last argument, and a trailing comma is added where
    /// missing. Otherwise the argument is appended inline as `, argument`.
    /// Returns `None` when `call_text` is not a single complete call.
    pub fn insert_argument(call_text: &str, argument: &str) -> Option<String> {
        let extent = scan_call(call_text, 0)?;
        if extent.close + 1 != call_text.len() {
            return None;
        }

        let Some(last) = extent.last_significant else {
            return Some(format!("({}{}", argument, &call_text[1..]));
        };
        let after_last = last + 1;
        if !call_text.is_char_boundary(after_last) {
            return None;
        }
        let has_trailing_comma = call_text.as_bytes()[last] == b',';

        let close_line_start = call_text[..extent.close].rfind('\n').map(|idx| idx + 1);
        let close_on_own_line = close_line_start
            .is_some_and(|start| call_text[start..extent.close].trim().is_empty());

        if !close_on_own_line {
            let separator = if has_trailing_comma { " " } else { ", " };
            return Some(format!(
                "{}{}{}{}",
                &call_text[..after_last],
                separator,
                argument,
                &call_text[after_last..]
            ));
        }

        let newline = if call_text.contains("\r\n") { "\r\n" } else { "\n" };
        let mut line_end = call_text[after_last..]
            .find('\n')
            .map_or(extent.close, |idx| after_last + idx);
        if call_text[..line_end].ends_with('\r') {
            line_end -= 1;
        }
        let indent = argument_indent(call_text, extent.args.last()?.start, close_line_start?);

        let mut out = String::with_capacity(call_text.len() + argument.len() + indent.len() + 4);
        out.push_str(&call_text[..after_last]);
        if !has_trailing_comma {
            out.push(',');
        }
        out.push_str(&call_text[after_last..line_end]);
        out.push_str(newline);
        out.push_str(&indent);
        out.push_str(argument);
        out.push(',');
        out.push_str(&call_text[line_end..]);
        Some(out)
    }
}

/// Indentation of the line where the last argument starts, or the closing
/// line's indentation plus four spaces when that argument shares the line
/// of the opening paren.
fn argument_indent(call_text: &str, arg_start: usize, close_line_start: usize) -> String {
    let mut pos = arg_start;
    let bytes = call_text.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' | b'\r' | b'\n' => pos += 1,
            b'#' => {
                pos += call_text[pos..].find('\n').unwrap_or(call_text.len() - pos);
            }
            _ => break,
        }
    }

    match call_text[..pos].rfind('\n') {
        Some(newline) => leading_whitespace(&call_text[newline + 1..]).to_string(),
        None => format!("{}    ", leading_whitespace(&call_text[close_line_start..])),
    }
}

fn leading_whitespace(text: &str) -> &str {
    let trimmed = text.trim_start_matches([' ', '\t']);
    &text[..text.len() - trimmed.len()]
}

impl Action<AmbiguousRelationshipIssue> for InsertForeignKeys {
    fn to_operations(issues: &[AmbiguousRelationshipIssue]) -> Vec<Operation> {
        issues
            .iter()
            .filter_map(|issue| {
                let Some(replacement) = Self::insert_argument(&issue.call_text, &issue.argument)
                else {
                    log::debug!(
                        "{}:{}: cannot rewrite `{}.{}`",
                        issue.context.file_path(),
                        issue.context.line(),
                        issue.entity,
                        issue.alias
                    );
                    return None;
                };
                Some(Operation::ReplaceSpan {
                    context: issue.context.clone(),
                    span: issue.call,
                    original: issue.call_text.clone(),
                    replacement,
                })
            })
            .collect()
    }

    /// Counts issues that produced no edit as skipped.
    fn run(issues: &[AmbiguousRelationshipIssue]) -> Result<ActionStats> {
        let ops = Self::to_operations(issues);
        let mut stats = execute_operations(&ops)?;
        stats.processed = issues.len();
        stats.skipped += issues.len() - ops.len();
        Ok(stats)
    }
}
