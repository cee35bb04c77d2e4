//! Fix command - insert `foreign_keys=` into ambiguous relationships.
//!
//! Every ambiguous relationship the resolver settled gets the chosen column
//! written into its `relationship(...)` call. Relationships no naming rule
//! matched are listed together and left untouched.
//!
//! Use `--apply` to actually rewrite files (default is dry-run mode).

use std::collections::HashSet;

use anyhow::Result;
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::super::{
    actions::{Action, InsertForeignKeys},
    args::FixCommand,
    exit_status::ExitStatus,
    report::{self, FAILURE_MARK},
};
use crate::{
    core::CheckContext,
    issues::{Report, Rule, UnresolvableRelationshipIssue},
    rules::relationships::check_relationship_issues,
};

pub fn fix(cmd: FixCommand) -> Result<ExitStatus> {
    let ctx = CheckContext::new(&cmd.common)?;
    let apply = cmd.apply;

    let issues = check_relationship_issues(&ctx);
    let ambiguous = &issues.ambiguous;

    if issues.is_empty() {
        report::print_success(ctx.files.len());
    } else {
        if !issues.unresolvable.is_empty() {
            print_unresolvable(&issues.unresolvable);
        }

        if !ambiguous.is_empty() {
            let files: HashSet<&str> = ambiguous
                .iter()
                .map(|issue| issue.context.file_path())
                .collect();

            if apply {
                let stats = InsertForeignKeys::run(ambiguous)?;
                println!(
                    "{} {} argument(s) in {} file(s) (processed {} relationship(s)).",
                    "Inserted".green().bold(),
                    stats.changes_applied,
                    stats.files_modified,
                    stats.processed
                );
                if stats.skipped > 0 {
                    println!(
                        "  - skipped: {} relationship(s) changed since analysis",
                        stats.skipped
                    );
                }
            } else {
                InsertForeignKeys::preview(ambiguous);
                println!(
                    "{} {} argument(s) in {} file(s).",
                    "Would insert".yellow().bold(),
                    ambiguous.len(),
                    files.len()
                );
                println!("Run with {} to rewrite these relationships.", "--apply".cyan());
            }
        }
    }

    let parse_error_count = ctx.parsed_files_errors().len();
    report::print_parse_warning(parse_error_count, ctx.verbose);

    // A dry run that finds work exits 1 so CI can gate on it.
    if parse_error_count > 0 {
        Ok(ExitStatus::Error)
    } else if !issues.unresolvable.is_empty() || (!ambiguous.is_empty() && !apply) {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

fn print_unresolvable(issues: &[UnresolvableRelationshipIssue]) {
    println!(
        "{} Cannot fix {} relationship(s) (no naming rule matched):",
        FAILURE_MARK.red(),
        issues.len()
    );
    println!();

    for issue in issues {
        let ctx = &issue.context;
        let line = ctx.line();
        let col = ctx.col();
        let source_line = &ctx.source_line;

        println!(
            "  {} {}:{}:{}  {}",
            "-->".blue(),
            ctx.file_path(),
            line,
            col,
            format!("[{}]", Rule::UnresolvableRelationship).dimmed().cyan()
        );
        println!("     {}", "|".blue());
        println!(
            " {:>3} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line
        );

        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let caret_padding = UnicodeWidthStr::width(prefix.as_str());
        println!(
            "     {} {:>padding$}{}",
            "|".blue(),
            "",
            "^".red(),
            padding = caret_padding
        );
        if let Some(details) = issue.details() {
            println!("   {} note: {}", "=".blue(), details);
        }
        println!();
    }
}
