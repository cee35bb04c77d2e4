use anyhow::Result;

use super::super::{args::CheckCommand, exit_status::ExitStatus, report};
use crate::{core::CheckContext, issues::Issue, rules::relationships::check_relationship_issues};

pub fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let ctx = CheckContext::new(&cmd.common)?;

    let mut issues: Vec<Issue> = check_relationship_issues(&ctx).into_issues();
    let relationship_count = issues.len();

    let parse_errors = ctx.parsed_files_errors();
    issues.extend(parse_errors.iter().cloned().map(Issue::ParseError));

    if issues.is_empty() {
        report::print_success(ctx.files.len());
    } else {
        report::report(&issues);
    }
    report::print_parse_warning(parse_errors.len(), ctx.verbose);

    if !parse_errors.is_empty() {
        Ok(ExitStatus::Error)
    } else if relationship_count > 0 {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}
