//! Resolve command - run the naming rules on one relationship name.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use super::super::{
    args::ResolveCommand,
    exit_status::ExitStatus,
    report::{FAILURE_MARK, SUCCESS_MARK},
};
use crate::{
    config::load_config,
    core::{ResolveError, Resolver},
};

pub fn resolve(cmd: ResolveCommand) -> Result<ExitStatus> {
    let root_dir = cmd
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(&root_dir)?.config;

    let resolver = Resolver::new(config.role_table())
        .with_substring_fallback(config.substring_fallback || cmd.common.substring_fallback);

    if cmd.common.verbose {
        let chain: Vec<String> = resolver.chain().iter().map(|rule| rule.to_string()).collect();
        eprintln!(
            "{} rules: {}; {} role(s)",
            "note:".bold(),
            chain.join(" > "),
            resolver.roles().len()
        );
    }

    match resolver.resolve_names(&cmd.alias, cmd.inverse.as_deref(), cmd.candidates.clone()) {
        Ok(resolution) => {
            println!(
                "{} {} -> {}  {}",
                SUCCESS_MARK.green(),
                cmd.alias,
                resolution.field.green().bold(),
                format!("({} rule)", resolution.rule).dimmed()
            );
            Ok(ExitStatus::Success)
        }
        Err(err @ ResolveError::Unresolvable { .. }) => {
            println!("{} {}", FAILURE_MARK.red(), err);
            println!(
                "  {} {} name the column with `foreign_keys=`, or map `{}` in `roles` of .ormdoctorrc.json",
                "=".blue(),
                "hint:".bold().cyan(),
                cmd.alias
            );
            Ok(ExitStatus::Failure)
        }
    }
}
