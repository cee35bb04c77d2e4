//! Map command - print the foreign keys of every entity.
//!
//! The second section lists entity pairs joined by two or more columns.
//! Relationships between such pairs need `foreign_keys=` to be unambiguous.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use super::super::{args::MapCommand, exit_status::ExitStatus, report};
use crate::{
    core::CheckContext,
    rules::foreign_keys::{ForeignKeyMap, build_foreign_key_map_from},
};

pub fn map(cmd: MapCommand) -> Result<ExitStatus> {
    let ctx = CheckContext::new(&cmd.common)?;
    let fk_map = build_foreign_key_map_from(&ctx);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&fk_map)?);
    } else {
        print_map_to(&fk_map, ctx.files.len(), &mut io::stdout().lock());
    }

    let parse_error_count = ctx.parsed_files_errors().len();
    report::print_parse_warning(parse_error_count, ctx.verbose);

    if parse_error_count > 0 {
        Ok(ExitStatus::Error)
    } else {
        Ok(ExitStatus::Success)
    }
}

pub fn print_map_to<W: Write>(fk_map: &ForeignKeyMap, model_files: usize, writer: &mut W) {
    if fk_map.entities.is_empty() {
        let _ = writeln!(
            writer,
            "No foreign keys found in {} model file(s).",
            model_files
        );
        return;
    }

    for entity in &fk_map.entities {
        let _ = writeln!(
            writer,
            "{} ({})  {}",
            entity.table.bold(),
            entity.entity,
            entity.file_path.dimmed()
        );
        for fk in &entity.foreign_keys {
            let _ = writeln!(
                writer,
                "  {} {} {}({})",
                fk.field,
                "->".blue(),
                fk.referred_table,
                fk.referred_column
            );
        }
    }

    if !fk_map.multi_references.is_empty() {
        let _ = writeln!(writer);
        let _ = writeln!(
            writer,
            "{}",
            "Entity pairs with several references:".bold().yellow()
        );
        for pair in &fk_map.multi_references {
            let _ = writeln!(
                writer,
                "  {} ({}) {} {}: {}",
                pair.table,
                pair.holder,
                "->".blue(),
                pair.referred_table,
                pair.fields.join(", ")
            );
        }
    }
}
