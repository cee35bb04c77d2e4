//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report ambiguous and unresolvable relationships
//! - `fix`: Insert `foreign_keys=` into ambiguous relationships
//! - `map`: Print the foreign-key map of the model layer
//! - `resolve`: Run the resolver on a single alias
//! - `init`: Initialize ormdoctor configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Fix(cmd)) => cmd.common.verbose,
            Some(Command::Map(cmd)) => cmd.common.verbose,
            Some(Command::Resolve(cmd)) => cmd.common.verbose,
            Some(Command::Init) | Some(Command::Serve) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root to scan (overrides the current directory)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable the substring naming rule (overrides config file)
    #[arg(long)]
    pub substring_fallback: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct FixCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually rewrite model files (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct MapCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print the map as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Relationship name, e.g. `author`
    pub alias: String,

    /// Candidate reference fields, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub candidates: Vec<String>,

    /// Name of the inverse relationship
    #[arg(long)]
    pub inverse: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check for ambiguous and unresolvable relationships
    Check(CheckCommand),
    /// Insert foreign_keys= into ambiguous relationships
    Fix(FixCommand),
    /// Print foreign keys per entity and entity pairs with several references
    Map(MapCommand),
    /// Pick the reference field for one relationship name
    Resolve(ResolveCommand),
    /// Initialize a new .ormdoctorrc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
