use std::{
    cell::OnceCell,
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        data::Schema,
        file_scanner::scan_files,
        parsers::python::{ParsedModule, parse_python_source},
        resolve::Resolver,
    },
    issues::ParseErrorIssue,
};

/// Analysis context shared by every command.
///
/// Configuration is merged once at construction (CLI flags > config file >
/// defaults) and files are scanned eagerly. Parsing and the schema are built
/// lazily on first access.
pub struct CheckContext {
    /// Merged configuration.
    pub config: Config,

    /// Project root the scan started from.
    pub root_dir: PathBuf,

    /// All model files to analyze.
    pub files: HashSet<String>,

    /// Print diagnostic messages to stderr.
    pub verbose: bool,

    parsed_files: OnceCell<HashMap<String, ParsedModule>>,

    /// Populated alongside `parsed_files`.
    parsed_files_errors: OnceCell<Vec<ParseErrorIssue>>,

    schema: OnceCell<Schema>,
}

impl CheckContext {
    /// Load configuration from `--source-root` (or the current directory),
    /// apply CLI overrides and scan model files.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = root_dir
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let config_result = load_config(Path::new(path))?;
        if verbose && !config_result.from_file {
            eprintln!(
                "{} No {} found, using default configuration",
                "note:".bold(),
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if common_args.substring_fallback {
            config.substring_fallback = true;
        }

        Ok(Self::with_config(config, root_dir, verbose))
    }

    /// Build a context from an already merged configuration.
    pub fn with_config(config: Config, root_dir: PathBuf, verbose: bool) -> Self {
        let scan_result = scan_files(
            &root_dir.to_string_lossy(),
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            verbose,
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose,
            parsed_files: OnceCell::new(),
            parsed_files_errors: OnceCell::new(),
            schema: OnceCell::new(),
        }
    }

    /// Parsed modules by file path (lazy).
    ///
    /// Files are read and parsed in parallel; failures are collected into
    /// `parsed_files_errors()` instead of aborting.
    pub fn parsed_files(&self) -> &HashMap<String, ParsedModule> {
        self.parsed_files.get_or_init(|| {
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let result = std::fs::read_to_string(file_path)
                        .with_context(|| format!("Failed to read file: {}", file_path))
                        .and_then(|code| parse_python_source(&code, file_path));
                    (file_path.clone(), result)
                })
                .collect();

            let mut parsed = HashMap::new();
            let mut errors = Vec::new();

            for (file_path, result) in parse_results {
                match result {
                    Ok(module) => {
                        parsed.insert(file_path, module);
                    }
                    Err(e) => {
                        if self.verbose {
                            eprintln!("{} {} - {}", "warning:".bold().yellow(), file_path, e);
                        }
                        errors.push(ParseErrorIssue {
                            file_path,
                            error: e.to_string(),
                        });
                    }
                }
            }

            errors.sort_by(|a, b| a.file_path.cmp(&b.file_path));
            let _ = self.parsed_files_errors.set(errors);
            parsed
        })
    }

    /// Files that failed to read or parse.
    pub fn parsed_files_errors(&self) -> &Vec<ParseErrorIssue> {
        self.parsed_files();
        self.parsed_files_errors.get_or_init(Vec::new)
    }

    /// Entity catalog across all parsed files (lazy).
    pub fn schema(&self) -> &Schema {
        self.schema.get_or_init(|| {
            let entities = self
                .parsed_files()
                .values()
                .flat_map(|module| module.entities.iter().cloned())
                .collect();
            let schema = Schema::new(entities);
            log::debug!(
                "schema: {} entities from {} file(s)",
                schema.len(),
                self.files.len()
            );
            schema
        })
    }

    /// Resolver configured with the role table and substring setting.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.config.role_table())
            .with_substring_fallback(self.config.substring_fallback)
    }
}
