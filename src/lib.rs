//! ormdoctor - ambiguous relationship checker for SQLAlchemy models
//!
//! ormdoctor scans Python model files, finds `relationship()` declarations
//! whose two entities are linked by more than one reference column, and
//! picks the intended column from naming conventions. The choice can be
//! written back as `foreign_keys=`.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and actions)
//! - `config`: Configuration file loading and parsing
//! - `core`: Model parsing, schema and the reference resolver
//! - `issues`: Issue type definitions and reporting
//! - `mcp`: Model Context Protocol server implementation
//! - `rules`: Relationship checks and the foreign-key map
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod mcp;
pub mod rules;
pub mod utils;
