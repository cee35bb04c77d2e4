//! Core analysis engine.
//!
//! ## Pipeline
//!
//! 1. **Scan**: collect model source files (`file_scanner`)
//! 2. **Parse**: extract entities, reference fields and relationships in parallel (`parsers`)
//! 3. **Catalog**: build the cross-file [`Schema`] (`data`)
//! 4. **Resolve**: pick the reference field of each ambiguous relationship (`resolve`)
//!
//! [`CheckContext`] drives steps 1-3 lazily; rules and commands call into
//! `resolve` with the context's [`Resolver`].

pub mod context;
pub mod data;
pub mod file_scanner;
pub mod parsers;
pub mod resolve;

pub use context::CheckContext;
pub use data::{
    CandidateSet, Direction, Entity, ExplicitReference, ReferenceField, ReferenceTarget,
    RelationshipAlias, Schema, SourceContext, SourceLocation, Span,
};
pub use resolve::{NamingRule, Resolution, ResolveError, ResolveQuery, Resolver, RoleTable};
