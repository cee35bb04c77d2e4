//! Core data types shared across the analysis pipeline.
//!
//! - `source`: positions and spans in model files
//! - `model`: entities, reference fields, relationships and the schema catalog

mod model;
mod source;

pub use model::*;
pub use source::*;
