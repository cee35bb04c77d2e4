//! Source parsers.
//!
//! - `call`: call-extent and argument scanning for Python source
//! - `python`: SQLAlchemy declarative model extraction

pub mod call;
pub mod python;
