//! Rule implementations for ormdoctor.
//!
//! Each rule has a context wrapper (`check_*_issues`, `build_*_from`) and a
//! pure function taking only the schema and resolver it needs.
//!
//! - `relationships`: ambiguous and unresolvable relationship detection
//! - `foreign_keys`: foreign-key map and multi-reference suggestions

pub mod foreign_keys;
pub mod relationships;
