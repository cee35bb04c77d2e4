//! Actions for fixing relationship issues.
//!
//! Actions convert Issues into Operations and execute them.
//!
//! ```text
//! Issue (problem detected)
//!     ↓
//! Action (Issue → Operation conversion)
//!     ↓
//! Operation (text edit, verified against the original span)
//!     ↓
//! execute (file modification)
//! ```
//!
//! - [`InsertForeignKeys`]: add `foreign_keys=` to ambiguous relationships (fix)

mod insert_foreign_keys;
mod operation;
mod traits;

pub use insert_foreign_keys::InsertForeignKeys;
pub use operation::{DiffLine, FileOutcome, Operation};
pub use traits::{Action, ActionStats};
