//! tasklens: project flat task records into filtered, sorted, hierarchical
//! views.
//!
//! The library takes the JSON export of a task manager (a flat array of
//! records, each optionally pointing at a parent and a project), normalizes
//! it, and offers three composable operations:
//!
//! - [`ops::filter::FilterSpec`] selects tasks by tag, date window, text
//!   search, estimate, and status flags,
//! - [`ops::sort::sort_tasks`] orders them stably by a chosen key,
//! - [`ops::tree::build_tree`] reconstructs the parent/child hierarchy and
//!   groups root tasks by project.
//!
//! [`render`] turns either result into terminal text; the `tl` binary wires
//! the pieces to a CLI.

pub mod cli;
pub mod model;
pub mod ops;
pub mod render;
pub mod util;

pub use model::record::TaskRecord;
pub use model::task::Task;
pub use ops::filter::{FilterSpec, TagFilter};
pub use ops::query::{QueryError, filter_and_sort, normalize_records, parse_records};
pub use ops::sort::{SortDirection, SortKey, sort_tasks};
pub use ops::tree::{ProjectGroup, TaskNode, TreeOptions, TreeResult, build_tree};
pub use render::DisplayMode;
