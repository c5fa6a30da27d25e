//! Data collection: parse files, build the string table, diff and count.
//!
//! This module handles the second stage of the pipeline. It provides:
//!
//! - **Parsing**: per-format parsers producing [`Entry`] values
//! - **Identity**: stable `path:name[.attribute]` keys
//! - **Word counting**: generic and Fluent-aware counters
//! - **String table**: the `identity → raw value` map of a whole tree
//! - **Diffing**: added/removed identities between two tables
//! - **Statistics**: the per-category counters record and its folds
//!
//! ## Example
//!
//! ```rust,ignore
//! use l10nstatslib::data::{accumulate_changes, build_string_table, diff_tables};
//!
//! let current = build_string_table("mozilla-central", &FilterConfig::new())?;
//! let diff = diff_tables(&current.table, &cache);
//! let counters = accumulate_changes(current.totals, &diff, &current.table, &cache);
//! ```

pub mod counter;
pub mod diff;
pub mod entry;
pub mod parse;
pub mod stats;
pub mod table;
pub mod words;

pub use counter::{accumulate_changes, identity_category, identity_words};
pub use diff::{diff_tables, SnapshotDiff};
pub use entry::{
    attribute_identity, entry_identity, identity_file, Attribute, Entry, Format, ParsedItem,
    SimpleEntry, StructuredEntry,
};
pub use parse::parse_file;
pub use stats::{BucketCounts, Counters, Measure};
pub use table::{build_string_table, extract_files, Extraction, StringTable};
pub use words::{count_fluent_words, count_plain_words, count_words};
