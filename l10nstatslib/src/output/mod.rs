//! Output formatting: present report data as tables.
//!
//! This module handles the final stage of the reporting pipeline -
//! formatting query results for display. It provides:
//!
//! - **StatsTable**: Table-ready data structure with headers and rows
//! - **TableRow**: Individual row with label and formatted values
//!
//! StatsTable is a pure presentation layer - it only formats data into strings.
//!
//! ## Example
//!
//! ```rust,ignore
//! use l10nstatslib::output::StatsTable;
//!
//! let table = StatsTable::from_report_queryset(&queryset);
//! // table.headers: ["Period", "Total", "Added", "Removed", "Browser", ...]
//! // table.rows: [TableRow { label: "2024", values: ["1200 (4310)", ...], .. }]
//! ```

pub mod table;

pub use table::{format_count, format_percent, StatsTable, TableRow, NOT_AVAILABLE};
