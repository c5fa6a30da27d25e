//! Query processing: roll stored snapshots up into calendar periods.
//!
//! This module handles the reporting side of the pipeline, turning daily
//! snapshots into per-period summaries. It provides:
//!
//! - **Options**: granularity and date range (`Granularity`, `ReportOptions`)
//! - **QuerySet**: yearly (and optionally monthly) summaries ready for display
//!
//! ## Example
//!
//! ```rust,ignore
//! use l10nstatslib::query::{Granularity, ReportOptions, ReportQuerySet};
//!
//! let store = JsonlSnapshotStore::new("db/stats.jsonl");
//! let options = ReportOptions::new().granularity(Granularity::Monthly);
//! let report = ReportQuerySet::from_store(&store, &options)?;
//! ```

pub mod options;
pub mod queryset;

pub use options::{Granularity, Period, ReportOptions, FIRST_REPORT_YEAR};
pub use queryset::{percentage, CategoryShare, PeriodSummary, ReportQuerySet, BREAKDOWN};
