//! # l10nstatslib
//!
//! Daily statistics about the localizable strings of a Firefox source tree.
//!
//! ## Overview
//!
//! The library walks a source tree, parses every supported localization file
//! and records, once per day, how many strings (and words) each product area
//! holds and how many were added or removed since the previous run:
//!
//! - **Browser**: `browser/`, except developer tools living there
//! - **DevTools**: `devtools/` and `browser/**/devtools/`
//! - **Mobile**: `mobile/`, reported on its own and left out of the total
//! - **Shared**: everything else (`toolkit/`, `dom/`, ...)
//!
//! ## Features
//!
//! - **Five formats**: DTD, Fluent, `#define` includes, INI and properties
//! - **Markup-aware word counts**: tags are dropped, Fluent placeables ignored
//! - **Change tracking**: diff against the string table cached by the last run
//! - **Period reports**: yearly and monthly rollups of the recorded days
//! - **Backfill**: replay the git history of a tree, one commit per day
//!
//! ## Example
//!
//! ```rust
//! use l10nstatslib::{run_extraction, Day, ExtractOptions, JsonlSnapshotStore, RunOutcome};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Set up a temporary source tree
//! let dir = tempdir().unwrap();
//! let locales = dir.path().join("tree/browser/locales");
//! fs::create_dir_all(&locales).unwrap();
//! fs::write(locales.join("tabs.properties"), "new-tab = Open a new tab\n").unwrap();
//!
//! // Record one day
//! let mut store = JsonlSnapshotStore::new(dir.path().join("db/stats.jsonl"));
//! let options = ExtractOptions::new(dir.path().join("tree"))
//!     .cache(dir.path().join("cache.json"))
//!     .day(Day::parse("20240101").unwrap());
//!
//! match run_extraction(&options, &mut store).unwrap() {
//!     RunOutcome::Recorded(report) => {
//!         assert_eq!(report.snapshot.counters.browser.base, 1);
//!         assert_eq!(report.snapshot.counters.total.base_words, 4);
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//!
//! // Running again for the same day is a no-op
//! let again = run_extraction(&options, &mut store).unwrap();
//! assert!(matches!(again, RunOutcome::AlreadyRecorded(_)));
//! ```

pub mod backfill;
pub mod data;
pub mod day;
pub mod error;
pub mod options;
pub mod output;
pub mod query;
pub mod run;
pub mod source;
pub mod store;

pub use backfill::{run_backfill, BackfillDay};
pub use data::{
    accumulate_changes, build_string_table, count_words, diff_tables, parse_file, BucketCounts,
    Counters, Entry, Extraction, Format, Measure, SnapshotDiff, StringTable,
};
pub use day::Day;
pub use error::L10nStatsError;
pub use options::{BackfillOptions, ExtractOptions, DEFAULT_CACHE_FILE, DEFAULT_STORE_FILE};
pub use output::{StatsTable, TableRow};
pub use query::{Granularity, PeriodSummary, ReportOptions, ReportQuerySet};
pub use run::{compute_snapshot, run_extraction, RunOutcome, RunReport};
pub use source::{discover_files, Category, FilterConfig};
pub use store::{
    CacheFile, DailySnapshot, JsonlSnapshotStore, MemorySnapshotStore, SnapshotStore,
    StoredSnapshot,
};

/// Result type for l10nstatslib operations
pub type Result<T> = std::result::Result<T, L10nStatsError>;
