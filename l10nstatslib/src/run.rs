//! One extraction run: walk the tree, compare with the cache, record the day.
//!
//! A run goes through these steps:
//!
//! 1. If the store already has a snapshot for the day, stop without touching
//!    the tree, the store or the cache.
//! 2. Load the cached table of the previous run (empty if there is none).
//! 3. Walk and parse the tree into the current table.
//! 4. If both tables hold the same identities, stop: nothing is written.
//! 5. Otherwise diff, count, append the snapshot, then replace the cache.
//!
//! On the very first run (empty cache) the added/removed counters are left
//! at zero and only the static totals are recorded.

use std::path::PathBuf;

use tracing::info;

use crate::data::{
    accumulate_changes, build_string_table, diff_tables, Extraction, SnapshotDiff, StringTable,
};
use crate::day::Day;
use crate::options::ExtractOptions;
use crate::store::{CacheFile, DailySnapshot, SnapshotStore};
use crate::Result;

/// Summary of a run that recorded a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Row id assigned by the store
    pub id: u64,
    /// The recorded snapshot
    pub snapshot: DailySnapshot,
    /// Identities added and removed since the cache
    pub diff: SnapshotDiff,
    /// Strings in the current table
    pub strings: usize,
    /// Files parsed
    pub files: usize,
    /// Files skipped because they failed to parse
    pub failed: Vec<PathBuf>,
    /// Whether there was no cached baseline
    pub first_run: bool,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The store already holds a snapshot for this day
    AlreadyRecorded(Day),
    /// Same identities as the cache; nothing written
    Unchanged { day: Day, strings: usize },
    /// A snapshot was stored and the cache replaced
    Recorded(Box<RunReport>),
}

impl RunOutcome {
    /// The day the run was for.
    pub fn day(&self) -> Day {
        match self {
            RunOutcome::AlreadyRecorded(day) | RunOutcome::Unchanged { day, .. } => *day,
            RunOutcome::Recorded(report) => report.snapshot.day,
        }
    }
}

/// Compute the day's snapshot from the current extraction and the cache.
///
/// With an empty cache only the static totals are kept.
pub fn compute_snapshot(
    day: Day,
    extraction: &Extraction,
    cache: &StringTable,
) -> (DailySnapshot, SnapshotDiff) {
    let diff = diff_tables(&extraction.table, cache);
    let counters = if cache.is_empty() {
        extraction.totals.without_changes()
    } else {
        accumulate_changes(extraction.totals, &diff, &extraction.table, cache)
    };
    (DailySnapshot::new(day, counters), diff)
}

/// Run an extraction and record the result in `store`.
pub fn run_extraction<S: SnapshotStore + ?Sized>(
    options: &ExtractOptions,
    store: &mut S,
) -> Result<RunOutcome> {
    let day = options.resolved_day();
    if store.has_day(day)? {
        info!(%day, "snapshot already recorded");
        return Ok(RunOutcome::AlreadyRecorded(day));
    }

    let cache_file = CacheFile::new(&options.cache_path);
    let cache = cache_file.load()?;
    info!(%day, cached = cache.len(), "cache loaded");

    let extraction = build_string_table(&options.root, &options.filter)?;
    info!(
        strings = extraction.table.len(),
        files = extraction.files,
        failed = extraction.failed.len(),
        "tree extracted"
    );

    let outcome = record_day(day, &extraction, &cache, store)?;
    if matches!(outcome, RunOutcome::Recorded(_)) {
        cache_file.save(&extraction.table)?;
    }
    Ok(outcome)
}

/// Record `extraction` against `baseline` unless both hold the same identities.
pub(crate) fn record_day<S: SnapshotStore + ?Sized>(
    day: Day,
    extraction: &Extraction,
    baseline: &StringTable,
    store: &mut S,
) -> Result<RunOutcome> {
    if extraction.table.same_identities(baseline) {
        info!(%day, "no change since last run");
        return Ok(RunOutcome::Unchanged {
            day,
            strings: extraction.table.len(),
        });
    }

    let (snapshot, diff) = compute_snapshot(day, extraction, baseline);
    let id = store.append(&snapshot)?;
    info!(
        %day,
        id,
        added = diff.added.len(),
        removed = diff.removed.len(),
        "snapshot recorded"
    );

    Ok(RunOutcome::Recorded(Box::new(RunReport {
        id,
        snapshot,
        diff,
        strings: extraction.table.len(),
        files: extraction.files,
        failed: extraction.failed.clone(),
        first_run: baseline.is_empty(),
    })))
}
