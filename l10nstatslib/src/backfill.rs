//! Backfill: record past days from the history of a git repository.
//!
//! Each replayed day is handled like a daily run against the table of the
//! previous replayed day:
//!
//! - a day the store already holds is left alone
//! - a day with the same identities as the previous one records nothing
//! - any other day is counted and appended
//!
//! The first replayed day has no baseline, so only its static totals are
//! recorded. The baseline moves on after every day except unchanged ones,
//! mirroring a daily run that leaves its cache alone when nothing changed.

use tracing::info;

use crate::data::StringTable;
use crate::options::BackfillOptions;
use crate::run::{record_day, RunOutcome};
use crate::source::{daily_commits, open_repository, DailyCommit, TreeExtractor};
use crate::store::{CacheFile, SnapshotStore};
use crate::Result;

/// What happened to one replayed day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillDay {
    /// Commit the day's tree was read from (hex)
    pub commit: String,
    pub outcome: RunOutcome,
}

/// Replay the history described by `options` into `store`.
pub fn run_backfill<S: SnapshotStore + ?Sized>(
    options: &BackfillOptions,
    store: &mut S,
) -> Result<Vec<BackfillDay>> {
    let repo = open_repository(&options.repo)?;
    let commits = daily_commits(&repo, &options.rev, options.since, options.until)?;
    info!(rev = %options.rev, days = commits.len(), "replaying history");

    let mut extractor = TreeExtractor::new(&repo, &options.filter);
    let mut baseline = StringTable::new();
    let mut days = Vec::with_capacity(commits.len());

    for DailyCommit { day, id } in commits {
        let extraction = extractor.extract(id)?;
        let outcome = if store.has_day(day)? {
            info!(%day, "snapshot already recorded");
            RunOutcome::AlreadyRecorded(day)
        } else {
            record_day(day, &extraction, &baseline, store)?
        };
        if !matches!(outcome, RunOutcome::Unchanged { .. }) {
            baseline = extraction.table;
        }
        days.push(BackfillDay {
            commit: id.to_string(),
            outcome,
        });
    }

    if let Some(path) = &options.cache_path {
        if !baseline.is_empty() {
            CacheFile::new(path).save(&baseline)?;
            info!(path = %path.display(), strings = baseline.len(), "cache left for daily runs");
        }
    }

    Ok(days)
}
