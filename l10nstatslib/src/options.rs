//! Input options for extraction and backfill runs.

use std::path::{Path, PathBuf};

use crate::day::Day;
use crate::source::FilterConfig;

/// Default location of the cached string table.
pub const DEFAULT_CACHE_FILE: &str = "cache.json";

/// Default location of the snapshot store.
pub const DEFAULT_STORE_FILE: &str = "db/stats.jsonl";

/// Options for an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Root of the source tree to analyze
    pub root: PathBuf,
    /// Cached string table of the previous run
    pub cache_path: PathBuf,
    /// Day to record; today's UTC date when unset
    pub day: Option<Day>,
    /// File filter configuration
    pub filter: FilterConfig,
}

impl ExtractOptions {
    /// Options for `root` with the default cache location and filters.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            day: None,
            filter: FilterConfig::new(),
        }
    }

    /// Set the cache file.
    pub fn cache(mut self, path: impl AsRef<Path>) -> Self {
        self.cache_path = path.as_ref().to_path_buf();
        self
    }

    /// Record the run under a specific day.
    pub fn day(mut self, day: Day) -> Self {
        self.day = Some(day);
        self
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// The day this run records.
    pub fn resolved_day(&self) -> Day {
        self.day.unwrap_or_else(Day::today_utc)
    }
}

/// Options for replaying the history of a git repository.
#[derive(Debug, Clone)]
pub struct BackfillOptions {
    /// Repository (or any path inside it) to replay
    pub repo: PathBuf,
    /// Revision whose first-parent history is replayed
    pub rev: String,
    /// First day to record
    pub since: Option<Day>,
    /// Last day to record
    pub until: Option<Day>,
    /// Where to leave the table of the last replayed day, if anywhere
    pub cache_path: Option<PathBuf>,
    /// File filter configuration
    pub filter: FilterConfig,
}

impl BackfillOptions {
    /// Replay `HEAD` of `repo` over its whole history.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            rev: "HEAD".to_string(),
            since: None,
            until: None,
            cache_path: None,
            filter: FilterConfig::new(),
        }
    }

    /// Set the revision to replay.
    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = rev.into();
        self
    }

    pub fn since(mut self, day: Day) -> Self {
        self.since = Some(day);
        self
    }

    pub fn until(mut self, day: Day) -> Self {
        self.until = Some(day);
        self
    }

    /// Save the last replayed table as the cache of later daily runs.
    pub fn cache(mut self, path: impl AsRef<Path>) -> Self {
        self.cache_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }
}
