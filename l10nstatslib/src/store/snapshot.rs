//! Daily snapshot records and the store they are appended to.
//!
//! A stored row is flat: an auto-increment `id`, the `day`, and six integer
//! columns per bucket named after the bucket:
//!
//! | column              | meaning              |
//! |---------------------|----------------------|
//! | `{bucket}`          | strings in the tree  |
//! | `{bucket}_w`        | words in the tree    |
//! | `{bucket}_added`    | strings added        |
//! | `{bucket}_added_w`  | words added          |
//! | `{bucket}_removed`  | strings removed      |
//! | `{bucket}_removed_w`| words removed        |
//!
//! for the buckets `browser`, `devtools`, `mobile`, `shared` and `total`.
//! [`JsonlSnapshotStore`] keeps one such row per line of a JSON-lines file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::data::{BucketCounts, Counters};
use crate::day::Day;
use crate::error::L10nStatsError;
use crate::Result;

/// Bucket names in storage column order.
pub const BUCKETS: [&str; 5] = ["browser", "devtools", "mobile", "shared", "total"];

const SUFFIXES: [&str; 6] = ["", "_w", "_added", "_added_w", "_removed", "_removed_w"];

/// The counters recorded for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub day: Day,
    pub counters: Counters,
}

impl DailySnapshot {
    pub fn new(day: Day, counters: Counters) -> Self {
        Self { day, counters }
    }
}

/// A snapshot as read back from a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    /// Store-assigned row id
    pub id: u64,
    #[serde(flatten)]
    pub snapshot: DailySnapshot,
}

fn bucket<'a>(counters: &'a Counters, name: &str) -> Option<&'a BucketCounts> {
    match name {
        "browser" => Some(&counters.browser),
        "devtools" => Some(&counters.devtools),
        "mobile" => Some(&counters.mobile),
        "shared" => Some(&counters.shared),
        "total" => Some(&counters.total),
        _ => None,
    }
}

fn bucket_mut<'a>(counters: &'a mut Counters, name: &str) -> Option<&'a mut BucketCounts> {
    match name {
        "browser" => Some(&mut counters.browser),
        "devtools" => Some(&mut counters.devtools),
        "mobile" => Some(&mut counters.mobile),
        "shared" => Some(&mut counters.shared),
        "total" => Some(&mut counters.total),
        _ => None,
    }
}

fn bucket_columns(counts: &BucketCounts) -> [u64; 6] {
    [
        counts.base,
        counts.base_words,
        counts.added,
        counts.added_words,
        counts.removed,
        counts.removed_words,
    ]
}

fn set_bucket_columns(counts: &mut BucketCounts, values: [u64; 6]) {
    let [base, base_words, added, added_words, removed, removed_words] = values;
    *counts = BucketCounts {
        base,
        base_words,
        added,
        added_words,
        removed,
        removed_words,
    };
}

/// Encode a snapshot as a storage row.
pub fn to_row(id: u64, snapshot: &DailySnapshot) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert("id".to_string(), Value::from(id));
    row.insert("day".to_string(), Value::from(snapshot.day.to_string()));
    for name in BUCKETS {
        if let Some(counts) = bucket(&snapshot.counters, name) {
            for (suffix, value) in SUFFIXES.iter().zip(bucket_columns(counts)) {
                row.insert(format!("{name}{suffix}"), Value::from(value));
            }
        }
    }
    row
}

/// Decode a storage row. Every column must be present.
pub fn from_row(row: &Map<String, Value>) -> std::result::Result<StoredSnapshot, String> {
    let int = |column: &str| -> std::result::Result<u64, String> {
        row.get(column)
            .and_then(Value::as_u64)
            .ok_or_else(|| format!("missing or invalid column '{column}'"))
    };

    let id = int("id")?;
    let day = row
        .get("day")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing or invalid column 'day'".to_string())?;
    let day = Day::parse(day).map_err(|e| e.to_string())?;

    let mut counters = Counters::new();
    for name in BUCKETS {
        let mut values = [0u64; 6];
        for (slot, suffix) in values.iter_mut().zip(SUFFIXES) {
            *slot = int(&format!("{name}{suffix}"))?;
        }
        if let Some(counts) = bucket_mut(&mut counters, name) {
            set_bucket_columns(counts, values);
        }
    }

    Ok(StoredSnapshot {
        id,
        snapshot: DailySnapshot::new(day, counters),
    })
}

/// Persistence for daily snapshots.
///
/// Implementations only need to append and list rows; range queries have
/// default implementations on top of [`SnapshotStore::records`].
pub trait SnapshotStore {
    /// All stored snapshots, ordered by day.
    fn records(&self) -> Result<Vec<StoredSnapshot>>;

    /// Store a snapshot and return its row id.
    ///
    /// Fails with [`L10nStatsError::DuplicateDay`] if the day is already stored.
    fn append(&mut self, snapshot: &DailySnapshot) -> Result<u64>;

    /// Whether a snapshot exists for `day`.
    fn has_day(&self, day: Day) -> Result<bool> {
        Ok(self.records()?.iter().any(|r| r.snapshot.day == day))
    }

    /// Snapshots with `from <= day <= to`, ordered by day.
    fn records_between(&self, from: Day, to: Day) -> Result<Vec<StoredSnapshot>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.snapshot.day >= from && r.snapshot.day <= to)
            .collect())
    }

    /// Column-wise sum of the snapshots with `from <= day <= to`.
    fn sum_between(&self, from: Day, to: Day) -> Result<Counters> {
        Ok(self
            .records_between(from, to)?
            .iter()
            .map(|r| r.snapshot.counters)
            .sum())
    }

    /// The most recent snapshot at or before `day`.
    fn latest_at_or_before(&self, day: Day) -> Result<Option<StoredSnapshot>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.snapshot.day <= day)
            .max_by_key(|r| r.snapshot.day))
    }
}

/// Snapshot store backed by a JSON-lines file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonlSnapshotStore {
    path: PathBuf,
}

impl JsonlSnapshotStore {
    /// Open a store at `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File content, `None` if the store was never written.
    fn read_content(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(L10nStatsError::FileRead {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

fn parse_rows(path: &Path, content: &str) -> Result<Vec<StoredSnapshot>> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let format_err = |message: String| L10nStatsError::StoreFormat {
            path: path.to_path_buf(),
            line: index + 1,
            message,
        };
        let row: Map<String, Value> =
            serde_json::from_str(line).map_err(|e| format_err(e.to_string()))?;
        records.push(from_row(&row).map_err(format_err)?);
    }

    records.sort_by_key(|r| r.snapshot.day);
    Ok(records)
}

impl SnapshotStore for JsonlSnapshotStore {
    fn records(&self) -> Result<Vec<StoredSnapshot>> {
        match self.read_content()? {
            Some(content) => parse_rows(&self.path, &content),
            None => Ok(Vec::new()),
        }
    }

    fn append(&mut self, snapshot: &DailySnapshot) -> Result<u64> {
        let content = self.read_content()?.unwrap_or_default();
        let existing = parse_rows(&self.path, &content)?;
        if existing.iter().any(|r| r.snapshot.day == snapshot.day) {
            return Err(L10nStatsError::DuplicateDay(snapshot.day.to_string()));
        }
        let id = existing.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        let write_err = |source: std::io::Error| L10nStatsError::FileWrite {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        // A hand-edited file may lack its final newline
        let mut line = String::new();
        if !content.is_empty() && !content.ends_with('\n') {
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(&to_row(id, snapshot))?);
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(line.as_bytes()).map_err(write_err)?;

        debug!(path = %self.path.display(), day = %snapshot.day, id, "snapshot appended");
        Ok(id)
    }
}

/// In-memory snapshot store.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    rows: Vec<StoredSnapshot>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn records(&self) -> Result<Vec<StoredSnapshot>> {
        let mut rows = self.rows.clone();
        rows.sort_by_key(|r| r.snapshot.day);
        Ok(rows)
    }

    fn append(&mut self, snapshot: &DailySnapshot) -> Result<u64> {
        if self.rows.iter().any(|r| r.snapshot.day == snapshot.day) {
            return Err(L10nStatsError::DuplicateDay(snapshot.day.to_string()));
        }
        let id = self.rows.len() as u64 + 1;
        self.rows.push(StoredSnapshot {
            id,
            snapshot: *snapshot,
        });
        Ok(id)
    }
}
