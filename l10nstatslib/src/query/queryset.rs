//! Query set: period rollups of the stored snapshots.
//!
//! A `ReportQuerySet` sits between the snapshot store and the table output.
//! Each row summarizes one calendar period:
//!
//! - the closing total: `total` bucket of the latest snapshot at or before the
//!   end of the period
//! - strings and words added and removed during the period
//! - the added breakdown for browser, devtools and shared, with each share as
//!   a percentage of everything added
//!
//! Periods without any snapshot are left out.

use serde::{Deserialize, Serialize};

use crate::data::Counters;
use crate::day::Day;
use crate::source::Category;
use crate::store::SnapshotStore;
use crate::Result;

use super::options::{Granularity, Period, ReportOptions};

/// Categories listed in the added breakdown.
pub const BREAKDOWN: [Category; 3] = [Category::Browser, Category::Devtools, Category::Shared];

/// `part` as a percentage of `whole`, rounded to two decimals.
///
/// `None` when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some((part as f64 * 10_000.0 / whole as f64).round() / 100.0)
}

/// Strings added in one category during a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    pub added: u64,
    pub added_words: u64,
    /// Share of all added strings, `None` if nothing was added
    pub percent: Option<f64>,
}

/// One row of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: Period,
    /// Display label (`2024`, `2024-03`)
    pub label: String,
    /// Snapshots recorded during the period
    pub snapshots: usize,
    /// Strings in the tree at the end of the period
    pub closing: u64,
    /// Words in the tree at the end of the period
    pub closing_words: u64,
    pub added: u64,
    pub added_words: u64,
    pub removed: u64,
    pub removed_words: u64,
    pub breakdown: Vec<CategoryShare>,
    /// Monthly rows of a yearly summary
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub months: Vec<PeriodSummary>,
}

impl PeriodSummary {
    /// Summarize `period` from `store`. `None` if the period has no snapshot.
    pub fn from_store<S: SnapshotStore + ?Sized>(
        store: &S,
        period: Period,
        until: Day,
    ) -> Result<Option<Self>> {
        let end = period.end.min(until);
        if end < period.start {
            return Ok(None);
        }

        let records = store.records_between(period.start, end)?;
        if records.is_empty() {
            return Ok(None);
        }
        let sums: Counters = records.iter().map(|r| r.snapshot.counters).sum();
        let closing = store
            .latest_at_or_before(end)?
            .map(|r| r.snapshot.counters.total)
            .unwrap_or_default();

        let breakdown = BREAKDOWN
            .iter()
            .map(|&category| {
                let bucket = sums.category(category);
                CategoryShare {
                    category,
                    added: bucket.added,
                    added_words: bucket.added_words,
                    percent: percentage(bucket.added, sums.total.added),
                }
            })
            .collect();

        Ok(Some(PeriodSummary {
            period,
            label: period.label(),
            snapshots: records.len(),
            closing: closing.base,
            closing_words: closing.base_words,
            added: sums.total.added,
            added_words: sums.total.added_words,
            removed: sums.total.removed,
            removed_words: sums.total.removed_words,
            breakdown,
            months: Vec::new(),
        }))
    }

    /// Net change in strings over the period.
    pub fn net(&self) -> i64 {
        self.added as i64 - self.removed as i64
    }
}

/// Query set for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQuerySet {
    pub granularity: Granularity,
    /// Last day considered
    pub until: Day,
    /// Yearly rows, oldest first
    pub periods: Vec<PeriodSummary>,
}

impl ReportQuerySet {
    /// Build the report rows from a snapshot store.
    pub fn from_store<S: SnapshotStore + ?Sized>(
        store: &S,
        options: &ReportOptions,
    ) -> Result<Self> {
        let until = options.resolved_until();
        let mut periods = Vec::new();

        for year in Period::years(options.from_year, until.year()) {
            let Some(mut summary) = PeriodSummary::from_store(store, year, until)? else {
                continue;
            };
            if options.granularity == Granularity::Monthly {
                for month in year.months() {
                    if let Some(row) = PeriodSummary::from_store(store, month, until)? {
                        summary.months.push(row);
                    }
                }
            }
            periods.push(summary);
        }

        Ok(ReportQuerySet {
            granularity: options.granularity,
            until,
            periods,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
