//! Table-ready data structures for report output.
//!
//! This module provides `StatsTable`, a presentation-ready data structure
//! that can be printed directly or serialized to JSON.
//!
//! The data flow is:
//! 1. Raw Data (stored `DailySnapshot` rows)
//! 2. QuerySet (period summaries)
//! 3. StatsTable (formatted strings for display)
//!
//! StatsTable is a pure presentation layer - it only formats data, all
//! computation happens in the QuerySet layer.

use serde::{Deserialize, Serialize};

use crate::query::queryset::{CategoryShare, PeriodSummary, ReportQuerySet};
use crate::source::Category;

/// Placeholder for a percentage that can't be computed.
pub const NOT_AVAILABLE: &str = "n/a";

/// A single row in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Period label, indented for monthly rows
    pub label: String,
    /// Values for each column (as strings, ready for display)
    pub values: Vec<String>,
    /// Whether this row is a month inside a year
    pub nested: bool,
}

/// Table-ready report data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTable {
    /// Optional title (e.g., "Localization stats until 20240101")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers: [Period, Total, Added, Removed, Browser, DevTools, Shared]
    pub headers: Vec<String>,
    /// Data rows, months following their year
    pub rows: Vec<TableRow>,
    /// Optional legend text below the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
}

impl StatsTable {
    /// Create a StatsTable from a ReportQuerySet.
    pub fn from_report_queryset(qs: &ReportQuerySet) -> Self {
        let mut rows = Vec::new();
        for year in &qs.periods {
            rows.push(format_summary(year, false));
            rows.extend(year.months.iter().map(|month| format_summary(month, true)));
        }

        StatsTable {
            title: Some(format!("Localization stats until {}", qs.until)),
            headers: build_headers(),
            rows,
            legend: Some("strings (words); breakdown shows share of added strings".to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn category_header(category: Category) -> &'static str {
    match category {
        Category::Browser => "Browser",
        Category::Devtools => "DevTools",
        Category::Mobile => "Mobile",
        Category::Shared => "Shared",
    }
}

/// Build column headers.
fn build_headers() -> Vec<String> {
    let mut headers: Vec<String> = ["Period", "Total", "Added", "Removed"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    headers.extend(
        crate::query::queryset::BREAKDOWN
            .iter()
            .map(|&c| category_header(c).to_string()),
    );
    headers
}

/// Format a string count with its word count, e.g. `120 (431)`.
pub fn format_count(strings: u64, words: u64) -> String {
    format!("{} ({})", strings, words)
}

/// Format a percentage with two decimals, or `n/a`.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(value) => format!("{:.2} %", value),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn format_share(share: &CategoryShare) -> String {
    format!(
        "{} - {}",
        format_count(share.added, share.added_words),
        format_percent(share.percent)
    )
}

fn format_summary(summary: &PeriodSummary, nested: bool) -> TableRow {
    let mut values = vec![
        format_count(summary.closing, summary.closing_words),
        format_count(summary.added, summary.added_words),
        format_count(summary.removed, summary.removed_words),
    ];
    values.extend(summary.breakdown.iter().map(format_share));

    TableRow {
        label: summary.label.clone(),
        values,
        nested,
    }
}
