//! Template rendering for CLI output using outstanding

use console::Style;
use l10nstatslib::{
    BackfillDay, BucketCounts, Category, Counters, ReportQuerySet, RunOutcome, StatsTable,
};
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;
use serde_json::json;

/// Include templates at compile time
const REPORT_TEMPLATE: &str = include_str!("../templates/report_table.jinja");
const OUTCOME_TEMPLATE: &str = include_str!("../templates/extract_outcome.jinja");
const BACKFILL_TEMPLATE: &str = include_str!("../templates/backfill_days.jinja");

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

type RenderResult = Result<String, Box<dyn std::error::Error>>;

/// Row data for the report template (pre-padded)
#[derive(Debug, Serialize)]
struct TemplateRow {
    /// Label padded to the first column, indented for months
    name: String,
    /// Cells right-aligned to their column width
    cells: Vec<String>,
}

/// Data context for the report template
#[derive(Debug, Serialize)]
struct ReportTableContext {
    title: Option<String>,
    name_header: String,
    /// Pre-padded column headers
    columns: Vec<String>,
    separator: String,
    rows: Vec<TemplateRow>,
    legend: Option<String>,
}

/// One bucket line of an extraction outcome
#[derive(Debug, Serialize)]
struct BucketLine {
    label: String,
    base: String,
    changes: Option<String>,
}

/// Data context for the extraction outcome template
#[derive(Debug, Default, Serialize)]
struct OutcomeContext {
    status: &'static str,
    day: String,
    strings: usize,
    files: usize,
    added: usize,
    removed: usize,
    first_run: bool,
    buckets: Vec<BucketLine>,
    failed: usize,
}

/// One line of the backfill template
#[derive(Debug, Serialize)]
struct BackfillLine {
    day: String,
    commit: String,
    summary: String,
}

/// Data context for the backfill template
#[derive(Debug, Serialize)]
struct BackfillContext {
    days: Vec<BackfillLine>,
    recorded: usize,
    total: usize,
}

/// Create the theme with styles
fn create_theme() -> Theme {
    Theme::new()
        .add("title", Style::new().bold())
        .add("header", Style::new().bold())
}

/// Map an `--output` value to an output mode
pub fn parse_output_mode(value: &str) -> OutputMode {
    match value {
        "json" => OutputMode::Json,
        "text" => OutputMode::Text,
        "term-debug" => OutputMode::TermDebug,
        "term" => OutputMode::Term,
        _ => OutputMode::Auto,
    }
}

/// Display name of a bucket
fn bucket_label(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Browser) => "Browser",
        Some(Category::Devtools) => "DevTools",
        Some(Category::Mobile) => "Mobile",
        Some(Category::Shared) => "Shared",
        None => "Total",
    }
}

fn bucket_line(label: &str, counts: &BucketCounts, with_changes: bool) -> BucketLine {
    BucketLine {
        label: format!("{:<10}", label),
        base: format!("{:>8} ({})", counts.base, counts.base_words),
        changes: with_changes.then(|| {
            format!(
                "+{} ({}) / -{} ({})",
                counts.added, counts.added_words, counts.removed, counts.removed_words
            )
        }),
    }
}

fn bucket_lines(counters: &Counters, with_changes: bool) -> Vec<BucketLine> {
    let mut lines: Vec<BucketLine> = Category::ALL
        .iter()
        .map(|&c| bucket_line(bucket_label(Some(c)), counters.category(c), with_changes))
        .collect();
    lines.push(bucket_line(bucket_label(None), &counters.total, with_changes));
    lines
}

fn outcome_context(outcome: &RunOutcome) -> OutcomeContext {
    match outcome {
        RunOutcome::AlreadyRecorded(day) => OutcomeContext {
            status: "already_recorded",
            day: day.to_string(),
            ..Default::default()
        },
        RunOutcome::Unchanged { day, strings } => OutcomeContext {
            status: "unchanged",
            day: day.to_string(),
            strings: *strings,
            ..Default::default()
        },
        RunOutcome::Recorded(report) => OutcomeContext {
            status: "recorded",
            day: report.snapshot.day.to_string(),
            strings: report.strings,
            files: report.files,
            added: report.diff.added.len(),
            removed: report.diff.removed.len(),
            first_run: report.first_run,
            buckets: bucket_lines(&report.snapshot.counters, !report.first_run),
            failed: report.failed.len(),
        },
    }
}

/// JSON form of an extraction outcome
pub fn outcome_json(outcome: &RunOutcome) -> serde_json::Value {
    match outcome {
        RunOutcome::AlreadyRecorded(day) => json!({
            "status": "already_recorded",
            "day": day,
        }),
        RunOutcome::Unchanged { day, strings } => json!({
            "status": "unchanged",
            "day": day,
            "strings": strings,
        }),
        RunOutcome::Recorded(report) => json!({
            "status": "recorded",
            "id": report.id,
            "day": report.snapshot.day,
            "first_run": report.first_run,
            "strings": report.strings,
            "files": report.files,
            "failed": report.failed,
            "added": report.diff.added.len(),
            "removed": report.diff.removed.len(),
            "counters": report.snapshot.counters,
        }),
    }
}

/// Render the outcome of an extraction run
pub fn render_outcome(outcome: &RunOutcome, output_mode: OutputMode) -> RenderResult {
    let theme = create_theme();
    if output_mode.is_structured() {
        return Ok(render_auto(
            OUTCOME_TEMPLATE,
            &outcome_json(outcome),
            &theme,
            output_mode,
        )?);
    }
    Ok(render_with_output(
        OUTCOME_TEMPLATE,
        &outcome_context(outcome),
        &theme,
        output_mode,
    )?)
}

/// Compute the width of each column, label column first
fn column_widths(table: &StatsTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        let label_width = row.label.chars().count() + if row.nested { 2 } else { 0 };
        if let Some(first) = widths.first_mut() {
            *first = (*first).max(label_width);
        }
        for (i, value) in row.values.iter().enumerate() {
            if let Some(width) = widths.get_mut(i + 1) {
                *width = (*width).max(value.chars().count());
            }
        }
    }
    widths
}

/// Build the report template context, pre-padding every cell
fn table_context(table: &StatsTable) -> ReportTableContext {
    let widths = column_widths(table);
    let name_width = widths.first().copied().unwrap_or(0);

    let columns = table
        .headers
        .iter()
        .zip(&widths)
        .skip(1)
        .map(|(h, &w)| format!("{:>w$}", h))
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let label = if row.nested {
                format!("  {}", row.label)
            } else {
                row.label.clone()
            };
            TemplateRow {
                name: format!("{:<w$}", label, w = name_width),
                cells: row
                    .values
                    .iter()
                    .zip(widths.iter().skip(1))
                    .map(|(value, &w)| format!("{:>w$}", value))
                    .collect(),
            }
        })
        .collect();

    let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

    ReportTableContext {
        title: table.title.clone(),
        name_header: format!(
            "{:<w$}",
            table.headers.first().map(String::as_str).unwrap_or(""),
            w = name_width
        ),
        columns,
        separator: "-".repeat(total_width),
        rows,
        legend: table.legend.clone(),
    }
}

/// Render a report: the query set itself as JSON, a table otherwise
pub fn render_report(queryset: &ReportQuerySet, output_mode: OutputMode) -> RenderResult {
    let theme = create_theme();
    if output_mode.is_structured() {
        return Ok(render_auto(REPORT_TEMPLATE, queryset, &theme, output_mode)?);
    }
    let context = table_context(&StatsTable::from_report_queryset(queryset));
    Ok(render_with_output(
        REPORT_TEMPLATE,
        &context,
        &theme,
        output_mode,
    )?)
}

fn backfill_summary(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::AlreadyRecorded(_) => "already recorded".to_string(),
        RunOutcome::Unchanged { strings, .. } => format!("unchanged ({} strings)", strings),
        RunOutcome::Recorded(report) if report.first_run => {
            format!("recorded {} strings (first day)", report.strings)
        }
        RunOutcome::Recorded(report) => format!(
            "recorded {} strings, +{} / -{}",
            report.strings,
            report.diff.added.len(),
            report.diff.removed.len()
        ),
    }
}

fn backfill_context(days: &[BackfillDay]) -> BackfillContext {
    BackfillContext {
        days: days
            .iter()
            .map(|d| BackfillLine {
                day: d.outcome.day().to_string(),
                commit: d.commit.chars().take(12).collect(),
                summary: backfill_summary(&d.outcome),
            })
            .collect(),
        recorded: days
            .iter()
            .filter(|d| matches!(d.outcome, RunOutcome::Recorded(_)))
            .count(),
        total: days.len(),
    }
}

/// Render the days replayed by a backfill
pub fn render_backfill(days: &[BackfillDay], output_mode: OutputMode) -> RenderResult {
    let theme = create_theme();
    if output_mode.is_structured() {
        let value: Vec<serde_json::Value> = days
            .iter()
            .map(|d| {
                let mut value = outcome_json(&d.outcome);
                value["commit"] = json!(d.commit);
                value
            })
            .collect();
        return Ok(render_auto(
            BACKFILL_TEMPLATE,
            &json!({ "days": value }),
            &theme,
            output_mode,
        )?);
    }
    Ok(render_with_output(
        BACKFILL_TEMPLATE,
        &backfill_context(days),
        &theme,
        output_mode,
    )?)
}
