//! # l10nstats
//!
//! A CLI tool that records daily statistics about the localizable strings of a
//! Firefox source tree and reports them per year or month.
//!
//! ## Overview
//!
//! l10nstats is built on top of l10nstatslib. `extract` walks a source tree,
//! compares its strings with the table cached by the previous run and appends
//! the day's counters to a snapshot store. `report` rolls the stored days up
//! into calendar periods. `backfill` replays the history of a git checkout,
//! recording one day per commit date without touching the working tree.
//!
//! ## Usage
//!
//! ```bash
//! # Record today's stats for a mozilla-central checkout
//! l10nstats extract ~/src/mozilla-central
//!
//! # Record stats for a given day, with custom cache and store locations
//! l10nstats extract ~/src/mozilla-central 20240101 --cache cache.json --store db/stats.jsonl
//!
//! # Skip some paths
//! l10nstats extract ~/src/mozilla-central --exclude "**/test/**"
//!
//! # Record every day of 2023 from the history of a checkout
//! l10nstats backfill ~/src/mozilla-central --since 20230101 --until 20231231
//!
//! # Yearly report, with monthly detail, as JSON
//! l10nstats report --monthly --output json
//! ```
//!
//! Logging goes to stderr. Use `-v`/`-vv` or `RUST_LOG` to see more of it.

mod render;

use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use l10nstatslib::{
    run_backfill, run_extraction, BackfillOptions, Day, ExtractOptions, FilterConfig,
    Granularity, JsonlSnapshotStore, ReportOptions, ReportQuerySet, DEFAULT_CACHE_FILE,
    DEFAULT_STORE_FILE,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use render::{parse_output_mode, render_backfill, render_outcome, render_report, OutputMode};

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_parser(["auto", "term", "text", "term-debug", "json"])
        .default_value("auto")
        .help("Output format")
}

fn exclude_arg() -> Arg {
    Arg::new("exclude")
        .short('e')
        .long("exclude")
        .action(ArgAction::Append)
        .help("Exclude files matching glob pattern (can be specified multiple times)")
}

fn store_arg() -> Arg {
    Arg::new("store")
        .short('s')
        .long("store")
        .default_value(DEFAULT_STORE_FILE)
        .help("Snapshot store file")
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("l10nstats")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Daily statistics on the localizable strings of a Firefox source tree")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log more (-v for progress, -vv for per-file details)"),
        )
        .subcommand(
            Command::new("extract")
                .about("Extract today's (or DATE's) stats and record them")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .help("Root of the source tree to analyze"),
                )
                .arg(Arg::new("date").help("Day to record as YYYYMMDD (defaults to today, UTC)"))
                .arg(
                    Arg::new("cache")
                        .short('c')
                        .long("cache")
                        .default_value(DEFAULT_CACHE_FILE)
                        .help("Cached string table of the previous run"),
                )
                .arg(store_arg())
                .arg(exclude_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("backfill")
                .about("Record past days from the git history of a source tree")
                .arg(
                    Arg::new("repo")
                        .required(true)
                        .help("Path inside the git repository to replay"),
                )
                .arg(
                    Arg::new("rev")
                        .long("rev")
                        .default_value("HEAD")
                        .help("Revision whose first-parent history is replayed"),
                )
                .arg(
                    Arg::new("since")
                        .long("since")
                        .help("First day to replay as YYYYMMDD"),
                )
                .arg(
                    Arg::new("until")
                        .long("until")
                        .help("Last day to replay as YYYYMMDD"),
                )
                .arg(
                    Arg::new("cache")
                        .short('c')
                        .long("cache")
                        .help("Write the last replayed table here for later daily runs"),
                )
                .arg(store_arg())
                .arg(exclude_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("report")
                .about("Show yearly rollups of the recorded stats")
                .arg(
                    Arg::new("monthly")
                        .short('m')
                        .long("monthly")
                        .action(ArgAction::SetTrue)
                        .help("Add a monthly breakdown under each year"),
                )
                .arg(
                    Arg::new("since")
                        .long("since")
                        .value_parser(clap::value_parser!(i32))
                        .help("First year to report (defaults to 2015)"),
                )
                .arg(
                    Arg::new("until")
                        .long("until")
                        .help("Last day to report as YYYYMMDD (defaults to today, UTC)"),
                )
                .arg(store_arg())
                .arg(output_arg()),
        )
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Build filter config from matches
fn build_filter(matches: &ArgMatches) -> Result<FilterConfig, anyhow::Error> {
    let mut filter = FilterConfig::new();
    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for pattern in excludes {
            filter = filter.exclude(pattern)?;
        }
    }
    Ok(filter)
}

fn output_mode(matches: &ArgMatches) -> OutputMode {
    matches
        .get_one::<String>("output")
        .map(|s| parse_output_mode(s))
        .unwrap_or(OutputMode::Auto)
}

fn store_path(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("store")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_STORE_FILE)
}

/// Ensure rendered output ends with a newline
fn finish(rendered: String) -> String {
    if rendered.is_empty() || rendered.ends_with('\n') {
        rendered
    } else {
        rendered + "\n"
    }
}

fn parse_day(value: Option<&String>) -> Result<Option<Day>, anyhow::Error> {
    value
        .map(|s| Day::parse(s))
        .transpose()
        .map_err(anyhow::Error::from)
}

/// Handler for extract command
fn extract_handler(matches: &ArgMatches) -> Result<String, anyhow::Error> {
    let path = matches
        .get_one::<String>("path")
        .context("missing source tree path")?;
    let cache = matches
        .get_one::<String>("cache")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_CACHE_FILE);
    let store_path = store_path(matches);
    let mode = output_mode(matches);

    let mut options = ExtractOptions::new(path)
        .cache(cache)
        .filter(build_filter(matches)?);
    if let Some(day) = parse_day(matches.get_one::<String>("date"))? {
        options = options.day(day);
    }
    debug!(?options, store = store_path, "extracting");

    let mut store = JsonlSnapshotStore::new(store_path);
    let outcome = run_extraction(&options, &mut store)?;

    let rendered = render_outcome(&outcome, mode).map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(finish(rendered))
}

/// Handler for backfill command
fn backfill_handler(matches: &ArgMatches) -> Result<String, anyhow::Error> {
    let repo = matches
        .get_one::<String>("repo")
        .context("missing repository path")?;
    let rev = matches
        .get_one::<String>("rev")
        .map(|s| s.as_str())
        .unwrap_or("HEAD");
    let store_path = store_path(matches);
    let mode = output_mode(matches);

    let mut options = BackfillOptions::new(repo)
        .rev(rev)
        .filter(build_filter(matches)?);
    if let Some(day) = parse_day(matches.get_one::<String>("since"))? {
        options = options.since(day);
    }
    if let Some(day) = parse_day(matches.get_one::<String>("until"))? {
        options = options.until(day);
    }
    if let Some(cache) = matches.get_one::<String>("cache") {
        options = options.cache(cache);
    }
    debug!(?options, store = store_path, "backfilling");

    let mut store = JsonlSnapshotStore::new(store_path);
    let days = run_backfill(&options, &mut store)?;

    let rendered = render_backfill(&days, mode).map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(finish(rendered))
}

/// Handler for report command
fn report_handler(matches: &ArgMatches) -> Result<String, anyhow::Error> {
    let store_path = store_path(matches);
    let mode = output_mode(matches);
    let granularity = if matches.get_flag("monthly") {
        Granularity::Monthly
    } else {
        Granularity::Yearly
    };

    let mut options = ReportOptions::new().granularity(granularity);
    if let Some(&year) = matches.get_one::<i32>("since") {
        options = options.from_year(year);
    }
    if let Some(day) = parse_day(matches.get_one::<String>("until"))? {
        options = options.until(day);
    }

    let store = JsonlSnapshotStore::new(store_path);
    let queryset = ReportQuerySet::from_store(&store, &options)?;

    let rendered = render_report(&queryset, mode).map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(finish(rendered))
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("extract", sub)) => extract_handler(sub),
        Some(("report", sub)) => report_handler(sub),
        Some(("backfill", sub)) => backfill_handler(sub),
        _ => Err(anyhow::anyhow!("no command given")),
    };

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_extract_args() {
        let matches = build_command()
            .try_get_matches_from([
                "l10nstats", "extract", "src", "20240101", "-e", "a/**", "-e", "b/**",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "extract");
        assert_eq!(sub.get_one::<String>("date").unwrap(), "20240101");
        assert_eq!(sub.get_one::<String>("cache").unwrap(), DEFAULT_CACHE_FILE);
        assert_eq!(build_filter(sub).unwrap().exclude.len(), 2);
    }

    #[test]
    fn test_report_args() {
        let matches = build_command()
            .try_get_matches_from([
                "l10nstats", "report", "--monthly", "--since", "2020", "-o", "json",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        assert!(sub.get_flag("monthly"));
        assert_eq!(sub.get_one::<i32>("since"), Some(&2020));
        assert!(matches!(output_mode(sub), OutputMode::Json));
    }

    #[test]
    fn test_output_defaults_to_auto() {
        let matches = build_command()
            .try_get_matches_from(["l10nstats", "report"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(matches!(output_mode(sub), OutputMode::Auto));
    }

    #[test]
    fn test_backfill_args() {
        let matches = build_command()
            .try_get_matches_from([
                "l10nstats", "backfill", "repo", "--since", "20230101", "-e", "a/**",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "backfill");
        assert_eq!(sub.get_one::<String>("rev").unwrap(), "HEAD");
        assert!(sub.get_one::<String>("cache").is_none());
        assert_eq!(store_path(sub), DEFAULT_STORE_FILE);
        assert_eq!(build_filter(sub).unwrap().exclude.len(), 1);
    }

    #[test]
    fn test_finish_adds_newline() {
        assert_eq!(finish("a".to_string()), "a\n");
        assert_eq!(finish("a\n".to_string()), "a\n");
        assert_eq!(finish(String::new()), "");
    }

    #[test]
    fn test_invalid_day_is_an_error() {
        let value = "2024-01-01".to_string();
        assert!(parse_day(Some(&value)).is_err());
        assert!(parse_day(None).unwrap().is_none());
    }

    #[test]
    fn test_unknown_output_rejected() {
        let result =
            build_command().try_get_matches_from(["l10nstats", "report", "--output", "csv"]);
        assert!(result.is_err());
    }
}
