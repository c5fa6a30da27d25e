//! Report configuration: period granularity and date range.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::day::Day;

/// First year covered by reports when no earlier bound is given.
pub const FIRST_REPORT_YEAR: i32 = 2015;

/// How finely the report splits time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One summary per calendar year
    #[default]
    Yearly,
    /// One summary per calendar year, each followed by its months
    Monthly,
}

/// A calendar period covered by a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First day, inclusive
    pub start: Day,
    /// Last day, inclusive
    pub end: Day,
    /// Whether this is a month (otherwise a year)
    pub monthly: bool,
}

impl Period {
    /// The calendar year containing `day`.
    pub fn year_of(day: Day) -> Self {
        Self {
            start: day.year_start(),
            end: day.year_end(),
            monthly: false,
        }
    }

    /// The calendar month containing `day`.
    pub fn month_of(day: Day) -> Self {
        Self {
            start: day.month_start(),
            end: day.month_end(),
            monthly: true,
        }
    }

    /// Label such as `2024` or `2024-03`.
    pub fn label(&self) -> String {
        if self.monthly {
            format!("{}-{:02}", self.start.year(), self.start.month())
        } else {
            self.start.year().to_string()
        }
    }

    /// Calendar years from `from` to `to`, both inclusive.
    pub fn years(from: i32, to: i32) -> Vec<Period> {
        (from..=to)
            .filter_map(|year| Day::from_ymd(year, 1, 1))
            .map(Period::year_of)
            .collect()
    }

    /// The months of this period, in order. A month yields itself.
    pub fn months(&self) -> Vec<Period> {
        if self.monthly {
            return vec![*self];
        }
        (1..=12)
            .filter_map(|month| Day::from_ymd(self.start.year(), month, 1))
            .map(Period::month_of)
            .collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Options for building a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub granularity: Granularity,
    /// First year reported
    pub from_year: i32,
    /// Last day considered; today's UTC date when unset
    pub until: Option<Day>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Yearly,
            from_year: FIRST_REPORT_YEAR,
            until: None,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set granularity.
    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Start reporting at `year`.
    pub fn from_year(mut self, year: i32) -> Self {
        self.from_year = year;
        self
    }

    /// Stop reporting at `day`.
    pub fn until(mut self, day: Day) -> Self {
        self.until = Some(day);
        self
    }

    /// The last day this report considers.
    pub fn resolved_until(&self) -> Day {
        self.until.unwrap_or_else(Day::today_utc)
    }
}
