//! Core data structures for string statistics.
//!
//! A day's snapshot is a fixed-shape record: five buckets (one per
//! [`Category`] plus `total`), each holding six counters:
//!
//! - **base** / **base_words**: strings and words present in the tree
//! - **added** / **added_words**: strings that appeared since the last run
//! - **removed** / **removed_words**: strings that disappeared since the last run
//!
//! `total` mirrors every category except `mobile`. Records are built by
//! folding: [`Counters::record`] consumes a record and returns the updated
//! one, so a record is never shared while it is being filled.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::source::Category;

/// Which pair of counters a string contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Present in the current tree
    Base,
    /// New since the previous run
    Added,
    /// Gone since the previous run
    Removed,
}

/// The six counters of one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    /// Strings in the tree
    pub base: u64,
    /// Words in the tree
    pub base_words: u64,
    /// Strings added
    pub added: u64,
    /// Words in added strings
    pub added_words: u64,
    /// Strings removed
    pub removed: u64,
    /// Words in removed strings
    pub removed_words: u64,
}

impl BucketCounts {
    /// Create a new BucketCounts with all zeros.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one string of `words` words under `measure`.
    pub fn record(mut self, measure: Measure, words: u64) -> Self {
        match measure {
            Measure::Base => {
                self.base += 1;
                self.base_words += words;
            }
            Measure::Added => {
                self.added += 1;
                self.added_words += words;
            }
            Measure::Removed => {
                self.removed += 1;
                self.removed_words += words;
            }
        }
        self
    }

    /// Net change in strings (added minus removed).
    pub fn net(&self) -> i64 {
        self.added as i64 - self.removed as i64
    }

    /// Copy with the added/removed counters cleared.
    pub fn without_changes(self) -> Self {
        Self {
            base: self.base,
            base_words: self.base_words,
            ..Self::default()
        }
    }
}

impl Add for BucketCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            base: self.base + other.base,
            base_words: self.base_words + other.base_words,
            added: self.added + other.added,
            added_words: self.added_words + other.added_words,
            removed: self.removed + other.removed,
            removed_words: self.removed_words + other.removed_words,
        }
    }
}

impl AddAssign for BucketCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// The full counters record of one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Roll-up of every category except mobile
    pub total: BucketCounts,
    pub browser: BucketCounts,
    pub devtools: BucketCounts,
    pub mobile: BucketCounts,
    pub shared: BucketCounts,
}

impl Counters {
    /// Create a new Counters with all zeros.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters of one category.
    pub fn category(&self, category: Category) -> &BucketCounts {
        match category {
            Category::Browser => &self.browser,
            Category::Devtools => &self.devtools,
            Category::Mobile => &self.mobile,
            Category::Shared => &self.shared,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut BucketCounts {
        match category {
            Category::Browser => &mut self.browser,
            Category::Devtools => &mut self.devtools,
            Category::Mobile => &mut self.mobile,
            Category::Shared => &mut self.shared,
        }
    }

    /// Count one string in `category`, mirrored into `total` unless the
    /// category is excluded from it.
    pub fn record(mut self, category: Category, measure: Measure, words: u64) -> Self {
        let bucket = self.category_mut(category);
        *bucket = bucket.record(measure, words);
        if category.counts_toward_total() {
            self.total = self.total.record(measure, words);
        }
        self
    }

    /// Copy with every bucket's added/removed counters cleared.
    pub fn without_changes(self) -> Self {
        Self {
            total: self.total.without_changes(),
            browser: self.browser.without_changes(),
            devtools: self.devtools.without_changes(),
            mobile: self.mobile.without_changes(),
            shared: self.shared.without_changes(),
        }
    }
}

impl Add for Counters {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            browser: self.browser + other.browser,
            devtools: self.devtools + other.devtools,
            mobile: self.mobile + other.mobile,
            shared: self.shared + other.shared,
        }
    }
}

impl AddAssign for Counters {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Counters {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, c| acc + c)
    }
}
