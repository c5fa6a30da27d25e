//! Folding a diff into the day's counters.
//!
//! Added strings are counted with their current text. Removed strings no
//! longer exist in the tree, so their words come from the cached text.

use crate::source::Category;

use super::diff::SnapshotDiff;
use super::entry::identity_file;
use super::stats::{Counters, Measure};
use super::table::StringTable;
use super::words::{count_fluent_words, count_plain_words};

/// Word count of a stored string, using the counter of its file's format.
pub fn identity_words(identity: &str, raw_value: &str) -> u64 {
    if identity_file(identity).ends_with(".ftl") {
        count_fluent_words(raw_value)
    } else {
        count_plain_words(raw_value)
    }
}

/// Category of a stored string, from the file part of its identity.
pub fn identity_category(identity: &str) -> Category {
    Category::from_relative_path(identity_file(identity))
}

/// Count `identities` under `measure`, reading their text from `source`.
///
/// Identities missing from `source` are counted with zero words.
pub fn fold_identities<'a>(
    counters: Counters,
    identities: impl IntoIterator<Item = &'a String>,
    source: &StringTable,
    measure: Measure,
) -> Counters {
    identities.into_iter().fold(counters, |acc, identity| {
        let words = source
            .get(identity)
            .map_or(0, |raw| identity_words(identity, raw));
        acc.record(identity_category(identity), measure, words)
    })
}

/// Fold a diff into `totals`: added strings from `current`, removed strings
/// from `cache`.
pub fn accumulate_changes(
    totals: Counters,
    diff: &SnapshotDiff,
    current: &StringTable,
    cache: &StringTable,
) -> Counters {
    let counters = fold_identities(totals, &diff.added, current, Measure::Added);
    fold_identities(counters, &diff.removed, cache, Measure::Removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::diff::diff_tables;

    #[test]
    fn test_identity_category() {
        assert_eq!(identity_category("browser/a.ftl:x"), Category::Browser);
        assert_eq!(identity_category("browser/devtools/a.ftl:x.label"), Category::Devtools);
        assert_eq!(identity_category("mobile/a.dtd:x"), Category::Mobile);
        assert_eq!(identity_category("dom/a.properties:x"), Category::Shared);
    }

    #[test]
    fn test_identity_words_by_format() {
        assert_eq!(identity_words("a.ftl:x", "Hi { $name } there"), 2);
        assert_eq!(identity_words("a.properties:x", "Hi { $name } there"), 5);
    }

    #[test]
    fn test_added_from_current_removed_from_cache() {
        let current: StringTable = [
            ("browser/a.properties:kept", "Kept string"),
            ("browser/a.properties:new", "Brand new string here"),
        ]
        .into_iter()
        .collect();
        let cache: StringTable = [
            ("browser/a.properties:kept", "Kept string"),
            ("mobile/b.dtd:gone", "Three words gone"),
        ]
        .into_iter()
        .collect();

        let diff = diff_tables(&current, &cache);
        let counters = accumulate_changes(Counters::new(), &diff, &current, &cache);

        assert_eq!(counters.browser.added, 1);
        assert_eq!(counters.browser.added_words, 4);
        assert_eq!(counters.mobile.removed, 1);
        assert_eq!(counters.mobile.removed_words, 3);
        assert_eq!(counters.total.added, 1);
        assert_eq!(counters.total.removed, 0);
        assert_eq!(counters.total.removed_words, 0);
    }

    #[test]
    fn test_accumulate_keeps_static_totals() {
        let totals = Counters::new().record(Category::Shared, Measure::Base, 10);
        let current: StringTable = [("toolkit/a.ini:k", "one two")].into_iter().collect();

        let diff = diff_tables(&current, &StringTable::new());
        let counters = accumulate_changes(totals, &diff, &current, &StringTable::new());

        assert_eq!(counters.shared.base, 1);
        assert_eq!(counters.shared.base_words, 10);
        assert_eq!(counters.shared.added, 1);
        assert_eq!(counters.shared.added_words, 2);
    }

    #[test]
    fn test_empty_diff_changes_nothing() {
        let totals = Counters::new().record(Category::Browser, Measure::Base, 3);
        let table: StringTable = [("browser/a.ftl:x", "a b c")].into_iter().collect();

        let counters = accumulate_changes(totals, &diff_tables(&table, &table), &table, &table);
        assert_eq!(counters, totals);
    }
}
