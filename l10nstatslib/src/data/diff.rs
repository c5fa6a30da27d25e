//! Identity diff between two string tables.
//!
//! Only identities are compared. A string whose text changed but whose file
//! and name didn't is the same string, so it is neither added nor removed.

use serde::{Deserialize, Serialize};

use super::table::StringTable;

/// Identities added and removed between a cached table and the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDiff {
    /// In the current table but not in the cache, sorted
    pub added: Vec<String>,
    /// In the cache but not in the current table, sorted
    pub removed: Vec<String>,
}

impl SnapshotDiff {
    /// Create a new empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing was added or removed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Net change in string count.
    pub fn net(&self) -> i64 {
        self.added.len() as i64 - self.removed.len() as i64
    }
}

/// Diff `current` against `cache`.
///
/// Both tables iterate in identity order, so the result is sorted and the
/// same pair of tables always yields the same diff.
pub fn diff_tables(current: &StringTable, cache: &StringTable) -> SnapshotDiff {
    SnapshotDiff {
        added: difference(current, cache),
        removed: difference(cache, current),
    }
}

fn difference(universe: &StringTable, other: &StringTable) -> Vec<String> {
    universe
        .identities()
        .filter(|id| !other.contains(id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn table(ids: &[&str]) -> StringTable {
        ids.iter().map(|id| (*id, "value")).collect()
    }

    #[test]
    fn test_diff_same_table_is_empty() {
        let a = table(&["f:a", "f:b", "g:c"]);

        let diff = diff_tables(&a, &a);
        assert!(diff.is_empty());
        assert_eq!(diff.net(), 0);
    }

    #[test]
    fn test_diff_added_and_removed() {
        let current = table(&["f:a", "f:c", "g:d"]);
        let cache = table(&["f:a", "f:b"]);

        let diff = diff_tables(&current, &cache);
        assert_eq!(diff.added, vec!["f:c", "g:d"]);
        assert_eq!(diff.removed, vec!["f:b"]);
        assert_eq!(diff.net(), 1);
    }

    #[test]
    fn test_content_edit_is_invisible() {
        let current: StringTable = [("f:a", "new text")].into_iter().collect();
        let cache: StringTable = [("f:a", "old text")].into_iter().collect();

        assert!(diff_tables(&current, &cache).is_empty());
    }

    #[test]
    fn test_empty_cache_marks_everything_added() {
        let current = table(&["f:a", "f:b"]);

        let diff = diff_tables(&current, &StringTable::new());
        assert_eq!(diff.added.len(), 2);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_set_arithmetic_is_consistent() {
        let current = table(&["a:1", "a:2", "b:1", "c:9"]);
        let cache = table(&["a:1", "b:1", "b:2", "d:4"]);
        let diff = diff_tables(&current, &cache);

        let added: BTreeSet<&str> = diff.added.iter().map(String::as_str).collect();
        let removed: BTreeSet<&str> = diff.removed.iter().map(String::as_str).collect();
        assert!(added.is_disjoint(&removed));

        // current = cache - removed + added
        let rebuilt: BTreeSet<&str> = cache
            .identities()
            .filter(|id| !removed.contains(id))
            .chain(added.iter().copied())
            .collect();
        let expected: BTreeSet<&str> = current.identities().collect();
        assert_eq!(rebuilt, expected);
    }
}
