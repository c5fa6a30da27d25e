//! The string table: every localizable string of a tree, keyed by identity.
//!
//! A table is rebuilt from scratch on every run. Files are visited in sorted
//! order and keys are kept sorted, so an unchanged tree always produces the
//! same table and the same serialized cache.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::source::{discover_files, relative_path, Category, FilterConfig};
use crate::Result;

use super::entry::{Format, ParsedItem};
use super::parse::parse_file;
use super::stats::{Counters, Measure};
use super::words::count_words;

/// Mapping of string identity to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    strings: BTreeMap<String, String>,
}

impl StringTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a string; an existing identity is overwritten.
    pub fn insert(&mut self, identity: impl Into<String>, raw_value: impl Into<String>) {
        self.strings.insert(identity.into(), raw_value.into());
    }

    pub fn get(&self, identity: &str) -> Option<&str> {
        self.strings.get(identity).map(String::as_str)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.strings.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Identities in sorted order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    /// Whether both tables hold exactly the same identities.
    ///
    /// Values are not compared: an edited string keeps its identity.
    pub fn same_identities(&self, other: &StringTable) -> bool {
        self.strings.len() == other.strings.len()
            && self.strings.keys().eq(other.strings.keys())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

/// Result of extracting strings from a tree.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Every string found
    pub table: StringTable,
    /// Static totals (`base` / `base_words` of every bucket)
    pub totals: Counters,
    /// Number of files parsed successfully
    pub files: usize,
    /// Files skipped because they couldn't be read or parsed
    pub failed: Vec<PathBuf>,
}

/// Walk `root` and extract the string table with its static totals.
pub fn build_string_table(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<Extraction> {
    let root = root.as_ref();
    let files = discover_files(root, filter)?;
    debug!(root = %root.display(), files = files.len(), "discovered localization files");
    Ok(extract_files(root, &files, filter))
}

/// Extract strings from an explicit list of files under `root`.
///
/// Files outside `root` or in excluded areas are ignored even if listed.
/// A file that fails to read or parse is logged and skipped.
pub fn extract_files(root: &Path, files: &[PathBuf], filter: &FilterConfig) -> Extraction {
    let mut extraction = Extraction::default();

    for path in files {
        let Some(relative) = relative_path(root, path) else {
            continue;
        };
        if filter.is_excluded(&relative) {
            continue;
        }

        let (format, items) = match parse_file(path) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping file that could not be parsed");
                extraction.failed.push(path.clone());
                continue;
            }
        };

        extraction.add_file(&relative, format, &items);
    }

    extraction
}

impl Extraction {
    /// Fold the parsed items of one file into the table and totals.
    pub fn add_file(&mut self, relative: &str, format: Format, items: &[ParsedItem]) {
        let category = Category::from_relative_path(relative);
        self.totals = fold_items(self.totals, &mut self.table, relative, category, format, items);
        self.files += 1;
    }
}

/// Store every unit of `items` in `table` and count it in `totals`.
fn fold_items(
    totals: Counters,
    table: &mut StringTable,
    relative: &str,
    category: Category,
    format: Format,
    items: &[ParsedItem],
) -> Counters {
    items
        .iter()
        .filter_map(|item| match item {
            ParsedItem::Entry(entry) => Some(entry),
            ParsedItem::Junk(_) => None,
        })
        .flat_map(|entry| entry.units(relative))
        .fold(totals, |acc, (identity, raw_value)| {
            let words = count_words(&raw_value, format);
            table.insert(identity, raw_value);
            acc.record(category, Measure::Base, words)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn create_tree(root: &Path) {
        write(
            root,
            "browser/locales/en-US/browser.properties",
            "# comment\nnewTab = Open a new tab\nclose = Close\n",
        );
        write(
            root,
            "browser/devtools/client/inspector.ftl",
            "inspector-title = Page Inspector\nsearch =\n    .placeholder = Search HTML\n",
        );
        write(root, "mobile/android/base/strings.dtd", "<!ENTITY ok \"OK\">\n");
        write(root, "toolkit/crashreporter/crash.ini", "[Strings]\nTitle=Crash Reporter\n");
        write(root, "mail/chrome/messenger.dtd", "<!ENTITY mail \"Mail\">\n");
    }

    #[test]
    fn test_build_string_table() {
        let temp = tempdir().unwrap();
        create_tree(temp.path());

        let extraction = build_string_table(temp.path(), &FilterConfig::new()).unwrap();
        let ids: Vec<&str> = extraction.table.identities().collect();

        assert_eq!(
            ids,
            vec![
                "browser/devtools/client/inspector.ftl:inspector-title",
                "browser/devtools/client/inspector.ftl:search.placeholder",
                "browser/locales/en-US/browser.properties:close",
                "browser/locales/en-US/browser.properties:newTab",
                "mobile/android/base/strings.dtd:ok",
                "toolkit/crashreporter/crash.ini:Title",
            ]
        );
        assert_eq!(
            extraction
                .table
                .get("browser/locales/en-US/browser.properties:newTab"),
            Some("Open a new tab")
        );
        assert_eq!(extraction.files, 4);
        assert!(extraction.failed.is_empty());
    }

    #[test]
    fn test_static_totals_by_category() {
        let temp = tempdir().unwrap();
        create_tree(temp.path());

        let totals = build_string_table(temp.path(), &FilterConfig::new())
            .unwrap()
            .totals;

        assert_eq!(totals.browser.base, 2);
        assert_eq!(totals.browser.base_words, 5);
        assert_eq!(totals.devtools.base, 2);
        assert_eq!(totals.devtools.base_words, 4);
        assert_eq!(totals.mobile.base, 1);
        assert_eq!(totals.mobile.base_words, 1);
        assert_eq!(totals.shared.base, 1);
        assert_eq!(totals.shared.base_words, 2);
        // total leaves mobile out
        assert_eq!(totals.total.base, 5);
        assert_eq!(totals.total.base_words, 11);
        assert_eq!(totals.total.added, 0);
    }

    #[test]
    fn test_build_is_deterministic() {
        let temp = tempdir().unwrap();
        create_tree(temp.path());

        let first = build_string_table(temp.path(), &FilterConfig::new()).unwrap();
        let second = build_string_table(temp.path(), &FilterConfig::new()).unwrap();

        assert_eq!(first.table, second.table);
        assert_eq!(first.totals, second.totals);
    }

    #[test]
    fn test_junk_is_skipped() {
        let temp = tempdir().unwrap();
        write(
            temp.path(),
            "toolkit/a.properties",
            "= orphan value\nreal = Real string\n",
        );

        let extraction = build_string_table(temp.path(), &FilterConfig::new()).unwrap();
        assert_eq!(extraction.table.len(), 1);
        assert_eq!(extraction.totals.shared.base, 1);
    }

    #[test]
    fn test_unreadable_file_does_not_abort() {
        let temp = tempdir().unwrap();
        write(temp.path(), "toolkit/good.properties", "a = Good\n");
        let bad = temp.path().join("toolkit/bad.properties");
        fs::write(&bad, [0xff, 0xfe, 0x00]).unwrap();

        let extraction = build_string_table(temp.path(), &FilterConfig::new()).unwrap();
        assert_eq!(extraction.table.len(), 1);
        assert_eq!(extraction.failed, vec![bad]);
    }

    #[test]
    fn test_extract_files_rechecks_exclusions() {
        let temp = tempdir().unwrap();
        create_tree(temp.path());

        let files = vec![
            temp.path().join("mail/chrome/messenger.dtd"),
            temp.path().join("mobile/android/base/strings.dtd"),
        ];
        let extraction = extract_files(temp.path(), &files, &FilterConfig::new());

        assert_eq!(extraction.table.len(), 1);
        assert!(extraction.table.contains("mobile/android/base/strings.dtd:ok"));
    }

    #[test]
    fn test_later_identity_wins() {
        let temp = tempdir().unwrap();
        write(temp.path(), "toolkit/dup.properties", "key = first\nkey = second value\n");

        let extraction = build_string_table(temp.path(), &FilterConfig::new()).unwrap();
        assert_eq!(extraction.table.get("toolkit/dup.properties:key"), Some("second value"));
        assert_eq!(extraction.totals.shared.base, 2);
    }

    #[test]
    fn test_add_file_without_a_walk() {
        let items = Format::Fluent.parse("menu = Menu\n    .accesskey = M\n");
        let mut extraction = Extraction::default();
        extraction.add_file("browser/menu.ftl", Format::Fluent, &items);

        assert_eq!(extraction.files, 1);
        assert_eq!(extraction.table.get("browser/menu.ftl:menu.accesskey"), Some("M"));
        assert_eq!(extraction.totals.browser.base, 2);
        assert_eq!(extraction.totals.total.base, 2);
    }

    #[test]
    fn test_same_identities_ignores_values() {
        let a: StringTable = [("x:a", "one"), ("x:b", "two")].into_iter().collect();
        let b: StringTable = [("x:a", "uno"), ("x:b", "dos")].into_iter().collect();
        let c: StringTable = [("x:a", "one")].into_iter().collect();

        assert!(a.same_identities(&b));
        assert!(!a.same_identities(&c));
    }
}
