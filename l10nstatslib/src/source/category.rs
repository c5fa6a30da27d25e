//! Product categories derived from a file's location in the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The product area a localization file belongs to.
///
/// The category comes from the top-level directory of the file, relative to
/// the root of the source tree:
///
/// - `browser/...` → `Browser`, unless the path also contains `devtools/`
/// - `devtools/...` → `Devtools`
/// - `mobile/...` → `Mobile`
/// - anything else → `Shared`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Desktop browser front-end
    Browser,
    /// Developer tools, including the ones living under `browser/`
    Devtools,
    /// Mobile products; excluded from the `total` roll-up
    Mobile,
    /// Everything else (toolkit, dom, netwerk, ...)
    Shared,
}

impl Category {
    /// All categories, in storage column order.
    pub const ALL: [Category; 4] = [
        Category::Browser,
        Category::Devtools,
        Category::Mobile,
        Category::Shared,
    ];

    /// Determine the category from a root-relative path using `/` separators.
    pub fn from_relative_path(path: &str) -> Self {
        let top = path.split('/').next().unwrap_or("");
        match top {
            "browser" if path.contains("devtools/") => Self::Devtools,
            "browser" => Self::Browser,
            "devtools" => Self::Devtools,
            "mobile" => Self::Mobile,
            _ => Self::Shared,
        }
    }

    /// Whether strings in this category are mirrored into the `total` bucket.
    pub fn counts_toward_total(self) -> bool {
        self != Self::Mobile
    }

    /// Lowercase name, also used as the storage column prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Devtools => "devtools",
            Self::Mobile => "mobile",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_categories() {
        assert_eq!(
            Category::from_relative_path("browser/foo.properties"),
            Category::Browser
        );
        assert_eq!(Category::from_relative_path("mobile/x.dtd"), Category::Mobile);
        assert_eq!(
            Category::from_relative_path("devtools/client/x.properties"),
            Category::Devtools
        );
        assert_eq!(Category::from_relative_path("toolkit/y.ini"), Category::Shared);
    }

    #[test]
    fn test_devtools_under_browser() {
        assert_eq!(
            Category::from_relative_path("browser/devtools/foo.ftl"),
            Category::Devtools
        );
        assert_eq!(
            Category::from_relative_path("browser/locales/en-US/devtools/x.dtd"),
            Category::Devtools
        );
    }

    #[test]
    fn test_devtools_override_only_applies_to_browser() {
        assert_eq!(
            Category::from_relative_path("toolkit/devtools/x.ftl"),
            Category::Shared
        );
        assert_eq!(
            Category::from_relative_path("mobile/devtools/x.ftl"),
            Category::Mobile
        );
    }

    #[test]
    fn test_segment_must_match_exactly() {
        assert_eq!(Category::from_relative_path("browsers/a.ftl"), Category::Shared);
        assert_eq!(Category::from_relative_path("a.ftl"), Category::Shared);
        assert_eq!(Category::from_relative_path(""), Category::Shared);
    }

    #[test]
    fn test_total_excludes_mobile() {
        assert!(Category::Browser.counts_toward_total());
        assert!(Category::Devtools.counts_toward_total());
        assert!(Category::Shared.counts_toward_total());
        assert!(!Category::Mobile.counts_toward_total());
    }
}
