//! File filtering and discovery of localization files.
//!
//! Only files with a supported extension are considered, and whole areas of
//! the tree that don't ship with the browser (mail, calendar, ...) are left
//! out. Extra glob exclusions can be layered on top.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::L10nStatsError;
use crate::Result;

/// File name suffixes of the supported localization formats.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = [".dtd", ".ftl", ".inc", ".ini", ".properties"];

/// Top-level folders unrelated to the browser products.
pub const EXCLUDED_FOLDERS: [&str; 7] = [
    "calendar",
    "chat",
    "editor",
    "extensions",
    "mail",
    "other-licenses",
    "suite",
];

/// File name suffixes that are never counted.
pub const EXCLUDED_SUFFIXES: [&str; 1] = ["region.properties"];

/// Configuration for file filtering.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// File name suffixes to include
    pub extensions: Vec<String>,
    /// Relative path prefixes to skip
    pub excluded_folders: Vec<String>,
    /// File name suffixes to skip
    pub excluded_suffixes: Vec<String>,
    /// Additional glob patterns to skip, matched against the relative path
    pub exclude: Vec<Pattern>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            excluded_folders: EXCLUDED_FOLDERS.iter().map(|s| s.to_string()).collect(),
            excluded_suffixes: EXCLUDED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Create the default filter config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        let pat = Pattern::new(pattern).map_err(|e| L10nStatsError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.exclude.push(pat);
        Ok(self)
    }

    /// Whether a file name has one of the supported extensions.
    pub fn is_supported(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    /// Whether a root-relative path falls into an excluded area.
    ///
    /// Folder exclusion is a plain prefix test on the relative path, so
    /// `mail` also covers `mailnews/`.
    pub fn is_excluded(&self, relative: &str) -> bool {
        if self
            .excluded_folders
            .iter()
            .any(|folder| relative.starts_with(folder.as_str()))
        {
            return true;
        }
        if self
            .excluded_suffixes
            .iter()
            .any(|suffix| relative.ends_with(suffix.as_str()))
        {
            return true;
        }
        self.exclude.iter().any(|pattern| pattern.matches(relative))
    }

    /// Check if a root-relative path should be analyzed.
    pub fn matches(&self, relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        self.is_supported(file_name) && !self.is_excluded(relative)
    }
}

/// Path of `path` relative to `root`, always using `/` as separator.
///
/// Returns `None` when `path` is not under `root`.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Discover localization files under a directory.
///
/// Walks the tree following symlinks and returns every file accepted by
/// `filter`, sorted so that identical trees always yield identical lists.
pub fn discover_files(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(L10nStatsError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(L10nStatsError::Walk {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(root).follow_links(true).into_iter();

    for entry in walker.filter_entry(|e| {
        // Prune excluded areas at the top level instead of walking them
        if e.depth() == 1 && e.file_type().is_dir() {
            let name = e.file_name().to_string_lossy();
            return !filter
                .excluded_folders
                .iter()
                .any(|folder| name.starts_with(folder.as_str()));
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(L10nStatsError::Walk {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        match relative_path(root, path) {
            Some(rel) if filter.matches(&rel) => files.push(path.to_path_buf()),
            _ => {}
        }
    }

    // Sort for deterministic output
    files.sort();

    Ok(files)
}
