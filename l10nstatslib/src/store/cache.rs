//! The string table of the previous run, kept as a JSON file.
//!
//! The file is a single JSON object mapping identity to raw value, with keys
//! in sorted order so identical tables produce identical bytes.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::data::StringTable;
use crate::error::L10nStatsError;
use crate::Result;

/// Location of the cached string table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached table. A missing file is an empty table.
    pub fn load(&self) -> Result<StringTable> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file, starting from an empty baseline");
                return Ok(StringTable::new());
            }
            Err(e) => {
                return Err(L10nStatsError::FileRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| L10nStatsError::CacheFormat {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Replace the cache with `table`.
    ///
    /// The table is written to a temporary file next to the cache and then
    /// renamed over it.
    pub fn save(&self, table: &StringTable) -> Result<()> {
        let write_err = |source: std::io::Error| L10nStatsError::FileWrite {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(write_err)?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, table)?;
            writer.flush().map_err(write_err)?;
        }
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), strings = table.len(), "cache saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_cache_is_empty() {
        let temp = tempdir().unwrap();
        let cache = CacheFile::new(temp.path().join("cache.json"));

        assert!(cache.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().unwrap();
        let cache = CacheFile::new(temp.path().join("nested/cache.json"));
        let table: StringTable = [("b.ftl:z", "Zed"), ("a.dtd:x", "<b>X</b>")]
            .into_iter()
            .collect();

        cache.save(&table).unwrap();
        assert_eq!(cache.load().unwrap(), table);
    }

    #[test]
    fn test_saved_keys_are_sorted() {
        let temp = tempdir().unwrap();
        let cache = CacheFile::new(temp.path().join("cache.json"));
        let table: StringTable = [("z:1", "last"), ("a:1", "first")].into_iter().collect();

        cache.save(&table).unwrap();
        let content = fs::read_to_string(cache.path()).unwrap();
        assert_eq!(content, r#"{"a:1":"first","z:1":"last"}"#);
    }

    #[test]
    fn test_save_overwrites() {
        let temp = tempdir().unwrap();
        let cache = CacheFile::new(temp.path().join("cache.json"));

        cache.save(&[("a:1", "one")].into_iter().collect()).unwrap();
        cache.save(&[("b:2", "two")].into_iter().collect()).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("b:2"), Some("two"));
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cache.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = CacheFile::new(&path).load();
        assert!(matches!(result, Err(L10nStatsError::CacheFormat { .. })));
    }
}
