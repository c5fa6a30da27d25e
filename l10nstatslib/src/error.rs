//! Error types for l10nstatslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting, storing or reporting string stats
#[derive(Error, Debug)]
pub enum L10nStatsError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File has no supported localization format
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Directory walk failed at the root
    #[error("failed to walk '{path}': {message}")]
    Walk { path: PathBuf, message: String },

    /// Cache file exists but is not a JSON string map
    #[error("invalid cache file '{path}': {source}")]
    CacheFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Snapshot store line could not be decoded
    #[error("invalid snapshot row in '{path}' at line {line}: {message}")]
    StoreFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A snapshot for this day is already stored
    #[error("a snapshot for {0} is already stored")]
    DuplicateDay(String),

    /// Day is not a valid YYYYMMDD date
    #[error("invalid date '{0}': expected YYYYMMDD")]
    InvalidDate(String),

    /// Git repository could not be read
    #[error("git error: {0}")]
    Git(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
