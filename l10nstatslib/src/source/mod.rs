//! Source discovery: find localization files and classify them.
//!
//! This module handles the first stage of the pipeline. It provides:
//!
//! - **File discovery**: walk a source tree for supported formats, skipping
//!   areas that don't belong to the tracked products
//! - **Categories**: map a root-relative path to a product category
//! - **History**: read the tree of past days from a git repository
//!
//! ## Example
//!
//! ```rust,ignore
//! use l10nstatslib::source::{discover_files, Category, FilterConfig};
//!
//! let files = discover_files("mozilla-central", &FilterConfig::new())?;
//! assert_eq!(Category::from_relative_path("mobile/x.dtd"), Category::Mobile);
//! ```

pub mod category;
pub mod filter;
pub mod history;

pub use category::Category;
pub use filter::{discover_files, relative_path, FilterConfig};
pub use history::{daily_commits, open_repository, select_daily, DailyCommit, TreeExtractor};
