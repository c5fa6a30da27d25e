//! Git history as a source of past trees.
//!
//! A backfill replays a repository one day at a time. The newest commit of
//! each day along the first-parent chain stands for that day's tree, and its
//! files are read straight from the object database without a checkout.

use std::collections::hash_map::Entry as MapEntry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::DateTime;
use tracing::{debug, warn};

use crate::data::{Extraction, Format, ParsedItem};
use crate::day::Day;
use crate::error::L10nStatsError;
use crate::Result;

use super::filter::FilterConfig;

/// The commit recorded for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCommit {
    pub day: Day,
    pub id: gix::ObjectId,
}

/// Open the repository containing `path`.
pub fn open_repository(path: impl AsRef<Path>) -> Result<gix::Repository> {
    gix::discover(path.as_ref())
        .map_err(|e| L10nStatsError::Git(format!("Failed to discover git repository: {}", e)))
}

/// Resolve a revision (`HEAD`, a branch, a hash) to a commit
fn resolve_commit<'repo>(repo: &'repo gix::Repository, rev: &str) -> Result<gix::Commit<'repo>> {
    let id = repo
        .rev_parse_single(rev.as_bytes())
        .map_err(|e| L10nStatsError::Git(format!("Failed to resolve '{}': {}", rev, e)))?
        .detach();

    repo.find_commit(id)
        .map_err(|e| L10nStatsError::Git(format!("Failed to find commit '{}': {}", rev, e)))
}

/// Day of a commit, in the committer's own time zone.
fn commit_day(commit: &gix::Commit<'_>) -> Result<Day> {
    let time = commit
        .time()
        .map_err(|e| L10nStatsError::Git(format!("Failed to read time of {}: {}", commit.id, e)))?;
    let local = time.seconds + i64::from(time.offset);
    let date = DateTime::from_timestamp(local, 0)
        .ok_or_else(|| L10nStatsError::Git(format!("Commit {} has an invalid time", commit.id)))?;
    Ok(Day::from(date.date_naive()))
}

/// Keep the newest commit of each day within `since..=until`, oldest day first.
///
/// `commits` must come newest first, the way a first-parent walk yields them.
pub fn select_daily<T>(
    commits: impl IntoIterator<Item = (Day, T)>,
    since: Option<Day>,
    until: Option<Day>,
) -> Vec<(Day, T)> {
    let mut days = BTreeMap::new();
    for (day, commit) in commits {
        if since.is_some_and(|s| day < s) || until.is_some_and(|u| day > u) {
            continue;
        }
        days.entry(day).or_insert(commit);
    }
    days.into_iter().collect()
}

/// One commit per day from the first-parent history of `rev`.
pub fn daily_commits(
    repo: &gix::Repository,
    rev: &str,
    since: Option<Day>,
    until: Option<Day>,
) -> Result<Vec<DailyCommit>> {
    let mut commit = resolve_commit(repo, rev)?;
    let mut walked = Vec::new();

    loop {
        walked.push((commit_day(&commit)?, commit.id));
        let parent = commit.parent_ids().next().map(|id| id.detach());
        let Some(parent) = parent else {
            break;
        };
        commit = repo
            .find_commit(parent)
            .map_err(|e| L10nStatsError::Git(format!("Failed to find commit {}: {}", parent, e)))?;
    }
    debug!(rev, commits = walked.len(), "walked first-parent history");

    Ok(select_daily(walked, since, until)
        .into_iter()
        .map(|(day, id)| DailyCommit { day, id })
        .collect())
}

/// Builds extractions from commit trees.
///
/// Parsed blobs are kept between calls, so a file that didn't change since
/// the previous day is not parsed again. Only blobs of the latest tree stay.
pub struct TreeExtractor<'repo> {
    repo: &'repo gix::Repository,
    filter: FilterConfig,
    parsed: HashMap<(gix::ObjectId, Format), Option<Vec<ParsedItem>>>,
}

impl<'repo> TreeExtractor<'repo> {
    pub fn new(repo: &'repo gix::Repository, filter: &FilterConfig) -> Self {
        Self {
            repo,
            filter: filter.clone(),
            parsed: HashMap::new(),
        }
    }

    /// Extract the string table of the tree at `commit`.
    pub fn extract(&mut self, commit: gix::ObjectId) -> Result<Extraction> {
        let tree = self
            .repo
            .find_commit(commit)
            .map_err(|e| L10nStatsError::Git(format!("Failed to find commit {}: {}", commit, e)))?
            .tree()
            .map_err(|e| L10nStatsError::Git(format!("Failed to get tree of {}: {}", commit, e)))?;

        let mut files = Vec::new();
        collect_blobs(self.repo, &tree, "", &self.filter, &mut files)?;
        files.sort();

        let mut extraction = Extraction::default();
        let mut seen = HashSet::new();
        for (relative, oid) in files {
            let Ok(format) = Format::from_path(Path::new(&relative)) else {
                continue;
            };
            seen.insert((oid, format));
            let items = match self.parsed.entry((oid, format)) {
                MapEntry::Occupied(entry) => entry.into_mut(),
                MapEntry::Vacant(entry) => entry.insert(read_items(self.repo, oid, format, &relative)),
            };
            match items {
                Some(items) => extraction.add_file(&relative, format, items),
                None => extraction.failed.push(PathBuf::from(&relative)),
            }
        }
        self.parsed.retain(|key, _| seen.contains(key));

        Ok(extraction)
    }
}

/// Recursively collect `(relative path, blob id)` of every accepted file
fn collect_blobs(
    repo: &gix::Repository,
    tree: &gix::Tree<'_>,
    prefix: &str,
    filter: &FilterConfig,
    files: &mut Vec<(String, gix::ObjectId)>,
) -> Result<()> {
    for entry in tree.iter() {
        let entry = entry
            .map_err(|e| L10nStatsError::Git(format!("Failed to read tree entry: {}", e)))?;

        let name = entry.filename().to_string();
        let relative = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", prefix, name)
        };

        if entry.mode().is_blob() {
            if filter.matches(&relative) {
                files.push((relative, entry.oid().to_owned()));
            }
        } else if entry.mode().is_tree() {
            // Excluded areas are pruned at the top level, as in a walk
            if prefix.is_empty()
                && filter
                    .excluded_folders
                    .iter()
                    .any(|folder| name.starts_with(folder.as_str()))
            {
                continue;
            }
            let subtree = repo
                .find_object(entry.oid())
                .map_err(|e| L10nStatsError::Git(format!("Failed to find tree: {}", e)))?
                .try_into_tree()
                .map_err(|_| L10nStatsError::Git("Object is not a tree".to_string()))?;
            collect_blobs(repo, &subtree, &relative, filter, files)?;
        }
    }
    Ok(())
}

/// Read and parse one blob. `None` when it can't be read as UTF-8 text.
fn read_items(
    repo: &gix::Repository,
    oid: gix::ObjectId,
    format: Format,
    relative: &str,
) -> Option<Vec<ParsedItem>> {
    let blob = match repo.find_object(oid).map(|object| object.try_into_blob()) {
        Ok(Ok(blob)) => blob,
        _ => {
            warn!(path = relative, %oid, "skipping file whose blob could not be read");
            return None;
        }
    };
    let content = match String::from_utf8(blob.data.to_vec()) {
        Ok(content) => content,
        Err(_) => {
            warn!(path = relative, "skipping file that is not valid UTF-8");
            return None;
        }
    };
    let source = content.strip_prefix('\u{feff}').unwrap_or(&content);
    Some(format.parse(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::tempdir;

    fn day(s: &str) -> Day {
        Day::parse(s).unwrap()
    }

    /// Run git in `dir` with a fixed identity and date. False if git is unavailable.
    fn git(dir: &Path, args: &[&str], date: &str) -> bool {
        Command::new("git")
            .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn commit_file(dir: &Path, relative: &str, content: &str, date: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        assert!(git(dir, &["add", "-A"], date));
        assert!(git(dir, &["commit", "-q", "-m", "update"], date));
    }

    #[test]
    fn test_select_daily_keeps_newest_per_day() {
        let walked = vec![
            (day("20240103"), "c4"),
            (day("20240101"), "c3"),
            (day("20240101"), "c2"),
            (day("20231231"), "c1"),
        ];

        let selected = select_daily(walked.clone(), None, None);
        assert_eq!(
            selected,
            vec![
                (day("20231231"), "c1"),
                (day("20240101"), "c3"),
                (day("20240103"), "c4"),
            ]
        );

        let bounded = select_daily(walked, Some(day("20240101")), Some(day("20240102")));
        assert_eq!(bounded, vec![(day("20240101"), "c3")]);
    }

    #[test]
    fn test_open_repository_outside_git() {
        let temp = tempdir().unwrap();
        let result = open_repository(temp.path());
        assert!(matches!(result, Err(L10nStatsError::Git(_))));
    }

    #[test]
    fn test_daily_commits_and_tree_extraction() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        if !git(dir, &["init", "-q"], "2024-01-01T09:00:00+00:00") {
            return;
        }
        commit_file(
            dir,
            "browser/locales/tabs.properties",
            "open = Open a tab\n",
            "2024-01-01T10:00:00+00:00",
        );
        commit_file(
            dir,
            "browser/locales/tabs.properties",
            "open = Open a tab\nclose = Close the tab\n",
            "2024-01-01T18:00:00+00:00",
        );
        commit_file(
            dir,
            "mail/locales/mail.properties",
            "ignored = Not counted\n",
            "2024-01-03T12:00:00+00:00",
        );

        let repo = open_repository(dir).unwrap();
        let commits = daily_commits(&repo, "HEAD", None, None).unwrap();
        let days: Vec<String> = commits.iter().map(|c| c.day.to_string()).collect();
        assert_eq!(days, vec!["20240101", "20240103"]);

        let mut extractor = TreeExtractor::new(&repo, &FilterConfig::new());
        let first = extractor.extract(commits[0].id).unwrap();
        assert_eq!(first.table.len(), 2);
        assert_eq!(first.totals.browser.base_words, 6);

        let second = extractor.extract(commits[1].id).unwrap();
        assert_eq!(second.table, first.table);
        assert_eq!(second.files, 1);
    }
}
