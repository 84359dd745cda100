// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Codebase backed by a directory on local disk

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::{path_depth, Codebase};
use crate::errors::{InferError, InferResult};

/// Directory levels below the root that are descended into
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Upper bound on listed entries, to stay cheap on huge repositories
pub const MAX_FILES: usize = 250_000;

const SKIPPED_DIRS: &[&str] = &[".git", "node_modules"];

/// A [`Codebase`] for files available on local disk
///
/// The directory is walked once, when the codebase is opened.
#[derive(Debug, Clone)]
pub struct LocalCodebase {
    root: PathBuf,
    files: Vec<String>,
}

impl LocalCodebase {
    /// Open a directory with the default traversal depth
    pub fn open(root: impl AsRef<Path>) -> InferResult<Self> {
        Self::with_max_depth(root, DEFAULT_MAX_DEPTH)
    }

    /// Open a directory, descending at most `max_depth` directory levels
    pub fn with_max_depth(root: impl AsRef<Path>, max_depth: usize) -> InferResult<Self> {
        let root = root.as_ref().to_path_buf();

        // Fail early (and loudly) if the root itself can't be listed
        std::fs::read_dir(&root).map_err(|e| InferError::Io {
            path: root.clone(),
            message: e.to_string(),
        })?;

        let files = walk(&root, max_depth);
        debug!(root = %root.display(), entries = files.len(), "walked codebase");

        Ok(Self { root, files })
    }
}

fn walk(root: &Path, max_depth: usize) -> Vec<String> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(max_depth + 1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
            let name = entry.file_name().to_string_lossy();
            !(entry.depth() > 0 && is_dir && SKIPPED_DIRS.contains(&name.as_ref()))
        })
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
        if is_dir && entry.depth() > max_depth {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = to_slash_path(relative);
        trace!(path = %relative, "found entry");
        files.push(relative);

        if files.len() >= MAX_FILES {
            warn!(limit = MAX_FILES, "file limit reached, stopping traversal");
            break;
        }
    }

    // Stable: siblings keep their name order within a depth
    files.sort_by_key(|path| path_depth(path));
    files
}

fn to_slash_path(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

impl Codebase for LocalCodebase {
    fn list_files(&self) -> &[String] {
        &self.files
    }

    fn read_file(&self, path: &str) -> InferResult<Vec<u8>> {
        std::fs::read(self.root.join(path)).map_err(|e| InferError::file_read(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::write(base.join("README.md"), "# hello").unwrap();
        fs::create_dir_all(base.join("svc/deep/deeper/deepest")).unwrap();
        fs::write(base.join("svc/go.mod"), "module svc\n").unwrap();
        fs::write(base.join("svc/deep/deeper/find.me"), "found").unwrap();
        fs::write(base.join("svc/deep/deeper/deepest/lost.me"), "lost").unwrap();
        fs::create_dir_all(base.join(".git/objects")).unwrap();
        fs::write(base.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        fs::create_dir_all(base.join("node_modules/jest")).unwrap();
        fs::write(base.join("node_modules/jest/package.json"), "{}").unwrap();
        fs::create_dir_all(base.join(".github/workflows")).unwrap();
        fs::write(base.join(".github/workflows/ci.yml"), "on: push").unwrap();

        dir
    }

    #[test]
    fn test_open_missing_dir_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = LocalCodebase::open(temp.path().join("missing"));
        assert!(matches!(result, Err(InferError::Io { .. })));
    }

    #[test]
    fn test_shallow_entries_come_first() {
        let temp = create_test_dir();
        let cb = LocalCodebase::open(temp.path()).unwrap();
        let files = cb.list_files();

        let readme = files.iter().position(|f| f == "README.md").unwrap();
        let go_mod = files.iter().position(|f| f == "svc/go.mod").unwrap();
        assert_eq!(files[0], ".");
        assert!(readme < go_mod);
    }

    #[test]
    fn test_depth_cap() {
        let temp = create_test_dir();

        let cb = LocalCodebase::open(temp.path()).unwrap();
        assert!(cb.find_file(&["find.me"]).is_some());
        assert!(cb.find_file(&["lost.me"]).is_none());

        let shallow = LocalCodebase::with_max_depth(temp.path(), 2).unwrap();
        assert!(shallow.find_file(&["find.me"]).is_none());
    }

    #[test]
    fn test_skips_git_and_node_modules() {
        let temp = create_test_dir();
        let cb = LocalCodebase::open(temp.path()).unwrap();

        assert!(cb.find_file(&["HEAD"]).is_none());
        assert!(cb.find_file(&["package.json"]).is_none());
    }

    #[test]
    fn test_dotfiles_are_visible() {
        let temp = create_test_dir();
        let cb = LocalCodebase::open(temp.path()).unwrap();

        assert_eq!(
            cb.find_file(&[".github/workflows/*.yml"]).as_deref(),
            Some(".github/workflows/ci.yml")
        );
    }

    #[test]
    fn test_find_file_matching_predicate() {
        let temp = create_test_dir();
        let cb = LocalCodebase::open(temp.path()).unwrap();

        assert!(cb.find_file_matching(&|_| false, &["go.mod"]).is_none());
        assert_eq!(
            cb.find_file_matching(&|p| p.starts_with("svc"), &["*.mod"]).as_deref(),
            Some("svc/go.mod")
        );
    }

    #[test]
    fn test_multiple_globs_last_matches() {
        let temp = create_test_dir();
        let cb = LocalCodebase::open(temp.path()).unwrap();

        assert_eq!(
            cb.find_file(&["dontfind.me", "go.mod"]).as_deref(),
            Some("svc/go.mod")
        );
    }

    #[test]
    fn test_read_file() {
        let temp = create_test_dir();
        let cb = LocalCodebase::open(temp.path()).unwrap();

        assert_eq!(cb.read_to_string("svc/go.mod").unwrap(), "module svc\n");
        assert!(matches!(
            cb.read_file("cannot-find.me"),
            Err(InferError::FileRead { .. })
        ));
    }
}
