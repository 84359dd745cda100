// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Codebase access
//!
//! Rules never touch the filesystem directly. They ask a [`Codebase`] for
//! the first file matching a set of globs and read its contents. Traversal
//! order is shallow-first and stable, so "first match" is deterministic and
//! prefers manifests closest to the repository root.

mod local;
mod memory;

pub use local::{LocalCodebase, DEFAULT_MAX_DEPTH, MAX_FILES};
pub use memory::MemoryCodebase;

use glob::{MatchOptions, Pattern};
use tracing::warn;

use crate::errors::{InferError, InferResult};

/// `*` must not cross a path separator, mirroring shell globbing.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Read-only view of a repository snapshot
pub trait Codebase {
    /// Relative paths of every entry, in traversal order
    fn list_files(&self) -> &[String];

    /// Read the raw contents of a file, relative to the codebase root
    fn read_file(&self, path: &str) -> InferResult<Vec<u8>>;

    /// First entry (in traversal order) whose base name or relative path
    /// matches one of `globs` and that satisfies `predicate`
    fn find_file_matching(&self, predicate: &dyn Fn(&str) -> bool, globs: &[&str]) -> Option<String> {
        let patterns = compile_globs(globs);
        self.list_files()
            .iter()
            .find(|path| matches_any(&patterns, path.as_str()) && predicate(path.as_str()))
            .cloned()
    }

    /// First entry matching one of `globs`
    fn find_file(&self, globs: &[&str]) -> Option<String> {
        self.find_file_matching(&|_| true, globs)
    }

    /// Read a file as UTF-8 text
    fn read_to_string(&self, path: &str) -> InferResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| InferError::file_read(path, e))
    }
}

fn compile_globs(globs: &[&str]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(glob = %glob, error = %e, "ignoring invalid glob");
                None
            }
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], path: &str) -> bool {
    let name = base_name(path);
    patterns
        .iter()
        .any(|p| p.matches_with(name, MATCH_OPTIONS) || p.matches_with(path, MATCH_OPTIONS))
}

/// Final component of a `/`-separated relative path
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory part of a `/`-separated relative path, `"."` for top-level entries
pub fn dir_name(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => ".".to_string(),
    }
}

/// Join a directory (possibly `"."`) and a file name
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() || dir == "." {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

/// Number of components in a relative path; `"."` and top-level entries are 1
pub(crate) fn path_depth(path: &str) -> usize {
    path.matches('/').count() + 1
}
