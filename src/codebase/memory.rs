// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

use std::collections::BTreeMap;

use super::{path_depth, Codebase};
use crate::errors::{InferError, InferResult};

/// In-memory [`Codebase`], listed in the same order as [`super::LocalCodebase`]
///
/// Parent directories are implied by the files added, and the root is always
/// present as `"."`.
#[derive(Debug, Clone)]
pub struct MemoryCodebase {
    entries: BTreeMap<String, Option<Vec<u8>>>,
    files: Vec<String>,
}

impl MemoryCodebase {
    pub fn new() -> Self {
        let mut codebase = Self {
            entries: BTreeMap::new(),
            files: Vec::new(),
        };
        codebase.entries.insert(".".to_string(), None);
        codebase.reindex();
        codebase
    }

    /// Build a codebase from `(path, contents)` pairs
    pub fn from_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut codebase = Self::new();
        for (path, contents) in files {
            codebase.insert(path, Some(contents.as_bytes().to_vec()));
        }
        codebase.reindex();
        codebase
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.add_file(path, contents);
        self
    }

    pub fn add_file(&mut self, path: &str, contents: &str) {
        self.insert(path, Some(contents.as_bytes().to_vec()));
        self.reindex();
    }

    pub fn add_dir(&mut self, path: &str) {
        self.insert(path, None);
        self.reindex();
    }

    fn insert(&mut self, path: &str, contents: Option<Vec<u8>>) {
        let path = path.trim_start_matches("./").trim_end_matches('/');
        let mut parent = String::new();
        let components: Vec<&str> = path.split('/').collect();
        for component in &components[..components.len().saturating_sub(1)] {
            if !parent.is_empty() {
                parent.push('/');
            }
            parent.push_str(component);
            self.entries.entry(parent.clone()).or_insert(None);
        }
        self.entries.insert(path.to_string(), contents);
    }

    fn reindex(&mut self) {
        let mut files: Vec<String> = self.entries.keys().cloned().collect();
        files.sort_by(|a, b| {
            path_depth(a)
                .cmp(&path_depth(b))
                .then_with(|| a.split('/').cmp(b.split('/')))
        });
        // "." sorts first at depth 1 regardless of sibling names
        if let Some(idx) = files.iter().position(|f| f == ".") {
            let root = files.remove(idx);
            files.insert(0, root);
        }
        self.files = files;
    }
}

impl Default for MemoryCodebase {
    fn default() -> Self {
        Self::new()
    }
}

impl Codebase for MemoryCodebase {
    fn list_files(&self) -> &[String] {
        &self.files
    }

    fn read_file(&self, path: &str) -> InferResult<Vec<u8>> {
        match self.entries.get(path) {
            Some(Some(contents)) => Ok(contents.clone()),
            Some(None) => Err(InferError::file_read(path, "is a directory")),
            None => Err(InferError::file_read(path, "no such file")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_are_listed() {
        let cb = MemoryCodebase::from_files([("a/b/c.txt", "")]);
        assert_eq!(cb.list_files(), &[".", "a", "a/b", "a/b/c.txt"]);
    }

    #[test]
    fn test_shallow_first_then_by_name() {
        let cb = MemoryCodebase::new()
            .with_file("web/package.json", "{}")
            .with_file("package.json", "{}")
            .with_file("api/go.mod", "module api");

        assert_eq!(
            cb.list_files(),
            &[".", "api", "package.json", "web", "api/go.mod", "web/package.json"]
        );
        assert_eq!(cb.find_file(&["package.json"]).as_deref(), Some("package.json"));
    }

    #[test]
    fn test_read_file() {
        let cb = MemoryCodebase::from_files([("dir/file", "contents")]);
        assert_eq!(cb.read_to_string("dir/file").unwrap(), "contents");
        assert!(cb.read_file("dir").is_err());
        assert!(cb.read_file("missing").is_err());
    }

    #[test]
    fn test_empty_codebase_lists_root() {
        let cb = MemoryCodebase::new();
        assert_eq!(cb.list_files(), &["."]);
    }
}
