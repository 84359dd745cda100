// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Empty repository detection

use crate::codebase::Codebase;
use crate::errors::InferResult;
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[Rule::new(REPO_EMPTY, empty_repo)];

fn is_ignored(path: &str) -> bool {
    path == "."
        || path == ".git"
        || path.starts_with(".git/")
        || path.trim().eq_ignore_ascii_case("readme.md")
}

fn empty_repo(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    let content = codebase.find_file_matching(&|path| !is_ignored(path), &["*"]);
    Ok(content.is_none().then(LabelData::default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::MemoryCodebase;
    use crate::labeling::apply_rules;

    #[test]
    fn test_empty() {
        let ls = apply_rules(&MemoryCodebase::new(), RULES);
        assert_eq!(ls.base_path(REPO_EMPTY), ".");
    }

    #[test]
    fn test_readme_and_git_are_ignored() {
        let cb = MemoryCodebase::from_files([("Readme.md", ""), (".git/HEAD", "")]);
        assert!(apply_rules(&cb, RULES).is_valid(REPO_EMPTY));
    }

    #[test]
    fn test_nested_readme_is_content() {
        let cb = MemoryCodebase::from_files([("docs/README.md", "")]);
        assert!(apply_rules(&cb, RULES).is_empty());
    }

    #[test]
    fn test_any_file_is_content() {
        let cb = MemoryCodebase::from_files([("main.c", "")]);
        assert!(apply_rules(&cb, RULES).is_empty());
    }
}
