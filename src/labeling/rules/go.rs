// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Go detection

use super::has_file_in_dir;
use crate::codebase::Codebase;
use crate::errors::InferResult;
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[
    Rule::new(DEPS_GO, deps),
    Rule::new(ARTIFACT_GO_EXECUTABLE, executable),
];

fn deps(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    Ok(codebase.find_file(&["go.mod"]).map(|path| {
        let mut data = LabelData::at(&path);
        data.has_lock_file = has_file_in_dir(codebase, &data.base_path, &["go.sum"]);
        data
    }))
}

fn executable(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if !ls.is_valid(DEPS_GO) {
        return Ok(None);
    }
    let main_file = codebase.find_file_matching(&|path| is_main_package(codebase, path), &["*.go"]);
    Ok(main_file.map(|path| LabelData::at(&path)))
}

fn is_main_package(codebase: &dyn Codebase, path: &str) -> bool {
    codebase
        .read_to_string(path)
        .map_or(false, |source| package_clause(&source) == Some("main"))
}

/// Name declared by the package clause of a Go source file
///
/// Only comments and whitespace may precede the clause.
pub(crate) fn package_clause(source: &str) -> Option<&str> {
    let mut rest = source;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/")?.1;
        } else {
            break;
        }
    }

    let rest = rest.strip_prefix("package")?;
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '/') {
        return None;
    }

    // Comments are allowed between the keyword and the name
    let mut rest = rest;
    loop {
        rest = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
        if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/")?.1;
        } else {
            break;
        }
    }

    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let name = &rest[..end];
    (!name.is_empty() && !name.starts_with(|c: char| c.is_ascii_digit())).then_some(name)
}
