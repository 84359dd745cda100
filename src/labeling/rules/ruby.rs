// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Ruby detection

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::{cached_regex, find_in_dir, has_file_in_dir};
use crate::codebase::Codebase;
use crate::errors::InferResult;
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[
    Rule::new(DEPS_RUBY, deps),
    Rule::new(PACKAGE_MANAGER_GEMSPEC, gemspec),
];

const GEM_PATTERN: &str = r#"^\s*gem\s+['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#;
const GEMSPEC_DEP_PATTERN: &str =
    r#"add_(?:development_|runtime_)?dependency[\s(]+['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#;

static GEM: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static GEMSPEC_DEP: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn deps(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    if let Some(path) = codebase.find_file(&["Gemfile"]) {
        let contents = codebase.read_to_string(&path)?;
        let mut data = LabelData::at(&path);
        data.dependencies = parse_gemfile(&contents)?;
        data.has_lock_file = has_file_in_dir(codebase, &data.base_path, &["Gemfile.lock"]);
        if !data.dependencies.contains_key("ruby") {
            if let Some(version) = ruby_version_file(codebase, &data.base_path) {
                data.dependencies.insert("ruby".to_string(), version);
            }
        }
        return Ok(Some(data));
    }

    // A gem without a Gemfile is still a Ruby codebase
    let Some(path) = codebase.find_file(&["*.gemspec"]) else {
        return Ok(None);
    };
    let mut data = LabelData::at(&path);
    if let Some(version) = ruby_version_file(codebase, &data.base_path) {
        data.dependencies.insert("ruby".to_string(), version);
    }
    Ok(Some(data))
}

fn gemspec(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if !ls.is_valid(DEPS_RUBY) {
        return Ok(None);
    }
    let Some(path) = codebase.find_file(&["*.gemspec"]) else {
        return Ok(None);
    };

    let contents = codebase.read_to_string(&path)?;
    let mut data = LabelData::at(&path);
    data.dependencies = parse_gemspec(&contents)?;
    Ok(Some(data))
}

fn ruby_version_file(codebase: &dyn Codebase, base_path: &str) -> Option<String> {
    let path = find_in_dir(codebase, base_path, &[".ruby-version"])?;
    let contents = codebase.read_to_string(&path).ok()?;
    let version = contents.trim().trim_start_matches("ruby-");
    (!version.is_empty()).then(|| version.to_string())
}

/// Version from `ruby '3.2.2'` or `ruby "3.2.0", engine: ...`; anything
/// other than a string literal is ignored
fn ruby_directive_version(rest: &str) -> Option<&str> {
    let rest = rest.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let literal = &rest[1..];
    let version = &literal[..literal.find(quote)?];
    (!version.trim().is_empty()).then(|| version.trim())
}

/// Gems and the ruby version declared in a Gemfile
pub(crate) fn parse_gemfile(contents: &str) -> InferResult<BTreeMap<String, String>> {
    let gem = cached_regex(&GEM, GEM_PATTERN)?;
    let mut deps = BTreeMap::new();

    for line in contents.lines() {
        let line = line.trim_end_matches('\r');

        if let Some(rest) = line.trim_start().strip_prefix("ruby ") {
            if let Some(version) = ruby_directive_version(rest) {
                deps.insert("ruby".to_string(), version.to_string());
            }
            continue;
        }

        if let Some(caps) = gem.captures(line) {
            let name = caps[1].to_string();
            let version = caps.get(2).map_or("true", |m| m.as_str()).to_string();
            if name == "rspec-rails" {
                deps.insert("rspec".to_string(), "true".to_string());
            }
            deps.insert(name, version);
        }
    }

    Ok(deps)
}

/// Runtime and development dependencies declared in a gemspec
pub(crate) fn parse_gemspec(contents: &str) -> InferResult<BTreeMap<String, String>> {
    let dep = cached_regex(&GEMSPEC_DEP, GEMSPEC_DEP_PATTERN)?;
    Ok(dep
        .captures_iter(contents)
        .map(|caps| {
            let version = caps.get(2).map_or("true", |m| m.as_str());
            (caps[1].to_string(), version.to_string())
        })
        .collect())
}
