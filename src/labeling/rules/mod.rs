// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Per-ecosystem rule packs

pub mod cicd;
pub mod empty;
pub mod go;
pub mod java;
pub mod node;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::codebase::{dir_name, Codebase};
use crate::errors::{InferError, InferResult};

/// First file named like one of `names` that sits directly in `dir`
pub(crate) fn find_in_dir(codebase: &dyn Codebase, dir: &str, names: &[&str]) -> Option<String> {
    codebase.find_file_matching(&|path| dir_name(path) == dir, names)
}

pub(crate) fn has_file_in_dir(codebase: &dyn Codebase, dir: &str, names: &[&str]) -> bool {
    find_in_dir(codebase, dir, names).is_some()
}

/// Whether a readable, non-empty file contains `needle`
pub(crate) fn file_contains(codebase: &dyn Codebase, path: &str, needle: &str) -> bool {
    codebase
        .read_to_string(path)
        .map_or(false, |contents| contents.contains(needle))
}

/// Compile `pattern` once into `cell` and hand out the shared regex
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &str,
) -> InferResult<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| InferError::InvalidConfig {
            reason: e.to_string(),
        })
}

/// A JSON manifest section that should be an object; anything else (an
/// empty section written as `[]`, `null`, ...) reads as empty
pub(crate) fn lenient_object<'de, D>(deserializer: D) -> Result<BTreeMap<String, serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    })
}

/// First constraint of a list, without its operator (`^`, `>=`, `~=`, `==`)
/// or trailing wildcard (`3.10.*`)
pub(crate) fn strip_version_constraint(version: &str) -> String {
    let first = version.split(',').next().unwrap_or(version).trim();
    first
        .trim_start_matches(|c: char| matches!(c, '^' | '~' | '>' | '<' | '=' | '!'))
        .trim()
        .trim_end_matches('*')
        .trim_end_matches('.')
        .to_string()
}
