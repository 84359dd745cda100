// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! PHP detection (Composer)

use serde::Deserialize;
use std::collections::BTreeMap;

use super::{has_file_in_dir, lenient_object};
use crate::codebase::Codebase;
use crate::errors::{InferError, InferResult};
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[Rule::new(DEPS_PHP, deps)];

#[derive(Debug, Default, Deserialize)]
struct ComposerJson {
    #[serde(default, deserialize_with = "lenient_object")]
    require: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "require-dev", deserialize_with = "lenient_object")]
    require_dev: BTreeMap<String, serde_json::Value>,
}

/// Package constraints; entries that aren't strings are skipped
fn constraints(section: BTreeMap<String, serde_json::Value>) -> impl Iterator<Item = (String, String)> {
    section
        .into_iter()
        .filter_map(|(name, value)| value.as_str().map(|v| (name, v.to_string())))
}

fn deps(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    let Some(path) = codebase.find_file(&["composer.json"]) else {
        return Ok(None);
    };

    let contents = codebase.read_file(&path)?;
    let composer: ComposerJson =
        serde_json::from_slice(&contents).map_err(|e| InferError::manifest_parse(&path, e))?;

    let mut data = LabelData::at(&path);
    data.dependencies.extend(constraints(composer.require));
    data.dependencies.extend(constraints(composer.require_dev));
    data.has_lock_file = has_file_in_dir(codebase, &data.base_path, &["composer.lock"]);
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::MemoryCodebase;
    use crate::labeling::apply_rules;

    #[test]
    fn test_composer_dependencies() {
        let cb = MemoryCodebase::from_files([(
            "composer.json",
            r#"{"require": {"php": ">=8.1"}, "require-dev": {"phpunit/phpunit": "^10"}}"#,
        )]);
        let ls = apply_rules(&cb, RULES);

        assert_eq!(ls.dependency(DEPS_PHP, "phpunit/phpunit"), Some("^10"));
        assert_eq!(ls.dependency(DEPS_PHP, "php"), Some(">=8.1"));
        assert!(!ls.data(DEPS_PHP).unwrap().has_lock_file);
    }

    #[test]
    fn test_empty_composer_json() {
        let cb = MemoryCodebase::from_files([("composer.json", "{}"), ("composer.lock", "{}")]);
        let ls = apply_rules(&cb, RULES);

        let php = ls.data(DEPS_PHP).unwrap();
        assert!(php.dependencies.is_empty());
        assert!(php.has_lock_file);
    }

    #[test]
    fn test_empty_sections_written_as_arrays() {
        let cb = MemoryCodebase::from_files([
            ("composer.json", r#"{"require": {"php": ">=8.1", "ext-json": 1}, "require-dev": []}"#),
            ("composer.lock", "{}"),
        ]);
        let ls = apply_rules(&cb, RULES);

        let php = ls.data(DEPS_PHP).unwrap();
        assert_eq!(php.dependencies.len(), 1);
        assert_eq!(ls.dependency(DEPS_PHP, "php"), Some(">=8.1"));
        assert!(php.has_lock_file);
    }

    #[test]
    fn test_malformed_composer_json() {
        let cb = MemoryCodebase::from_files([("composer.json", "[")]);
        assert!(apply_rules(&cb, RULES).is_empty());
    }
}
