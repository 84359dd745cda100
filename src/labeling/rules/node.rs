// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Node.js detection

use serde::Deserialize;
use std::collections::BTreeMap;

use super::{has_file_in_dir, lenient_object};
use crate::codebase::Codebase;
use crate::errors::{InferError, InferResult};
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[
    Rule::new(DEPS_NODE, deps),
    Rule::new(PACKAGE_MANAGER_YARN, yarn),
    Rule::new(PACKAGE_MANAGER_NPM, npm),
    Rule::new(TEST_JEST, jest),
];

const LOCK_FILES: &[&str] = &["package-lock.json", "npm-shrinkwrap.json", "yarn.lock"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default, deserialize_with = "lenient_object")]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_object")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_object")]
    scripts: BTreeMap<String, serde_json::Value>,
    package_manager: Option<String>,
}

fn find_package_json(codebase: &dyn Codebase) -> Option<String> {
    codebase
        .find_file(&["package.json"])
        .filter(|path| path == "package.json")
        .or_else(|| codebase.find_file(&["*/package.json"]))
}

fn read_package_json(codebase: &dyn Codebase, path: &str) -> InferResult<PackageJson> {
    let contents = codebase.read_file(path)?;
    serde_json::from_slice(&contents).map_err(|e| InferError::manifest_parse(path, e))
}

fn string_map(values: BTreeMap<String, serde_json::Value>) -> impl Iterator<Item = (String, String)> {
    values.into_iter().map(|(k, v)| match v {
        serde_json::Value::String(s) => (k, s),
        other => (k, other.to_string()),
    })
}

fn deps(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    let Some(path) = find_package_json(codebase) else {
        return Ok(None);
    };
    let manifest = read_package_json(codebase, &path)?;

    let mut data = LabelData::at(&path);
    data.dependencies.extend(string_map(manifest.dependencies));
    data.dependencies.extend(string_map(manifest.dev_dependencies));
    data.tasks.extend(string_map(manifest.scripts));
    data.has_lock_file = has_file_in_dir(codebase, &data.base_path, LOCK_FILES);

    Ok(Some(data))
}

fn yarn(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    let Some(node) = ls.data(DEPS_NODE) else {
        return Ok(None);
    };

    let has_yarn_lock = has_file_in_dir(codebase, &node.base_path, &["yarn.lock"]);
    let declared = read_package_json(codebase, &node.path)
        .ok()
        .and_then(|manifest| manifest.package_manager)
        .filter(|pm| pm.starts_with("yarn"));

    if !has_yarn_lock && declared.is_none() {
        return Ok(None);
    }

    let mut data = LabelData::at(&node.path);
    data.has_lock_file = has_yarn_lock;
    data.version = if is_berry(codebase, &node.base_path, declared.as_deref()) {
        YARN_BERRY
    } else {
        YARN_CLASSIC
    }
    .to_string();

    Ok(Some(data))
}

/// Yarn 2+ writes `.yarnrc.yml`; yarn 1 never does
fn is_berry(codebase: &dyn Codebase, base_path: &str, declared: Option<&str>) -> bool {
    if has_file_in_dir(codebase, base_path, &[".yarnrc.yml"]) {
        return true;
    }
    declared
        .and_then(|pm| pm.strip_prefix("yarn@"))
        .and_then(|version| version.split('.').next())
        .and_then(|major| major.parse::<u32>().ok())
        .map_or(false, |major| major >= 2)
}

fn npm(_: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if ls.is_valid(PACKAGE_MANAGER_YARN) {
        return Ok(None);
    }
    Ok(ls.data(DEPS_NODE).map(|node| LabelData {
        has_lock_file: node.has_lock_file,
        ..LabelData::at(&node.path)
    }))
}

fn jest(_: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if !ls.has_dependency(DEPS_NODE, "jest") {
        return Ok(None);
    }
    Ok(ls.data(DEPS_NODE).map(|node| LabelData::at(&node.path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::MemoryCodebase;
    use crate::labeling::apply_rules;

    fn detect(files: &[(&str, &str)]) -> LabelSet {
        apply_rules(&MemoryCodebase::from_files(files.iter().copied()), RULES)
    }

    #[test]
    fn test_root_package_json() {
        let ls = detect(&[(
            "package.json",
            r#"{
                "dependencies": {"react": "^18.0.0"},
                "devDependencies": {"jest": "^29.0.0"},
                "scripts": {"test": "jest", "build": "tsc"}
            }"#,
        )]);

        let node = ls.data(DEPS_NODE).unwrap();
        assert_eq!(node.base_path, ".");
        assert_eq!(node.dependencies.get("react").unwrap(), "^18.0.0");
        assert_eq!(node.tasks.get("build").unwrap(), "tsc");
        assert!(!node.has_lock_file);
        assert!(ls.is_valid(TEST_JEST));
        assert!(ls.is_valid(PACKAGE_MANAGER_NPM));
    }

    #[test]
    fn test_nested_package_json() {
        let ls = detect(&[("frontend/package.json", "{}"), ("frontend/package-lock.json", "{}")]);

        let node = ls.data(DEPS_NODE).unwrap();
        assert_eq!(node.base_path, "frontend");
        assert!(node.has_lock_file);
        assert!(!ls.is_valid(TEST_JEST));
    }

    #[test]
    fn test_too_deep_package_json_is_ignored() {
        let ls = detect(&[("a/b/package.json", "{}")]);
        assert!(!ls.is_valid(DEPS_NODE));
    }

    #[test]
    fn test_array_sections_read_as_empty() {
        let ls = detect(&[(
            "package.json",
            r#"{"dependencies": [], "devDependencies": {"jest": "^29.0.0"}}"#,
        )]);

        let node = ls.data(DEPS_NODE).unwrap();
        assert_eq!(node.dependencies.len(), 1);
        assert!(ls.is_valid(TEST_JEST));
    }

    #[test]
    fn test_invalid_package_json() {
        let ls = detect(&[("package.json", "{ not json")]);
        assert!(ls.is_empty());
    }

    #[test]
    fn test_yarn_classic() {
        let ls = detect(&[("package.json", "{}"), ("yarn.lock", "")]);

        let yarn = ls.data(PACKAGE_MANAGER_YARN).unwrap();
        assert_eq!(yarn.version, YARN_CLASSIC);
        assert!(!ls.is_valid(PACKAGE_MANAGER_NPM));
        assert!(ls.data(DEPS_NODE).unwrap().has_lock_file);
    }

    #[test]
    fn test_yarn_berry() {
        let ls = detect(&[("package.json", "{}"), ("yarn.lock", ""), (".yarnrc.yml", "")]);
        assert_eq!(ls.data(PACKAGE_MANAGER_YARN).unwrap().version, YARN_BERRY);
    }

    #[test]
    fn test_yarn_from_package_manager_field() {
        let ls = detect(&[("package.json", r#"{"packageManager": "yarn@3.6.1"}"#)]);

        let yarn = ls.data(PACKAGE_MANAGER_YARN).unwrap();
        assert_eq!(yarn.version, YARN_BERRY);
        assert!(!yarn.has_lock_file);
    }

    #[test]
    fn test_yarn_lock_elsewhere_is_ignored() {
        let ls = detect(&[("package.json", "{}"), ("docs/yarn.lock", "")]);
        assert!(!ls.is_valid(PACKAGE_MANAGER_YARN));
        assert!(ls.is_valid(PACKAGE_MANAGER_NPM));
    }
}
