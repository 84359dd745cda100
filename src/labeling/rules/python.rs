// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Python detection
//!
//! At most one package manager label is produced, in priority order
//! pipenv, poetry, setuptools. Plain pip is what's left when none match.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use super::{cached_regex, file_contains, find_in_dir, has_file_in_dir, strip_version_constraint};
use crate::codebase::{join_path, Codebase};
use crate::errors::InferResult;
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[
    Rule::new(DEPS_PYTHON, deps),
    Rule::new(PACKAGE_MANAGER_PIPENV, pipenv),
    Rule::new(PACKAGE_MANAGER_POETRY, poetry),
    Rule::new(PACKAGE_MANAGER_SETUPTOOLS, setuptools),
    Rule::new(FILE_MANAGE_PY, manage_py),
    Rule::new(TEST_TOX, tox),
];

static VERSION_NUMBER: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

const PIPENV_FILES: &[&str] = &["Pipfile", "Pipfile.lock"];
const POETRY_FILES: &[&str] = &["poetry.lock"];
const LOCK_FILES: &[&str] = &["Pipfile.lock", "poetry.lock"];

/// Any of these marks a Python codebase; earlier names win
const PYTHON_FILES: &[&str] = &[
    "requirements.txt",
    "pyproject.toml",
    "manage.py",
    "Pipfile",
    "Pipfile.lock",
    "poetry.lock",
    "setup.py",
];

fn deps(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    let Some(path) = PYTHON_FILES.iter().find_map(|name| codebase.find_file(&[name])) else {
        return Ok(None);
    };

    let mut data = LabelData::at(&path);
    data.has_lock_file = has_file_in_dir(codebase, &data.base_path, LOCK_FILES);
    data.dependencies = read_dependencies(codebase, &data.base_path);
    if let Some(version) = python_version(codebase) {
        data.dependencies.insert("python".to_string(), version);
    }

    Ok(Some(data))
}

fn pipenv(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if !ls.is_valid(DEPS_PYTHON) {
        return Ok(None);
    }
    if let Some(path) = codebase.find_file(PIPENV_FILES) {
        return Ok(Some(LabelData::at(&path)));
    }
    Ok(pyproject_mentioning(codebase, "pipenv"))
}

fn poetry(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if !ls.is_valid(DEPS_PYTHON) || ls.is_valid(PACKAGE_MANAGER_PIPENV) {
        return Ok(None);
    }
    if let Some(path) = codebase.find_file(POETRY_FILES) {
        return Ok(Some(LabelData::at(&path)));
    }
    Ok(pyproject_mentioning(codebase, "poetry"))
}

fn setuptools(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if !ls.is_valid(DEPS_PYTHON)
        || ls.is_valid(PACKAGE_MANAGER_PIPENV)
        || ls.is_valid(PACKAGE_MANAGER_POETRY)
    {
        return Ok(None);
    }
    if let Some(path) = codebase.find_file(&["setup.py"]) {
        return Ok(Some(LabelData::at(&path)));
    }
    Ok(pyproject_mentioning(codebase, "setuptools"))
}

fn manage_py(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    Ok(codebase.find_file(&["manage.py"]).map(|path| LabelData::at(&path)))
}

fn tox(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    if !ls.is_valid(DEPS_PYTHON) {
        return Ok(None);
    }
    Ok(codebase.find_file(&["tox.ini"]).map(|path| LabelData::at(&path)))
}

fn pyproject_mentioning(codebase: &dyn Codebase, needle: &str) -> Option<LabelData> {
    codebase
        .find_file(&["pyproject.toml"])
        .filter(|path| file_contains(codebase, path, needle))
        .map(|path| LabelData::at(&path))
}

// ─────────────────────────────────────────────────────────────────────────────
// Version
// ─────────────────────────────────────────────────────────────────────────────

/// Python version from `.python-version`, `pyproject.toml` or `Pipfile`,
/// in that order
fn python_version(codebase: &dyn Codebase) -> Option<String> {
    version_from_version_file(codebase)
        .or_else(|| version_from_toml(codebase, "pyproject.toml", &[
            &["tool", "poetry", "dependencies", "python"],
            &["project", "requires-python"],
        ]))
        .or_else(|| version_from_toml(codebase, "Pipfile", &[&["requires", "python_version"]]))
}

fn version_from_version_file(codebase: &dyn Codebase) -> Option<String> {
    let path = codebase.find_file(&[".python-version"])?;
    let contents = match codebase.read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!(error = %e, "unreadable .python-version, trying other sources");
            return None;
        }
    };
    let re = cached_regex(&VERSION_NUMBER, r"[0-9.]+").ok()?;
    let version = re.find(&contents)?.as_str().to_string();
    debug!(version = %version, "python version from .python-version");
    Some(version)
}

fn version_from_toml(codebase: &dyn Codebase, file: &str, keys: &[&[&str]]) -> Option<String> {
    let path = codebase.find_file(&[file])?;
    let document = read_toml(codebase, &path)?;

    keys.iter().find_map(|key| {
        let value = lookup(&document, key)?.as_str()?;
        let version = strip_version_constraint(value);
        (!version.is_empty() && version != "*").then(|| {
            debug!(file = %path, version = %version, "python version from manifest");
            version
        })
    })
}

fn read_toml(codebase: &dyn Codebase, path: &str) -> Option<toml::Value> {
    let contents = codebase.read_to_string(path).ok()?;
    match toml::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(file = %path, error = %e, "could not parse TOML");
            None
        }
    }
}

fn lookup<'a>(value: &'a toml::Value, key: &[&str]) -> Option<&'a toml::Value> {
    key.iter().try_fold(value, |current, part| current.get(part))
}

// ─────────────────────────────────────────────────────────────────────────────
// Dependencies
// ─────────────────────────────────────────────────────────────────────────────

/// Declared dependencies from the manifests next to the detected file
fn read_dependencies(codebase: &dyn Codebase, base_path: &str) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();

    if let Some(path) = find_in_dir(codebase, base_path, &["requirements.txt"]) {
        if let Ok(contents) = codebase.read_to_string(&path) {
            deps.extend(parse_requirements(&contents));
        }
    }

    if let Some(pipfile) = read_toml(codebase, &join_path(base_path, "Pipfile")) {
        for section in ["packages", "dev-packages"] {
            if let Some(table) = pipfile.get(section).and_then(toml::Value::as_table) {
                deps.extend(table.iter().map(|(k, v)| (k.clone(), toml_version(v))));
            }
        }
    }

    if let Some(pyproject) = read_toml(codebase, &join_path(base_path, "pyproject.toml")) {
        deps.extend(pyproject_dependencies(&pyproject));
    }

    deps.remove("python");
    deps
}

/// `name==1.0` style lines; options, URLs and comments are skipped
pub(crate) fn parse_requirements(contents: &str) -> BTreeMap<String, String> {
    contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-') && !line.contains("://"))
        .filter_map(|line| {
            let end = line
                .find(|c: char| "=<>!~[;@ ".contains(c))
                .unwrap_or(line.len());
            let name = line[..end].trim();
            if name.is_empty() {
                return None;
            }
            let constraint = line[end..].split(';').next().unwrap_or("").trim();
            let version = if constraint.is_empty() { "*" } else { constraint };
            Some((name.to_string(), version.to_string()))
        })
        .collect()
}

fn pyproject_dependencies(pyproject: &toml::Value) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();

    let mut tables = vec![
        lookup(pyproject, &["tool", "poetry", "dependencies"]),
        lookup(pyproject, &["tool", "poetry", "dev-dependencies"]),
    ];
    if let Some(groups) = lookup(pyproject, &["tool", "poetry", "group"]).and_then(toml::Value::as_table) {
        tables.extend(groups.values().map(|group| group.get("dependencies")));
    }
    for table in tables.into_iter().flatten().filter_map(toml::Value::as_table) {
        deps.extend(table.iter().map(|(k, v)| (k.clone(), toml_version(v))));
    }

    if let Some(list) = lookup(pyproject, &["project", "dependencies"]).and_then(toml::Value::as_array) {
        let lines: Vec<&str> = list.iter().filter_map(toml::Value::as_str).collect();
        deps.extend(parse_requirements(&lines.join("\n")));
    }

    deps
}

/// `"^1.0"` or `{ version = "^1.0", extras = [...] }`
fn toml_version(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Table(t) => t
            .get("version")
            .and_then(toml::Value::as_str)
            .unwrap_or("*")
            .to_string(),
        _ => "*".to_string(),
    }
}
