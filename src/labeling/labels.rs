// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Labels and label sets
//!
//! A label is the output of one detection rule: a namespaced key plus
//! whatever the rule learned about the matching part of the codebase.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::codebase::Codebase;
use crate::errors::InferResult;

// ─────────────────────────────────────────────────────────────────────────────
// Label keys
// ─────────────────────────────────────────────────────────────────────────────

pub const DEPS_NODE: &str = "deps:node";
pub const PACKAGE_MANAGER_YARN: &str = "package_manager:yarn";
pub const PACKAGE_MANAGER_NPM: &str = "package_manager:npm";
pub const TEST_JEST: &str = "test:jest";

pub const DEPS_GO: &str = "deps:go";
pub const ARTIFACT_GO_EXECUTABLE: &str = "artifact:go-executable";

pub const DEPS_PYTHON: &str = "deps:python";
pub const PACKAGE_MANAGER_PIPENV: &str = "package_manager:pipenv";
pub const PACKAGE_MANAGER_POETRY: &str = "package_manager:poetry";
pub const PACKAGE_MANAGER_SETUPTOOLS: &str = "package_manager:setuptools";
pub const FILE_MANAGE_PY: &str = "file:manage.py";
pub const TEST_TOX: &str = "test:tox";

pub const DEPS_RUBY: &str = "deps:ruby";
pub const PACKAGE_MANAGER_GEMSPEC: &str = "package_manager:gemspec";

pub const DEPS_JAVA: &str = "deps:java";
pub const TOOL_GRADLE: &str = "tool:gradle";
pub const FILE_BUILD_GRADLE_KTS: &str = "file:build.gradle.kts";

pub const DEPS_PHP: &str = "deps:php";
pub const DEPS_RUST: &str = "deps:rust";

pub const CICD_GITHUB_ACTIONS: &str = "cicd:github-actions";
pub const CICD_GITLAB_CI: &str = "cicd:gitlab-ci";
pub const CICD_JENKINS: &str = "cicd:jenkins";

pub const REPO_EMPTY: &str = "repo:empty";

/// Yarn 2+ ("berry") as opposed to yarn 1 ("classic")
pub const YARN_BERRY: &str = "berry";
pub const YARN_CLASSIC: &str = "classic";

// ─────────────────────────────────────────────────────────────────────────────
// Label data
// ─────────────────────────────────────────────────────────────────────────────

/// What a rule learned about the codebase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelData {
    /// Directory of the matched artifact, `"."` for the repository root
    pub base_path: String,
    /// Manifest or marker file that produced the label, if any
    pub path: String,
    /// Dependency name to version constraint (or `"true"` for flags)
    pub dependencies: BTreeMap<String, String>,
    /// Task/script name to command
    pub tasks: BTreeMap<String, String>,
    pub has_lock_file: bool,
    /// Ecosystem-specific variant, e.g. yarn "classic" or "berry"
    pub version: String,
}

impl Default for LabelData {
    fn default() -> Self {
        Self {
            base_path: ".".to_string(),
            path: String::new(),
            dependencies: BTreeMap::new(),
            tasks: BTreeMap::new(),
            has_lock_file: false,
            version: String::new(),
        }
    }
}

impl LabelData {
    /// Data for a label found at `path`, with the base path derived from it
    pub fn at(path: &str) -> Self {
        Self {
            base_path: crate::codebase::dir_name(path),
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies
            .get(name)
            .map_or(false, |version| !version.is_empty())
    }

    pub fn has_task(&self, name: &str) -> bool {
        self.tasks.get(name).map_or(false, |cmd| !cmd.is_empty())
    }
}

/// A detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub key: String,
    pub valid: bool,
    pub data: LabelData,
}

impl Label {
    pub fn new(key: impl Into<String>, data: LabelData) -> Self {
        Self {
            key: key.into(),
            valid: true,
            data,
        }
    }

    pub fn invalid(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            valid: false,
            data: LabelData::default(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "{}:{}", self.key, self.data.base_path)
        } else {
            write!(f, "!{}", self.key)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Label set
// ─────────────────────────────────────────────────────────────────────────────

/// Valid labels keyed by label key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: BTreeMap<String, Label>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label. Invalid labels are dropped, and a key that is already
    /// present keeps its first label.
    pub fn insert(&mut self, label: Label) {
        if !label.valid {
            return;
        }
        if self.labels.contains_key(&label.key) {
            warn!(key = %label.key, "label already present, keeping the first one");
            return;
        }
        self.labels.insert(label.key.clone(), label);
    }

    pub fn get(&self, key: &str) -> Option<&Label> {
        self.labels.get(key)
    }

    /// Data of a valid label
    pub fn data(&self, key: &str) -> Option<&LabelData> {
        self.labels.get(key).map(|label| &label.data)
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.labels.get(key).map_or(false, |label| label.valid)
    }

    /// Base path of a label, `"."` when absent
    pub fn base_path(&self, key: &str) -> &str {
        self.data(key).map_or(".", |data| data.base_path.as_str())
    }

    pub fn dependency(&self, key: &str, name: &str) -> Option<&str> {
        self.data(key)
            .and_then(|data| data.dependencies.get(name))
            .map(String::as_str)
            .filter(|version| !version.is_empty())
    }

    pub fn has_dependency(&self, key: &str, name: &str) -> bool {
        self.dependency(key, name).is_some()
    }

    pub fn task(&self, key: &str, name: &str) -> Option<&str> {
        self.data(key)
            .and_then(|data| data.tasks.get(name))
            .map(String::as_str)
            .filter(|cmd| !cmd.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut set = Self::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.labels.values().map(Label::to_string).collect();
        parts.sort();
        write!(f, "{}", parts.join(","))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────────────────────────────

/// Detection function: inspects the codebase and the labels found so far,
/// returning data for a new label when it matches
pub type DetectFn = fn(&dyn Codebase, &LabelSet) -> InferResult<Option<LabelData>>;

/// A detection rule that owns exactly one label key
#[derive(Clone, Copy)]
pub struct Rule {
    pub key: &'static str,
    pub detect: DetectFn,
}

impl Rule {
    pub const fn new(key: &'static str, detect: DetectFn) -> Self {
        Self { key, detect }
    }

    /// Run the rule, producing a label that may or may not be valid
    pub fn apply(&self, codebase: &dyn Codebase, labels: &LabelSet) -> InferResult<Label> {
        Ok(match (self.detect)(codebase, labels)? {
            Some(data) => Label::new(self.key, data),
            None => Label::invalid(self.key),
        })
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("key", &self.key).finish()
    }
}
