// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Product constants for generated configs
//!
//! Docker image tags, fallback language versions, orb references and
//! conventional paths. Every field has a built-in default; a YAML or TOML
//! settings file overrides any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{InferError, InferResult};

/// Settings for config generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub images: ImageSettings,
    pub orbs: OrbSettings,
    pub paths: PathSettings,
}

/// Docker images and fallback language versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub base: String,
    pub go: String,
    /// Latest Java LTS
    pub java: String,
    pub rust: String,
    pub postgres: String,

    /// Python image is `<python_prefix><version><python_suffix>`
    pub python_prefix: String,
    pub python_suffix: String,
    pub python_version: String,

    /// Ruby image is `<ruby_prefix><version><ruby_suffix>`
    pub ruby_prefix: String,
    pub ruby_suffix: String,
    pub ruby_version: String,

    /// PHP image is `<php_prefix><version><php_suffix>`
    pub php_prefix: String,
    pub php_suffix: String,
    pub php_version: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            base: "cimg/base:stable".into(),
            go: "cimg/go:1.20".into(),
            java: "cimg/openjdk:17.0".into(),
            rust: "cimg/rust:1.70".into(),
            postgres: "circleci/postgres:9.5-alpine".into(),
            python_prefix: "cimg/python:".into(),
            python_suffix: "-node".into(),
            python_version: "3.8".into(),
            ruby_prefix: "cimg/ruby:".into(),
            ruby_suffix: "-node".into(),
            ruby_version: "3.2".into(),
            php_prefix: "cimg/php:".into(),
            php_suffix: "-node".into(),
            php_version: "8.2.7".into(),
        }
    }
}

impl ImageSettings {
    /// Python image for a detected version, or the fallback version
    pub fn python(&self, version: Option<&str>) -> String {
        let version = version.unwrap_or(&self.python_version);
        format!("{}{}{}", self.python_prefix, version, self.python_suffix)
    }

    /// Ruby image for a detected version, or the fallback version
    pub fn ruby(&self, version: Option<&str>) -> String {
        let version = version.unwrap_or(&self.ruby_version);
        format!("{}{}{}", self.ruby_prefix, version, self.ruby_suffix)
    }

    /// PHP image for a detected version, or the fallback version
    pub fn php(&self, version: Option<&str>) -> String {
        let version = version.unwrap_or(&self.php_version);
        format!("{}{}{}", self.php_prefix, version, self.php_suffix)
    }
}

/// Orb registry references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbSettings {
    pub node: String,
    pub python: String,
    pub ruby: String,
    pub php: String,
}

impl Default for OrbSettings {
    fn default() -> Self {
        Self {
            node: "circleci/node@5".into(),
            python: "circleci/python@2".into(),
            ruby: "circleci/ruby@2.0.1".into(),
            php: "circleci/php@1.1.0".into(),
        }
    }
}

/// Paths inside the CI container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Where the repository is checked out
    pub checkout_root: String,
    /// Directory collected by artifact jobs
    pub artifacts: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            checkout_root: "~/project".into(),
            artifacts: "~/artifacts".into(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file
    pub fn load(path: &Path) -> InferResult<Self> {
        let load_error = |reason: String| InferError::SettingsLoad {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let parsed = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            _ => return Err(load_error("unsupported settings file extension".into())),
        };

        parsed.map_err(|e| load_error(e.to_string()))
    }

    /// Load settings from an optional file, falling back to the defaults
    pub fn load_or_default(path: Option<&Path>) -> InferResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(yaml: &str) -> InferResult<Self> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    pub fn from_toml(content: &str) -> InferResult<Self> {
        toml::from_str(content).map_err(Into::into)
    }
}
