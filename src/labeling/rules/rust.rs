// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Rust detection (Cargo)

use tracing::debug;

use super::has_file_in_dir;
use crate::codebase::Codebase;
use crate::errors::InferResult;
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[Rule::new(DEPS_RUST, deps)];

fn deps(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    let Some(path) = codebase.find_file(&["Cargo.toml", "cargo.toml"]) else {
        return Ok(None);
    };

    let mut data = LabelData::at(&path);
    data.has_lock_file = has_file_in_dir(codebase, &data.base_path, &["Cargo.lock"]);

    // Dependency names are informational; a workspace manifest has none
    let manifest: toml::Value = match toml::from_str(&codebase.read_to_string(&path)?) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!(file = %path, error = %e, "unparseable Cargo manifest, keeping label without dependencies");
            return Ok(Some(data));
        }
    };
    for section in ["dependencies", "dev-dependencies"] {
        if let Some(table) = manifest.get(section).and_then(toml::Value::as_table) {
            for (name, spec) in table {
                let version = match spec {
                    toml::Value::String(v) => v.clone(),
                    other => other
                        .get("version")
                        .and_then(toml::Value::as_str)
                        .unwrap_or("*")
                        .to_string(),
                };
                data.dependencies.insert(name.clone(), version);
            }
        }
    }

    Ok(Some(data))
}
