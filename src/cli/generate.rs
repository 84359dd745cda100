// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Default command: detect stacks and print the generated config

use std::path::Path;
use tracing::debug;

use crate::codebase::LocalCodebase;
use crate::errors::InferResult;
use crate::generation::generate_config;
use crate::labeling::apply_all_rules;
use crate::settings::Settings;

pub fn run(dir: &Path, settings: &Settings, max_depth: usize) -> InferResult<String> {
    let codebase = LocalCodebase::with_max_depth(dir, max_depth)?;
    debug!(dir = %dir.display(), "inspecting codebase");

    let labels = apply_all_rules(&codebase);
    let config = generate_config(&labels, settings)?;
    Ok(config.render())
}
