// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Steps shared by every stack

use crate::labeling::labels::{
    LabelSet, CICD_GITHUB_ACTIONS, CICD_GITLAB_CI, CICD_JENKINS, REPO_EMPTY,
};
use crate::pipeline::{RunStep, Step};
use crate::settings::Settings;

/// Checkout step for a stack rooted at `base_path`
///
/// Stacks outside the repository root check out to the conventional root so
/// jobs for different stacks agree on where the sources live.
pub(crate) fn checkout_step(base_path: &str, settings: &Settings) -> Step {
    if is_root(base_path) {
        Step::checkout()
    } else {
        Step::Checkout {
            path: Some(settings.paths.checkout_root.clone()),
        }
    }
}

/// Working directory for a stack rooted at `base_path`, if not the root
pub(crate) fn working_directory(base_path: &str, settings: &Settings) -> Option<String> {
    if is_root(base_path) {
        return None;
    }
    Some(format!(
        "{}/{}",
        settings.paths.checkout_root.trim_end_matches('/'),
        base_path.trim_start_matches("./").trim_end_matches('/')
    ))
}

pub(crate) fn create_artifacts_dir_step(settings: &Settings) -> Step {
    let dir = &settings.paths.artifacts;
    RunStep::new(format!("mkdir -p {}", dir))
        .name(format!("Create the {} directory if it doesn't exist", dir))
        .into()
}

pub(crate) fn store_artifacts_step(settings: &Settings, destination: &str) -> Step {
    Step::StoreArtifacts {
        path: settings.paths.artifacts.clone(),
        destination: Some(destination.to_string()),
    }
}

/// No-op steps noting CI systems already configured in the repository
pub(crate) fn ci_info_steps(labels: &LabelSet) -> Vec<Step> {
    [
        (CICD_GITHUB_ACTIONS, "found github actions config"),
        (CICD_GITLAB_CI, "found gitlab ci config"),
        (CICD_JENKINS, "found jenkins config"),
    ]
    .into_iter()
    .filter(|(key, _)| labels.is_valid(key))
    .map(|(_, name)| info_step(name))
    .collect()
}

/// No-op step noting the repository had no source files
pub(crate) fn empty_repo_steps(labels: &LabelSet) -> Vec<Step> {
    if labels.is_valid(REPO_EMPTY) {
        vec![info_step("found an empty repository")]
    } else {
        Vec::new()
    }
}

fn info_step(name: &str) -> Step {
    RunStep::new(":").name(name).into()
}

fn is_root(base_path: &str) -> bool {
    base_path.is_empty() || base_path == "."
}
