// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Existing CI system detection
//!
//! These labels never produce stack jobs; they only annotate the generated
//! deploy job so users can see what was found.

use crate::codebase::Codebase;
use crate::errors::InferResult;
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[
    Rule::new(CICD_GITHUB_ACTIONS, github_actions),
    Rule::new(CICD_GITLAB_CI, gitlab_ci),
    Rule::new(CICD_JENKINS, jenkins),
];

fn found(codebase: &dyn Codebase, globs: &[&str]) -> InferResult<Option<LabelData>> {
    Ok(codebase.find_file(globs).map(|path| LabelData::at(&path)))
}

fn github_actions(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    found(codebase, &[".github/workflows/*.yml", ".github/workflows/*.yaml"])
}

fn gitlab_ci(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    found(codebase, &[".gitlab-ci.yml"])
}

fn jenkins(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    found(codebase, &["Jenkinsfile"])
}
