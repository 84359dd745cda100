// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Rust jobs

use crate::generation::common;
use crate::generation::jobs::{GeneratedJob, JobCategory};
use crate::labeling::labels::{LabelSet, DEPS_RUST};
use crate::pipeline::{Job, Step};
use crate::settings::Settings;

const CACHE_KEY: &str = r#"cargo-{{ checksum "Cargo.lock" }}"#;

pub fn generate_rust_jobs(labels: &LabelSet, settings: &Settings) -> Vec<GeneratedJob> {
    if !labels.is_valid(DEPS_RUST) {
        return Vec::new();
    }

    let base_path = labels.base_path(DEPS_RUST);
    let cached = labels.data(DEPS_RUST).map_or(false, |d| d.has_lock_file);

    let mut job = Job::docker("test-rust", &settings.images.rust);
    job.comment = "Run cargo tests".into();
    job.working_directory = common::working_directory(base_path, settings);
    job.steps.push(common::checkout_step(base_path, settings));
    if cached {
        job.steps.push(Step::restore_cache(CACHE_KEY));
    }
    job.steps.push(Step::run("cargo test"));
    if cached {
        job.steps.push(Step::save_cache(CACHE_KEY, "~/.cargo"));
    }

    vec![GeneratedJob::new(job, JobCategory::Test)]
}
