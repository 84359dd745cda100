// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! PHP jobs

use crate::generation::common;
use crate::generation::jobs::{GeneratedJob, JobCategory};
use crate::labeling::labels::{LabelSet, DEPS_PHP};
use crate::labeling::rules::strip_version_constraint;
use crate::pipeline::{Job, RunStep, Step};
use crate::settings::Settings;

/// A phpunit job when composer declares phpunit
pub fn generate_php_jobs(labels: &LabelSet, settings: &Settings) -> Vec<GeneratedJob> {
    if !labels.is_valid(DEPS_PHP) || !labels.has_dependency(DEPS_PHP, "phpunit/phpunit") {
        return Vec::new();
    }

    let base_path = labels.base_path(DEPS_PHP);
    let version = labels.dependency(DEPS_PHP, "php").and_then(image_version);

    let mut job = Job::docker("test-php", settings.images.php(version.as_deref()));
    job.comment = "Install php packages and run tests".into();
    job.working_directory = common::working_directory(base_path, settings);
    job.steps = vec![
        common::checkout_step(base_path, settings),
        Step::orb("php/install-packages"),
        RunStep::new("./vendor/bin/phpunit").name("run tests").into(),
    ];

    vec![GeneratedJob::new(job, JobCategory::Test).with_orb("php", &settings.orbs.php)]
}

/// Image tag for a composer `php` constraint such as `^8.1` or `>=7.4 <9`
fn image_version(constraint: &str) -> Option<String> {
    let version: String = strip_version_constraint(constraint)
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let version = version.trim_end_matches('.');
    (!version.is_empty()).then(|| version.to_string())
}
