// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Java jobs

use crate::generation::common;
use crate::generation::jobs::{GeneratedJob, JobCategory};
use crate::labeling::labels::{LabelSet, DEPS_JAVA, FILE_BUILD_GRADLE_KTS, TOOL_GRADLE};
use crate::pipeline::{Job, Step};
use crate::settings::Settings;

/// Build tool driving the tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTool {
    Maven,
    Gradle { kotlin_dsl: bool },
}

impl BuildTool {
    pub fn detect(labels: &LabelSet) -> Self {
        if labels.is_valid(TOOL_GRADLE) {
            BuildTool::Gradle {
                kotlin_dsl: labels.is_valid(FILE_BUILD_GRADLE_KTS),
            }
        } else {
            BuildTool::Maven
        }
    }

    pub fn cache_key(self) -> String {
        match self {
            BuildTool::Maven => r#"maven-{{ checksum "pom.xml" }}"#.to_string(),
            BuildTool::Gradle { kotlin_dsl } => {
                let build_file = if kotlin_dsl { "build.gradle.kts" } else { "build.gradle" };
                format!(
                    r#"gradle-{{{{ checksum "{}" }}}}-{{{{ checksum "gradlew" }}}}"#,
                    build_file
                )
            }
        }
    }

    pub fn cache_path(self) -> &'static str {
        match self {
            BuildTool::Maven => "~/.m2/repository",
            BuildTool::Gradle { .. } => "~/.gradle/caches",
        }
    }

    pub fn test_command(self) -> &'static str {
        match self {
            BuildTool::Maven => "mvn verify",
            BuildTool::Gradle { .. } => "./gradlew check",
        }
    }

    pub fn test_results_path(self) -> &'static str {
        match self {
            BuildTool::Maven => "target/surefire-reports",
            BuildTool::Gradle { .. } => "build/test-results",
        }
    }

    /// HTML reports worth keeping as artifacts
    pub fn reports_path(self) -> Option<&'static str> {
        match self {
            BuildTool::Maven => None,
            BuildTool::Gradle { .. } => Some("build/reports"),
        }
    }
}

pub fn generate_java_jobs(labels: &LabelSet, settings: &Settings) -> Vec<GeneratedJob> {
    if !labels.is_valid(DEPS_JAVA) {
        return Vec::new();
    }

    let tool = BuildTool::detect(labels);
    let base_path = labels.base_path(DEPS_JAVA);
    let cache_key = tool.cache_key();

    let mut job = Job::docker("test-java", &settings.images.java);
    job.comment = "Build the project and run tests".into();
    job.working_directory = common::working_directory(base_path, settings);
    job.steps = vec![
        common::checkout_step(base_path, settings),
        Step::restore_cache(&cache_key),
        Step::run(tool.test_command()),
        Step::store_test_results(tool.test_results_path()),
        Step::save_cache(&cache_key, tool.cache_path()),
    ];
    job.steps
        .extend(tool.reports_path().map(Step::store_artifacts));

    vec![GeneratedJob::new(job, JobCategory::Test)]
}
