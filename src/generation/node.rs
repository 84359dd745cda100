// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Node.js jobs

use crate::generation::common;
use crate::generation::jobs::{GeneratedJob, JobCategory};
use crate::labeling::labels::{LabelSet, DEPS_NODE, PACKAGE_MANAGER_YARN, TEST_JEST, YARN_BERRY};
use crate::pipeline::{Executor, Job, RunStep, Step};
use crate::settings::Settings;

const EXECUTOR: &str = "node/default";
const TEST_RESULTS_DIR: &str = "./test-results/";

/// Script `npm init` writes when no test script is given
const NPM_PLACEHOLDER_TEST: &str = "echo \"Error: no test specified\" && exit 1";

/// Build scripts in order of preference
const BUILD_TASKS: &[&str] = &[
    "build:ci",
    "build:production",
    "build:prod",
    "build",
    "build:development",
    "build:dev",
];

/// Test and build jobs for a detected Node.js project
pub fn generate_node_jobs(labels: &LabelSet, settings: &Settings) -> Vec<GeneratedJob> {
    if !labels.is_valid(DEPS_NODE) {
        return Vec::new();
    }

    let node = NodeProject::new(labels, settings);
    node.test_job().into_iter().chain(node.build_job()).collect()
}

struct NodeProject<'a> {
    labels: &'a LabelSet,
    settings: &'a Settings,
}

impl<'a> NodeProject<'a> {
    fn new(labels: &'a LabelSet, settings: &'a Settings) -> Self {
        Self { labels, settings }
    }

    fn package_manager(&self) -> &'static str {
        if self.labels.is_valid(PACKAGE_MANAGER_YARN) {
            "yarn"
        } else {
            "npm"
        }
    }

    fn is_yarn_berry(&self) -> bool {
        self.labels
            .data(PACKAGE_MANAGER_YARN)
            .map_or(false, |data| data.version == YARN_BERRY)
    }

    fn has_jest(&self) -> bool {
        self.labels.is_valid(TEST_JEST)
    }

    fn task(&self, name: &str) -> Option<&str> {
        self.labels.task(DEPS_NODE, name)
    }

    fn base_path(&self) -> &str {
        self.labels.base_path(DEPS_NODE)
    }

    fn run_command(&self, task: &str) -> String {
        if task == "test" {
            if self.task(task) == Some(NPM_PLACEHOLDER_TEST) {
                return "echo \"No test specified in package.json\"".to_string();
            }
            return format!("{} test --passWithNoTests", self.package_manager());
        }
        format!("{} run {}", self.package_manager(), task)
    }

    fn initial_steps(&self) -> Vec<Step> {
        let has_lock_file = self
            .labels
            .data(DEPS_NODE)
            .map_or(false, |data| data.has_lock_file);

        let pkg_manager = if self.is_yarn_berry() {
            "yarn-berry"
        } else {
            self.package_manager()
        };

        let install = if has_lock_file {
            Step::orb_with("node/install-packages", [("pkg-manager", pkg_manager.to_string())])
        } else {
            // The orb's default install command needs a lock file
            let project_dir = common::working_directory(self.base_path(), self.settings)
                .unwrap_or_else(|| self.settings.paths.checkout_root.clone());
            Step::orb_with(
                "node/install-packages",
                [
                    ("cache-path", format!("{}/node_modules", project_dir)),
                    ("override-ci-command", format!("{} install", self.package_manager())),
                    ("pkg-manager", pkg_manager.to_string()),
                ],
            )
        };

        vec![common::checkout_step(self.base_path(), self.settings), install]
    }

    fn test_steps(&self) -> Vec<Step> {
        let run_tests =
            |command: String| -> Vec<Step> { vec![RunStep::new(command).name("Run tests").into()] };

        if self.task("test:ci").is_some() {
            return run_tests(self.run_command("test:ci"));
        }

        if self.task("test").is_some() {
            if self.has_jest() {
                return run_tests(format!(
                    "{} run test --ci --runInBand --reporters=default --reporters=jest-junit",
                    self.package_manager()
                ));
            }
            return run_tests(self.run_command("test"));
        }

        if self.task("test:unit").is_some() {
            return run_tests(self.run_command("test:unit"));
        }

        if self.has_jest() {
            return vec![RunStep::new(
                "./node_modules/.bin/jest --ci --runInBand --reporters=default --reporters=jest-junit",
            )
            .name("Run tests with Jest")
            .into()];
        }

        Vec::new()
    }

    fn install_jest_junit_step(&self) -> Option<Step> {
        if !self.has_jest() || self.labels.has_dependency(DEPS_NODE, "jest-junit") {
            return None;
        }

        let command = match self.package_manager() {
            // Berry has no --ignore-workspace-root-check and does not need it
            "yarn" if self.is_yarn_berry() => "yarn add jest-junit",
            "yarn" => "yarn add jest-junit --ignore-workspace-root-check",
            _ => "npm install jest-junit",
        };
        Some(Step::run(command))
    }

    fn job(&self, name: &str, comment: &str, steps: Vec<Step>) -> Job {
        Job {
            name: name.to_string(),
            comment: comment.to_string(),
            executor: Executor::Named(EXECUTOR.to_string()),
            working_directory: common::working_directory(self.base_path(), self.settings),
            environment: Default::default(),
            steps,
        }
    }

    fn test_job(&self) -> Option<GeneratedJob> {
        let test_steps = self.test_steps();
        if test_steps.is_empty() {
            return None;
        }

        let mut steps = self.initial_steps();
        steps.extend(self.install_jest_junit_step());
        steps.extend(test_steps);

        let mut job = self.job("test-node", "Install node dependencies and run tests", steps);

        if self.has_jest() {
            job.steps.push(Step::store_test_results(TEST_RESULTS_DIR));
            job.environment
                .insert("JEST_JUNIT_OUTPUT_DIR".into(), TEST_RESULTS_DIR.into());
        }

        Some(GeneratedJob::new(job, JobCategory::Test).with_orb("node", &self.settings.orbs.node))
    }

    fn build_job(&self) -> Option<GeneratedJob> {
        let task = BUILD_TASKS.iter().find(|task| self.task(task).is_some())?;

        let mut steps = self.initial_steps();
        steps.extend([
            Step::run(self.run_command(task)),
            common::create_artifacts_dir_step(self.settings),
            RunStep::new(format!(
                "cp -R build dist public .output .next .docusaurus {} 2>/dev/null || true",
                self.settings.paths.artifacts
            ))
            .name("Copy artifacts")
            .comment("Copy output to artifacts dir")
            .into(),
            common::store_artifacts_step(self.settings, "node-build"),
        ]);

        let job = self.job("build-node", "Build node project", steps);
        Some(GeneratedJob::new(job, JobCategory::Artifact).with_orb("node", &self.settings.orbs.node))
    }
}
