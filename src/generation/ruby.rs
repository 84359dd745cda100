// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Ruby jobs

use std::collections::BTreeMap;

use crate::generation::common;
use crate::generation::jobs::{GeneratedJob, JobCategory};
use crate::labeling::labels::{LabelSet, DEPS_RUBY, PACKAGE_MANAGER_GEMSPEC};
use crate::pipeline::{Executor, Job, RunStep, Step};
use crate::settings::Settings;

/// How gems get installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Installer {
    /// `ruby/install-deps`, which needs a Gemfile.lock
    Orb,
    Bundler,
}

impl Installer {
    fn detect(labels: &LabelSet) -> Self {
        let has_lock_file = labels.data(DEPS_RUBY).map_or(false, |d| d.has_lock_file);
        if !has_lock_file && labels.is_valid(PACKAGE_MANAGER_GEMSPEC) {
            Installer::Bundler
        } else {
            Installer::Orb
        }
    }

    fn step(self) -> Step {
        match self {
            Installer::Orb => Step::orb("ruby/install-deps"),
            Installer::Bundler => Step::run("bundle install"),
        }
    }
}

/// How the tests are invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Runner {
    Rake,
    Rspec { junit_formatter: bool },
}

impl Runner {
    fn detect(labels: &LabelSet) -> Option<Self> {
        // Only a gem declares rake as its test entry point
        if labels.has_dependency(PACKAGE_MANAGER_GEMSPEC, "rake") {
            Some(Runner::Rake)
        } else if has_gem(labels, "rspec") {
            Some(Runner::Rspec {
                junit_formatter: has_gem(labels, "rspec_junit_formatter"),
            })
        } else {
            None
        }
    }

    fn comment(self) -> &'static str {
        match self {
            Runner::Rake => "Install gems, run rake tests",
            Runner::Rspec { .. } => "Install gems, run rspec tests",
        }
    }

    fn steps(self) -> Vec<Step> {
        match self {
            Runner::Rake => vec![RunStep::new("bundle exec rake test")
                .name("rake test")
                .into()],
            Runner::Rspec {
                junit_formatter: true,
            } => vec![Step::orb("ruby/rspec-test")],
            Runner::Rspec {
                junit_formatter: false,
            } => vec![RunStep::new("bundle exec rspec").name("rspec test").into()],
        }
    }
}

/// Gem declared by the Gemfile or the gemspec
fn has_gem(labels: &LabelSet, gem: &str) -> bool {
    [DEPS_RUBY, PACKAGE_MANAGER_GEMSPEC]
        .iter()
        .any(|key| labels.has_dependency(key, gem))
}

fn database_steps() -> Vec<Step> {
    vec![
        RunStep::new("dockerize -wait tcp://localhost:5432 -timeout 1m")
            .name("wait for DB")
            .into(),
        RunStep::new("bundle exec rake db:test:prepare")
            .name("Database setup")
            .into(),
    ]
}

pub fn generate_ruby_jobs(labels: &LabelSet, settings: &Settings) -> Vec<GeneratedJob> {
    if !labels.is_valid(DEPS_RUBY) {
        return Vec::new();
    }
    let Some(runner) = Runner::detect(labels) else {
        return Vec::new();
    };

    let base_path = labels.base_path(DEPS_RUBY);
    let mut images = vec![settings.images.ruby(labels.dependency(DEPS_RUBY, "ruby"))];

    let mut steps = vec![
        common::checkout_step(base_path, settings),
        Installer::detect(labels).step(),
    ];

    let mut environment = BTreeMap::new();
    if let Runner::Rspec { .. } = runner {
        if labels.has_dependency(DEPS_RUBY, "pg") {
            images.push(settings.images.postgres.clone());
            steps.extend(database_steps());
        }
        environment.insert("RAILS_ENV".to_string(), "test".to_string());
    }
    steps.extend(runner.steps());

    let job = Job {
        name: "test-ruby".into(),
        comment: runner.comment().into(),
        executor: Executor::Docker(images),
        working_directory: common::working_directory(base_path, settings),
        environment,
        steps,
    };

    vec![GeneratedJob::new(job, JobCategory::Test).with_orb("ruby", &settings.orbs.ruby)]
}
