// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Workflow assembly
//!
//! Generated jobs are merged into one config: missing job categories are
//! filled with stubs, `requires` edges are derived from categories, and the
//! orbs used by every job are merged into one name-sorted list.

use std::collections::BTreeMap;

use crate::generation::{common, fallback};
use crate::labeling::LabelSet;
use crate::pipeline::{Config, Job, Orb, Workflow, WorkflowJob};
use crate::settings::Settings;

/// First line of every generated banner
pub const BANNER: &str = "This config was automatically generated from your source code";

/// What a job contributes to the workflow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobCategory {
    Test,
    Artifact,
    Deploy,
}

/// A job produced by a generator, with the orbs it uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedJob {
    pub job: Job,
    pub category: JobCategory,
    /// Orb short name (e.g. `node`) to registry key (e.g. `circleci/node@5`)
    pub orbs: BTreeMap<String, String>,
}

impl GeneratedJob {
    pub fn new(job: Job, category: JobCategory) -> Self {
        Self {
            job,
            category,
            orbs: BTreeMap::new(),
        }
    }

    pub fn with_orb(mut self, name: impl Into<String>, registry_key: impl Into<String>) -> Self {
        self.orbs.insert(name.into(), registry_key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.job.name
    }
}

/// Assemble generated jobs into a config
///
/// With no jobs at all, the generic fallback template is returned instead.
pub fn build_config(labels: &LabelSet, jobs: Vec<GeneratedJob>, settings: &Settings) -> Config {
    if jobs.is_empty() {
        return fallback::fallback_config(labels, settings);
    }

    let jobs = add_stub_jobs(labels, jobs, settings);
    let workflow = build_workflow(&jobs);
    let orbs = build_orbs(&jobs);

    Config {
        comment: banner(BANNER, labels),
        orbs,
        jobs: jobs.into_iter().map(|j| j.job).collect(),
        workflows: vec![workflow],
    }
}

/// Banner text followed by the detected stacks, if any
pub(crate) fn banner(head: &str, labels: &LabelSet) -> String {
    if labels.is_empty() {
        head.to_string()
    } else {
        format!("{}\nStacks detected: {}", head, labels)
    }
}

fn add_stub_jobs(
    labels: &LabelSet,
    mut jobs: Vec<GeneratedJob>,
    settings: &Settings,
) -> Vec<GeneratedJob> {
    let has = |jobs: &[GeneratedJob], category: JobCategory| {
        jobs.iter().any(|j| j.category == category)
    };

    if !has(&jobs, JobCategory::Test) && !has(&jobs, JobCategory::Artifact) {
        jobs.push(fallback::stub_test_job(settings));
    }
    if !has(&jobs, JobCategory::Deploy) {
        let mut deploy = fallback::stub_deploy_job(settings);
        let mut steps = common::ci_info_steps(labels);
        steps.extend(common::empty_repo_steps(labels));
        steps.append(&mut deploy.job.steps);
        deploy.job.steps = steps;
        jobs.push(deploy);
    }

    jobs
}

fn names_of(jobs: &[GeneratedJob], category: JobCategory) -> Vec<String> {
    jobs.iter()
        .filter(|j| j.category == category)
        .map(|j| j.name().to_string())
        .collect()
}

fn build_workflow(jobs: &[GeneratedJob]) -> Workflow {
    let tests = names_of(jobs, JobCategory::Test);
    let artifacts = names_of(jobs, JobCategory::Artifact);

    let workflow_jobs = jobs
        .iter()
        .map(|j| match j.category {
            JobCategory::Test => WorkflowJob::new(j.name()),
            JobCategory::Artifact => WorkflowJob::new(j.name()).requires(tests.iter().cloned()),
            // Deploy after artifacts when there are any, since they already
            // require the tests
            JobCategory::Deploy => {
                let prerequisites = if artifacts.is_empty() { &tests } else { &artifacts };
                WorkflowJob::new(j.name())
                    .requires(prerequisites.iter().cloned())
                    .commented_out(true)
            }
        })
        .collect();

    let name = if tests.is_empty() { "build" } else { "build-and-test" };

    Workflow {
        name: name.to_string(),
        jobs: workflow_jobs,
    }
}

fn build_orbs(jobs: &[GeneratedJob]) -> Vec<Orb> {
    let mut by_name = BTreeMap::new();
    for job in jobs {
        for (name, registry_key) in &job.orbs {
            by_name.insert(name.clone(), registry_key.clone());
        }
    }

    by_name
        .into_iter()
        .map(|(name, registry_key)| Orb { name, registry_key })
        .collect()
}
