// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Stub jobs and the generic template used when no stack produced a job

use crate::generation::common;
use crate::generation::jobs::{banner, GeneratedJob, JobCategory};
use crate::labeling::LabelSet;
use crate::pipeline::{Config, Job, RunStep, Step, Workflow, WorkflowJob};
use crate::settings::Settings;

const FALLBACK_BANNER: &str = "This is a generic template: no stack-specific config could be \
inferred from your source code";

pub(crate) fn stub_test_job(settings: &Settings) -> GeneratedJob {
    let mut job = Job::docker("test", &settings.images.base);
    job.steps = vec![
        Step::checkout(),
        RunStep::new("echo 'replace me with real tests!' && false")
            .name("Run tests")
            .comment("Replace this with a real test runner invocation")
            .into(),
    ];
    GeneratedJob::new(job, JobCategory::Test)
}

pub(crate) fn stub_build_job(settings: &Settings) -> GeneratedJob {
    let mut job = Job::docker("build", &settings.images.base);
    job.steps = vec![
        Step::checkout(),
        RunStep::new("touch example.txt")
            .name("Build an artifact")
            .comment("Replace this with steps to build a package, or executable")
            .into(),
        Step::store_artifacts("example.txt"),
    ];
    GeneratedJob::new(job, JobCategory::Artifact)
}

pub(crate) fn stub_deploy_job(settings: &Settings) -> GeneratedJob {
    let mut job = Job::docker("deploy", &settings.images.base);
    job.comment = "This is an example deploy job, not actually used by the workflow".into();
    job.steps = vec![RunStep::new("#e.g. ./deploy.sh")
        .name("deploy")
        .comment("Replace this with steps to deploy to users")
        .into()];
    GeneratedJob::new(job, JobCategory::Deploy)
}

/// Generic test, build and deploy template scheduled as one linear workflow
pub(crate) fn fallback_config(labels: &LabelSet, settings: &Settings) -> Config {
    let test = stub_test_job(settings).job;
    let build = stub_build_job(settings).job;
    let mut deploy = stub_deploy_job(settings).job;

    let mut steps = common::ci_info_steps(labels);
    steps.extend(common::empty_repo_steps(labels));
    steps.append(&mut deploy.steps);
    deploy.steps = steps;

    let workflow = Workflow {
        name: "example".into(),
        jobs: vec![
            WorkflowJob::new(&test.name),
            WorkflowJob::new(&build.name).requires([&test.name]),
            WorkflowJob::new(&deploy.name).requires([&build.name]),
        ],
    };

    Config {
        comment: banner(FALLBACK_BANNER, labels),
        orbs: Vec::new(),
        jobs: vec![test, build, deploy],
        workflows: vec![workflow],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::labels::{Label, LabelData, CICD_GITLAB_CI, REPO_EMPTY};

    fn step_names(job: &Job) -> Vec<&str> {
        job.steps
            .iter()
            .filter_map(|step| match step {
                Step::Run(run) => run.name.as_deref(),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fallback_is_linear() {
        let config = fallback_config(&LabelSet::new(), &Settings::default());

        assert_eq!(config.comment, FALLBACK_BANNER);
        assert_eq!(config.job_names(), ["test", "build", "deploy"]);

        let jobs = &config.workflows[0].jobs;
        assert!(jobs[0].requires.is_empty());
        assert_eq!(jobs[1].requires, ["test"]);
        assert_eq!(jobs[2].requires, ["build"]);
        assert!(jobs.iter().all(|j| !j.commented_out));
    }

    #[test]
    fn test_fallback_annotates_detected_labels() {
        let labels: LabelSet = [
            Label::new(REPO_EMPTY, LabelData::default()),
            Label::new(CICD_GITLAB_CI, LabelData::at(".gitlab-ci.yml")),
        ]
        .into_iter()
        .collect();
        let config = fallback_config(&labels, &Settings::default());

        assert!(config
            .comment
            .ends_with("Stacks detected: cicd:gitlab-ci:.,repo:empty:."));

        let deploy = config.get_job("deploy").unwrap();
        assert_eq!(
            step_names(deploy),
            ["found gitlab ci config", "found an empty repository", "deploy"]
        );
    }

    #[test]
    fn test_stub_jobs_use_base_image() {
        let mut settings = Settings::default();
        settings.images.base = "ubuntu:22.04".into();

        let config = fallback_config(&LabelSet::new(), &settings);
        assert!(config
            .jobs
            .iter()
            .all(|j| j.executor == crate::pipeline::Executor::Docker(vec!["ubuntu:22.04".into()])));
    }
}
