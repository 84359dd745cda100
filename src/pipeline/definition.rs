// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Pipeline configuration structures
//!
//! The generated config as a typed tree: jobs made of steps, workflows that
//! schedule jobs, and the orbs the jobs use. Every entity knows how to turn
//! itself into a document [`Node`].

use std::collections::BTreeMap;

use crate::pipeline::document::{self, Node};

/// Config schema version emitted at the top of every document
pub const CONFIG_VERSION: &str = "2.1";

/// Root of a generated configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Banner rendered above the document
    pub comment: String,
    /// Name-sorted, one entry per orb name
    pub orbs: Vec<Orb>,
    /// Job definitions in generation order
    pub jobs: Vec<Job>,
    pub workflows: Vec<Workflow>,
}

impl Config {
    /// Get a job by name
    pub fn get_job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.name == name)
    }

    /// Get all job names
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.name.as_str()).collect()
    }

    pub fn to_node(&self) -> Node {
        let mut root = vec![(Node::scalar("version"), Node::scalar(CONFIG_VERSION))];

        if !self.orbs.is_empty() {
            let orbs = self
                .orbs
                .iter()
                .map(|o| (Node::scalar(&o.name), Node::scalar(&o.registry_key)))
                .collect();
            root.push((Node::scalar("orbs"), Node::mapping(orbs)));
        }

        let jobs = self
            .jobs
            .iter()
            .map(|j| (Node::scalar(&j.name), j.to_node()))
            .collect();
        root.push((Node::scalar("jobs"), Node::mapping(jobs)));

        let workflows = self
            .workflows
            .iter()
            .map(|w| (Node::scalar(&w.name), w.to_node()))
            .collect();
        root.push((Node::scalar("workflows"), Node::mapping(workflows)));

        Node::mapping(root).with_head_comment(&self.comment)
    }

    /// Render the config as YAML text
    pub fn render(&self) -> String {
        document::render(&self.to_node())
    }
}

/// A reusable package of CircleCI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orb {
    /// Short name used as a command prefix, e.g. `node`
    pub name: String,
    /// Registry reference, e.g. `circleci/node@5`
    pub registry_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub name: String,
    pub jobs: Vec<WorkflowJob>,
}

impl Workflow {
    pub fn to_node(&self) -> Node {
        let jobs = self.jobs.iter().map(WorkflowJob::to_node).collect();
        Node::mapping(vec![(Node::scalar("jobs"), Node::sequence(jobs))])
    }
}

/// A job scheduled by a workflow
///
/// Jobs are referenced by name; the definitions live under the config's
/// top-level `jobs` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowJob {
    pub job: String,
    pub requires: Vec<String>,
    /// Rendered as an inert comment block instead of a live entry
    pub commented_out: bool,
}

impl WorkflowJob {
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            requires: Vec::new(),
            commented_out: false,
        }
    }

    pub fn requires(mut self, jobs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.requires.extend(jobs.into_iter().map(Into::into));
        self
    }

    pub fn commented_out(mut self, commented_out: bool) -> Self {
        self.commented_out = commented_out;
        self
    }

    pub fn to_node(&self) -> Node {
        let node = if self.requires.is_empty() {
            Node::scalar(&self.job)
        } else {
            let requires = self.requires.iter().map(Node::scalar).collect();
            Node::mapping(vec![(
                Node::scalar(&self.job),
                Node::mapping(vec![(Node::scalar("requires"), Node::sequence(requires))]),
            )])
        };

        if self.commented_out {
            node.commented_out()
        } else {
            node
        }
    }
}

/// Where a job's steps run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executor {
    /// Docker images; the first is the primary container
    Docker(Vec<String>),
    /// Executor provided by an orb, e.g. `node/default`
    Named(String),
}

/// Job definition as it appears under the top-level `jobs` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub comment: String,
    pub executor: Executor,
    pub working_directory: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub steps: Vec<Step>,
}

impl Job {
    /// A job running in a single docker image
    pub fn docker(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            executor: Executor::Docker(vec![image.into()]),
            working_directory: None,
            environment: BTreeMap::new(),
            steps: Vec::new(),
        }
    }

    pub fn to_node(&self) -> Node {
        let mut content = Vec::new();

        match &self.executor {
            Executor::Docker(images) => {
                let images = images
                    .iter()
                    .map(|image| Node::mapping(vec![(Node::scalar("image"), Node::scalar(image))]))
                    .collect();
                content.push((Node::scalar("docker"), Node::sequence(images)));
            }
            Executor::Named(name) => {
                content.push((Node::scalar("executor"), Node::scalar(name)));
            }
        }

        if let Some(dir) = &self.working_directory {
            content.push((Node::scalar("working_directory"), Node::scalar(dir)));
        }

        if !self.environment.is_empty() {
            let env = self
                .environment
                .iter()
                .map(|(k, v)| (Node::scalar(k), Node::scalar(v)))
                .collect();
            content.push((Node::scalar("environment"), Node::mapping(env)));
        }

        let steps = self.steps.iter().map(Step::to_node).collect();
        content.push((Node::scalar("steps"), Node::sequence(steps)));

        Node::mapping(content).with_head_comment(&self.comment)
    }
}

/// A shell command step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStep {
    pub name: Option<String>,
    pub command: String,
    /// Run only when an earlier step failed
    pub on_fail: bool,
    pub comment: Option<String>,
}

impl RunStep {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            name: None,
            command: command.into(),
            on_fail: false,
            comment: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_fail(mut self) -> Self {
        self.on_fail = true;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl From<RunStep> for Step {
    fn from(run: RunStep) -> Self {
        Step::Run(run)
    }
}

/// A single job step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Checkout {
        path: Option<String>,
    },
    Run(RunStep),
    SaveCache {
        key: String,
        path: String,
    },
    RestoreCache {
        key: String,
    },
    StoreArtifacts {
        path: String,
        destination: Option<String>,
    },
    StoreTestResults {
        path: String,
    },
    /// A command provided by an orb; parameters render sorted by key
    OrbCommand {
        command: String,
        parameters: BTreeMap<String, String>,
    },
}

impl Step {
    pub fn checkout() -> Self {
        Step::Checkout { path: None }
    }

    pub fn run(command: impl Into<String>) -> Self {
        Step::Run(RunStep::new(command))
    }

    pub fn orb(command: impl Into<String>) -> Self {
        Step::OrbCommand {
            command: command.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn orb_with<'a>(
        command: impl Into<String>,
        parameters: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Self {
        Step::OrbCommand {
            command: command.into(),
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn restore_cache(key: impl Into<String>) -> Self {
        Step::RestoreCache { key: key.into() }
    }

    pub fn save_cache(key: impl Into<String>, path: impl Into<String>) -> Self {
        Step::SaveCache {
            key: key.into(),
            path: path.into(),
        }
    }

    pub fn store_test_results(path: impl Into<String>) -> Self {
        Step::StoreTestResults { path: path.into() }
    }

    pub fn store_artifacts(path: impl Into<String>) -> Self {
        Step::StoreArtifacts {
            path: path.into(),
            destination: None,
        }
    }

    pub fn to_node(&self) -> Node {
        match self {
            Step::Checkout { path: None } => Node::scalar("checkout"),
            Step::Checkout { path: Some(path) } => single(
                "checkout",
                Node::mapping(vec![(Node::scalar("path"), Node::scalar(path))]),
            ),
            Step::Run(run) => {
                let mut content = Vec::new();
                if let Some(name) = &run.name {
                    content.push((Node::scalar("name"), Node::scalar(name)));
                }
                content.push((Node::scalar("command"), Node::scalar(&run.command)));
                if run.on_fail {
                    content.push((Node::scalar("when"), Node::scalar("on_fail")));
                }
                let node = single("run", Node::mapping(content));
                match &run.comment {
                    Some(comment) => node.with_head_comment(comment),
                    None => node,
                }
            }
            Step::SaveCache { key, path } => single(
                "save_cache",
                Node::mapping(vec![
                    (Node::scalar("key"), Node::scalar(key)),
                    (Node::scalar("paths"), Node::sequence(vec![Node::scalar(path)])),
                ]),
            ),
            Step::RestoreCache { key } => single(
                "restore_cache",
                Node::mapping(vec![(Node::scalar("key"), Node::scalar(key))]),
            ),
            Step::StoreArtifacts { path, destination } => {
                let mut content = vec![(Node::scalar("path"), Node::scalar(path))];
                if let Some(destination) = destination {
                    content.push((Node::scalar("destination"), Node::scalar(destination)));
                }
                single("store_artifacts", Node::mapping(content))
            }
            Step::StoreTestResults { path } => single(
                "store_test_results",
                Node::mapping(vec![(Node::scalar("path"), Node::scalar(path))]),
            ),
            Step::OrbCommand {
                command,
                parameters,
            } => {
                if parameters.is_empty() {
                    Node::scalar(command)
                } else {
                    let params = parameters
                        .iter()
                        .map(|(k, v)| (Node::scalar(k), Node::scalar(v)))
                        .collect();
                    single(command, Node::mapping(params))
                }
            }
        }
    }
}

fn single(key: &str, value: Node) -> Node {
    Node::mapping(vec![(Node::scalar(key), value)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::document::render;

    fn job(name: &str) -> Job {
        Job::docker(name, "cimg/base:stable")
    }

    #[test]
    fn test_config_render() {
        let mut test_job = job("node-test-job");
        test_job.steps = vec![
            Step::checkout(),
            Step::restore_cache("npm-cache-key"),
            Step::run("npm install"),
            Step::save_cache("npm-cache-key", "./node_modules"),
            Step::run("npm test"),
        ];
        let mut build_job = job("node-build-job");
        build_job.steps = vec![Step::checkout(), Step::run("npm pack")];

        let config = Config {
            comment: String::new(),
            orbs: vec![Orb {
                name: "node".into(),
                registry_key: "circleci/node@5".into(),
            }],
            jobs: vec![test_job, build_job],
            workflows: vec![Workflow {
                name: "node-workflow".into(),
                jobs: vec![
                    WorkflowJob::new("node-test-job"),
                    WorkflowJob::new("node-build-job").requires(["node-test-job"]),
                ],
            }],
        };

        let expected = "version: 2.1\n\
            orbs:\n  node: circleci/node@5\n\
            jobs:\n  node-test-job:\n    docker:\n      - image: cimg/base:stable\n    steps:\n      - checkout\n\
            \x20     - restore_cache:\n          key: npm-cache-key\n\
            \x20     - run:\n          command: npm install\n\
            \x20     - save_cache:\n          key: npm-cache-key\n          paths:\n            - ./node_modules\n\
            \x20     - run:\n          command: npm test\n\
            \x20 node-build-job:\n    docker:\n      - image: cimg/base:stable\n    steps:\n      - checkout\n\
            \x20     - run:\n          command: npm pack\n\
            workflows:\n  node-workflow:\n    jobs:\n      - node-test-job\n      - node-build-job:\n          requires:\n            - node-test-job\n";
        assert_eq!(config.render(), expected);
    }

    #[test]
    fn test_orbs_omitted_when_empty() {
        let config = Config::default();
        assert_eq!(config.render(), "version: 2.1\njobs: {}\nworkflows: {}\n");
    }

    #[test]
    fn test_workflow_job_without_requires() {
        assert_eq!(render(&WorkflowJob::new("job1").to_node()), "job1\n");
        assert_eq!(
            render(&WorkflowJob::new("job1").requires(Vec::<String>::new()).to_node()),
            "job1\n"
        );
    }

    #[test]
    fn test_workflow_job_with_requires() {
        let node = WorkflowJob::new("job1").requires(["job2", "job3"]).to_node();
        assert_eq!(render(&node), "job1:\n  requires:\n    - job2\n    - job3\n");
    }

    #[test]
    fn test_commented_out_workflow_job() {
        let workflow = Workflow {
            name: "ci".into(),
            jobs: vec![
                WorkflowJob::new("test"),
                WorkflowJob::new("deploy").requires(["test"]).commented_out(true),
            ],
        };
        assert_eq!(
            render(&workflow.to_node()),
            "jobs:\n  - test\n  # - deploy:\n  #     requires:\n  #       - test\n"
        );
    }

    #[test]
    fn test_job_with_docker_image_and_comment() {
        let mut j = job("job");
        j.comment = "This is a job that uses docker".into();
        j.steps = vec![
            Step::checkout(),
            RunStep::new("npm install").comment("get deps").into(),
        ];

        assert_eq!(
            render(&j.to_node()),
            "# This is a job that uses docker\n\
             docker:\n  - image: cimg/base:stable\n\
             steps:\n  - checkout\n  # get deps\n  - run:\n      command: npm install\n"
        );
    }

    #[test]
    fn test_job_with_executor_and_environment() {
        let mut j = job("job");
        j.executor = Executor::Named("node/default".into());
        j.working_directory = Some("~/project/web".into());
        j.environment.insert("B".into(), "2".into());
        j.environment.insert("A".into(), "1".into());
        j.steps = vec![Step::checkout()];

        assert_eq!(
            render(&j.to_node()),
            "executor: node/default\nworking_directory: ~/project/web\nenvironment:\n  A: 1\n  B: 2\nsteps:\n  - checkout\n"
        );
    }

    #[test]
    fn test_step_nodes() {
        let cases: Vec<(Step, &str)> = vec![
            (Step::checkout(), "checkout\n"),
            (
                Step::Checkout {
                    path: Some("~/project".into()),
                },
                "checkout:\n  path: ~/project\n",
            ),
            (
                RunStep::new("go mod download").name("Download").on_fail().into(),
                "run:\n  name: Download\n  command: go mod download\n  when: on_fail\n",
            ),
            (
                Step::StoreArtifacts {
                    path: "~/artifacts".into(),
                    destination: Some("executables".into()),
                },
                "store_artifacts:\n  path: ~/artifacts\n  destination: executables\n",
            ),
            (
                Step::store_test_results("junit.xml"),
                "store_test_results:\n  path: junit.xml\n",
            ),
            (Step::orb("python/install-packages"), "python/install-packages\n"),
        ];

        for (step, expected) in cases {
            assert_eq!(render(&step.to_node()), expected, "{:?}", step);
        }
    }

    #[test]
    fn test_orb_parameters_are_sorted() {
        let step = Step::orb_with(
            "node/install-packages",
            [
                ("pkg-manager", "yarn".to_string()),
                ("cache-path", "~/project/node_modules".to_string()),
            ],
        );
        assert_eq!(
            render(&step.to_node()),
            "node/install-packages:\n  cache-path: ~/project/node_modules\n  pkg-manager: yarn\n"
        );
    }
}
