// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Config generation
//!
//! One generator per stack turns the detected labels into jobs. Generators
//! are pure and independent; [`jobs::build_config`] merges their output into
//! a single workflow.

mod common;
mod fallback;
pub mod go;
pub mod java;
pub mod jobs;
pub mod node;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;

pub use jobs::{build_config, GeneratedJob, JobCategory, BANNER};

use tracing::{debug, info};

use crate::errors::InferResult;
use crate::labeling::LabelSet;
use crate::pipeline::Config;
use crate::settings::Settings;

/// Job generator for one stack
pub type Generator = fn(&LabelSet, &Settings) -> Vec<GeneratedJob>;

/// Every generator, in the order their jobs appear in the config
pub fn default_generators() -> Vec<(&'static str, Generator)> {
    vec![
        ("node", node::generate_node_jobs as Generator),
        ("go", go::generate_go_jobs as Generator),
        ("python", python::generate_python_jobs as Generator),
        ("ruby", ruby::generate_ruby_jobs as Generator),
        ("java", java::generate_java_jobs as Generator),
        ("php", php::generate_php_jobs as Generator),
        ("rust", rust::generate_rust_jobs as Generator),
    ]
}

/// Run every generator in order
pub fn generate_jobs(labels: &LabelSet, settings: &Settings) -> Vec<GeneratedJob> {
    let mut jobs = Vec::new();
    for (stack, generate) in default_generators() {
        let generated = generate(labels, settings);
        if !generated.is_empty() {
            debug!(
                stack,
                jobs = ?generated.iter().map(GeneratedJob::name).collect::<Vec<_>>(),
                "jobs generated"
            );
        }
        jobs.extend(generated);
    }
    jobs
}

/// Generate and validate the config for a set of detected labels
pub fn generate_config(labels: &LabelSet, settings: &Settings) -> InferResult<Config> {
    let jobs = generate_jobs(labels, settings);
    let config = build_config(labels, jobs, settings);
    config.validate()?;

    info!(
        jobs = config.jobs.len(),
        orbs = config.orbs.len(),
        "config generated"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::labels::{Label, LabelData, DEPS_GO, DEPS_NODE};

    fn at(key: &str, base_path: &str) -> Label {
        Label::new(
            key,
            LabelData {
                base_path: base_path.to_string(),
                tasks: [("test".to_string(), "mocha".to_string())].into_iter().collect(),
                ..LabelData::default()
            },
        )
    }

    #[test]
    fn test_generator_order() {
        let labels: LabelSet = [at(DEPS_GO, "go-dir"), at(DEPS_NODE, "node-dir")]
            .into_iter()
            .collect();
        let config = generate_config(&labels, &Settings::default()).unwrap();

        assert_eq!(config.job_names(), ["test-node", "test-go", "deploy"]);
        assert_eq!(
            config.comment,
            format!("{}\nStacks detected: deps:go:go-dir,deps:node:node-dir", BANNER)
        );
    }

    #[test]
    fn test_empty_labels_yield_valid_fallback() {
        let config = generate_config(&LabelSet::new(), &Settings::default()).unwrap();
        assert_eq!(config.job_names(), ["test", "build", "deploy"]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let labels: LabelSet = [at(DEPS_GO, "."), at(DEPS_NODE, "web")].into_iter().collect();
        let settings = Settings::default();

        let first = generate_config(&labels, &settings).unwrap().render();
        for _ in 0..5 {
            assert_eq!(generate_config(&labels, &settings).unwrap().render(), first);
        }
    }
}
