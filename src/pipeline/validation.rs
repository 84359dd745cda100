// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Config validation
//!
//! Checks the structural invariants of a generated config before it is
//! rendered. A conforming generator never trips these; when one does, it is
//! a construction bug and generation stops.

use std::collections::{HashMap, HashSet};

use crate::errors::{InferError, InferResult};
use crate::pipeline::{Config, DagBuilder, Executor, Job};

/// Config validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a config
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Check for duplicate job names
        let mut seen_names = HashSet::new();
        for job in &config.jobs {
            if !seen_names.insert(job.name.as_str()) {
                result.add_error(InferError::DuplicateJob {
                    job: job.name.clone(),
                });
            }
        }

        let mut seen_orbs = HashSet::new();
        for orb in &config.orbs {
            if !seen_orbs.insert(orb.name.as_str()) {
                result.add_error(InferError::InvalidConfig {
                    reason: format!("orb '{}' is declared more than once", orb.name),
                });
            }
        }

        // Unknown requirements and cycles
        if let Err(e) = DagBuilder::build(config) {
            result.add_error(e);
        }

        for job in &config.jobs {
            Self::validate_job(job, &mut result);
        }

        Self::validate_scheduling(config, &mut result);

        result
    }

    fn validate_job(job: &Job, result: &mut ValidationResult) {
        if let Executor::Docker(images) = &job.executor {
            if images.is_empty() {
                result.add_error(InferError::InvalidConfig {
                    reason: format!("job '{}' has no docker image", job.name),
                });
            }
        }

        if job.steps.is_empty() {
            result.add_warning(&format!("Job '{}' has no steps", job.name));
        }
    }

    fn validate_scheduling(config: &Config, result: &mut ValidationResult) {
        let mut live: HashMap<&str, bool> = HashMap::new();
        for workflow in &config.workflows {
            if workflow.jobs.is_empty() {
                result.add_warning(&format!("Workflow '{}' schedules no jobs", workflow.name));
            }
            for wj in &workflow.jobs {
                let entry = live.entry(wj.job.as_str()).or_insert(false);
                *entry |= !wj.commented_out;
            }
        }

        for workflow in &config.workflows {
            for wj in workflow.jobs.iter().filter(|wj| !wj.commented_out) {
                for requirement in &wj.requires {
                    if live.get(requirement.as_str()) == Some(&false) {
                        result.add_warning(&format!(
                            "Job '{}' requires '{}', which is commented out",
                            wj.job, requirement
                        ));
                    }
                }
            }
        }

        for job in &config.jobs {
            if !live.contains_key(job.name.as_str()) {
                result.add_warning(&format!("Job '{}' is not used by any workflow", job.name));
            }
        }
    }
}

/// Result of config validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<InferError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: InferError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first error, if any
    pub fn into_result(self) -> InferResult<()> {
        match self.errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
