// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Job requirement graph
//!
//! Builds the graph of `requires` edges across every workflow of a config
//! and checks that it references only defined jobs and has no cycles.

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::errors::InferError;
use crate::pipeline::Config;

/// Builder for job requirement DAGs
pub struct DagBuilder {
    graph: DiGraph<String, ()>,
    name_to_index: HashMap<String, NodeIndex>,
}

impl DagBuilder {
    /// Create an empty DAG builder
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_to_index: HashMap::new(),
        }
    }

    /// Build a DAG from a config
    pub fn build(config: &Config) -> Result<Self, InferError> {
        let mut builder = Self::new();

        // Add all jobs as nodes
        for job in &config.jobs {
            let node = builder.graph.add_node(job.name.clone());
            builder.name_to_index.insert(job.name.clone(), node);
        }

        // Requirement edges point from the required job to the dependent one
        for workflow in &config.workflows {
            for workflow_job in &workflow.jobs {
                let job_node = *builder.name_to_index.get(&workflow_job.job).ok_or_else(|| {
                    InferError::InvalidConfig {
                        reason: format!(
                            "workflow '{}' schedules undefined job '{}'",
                            workflow.name, workflow_job.job
                        ),
                    }
                })?;

                for requirement in &workflow_job.requires {
                    let req_node = builder.name_to_index.get(requirement).ok_or_else(|| {
                        InferError::UnknownRequirement {
                            job: workflow_job.job.clone(),
                            requirement: requirement.clone(),
                        }
                    })?;

                    if !builder.graph.contains_edge(*req_node, job_node) {
                        builder.graph.add_edge(*req_node, job_node, ());
                    }
                }
            }
        }

        builder.validate_acyclic()?;

        Ok(builder)
    }

    fn validate_acyclic(&self) -> Result<(), InferError> {
        self.topological_order().map(|_| ())
    }

    /// Jobs that can reach `start` and are reachable from it
    fn find_cycle_members(&self, start: NodeIndex) -> Vec<String> {
        let mut members: Vec<String> = self
            .graph
            .node_indices()
            .filter(|&n| {
                has_path_connecting(&self.graph, start, n, None)
                    && has_path_connecting(&self.graph, n, start, None)
            })
            .map(|n| self.graph[n].clone())
            .collect();
        members.sort();
        members
    }

    /// Job names in an order that satisfies every requirement
    pub fn topological_order(&self) -> Result<Vec<String>, InferError> {
        toposort(&self.graph, None)
            .map(|nodes| nodes.into_iter().map(|n| self.graph[n].clone()).collect())
            .map_err(|cycle| InferError::CircularRequirement {
                jobs: self.find_cycle_members(cycle.node_id()),
            })
    }
}

impl Default for DagBuilder {
    fn default() -> Self {
        Self::new()
    }
}
