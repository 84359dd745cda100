// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Pipeline configuration model
//!
//! The typed config tree produced by generation, its document renderer,
//! and the structural checks run before rendering.

mod dag;
mod definition;
pub mod document;
mod validation;

pub use dag::DagBuilder;
pub use definition::*;
pub use document::{render, Node, NodeKind};
pub use validation::{ConfigValidator, ValidationResult};

use tracing::warn;

use crate::errors::InferResult;

impl Config {
    /// Check structural invariants, logging warnings and failing on errors
    pub fn validate(&self) -> InferResult<()> {
        let result = ConfigValidator::validate(self);
        for warning in &result.warnings {
            warn!("{}", warning);
        }
        result.into_result()
    }
}
