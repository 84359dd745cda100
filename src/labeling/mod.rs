// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Stack detection
//!
//! Rules run in a fixed order. Each one sees the labels produced by the rules
//! before it, so higher-salience rules come first and later rules may refine
//! what they found (package manager, test framework, ...).

pub mod labels;
pub mod rules;

pub use labels::{Label, LabelData, LabelSet, Rule};

use tracing::{debug, info};

use crate::codebase::Codebase;

/// An ordered list of rules for one ecosystem
#[derive(Debug, Clone, Copy)]
pub struct RulePack {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

/// Every known pack, in registration order
pub fn default_packs() -> Vec<RulePack> {
    vec![
        RulePack { name: "node", rules: rules::node::RULES },
        RulePack { name: "go", rules: rules::go::RULES },
        RulePack { name: "python", rules: rules::python::RULES },
        RulePack { name: "ruby", rules: rules::ruby::RULES },
        RulePack { name: "java", rules: rules::java::RULES },
        RulePack { name: "php", rules: rules::php::RULES },
        RulePack { name: "rust", rules: rules::rust::RULES },
        RulePack { name: "cicd", rules: rules::cicd::RULES },
        RulePack { name: "empty", rules: rules::empty::RULES },
    ]
}

/// Flatten packs into one rule sequence, preserving order
pub fn compose(packs: &[RulePack]) -> Vec<Rule> {
    packs
        .iter()
        .flat_map(|pack| {
            debug!(pack = pack.name, rules = pack.rules.len(), "registering rule pack");
            pack.rules.iter().copied()
        })
        .collect()
}

/// Apply `rules` in order and collect the valid labels
///
/// A rule that fails is skipped: detection is best-effort and one unreadable
/// manifest must not hide the rest of the codebase.
pub fn apply_rules(codebase: &dyn Codebase, rules: &[Rule]) -> LabelSet {
    let mut labels = LabelSet::new();

    for rule in rules {
        match rule.apply(codebase, &labels) {
            Ok(label) if label.valid => {
                debug!(label = %label, "label detected");
                labels.insert(label);
            }
            Ok(_) => {}
            Err(e) => {
                debug!(key = rule.key, error = %e, "rule failed, skipping");
            }
        }
    }

    labels
}

/// Apply every registered pack
pub fn apply_all_rules(codebase: &dyn Codebase) -> LabelSet {
    let labels = apply_rules(codebase, &compose(&default_packs()));
    info!(labels = %labels, "detection finished");
    labels
}
