// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! `--labels`: report what detection found

use std::fmt::Write;
use std::path::Path;

use crate::codebase::LocalCodebase;
use crate::errors::InferResult;
use crate::labeling::{apply_all_rules, Label, LabelSet};
use crate::utils::colors;

pub fn run(dir: &Path, max_depth: usize) -> InferResult<String> {
    let codebase = LocalCodebase::with_max_depth(dir, max_depth)?;
    let labels = apply_all_rules(&codebase);
    Ok(report(&dir.display().to_string(), &labels))
}

/// Human-readable listing of a label set
pub fn report(dir: &str, labels: &LabelSet) -> String {
    let mut out = String::new();
    let title = format!("Labels detected in {}", dir);
    out.push_str(&colors::header(&title));

    if labels.is_empty() {
        let _ = writeln!(out, "  {}", colors::dimmed("(none)"));
        return out;
    }

    for label in labels.iter() {
        write_label(&mut out, label);
    }
    out
}

fn write_label(out: &mut String, label: &Label) {
    let data = &label.data;
    let _ = write!(out, "  {} {}", colors::success("✓"), colors::bold(&label.key));
    let _ = write!(out, "  {}", colors::code(&data.base_path));
    if !data.path.is_empty() {
        let _ = write!(out, " {}", colors::dimmed(&format!("({})", data.path)));
    }
    out.push('\n');

    if data.has_lock_file {
        let _ = writeln!(out, "      lock file: yes");
    }
    if !data.version.is_empty() {
        let _ = writeln!(out, "      version: {}", data.version);
    }
    if !data.dependencies.is_empty() {
        let names: Vec<&str> = data.dependencies.keys().map(String::as_str).collect();
        let _ = writeln!(out, "      dependencies: {}", names.join(", "));
    }
    if !data.tasks.is_empty() {
        let names: Vec<&str> = data.tasks.keys().map(String::as_str).collect();
        let _ = writeln!(out, "      tasks: {}", names.join(", "));
    }
}
