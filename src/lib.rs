// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! # inferci - CI configuration inference
//!
//! `inferci` inspects a source repository, detects the stacks it uses and
//! writes a CircleCI configuration that installs, tests and builds them.
//!
//! ## How it works
//!
//! - **Detection** - ordered rule packs walk the codebase and produce labels
//!   such as `deps:node` or `package_manager:poetry`
//! - **Generation** - one generator per stack turns labels into jobs, which
//!   are assembled into a single workflow
//! - **Rendering** - the config tree is rendered as YAML with comments, in a
//!   deterministic order
//!
//! ## Quick Start
//!
//! ```bash
//! # Print a config for the current directory
//! inferci
//!
//! # Show what was detected in another repository
//! inferci --labels path/to/repo
//! ```

pub mod cli;
pub mod codebase;
pub mod errors;
pub mod generation;
pub mod labeling;
pub mod pipeline;
pub mod settings;
pub mod utils;

// Re-export commonly used types
pub use codebase::{Codebase, LocalCodebase, MemoryCodebase};
pub use errors::{InferError, InferResult};
pub use generation::generate_config;
pub use labeling::{apply_all_rules, LabelSet};
pub use pipeline::Config;
pub use settings::Settings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
