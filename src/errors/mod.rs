// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Error types
//!
//! Detection is best-effort: most of these errors are produced by a single
//! rule and swallowed by the rule engine. The ones that reach the user are
//! argument problems, unreadable directories, and broken generated configs.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for inferci operations
pub type InferResult<T> = Result<T, InferError>;

/// Exit code for bad command-line usage
pub const EXIT_USAGE: i32 = 1;
/// Exit code when the target is not a directory
pub const EXIT_NOT_A_DIRECTORY: i32 = 2;
/// Exit code for I/O and every other failure
pub const EXIT_IO: i32 = 3;

/// Main error type for inferci
#[derive(Error, Debug, Diagnostic)]
pub enum InferError {
    // ─────────────────────────────────────────────────────────────────────────
    // CLI boundary
    // ─────────────────────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(inferci::usage), help("usage: inferci [OPTIONS] [DIR]"))]
    Usage { message: String },

    #[error("{path} is not a directory")]
    #[diagnostic(
        code(inferci::not_a_directory),
        help("Pass the root directory of the repository to inspect")
    )]
    NotADirectory { path: PathBuf },

    #[error("Error reading from {path}: {message}")]
    #[diagnostic(code(inferci::io_error))]
    Io { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Detection
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(inferci::file_read_error))]
    FileRead { path: String, error: String },

    #[error("Could not parse manifest '{path}': {reason}")]
    #[diagnostic(code(inferci::manifest_parse_error))]
    ManifestParse { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to load settings from '{path}': {reason}")]
    #[diagnostic(
        code(inferci::settings_load_error),
        help("Settings files are YAML (.yaml, .yml) or TOML (.toml)")
    )]
    SettingsLoad { path: PathBuf, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Generated config invariants
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Job '{job}' requires unknown job '{requirement}'")]
    #[diagnostic(
        code(inferci::unknown_requirement),
        help("Every required job must be defined in the same config")
    )]
    UnknownRequirement { job: String, requirement: String },

    #[error("Circular job requirements detected")]
    #[diagnostic(code(inferci::circular_requirement))]
    CircularRequirement { jobs: Vec<String> },

    #[error("Job '{job}' is defined more than once")]
    #[diagnostic(code(inferci::duplicate_job))]
    DuplicateJob { job: String },

    #[error("Generated config is invalid: {reason}")]
    #[diagnostic(code(inferci::invalid_config))]
    InvalidConfig { reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Parsing
    // ─────────────────────────────────────────────────────────────────────────
    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(inferci::toml_error))]
    Toml { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(inferci::yaml_error))]
    Yaml { message: String },
}

impl From<toml::de::Error> for InferError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for InferError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl InferError {
    /// Wrap a read failure with the path that was being read
    pub fn file_read(path: &str, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.to_string(),
            error: error.to_string(),
        }
    }

    /// Wrap a manifest parse failure
    pub fn manifest_parse(path: &str, reason: impl std::fmt::Display) -> Self {
        Self::ManifestParse {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Process exit code for this error when it reaches the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => EXIT_USAGE,
            Self::NotADirectory { .. } => EXIT_NOT_A_DIRECTORY,
            _ => EXIT_IO,
        }
    }
}
