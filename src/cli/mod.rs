// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Command-line interface
//!
//! `inferci [OPTIONS] [DIR]` prints the config inferred for `DIR`, or with
//! `--labels`, a report of what was detected there.

pub mod generate;
pub mod labels;

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::codebase::DEFAULT_MAX_DEPTH;
use crate::errors::{InferError, InferResult};
use crate::settings::Settings;

/// Infer a CircleCI config from a source repository
#[derive(Parser, Debug)]
#[clap(
    name = "inferci",
    version,
    about = "Infer a CI pipeline configuration from the stacks detected in a repository",
    long_about = None,
    after_help = "Examples:\n\
        inferci                         Print a config for the current directory\n\
        inferci path/to/repo            Print a config for another repository\n\
        inferci --labels path/to/repo   Show the detected stacks instead"
)]
pub struct Cli {
    /// Repository root to inspect (defaults to the current directory)
    #[clap(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Enable verbose output
    #[clap(short, long)]
    pub verbose: bool,

    /// Settings file overriding images, orbs and paths (YAML or TOML)
    #[clap(long, value_name = "FILE", env = "INFERCI_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// How many directory levels below the root are searched
    #[clap(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print the detected labels instead of the generated config
    #[clap(long)]
    pub labels: bool,
}

impl Cli {
    /// The single directory argument, `.` when none was given
    pub fn target_dir(&self) -> InferResult<&Path> {
        match self.dirs.as_slice() {
            [] => Ok(Path::new(".")),
            [dir] => Ok(dir.as_path()),
            _ => Err(InferError::Usage {
                message: format!("expected at most one directory, got {}", self.dirs.len()),
            }),
        }
    }
}

/// Run the command, returning what should be written to stdout
pub fn run(cli: &Cli) -> InferResult<String> {
    let dir = cli.target_dir()?;
    ensure_directory(dir)?;

    let settings = Settings::load_or_default(cli.settings.as_deref())?;

    if cli.labels {
        labels::run(dir, cli.max_depth)
    } else {
        generate::run(dir, &settings, cli.max_depth)
    }
}

fn ensure_directory(dir: &Path) -> InferResult<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(InferError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(InferError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) => Err(InferError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("inferci").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.target_dir().unwrap(), Path::new("."));
        assert_eq!(cli.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!cli.labels);
    }

    #[test]
    fn test_too_many_directories() {
        let cli = parse(&["a", "b"]);
        let err = cli.target_dir().unwrap_err();
        assert_eq!(err.exit_code(), crate::errors::EXIT_USAGE);
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("README.md");
        std::fs::write(&file, "# hi").unwrap();

        assert!(matches!(
            ensure_directory(&file),
            Err(InferError::NotADirectory { .. })
        ));
        assert!(matches!(
            ensure_directory(&temp.path().join("missing")),
            Err(InferError::NotADirectory { .. })
        ));
        assert!(ensure_directory(temp.path()).is_ok());
    }

    #[test]
    fn test_run_generates_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module example.com/m\n").unwrap();

        let cli = parse(&[temp.path().to_str().unwrap()]);
        let output = run(&cli).unwrap();
        assert!(output.starts_with("# This config was automatically generated"));
        assert!(output.contains("test-go:"));
    }
}
