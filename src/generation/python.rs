// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Python jobs
//!
//! A test job is the product of two independent choices: the package manager
//! that installs dependencies and wraps commands, and the runner that
//! invokes the tests.

use crate::codebase::base_name;
use crate::generation::common;
use crate::generation::jobs::{GeneratedJob, JobCategory};
use crate::labeling::labels::{
    LabelSet, DEPS_PYTHON, FILE_MANAGE_PY, PACKAGE_MANAGER_PIPENV, PACKAGE_MANAGER_POETRY,
    PACKAGE_MANAGER_SETUPTOOLS, TEST_TOX,
};
use crate::pipeline::{Job, RunStep, Step};
use crate::settings::Settings;

const INSTALL_PACKAGES: &str = "python/install-packages";

/// Installs dependencies and runs commands in the project environment
pub trait PackageManager {
    /// Steps that install the project's dependencies
    fn install_steps(&self) -> Vec<Step>;

    /// Command that installs one extra package
    fn install_package(&self, package: &str) -> String;

    /// Wrap a command so it runs with the installed dependencies available
    fn run(&self, command: &str) -> String {
        command.to_string()
    }
}

/// pip with a requirements file, or a bare PEP 621 project
pub struct Pip {
    manifest: String,
}

pub struct Setuptools;
pub struct Pipenv;
pub struct Poetry;

impl PackageManager for Pip {
    fn install_steps(&self) -> Vec<Step> {
        match self.manifest.as_str() {
            "requirements.txt" => vec![Step::orb_with(
                INSTALL_PACKAGES,
                [("pkg-manager", "pip".to_string())],
            )],
            "pyproject.toml" => vec![RunStep::new("pip install .")
                .name("Install dependencies")
                .into()],
            _ => Vec::new(),
        }
    }

    fn install_package(&self, package: &str) -> String {
        format!("pip install {}", package)
    }
}

impl PackageManager for Setuptools {
    fn install_steps(&self) -> Vec<Step> {
        vec![Step::orb_with(
            INSTALL_PACKAGES,
            [("pkg-manager", "pip-dist".to_string())],
        )]
    }

    fn install_package(&self, package: &str) -> String {
        format!("pip install {}", package)
    }
}

impl PackageManager for Pipenv {
    fn install_steps(&self) -> Vec<Step> {
        vec![Step::orb_with(
            INSTALL_PACKAGES,
            [("pkg-manager", "pipenv".to_string())],
        )]
    }

    fn install_package(&self, package: &str) -> String {
        format!("pipenv install {}", package)
    }

    fn run(&self, command: &str) -> String {
        format!("pipenv run {}", command)
    }
}

impl PackageManager for Poetry {
    fn install_steps(&self) -> Vec<Step> {
        vec![Step::orb_with(
            INSTALL_PACKAGES,
            [("pkg-manager", "poetry".to_string())],
        )]
    }

    fn install_package(&self, package: &str) -> String {
        format!("poetry add {}", package)
    }

    fn run(&self, command: &str) -> String {
        format!("poetry run {}", command)
    }
}

/// Produces the steps that run the tests
pub trait TestRunner {
    fn test_steps(&self, package_manager: &dyn PackageManager) -> Vec<Step>;
}

pub struct DjangoManage;
pub struct Tox {
    installed: bool,
}
pub struct Pytest {
    installed: bool,
}

impl TestRunner for DjangoManage {
    fn test_steps(&self, pm: &dyn PackageManager) -> Vec<Step> {
        vec![RunStep::new(pm.run("python manage.py test"))
            .name("Run tests")
            .into()]
    }
}

impl TestRunner for Tox {
    fn test_steps(&self, pm: &dyn PackageManager) -> Vec<Step> {
        let mut steps = Vec::new();
        if !self.installed {
            steps.push(RunStep::new(pm.install_package("tox")).name("Install tox").into());
        }
        steps.push(RunStep::new(pm.run("tox")).name("Run tests").into());
        steps
    }
}

impl TestRunner for Pytest {
    fn test_steps(&self, pm: &dyn PackageManager) -> Vec<Step> {
        let mut steps = Vec::new();
        if !self.installed {
            steps.push(
                RunStep::new(pm.install_package("pytest"))
                    .name("Install pytest")
                    .into(),
            );
        }
        steps.push(
            RunStep::new(pm.run("pytest --junitxml=junit.xml"))
                .name("Run tests")
                .into(),
        );
        steps.push(Step::store_test_results("junit.xml"));
        steps
    }
}

/// Package manager implied by the labels, pip when none was detected
pub fn package_manager(labels: &LabelSet) -> Box<dyn PackageManager> {
    if labels.is_valid(PACKAGE_MANAGER_PIPENV) {
        Box::new(Pipenv)
    } else if labels.is_valid(PACKAGE_MANAGER_POETRY) {
        Box::new(Poetry)
    } else if labels.is_valid(PACKAGE_MANAGER_SETUPTOOLS) {
        Box::new(Setuptools)
    } else {
        let manifest = labels
            .data(DEPS_PYTHON)
            .map(|data| base_name(&data.path).to_string())
            .unwrap_or_default();
        Box::new(Pip { manifest })
    }
}

/// Test runner implied by the labels: manage.py, then tox, then pytest
pub fn test_runner(labels: &LabelSet) -> Box<dyn TestRunner> {
    if labels.is_valid(FILE_MANAGE_PY) {
        Box::new(DjangoManage)
    } else if labels.is_valid(TEST_TOX) {
        Box::new(Tox {
            installed: labels.has_dependency(DEPS_PYTHON, "tox"),
        })
    } else {
        Box::new(Pytest {
            installed: labels.has_dependency(DEPS_PYTHON, "pytest"),
        })
    }
}

pub fn generate_python_jobs(labels: &LabelSet, settings: &Settings) -> Vec<GeneratedJob> {
    if !labels.is_valid(DEPS_PYTHON) {
        return Vec::new();
    }

    let base_path = labels.base_path(DEPS_PYTHON);
    let pm = package_manager(labels);

    let mut job = Job::docker(
        "test-python",
        settings
            .images
            .python(labels.dependency(DEPS_PYTHON, "python")),
    );
    job.comment = "Install dependencies and run tests".into();
    job.working_directory = common::working_directory(base_path, settings);
    job.steps = vec![common::checkout_step(base_path, settings)];
    job.steps.extend(pm.install_steps());
    job.steps.extend(test_runner(labels).test_steps(pm.as_ref()));

    vec![GeneratedJob::new(job, JobCategory::Test).with_orb("python", &settings.orbs.python)]
}
