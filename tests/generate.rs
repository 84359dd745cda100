// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! End-to-end generation from real directories

use std::fs;
use std::path::Path;

use inferci::{apply_all_rules, generate_config, LocalCodebase, Settings};
use serde_yaml::Value;
use tempfile::TempDir;

fn repo(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (path, contents) in files {
        let path = temp.path().join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    temp
}

fn generate(dir: &Path) -> String {
    let codebase = LocalCodebase::open(dir).unwrap();
    let labels = apply_all_rules(&codebase);
    generate_config(&labels, &Settings::default())
        .unwrap()
        .render()
}

fn parse(output: &str) -> Value {
    serde_yaml::from_str(output).unwrap()
}

fn step_commands(doc: &Value, job: &str) -> Vec<String> {
    doc["jobs"][job]["steps"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|step| step["run"]["command"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_go_module_without_lock_file() {
    let temp = repo(&[("go.mod", "module example.com/hello\n\ngo 1.20\n")]);
    let output = generate(temp.path());

    insta::assert_snapshot!(output, @r###"
# This config was automatically generated from your source code
# Stacks detected: deps:go:.
version: 2.1
jobs:
  test-go:
    # Install go modules and run tests
    docker:
      - image: cimg/go:1.20
    steps:
      - checkout
      - run:
          name: Run tests
          command: gotestsum --junitfile junit.xml
      - store_test_results:
          path: junit.xml
  deploy:
    # This is an example deploy job, not actually used by the workflow
    docker:
      - image: cimg/base:stable
    steps:
      # Replace this with steps to deploy to users
      - run:
          name: deploy
          command: '#e.g. ./deploy.sh'
workflows:
  build-and-test:
    jobs:
      - test-go
      # - deploy:
      #     requires:
      #       - test-go
"###);
}

#[test]
fn test_readme_only_repository_gets_fallback() {
    let temp = repo(&[("README.md", "# nothing here yet\n")]);
    let output = generate(temp.path());

    insta::assert_snapshot!(output, @r###"
# This is a generic template: no stack-specific config could be inferred from your source code
# Stacks detected: repo:empty:.
version: 2.1
jobs:
  test:
    docker:
      - image: cimg/base:stable
    steps:
      - checkout
      # Replace this with a real test runner invocation
      - run:
          name: Run tests
          command: echo 'replace me with real tests!' && false
  build:
    docker:
      - image: cimg/base:stable
    steps:
      - checkout
      # Replace this with steps to build a package, or executable
      - run:
          name: Build an artifact
          command: touch example.txt
      - store_artifacts:
          path: example.txt
  deploy:
    # This is an example deploy job, not actually used by the workflow
    docker:
      - image: cimg/base:stable
    steps:
      - run:
          name: found an empty repository
          command: ':'
      # Replace this with steps to deploy to users
      - run:
          name: deploy
          command: '#e.g. ./deploy.sh'
workflows:
  example:
    jobs:
      - test
      - build:
          requires:
            - test
      - deploy:
          requires:
            - build
"###);
}

#[test]
fn test_node_jest_project() {
    let temp = repo(&[(
        "package.json",
        r#"{"scripts": {"test": "jest"}, "devDependencies": {"jest": "^29.0.0"}}"#,
    )]);
    let doc = parse(&generate(temp.path()));

    assert_eq!(doc["orbs"]["node"].as_str(), Some("circleci/node@5"));

    let jobs = doc["jobs"].as_mapping().unwrap();
    let names: Vec<&str> = jobs.keys().filter_map(Value::as_str).collect();
    assert_eq!(names, ["test-node", "deploy"]);

    let job = &doc["jobs"]["test-node"];
    assert_eq!(job["executor"].as_str(), Some("node/default"));
    assert_eq!(
        job["environment"]["JEST_JUNIT_OUTPUT_DIR"].as_str(),
        Some("./test-results/")
    );
    assert!(step_commands(&doc, "test-node").contains(&"npm install jest-junit".to_string()));

    let steps = job["steps"].as_sequence().unwrap();
    assert_eq!(
        steps.last().unwrap()["store_test_results"]["path"].as_str(),
        Some("./test-results/")
    );
    // No lock file: the orb is told how to install
    assert_eq!(
        steps[1]["node/install-packages"]["override-ci-command"].as_str(),
        Some("npm install")
    );
}

#[test]
fn test_deploy_requires_artifact_jobs() {
    let temp = repo(&[
        ("go.mod", "module example.com/tool\n"),
        ("go.sum", ""),
        ("cmd/tool/main.go", "// Command tool\npackage main\n\nfunc main() {}\n"),
    ]);
    let output = generate(temp.path());
    let doc = parse(&output);

    let workflow = doc["workflows"]["build-and-test"]["jobs"].as_sequence().unwrap();
    assert_eq!(workflow[0].as_str(), Some("test-go"));
    assert_eq!(
        workflow[1]["build-go-executables"]["requires"][0].as_str(),
        Some("test-go")
    );
    assert_eq!(workflow.len(), 2);
    assert!(output.contains(
        "      # - deploy:\n      #     requires:\n      #       - build-go-executables\n"
    ));

    let build = &doc["jobs"]["build-go-executables"];
    let steps = build["steps"].as_sequence().unwrap();
    assert_eq!(
        steps.last().unwrap()["store_artifacts"]["destination"].as_str(),
        Some("executables")
    );
    assert!(step_commands(&doc, "test-go").contains(&"go mod download".to_string()));
}

#[test]
fn test_stacks_in_subdirectories_share_checkout_root() {
    let temp = repo(&[
        ("web/package.json", r#"{"scripts": {"test": "mocha"}}"#),
        ("api/requirements.txt", "flask==2.3.0\npytest\n"),
    ]);
    let doc = parse(&generate(temp.path()));

    assert_eq!(doc["jobs"]["test-node"]["working_directory"].as_str(), Some("~/project/web"));
    assert_eq!(
        doc["jobs"]["test-python"]["working_directory"].as_str(),
        Some("~/project/api")
    );
    assert_eq!(
        doc["jobs"]["test-python"]["steps"][0]["checkout"]["path"].as_str(),
        Some("~/project")
    );

    let orbs: Vec<&str> = doc["orbs"]
        .as_mapping()
        .unwrap()
        .keys()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(orbs, ["node", "python"]);

    assert!(step_commands(&doc, "test-python").contains(&"pytest --junitxml=junit.xml".to_string()));
}

#[test]
fn test_pipenv_wins_over_poetry() {
    let temp = repo(&[
        ("Pipfile", "[packages]\nrequests = \"*\"\n"),
        ("poetry.lock", ""),
    ]);
    let codebase = LocalCodebase::open(temp.path()).unwrap();
    let labels = apply_all_rules(&codebase);

    assert!(labels.is_valid("package_manager:pipenv"));
    assert!(!labels.is_valid("package_manager:poetry"));

    let doc = parse(&generate(temp.path()));
    assert!(step_commands(&doc, "test-python")
        .contains(&"pipenv run pytest --junitxml=junit.xml".to_string()));
}

#[test]
fn test_output_is_deterministic() {
    let temp = repo(&[
        ("go.mod", "module example.com/m\n"),
        ("go.sum", ""),
        ("main.go", "package main\n"),
        ("web/package.json", r#"{"scripts": {"test": "jest", "build": "vite build"}, "dependencies": {"jest": "1"}}"#),
        ("web/yarn.lock", ""),
        ("Gemfile", "source 'https://rubygems.org'\ngem 'rspec'\n"),
        (".github/workflows/ci.yml", "on: push\n"),
    ]);

    let first = generate(temp.path());
    for _ in 0..3 {
        assert_eq!(generate(temp.path()), first);
    }
    parse(&first);
}

#[test]
fn test_ci_detectors_annotate_deploy_job() {
    let temp = repo(&[
        ("Cargo.toml", "[package]\nname = \"x\"\nversion = \"0.1.0\"\n"),
        (".gitlab-ci.yml", "test:\n  script: cargo test\n"),
        ("Jenkinsfile", "pipeline {}\n"),
    ]);
    let doc = parse(&generate(temp.path()));

    let deploy_steps: Vec<&str> = doc["jobs"]["deploy"]["steps"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|step| step["run"]["name"].as_str())
        .collect();
    assert_eq!(
        deploy_steps,
        ["found gitlab ci config", "found jenkins config", "deploy"]
    );
    assert_eq!(step_commands(&doc, "test-rust"), ["cargo test"]);
}

#[test]
fn test_django_project_installs_requirements() {
    let temp = repo(&[("manage.py", ""), ("requirements.txt", "Django==4.2\n")]);
    let doc = parse(&generate(temp.path()));

    let steps = doc["jobs"]["test-python"]["steps"].as_sequence().unwrap();
    assert_eq!(
        steps[1]["python/install-packages"]["pkg-manager"].as_str(),
        Some("pip")
    );
    assert_eq!(step_commands(&doc, "test-python"), ["python manage.py test"]);
}

#[test]
fn test_rails_app_with_rspec_runs_rspec() {
    let temp = repo(&[
        (
            "Gemfile",
            "source 'https://rubygems.org'\nruby File.read(\".ruby-version\").strip\ngem 'rails'\ngem 'rake'\ngem 'rspec-rails'\n",
        ),
        ("Gemfile.lock", ""),
        (".ruby-version", "3.2.2\n"),
    ]);
    let doc = parse(&generate(temp.path()));

    let job = &doc["jobs"]["test-ruby"];
    assert_eq!(job["docker"][0]["image"].as_str(), Some("cimg/ruby:3.2.2-node"));
    assert_eq!(step_commands(&doc, "test-ruby"), ["bundle exec rspec"]);
}

#[test]
fn test_composer_empty_section_as_array() {
    let temp = repo(&[
        ("composer.json", r#"{"require": {"php": "^8.1", "phpunit/phpunit": "^10"}, "require-dev": []}"#),
        ("composer.lock", "{}"),
    ]);
    let doc = parse(&generate(temp.path()));

    let job = &doc["jobs"]["test-php"];
    assert_eq!(job["docker"][0]["image"].as_str(), Some("cimg/php:8.1-node"));
    assert_eq!(step_commands(&doc, "test-php"), ["./vendor/bin/phpunit"]);
}
