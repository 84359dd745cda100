// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Java detection (Maven and Gradle)

use super::find_in_dir;
use crate::codebase::Codebase;
use crate::errors::InferResult;
use crate::labeling::labels::*;

pub const RULES: &[Rule] = &[
    Rule::new(DEPS_JAVA, deps),
    Rule::new(TOOL_GRADLE, gradle),
    Rule::new(FILE_BUILD_GRADLE_KTS, gradle_kts),
];

fn deps(codebase: &dyn Codebase, _: &LabelSet) -> InferResult<Option<LabelData>> {
    Ok(codebase
        .find_file(&["pom.xml", "gradlew"])
        .map(|path| LabelData::at(&path)))
}

/// A file that sits in the same directory as the Java manifest
fn beside_manifest(codebase: &dyn Codebase, ls: &LabelSet, name: &str) -> Option<LabelData> {
    let java = ls.data(DEPS_JAVA)?;
    find_in_dir(codebase, &java.base_path, &[name]).map(|path| LabelData::at(&path))
}

fn gradle(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    Ok(beside_manifest(codebase, ls, "gradlew"))
}

fn gradle_kts(codebase: &dyn Codebase, ls: &LabelSet) -> InferResult<Option<LabelData>> {
    Ok(beside_manifest(codebase, ls, "build.gradle.kts"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::MemoryCodebase;
    use crate::labeling::apply_rules;

    #[test]
    fn test_maven() {
        let cb = MemoryCodebase::from_files([("pom.xml", "<project/>")]);
        let ls = apply_rules(&cb, RULES);

        assert!(ls.is_valid(DEPS_JAVA));
        assert!(!ls.is_valid(TOOL_GRADLE));
    }

    #[test]
    fn test_gradle_kotlin_dsl() {
        let cb = MemoryCodebase::from_files([
            ("app/gradlew", "#!/bin/sh"),
            ("app/build.gradle.kts", ""),
        ]);
        let ls = apply_rules(&cb, RULES);

        assert_eq!(ls.base_path(DEPS_JAVA), "app");
        assert!(ls.is_valid(TOOL_GRADLE));
        assert!(ls.is_valid(FILE_BUILD_GRADLE_KTS));
    }

    #[test]
    fn test_gradle_elsewhere_is_ignored() {
        let cb = MemoryCodebase::from_files([("pom.xml", ""), ("tools/gradlew", "")]);
        let ls = apply_rules(&cb, RULES);

        assert_eq!(ls.base_path(DEPS_JAVA), ".");
        assert!(!ls.is_valid(TOOL_GRADLE));
    }
}
