// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Terminal color utilities

use colored::Colorize;
use std::io::IsTerminal;

/// Style for success marks
pub fn success(msg: &str) -> colored::ColoredString {
    msg.green()
}

/// Style for dimmed/secondary text
pub fn dimmed(msg: &str) -> colored::ColoredString {
    msg.dimmed()
}

/// Style for emphasized/bold text
pub fn bold(msg: &str) -> colored::ColoredString {
    msg.bold()
}

/// Style for paths
pub fn code(msg: &str) -> colored::ColoredString {
    msg.cyan()
}

/// Check if colors should be used on stdout
pub fn should_use_colors() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// A bold title underlined to at least 40 columns
pub fn header(title: &str) -> String {
    format!(
        "{}\n{}\n",
        title.bold(),
        "═".repeat(title.chars().count().max(40))
    )
}
