// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Utility modules

pub mod colors;

pub use colors::*;
