// ABOUTME: Re-exports application constants from the core crate
// ABOUTME: Keeps `crate::constants::*` paths stable for server modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

pub use ezy_cook_core::constants::*;
