// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint CLI - the line-oriented front-end for the repaint optimizer.
//!
//! The binary reads a scene description and a command stream from stdin and
//! drives the sketch, evaluator, and planner. The event loop lives in
//! `main.rs`; this library side holds the testable pieces:
//!
//! - [`config`]: launch-parameter parsing and validation.
//! - [`protocol`]: the textual input format (node definitions and commands).

pub mod config;
pub mod protocol;

pub use config::Config;
