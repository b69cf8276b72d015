// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Launch parameters.
//!
//! The binary takes four positional parameters:
//!
//! ```text
//! repaint <debug> <k> <delta> <leeway>
//! ```
//!
//! `debug` is `0` or `1` and selects the log verbosity; `k` is the number of
//! heavy hitters to track; `delta` and `leeway` are fractions strictly
//! between 0 and 1. Missing or invalid parameters terminate the process with
//! a non-zero exit status.

use clap::Parser;

/// Frequency-driven repaint optimizer for an HMI scene tree.
///
/// Reads a scene description followed by commands from stdin:
/// a node-count line, that many `parent,type,id[,content]` definitions
/// (`type` is `W` or `T`), then `print` / `refresh` / `end` /
/// `<id>,<args...>` update commands.
#[derive(Clone, Debug, Parser, PartialEq)]
#[command(name = "repaint", version, about, long_about)]
pub struct Config {
    /// Emit per-frame debug output (0 or 1).
    #[arg(value_parser = parse_flag, action = clap::ArgAction::Set)]
    pub debug: bool,

    /// Number of heavy hitters to track (positive).
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub k: u64,

    /// Sketch error probability, strictly between 0 and 1.
    #[arg(value_parser = parse_unit_fraction)]
    pub delta: f64,

    /// Heavy-hitter hysteresis fraction, strictly between 0 and 1.
    #[arg(value_parser = parse_unit_fraction)]
    pub leeway: f64,
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("expected 0 or 1, got `{other}`")),
    }
}

fn parse_unit_fraction(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("`{raw}` is not strictly between 0 and 1"))
    }
}
