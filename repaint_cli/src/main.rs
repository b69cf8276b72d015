// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `repaint` binary: reads a scene and a command stream from stdin and
//! drives the optimizer.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use tracing::{debug, warn};

use repaint_cli::config::Config;
use repaint_cli::protocol::{self, Command, ProtocolError};
use repaint_planner::Planner;
use repaint_scene::{Node, NodeId, SceneGraph};
use repaint_sketch::HotSet;

fn main() -> ExitCode {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(err) => {
            // Help/version requests print to stdout and are not failures.
            let is_error = err.use_stderr();
            let _ = err.print();
            return if is_error { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if config.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    match run(&config, &mut stdin.lock(), &mut io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// The event loop: build phase, then command dispatch until `end` or EOF.
fn run(config: &Config, input: &mut impl BufRead, output: &mut impl Write) -> anyhow::Result<()> {
    let mut scene = SceneGraph::new();
    let mut hot: HotSet<NodeId> = HotSet::new(config.k as usize, config.delta, config.leeway)
        .map_err(|err| anyhow!(err))
        .context("invalid sketch parameters")?;
    let mut planner = Planner::new();

    build_scene(&mut scene, input)?;
    debug!(nodes = scene.len(), "scene constructed");

    let mut frame = 0_u64;
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).context("reading command")? == 0 {
            break; // EOF behaves like `end`
        }
        match protocol::parse_command(&line) {
            Ok(Command::Print) => {
                write!(output, "{scene}").context("writing dump")?;
            }
            Ok(Command::Refresh) => {
                frame += 1;
                let report = planner.run_frame(&mut scene, |id| hot.contains(id), &mut render);
                debug!(
                    frame,
                    rendered = report.rendered.len(),
                    cached = report.cached.len(),
                    reused = report.reused.len(),
                    evicted = report.evicted.len(),
                    cache_size = planner.cache_len(),
                    "frame complete"
                );
            }
            Ok(Command::End) => break,
            Ok(Command::Update { id, args }) => {
                apply_update(&mut scene, &mut hot, id, &args)?;
            }
            Err(ProtocolError::Empty) => {}
            Err(err) => {
                warn!("skipping malformed line: {err}");
            }
        }
    }

    let released = planner.clear_cache();
    debug!(released, "cache cleared");
    Ok(())
}

/// Reads the node-count line and that many definitions.
///
/// A definition whose id already exists with the same type letter adds a
/// parent edge instead (shared children); any other construction problem is
/// fatal.
fn build_scene(scene: &mut SceneGraph, input: &mut impl BufRead) -> anyhow::Result<()> {
    let mut line = String::new();
    input.read_line(&mut line).context("reading node count")?;
    let count: usize = line
        .trim()
        .parse()
        .with_context(|| format!("`{}` is not a node count", line.trim()))?;

    for index in 0..count {
        line.clear();
        if input.read_line(&mut line).context("reading definition")? == 0 {
            bail!("expected {count} node definitions, got {index}");
        }
        let def = protocol::parse_node_def(&line)
            .map_err(|err| anyhow!(err))
            .with_context(|| format!("definition {}", index + 1))?;

        if let Ok(existing) = scene.get(def.id) {
            if existing.kind().letter() != def.kind.letter() {
                bail!(
                    "definition {}: node {} already exists as `{}`",
                    index + 1,
                    def.id,
                    existing.kind().letter()
                );
            }
            scene
                .link(def.parent, def.id)
                .map_err(|err| anyhow!(err))
                .with_context(|| format!("definition {}", index + 1))?;
        } else {
            scene
                .add(def.parent, def.id, def.kind)
                .map_err(|err| anyhow!(err))
                .with_context(|| format!("definition {}", index + 1))?;
        }
    }
    Ok(())
}

/// Applies an update command, observing the stream event exactly once per
/// clean→dirty transition. An unknown target is fatal.
fn apply_update(
    scene: &mut SceneGraph,
    hot: &mut HotSet<NodeId>,
    id: NodeId,
    args: &[String],
) -> anyhow::Result<()> {
    let node = scene
        .get(id)
        .map_err(|err| anyhow!(err))
        .context("update target")?;
    if !node.is_dirty() {
        hot.observe(id);
        debug!(node = %id, estimate = hot.sketch().estimate(id), m = hot.stream_len(), hot = hot.contains(id), "observed");
    }
    scene.update(id, args).map_err(|err| anyhow!(err))?;
    Ok(())
}

/// The render effect: a bounded, synchronous stand-in logged at debug level.
fn render(node: &Node) {
    debug!(node = %node.id(), kind = %node.kind().letter(), "rendering");
}
