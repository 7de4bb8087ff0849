//! # polebench application logic
//!
//! Loads a network and a run configuration, then either scores the network
//! over all configured episodes or traces a single episode step by step.
//! Results go to the given writer as JSON; diagnostics go through `tracing`.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use harness::{EpisodeResult, Evaluator, FeedForward, Fitness};
use physics::OBSERVATION_SIZE;
use serde::Serialize;

use crate::config::{Overrides, RunConfig};

/// Summary of one candidate's evaluation.
#[derive(Debug, Serialize)]
pub struct Report {
    pub fitness: Fitness,
    pub episodes: Vec<EpisodeResult>,
}

/// Read and validate a network description.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a valid
/// network.
pub fn load_network(path: &Path) -> Result<FeedForward> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading network {}", path.display()))?;
    FeedForward::from_json(&json).with_context(|| format!("loading network {}", path.display()))
}

fn evaluator(config: Option<&Path>, overrides: Overrides) -> Result<Evaluator> {
    let run = RunConfig::load(config)?.with_overrides(overrides);
    let evaluator = Evaluator::new(run.physics, run.evaluation)?;
    tracing::info!(
        episodes = evaluator.config().num_episodes,
        max_steps = evaluator.config().max_steps_per_episode,
        seed = evaluator.config().seed,
        integrator = ?evaluator.physics().integrator,
        "configuration loaded"
    );
    Ok(evaluator)
}

/// The network must read a full observation and emit one full action signal.
fn check_shape(net: &FeedForward, evaluator: &Evaluator) -> Result<()> {
    ensure!(
        net.input_size() == OBSERVATION_SIZE,
        "network takes {} inputs but observations have {OBSERVATION_SIZE}",
        net.input_size()
    );
    let action_size = evaluator.config().action_size;
    ensure!(
        net.output_size() == action_size,
        "network produces {} outputs but the actuator expects {action_size}",
        net.output_size()
    );
    Ok(())
}

/// Evaluate a network over every configured episode and write a JSON report.
///
/// # Errors
///
/// Configuration, network and evaluation errors, or a failed write.
pub fn evaluate(
    network: &Path,
    config: Option<&Path>,
    overrides: Overrides,
    out: &mut impl Write,
) -> Result<Report> {
    let net = load_network(network)?;
    let evaluator = evaluator(config, overrides)?;
    check_shape(&net, &evaluator).with_context(|| format!("checking {}", network.display()))?;

    let episodes = evaluator
        .episode_results(&net)
        .with_context(|| format!("evaluating {}", network.display()))?;
    let steps: Vec<u64> = episodes.iter().map(|r| r.steps).collect();
    let fitness = evaluator.config().aggregation.reduce(&steps);
    tracing::info!(fitness, ?steps, "evaluation finished");

    let report = Report { fitness, episodes };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(report)
}

/// Run one episode and write every step as a JSON line.
///
/// # Errors
///
/// Configuration, network and evaluation errors, or a failed write.
pub fn trace(
    network: &Path,
    config: Option<&Path>,
    overrides: Overrides,
    episode: usize,
    out: &mut impl Write,
) -> Result<EpisodeResult> {
    let net = load_network(network)?;
    let evaluator = evaluator(config, overrides)?;
    check_shape(&net, &evaluator).with_context(|| format!("checking {}", network.display()))?;

    let mut write_error = None;
    let result = evaluator.trace_episode(&net, episode, |step| {
        if write_error.is_some() {
            return;
        }
        let line = serde_json::to_writer(&mut *out, step)
            .map_err(anyhow::Error::from)
            .and_then(|()| writeln!(out).map_err(anyhow::Error::from));
        if let Err(e) = line {
            write_error = Some(e);
        }
    })?;
    if let Some(e) = write_error {
        return Err(e.context("writing trace"));
    }

    tracing::info!(episode, steps = result.steps, termination = ?result.termination, "trace finished");
    Ok(result)
}

/// Write the default run configuration, as a starting point for a config file.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_defaults(out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &RunConfig::default())?;
    writeln!(out)?;
    Ok(())
}
