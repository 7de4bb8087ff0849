//! # polebench
//!
//! Entry point for the `polebench` binary.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use polebench::app;
use polebench::config::Overrides;

#[derive(Parser)]
#[command(name = "polebench", version, about = "Evaluate cart-pole balancing networks")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a network over all configured episodes.
    Evaluate(RunArgs),
    /// Run one episode and print every step as a JSON line.
    Trace {
        #[command(flatten)]
        run: RunArgs,
        /// Episode index to trace.
        #[arg(long, default_value_t = 0)]
        episode: usize,
    },
    /// Print the default run configuration.
    Defaults,
}

#[derive(Args)]
struct RunArgs {
    /// Network description (JSON).
    #[arg(short, long)]
    network: PathBuf,
    /// Run configuration (JSON). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of episodes per evaluation.
    #[arg(long)]
    episodes: Option<usize>,
    /// Step budget per episode.
    #[arg(long)]
    max_steps: Option<u64>,
    /// Base seed for initial states and actuator noise.
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            episodes: self.episodes,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }
}

fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Evaluate(run) => {
            app::evaluate(&run.network, run.config.as_deref(), run.overrides(), &mut stdout)?;
        }
        Command::Trace { run, episode } => {
            app::trace(&run.network, run.config.as_deref(), run.overrides(), episode, &mut stdout)?;
        }
        Command::Defaults => app::print_defaults(&mut stdout)?,
    }
    Ok(())
}
