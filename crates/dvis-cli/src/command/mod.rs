use std::num::NonZeroUsize;

use anyhow::ensure;
use clap::{ArgAction, Parser, Subcommand};
use rand::Rng as _;
use tracing_subscriber::EnvFilter;

use self::{boxplot::BoxplotArg, error_band::ErrorBandArg, range_frame::RangeFrameArg};

mod boxplot;
mod error_band;
mod range_frame;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute boxplot statistics of one or more samples
    Boxplot(#[clap(flatten)] BoxplotArg),
    /// Compute range frames for a scatter plot
    RangeFrame(#[clap(flatten)] RangeFrameArg),
    /// Compute an error band around a line
    ErrorBand(#[clap(flatten)] ErrorBandArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Boxplot(arg) => boxplot::run(&arg)?,
        Mode::RangeFrame(arg) => range_frame::run(&arg)?,
        Mode::ErrorBand(arg) => error_band::run(&arg)?,
    }
    Ok(())
}

/// Upper bound on bootstrap resamples accepted from the command line.
const MAX_BOOTSTRAP_RESAMPLES: usize = 100_000_000;

fn check_resamples(resamples: NonZeroUsize) -> anyhow::Result<()> {
    ensure!(
        resamples.get() <= MAX_BOOTSTRAP_RESAMPLES,
        "at most {MAX_BOOTSTRAP_RESAMPLES} bootstrap resamples are supported, got {resamples}"
    );
    Ok(())
}

/// Returns `seed`, or a fresh random seed that is logged so the run can be repeated.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed = rand::rng().random();
        tracing::warn!(seed, "No --seed given; bootstrap resampling uses a random seed");
        seed
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
