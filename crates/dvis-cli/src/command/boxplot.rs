use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Context as _;
use dvis_stats::boxplot::{self, BoxplotConfig, BoxplotStats, LowWhiskerFallback};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum FallbackArg {
    /// Low whisker falls back to the third quartile
    Legacy,
    /// Low whisker falls back to the first quartile
    Symmetric,
}

impl From<FallbackArg> for LowWhiskerFallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Legacy => LowWhiskerFallback::ThirdQuartile,
            FallbackArg::Symmetric => LowWhiskerFallback::FirstQuartile,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BoxplotArg {
    /// JSON file holding one sample `[..]` or several `[[..], ..]` (stdin if omitted or `-`)
    input: Option<PathBuf>,
    /// Boxplot configuration JSON file; the options below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Whisker cutoff distance from the box, in interquartile ranges
    #[arg(long)]
    whisker_multiplier: Option<f64>,
    /// Estimate notches from this many bootstrap resamples
    #[arg(long)]
    bootstrap: Option<NonZeroUsize>,
    /// Seed for bootstrap resampling (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Low whisker position when no value reaches the cutoff: `legacy` or `symmetric`
    #[arg(long)]
    low_whisker_fallback: Option<FallbackArg>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum SampleInput {
    Single(Vec<f64>),
    Series(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum BoxplotOutput {
    Single(BoxplotStats),
    Series(Vec<BoxplotStats>),
}

pub(crate) fn run(arg: &BoxplotArg) -> anyhow::Result<()> {
    let config = load_config(arg)?;
    let input: SampleInput = util::read_json_input("samples", arg.input.as_deref())?;

    let seed = match config.bootstrap_samples {
        Some(resamples) => {
            super::check_resamples(resamples)?;
            let seed = super::resolve_seed(arg.seed);
            tracing::info!(seed, "Bootstrapping notches");
            seed
        }
        None => arg.seed.unwrap_or_default(),
    };
    let mut rng = Pcg32::seed_from_u64(seed);

    let output = summarize(&input, &config, &mut rng)?;
    Output::save_json(&output, arg.output.as_deref())
}

fn load_config(arg: &BoxplotArg) -> anyhow::Result<BoxplotConfig> {
    let mut config = match &arg.config {
        Some(path) => util::read_json_file::<BoxplotConfig>("boxplot config", path)?,
        None => BoxplotConfig::default(),
    };
    if let Some(whisker_multiplier) = arg.whisker_multiplier {
        config.whisker_multiplier = whisker_multiplier;
    }
    if let Some(resamples) = arg.bootstrap {
        config.bootstrap_samples = Some(resamples);
    }
    if let Some(fallback) = arg.low_whisker_fallback {
        config.low_whisker_fallback = fallback.into();
    }
    config.validate()?;
    tracing::debug!(?config, "Boxplot configuration");
    Ok(config)
}

/// Computes statistics once per series, in input order.
fn summarize(
    input: &SampleInput,
    config: &BoxplotConfig,
    rng: &mut Pcg32,
) -> anyhow::Result<BoxplotOutput> {
    match input {
        SampleInput::Single(sample) => {
            let stats = boxplot::compute(sample, config, rng)
                .context("Failed to compute boxplot statistics")?;
            Ok(BoxplotOutput::Single(stats))
        }
        SampleInput::Series(series) => {
            tracing::info!("Computing boxplot statistics for {} series", series.len());
            let stats = series
                .iter()
                .enumerate()
                .map(|(i, sample)| {
                    boxplot::compute(sample, config, rng).with_context(|| {
                        format!("Failed to compute boxplot statistics for series {i}")
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(BoxplotOutput::Series(stats))
        }
    }
}
