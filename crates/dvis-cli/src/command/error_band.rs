use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::{Context as _, bail, ensure};
use dvis_stats::error_band::{
    self, BootstrapMedianInterval, ErrorBand, IntervalEstimator, StandardErrorInterval,
};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum EstimatorArg {
    /// Mean plus or minus its standard error
    #[default]
    Mean,
    /// Bootstrap 95% interval of the median
    Median,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ErrorBandArg {
    /// JSON file with `x` and one of `error`, `bounds` or `observations` (stdin if omitted or `-`)
    input: Option<PathBuf>,
    /// Interval of repeated observations: `mean` or `median`
    #[arg(long, default_value = "mean")]
    estimator: EstimatorArg,
    /// Bootstrap resamples for the `median` estimator
    #[arg(long, default_value = "5000")]
    bootstrap: NonZeroUsize,
    /// Seed for bootstrap resampling (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum ErrorInput {
    Constant(f64),
    PerPoint(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorBandInput {
    x: Vec<f64>,
    #[serde(default)]
    y: Option<Vec<f64>>,
    #[serde(default)]
    error: Option<ErrorInput>,
    #[serde(default)]
    bounds: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    observations: Option<Vec<Vec<f64>>>,
    /// Opacity at every point, for a band that fades out.
    #[serde(default)]
    alpha: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ErrorBandReport {
    x: Vec<f64>,
    #[serde(flatten)]
    band: ErrorBand,
    outline: Vec<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment_alphas: Option<Vec<f64>>,
}

pub(crate) fn run(arg: &ErrorBandArg) -> anyhow::Result<()> {
    let input: ErrorBandInput = util::read_json_input("error band input", arg.input.as_deref())?;
    let report = match arg.estimator {
        EstimatorArg::Mean => build(&input, &StandardErrorInterval)?,
        EstimatorArg::Median => {
            super::check_resamples(arg.bootstrap)?;
            let seed = super::resolve_seed(arg.seed);
            tracing::info!(seed, resamples = arg.bootstrap.get(), "Bootstrapping medians");
            let estimator = BootstrapMedianInterval::new(arg.bootstrap, Pcg32::seed_from_u64(seed));
            build(&input, &estimator)?
        }
    };
    Output::save_json(&report, arg.output.as_deref())
}

fn build<E>(input: &ErrorBandInput, estimator: &E) -> anyhow::Result<ErrorBandReport>
where
    E: IntervalEstimator + ?Sized,
{
    let ErrorBandInput {
        x,
        y,
        error,
        bounds,
        observations,
        alpha,
    } = input;

    let band = match (error, bounds, observations) {
        (None, None, None) => {
            let y = require_y(y.as_deref(), "a band without errors")?;
            ErrorBand::constant(y, 0.0)
        }
        (Some(ErrorInput::Constant(error)), None, None) => {
            ErrorBand::constant(require_y(y.as_deref(), "`error`")?, *error)
        }
        (Some(ErrorInput::PerPoint(errors)), None, None) => {
            ErrorBand::symmetric(require_y(y.as_deref(), "`error`")?, errors)
                .context("Invalid per-point errors")?
        }
        (None, Some(bounds), None) => {
            ErrorBand::bounds(require_y(y.as_deref(), "`bounds`")?, bounds)
                .context("Invalid error bounds")?
        }
        (None, None, Some(observations)) => {
            let band = match y {
                Some(y) => ErrorBand::around(y, observations, estimator),
                None => ErrorBand::from_observations(observations, estimator),
            };
            band.context("Failed to estimate intervals from observations")?
        }
        _ => bail!("Specify at most one of `error`, `bounds` and `observations`"),
    };
    tracing::debug!("Built error band with {} points", band.len());

    let outline = band.outline(x).context("Failed to build band outline")?;
    let segment_alphas = alpha
        .as_deref()
        .map(|alpha| {
            ensure!(
                alpha.len() == x.len(),
                "expected {} alpha values, got {}",
                x.len(),
                alpha.len()
            );
            Ok(error_band::segment_alphas(alpha))
        })
        .transpose()?;

    Ok(ErrorBandReport {
        x: x.clone(),
        band,
        outline,
        segment_alphas,
    })
}

fn require_y<'a>(y: Option<&'a [f64]>, what: &str) -> anyhow::Result<&'a [f64]> {
    y.with_context(|| format!("`y` is required for {what}"))
}
