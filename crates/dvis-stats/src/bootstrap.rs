//! Bootstrap estimation of the median's sampling distribution.
//!
//! The median of a sample has no simple closed-form standard error for
//! small samples. Resampling the observed data with replacement and taking
//! the median of every resample gives an empirical distribution of the
//! estimate, whose central 95% is used as a confidence interval.
//!
//! The random source is always supplied by the caller, so a seeded
//! generator reproduces the interval bit for bit:
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use dvis_stats::bootstrap::median_confidence_interval;
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let sample = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
//! let resamples = NonZeroUsize::new(1000).unwrap();
//!
//! let a = median_confidence_interval(&sample, resamples, &mut Pcg32::seed_from_u64(7)).unwrap();
//! let b = median_confidence_interval(&sample, resamples, &mut Pcg32::seed_from_u64(7)).unwrap();
//! assert_eq!(a, b);
//! assert!(a.0 <= a.1);
//! ```

use std::num::NonZeroUsize;

use rand::Rng;

use crate::{error::InvalidInputError, percentiles::compute_percentile};

/// Lower and upper percentile of the bootstrap distribution (95% interval).
pub const CONFIDENCE_PERCENTILES: (f64, f64) = (2.5, 97.5);

/// Resample estimates reserved up front; larger runs grow the buffer.
const MAX_PREALLOCATED_ESTIMATES: usize = 1 << 20;

/// Estimates a 95% confidence interval of the median by bootstrap resampling.
///
/// Draws `resamples` samples of size `n` from `sample` with replacement,
/// computes the interpolated median of each, and returns the 2.5th and
/// 97.5th percentiles of those medians.
pub fn median_confidence_interval<R>(
    sample: &[f64],
    resamples: NonZeroUsize,
    rng: &mut R,
) -> Result<(f64, f64), InvalidInputError>
where
    R: Rng,
{
    if sample.is_empty() {
        return Err(InvalidInputError::EmptySample);
    }

    let n = sample.len();
    tracing::debug!(n, resamples = resamples.get(), "bootstrapping median");

    let mut resample = vec![0.0; n];
    let mut estimates = Vec::with_capacity(resamples.get().min(MAX_PREALLOCATED_ESTIMATES));
    for _ in 0..resamples.get() {
        for slot in &mut resample {
            *slot = sample[rng.random_range(0..n)];
        }
        resample.sort_by(f64::total_cmp);
        estimates.push(compute_percentile(&resample, 50.0));
    }
    estimates.sort_by(f64::total_cmp);

    let (lo_p, hi_p) = CONFIDENCE_PERCENTILES;
    let interval = (
        compute_percentile(&estimates, lo_p),
        compute_percentile(&estimates, hi_p),
    );
    tracing::trace!(low = interval.0, high = interval.1, "bootstrap interval");
    Ok(interval)
}
