//! Filled error bands around a line.
//!
//! An [`ErrorBand`] holds, for every point of a line, the center value and
//! the lower/upper bound of the region to fill. Bounds come either from
//! known errors or from repeated observations summarized by an
//! [`IntervalEstimator`].
//!
//! # Examples
//!
//! ```
//! use dvis_stats::error_band::{ErrorBand, StandardErrorInterval};
//!
//! let observations = [vec![1.0, 3.0], vec![2.0, 4.0], vec![3.0, 5.0]];
//! let band = ErrorBand::from_observations(&observations, &StandardErrorInterval).unwrap();
//! assert_eq!(band.center, vec![2.0, 3.0, 4.0]);
//!
//! let outline = band.outline(&[0.0, 1.0, 2.0]).unwrap();
//! assert_eq!(outline.len(), 6);
//! assert_eq!(outline[0].0, 0.0);
//! assert_eq!(outline[5].0, 0.0);
//! ```

use std::{cell::RefCell, num::NonZeroUsize};

use rand::Rng;
use serde::Serialize;

use crate::{bootstrap, descriptive::DescriptiveStats, error::InvalidInputError};

/// Summarizes repeated observations of one point as a `(lower, upper)` interval.
pub trait IntervalEstimator {
    fn interval(&self, sample: &[f64]) -> Result<(f64, f64), InvalidInputError>;
}

/// `mean ± std_dev / sqrt(n)`: the standard error of the mean.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardErrorInterval;

impl IntervalEstimator for StandardErrorInterval {
    fn interval(&self, sample: &[f64]) -> Result<(f64, f64), InvalidInputError> {
        let stats = DescriptiveStats::new(sample).ok_or(InvalidInputError::EmptySample)?;
        Ok((stats.mean - stats.std_error, stats.mean + stats.std_error))
    }
}

/// 95% bootstrap interval of the median, drawing from an owned RNG.
#[derive(Debug)]
pub struct BootstrapMedianInterval<R> {
    resamples: NonZeroUsize,
    rng: RefCell<R>,
}

impl<R> BootstrapMedianInterval<R> {
    #[must_use]
    pub fn new(resamples: NonZeroUsize, rng: R) -> Self {
        Self {
            resamples,
            rng: RefCell::new(rng),
        }
    }
}

impl<R> IntervalEstimator for BootstrapMedianInterval<R>
where
    R: Rng,
{
    fn interval(&self, sample: &[f64]) -> Result<(f64, f64), InvalidInputError> {
        let mut rng = self.rng.borrow_mut();
        bootstrap::median_confidence_interval(sample, self.resamples, &mut *rng)
    }
}

impl<F> IntervalEstimator for F
where
    F: Fn(&[f64]) -> (f64, f64),
{
    fn interval(&self, sample: &[f64]) -> Result<(f64, f64), InvalidInputError> {
        if sample.is_empty() {
            return Err(InvalidInputError::EmptySample);
        }
        Ok(self(sample))
    }
}

/// Per-point bounds of a filled region around a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBand {
    pub center: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ErrorBand {
    /// `center ± error` with the same error at every point.
    #[must_use]
    pub fn constant(center: &[f64], error: f64) -> Self {
        Self {
            center: center.to_vec(),
            lower: center.iter().map(|c| c - error).collect(),
            upper: center.iter().map(|c| c + error).collect(),
        }
    }

    /// `center[i] ± errors[i]`.
    pub fn symmetric(center: &[f64], errors: &[f64]) -> Result<Self, InvalidInputError> {
        InvalidInputError::check_len("errors", center.len(), errors.len())?;
        Ok(Self {
            center: center.to_vec(),
            lower: center.iter().zip(errors).map(|(c, e)| c - e).collect(),
            upper: center.iter().zip(errors).map(|(c, e)| c + e).collect(),
        })
    }

    /// Explicit `(lower, upper)` bounds for every point.
    pub fn bounds(center: &[f64], bounds: &[(f64, f64)]) -> Result<Self, InvalidInputError> {
        InvalidInputError::check_len("bounds", center.len(), bounds.len())?;
        Ok(Self {
            center: center.to_vec(),
            lower: bounds.iter().map(|&(lo, _)| lo).collect(),
            upper: bounds.iter().map(|&(_, hi)| hi).collect(),
        })
    }

    /// Bounds estimated from repeated observations of every point.
    pub fn around<S, E>(
        center: &[f64],
        observations: &[S],
        estimator: &E,
    ) -> Result<Self, InvalidInputError>
    where
        S: AsRef<[f64]>,
        E: IntervalEstimator + ?Sized,
    {
        InvalidInputError::check_len("observation rows", center.len(), observations.len())?;
        let bounds = observations
            .iter()
            .map(|row| estimator.interval(row.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::bounds(center, &bounds)
    }

    /// Like [`Self::around`], with each point centered on the mean of its observations.
    pub fn from_observations<S, E>(
        observations: &[S],
        estimator: &E,
    ) -> Result<Self, InvalidInputError>
    where
        S: AsRef<[f64]>,
        E: IntervalEstimator + ?Sized,
    {
        let center = observations
            .iter()
            .map(|row| {
                DescriptiveStats::new(row.as_ref())
                    .map(|stats| stats.mean)
                    .ok_or(InvalidInputError::EmptySample)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::around(&center, observations, estimator)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.center.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.center.is_empty()
    }

    /// Vertices of the fill polygon: the lower bound along `x`, then the
    /// upper bound back along `x` reversed.
    pub fn outline(&self, x: &[f64]) -> Result<Vec<(f64, f64)>, InvalidInputError> {
        InvalidInputError::check_len("x values", self.len(), x.len())?;
        let lower = x.iter().copied().zip(self.lower.iter().copied());
        let upper = x.iter().copied().zip(self.upper.iter().copied()).rev();
        Ok(lower.chain(upper).collect())
    }
}

/// Opacity of each segment of a fading band, given the opacity at every point.
///
/// Each segment between two points takes the mean of their opacities.
#[must_use]
pub fn segment_alphas(alphas: &[f64]) -> Vec<f64> {
    alphas.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_constant_error() {
        let band = ErrorBand::constant(&[1.0, 2.0, 3.0], 0.5);
        assert_eq!(band.lower, vec![0.5, 1.5, 2.5]);
        assert_eq!(band.upper, vec![1.5, 2.5, 3.5]);
        assert_eq!(band.len(), 3);
    }

    #[test]
    fn test_symmetric_errors() {
        let band = ErrorBand::symmetric(&[1.0, 2.0], &[0.25, 1.0]).unwrap();
        assert_eq!(band.lower, vec![0.75, 1.0]);
        assert_eq!(band.upper, vec![1.25, 3.0]);
    }

    #[test]
    fn test_symmetric_length_mismatch() {
        assert_eq!(
            ErrorBand::symmetric(&[1.0, 2.0, 3.0], &[0.1, 0.2]),
            Err(InvalidInputError::LengthMismatch {
                what: "errors",
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_explicit_bounds() {
        let band = ErrorBand::bounds(&[1.0, 2.0], &[(0.0, 1.5), (1.0, 4.0)]).unwrap();
        assert_eq!(band.lower, vec![0.0, 1.0]);
        assert_eq!(band.upper, vec![1.5, 4.0]);
    }

    #[test]
    fn test_standard_error_from_observations() {
        let observations = [vec![1.0, 3.0], vec![2.0, 2.0]];
        let band = ErrorBand::from_observations(&observations, &StandardErrorInterval).unwrap();

        let se = 1.0 / 2.0_f64.sqrt();
        assert_eq!(band.center, vec![2.0, 2.0]);
        assert!((band.lower[0] - (2.0 - se)).abs() < 1e-12);
        assert!((band.upper[0] - (2.0 + se)).abs() < 1e-12);
        assert_eq!((band.lower[1], band.upper[1]), (2.0, 2.0));
    }

    #[test]
    fn test_closure_estimator() {
        let min_max = |s: &[f64]| {
            let lo = s.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = s.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (lo, hi)
        };
        let band = ErrorBand::around(&[0.0], &[[-1.0, 4.0, 2.0]], &min_max).unwrap();
        assert_eq!((band.lower[0], band.upper[0]), (-1.0, 4.0));
    }

    #[test]
    fn test_empty_observation_row() {
        let observations: [Vec<f64>; 2] = [vec![1.0], vec![]];
        assert_eq!(
            ErrorBand::from_observations(&observations, &StandardErrorInterval),
            Err(InvalidInputError::EmptySample)
        );
    }

    #[test]
    fn test_bootstrap_estimator_is_reproducible() {
        let observations = [vec![1.0, 5.0, 2.0, 8.0, 3.0], vec![4.0, 4.5, 6.0, 2.0, 9.0]];
        let resamples = NonZeroUsize::new(200).unwrap();
        let run = || {
            let estimator = BootstrapMedianInterval::new(resamples, Pcg32::seed_from_u64(9));
            ErrorBand::from_observations(&observations, &estimator).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_outline_order() {
        let band = ErrorBand::bounds(&[1.0, 2.0, 3.0], &[(0.0, 2.0), (1.0, 3.0), (2.0, 4.0)])
            .unwrap();
        let outline = band.outline(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(
            outline,
            vec![
                (10.0, 0.0),
                (20.0, 1.0),
                (30.0, 2.0),
                (30.0, 4.0),
                (20.0, 3.0),
                (10.0, 2.0),
            ]
        );
        assert!(band.outline(&[10.0]).is_err());
    }

    #[test]
    fn test_segment_alphas() {
        assert_eq!(segment_alphas(&[0.0, 1.0, 0.5]), vec![0.5, 0.75]);
        assert!(segment_alphas(&[1.0]).is_empty());
    }
}
