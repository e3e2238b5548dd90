//! Boxplot summary statistics.
//!
//! [`compute`] reduces one flat sample to everything a notched boxplot
//! needs: the quartiles, whisker ends, the outliers ("fliers") beyond the
//! whiskers and the notch bounds around the median.
//!
//! # Whiskers
//!
//! The whisker cutoffs lie `whisker_multiplier` interquartile ranges
//! beyond the box. Each whisker ends at the most extreme sample value still
//! inside its cutoff, and everything past a whisker end is a flier.
//!
//! # Notches
//!
//! Without bootstrapping the notch is the classical Gaussian approximation
//! `median ± 1.57 * iqr / sqrt(n)` (McGill, Tukey and Larsen, 1978). With
//! [`BoxplotConfig::bootstrap_samples`] set, the notch is the 95% bootstrap
//! interval of the median instead (see [`crate::bootstrap`]).
//!
//! # Examples
//!
//! ```
//! use dvis_stats::boxplot::{BoxplotConfig, compute};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let sample = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
//! let mut rng = Pcg32::seed_from_u64(0);
//! let stats = compute(&sample, &BoxplotConfig::default(), &mut rng).unwrap();
//!
//! assert_eq!(stats.median, 5.5);
//! assert_eq!(stats.whisker_high, 9.0);
//! assert_eq!(stats.fliers_high, vec![100.0]);
//! assert!(stats.fliers_low.is_empty());
//! ```

use std::num::NonZeroUsize;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    bootstrap,
    error::InvalidInputError,
    percentiles::{self, compute_percentile},
};

/// Scale of the Gaussian notch half-width, in units of `iqr / sqrt(n)`.
pub const NOTCH_COEFFICIENT: f64 = 1.57;

/// Default distance of the whisker cutoffs from the box, in interquartile ranges.
pub const DEFAULT_WHISKER_MULTIPLIER: f64 = 1.5;

const QUARTILE_POINTS: [f64; 3] = [25.0, 50.0, 75.0];

/// Where the low whisker ends when no sample value reaches its cutoff.
///
/// With finite data and a non-negative multiplier a value always reaches
/// the cutoff, so this only matters for samples containing NaN.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowWhiskerFallback {
    /// Fall back to the third quartile, matching the historical behavior.
    #[default]
    ThirdQuartile,
    /// Fall back to the first quartile, mirroring the high whisker.
    FirstQuartile,
}

impl LowWhiskerFallback {
    /// Returns the whisker end this fallback selects from the box edges.
    #[must_use]
    pub fn resolve(self, quartile1: f64, quartile3: f64) -> f64 {
        match self {
            Self::ThirdQuartile => quartile3,
            Self::FirstQuartile => quartile1,
        }
    }
}

/// Options of a boxplot computation.
///
/// Every field has a default, so a configuration file only needs to name
/// what it changes:
///
/// ```
/// use dvis_stats::boxplot::BoxplotConfig;
///
/// let config: BoxplotConfig = serde_json::from_str(r#"{ "bootstrap_samples": 5000 }"#).unwrap();
/// assert_eq!(config.whisker_multiplier, 1.5);
/// assert_eq!(config.bootstrap_samples.map(|n| n.get()), Some(5000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoxplotConfig {
    /// Multiplies the interquartile range to place the whisker cutoffs.
    pub whisker_multiplier: f64,
    /// Number of bootstrap resamples for the notch, or `None` for the
    /// Gaussian approximation.
    pub bootstrap_samples: Option<NonZeroUsize>,
    /// Low whisker position when no value reaches the low cutoff.
    pub low_whisker_fallback: LowWhiskerFallback,
}

impl Default for BoxplotConfig {
    fn default() -> Self {
        Self {
            whisker_multiplier: DEFAULT_WHISKER_MULTIPLIER,
            bootstrap_samples: None,
            low_whisker_fallback: LowWhiskerFallback::default(),
        }
    }
}

impl BoxplotConfig {
    /// Checks that the options describe a computable boxplot.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::InvalidWhiskerMultiplier`] when
    /// `whisker_multiplier` is negative, infinite or NaN.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        let value = self.whisker_multiplier;
        if !value.is_finite() || value < 0.0 {
            return Err(InvalidInputError::InvalidWhiskerMultiplier { value });
        }
        Ok(())
    }
}

/// Summary statistics of one boxplot.
///
/// `whisker_low <= quartile1 <= median <= quartile3 <= whisker_high` holds
/// for every sample without NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotStats {
    pub whisker_low: f64,
    pub quartile1: f64,
    pub median: f64,
    pub quartile3: f64,
    pub whisker_high: f64,
    /// Values below `whisker_low`, in sample order.
    pub fliers_low: Vec<f64>,
    /// Values above `whisker_high`, in sample order.
    pub fliers_high: Vec<f64>,
    pub notch_low: f64,
    pub notch_high: f64,
}

impl BoxplotStats {
    /// Like [`compute`], drawing bootstrap resamples from the thread-local RNG.
    pub fn new(sample: &[f64], config: &BoxplotConfig) -> Result<Self, InvalidInputError> {
        compute(sample, config, &mut rand::rng())
    }

    /// Interquartile range (`quartile3 - quartile1`).
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.quartile3 - self.quartile1
    }

    /// The five-number summary, from low whisker to high whisker.
    #[must_use]
    pub fn five_numbers(&self) -> [f64; 5] {
        [
            self.whisker_low,
            self.quartile1,
            self.median,
            self.quartile3,
            self.whisker_high,
        ]
    }
}

/// Computes the boxplot statistics of `sample`.
///
/// `rng` is only consumed when `config.bootstrap_samples` is set; the
/// result is a pure function of the inputs and the RNG state.
///
/// Interpolated quartiles can fall strictly between two sample values, in
/// which case the nearest value inside a cutoff may lie inside the box.
/// Whisker ends are clamped to the box edges so they never cross it.
#[expect(clippy::cast_precision_loss)]
pub fn compute<R>(
    sample: &[f64],
    config: &BoxplotConfig,
    rng: &mut R,
) -> Result<BoxplotStats, InvalidInputError>
where
    R: Rng,
{
    if sample.is_empty() {
        return Err(InvalidInputError::EmptySample);
    }
    config.validate()?;

    let sorted = percentiles::sorted_copy(sample);
    let [quartile1, median, quartile3] = QUARTILE_POINTS.map(|p| compute_percentile(&sorted, p));

    let iq = quartile3 - quartile1;
    let hi_cutoff = quartile3 + config.whisker_multiplier * iq;
    let lo_cutoff = quartile1 - config.whisker_multiplier * iq;

    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= hi_cutoff)
        .map_or(quartile3, |v| v.max(quartile3));
    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= lo_cutoff)
        .map_or_else(
            || config.low_whisker_fallback.resolve(quartile1, quartile3),
            |v| v.min(quartile1),
        );

    let fliers_high = sample
        .iter()
        .copied()
        .filter(|&v| v > whisker_high)
        .collect();
    let fliers_low = sample
        .iter()
        .copied()
        .filter(|&v| v < whisker_low)
        .collect();

    let (notch_low, notch_high) = match config.bootstrap_samples {
        Some(resamples) => bootstrap::median_confidence_interval(sample, resamples, rng)?,
        None => {
            let half_width = NOTCH_COEFFICIENT * iq / (sample.len() as f64).sqrt();
            (median - half_width, median + half_width)
        }
    };

    Ok(BoxplotStats {
        whisker_low,
        quartile1,
        median,
        quartile3,
        whisker_high,
        fliers_low,
        fliers_high,
        notch_low,
        notch_high,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg32;

    use super::*;

    fn compute_default(sample: &[f64]) -> BoxplotStats {
        let mut rng = Pcg32::seed_from_u64(0);
        compute(sample, &BoxplotConfig::default(), &mut rng).unwrap()
    }

    fn bootstrap_config(resamples: usize) -> BoxplotConfig {
        BoxplotConfig {
            bootstrap_samples: NonZeroUsize::new(resamples),
            ..BoxplotConfig::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_summary_invariants(sample: &[f64], stats: &BoxplotStats) {
        let five = stats.five_numbers();
        assert!(five.is_sorted_by(|a, b| a <= b), "unordered summary {five:?}");

        let below = sample.iter().filter(|&&v| v < stats.whisker_low);
        let above = sample.iter().filter(|&&v| v > stats.whisker_high);
        assert_eq!(below.copied().collect::<Vec<_>>(), stats.fliers_low);
        assert_eq!(above.copied().collect::<Vec<_>>(), stats.fliers_high);

        let inside = sample
            .iter()
            .filter(|&&v| stats.whisker_low <= v && v <= stats.whisker_high)
            .count();
        assert_eq!(
            stats.fliers_low.len() + inside + stats.fliers_high.len(),
            sample.len()
        );
    }

    #[test]
    fn test_empty_sample() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            compute(&[], &BoxplotConfig::default(), &mut rng),
            Err(InvalidInputError::EmptySample)
        );
        assert_eq!(
            compute(&[], &bootstrap_config(100), &mut rng),
            Err(InvalidInputError::EmptySample)
        );
    }

    #[test]
    fn test_invalid_whisker_multiplier() {
        let mut rng = Pcg32::seed_from_u64(0);
        for value in [-0.5, f64::NAN, f64::INFINITY] {
            let config = BoxplotConfig {
                whisker_multiplier: value,
                ..BoxplotConfig::default()
            };
            assert!(matches!(
                compute(&[1.0, 2.0], &config, &mut rng),
                Err(InvalidInputError::InvalidWhiskerMultiplier { .. })
            ));
        }
    }

    #[test]
    fn test_gaussian_notch() {
        let sample: Vec<f64> = (1..=10).map(f64::from).collect();
        let stats = compute_default(&sample);

        assert_close(stats.quartile1, 3.25);
        assert_close(stats.median, 5.5);
        assert_close(stats.quartile3, 7.75);
        assert_close(stats.iqr(), 4.5);

        let half_width = 1.57 * 4.5 / 10.0_f64.sqrt();
        assert_close(stats.notch_low, 5.5 - half_width);
        assert_close(stats.notch_high, 5.5 + half_width);

        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 10.0);
        assert!(stats.fliers_low.is_empty());
        assert!(stats.fliers_high.is_empty());
    }

    #[test]
    fn test_high_flier() {
        let sample = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let stats = compute_default(&sample);

        assert_close(stats.quartile3, 7.75);
        assert!(100.0 > stats.quartile3 + 1.5 * stats.iqr());
        assert_eq!(stats.fliers_high, vec![100.0]);
        assert_eq!(stats.whisker_high, 9.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert!(stats.fliers_low.is_empty());
    }

    #[test]
    fn test_fliers_keep_sample_order() {
        let sample = [60.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, -40.0, 50.0];
        let stats = compute_default(&sample);

        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 8.0);
        assert_eq!(stats.fliers_low, vec![-40.0]);
        assert_eq!(stats.fliers_high, vec![60.0, 50.0]);
        assert_summary_invariants(&sample, &stats);
    }

    #[test]
    fn test_whisker_multiplier_widens_cutoffs() {
        let sample = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        let config = BoxplotConfig {
            whisker_multiplier: 25.0,
            ..BoxplotConfig::default()
        };
        let mut rng = Pcg32::seed_from_u64(0);
        let stats = compute(&sample, &config, &mut rng).unwrap();
        assert_eq!(stats.whisker_high, 100.0);
        assert!(stats.fliers_high.is_empty());
    }

    #[test]
    fn test_zero_iqr_degenerates() {
        let sample = [2.0, 2.0, 9.0, 2.0, 2.0, 2.0];
        let stats = compute_default(&sample);

        assert_eq!(stats.iqr(), 0.0);
        assert_eq!(stats.five_numbers(), [2.0; 5]);
        assert_eq!((stats.notch_low, stats.notch_high), (2.0, 2.0));
        assert_eq!(stats.fliers_high, vec![9.0]);
    }

    #[test]
    fn test_single_value() {
        let stats = compute_default(&[3.5]);
        assert_eq!(stats.five_numbers(), [3.5; 5]);
        assert_eq!((stats.notch_low, stats.notch_high), (3.5, 3.5));
    }

    #[test]
    fn test_whiskers_clamped_to_box() {
        // q1 = 0.75 lies between 0 and 1; the lowest value inside the cutoff is 1.
        let sample = [0.0, 1.0, 1.0, 1.0];
        let stats = compute_default(&sample);

        assert_close(stats.quartile1, 0.75);
        assert_close(stats.whisker_low, 0.75);
        assert_eq!(stats.fliers_low, vec![0.0]);
        assert_summary_invariants(&sample, &stats);
    }

    #[test]
    fn test_low_whisker_fallback() {
        assert_eq!(LowWhiskerFallback::ThirdQuartile.resolve(1.0, 3.0), 3.0);
        assert_eq!(LowWhiskerFallback::FirstQuartile.resolve(1.0, 3.0), 1.0);
        assert_eq!(
            LowWhiskerFallback::default(),
            LowWhiskerFallback::ThirdQuartile
        );
    }

    #[test]
    fn test_low_whisker_fallback_on_nan_sample() {
        // NaN sorts last: q1 = 2, q3 = NaN, so no value reaches the low cutoff.
        let sample = [1.0, f64::NAN, 3.0];
        let mut rng = Pcg32::seed_from_u64(0);

        let legacy = compute(&sample, &BoxplotConfig::default(), &mut rng).unwrap();
        assert_eq!(legacy.quartile1, 2.0);
        assert!(legacy.quartile3.is_nan());
        assert!(legacy.whisker_low.is_nan());

        let config = BoxplotConfig {
            low_whisker_fallback: LowWhiskerFallback::FirstQuartile,
            ..BoxplotConfig::default()
        };
        let symmetric = compute(&sample, &config, &mut rng).unwrap();
        assert_eq!(symmetric.whisker_low, 2.0);
        assert_eq!(symmetric.fliers_low, vec![1.0]);
    }

    #[test]
    fn test_invariants_hold_for_random_samples() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        for len in 1..=40 {
            for _ in 0..10 {
                // Small integer range to provoke ties and zero-width boxes.
                let sample: Vec<f64> = (0..len)
                    .map(|_| f64::from(rng.random_range(-6_i32..=6)))
                    .collect();
                let stats = compute(&sample, &BoxplotConfig::default(), &mut rng).unwrap();
                assert_summary_invariants(&sample, &stats);
                assert!(stats.notch_low <= stats.median && stats.median <= stats.notch_high);

                let stats = compute(&sample, &bootstrap_config(50), &mut rng).unwrap();
                assert_summary_invariants(&sample, &stats);
            }
        }
    }

    #[test]
    fn test_bootstrap_is_deterministic_for_seed() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut data_rng = Pcg32::seed_from_u64(11);
        let sample: Vec<f64> = (0..50).map(|_| normal.sample(&mut data_rng)).collect();
        let config = bootstrap_config(1000);

        let a = compute(&sample, &config, &mut Pcg32::seed_from_u64(3)).unwrap();
        let b = compute(&sample, &config, &mut Pcg32::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.notch_low.to_bits(), b.notch_low.to_bits());
        assert_eq!(a.notch_high.to_bits(), b.notch_high.to_bits());
    }

    #[test]
    fn test_gaussian_notch_ignores_rng() {
        let sample = [4.0, 8.0, 15.0, 16.0, 23.0, 42.0];
        let a = compute(&sample, &BoxplotConfig::default(), &mut Pcg32::seed_from_u64(1));
        let b = compute(&sample, &BoxplotConfig::default(), &mut Pcg32::seed_from_u64(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_bootstrap_notch_agrees_with_gaussian_notch() {
        let normal = Normal::new(10.0, 2.0).unwrap();
        let mut ratios = Vec::new();
        for seed in 0..8 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let sample: Vec<f64> = (0..30).map(|_| normal.sample(&mut rng)).collect();

            let gaussian = compute(&sample, &BoxplotConfig::default(), &mut rng).unwrap();
            let bootstrapped = compute(&sample, &bootstrap_config(5000), &mut rng).unwrap();
            assert_eq!(gaussian.median, bootstrapped.median);

            let gaussian_width = gaussian.notch_high - gaussian.notch_low;
            let bootstrap_width = bootstrapped.notch_high - bootstrapped.notch_low;
            ratios.push(bootstrap_width / gaussian_width);
        }

        let mean_ratio = ratios.iter().sum::<f64>() / 8.0;
        assert!(
            (0.6..=1.8).contains(&mean_ratio),
            "bootstrap/gaussian width ratio {mean_ratio} ({ratios:?})"
        );
        for ratio in ratios {
            assert!((0.3..=3.0).contains(&ratio), "ratio {ratio} out of range");
        }
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: BoxplotConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BoxplotConfig::default());
    }

    #[test]
    fn test_config_rejects_zero_resamples() {
        assert!(serde_json::from_str::<BoxplotConfig>(r#"{ "bootstrap_samples": 0 }"#).is_err());
    }

    #[test]
    fn test_config_fallback_names() {
        let config: BoxplotConfig =
            serde_json::from_str(r#"{ "low_whisker_fallback": "first_quartile" }"#).unwrap();
        assert_eq!(
            config.low_whisker_fallback,
            LowWhiskerFallback::FirstQuartile
        );
    }
}
