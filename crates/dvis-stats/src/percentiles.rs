//! Order-statistic percentiles with linear interpolation.

/// Precomputed percentile values of one dataset.
///
/// Stores `(percentile, value)` pairs, in the order the points were
/// requested, for repeated lookup of the same few points.
///
/// # Examples
///
/// ```
/// use dvis_stats::percentiles::Percentiles;
///
/// let values: Vec<f64> = (1..=10).map(f64::from).collect();
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(5.5));
/// assert_eq!(percentiles.get(25.0), Some(3.25));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Percentiles {
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// # Arguments
    ///
    /// * `sorted_values` - Values sorted in ascending order
    /// * `percentile_points` - The percentile points to compute (e.g., `[25.0, 50.0, 75.0]`)
    ///
    /// # Returns
    ///
    /// A `Percentiles` instance with precomputed values. Every value is
    /// `f64::NAN` when `sorted_values` is empty.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to compute percentiles from
    /// * `percentile_points` - The percentile points to compute
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        Self::from_sorted(&sorted_copy(values), percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// # Returns
    ///
    /// The value at `percentile`, or `None` if it was not precomputed.
    ///
    /// ```
    /// use dvis_stats::percentiles::Percentiles;
    ///
    /// let percentiles = Percentiles::new(&[1.0, 2.0, 3.0, 4.0, 5.0], &[50.0, 97.5]);
    /// assert_eq!(percentiles.get(50.0), Some(3.0));
    /// assert_eq!(percentiles.get(25.0), None);
    /// ```
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| (p - percentile).abs() < f64::EPSILON)
            .map(|&(_, value)| value)
    }

    /// Returns an iterator over all `(percentile, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single percentile value from sorted data.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `percentile` - The percentile to compute (0.0 to 100.0)
///
/// The percentile is taken at fractional rank `p / 100 * (n - 1)` and
/// linearly interpolated between the two bracketing order statistics.
/// Percentiles outside `0.0..=100.0` are clamped to the extremes.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use dvis_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), 2.5);
/// assert_eq!(compute_percentile(&values, 25.0), 1.75);
/// assert_eq!(compute_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let max_rank = (sorted_values.len() - 1) as f64;
    let rank = (percentile / 100.0 * max_rank).clamp(0.0, max_rank);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted_values[lower];
    }
    let frac = rank - rank.floor();
    let lo = sorted_values[lower];
    let hi = sorted_values[upper];
    lo + (hi - lo) * frac
}

/// Computes several percentiles of unsorted `values` at once.
///
/// # Returns
///
/// One value per entry of `points`, in the same order.
///
/// # Examples
///
/// ```
/// use dvis_stats::percentiles::compute_percentiles;
///
/// let [q1, median, q3] = compute_percentiles(&[9.0, 1.0, 5.0, 3.0, 7.0], [25.0, 50.0, 75.0]);
/// assert_eq!((q1, median, q3), (3.0, 5.0, 7.0));
/// ```
#[must_use]
pub fn compute_percentiles<const N: usize>(values: &[f64], points: [f64; N]) -> [f64; N] {
    let sorted = sorted_copy(values);
    points.map(|p| compute_percentile(&sorted, p))
}

/// Returns an ascending copy of `values`, ordered by [`f64::total_cmp`].
pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
