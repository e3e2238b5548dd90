//! Range frames for scatter plots.
//!
//! A range frame replaces the axis line of a scatter plot with a line that
//! only spans the data: it starts at the minimum, is offset over the
//! interquartile range with a small gap at the median, and ends at the
//! maximum. The five positions double as the axis ticks.

use serde::Serialize;

use crate::{
    error::InvalidInputError,
    percentiles::{self, Percentiles},
};

/// Distance of a trimmed end from the median, in interquartile ranges.
pub const TRIM_MULTIPLIER: f64 = 1.5;

const FRAME_POINTS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// Five-position range frame of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeFrame {
    pub min: f64,
    pub quartile1: f64,
    pub median: f64,
    pub quartile3: f64,
    pub max: f64,
}

/// One piece of a range-frame line, in data coordinates along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSegment {
    pub start: f64,
    pub end: f64,
    /// Whether the segment is drawn offset from the axis (the box part).
    pub offset: bool,
}

impl RangeFrame {
    /// Computes the frame of `values`.
    ///
    /// With `trim`, an end lying more than [`TRIM_MULTIPLIER`] interquartile
    /// ranges from the median is pulled in to the most extreme value still
    /// within that distance.
    ///
    /// # Examples
    ///
    /// ```
    /// use dvis_stats::range_frame::RangeFrame;
    ///
    /// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
    ///
    /// let frame = RangeFrame::new(&values, false).unwrap();
    /// assert_eq!(frame.max, 100.0);
    ///
    /// let trimmed = RangeFrame::new(&values, true).unwrap();
    /// assert_eq!(trimmed.max, 9.0);
    /// ```
    pub fn new(values: &[f64], trim: bool) -> Result<Self, InvalidInputError> {
        if values.is_empty() {
            return Err(InvalidInputError::EmptySample);
        }
        let sorted = percentiles::sorted_copy(values);
        let table = Percentiles::from_sorted(&sorted, &FRAME_POINTS);
        let [min, quartile1, median, quartile3, max] =
            FRAME_POINTS.map(|p| table.get(p).unwrap_or(f64::NAN));
        let mut frame = Self {
            min,
            quartile1,
            median,
            quartile3,
            max,
        };
        if trim {
            frame.trim(&sorted);
        }
        Ok(frame)
    }

    /// Pulls each far end in to the most extreme value strictly inside the
    /// reach, or to the median when no value is.
    fn trim(&mut self, sorted: &[f64]) {
        let reach = TRIM_MULTIPLIER * (self.quartile3 - self.quartile1);
        let lo_limit = self.median - reach;
        let hi_limit = self.median + reach;

        if self.median - self.min > reach {
            self.min = sorted
                .iter()
                .copied()
                .find(|&v| lo_limit < v && v <= self.median)
                .unwrap_or(self.median);
        }
        if self.max - self.median > reach {
            self.max = sorted
                .iter()
                .rev()
                .copied()
                .find(|&v| self.median <= v && v < hi_limit)
                .unwrap_or(self.median);
        }
    }

    /// The tick positions, from minimum to maximum.
    #[must_use]
    pub fn ticks(&self) -> [f64; 5] {
        [
            self.min,
            self.quartile1,
            self.median,
            self.quartile3,
            self.max,
        ]
    }

    /// The offset part of the frame, from the first to the third quartile.
    ///
    /// The break of the offset part is centered on [`Self::median`].
    #[must_use]
    pub fn inner(&self) -> (f64, f64) {
        (self.quartile1, self.quartile3)
    }

    /// The four line pieces of the frame.
    ///
    /// `gap` is half the width of the break left around the median.
    #[must_use]
    pub fn segments(&self, gap: f64) -> [RangeSegment; 4] {
        [
            RangeSegment {
                start: self.min,
                end: self.quartile1,
                offset: false,
            },
            RangeSegment {
                start: self.quartile1,
                end: self.median - gap,
                offset: true,
            },
            RangeSegment {
                start: self.median + gap,
                end: self.quartile3,
                offset: true,
            },
            RangeSegment {
                start: self.quartile3,
                end: self.max,
                offset: false,
            },
        ]
    }
}

/// Range frames of both axes of a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterFrame {
    pub x: RangeFrame,
    pub y: RangeFrame,
}

impl ScatterFrame {
    /// Computes the frames of paired `x` and `y` values.
    ///
    /// # Errors
    ///
    /// Fails when either axis is empty or the lengths differ.
    pub fn new(x: &[f64], y: &[f64], trim: bool) -> Result<Self, InvalidInputError> {
        InvalidInputError::check_len("y values", x.len(), y.len())?;
        Ok(Self {
            x: RangeFrame::new(x, trim)?,
            y: RangeFrame::new(y, trim)?,
        })
    }
}
