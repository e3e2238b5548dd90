//! Summary statistics behind Tufte-style plots.
//!
//! This crate computes the numbers a renderer needs to draw:
//!
//! - **Boxplots**: quartiles, whiskers, fliers and notch bounds, with an
//!   optional bootstrap estimate of the notch
//! - **Range frames**: data-range axis lines with quartile offsets for scatter plots
//! - **Error bands**: per-point bounds and fill outlines around a line
//!
//! Nothing here draws; every result is plain data that serializes with `serde`.
//!
//! # Modules
//!
//! - [`boxplot`]: Boxplot statistics of one sample
//! - [`bootstrap`]: Bootstrap confidence interval of the median
//! - [`range_frame`]: Range frames of scatter plot axes
//! - [`error_band`]: Error bands from known errors or repeated observations
//! - [`descriptive`]: Mean, variance and standard error
//! - [`percentiles`]: Linearly interpolated percentiles
//!
//! # Examples
//!
//! ## Computing boxplot statistics
//!
//! ```
//! use dvis_stats::boxplot::{BoxplotConfig, BoxplotStats};
//!
//! let sample = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let stats = BoxplotStats::new(&sample, &BoxplotConfig::default()).unwrap();
//! assert_eq!(stats.quartile1, 3.25);
//! assert_eq!(stats.median, 5.5);
//! assert_eq!(stats.quartile3, 7.75);
//! ```
//!
//! ## Bootstrapping the notch with a reproducible RNG
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use dvis_stats::boxplot::{BoxplotConfig, compute};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let sample = [2.0, 3.5, 1.0, 4.5, 3.0, 2.5, 6.0, 3.0];
//! let config = BoxplotConfig {
//!     bootstrap_samples: NonZeroUsize::new(2000),
//!     ..BoxplotConfig::default()
//! };
//! let stats = compute(&sample, &config, &mut Pcg32::seed_from_u64(1)).unwrap();
//! assert!(stats.notch_low <= stats.notch_high);
//! ```
//!
//! ## Framing a scatter plot
//!
//! ```
//! use dvis_stats::range_frame::ScatterFrame;
//!
//! let x = [0.5, 1.0, 1.5, 2.0, 2.5];
//! let y = [10.0, 12.0, 11.0, 15.0, 30.0];
//! let frame = ScatterFrame::new(&x, &y, false).unwrap();
//! assert_eq!(frame.x.ticks(), [0.5, 1.0, 1.5, 2.0, 2.5]);
//! ```

pub use self::error::InvalidInputError;

pub mod bootstrap;
pub mod boxplot;
pub mod descriptive;
mod error;
pub mod error_band;
pub mod percentiles;
pub mod range_frame;
