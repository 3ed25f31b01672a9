#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Threat ranking and dashboard aggregations.
//!
//! Every function here is a pure computation over a slice of
//! [`pest_map_dataset_models::Observation`]s, normally a subset selected
//! with [`filter_observations`]. Empty input is always valid and yields
//! empty (or `None`) results rather than dividing by zero.

pub mod scoring;
pub mod summary;
pub mod trend;

use thiserror::Error;

pub use scoring::{rank, rank_with_profile, recommend};
pub use summary::{cost_benefit, filter_observations, monthly_trend, summarize, town_breakdown};
pub use trend::severity_trend;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Not enough distinct data points for the requested computation.
    #[error("Insufficient data: need at least {required} monthly points, got {actual}")]
    InsufficientData {
        /// Minimum number of points required.
        required: usize,
        /// Number of points available.
        actual: usize,
    },
}

/// Mean of an iterator of values, `0.0` when empty.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert!(mean(std::iter::empty()).abs() < f64::EPSILON);
        assert!((mean([1.0, 2.0, 6.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert!(ratio_or_zero(5.0, 0.0).abs() < f64::EPSILON);
        assert!((ratio_or_zero(5.0, 2.0) - 2.5).abs() < 1e-12);
    }
}
