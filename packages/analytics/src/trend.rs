//! Linear severity trend across the calendar year.

use pest_map_analytics_models::{MonthlyValue, SeverityTrend};
use pest_map_dataset_models::Observation;

use crate::{AnalyticsError, mean, summary::monthly_trend};

const MIN_POINTS: usize = 2;

/// Fits a least-squares line through the monthly mean severities and
/// evaluates it at every month of the year.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] if the subset spans fewer
/// than two distinct months.
pub fn severity_trend(observations: &[Observation]) -> Result<SeverityTrend, AnalyticsError> {
    let observed: Vec<MonthlyValue> = monthly_trend(observations)
        .into_iter()
        .map(|point| MonthlyValue {
            month: point.month,
            value: point.mean_severity,
        })
        .collect();

    if observed.len() < MIN_POINTS {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_POINTS,
            actual: observed.len(),
        });
    }

    let x_mean = mean(observed.iter().map(|p| f64::from(p.month)));
    let y_mean = mean(observed.iter().map(|p| p.value));

    let (covariance, variance) = observed.iter().fold((0.0, 0.0), |(cov, var), p| {
        let dx = f64::from(p.month) - x_mean;
        (dx.mul_add(p.value - y_mean, cov), dx.mul_add(dx, var))
    });

    // Months are distinct, so variance is positive.
    let slope = covariance / variance;
    let intercept = slope.mul_add(-x_mean, y_mean);

    let predicted = (1..=12)
        .map(|month| MonthlyValue {
            month,
            value: slope.mul_add(f64::from(month), intercept),
        })
        .collect();

    Ok(SeverityTrend {
        slope,
        intercept,
        observed,
        predicted,
    })
}

#[cfg(test)]
mod tests {
    use pest_map_pest_models::{Disease, Town};

    use super::*;
    use crate::test_support::obs;

    #[test]
    fn single_month_is_insufficient() {
        let one_month = vec![
            obs(5, Town::Luyang, Disease::Aphid, 2, 1, 1.0, 1.0),
            obs(5, Town::Wawu, Disease::Aphid, 4, 1, 1.0, 1.0),
        ];
        assert!(matches!(
            severity_trend(&one_month),
            Err(AnalyticsError::InsufficientData {
                required: 2,
                actual: 1
            })
        ));
        assert!(severity_trend(&[]).is_err());
    }

    #[test]
    fn fits_exact_line() {
        // Monthly means: month 2 -> 1.0, month 4 -> 2.0, month 6 -> 3.0
        let observations = vec![
            obs(2, Town::Luyang, Disease::Aphid, 1, 1, 1.0, 1.0),
            obs(4, Town::Luyang, Disease::Aphid, 1, 1, 1.0, 1.0),
            obs(4, Town::Wawu, Disease::Aphid, 3, 1, 1.0, 1.0),
            obs(6, Town::Luyang, Disease::Aphid, 3, 1, 1.0, 1.0),
        ];
        let trend = severity_trend(&observations).unwrap();
        assert!((trend.slope - 0.5).abs() < 1e-12);
        assert!(trend.intercept.abs() < 1e-12);
        assert_eq!(trend.observed.len(), 3);
        assert_eq!(trend.predicted.len(), 12);
        assert_eq!(trend.predicted[0].month, 1);
        assert!((trend.predicted[11].value - 6.0).abs() < 1e-12);
    }
}
