//! Generator configuration and contract validation.

use std::ops::RangeInclusive;

use chrono::{Datelike as _, Months, NaiveDate};
use pest_map_pest_models::{Crop, Severity};

use crate::GenerateError;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Parameters of the synthetic dataset.
///
/// The defaults reproduce the reference dataset: 12 monthly readings from
/// January 2024, 2-3 crops per town and 1-2 diseases per crop.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Seed for the generator's RNG.
    pub seed: u64,
    /// First timestamp. Must be the first day of a month.
    pub epoch: NaiveDate,
    /// Number of consecutive monthly timestamps.
    pub horizon_months: u32,
    /// How many crops each town grows.
    pub crops_per_town: RangeInclusive<usize>,
    /// How many diseases are observed per grown crop.
    pub diseases_per_crop: RangeInclusive<usize>,
    /// Range of the unmodulated monthly frequency.
    pub base_frequency: RangeInclusive<u32>,
    /// Range of the unmodulated severity.
    pub base_severity: RangeInclusive<u8>,
    /// Maximum coordinate perturbation in degrees, applied as `±jitter`.
    pub coordinate_jitter: f64,
    /// Range of the affected area fraction.
    pub affected_area: RangeInclusive<f64>,
    /// Range of the random part of the yield loss fraction.
    pub yield_loss_jitter: RangeInclusive<f64>,
    /// Range of the prevention cost as a fraction of economic loss.
    pub prevention_cost_ratio: RangeInclusive<f64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            epoch: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            horizon_months: 12,
            crops_per_town: 2..=3,
            diseases_per_crop: 1..=2,
            base_frequency: 1..=10,
            base_severity: 1..=5,
            coordinate_jitter: 0.03,
            affected_area: 0.1..=0.3,
            yield_loss_jitter: 0.05..=0.15,
            prevention_cost_ratio: 0.1..=0.3,
        }
    }
}

impl GeneratorConfig {
    /// Returns a copy of this configuration with a different seed.
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    /// Checks every sampling parameter against the catalogue sizes.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.horizon_months == 0 {
            return Err(GenerateError::EmptyHorizon);
        }
        if self.epoch.day() != 1 {
            return Err(GenerateError::EpochNotMonthStart { epoch: self.epoch });
        }

        check_sample_size("crops per town", &self.crops_per_town, Crop::all().len())?;

        let smallest_disease_list = Crop::all()
            .iter()
            .map(|crop| crop.diseases().len())
            .min()
            .unwrap_or(0);
        check_sample_size(
            "diseases per crop",
            &self.diseases_per_crop,
            smallest_disease_list,
        )?;

        if *self.base_frequency.start() == 0 || self.base_frequency.is_empty() {
            return Err(GenerateError::InvalidRange {
                what: "base frequency",
            });
        }
        if *self.base_severity.start() < Severity::MIN
            || *self.base_severity.end() > Severity::MAX
            || self.base_severity.is_empty()
        {
            return Err(GenerateError::InvalidRange {
                what: "base severity",
            });
        }

        if !self.coordinate_jitter.is_finite() || self.coordinate_jitter < 0.0 {
            return Err(GenerateError::InvalidJitter {
                jitter: self.coordinate_jitter,
            });
        }

        check_fraction_range("affected area", &self.affected_area)?;
        check_fraction_range("yield loss jitter", &self.yield_loss_jitter)?;
        check_fraction_range("prevention cost ratio", &self.prevention_cost_ratio)?;

        Ok(())
    }

    /// Returns the first-of-month timestamps covered by the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::DateOutOfRange`] if the horizon runs past
    /// the representable calendar.
    pub fn timestamps(&self) -> Result<Vec<NaiveDate>, GenerateError> {
        (0..self.horizon_months)
            .map(|offset| {
                self.epoch
                    .checked_add_months(Months::new(offset))
                    .ok_or(GenerateError::DateOutOfRange {
                        epoch: self.epoch,
                        offset,
                    })
            })
            .collect()
    }
}

fn check_sample_size(
    what: &'static str,
    range: &RangeInclusive<usize>,
    population: usize,
) -> Result<(), GenerateError> {
    if *range.start() == 0 || range.is_empty() {
        return Err(GenerateError::InvalidRange { what });
    }
    if *range.end() > population {
        return Err(GenerateError::SampleExceedsPopulation {
            what,
            requested: *range.end(),
            population,
        });
    }
    Ok(())
}

fn check_fraction_range(
    what: &'static str,
    range: &RangeInclusive<f64>,
) -> Result<(), GenerateError> {
    let (start, end) = (*range.start(), *range.end());
    if !start.is_finite() || !end.is_finite() || start < 0.0 || start > end {
        return Err(GenerateError::InvalidRange { what });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        GeneratorConfig::default().validate().unwrap();
    }

    #[test]
    fn default_timestamps_are_first_of_month_2024() {
        let dates = GeneratorConfig::default().timestamps().unwrap();
        assert_eq!(dates.len(), 12);
        for (i, date) in dates.iter().enumerate() {
            assert_eq!(date.year(), 2024);
            assert_eq!(date.month() as usize, i + 1);
            assert_eq!(date.day(), 1);
        }
    }

    #[test]
    fn rejects_sample_larger_than_catalogue() {
        let config = GeneratorConfig {
            crops_per_town: 2..=5,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GenerateError::SampleExceedsPopulation {
                requested: 5,
                population: 4,
                ..
            })
        ));

        let config = GeneratorConfig {
            diseases_per_crop: 1..=4,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GenerateError::SampleExceedsPopulation { population: 3, .. })
        ));
    }

    #[test]
    fn rejects_zero_sample_and_bad_ranges() {
        let zero = GeneratorConfig {
            diseases_per_crop: 0..=2,
            ..GeneratorConfig::default()
        };
        assert!(matches!(zero.validate(), Err(GenerateError::InvalidRange { .. })));

        let severity = GeneratorConfig {
            base_severity: 1..=6,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            severity.validate(),
            Err(GenerateError::InvalidRange {
                what: "base severity"
            })
        ));

        let inverted = GeneratorConfig {
            affected_area: 0.3..=0.1,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(GenerateError::InvalidRange {
                what: "affected area"
            })
        ));
    }

    #[test]
    fn rejects_negative_jitter_and_mid_month_epoch() {
        let jitter = GeneratorConfig {
            coordinate_jitter: -0.01,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            jitter.validate(),
            Err(GenerateError::InvalidJitter { .. })
        ));

        let epoch = GeneratorConfig {
            epoch: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            epoch.validate(),
            Err(GenerateError::EpochNotMonthStart { .. })
        ));

        let horizon = GeneratorConfig {
            horizon_months: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(horizon.validate(), Err(GenerateError::EmptyHorizon)));
    }
}
