#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic pest/disease dataset generator.
//!
//! Produces a seasonally modulated series of monthly [`Observation`]s for
//! every town in the catalogue. Generation is a pure function of the
//! [`GeneratorConfig`] and the RNG passed in: the same seed always yields
//! the same rows in the same order.
//!
//! The dataset is small (a few hundred rows) and read-only once built, so
//! callers normally go through [`DatasetCache`] and share one copy per
//! session.

pub mod cache;
pub mod config;

use std::f64::consts::PI;

use chrono::{Datelike as _, NaiveDate};
use pest_map_dataset_models::Observation;
use pest_map_pest_models::{Crop, Disease, Severity, Town};
use rand::seq::SliceRandom as _;
use rand::{Rng, SeedableRng as _};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use cache::DatasetCache;
pub use config::{DEFAULT_SEED, GeneratorConfig};

/// Amplitude of the seasonal sinusoid.
pub const SEASONAL_AMPLITUDE: f64 = 0.3;

/// Scale applied to `area * yield_loss * unit_value` to get yuan.
const ECONOMIC_LOSS_SCALE: f64 = 10_000.0;

/// Yield loss fraction contributed by each severity level.
const YIELD_LOSS_PER_SEVERITY: f64 = 0.05;

/// Errors raised when the generator is asked for something the catalogue
/// cannot provide.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    /// Asked to sample more items than the catalogue holds.
    #[error("{what}: cannot sample {requested} items from a population of {population}")]
    SampleExceedsPopulation {
        /// Which sampling step failed.
        what: &'static str,
        /// Upper bound of the requested sample size.
        requested: usize,
        /// Number of items available.
        population: usize,
    },

    /// A sampling range is empty, inverted or outside its domain.
    #[error("Invalid {what} range")]
    InvalidRange {
        /// Which parameter is invalid.
        what: &'static str,
    },

    /// Coordinate jitter is negative or not finite.
    #[error("Invalid coordinate jitter {jitter}")]
    InvalidJitter {
        /// The configured jitter.
        jitter: f64,
    },

    /// The horizon has no months.
    #[error("Horizon must cover at least one month")]
    EmptyHorizon,

    /// The epoch is not the first day of a month.
    #[error("Epoch {epoch} is not the first day of a month")]
    EpochNotMonthStart {
        /// The configured epoch.
        epoch: NaiveDate,
    },

    /// A timestamp fell outside the representable calendar.
    #[error("Date out of range: {epoch} + {offset} months")]
    DateOutOfRange {
        /// The configured epoch.
        epoch: NaiveDate,
        /// Month offset that overflowed.
        offset: u32,
    },
}

/// Seasonal multiplier for a calendar month: `1 + 0.3 * sin(2π * month / 12)`.
///
/// Peaks at 1.3 in March and bottoms out at 0.7 in September.
#[must_use]
pub fn seasonal_factor(month: u32) -> f64 {
    SEASONAL_AMPLITUDE.mul_add((2.0 * PI * f64::from(month) / 12.0).sin(), 1.0)
}

/// Applies the seasonal factor to a base frequency, flooring at 1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn seasonal_frequency(base: u32, month: u32) -> u32 {
    let scaled = (f64::from(base) * seasonal_factor(month)).floor();
    (scaled as u32).max(1)
}

/// Applies the seasonal factor to a base severity, clamping into 1-5.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn seasonal_severity(base: u8, month: u32) -> Severity {
    let scaled = (f64::from(base) * seasonal_factor(month)).floor();
    Severity::clamped(scaled as i64)
}

/// Generates the dataset with an RNG seeded from `config.seed`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the configuration is invalid.
pub fn generate_seeded(config: &GeneratorConfig) -> Result<Vec<Observation>, GenerateError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate(config, &mut rng)
}

/// Generates the dataset, drawing every random value from `rng`.
///
/// Towns are visited in catalogue order. Each town draws 2-3 crops and
/// each crop 1-2 of its diseases, both without replacement, then one row
/// is emitted per monthly timestamp.
///
/// # Errors
///
/// Returns [`GenerateError`] if the configuration is invalid.
pub fn generate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<Observation>, GenerateError> {
    config.validate()?;
    let dates = config.timestamps()?;

    let mut observations = Vec::new();

    for &town in Town::all() {
        let crop_count = rng.gen_range(config.crops_per_town.clone());
        let crops: Vec<Crop> = Crop::all()
            .choose_multiple(rng, crop_count)
            .copied()
            .collect();

        for crop in crops {
            let disease_count = rng.gen_range(config.diseases_per_crop.clone());
            let diseases: Vec<Disease> = crop
                .diseases()
                .choose_multiple(rng, disease_count)
                .copied()
                .collect();

            for disease in diseases {
                for &date in &dates {
                    observations.push(draw_observation(config, rng, date, town, crop, disease));
                }
            }
        }
    }

    log::debug!(
        "Generated {} observations (seed {}, {} months)",
        observations.len(),
        config.seed,
        dates.len()
    );

    Ok(observations)
}

/// Draws one row. The draw order is part of the reproducibility contract.
fn draw_observation<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
    date: NaiveDate,
    town: Town,
    crop: Crop,
    disease: Disease,
) -> Observation {
    let month = date.month();

    let base_frequency = rng.gen_range(config.base_frequency.clone());
    let base_severity = rng.gen_range(config.base_severity.clone());
    let monthly_frequency = seasonal_frequency(base_frequency, month);
    let severity = seasonal_severity(base_severity, month);

    let affected_area_fraction = rng.gen_range(config.affected_area.clone());
    let yield_loss_fraction = f64::from(severity.value())
        .mul_add(YIELD_LOSS_PER_SEVERITY, rng.gen_range(config.yield_loss_jitter.clone()));
    let economic_loss =
        affected_area_fraction * yield_loss_fraction * crop.unit_value() * ECONOMIC_LOSS_SCALE;

    let (base_latitude, base_longitude) = town.coordinates();
    let jitter = config.coordinate_jitter;
    let latitude = base_latitude + rng.gen_range(-jitter..=jitter);
    let longitude = base_longitude + rng.gen_range(-jitter..=jitter);

    let prevention_cost = economic_loss * rng.gen_range(config.prevention_cost_ratio.clone());

    Observation {
        date,
        town,
        crop,
        disease,
        latitude,
        longitude,
        monthly_frequency,
        severity,
        affected_area_fraction,
        yield_loss_fraction,
        economic_loss,
        prevention_cost,
    }
}
