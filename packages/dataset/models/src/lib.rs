#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Observation rows and filter definitions.
//!
//! These types represent the shape of the generated pest/disease dataset
//! and the column filters the dashboard applies to it. They are distinct
//! from the API response types in `pest_map_server_models`.

use chrono::{Datelike as _, NaiveDate};
use pest_map_pest_models::{Crop, Disease, Severity, Town};
use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Whether the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }
}

/// One row of the generated dataset: a monthly reading for a single
/// (town, crop, disease) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// First day of the observed month.
    pub date: NaiveDate,
    /// Township the reading was taken in.
    pub town: Town,
    /// Affected crop.
    pub crop: Crop,
    /// Pest or disease observed. Always a member of `crop.diseases()`.
    pub disease: Disease,
    /// Jittered latitude of the reading.
    pub latitude: f64,
    /// Jittered longitude of the reading.
    pub longitude: f64,
    /// Occurrences per month, at least 1.
    pub monthly_frequency: u32,
    /// Outbreak severity.
    pub severity: Severity,
    /// Fraction of the planted area affected.
    pub affected_area_fraction: f64,
    /// Fraction of the yield lost.
    pub yield_loss_fraction: f64,
    /// Estimated economic loss in yuan.
    pub economic_loss: f64,
    /// Estimated prevention cost in yuan.
    pub prevention_cost: f64,
}

impl Observation {
    /// Calendar month of the observation (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Column filters applied to the dataset.
///
/// Each list restricts its column to the listed values. An empty list
/// leaves that column unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationFilter {
    /// Calendar months (1-12) to include.
    pub months: Vec<u32>,
    /// Towns to include.
    pub towns: Vec<Town>,
    /// Crops to include.
    pub crops: Vec<Crop>,
    /// Diseases to include.
    pub diseases: Vec<Disease>,
    /// Spatial bounding box filter.
    pub bbox: Option<BoundingBox>,
}

impl ObservationFilter {
    /// Whether the observation passes every active restriction.
    #[must_use]
    pub fn matches(&self, observation: &Observation) -> bool {
        allows(&self.months, &observation.month())
            && allows(&self.towns, &observation.town)
            && allows(&self.crops, &observation.crop)
            && allows(&self.diseases, &observation.disease)
            && self
                .bbox
                .is_none_or(|bbox| bbox.contains(observation.latitude, observation.longitude))
    }

    /// Whether no restriction is active.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.months.is_empty()
            && self.towns.is_empty()
            && self.crops.is_empty()
            && self.diseases.is_empty()
            && self.bbox.is_none()
    }
}

fn allows<T: PartialEq>(selected: &[T], value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            town: Town::Xiatang,
            crop: Crop::Peach,
            disease: Disease::Aphid,
            latitude: 33.61,
            longitude: 112.74,
            monthly_frequency: 6,
            severity: Severity::Moderate,
            affected_area_fraction: 0.2,
            yield_loss_fraction: 0.25,
            economic_loss: 4250.0,
            prevention_cost: 850.0,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ObservationFilter::default();
        assert!(filter.is_unrestricted());
        assert!(filter.matches(&observation()));
    }

    #[test]
    fn filter_requires_every_active_column() {
        let filter = ObservationFilter {
            months: vec![3, 4],
            towns: vec![Town::Xiatang],
            crops: vec![Crop::Peach, Crop::Pear],
            ..ObservationFilter::default()
        };
        assert!(filter.matches(&observation()));

        let wrong_month = ObservationFilter {
            months: vec![5],
            ..filter.clone()
        };
        assert!(!wrong_month.matches(&observation()));

        let wrong_disease = ObservationFilter {
            diseases: vec![Disease::BrownRot],
            ..filter
        };
        assert!(!wrong_disease.matches(&observation()));
    }

    #[test]
    fn bbox_filter_uses_jittered_coordinates() {
        let inside = ObservationFilter {
            bbox: Some(BoundingBox::new(112.70, 33.55, 112.80, 33.65)),
            ..ObservationFilter::default()
        };
        assert!(inside.matches(&observation()));

        let outside = ObservationFilter {
            bbox: Some(BoundingBox::new(112.80, 33.70, 112.90, 33.80)),
            ..ObservationFilter::default()
        };
        assert!(!outside.matches(&observation()));
    }

    #[test]
    fn observation_serializes_camel_case() {
        let json = serde_json::to_value(observation()).unwrap();
        assert_eq!(json["town"], "XIATANG");
        assert_eq!(json["monthlyFrequency"], 6);
        assert_eq!(json["severity"], "MODERATE");
        assert_eq!(json["date"], "2024-04-01");
    }
}
