#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the pest map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the dataset row types to allow independent evolution of the API
//! contract.

use chrono::NaiveDate;
use pest_map_analytics_models::ScoringProfile;
use pest_map_dataset_models::Observation;
use pest_map_pest_models::{Crop, Disease, Severity, Town};
use serde::{Deserialize, Serialize};

/// An observation as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiObservation {
    /// First day of the observed month.
    pub date: NaiveDate,
    /// Calendar month (1-12).
    pub month: u32,
    /// Town.
    pub town: Town,
    /// Crop.
    pub crop: Crop,
    /// Pest or disease.
    pub disease: Disease,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Occurrences per month.
    pub monthly_frequency: u32,
    /// Severity level name.
    pub severity: Severity,
    /// Severity numeric value (1-5).
    pub severity_value: u8,
    /// Fraction of the planted area affected.
    pub affected_area_fraction: f64,
    /// Fraction of the yield lost.
    pub yield_loss_fraction: f64,
    /// Estimated economic loss in yuan.
    pub economic_loss: f64,
    /// Estimated prevention cost in yuan.
    pub prevention_cost: f64,
}

impl From<&Observation> for ApiObservation {
    fn from(obs: &Observation) -> Self {
        Self {
            date: obs.date,
            month: obs.month(),
            town: obs.town,
            crop: obs.crop,
            disease: obs.disease,
            latitude: obs.latitude,
            longitude: obs.longitude,
            monthly_frequency: obs.monthly_frequency,
            severity: obs.severity,
            severity_value: obs.severity.value(),
            affected_area_fraction: obs.affected_area_fraction,
            yield_loss_fraction: obs.yield_loss_fraction,
            economic_loss: obs.economic_loss,
            prevention_cost: obs.prevention_cost,
        }
    }
}

/// Column filters shared by every analytics endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Comma-separated calendar months (1-12).
    pub months: Option<String>,
    /// Comma-separated town names.
    pub towns: Option<String>,
    /// Comma-separated crop names.
    pub crops: Option<String>,
    /// Comma-separated disease names.
    pub diseases: Option<String>,
    /// Bounding box as `west,south,east,north`.
    pub bbox: Option<String>,
}

/// Query parameters for the observations endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationQueryParams {
    /// Comma-separated calendar months (1-12).
    pub months: Option<String>,
    /// Comma-separated town names.
    pub towns: Option<String>,
    /// Comma-separated crop names.
    pub crops: Option<String>,
    /// Comma-separated disease names.
    pub diseases: Option<String>,
    /// Bounding box as `west,south,east,north`.
    pub bbox: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

/// Query parameters for the rankings endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingQueryParams {
    /// Comma-separated calendar months (1-12).
    pub months: Option<String>,
    /// Comma-separated town names.
    pub towns: Option<String>,
    /// Comma-separated crop names.
    pub crops: Option<String>,
    /// Comma-separated disease names.
    pub diseases: Option<String>,
    /// Bounding box as `west,south,east,north`.
    pub bbox: Option<String>,
    /// Scoring profile (`standard` or `extended`).
    pub profile: Option<ScoringProfile>,
    /// Number of top entries to return.
    pub limit: Option<usize>,
}

impl From<&ObservationQueryParams> for FilterParams {
    fn from(p: &ObservationQueryParams) -> Self {
        Self {
            months: p.months.clone(),
            towns: p.towns.clone(),
            crops: p.crops.clone(),
            diseases: p.diseases.clone(),
            bbox: p.bbox.clone(),
        }
    }
}

impl From<&RankingQueryParams> for FilterParams {
    fn from(p: &RankingQueryParams) -> Self {
        Self {
            months: p.months.clone(),
            towns: p.towns.clone(),
            crops: p.crops.clone(),
            diseases: p.diseases.clone(),
            bbox: p.bbox.clone(),
        }
    }
}

/// A page of observations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPage {
    /// Observations on this page.
    pub observations: Vec<ApiObservation>,
    /// Total count of observations matching the filter.
    pub total_count: usize,
    /// Whether more observations are available beyond this page.
    pub has_more: bool,
}

/// A town in the catalogue response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTown {
    /// Town name.
    pub name: Town,
    /// Base latitude.
    pub latitude: f64,
    /// Base longitude.
    pub longitude: f64,
}

/// A crop in the catalogue response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrop {
    /// Crop name.
    pub name: Crop,
    /// Market value in yuan per kilogram.
    pub unit_value: f64,
    /// Pests and diseases of this crop.
    pub diseases: Vec<Disease>,
}

/// Catalogue response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCatalog {
    /// Towns in catalogue order.
    pub towns: Vec<ApiTown>,
    /// Crops in catalogue order.
    pub crops: Vec<ApiCrop>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}
