#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Threat scoring and dashboard summary result types.
//!
//! Defines the weight vectors used to rank diseases by composite threat
//! index, the per-disease score produced by the ranking, and the result
//! shapes of the dashboard aggregations.

use pest_map_pest_models::{Disease, TreatmentAdvice, Town};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Weights of the composite threat index.
///
/// `index = severity * mean_severity + frequency * mean_frequency
///        + economic_loss * normalized_loss
///        + prevention_cost * normalized_cost`
///
/// When `prevention_cost` is `None` the normalized-cost term is left out
/// entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    /// Weight of the mean severity (1-5 scale).
    pub severity: f64,
    /// Weight of the mean monthly frequency.
    pub frequency: f64,
    /// Weight of the loss normalized by the largest group loss.
    pub economic_loss: f64,
    /// Weight of the cost normalized by the largest group cost.
    pub prevention_cost: Option<f64>,
}

impl ScoringWeights {
    /// Three-factor weights used by the recommendation panel.
    pub const STANDARD: Self = Self {
        severity: 0.4,
        frequency: 0.3,
        economic_loss: 0.3,
        prevention_cost: None,
    };

    /// Four-factor weights used by the decision-support panel.
    pub const EXTENDED: Self = Self {
        severity: 0.3,
        frequency: 0.2,
        economic_loss: 0.3,
        prevention_cost: Some(0.2),
    };
}

/// Named scoring configuration.
///
/// The two weight sets were tuned independently for their panels and are
/// kept separate rather than merged.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoringProfile {
    /// Severity, frequency and loss.
    #[default]
    Standard,
    /// Severity, frequency, loss and prevention cost, with threat levels.
    Extended,
}

impl ScoringProfile {
    /// Returns the weight vector for this profile.
    #[must_use]
    pub const fn weights(self) -> ScoringWeights {
        match self {
            Self::Standard => ScoringWeights::STANDARD,
            Self::Extended => ScoringWeights::EXTENDED,
        }
    }

    /// Whether results under this profile are bucketed into [`ThreatLevel`]s.
    #[must_use]
    pub const fn assigns_threat_levels(self) -> bool {
        matches!(self, Self::Extended)
    }
}

/// Display bucket for a composite threat index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    /// Index at or below 0.4.
    Low,
    /// Index above 0.4 and at or below 0.7.
    Medium,
    /// Index above 0.7.
    High,
}

impl ThreatLevel {
    /// Indices strictly above this are [`ThreatLevel::High`].
    pub const HIGH_THRESHOLD: f64 = 0.7;
    /// Indices strictly above this are at least [`ThreatLevel::Medium`].
    pub const MEDIUM_THRESHOLD: f64 = 0.4;

    /// Buckets a composite index.
    #[must_use]
    pub fn from_index(index: f64) -> Self {
        if index > Self::HIGH_THRESHOLD {
            Self::High
        } else if index > Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Aggregated threat statistics for one disease within a filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatScore {
    /// Number of observations in the group.
    pub observations: usize,
    /// Mean severity (1-5).
    pub mean_severity: f64,
    /// Mean monthly frequency.
    pub mean_frequency: f64,
    /// Sum of economic losses in yuan.
    pub total_economic_loss: f64,
    /// Sum of prevention costs in yuan.
    pub total_prevention_cost: f64,
    /// Loss divided by the largest group loss (0 when that is 0).
    pub normalized_loss: f64,
    /// Cost divided by the largest group cost, when the weights use it.
    pub normalized_cost: Option<f64>,
    /// Weighted composite index.
    pub composite_index: f64,
}

/// A disease with its threat score, as returned by ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedThreat {
    /// The disease.
    pub disease: Disease,
    /// Its aggregated score.
    pub score: ThreatScore,
}

/// A ranked threat joined with its display level and treatment advice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatRecommendation {
    /// The disease.
    pub disease: Disease,
    /// Its aggregated score.
    pub score: ThreatScore,
    /// Threat level, for profiles that assign one.
    pub level: Option<ThreatLevel>,
    /// Catalogued treatment advice, if any.
    pub advice: Option<&'static TreatmentAdvice>,
}

/// Headline figures for a filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Number of observations summarized.
    pub observations: usize,
    /// Total estimated economic loss in yuan.
    pub total_economic_loss: f64,
    /// Total estimated prevention cost in yuan.
    pub total_prevention_cost: f64,
    /// Mean severity (1-5).
    pub mean_severity: f64,
    /// Prevention cost as a percentage of loss (0 when loss is 0).
    pub prevention_cost_share_percent: f64,
    /// Loss recovered per yuan of prevention, `None` when cost is 0.
    pub return_ratio: Option<f64>,
    /// Loss minus prevention cost in yuan.
    pub prevention_potential: f64,
    /// Prevention potential as a percentage of loss (0 when loss is 0).
    pub prevention_efficiency_percent: f64,
    /// Distance from the worst severity, `(1 - mean/5) * 100`.
    pub severity_headroom_percent: f64,
    /// Distinct towns with at least one observation.
    pub affected_towns: usize,
    /// Selected towns with no observation, when a town selection was given.
    pub unaffected_towns: Option<usize>,
}

/// Aggregates for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrendPoint {
    /// Calendar month (1-12).
    pub month: u32,
    /// Mean monthly frequency.
    pub mean_frequency: f64,
    /// Mean severity.
    pub mean_severity: f64,
    /// Sum of economic losses in yuan.
    pub total_economic_loss: f64,
}

/// Aggregates for one town.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownStats {
    /// The town.
    pub town: Town,
    /// Mean severity.
    pub mean_severity: f64,
    /// Sum of economic losses in yuan.
    pub total_economic_loss: f64,
}

/// Loss versus prevention spend for one disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBenefit {
    /// The disease.
    pub disease: Disease,
    /// Sum of economic losses in yuan.
    pub total_economic_loss: f64,
    /// Sum of prevention costs in yuan.
    pub total_prevention_cost: f64,
    /// Loss divided by cost, 0 when cost is 0.
    pub return_ratio: f64,
    /// Catalogued treatment efficacy in percent.
    pub efficacy_percent: Option<u8>,
}

/// Least-squares line through monthly mean severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityTrend {
    /// Change in severity per month.
    pub slope: f64,
    /// Severity at month 0.
    pub intercept: f64,
    /// The observed monthly means the line was fitted to.
    pub observed: Vec<MonthlyValue>,
    /// Line evaluated at every calendar month.
    pub predicted: Vec<MonthlyValue>,
}

/// A value attached to a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyValue {
    /// Calendar month (1-12).
    pub month: u32,
    /// The value.
    pub value: f64,
}
