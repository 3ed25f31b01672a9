//! Composite threat index and disease ranking.

use std::collections::BTreeMap;

use pest_map_analytics_models::{
    RankedThreat, ScoringProfile, ScoringWeights, ThreatLevel, ThreatRecommendation, ThreatScore,
};
use pest_map_dataset_models::Observation;
use pest_map_pest_models::Disease;

use crate::ratio_or_zero;

#[derive(Debug, Default)]
struct DiseaseGroup {
    observations: usize,
    severity_sum: f64,
    frequency_sum: f64,
    economic_loss: f64,
    prevention_cost: f64,
}

impl DiseaseGroup {
    #[allow(clippy::cast_precision_loss)]
    fn mean_severity(&self) -> f64 {
        ratio_or_zero(self.severity_sum, self.observations as f64)
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean_frequency(&self) -> f64 {
        ratio_or_zero(self.frequency_sum, self.observations as f64)
    }
}

/// Groups by disease. Iteration follows `Disease` declaration order, which
/// is also the tie-break order of [`rank`].
fn group_by_disease(observations: &[Observation]) -> BTreeMap<Disease, DiseaseGroup> {
    let mut groups: BTreeMap<Disease, DiseaseGroup> = BTreeMap::new();
    for obs in observations {
        let group = groups.entry(obs.disease).or_default();
        group.observations += 1;
        group.severity_sum += f64::from(obs.severity.value());
        group.frequency_sum += f64::from(obs.monthly_frequency);
        group.economic_loss += obs.economic_loss;
        group.prevention_cost += obs.prevention_cost;
    }
    groups
}

/// Ranks diseases by composite threat index, highest first.
///
/// Loss (and, when weighted, cost) is normalized by the largest group
/// total in the input. A zero maximum makes that term zero. Equal indices
/// keep `Disease` declaration order.
#[must_use]
pub fn rank(observations: &[Observation], weights: &ScoringWeights) -> Vec<RankedThreat> {
    let groups = group_by_disease(observations);

    let max_loss = groups.values().map(|g| g.economic_loss).fold(0.0, f64::max);
    let max_cost = groups
        .values()
        .map(|g| g.prevention_cost)
        .fold(0.0, f64::max);

    let mut ranked: Vec<RankedThreat> = groups
        .into_iter()
        .map(|(disease, group)| {
            let mean_severity = group.mean_severity();
            let mean_frequency = group.mean_frequency();
            let normalized_loss = ratio_or_zero(group.economic_loss, max_loss);
            let normalized_cost = weights
                .prevention_cost
                .map(|_| ratio_or_zero(group.prevention_cost, max_cost));

            let composite_index = weights.severity * mean_severity
                + weights.frequency * mean_frequency
                + weights.economic_loss * normalized_loss
                + weights
                    .prevention_cost
                    .zip(normalized_cost)
                    .map_or(0.0, |(weight, value)| weight * value);

            RankedThreat {
                disease,
                score: ThreatScore {
                    observations: group.observations,
                    mean_severity,
                    mean_frequency,
                    total_economic_loss: group.economic_loss,
                    total_prevention_cost: group.prevention_cost,
                    normalized_loss,
                    normalized_cost,
                    composite_index,
                },
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .composite_index
            .total_cmp(&a.score.composite_index)
    });

    ranked
}

/// Ranks with the weights of a named profile.
#[must_use]
pub fn rank_with_profile(observations: &[Observation], profile: ScoringProfile) -> Vec<RankedThreat> {
    rank(observations, &profile.weights())
}

/// Ranks and attaches threat levels and treatment advice.
///
/// Levels are only assigned for profiles that use them. `limit` keeps the
/// top `n` entries.
#[must_use]
pub fn recommend(
    observations: &[Observation],
    profile: ScoringProfile,
    limit: Option<usize>,
) -> Vec<ThreatRecommendation> {
    let ranked = rank_with_profile(observations, profile);
    log::debug!(
        "Ranked {} diseases from {} observations ({profile} profile)",
        ranked.len(),
        observations.len()
    );

    ranked
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|RankedThreat { disease, score }| ThreatRecommendation {
            disease,
            level: profile
                .assigns_threat_levels()
                .then(|| ThreatLevel::from_index(score.composite_index)),
            advice: disease.treatment(),
            score,
        })
        .collect()
}
