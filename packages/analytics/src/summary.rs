//! Headline figures and per-column breakdowns of a filtered subset.

use std::collections::{BTreeMap, BTreeSet};

use pest_map_analytics_models::{CostBenefit, KpiSummary, MonthlyTrendPoint, TownStats};
use pest_map_dataset_models::{Observation, ObservationFilter};
use pest_map_pest_models::{Disease, Severity, Town};

use crate::{mean, ratio_or_zero};

/// Returns the observations that pass `filter`, in dataset order.
#[must_use]
pub fn filter_observations(
    observations: &[Observation],
    filter: &ObservationFilter,
) -> Vec<Observation> {
    if filter.is_unrestricted() {
        return observations.to_vec();
    }
    observations
        .iter()
        .filter(|obs| filter.matches(obs))
        .cloned()
        .collect()
}

/// Computes the headline figures, or `None` for an empty subset.
///
/// `selected_towns` is the user's town selection; when non-empty the
/// summary reports how many of those towns had no observation.
#[must_use]
pub fn summarize(observations: &[Observation], selected_towns: &[Town]) -> Option<KpiSummary> {
    if observations.is_empty() {
        return None;
    }

    let total_economic_loss: f64 = observations.iter().map(|o| o.economic_loss).sum();
    let total_prevention_cost: f64 = observations.iter().map(|o| o.prevention_cost).sum();
    let mean_severity = mean(observations.iter().map(|o| f64::from(o.severity.value())));

    let towns: BTreeSet<Town> = observations.iter().map(|o| o.town).collect();
    let unaffected_towns = (!selected_towns.is_empty()).then(|| {
        selected_towns
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|town| !towns.contains(town))
            .count()
    });

    Some(KpiSummary {
        observations: observations.len(),
        total_economic_loss,
        total_prevention_cost,
        mean_severity,
        prevention_cost_share_percent: ratio_or_zero(total_prevention_cost, total_economic_loss)
            * 100.0,
        return_ratio: (total_prevention_cost > 0.0)
            .then(|| total_economic_loss / total_prevention_cost),
        prevention_potential: total_economic_loss - total_prevention_cost,
        prevention_efficiency_percent: ratio_or_zero(
            total_economic_loss - total_prevention_cost,
            total_economic_loss,
        ) * 100.0,
        severity_headroom_percent: (1.0 - mean_severity / f64::from(Severity::MAX)) * 100.0,
        affected_towns: towns.len(),
        unaffected_towns,
    })
}

#[derive(Default)]
struct Bucket {
    frequencies: Vec<f64>,
    severities: Vec<f64>,
    economic_loss: f64,
    prevention_cost: f64,
}

impl Bucket {
    fn push(&mut self, obs: &Observation) {
        self.frequencies.push(f64::from(obs.monthly_frequency));
        self.severities.push(f64::from(obs.severity.value()));
        self.economic_loss += obs.economic_loss;
        self.prevention_cost += obs.prevention_cost;
    }
}

fn bucket_by<K: Ord>(
    observations: &[Observation],
    key: impl Fn(&Observation) -> K,
) -> BTreeMap<K, Bucket> {
    let mut buckets: BTreeMap<K, Bucket> = BTreeMap::new();
    for obs in observations {
        buckets.entry(key(obs)).or_default().push(obs);
    }
    buckets
}

/// Per-month means and loss totals, ascending by month.
#[must_use]
pub fn monthly_trend(observations: &[Observation]) -> Vec<MonthlyTrendPoint> {
    bucket_by(observations, Observation::month)
        .into_iter()
        .map(|(month, bucket)| MonthlyTrendPoint {
            month,
            mean_frequency: mean(bucket.frequencies),
            mean_severity: mean(bucket.severities),
            total_economic_loss: bucket.economic_loss,
        })
        .collect()
}

/// Per-town mean severity and loss total, in catalogue order.
#[must_use]
pub fn town_breakdown(observations: &[Observation]) -> Vec<TownStats> {
    bucket_by(observations, |obs| obs.town)
        .into_iter()
        .map(|(town, bucket)| TownStats {
            town,
            mean_severity: mean(bucket.severities),
            total_economic_loss: bucket.economic_loss,
        })
        .collect()
}

/// Per-disease loss against prevention spend.
#[must_use]
pub fn cost_benefit(observations: &[Observation]) -> Vec<CostBenefit> {
    bucket_by(observations, |obs| obs.disease)
        .into_iter()
        .map(|(disease, bucket): (Disease, Bucket)| CostBenefit {
            disease,
            total_economic_loss: bucket.economic_loss,
            total_prevention_cost: bucket.prevention_cost,
            return_ratio: ratio_or_zero(bucket.economic_loss, bucket.prevention_cost),
            efficacy_percent: disease.treatment().map(|advice| advice.efficacy_percent),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pest_map_pest_models::Crop;

    use super::*;
    use crate::test_support::obs;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample() -> Vec<Observation> {
        vec![
            obs(3, Town::Luyang, Disease::BrownRot, 4, 6, 1000.0, 200.0),
            obs(3, Town::Xiatang, Disease::Aphid, 2, 2, 500.0, 100.0),
            obs(4, Town::Luyang, Disease::BrownRot, 3, 4, 600.0, 60.0),
            obs(9, Town::Wawu, Disease::DownyMildew, 1, 1, 100.0, 0.0),
        ]
    }

    #[test]
    fn filter_keeps_dataset_order() {
        let filter = ObservationFilter {
            towns: vec![Town::Luyang, Town::Wawu],
            ..ObservationFilter::default()
        };
        let months: Vec<u32> = filter_observations(&sample(), &filter)
            .iter()
            .map(Observation::month)
            .collect();
        assert_eq!(months, vec![3, 4, 9]);
    }

    #[test]
    fn filter_by_crop() {
        let filter = ObservationFilter {
            crops: vec![Crop::Grape],
            ..ObservationFilter::default()
        };
        let kept = filter_observations(&sample(), &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].disease, Disease::DownyMildew);
    }

    #[test]
    fn summary_of_empty_subset_is_none() {
        assert!(summarize(&[], &[Town::Luyang]).is_none());
    }

    #[test]
    fn summary_headline_figures() {
        let summary = summarize(&sample(), &[Town::Luyang, Town::Yaoshan, Town::Yaoshan]).unwrap();
        assert_eq!(summary.observations, 4);
        assert!(close(summary.total_economic_loss, 2200.0));
        assert!(close(summary.total_prevention_cost, 360.0));
        assert!(close(summary.mean_severity, 2.5));
        assert!(close(summary.prevention_cost_share_percent, 360.0 / 2200.0 * 100.0));
        assert!(close(summary.return_ratio.unwrap(), 2200.0 / 360.0));
        assert!(close(summary.severity_headroom_percent, 50.0));
        assert!(close(summary.prevention_potential, 1840.0));
        assert!(close(summary.prevention_efficiency_percent, 1840.0 / 2200.0 * 100.0));
        assert_eq!(summary.affected_towns, 3);
        assert_eq!(summary.unaffected_towns, Some(1));
    }

    #[test]
    fn summary_guards_zero_cost() {
        let free = vec![obs(1, Town::Luyang, Disease::Aphid, 1, 1, 50.0, 0.0)];
        let summary = summarize(&free, &[]).unwrap();
        assert!(summary.return_ratio.is_none());
        assert!(summary.unaffected_towns.is_none());
        assert!(summary.prevention_cost_share_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn summary_guards_zero_loss() {
        let lossless = vec![obs(2, Town::Wawu, Disease::GrayMold, 1, 1, 0.0, 0.0)];
        let summary = summarize(&lossless, &[]).unwrap();
        assert!(summary.prevention_potential.abs() < f64::EPSILON);
        assert!(summary.prevention_efficiency_percent.abs() < f64::EPSILON);
        assert!(summary.prevention_efficiency_percent.is_finite());
    }

    #[test]
    fn monthly_trend_groups_by_month() {
        let trend = monthly_trend(&sample());
        let months: Vec<u32> = trend.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![3, 4, 9]);

        let march = &trend[0];
        assert!(close(march.mean_frequency, 4.0));
        assert!(close(march.mean_severity, 3.0));
        assert!(close(march.total_economic_loss, 1500.0));
    }

    #[test]
    fn town_breakdown_follows_catalogue_order() {
        let towns = town_breakdown(&sample());
        let order: Vec<Town> = towns.iter().map(|t| t.town).collect();
        assert_eq!(order, vec![Town::Luyang, Town::Xiatang, Town::Wawu]);
        assert!(close(towns[0].mean_severity, 3.5));
        assert!(close(towns[0].total_economic_loss, 1600.0));
    }

    #[test]
    fn cost_benefit_ratios() {
        let rows = cost_benefit(&sample());
        let brown_rot = rows.iter().find(|r| r.disease == Disease::BrownRot).unwrap();
        assert!(close(brown_rot.return_ratio, 1600.0 / 260.0));
        assert_eq!(brown_rot.efficacy_percent, Some(85));

        let downy = rows.iter().find(|r| r.disease == Disease::DownyMildew).unwrap();
        assert!(downy.return_ratio.abs() < f64::EPSILON);
    }
}
