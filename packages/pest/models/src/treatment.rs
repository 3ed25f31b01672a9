//! Treatment advice catalogue.
//!
//! Field-tested control measures collected from growers in the county,
//! keyed by [`Disease`]. Diseases without an entry have no local data yet.

use serde::Serialize;

use crate::Disease;

/// Control guidance for a single pest or disease.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentAdvice {
    /// Visible symptoms used for field identification.
    pub symptoms: &'static str,
    /// Control measures used by local growers.
    pub field_practice: &'static str,
    /// Data-driven recommended approach.
    pub recommended_approach: &'static str,
    /// Control cost band per mu.
    pub cost_band: &'static str,
    /// Observed control efficacy in percent.
    pub efficacy_percent: u8,
    /// Return on control spend, as `x` in `x:1`.
    pub return_ratio: f64,
    /// Environmental friendliness, 1-5 stars.
    pub eco_stars: u8,
}

const BROWN_ROT: TreatmentAdvice = TreatmentAdvice {
    symptoms: "Brown rot on the fruit with a grey mould layer on the surface",
    field_practice: "1. Clear the orchard in winter and burn infected fruit; \
                     2. Spray 50% carbendazim at 1:500 during bloom; \
                     3. Bag fruit as it ripens (proven by Luyang growers)",
    recommended_approach: "Preventive spraying before the March-April bloom, \
                           historically 35% more effective",
    cost_band: "Medium (200-300 yuan/mu)",
    efficacy_percent: 85,
    return_ratio: 3.2,
    eco_stars: 3,
};

const APHID: TreatmentAdvice = TreatmentAdvice {
    symptoms: "Curled leaves with insects clustered on the underside",
    field_practice: "1. Yellow sticky traps; \
                     2. Release ladybird predators; \
                     3. During outbreaks spray 10% imidacloprid at 1:2000 \
                     (recommended by Xiatang peach growers)",
    recommended_approach: "Monitoring combined with biological control, \
                           cutting chemical pesticide use by 40%",
    cost_band: "Low (100-150 yuan/mu)",
    efficacy_percent: 92,
    return_ratio: 4.5,
    eco_stars: 4,
};

const PEACH_FRUIT_MOTH: TreatmentAdvice = TreatmentAdvice {
    symptoms: "Pinholes on the fruit surface with larval tunnels in the flesh",
    field_practice: "1. Mulch film on the ground to stop adults emerging; \
                     2. Pheromone traps for males; \
                     3. Spray 20% chlorantraniliprole at egg stage \
                     (Zhangguanying practice)",
    recommended_approach: "Pheromone mating disruption with predicted spray timing",
    cost_band: "Medium-high (300-400 yuan/mu)",
    efficacy_percent: 88,
    return_ratio: 2.8,
    eco_stars: 4,
};

const ANTHRACNOSE: TreatmentAdvice = TreatmentAdvice {
    symptoms: "Sunken brown spots on the fruit ringed with small black dots",
    field_practice: "1. Remove infected fruit promptly; \
                     2. Spray 70% thiophanate-methyl at 1:800 before the rainy season; \
                     3. Add organic fertiliser to raise resistance (Yaoshan apple orchards)",
    recommended_approach: "Weather-driven early warning issued 7 days ahead",
    cost_band: "Medium (180-250 yuan/mu)",
    efficacy_percent: 90,
    return_ratio: 3.5,
    eco_stars: 3,
};

const DOWNY_MILDEW: TreatmentAdvice = TreatmentAdvice {
    symptoms: "White mould on the leaf underside with yellowing above",
    field_practice: "1. Prune to keep the canopy ventilated; \
                     2. Spray 58% metalaxyl-mancozeb at 1:500 at first symptoms; \
                     3. Avoid evening irrigation (Wawu vineyards)",
    recommended_approach: "Microclimate monitoring with precision spraying, \
                           cutting dosage by 30%",
    cost_band: "Medium (220-280 yuan/mu)",
    efficacy_percent: 87,
    return_ratio: 3.0,
    eco_stars: 4,
};

pub(crate) const fn lookup(disease: Disease) -> Option<&'static TreatmentAdvice> {
    match disease {
        Disease::BrownRot => Some(&BROWN_ROT),
        Disease::Aphid => Some(&APHID),
        Disease::PeachFruitMoth => Some(&PEACH_FRUIT_MOTH),
        Disease::Anthracnose => Some(&ANTHRACNOSE),
        Disease::DownyMildew => Some(&DOWNY_MILDEW),
        Disease::RedSpiderMite
        | Disease::PowderyMildew
        | Disease::GrayMold
        | Disease::ClearwingMoth
        | Disease::PearScab
        | Disease::PearPsylla => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogued_entries_are_in_range() {
        for disease in Disease::all() {
            if let Some(advice) = disease.treatment() {
                assert!(advice.efficacy_percent <= 100, "{disease:?}");
                assert!((1..=5).contains(&advice.eco_stars), "{disease:?}");
                assert!(advice.return_ratio > 0.0, "{disease:?}");
            }
        }
    }

    #[test]
    fn uncatalogued_disease_has_no_advice() {
        assert!(Disease::PearScab.treatment().is_none());
        assert_eq!(Disease::Aphid.treatment().map(|a| a.efficacy_percent), Some(92));
    }
}
