#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static reference tables for the pest map.
//!
//! Defines the townships being monitored, the crops grown there, the
//! pests and diseases that affect each crop, and the 1-5 severity scale.
//! Every table is a `const` lookup on an enum, so the catalogue is
//! immutable and shared process-wide without any initialization.

pub mod treatment;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use treatment::TreatmentAdvice;

/// Severity of an outbreak, from 1 (trace) to 5 (severe).
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
pub enum Severity {
    /// Level 1: isolated symptoms
    Trace = 1,
    /// Level 2: light pressure
    Light = 2,
    /// Level 3: moderate pressure
    Moderate = 3,
    /// Level 4: heavy pressure
    Heavy = 4,
    /// Level 5: severe outbreak
    Severe = 5,
}

impl Severity {
    /// Lowest numeric severity.
    pub const MIN: u8 = 1;
    /// Highest numeric severity.
    pub const MAX: u8 = 5;

    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverityError> {
        match value {
            1 => Ok(Self::Trace),
            2 => Ok(Self::Light),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::Heavy),
            5 => Ok(Self::Severe),
            _ => Err(InvalidSeverityError { value }),
        }
    }

    /// Creates a severity level from any integer, saturating into 1-5.
    #[must_use]
    pub const fn clamped(value: i64) -> Self {
        match value {
            i64::MIN..=1 => Self::Trace,
            2 => Self::Light,
            3 => Self::Moderate,
            4 => Self::Heavy,
            _ => Self::Severe,
        }
    }
}

/// Error returned when attempting to create a [`Severity`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity value {}: expected 1-5", self.value)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Townships of Lushan County covered by the monitoring network.
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
pub enum Town {
    /// Luyang town (county seat)
    Luyang,
    /// Xiatang town
    Xiatang,
    /// Liangwa town
    Liangwa,
    /// Zhangguanying town
    Zhangguanying,
    /// Yaoshan town
    Yaoshan,
    /// Wawu town
    Wawu,
    /// Zhaocun town
    Zhaocun,
    /// Sikeshu township
    Sikeshu,
}

impl Town {
    /// Returns the base `(latitude, longitude)` of the town centre.
    #[must_use]
    pub const fn coordinates(self) -> (f64, f64) {
        match self {
            Self::Luyang => (33.74, 112.82),
            Self::Xiatang => (33.60, 112.75),
            Self::Liangwa => (33.78, 112.93),
            Self::Zhangguanying => (33.68, 113.05),
            Self::Yaoshan => (33.50, 112.58),
            Self::Wawu => (33.70, 112.65),
            Self::Zhaocun => (33.62, 112.60),
            Self::Sikeshu => (33.55, 112.68),
        }
    }

    /// Returns all variants of this enum in catalogue order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Luyang,
            Self::Xiatang,
            Self::Liangwa,
            Self::Zhangguanying,
            Self::Yaoshan,
            Self::Wawu,
            Self::Zhaocun,
            Self::Sikeshu,
        ]
    }
}

/// Fruit crops tracked by the dashboard.
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
pub enum Crop {
    /// Peach
    Peach,
    /// Apple
    Apple,
    /// Grape
    Grape,
    /// Pear
    Pear,
}

impl Crop {
    /// Returns the market value of the crop in yuan per kilogram.
    #[must_use]
    pub const fn unit_value(self) -> f64 {
        match self {
            Self::Peach => 8.5,
            Self::Apple => 6.2,
            Self::Grape => 12.8,
            Self::Pear => 5.6,
        }
    }

    /// Returns the pests and diseases commonly affecting this crop.
    #[must_use]
    pub const fn diseases(self) -> &'static [Disease] {
        match self {
            Self::Peach => &[Disease::BrownRot, Disease::Aphid, Disease::PeachFruitMoth],
            Self::Apple => &[
                Disease::Anthracnose,
                Disease::RedSpiderMite,
                Disease::PowderyMildew,
            ],
            Self::Grape => &[
                Disease::DownyMildew,
                Disease::GrayMold,
                Disease::ClearwingMoth,
            ],
            Self::Pear => &[Disease::PearScab, Disease::PearPsylla, Disease::Aphid],
        }
    }

    /// Returns all variants of this enum in catalogue order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Peach, Self::Apple, Self::Grape, Self::Pear]
    }
}

/// Pests and diseases observed across the tracked crops.
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
pub enum Disease {
    // ── Peach ───────────────────────────────────────────
    /// Brown rot (Monilinia)
    BrownRot,
    /// Aphids (peach and pear)
    Aphid,
    /// Peach fruit moth
    PeachFruitMoth,

    // ── Apple ───────────────────────────────────────────
    /// Anthracnose (bitter rot)
    Anthracnose,
    /// Red spider mite
    RedSpiderMite,
    /// Powdery mildew
    PowderyMildew,

    // ── Grape ───────────────────────────────────────────
    /// Downy mildew
    DownyMildew,
    /// Gray mold (Botrytis)
    GrayMold,
    /// Grape clearwing moth
    ClearwingMoth,

    // ── Pear ────────────────────────────────────────────
    /// Pear scab
    PearScab,
    /// Pear psylla
    PearPsylla,
}

impl Disease {
    /// Returns every crop whose disease list contains this disease.
    #[must_use]
    pub const fn crops(self) -> &'static [Crop] {
        match self {
            Self::BrownRot | Self::PeachFruitMoth => &[Crop::Peach],
            Self::Aphid => &[Crop::Peach, Crop::Pear],
            Self::Anthracnose | Self::RedSpiderMite | Self::PowderyMildew => &[Crop::Apple],
            Self::DownyMildew | Self::GrayMold | Self::ClearwingMoth => &[Crop::Grape],
            Self::PearScab | Self::PearPsylla => &[Crop::Pear],
        }
    }

    /// Returns the treatment advice for this disease, if catalogued.
    #[must_use]
    pub const fn treatment(self) -> Option<&'static TreatmentAdvice> {
        treatment::lookup(self)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::BrownRot,
            Self::Aphid,
            Self::PeachFruitMoth,
            Self::Anthracnose,
            Self::RedSpiderMite,
            Self::PowderyMildew,
            Self::DownyMildew,
            Self::GrayMold,
            Self::ClearwingMoth,
            Self::PearScab,
            Self::PearPsylla,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disease_crop_consistency() {
        for disease in Disease::all() {
            let crops = disease.crops();
            assert!(!crops.is_empty(), "{disease:?} belongs to no crop");
            for crop in crops {
                assert!(
                    crop.diseases().contains(disease),
                    "{disease:?} claims crop {crop:?} but isn't in its disease list"
                );
            }
        }
    }

    #[test]
    fn crop_disease_lists_point_back_to_the_crop() {
        for crop in Crop::all() {
            for disease in crop.diseases() {
                assert!(
                    disease.crops().contains(crop),
                    "{crop:?} lists {disease:?} but the disease doesn't list the crop"
                );
            }
        }
    }

    #[test]
    fn every_crop_has_at_least_three_diseases() {
        for crop in Crop::all() {
            assert!(crop.diseases().len() >= 3, "{crop:?} has too few diseases");
        }
    }

    #[test]
    fn aphid_is_shared_by_peach_and_pear() {
        assert_eq!(Disease::Aphid.crops(), &[Crop::Peach, Crop::Pear]);
    }

    #[test]
    fn severity_from_value_roundtrip() {
        for v in 1..=5u8 {
            let severity = Severity::from_value(v).unwrap();
            assert_eq!(severity.value(), v);
        }
        assert!(Severity::from_value(0).is_err());
        assert!(Severity::from_value(6).is_err());
    }

    #[test]
    fn severity_clamped_saturates() {
        assert_eq!(Severity::clamped(-3), Severity::Trace);
        assert_eq!(Severity::clamped(0), Severity::Trace);
        assert_eq!(Severity::clamped(3), Severity::Moderate);
        assert_eq!(Severity::clamped(4), Severity::Heavy);
        assert_eq!(Severity::clamped(9), Severity::Severe);
    }

    #[test]
    fn names_parse_in_screaming_snake_case() {
        assert_eq!("PEACH_FRUIT_MOTH".parse::<Disease>().unwrap(), Disease::PeachFruitMoth);
        assert_eq!("ZHANGGUANYING".parse::<Town>().unwrap(), Town::Zhangguanying);
        assert_eq!(Crop::Grape.to_string(), "GRAPE");
        assert!("peach".parse::<Crop>().is_err());
    }
}
