//! Blood glucose classification into clinical bands
//!
//! Values are classified against a [`BgBounds`] threshold set, either three-way
//! (low / target / high) or five-way (adding very low and very high).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BgError;

/// Boundaries between glucose bands, all in the same unit.
///
/// Expected ordering: `very_low_threshold <= target_lower_bound <= target_upper_bound <= very_high_threshold`.
/// The target bounds are mandatory for classification; a missing extreme threshold simply
/// removes the corresponding band from five-way classification.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgBounds {
    #[serde(default)]
    pub very_low_threshold: Option<f64>,
    #[serde(default)]
    pub target_lower_bound: Option<f64>,
    #[serde(default)]
    pub target_upper_bound: Option<f64>,
    #[serde(default)]
    pub very_high_threshold: Option<f64>,
}

impl BgBounds {
    pub fn new(very_low: f64, target_lower: f64, target_upper: f64, very_high: f64) -> Self {
        Self {
            very_low_threshold: Some(very_low),
            target_lower_bound: Some(target_lower),
            target_upper_bound: Some(target_upper),
            very_high_threshold: Some(very_high),
        }
    }

    /// Bounds with only the target range set (enough for three-way classification)
    pub fn target_range(target_lower: f64, target_upper: f64) -> Self {
        Self {
            target_lower_bound: Some(target_lower),
            target_upper_bound: Some(target_upper),
            ..Self::default()
        }
    }

    /// The numeric target range, or an error when either bound is missing
    pub fn target(&self) -> Result<(f64, f64), BgError> {
        match (self.target_lower_bound, self.target_upper_bound) {
            (Some(lower), Some(upper)) if lower.is_finite() && upper.is_finite() => Ok((lower, upper)),
            _ => Err(BgError::InvalidBounds),
        }
    }

    /// Check that every present threshold respects the band ordering
    pub fn is_ordered(&self) -> bool {
        let present: Vec<f64> = [
            self.very_low_threshold,
            self.target_lower_bound,
            self.target_upper_bound,
            self.very_high_threshold,
        ]
        .into_iter()
        .flatten()
        .collect();

        present.iter().all(|v| v.is_finite()) && present.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Classification of a glucose value, ordered from lowest to highest band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BgClass {
    VeryLow,
    Low,
    Target,
    High,
    VeryHigh,
}

impl BgClass {
    /// All classes of the five-way scale, lowest first
    pub const ALL: [BgClass; 5] = [
        BgClass::VeryLow,
        BgClass::Low,
        BgClass::Target,
        BgClass::High,
        BgClass::VeryHigh,
    ];

    /// Key used by callers and serialized payloads
    pub fn as_str(self) -> &'static str {
        match self {
            BgClass::VeryLow => "veryLow",
            BgClass::Low => "low",
            BgClass::Target => "target",
            BgClass::High => "high",
            BgClass::VeryHigh => "veryHigh",
        }
    }

    /// Get a display label for the class
    pub fn label(self) -> &'static str {
        match self {
            BgClass::VeryLow => "Very Low",
            BgClass::Low => "Low",
            BgClass::Target => "In Range",
            BgClass::High => "High",
            BgClass::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for BgClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity of the classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassificationType {
    #[default]
    ThreeWay,
    FiveWay,
}

impl FromStr for ClassificationType {
    type Err = BgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "three-way" | "threeway" | "3" => Ok(ClassificationType::ThreeWay),
            "five-way" | "fiveway" | "5" => Ok(ClassificationType::FiveWay),
            _ => Err(BgError::InvalidClassification(s.to_string())),
        }
    }
}

/// Classify a glucose value.
///
/// Target bounds are inclusive. In five-way mode the bands are evaluated as a cascade, so a
/// value equal to the very-low threshold is `Low` and one equal to the very-high threshold is
/// `High`.
pub fn get_bg_class(
    bg_bounds: &BgBounds,
    bg_value: f64,
    classification_type: ClassificationType,
) -> Result<BgClass, BgError> {
    let (target_lower, target_upper) = bg_bounds.target()?;
    if bg_value.is_nan() || bg_value <= 0.0 {
        return Err(BgError::NonPositiveValue);
    }

    let class = match classification_type {
        ClassificationType::FiveWay => {
            let very_low = bg_bounds.very_low_threshold;
            let very_high = bg_bounds.very_high_threshold;

            if very_low.is_some_and(|t| bg_value < t) {
                BgClass::VeryLow
            } else if very_low.map_or(true, |t| bg_value >= t) && bg_value < target_lower {
                BgClass::Low
            } else if bg_value > target_upper && very_high.map_or(true, |t| bg_value <= t) {
                BgClass::High
            } else if very_high.is_some_and(|t| bg_value > t) {
                BgClass::VeryHigh
            } else {
                BgClass::Target
            }
        }
        ClassificationType::ThreeWay => {
            if bg_value < target_lower {
                BgClass::Low
            } else if bg_value > target_upper {
                BgClass::High
            } else {
                BgClass::Target
            }
        }
    };

    Ok(class)
}
