//! Default glucose range profile and range labels

use serde::{Deserialize, Serialize};

use crate::classify::{BgBounds, BgClass};
use crate::error::BgError;
use crate::units::BgUnit;

/// Stored mmol/L values come back to mg/dL with float drift (180 is stored as 9.99135 and
/// reads back as 180.0000651465), so mg/dL class boundaries are widened by this much.
pub const MGDL_ROUNDING_ALLOWANCE: f64 = 0.0001;

/// Default band boundaries for a display unit
pub fn default_bg_bounds(bg_unit: BgUnit) -> BgBounds {
    match bg_unit {
        BgUnit::MilligramPerDeciliter => BgBounds::new(54.0, 70.0, 180.0, 250.0),
        BgUnit::MmolPerLiter => BgBounds::new(3.0, 3.9, 10.0, 13.9),
    }
}

/// Upper edge of the very-high band; readings above it are clamped by meters
pub fn bg_clamp_threshold(bg_unit: BgUnit) -> f64 {
    match bg_unit {
        BgUnit::MilligramPerDeciliter => 600.0,
        BgUnit::MmolPerLiter => 33.3,
    }
}

/// Upper boundary of each glucose band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgClasses {
    pub very_low: f64,
    pub low: f64,
    pub target: f64,
    pub high: f64,
    pub very_high: f64,
}

impl BgClasses {
    /// Widen mg/dL boundaries outward to absorb conversion drift. mmol/L is left as is.
    pub fn with_rounding_allowance(self, bg_unit: BgUnit) -> Self {
        match bg_unit {
            BgUnit::MilligramPerDeciliter => Self {
                very_low: self.very_low - MGDL_ROUNDING_ALLOWANCE,
                low: self.low - MGDL_ROUNDING_ALLOWANCE,
                target: self.target + MGDL_ROUNDING_ALLOWANCE,
                high: self.high + MGDL_ROUNDING_ALLOWANCE,
                very_high: self.very_high,
            },
            BgUnit::MmolPerLiter => self,
        }
    }
}

/// Default band boundaries in the tideline shape
pub fn default_bg_classes(bg_unit: BgUnit) -> BgClasses {
    let bounds = default_bg_bounds(bg_unit);
    BgClasses {
        very_low: bounds.very_low_threshold.unwrap_or_default(),
        low: bounds.target_lower_bound.unwrap_or_default(),
        target: bounds.target_upper_bound.unwrap_or_default(),
        high: bounds.very_high_threshold.unwrap_or_default(),
        very_high: bg_clamp_threshold(bg_unit),
    }
}

impl From<BgClasses> for BgBounds {
    fn from(classes: BgClasses) -> Self {
        BgBounds::new(classes.very_low, classes.low, classes.target, classes.high)
    }
}

/// Glucose display preferences handed to a range profile editor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgPrefs {
    pub bg_unit: BgUnit,
    pub bg_classes: BgClasses,
    pub bg_bounds: BgBounds,
}

impl BgPrefs {
    pub fn for_unit(bg_unit: BgUnit) -> Self {
        let bg_classes = default_bg_classes(bg_unit);
        Self {
            bg_unit,
            bg_classes,
            bg_bounds: BgBounds::from(bg_classes),
        }
    }
}

/// Human readable label for each five-way class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgRangeLabels {
    pub very_low: String,
    pub low: String,
    pub target: String,
    pub high: String,
    pub very_high: String,
}

impl BgRangeLabels {
    pub fn get(&self, class: BgClass) -> &str {
        match class {
            BgClass::VeryLow => &self.very_low,
            BgClass::Low => &self.low,
            BgClass::Target => &self.target,
            BgClass::High => &self.high,
            BgClass::VeryHigh => &self.very_high,
        }
    }
}

/// Build range labels ("between 70 - 180 mg/dL", or "70-180" when condensed)
pub fn generate_bg_range_labels(
    bg_bounds: &BgBounds,
    bg_unit: BgUnit,
    condensed: bool,
) -> Result<BgRangeLabels, BgError> {
    let (lower, upper) = bg_bounds.target()?;
    let very_low = bg_bounds.very_low_threshold.ok_or(BgError::InvalidBounds)?;
    let very_high = bg_bounds.very_high_threshold.ok_or(BgError::InvalidBounds)?;

    let vl = bg_unit.format_value(very_low);
    let tl = bg_unit.format_value(lower);
    let tu = bg_unit.format_value(upper);
    let vh = bg_unit.format_value(very_high);

    let labels = if condensed {
        BgRangeLabels {
            very_low: format!("<{}", vl),
            low: format!("{}-{}", vl, tl),
            target: format!("{}-{}", tl, tu),
            high: format!("{}-{}", tu, vh),
            very_high: format!(">{}", vh),
        }
    } else {
        let unit = bg_unit.label();
        BgRangeLabels {
            very_low: format!("below {} {}", vl, unit),
            low: format!("between {} - {} {}", vl, tl, unit),
            target: format!("between {} - {} {}", tl, tu, unit),
            high: format!("between {} - {} {}", tu, vh, unit),
            very_high: format!("above {} {}", vh, unit),
        }
    };

    Ok(labels)
}
