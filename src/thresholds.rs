//! Monitoring alert threshold tables and field validation
//!
//! The editable alarm boundaries and their defaults are maintained once, in mg/dL. The
//! mmol/L tables are always derived from them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BgError;
use crate::units::{convert_bg, round_to, BgUnit};

/// Accepted text of a mmol/L field: optional digits, optional separator, at most one decimal
static MMOLL_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d*[.,]?\d?$").expect("mmol/L field pattern compiles")
});

/// Minimum and maximum accepted values for each editable alarm boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub min_high_bg: f64,
    pub max_high_bg: f64,
    pub min_very_low_bg: f64,
    pub max_very_low_bg: f64,
    pub min_low_bg: f64,
    pub max_low_bg: f64,
}

impl Thresholds {
    pub const MGDL: Thresholds = Thresholds {
        min_high_bg: 140.0,
        max_high_bg: 250.0,
        min_very_low_bg: 40.0,
        max_very_low_bg: 90.0,
        min_low_bg: 50.0,
        max_low_bg: 100.0,
    };

    fn to_mmol(self) -> Result<Self, BgError> {
        Ok(Self {
            min_high_bg: mgdl_to_mmol(self.min_high_bg)?,
            max_high_bg: mgdl_to_mmol(self.max_high_bg)?,
            min_very_low_bg: mgdl_to_mmol(self.min_very_low_bg)?,
            max_very_low_bg: mgdl_to_mmol(self.max_very_low_bg)?,
            min_low_bg: mgdl_to_mmol(self.min_low_bg)?,
            max_low_bg: mgdl_to_mmol(self.max_low_bg)?,
        })
    }
}

/// Default values used to pre-populate a new alarm configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgValues {
    pub high_bg_default: f64,
    pub low_bg_default: f64,
    pub very_low_bg_default: f64,
    /// Percentage of time out of range
    pub out_of_range_threshold_default: u32,
    /// Percentage of missing data transmission
    pub non_data_tx_threshold_default: u32,
    /// Percentage of time in hypoglycemia
    pub hypo_threshold_default: u32,
    /// Hours
    pub reporting_period_default: u32,
}

impl BgValues {
    pub const MGDL: BgValues = BgValues {
        high_bg_default: 180.0,
        low_bg_default: 70.0,
        very_low_bg_default: 54.0,
        out_of_range_threshold_default: 50,
        non_data_tx_threshold_default: 50,
        hypo_threshold_default: 5,
        reporting_period_default: 7 * 24,
    };

    fn to_mmol(self) -> Result<Self, BgError> {
        Ok(Self {
            high_bg_default: mgdl_to_mmol(self.high_bg_default)?,
            low_bg_default: mgdl_to_mmol(self.low_bg_default)?,
            very_low_bg_default: mgdl_to_mmol(self.very_low_bg_default)?,
            ..self
        })
    }
}

fn mgdl_to_mmol(value: f64) -> Result<f64, BgError> {
    Ok(round_to(convert_bg(value, BgUnit::MilligramPerDeciliter)?, 1))
}

/// Alarm boundary limits expressed in `bg_unit`
pub fn build_thresholds(bg_unit: BgUnit) -> Result<Thresholds, BgError> {
    match bg_unit {
        BgUnit::MilligramPerDeciliter => Ok(Thresholds::MGDL),
        BgUnit::MmolPerLiter => Thresholds::MGDL.to_mmol(),
    }
}

/// Alarm defaults expressed in `bg_unit`; percentages and periods are unit independent
pub fn build_bg_values(bg_unit: BgUnit) -> Result<BgValues, BgError> {
    match bg_unit {
        BgUnit::MilligramPerDeciliter => Ok(BgValues::MGDL),
        BgUnit::MmolPerLiter => BgValues::MGDL.to_mmol(),
    }
}

/// Validation failure of an alarm field. `key()` is the translation key callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "key", rename_all = "kebab-case")]
pub enum FieldError {
    MandatoryInteger,
    MandatoryRange { low: f64, high: f64 },
    MandatoryFloatNumber,
}

impl FieldError {
    pub fn key(&self) -> &'static str {
        match self {
            FieldError::MandatoryInteger => "mandatory-integer",
            FieldError::MandatoryRange { .. } => "mandatory-range",
            FieldError::MandatoryFloatNumber => "mandatory-float-number",
        }
    }
}

/// Validate an alarm field value against its accepted range.
///
/// Checks run in a fixed order: integer (mg/dL), range, then decimal format (mmol/L).
pub fn get_error_message(bg_unit: BgUnit, value: f64, low_value: f64, high_value: f64) -> Option<FieldError> {
    if bg_unit == BgUnit::MilligramPerDeciliter && value.fract() != 0.0 {
        return Some(FieldError::MandatoryInteger);
    }
    // NaN fails neither comparison and falls through to the format check
    if value < low_value || value > high_value {
        return Some(FieldError::MandatoryRange {
            low: low_value,
            high: high_value,
        });
    }
    if bg_unit == BgUnit::MmolPerLiter && !MMOLL_FIELD.is_match(&value.to_string()) {
        return Some(FieldError::MandatoryFloatNumber);
    }
    None
}
