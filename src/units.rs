//! Glucose units and mg/dL <-> mmol/L conversion
//!
//! Conversion uses the molar mass of glucose. Rounding follows each unit's clinical
//! convention: mmol/L values keep one decimal, mg/dL values are whole numbers. A round trip
//! is therefore lossy and must never be assumed to be the identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BgError;

/// Milligrams per deciliter in one millimole per liter of glucose
pub const MGDL_PER_MMOLL: f64 = 18.01577;

/// Unit tagging every blood glucose value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BgUnit {
    #[serde(rename = "mg/dL")]
    #[default]
    MilligramPerDeciliter,
    #[serde(rename = "mmol/L")]
    MmolPerLiter,
}

impl BgUnit {
    /// Get the unit label
    pub fn label(self) -> &'static str {
        match self {
            BgUnit::MilligramPerDeciliter => "mg/dL",
            BgUnit::MmolPerLiter => "mmol/L",
        }
    }

    /// The unit a value is converted into
    pub fn other(self) -> BgUnit {
        match self {
            BgUnit::MilligramPerDeciliter => BgUnit::MmolPerLiter,
            BgUnit::MmolPerLiter => BgUnit::MilligramPerDeciliter,
        }
    }

    /// Format a value without unit suffix, at the unit's display precision
    pub fn format_value(self, value: f64) -> String {
        match self {
            BgUnit::MilligramPerDeciliter => format!("{:.0}", value),
            BgUnit::MmolPerLiter => format!("{:.1}", value),
        }
    }

    /// Format a value with unit suffix
    pub fn format(self, value: f64) -> String {
        format!("{} {}", self.format_value(value), self.label())
    }
}

impl fmt::Display for BgUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BgUnit {
    type Err = BgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mg/dl" | "mgdl" => Ok(BgUnit::MilligramPerDeciliter),
            "mmol/l" | "mmoll" => Ok(BgUnit::MmolPerLiter),
            _ => Err(BgError::InvalidUnit(s.to_string())),
        }
    }
}

/// Round to a fixed number of decimals
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Convert a value expressed in `current_unit` into the other unit.
///
/// mg/dL input yields mmol/L rounded to one decimal; mmol/L input yields a whole mg/dL value.
pub fn convert_bg(value: f64, current_unit: BgUnit) -> Result<f64, BgError> {
    if value.is_nan() || value < 0.0 {
        return Err(BgError::InvalidValue(value));
    }
    let converted = match current_unit {
        BgUnit::MilligramPerDeciliter => round_to(value / MGDL_PER_MMOLL, 1),
        BgUnit::MmolPerLiter => round_to(value * MGDL_PER_MMOLL, 0),
    };
    Ok(converted)
}

/// Convert a value into the other unit and reparse it at that unit's display precision,
/// so no float drift survives an edit round trip.
pub fn convert_and_format(value: f64, current_unit: BgUnit) -> Result<f64, BgError> {
    let target = current_unit.other();
    let converted = convert_bg(value, current_unit)?;
    target
        .format_value(converted)
        .parse::<f64>()
        .map_err(|_| BgError::InvalidValue(converted))
}

/// Express `value` in `target_unit`, leaving it untouched when no conversion is needed
pub fn convert_if_needed(value: f64, current_unit: BgUnit, target_unit: BgUnit) -> Result<f64, BgError> {
    if current_unit == target_unit {
        return Ok(value);
    }
    convert_and_format(value, current_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_conversions() {
        let mmol = convert_bg(180.0, BgUnit::MilligramPerDeciliter).unwrap();
        assert!((mmol - 10.0).abs() < 1e-9);

        let mgdl = convert_bg(10.0, BgUnit::MmolPerLiter).unwrap();
        assert!((mgdl - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounding_precision() {
        // 179 / 18.01577 = 9.9357...
        assert_eq!(convert_bg(179.0, BgUnit::MilligramPerDeciliter).unwrap(), 9.9);
        // 9.9 * 18.01577 = 178.356...
        assert_eq!(convert_bg(9.9, BgUnit::MmolPerLiter).unwrap(), 178.0);
        assert_eq!(convert_bg(0.0, BgUnit::MmolPerLiter).unwrap(), 0.0);
    }

    #[test]
    fn test_negative_value_rejected() {
        assert!(matches!(
            convert_bg(-1.0, BgUnit::MilligramPerDeciliter),
            Err(BgError::InvalidValue(_))
        ));
        assert!(convert_bg(f64::NAN, BgUnit::MmolPerLiter).is_err());
    }

    #[test]
    fn test_round_trip_drift_is_bounded() {
        for v in 1..=600u32 {
            let v = v as f64;
            let mmol = convert_bg(v, BgUnit::MilligramPerDeciliter).unwrap();
            let back = convert_bg(mmol, BgUnit::MmolPerLiter).unwrap();
            assert!((back - v).abs() <= 1.0, "{} came back as {}", v, back);
        }
    }

    #[test]
    fn test_convert_if_needed() {
        assert_eq!(convert_if_needed(1.1, BgUnit::MilligramPerDeciliter, BgUnit::MilligramPerDeciliter).unwrap(), 1.1);
        assert_eq!(convert_if_needed(1.1, BgUnit::MmolPerLiter, BgUnit::MmolPerLiter).unwrap(), 1.1);
        assert_eq!(convert_if_needed(179.0, BgUnit::MilligramPerDeciliter, BgUnit::MmolPerLiter).unwrap(), 9.9);
        assert_eq!(convert_if_needed(9.9, BgUnit::MmolPerLiter, BgUnit::MilligramPerDeciliter).unwrap(), 178.0);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("mg/dL".parse::<BgUnit>().unwrap(), BgUnit::MilligramPerDeciliter);
        assert_eq!("MMOL/L".parse::<BgUnit>().unwrap(), BgUnit::MmolPerLiter);
        assert!(matches!("mmHg".parse::<BgUnit>(), Err(BgError::InvalidUnit(_))));
    }

    #[test]
    fn test_unit_formatting() {
        assert_eq!(BgUnit::MilligramPerDeciliter.format(180.0), "180 mg/dL");
        assert_eq!(BgUnit::MmolPerLiter.format(10.0), "10.0 mmol/L");
        assert_eq!(serde_json::to_string(&BgUnit::MmolPerLiter).unwrap(), "\"mmol/L\"");
    }
}
