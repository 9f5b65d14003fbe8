//! Glycemia statistics over a series of glucose values
//!
//! Time in range classifies every value five-way against the same bounds, in the unit the
//! bounds are expressed in. The variability metrics need at least
//! [`MIN_READINGS_FOR_VARIABILITY`] readings and report `insufficient_data` otherwise.

use serde::{Deserialize, Serialize};

use crate::classify::{get_bg_class, BgBounds, BgClass, ClassificationType};
use crate::error::BgError;
use crate::units::{convert_bg, BgUnit};

/// Tight range, 70-140 mg/dL
pub const TIGHT_RANGE_MGDL: (f64, f64) = (70.0, 140.0);

pub const MIN_READINGS_FOR_VARIABILITY: usize = 3;

/// Time-in-range statistics (standard diabetes metric)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInRange {
    pub total: usize,
    pub very_low: usize,
    pub low: usize,
    pub target: usize,
    pub high: usize,
    pub very_high: usize,
}

impl TimeInRange {
    /// Count values per five-way class
    pub fn from_values(values: &[f64], bg_bounds: &BgBounds) -> Result<Self, BgError> {
        let mut tir = Self {
            total: values.len(),
            ..Self::default()
        };

        for &v in values {
            match get_bg_class(bg_bounds, v, ClassificationType::FiveWay)? {
                BgClass::VeryLow => tir.very_low += 1,
                BgClass::Low => tir.low += 1,
                BgClass::Target => tir.target += 1,
                BgClass::High => tir.high += 1,
                BgClass::VeryHigh => tir.very_high += 1,
            }
        }

        Ok(tir)
    }

    pub fn count(&self, class: BgClass) -> usize {
        match class {
            BgClass::VeryLow => self.very_low,
            BgClass::Low => self.low,
            BgClass::Target => self.target,
            BgClass::High => self.high,
            BgClass::VeryHigh => self.very_high,
        }
    }

    /// Get percentage for a given class
    pub fn percentage(&self, class: BgClass) -> f64 {
        percent_of(self.count(class), self.total)
    }

    /// Get low percentage (combined very low + low)
    pub fn low_percent(&self) -> f64 {
        percent_of(self.very_low + self.low, self.total)
    }

    pub fn in_range_percent(&self) -> f64 {
        self.percentage(BgClass::Target)
    }

    /// Get high percentage (combined high + very high)
    pub fn high_percent(&self) -> f64 {
        percent_of(self.high + self.very_high, self.total)
    }
}

fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// Fraction (0.0 to 1.0) of values in each five-way class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgPercentInCategories {
    pub very_low: f64,
    pub low: f64,
    pub target: f64,
    pub high: f64,
    pub very_high: f64,
}

/// Share of values per class; an empty series yields all zeros
pub fn calc_bg_percent_in_categories(values: &[f64], bg_bounds: &BgBounds) -> Result<BgPercentInCategories, BgError> {
    let tir = TimeInRange::from_values(values, bg_bounds)?;
    let fraction = |class| percent_of(tir.count(class), tir.total) / 100.0;

    Ok(BgPercentInCategories {
        very_low: fraction(BgClass::VeryLow),
        low: fraction(BgClass::Low),
        target: fraction(BgClass::Target),
        high: fraction(BgClass::High),
        very_high: fraction(BgClass::VeryHigh),
    })
}

/// Readings inside the tight range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInTightRange {
    pub value: usize,
    pub total: usize,
}

impl TimeInTightRange {
    /// Count values inside the tight range, converted to `bg_unit`
    pub fn from_values(values: &[f64], bg_unit: BgUnit) -> Result<Self, BgError> {
        let (lower, upper) = tight_range(bg_unit)?;
        let value = values.iter().filter(|&&v| v >= lower && v <= upper).count();
        Ok(Self {
            value,
            total: values.len(),
        })
    }

    pub fn percent(&self) -> f64 {
        percent_of(self.value, self.total)
    }
}

/// Tight range bounds in `bg_unit`
pub fn tight_range(bg_unit: BgUnit) -> Result<(f64, f64), BgError> {
    let (lower, upper) = TIGHT_RANGE_MGDL;
    match bg_unit {
        BgUnit::MilligramPerDeciliter => Ok((lower, upper)),
        BgUnit::MmolPerLiter => Ok((
            convert_bg(lower, BgUnit::MilligramPerDeciliter)?,
            convert_bg(upper, BgUnit::MilligramPerDeciliter)?,
        )),
    }
}

/// Mean glucose; `None` for an empty series
pub fn average_glucose(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
fn calculate_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance: f64 = values.iter()
        .map(|&v| (v - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardDeviation {
    pub average_glucose: Option<f64>,
    pub standard_deviation: Option<f64>,
    pub insufficient_data: bool,
    pub total: usize,
}

impl StandardDeviation {
    pub fn from_values(values: &[f64]) -> Self {
        let average = average_glucose(values);
        let standard_deviation = match average {
            Some(mean) if values.len() >= MIN_READINGS_FOR_VARIABILITY => Some(calculate_std_dev(values, mean)),
            _ => None,
        };

        Self {
            average_glucose: average,
            standard_deviation,
            insufficient_data: standard_deviation.is_none(),
            total: values.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoefficientOfVariation {
    /// Percent
    pub coefficient_of_variation: Option<f64>,
    pub insufficient_data: bool,
    pub total: usize,
}

impl CoefficientOfVariation {
    /// Mean of the daily coefficients of variation.
    ///
    /// `days` holds one series per day; days with fewer than three readings are skipped.
    pub fn from_days<D: AsRef<[f64]>>(days: &[D]) -> Self {
        let total: usize = days.iter().map(|d| d.as_ref().len()).sum();

        let daily: Vec<f64> = if total < MIN_READINGS_FOR_VARIABILITY {
            Vec::new()
        } else {
            days.iter()
                .map(AsRef::as_ref)
                .filter(|d| d.len() >= MIN_READINGS_FOR_VARIABILITY)
                .filter_map(|d| {
                    let mean = average_glucose(d)?;
                    Some(calculate_std_dev(d, mean) / mean * 100.0)
                })
                .collect()
        };
        let coefficient_of_variation = average_glucose(&daily);

        Self {
            coefficient_of_variation,
            insufficient_data: coefficient_of_variation.is_none(),
            total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseManagementIndicator {
    /// Estimated HbA1c, percent
    pub glucose_management_indicator: Option<f64>,
    pub insufficient_data: bool,
}

impl GlucoseManagementIndicator {
    /// GMI = 3.31 + 0.02392 * mean glucose in mg/dL (Bergenstal et al., 2018)
    pub fn from_values(values: &[f64], bg_unit: BgUnit) -> Result<Self, BgError> {
        let gmi = match average_glucose(values) {
            Some(average) => {
                let average_mgdl = match bg_unit {
                    BgUnit::MilligramPerDeciliter => average,
                    BgUnit::MmolPerLiter => convert_bg(average, BgUnit::MmolPerLiter)?,
                };
                Some(3.31 + 0.02392 * average_mgdl)
            }
            None => None,
        };

        Ok(Self {
            glucose_management_indicator: gmi,
            insufficient_data: gmi.is_none(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> BgBounds {
        BgBounds::new(54.0, 70.0, 180.0, 250.0)
    }

    #[test]
    fn test_time_in_range() {
        let values = vec![50.0, 65.0, 100.0, 150.0, 200.0, 300.0];
        let tir = TimeInRange::from_values(&values, &bounds()).unwrap();
        assert_eq!(tir.total, 6);
        assert_eq!(tir.very_low, 1);
        assert_eq!(tir.low, 1);
        assert_eq!(tir.target, 2);
        assert_eq!(tir.high, 1);
        assert_eq!(tir.very_high, 1);

        assert!((tir.in_range_percent() - 33.333).abs() < 0.01);
        assert!((tir.low_percent() - 33.333).abs() < 0.01);
        assert!((tir.high_percent() - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_empty_series() {
        let tir = TimeInRange::from_values(&[], &bounds()).unwrap();
        assert_eq!(tir.total, 0);
        assert_eq!(tir.in_range_percent(), 0.0);

        let pct = calc_bg_percent_in_categories(&[], &bounds()).unwrap();
        assert_eq!(pct, BgPercentInCategories::default());
    }

    #[test]
    fn test_percent_in_categories() {
        let values = [40.0, 100.0, 120.0, 260.0];
        let pct = calc_bg_percent_in_categories(&values, &bounds()).unwrap();
        assert_eq!(pct.very_low, 0.25);
        assert_eq!(pct.low, 0.0);
        assert_eq!(pct.target, 0.5);
        assert_eq!(pct.high, 0.0);
        assert_eq!(pct.very_high, 0.25);
    }

    #[test]
    fn test_invalid_reading_fails_whole_series() {
        let values = [100.0, 0.0];
        assert!(matches!(
            TimeInRange::from_values(&values, &bounds()),
            Err(BgError::NonPositiveValue)
        ));
    }

    #[test]
    fn test_time_in_tight_range() {
        let values = [65.0, 70.0, 100.0, 140.0, 141.0];
        let tight = TimeInTightRange::from_values(&values, BgUnit::MilligramPerDeciliter).unwrap();
        assert_eq!(tight.value, 3);
        assert_eq!(tight.total, 5);
        assert!((tight.percent() - 60.0).abs() < 1e-9);

        assert_eq!(tight_range(BgUnit::MmolPerLiter).unwrap(), (3.9, 7.8));
        let mmol = TimeInTightRange::from_values(&[3.8, 3.9, 7.8, 7.9], BgUnit::MmolPerLiter).unwrap();
        assert_eq!(mmol.value, 2);
    }

    #[test]
    fn test_average_glucose() {
        assert_eq!(average_glucose(&[]), None);
        assert_eq!(average_glucose(&[100.0, 120.0, 140.0]), Some(120.0));
    }

    #[test]
    fn test_standard_deviation() {
        let sd = StandardDeviation::from_values(&[100.0, 120.0, 140.0, 160.0, 180.0]);
        assert!(!sd.insufficient_data);
        assert_eq!(sd.total, 5);
        assert_eq!(sd.average_glucose, Some(140.0));
        // sample variance = 4000 / 4
        assert!((sd.standard_deviation.unwrap() - 1000f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_standard_deviation_insufficient_data() {
        let sd = StandardDeviation::from_values(&[100.0, 120.0]);
        assert!(sd.insufficient_data);
        assert_eq!(sd.standard_deviation, None);
        assert_eq!(sd.average_glucose, Some(110.0));

        let empty = StandardDeviation::from_values(&[]);
        assert!(empty.insufficient_data);
        assert_eq!(empty.average_glucose, None);
    }

    #[test]
    fn test_coefficient_of_variation() {
        // daily CVs: 20 / 100 * 100 = 20 and 0
        let days = vec![vec![80.0, 100.0, 120.0], vec![150.0, 150.0, 150.0], vec![90.0]];
        let cv = CoefficientOfVariation::from_days(&days);
        assert!(!cv.insufficient_data);
        assert_eq!(cv.total, 7);
        assert!((cv.coefficient_of_variation.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_coefficient_of_variation_insufficient_data() {
        let too_few = CoefficientOfVariation::from_days(&[vec![100.0, 120.0]]);
        assert!(too_few.insufficient_data);
        assert_eq!(too_few.coefficient_of_variation, None);
        assert_eq!(too_few.total, 2);

        // enough readings overall, but no single day has three
        let spread = CoefficientOfVariation::from_days(&[vec![100.0, 120.0], vec![110.0, 130.0]]);
        assert!(spread.insufficient_data);
        assert_eq!(spread.total, 4);
    }

    #[test]
    fn test_glucose_management_indicator() {
        let gmi = GlucoseManagementIndicator::from_values(&[150.0, 154.0], BgUnit::MilligramPerDeciliter).unwrap();
        assert!(!gmi.insufficient_data);
        assert!((gmi.glucose_management_indicator.unwrap() - (3.31 + 0.02392 * 152.0)).abs() < 1e-9);

        // 10 mmol/L converts to 180 mg/dL
        let mmol = GlucoseManagementIndicator::from_values(&[10.0], BgUnit::MmolPerLiter).unwrap();
        assert!((mmol.glucose_management_indicator.unwrap() - (3.31 + 0.02392 * 180.0)).abs() < 1e-9);

        let empty = GlucoseManagementIndicator::from_values(&[], BgUnit::MmolPerLiter).unwrap();
        assert!(empty.insufficient_data);
        assert_eq!(empty.glucose_management_indicator, None);
    }
}
