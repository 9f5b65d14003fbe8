//! Blood glucose range classification and unit conversion.
//!
//! Converts values between mg/dL and mmol/L, classifies them into clinical bands
//! (three-way or five-way) and builds the threshold tables used to configure
//! monitoring alerts. Everything here is pure and synchronous.

pub mod classify;
pub mod config;
pub mod error;
pub mod range;
pub mod stats;
pub mod thresholds;
pub mod units;

pub use classify::{get_bg_class, BgBounds, BgClass, ClassificationType};
pub use error::BgError;
pub use range::{default_bg_bounds, default_bg_classes, generate_bg_range_labels, BgClasses, BgPrefs, BgRangeLabels};
pub use stats::{
    average_glucose, calc_bg_percent_in_categories, BgPercentInCategories, CoefficientOfVariation,
    GlucoseManagementIndicator, StandardDeviation, TimeInRange, TimeInTightRange,
};
pub use thresholds::{build_bg_values, build_thresholds, get_error_message, BgValues, FieldError, Thresholds};
pub use units::{convert_and_format, convert_bg, convert_if_needed, BgUnit, MGDL_PER_MMOLL};
