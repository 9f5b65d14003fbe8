//! Configuration file parsing
//!
//! `config.txt` holds one "key value" pair per line; `#` starts a comment.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::classify::{BgBounds, ClassificationType};
use crate::error::BgError;
use crate::range::default_bg_bounds;
use crate::units::BgUnit;

const DEFAULT_CONFIG: &str = "\
# bgrange configuration
units mg/dL            # mg/dL or mmol/L
classification three-way  # three-way or five-way

# Range boundaries, in the unit above. Omit to use the defaults for that unit.
# very_low 54
# target_lower 70
# target_upper 180
# very_high 250
";

/// Configuration loaded from config.txt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub units: BgUnit,
    pub classification: ClassificationType,
    /// Custom range boundaries, in `units`
    pub bg_bounds: Option<BgBounds>,
}

impl Config {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BgError> {
        let file = File::open(path.as_ref())?;
        debug!("Loading config from {}", path.as_ref().display());
        Self::from_reader(BufReader::new(file))
    }

    /// Parse configuration lines from any reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, BgError> {
        let mut entries: HashMap<String, String> = HashMap::new();

        for line in reader.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse "key value" or "key value # comment"
            if let Some((key, rest)) = Self::parse_line(line) {
                let value = rest.split('#').next().unwrap_or("").trim();
                if !value.is_empty() {
                    entries.insert(key.to_string(), value.to_string());
                }
            }
        }

        Self::from_entries(&entries)
    }

    fn from_entries(entries: &HashMap<String, String>) -> Result<Self, BgError> {
        let mut config = Config::default();

        if let Some(units) = entries.get("units") {
            config.units = units.parse()?;
        }
        if let Some(classification) = entries.get("classification") {
            config.classification = classification.parse()?;
        }

        let bound = |key: &str| -> Result<Option<f64>, BgError> {
            entries
                .get(key)
                .map(|v| {
                    v.parse::<f64>()
                        .map_err(|_| BgError::Config(format!("{} is not a number: {}", key, v)))
                })
                .transpose()
        };
        let very_low = bound("very_low")?;
        let target_lower = bound("target_lower")?;
        let target_upper = bound("target_upper")?;
        let very_high = bound("very_high")?;

        if [very_low, target_lower, target_upper, very_high].iter().any(Option::is_some) {
            // Unset keys keep the unit's default
            let defaults = default_bg_bounds(config.units);
            let bounds = BgBounds {
                very_low_threshold: very_low.or(defaults.very_low_threshold),
                target_lower_bound: target_lower.or(defaults.target_lower_bound),
                target_upper_bound: target_upper.or(defaults.target_upper_bound),
                very_high_threshold: very_high.or(defaults.very_high_threshold),
            };
            if bounds.is_ordered() {
                config.bg_bounds = Some(bounds);
            } else {
                warn!("Configured range boundaries are not in ascending order, using defaults");
            }
        }

        Ok(config)
    }

    /// Parse a single config line, returning (key, value)
    fn parse_line(line: &str) -> Option<(&str, &str)> {
        // Find first whitespace to separate key from value
        let mut parts = line.splitn(2, |c: char| c.is_whitespace());
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();

        if key.is_empty() || value.is_empty() {
            return None;
        }

        Some((key, value))
    }

    /// Write a commented default config file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<(), BgError> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }

    /// Range boundaries in effect: configured ones, or the defaults for the configured unit
    pub fn effective_bounds(&self) -> BgBounds {
        self.bg_bounds.unwrap_or_else(|| default_bg_bounds(self.units))
    }
}

/// Per-user configuration directory
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bgrange")
}

pub fn config_file_path() -> PathBuf {
    get_config_dir().join("config.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Config, BgError> {
        Config::from_reader(Cursor::new(text))
    }

    #[test]
    fn test_default_config_parses() {
        let config = parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_bounds(), default_bg_bounds(BgUnit::MilligramPerDeciliter));
    }

    #[test]
    fn test_units_and_classification() {
        let config = parse("units mmol/L\nclassification five-way # comment\n").unwrap();
        assert_eq!(config.units, BgUnit::MmolPerLiter);
        assert_eq!(config.classification, ClassificationType::FiveWay);
        assert_eq!(config.effective_bounds(), default_bg_bounds(BgUnit::MmolPerLiter));
    }

    #[test]
    fn test_partial_bounds_use_unit_defaults() {
        let config = parse("units mg/dL\ntarget_upper 160\n").unwrap();
        let bounds = config.bg_bounds.unwrap();
        assert_eq!(bounds, BgBounds::new(54.0, 70.0, 160.0, 250.0));
    }

    #[test]
    fn test_unordered_bounds_discarded() {
        let config = parse("target_lower 200\ntarget_upper 180\n").unwrap();
        assert_eq!(config.bg_bounds, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(parse("units mmHg\n"), Err(BgError::InvalidUnit(_))));
        assert!(matches!(parse("very_low low\n"), Err(BgError::Config(_))));
        assert!(matches!(
            parse("classification sideways\n"),
            Err(BgError::InvalidClassification(_))
        ));
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(Config::parse_line("units mg/dL"), Some(("units", "mg/dL")));
        assert_eq!(Config::parse_line("units"), None);
    }
}
