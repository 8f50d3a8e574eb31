//! Sweep bounds and acceptance thresholds.
//!
//! Defaults reproduce the full sweep. The executable can narrow it through
//! environment variables:
//!
//! | variable | meaning | default |
//! |----------|---------|---------|
//! | `TONECHECK_MIN_SIZE` | smallest transform size | `32` |
//! | `TONECHECK_MAX_SIZE` | largest transform size | `65536` |
//! | `TONECHECK_PRECISION` | `double` or `single` reference arithmetic | `double` |

use core::fmt;

/// Smallest size the sweep visits.
pub const MIN_SWEEP_SIZE: usize = 32;

/// Largest size the sweep visits.
pub const MAX_SWEEP_SIZE: usize = 65536;

pub const ENV_MIN_SIZE: &str = "TONECHECK_MIN_SIZE";
pub const ENV_MAX_SIZE: &str = "TONECHECK_MAX_SIZE";
pub const ENV_PRECISION: &str = "TONECHECK_PRECISION";

/// Pass/fail limits of the four acceptance criteria.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum carrier-to-spur ratio. Single precision carries 24 mantissa
    /// bits, about 144 dB; a few dB are left as margin.
    pub min_dynamic_range_db: f64,
    /// Maximum phase error in degrees.
    pub max_phase_error_deg: f64,
    /// Maximum magnitude error, in units of amplitude.
    pub max_magnitude_error: f64,
    /// Maximum squared round-trip error per sample.
    pub max_round_trip_error: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_dynamic_range_db: 140.0,
            max_phase_error_deg: 1e-4,
            max_magnitude_error: 1e-6,
            max_round_trip_error: 1e-7,
        }
    }
}

/// Arithmetic precision of the bundled reference backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    #[default]
    Double,
    Single,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub min_size: usize,
    pub max_size: usize,
    pub precision: Precision,
    pub thresholds: Thresholds,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SWEEP_SIZE,
            max_size: MAX_SWEEP_SIZE,
            precision: Precision::Double,
            thresholds: Thresholds::default(),
        }
    }
}

/// Invalid sweep configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable could not be parsed.
    InvalidValue { var: &'static str, value: String },
    /// A size is not a power of two within the sweep limits.
    InvalidSize { var: &'static str, size: usize },
    /// The minimum size exceeds the maximum.
    EmptyRange { min: usize, max: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { var, value } => {
                write!(f, "{var}: cannot parse {value:?}")
            }
            ConfigError::InvalidSize { var, size } => write!(
                f,
                "{var}: {size} is not a power of two between {MIN_SWEEP_SIZE} and {MAX_SWEEP_SIZE}"
            ),
            ConfigError::EmptyRange { min, max } => {
                write!(f, "minimum size {min} exceeds maximum size {max}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl SweepConfig {
    /// Defaults overridden by the `TONECHECK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`SweepConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_MIN_SIZE) {
            config.min_size = parse_size(ENV_MIN_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_SIZE) {
            config.max_size = parse_size(ENV_MAX_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_PRECISION) {
            config.precision = match value.trim().to_ascii_lowercase().as_str() {
                "double" | "f64" => Precision::Double,
                "single" | "f32" => Precision::Single,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ENV_PRECISION,
                        value,
                    })
                }
            };
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (var, size) in [(ENV_MIN_SIZE, self.min_size), (ENV_MAX_SIZE, self.max_size)] {
            if !is_sweep_size(size) {
                return Err(ConfigError::InvalidSize { var, size });
            }
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::EmptyRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }

    /// Transform sizes visited by the sweep, smallest first.
    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        let max = self.max_size;
        core::iter::successors(Some(self.min_size), |&n| n.checked_mul(2))
            .take_while(move |&n| n <= max)
    }
}

fn is_sweep_size(size: usize) -> bool {
    size.is_power_of_two() && (MIN_SWEEP_SIZE..=MAX_SWEEP_SIZE).contains(&size)
}

fn parse_size(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_cover_full_sweep() {
        let config = SweepConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SweepConfig::default());
        let sizes: Vec<usize> = config.sizes().collect();
        assert_eq!(sizes.len(), 12);
        assert_eq!(sizes.first(), Some(&32));
        assert_eq!(sizes.last(), Some(&65536));
    }

    #[test]
    fn overrides_narrow_the_sweep() {
        let config = SweepConfig::from_lookup(lookup(&[
            (ENV_MIN_SIZE, "64"),
            (ENV_MAX_SIZE, " 256 "),
            (ENV_PRECISION, "Single"),
        ]))
        .unwrap();
        assert_eq!(config.sizes().collect::<Vec<_>>(), vec![64, 128, 256]);
        assert_eq!(config.precision, Precision::Single);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            SweepConfig::from_lookup(lookup(&[(ENV_MAX_SIZE, "lots")])),
            Err(ConfigError::InvalidValue {
                var: ENV_MAX_SIZE,
                value: "lots".into()
            })
        );
        assert_eq!(
            SweepConfig::from_lookup(lookup(&[(ENV_MIN_SIZE, "48")])),
            Err(ConfigError::InvalidSize {
                var: ENV_MIN_SIZE,
                size: 48
            })
        );
        assert_eq!(
            SweepConfig::from_lookup(lookup(&[(ENV_MAX_SIZE, "131072")])),
            Err(ConfigError::InvalidSize {
                var: ENV_MAX_SIZE,
                size: 131072
            })
        );
        assert_eq!(
            SweepConfig::from_lookup(lookup(&[(ENV_MIN_SIZE, "1024"), (ENV_MAX_SIZE, "512")])),
            Err(ConfigError::EmptyRange { min: 1024, max: 512 })
        );
        assert!(SweepConfig::from_lookup(lookup(&[(ENV_PRECISION, "half")])).is_err());
    }

    #[test]
    fn error_messages_name_the_variable() {
        let e = ConfigError::InvalidSize {
            var: ENV_MIN_SIZE,
            size: 48,
        };
        assert_eq!(
            e.to_string(),
            "TONECHECK_MIN_SIZE: 48 is not a power of two between 32 and 65536"
        );
    }
}
