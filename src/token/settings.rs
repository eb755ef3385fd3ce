//! Settings for the token pipeline.

use serde::{Deserialize, Serialize};

use super::error::{Result, TokenError};
use super::hasher::HashParams;
use crate::location::geo::{
    DEFAULT_CIRCLE_RADIUS_M, DEFAULT_GEOHASH_PRECISION, MAX_GEOHASH_PRECISION,
};
use crate::location::time::{WindowRounding, DEFAULT_WINDOW_INTERVAL_MS};

/// Settings for token derivation.
///
/// Every field is part of the token format: devices only produce matching
/// tokens if they agree on all of them. The defaults are the format in
/// production and should not be changed casually.
///
/// Missing fields take their default when deserializing, so a settings file
/// only needs to name what it overrides.
///
/// # Example
///
/// ```
/// use geotrace_core::token::TokenSettings;
///
/// let settings = TokenSettings::from_json(r#"{"window_interval_ms": 600000}"#).unwrap();
/// assert_eq!(settings.window_interval_ms, 600_000);
/// assert_eq!(settings.geohash_precision, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Geohash length (1-12).
    pub geohash_precision: u8,

    /// Radius of the sampling circle in meters.
    pub circle_radius_m: f64,

    /// Width of a time window in milliseconds.
    pub window_interval_ms: i64,

    /// Rounding mode for time windows.
    pub window_rounding: WindowRounding,

    /// scrypt parameters.
    pub hash_params: HashParams,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            geohash_precision: DEFAULT_GEOHASH_PRECISION,
            circle_radius_m: DEFAULT_CIRCLE_RADIUS_M,
            window_interval_ms: DEFAULT_WINDOW_INTERVAL_MS,
            window_rounding: WindowRounding::default(),
            hash_params: HashParams::default(),
        }
    }
}

impl TokenSettings {
    /// Checks every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidSettings`] for an out-of-range precision,
    /// radius or interval, and [`TokenError::InvalidParams`] for unusable
    /// hash parameters.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GEOHASH_PRECISION).contains(&self.geohash_precision) {
            return Err(TokenError::InvalidSettings(format!(
                "geohash precision {} is outside 1..={MAX_GEOHASH_PRECISION}",
                self.geohash_precision
            )));
        }
        if !self.circle_radius_m.is_finite() || self.circle_radius_m < 0.0 {
            return Err(TokenError::InvalidSettings(format!(
                "circle radius {} m is not a finite non-negative distance",
                self.circle_radius_m
            )));
        }
        if self.window_interval_ms <= 0 {
            return Err(TokenError::InvalidSettings(format!(
                "window interval {} ms is not positive",
                self.window_interval_ms
            )));
        }
        self.hash_params.validate()
    }

    /// Parses and validates settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes these settings to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenFormat;

    #[test]
    fn default_values() {
        let settings = TokenSettings::default();

        assert_eq!(settings.geohash_precision, 8);
        assert!((settings.circle_radius_m - 10.0).abs() < f64::EPSILON);
        assert_eq!(settings.window_interval_ms, 300_000);
        assert_eq!(settings.window_rounding, WindowRounding::Floor);
        assert_eq!(settings.hash_params, TokenFormat::V2.params());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn json_roundtrip() {
        let settings = TokenSettings {
            window_rounding: WindowRounding::Truncate,
            hash_params: TokenFormat::V1.params(),
            ..TokenSettings::default()
        };

        let json = settings.to_json().unwrap();
        let recovered = TokenSettings::from_json(&json).unwrap();

        assert_eq!(recovered, settings);
        assert!(json.contains("\"truncate\""));
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(TokenSettings::from_json("{}").unwrap(), TokenSettings::default());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            TokenSettings::from_json("{not json"),
            Err(TokenError::Serialization(_))
        ));
    }

    #[test]
    fn rejects_bad_precision() {
        for precision in [0, 13] {
            let settings = TokenSettings {
                geohash_precision: precision,
                ..TokenSettings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(TokenError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    fn rejects_bad_radius() {
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            let settings = TokenSettings {
                circle_radius_m: radius,
                ..TokenSettings::default()
            };
            assert!(settings.validate().is_err(), "radius {radius}");
        }
    }

    #[test]
    fn rejects_non_positive_interval() {
        let settings = TokenSettings {
            window_interval_ms: 0,
            ..TokenSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(TokenError::InvalidSettings(_))
        ));
    }

    #[test]
    fn rejects_bad_hash_params_from_json() {
        let result = TokenSettings::from_json(r#"{"hash_params": {"cost": 1000, "block_size": 8, "parallelism": 1, "salt": "salt", "output_len": 8}}"#);
        assert!(matches!(result, Err(TokenError::InvalidParams(_))));
    }
}
