//! Error types for token derivation.

use thiserror::Error;

/// Errors that can occur while configuring or running the token pipeline.
///
/// Bad *input* (a location without a timestamp, a `(0, 0)` fix) is not an
/// error: the pipeline returns `None` for it. These variants are reserved for
/// failures the caller cannot fix by skipping the record.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The key-derivation parameters are not usable.
    #[error("Invalid hash parameters: {0}")]
    InvalidParams(String),

    /// A settings value is out of range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The key derivation itself failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Settings (de)serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;

impl From<scrypt::errors::InvalidParams> for TokenError {
    fn from(err: scrypt::errors::InvalidParams) -> Self {
        Self::InvalidParams(err.to_string())
    }
}

impl From<scrypt::errors::InvalidOutputLen> for TokenError {
    fn from(err: scrypt::errors::InvalidOutputLen) -> Self {
        Self::KeyDerivation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_params() {
        let err = TokenError::InvalidParams("cost must be a power of two".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid hash parameters: cost must be a power of two"
        );
    }

    #[test]
    fn error_display_invalid_settings() {
        let err = TokenError::InvalidSettings("interval".to_string());
        assert_eq!(err.to_string(), "Invalid settings: interval");
    }

    #[test]
    fn error_display_key_derivation() {
        let err = TokenError::KeyDerivation("out of memory".to_string());
        assert_eq!(err.to_string(), "Key derivation failed: out of memory");
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: TokenError = json_err.into();
        assert!(matches!(err, TokenError::Serialization(_)));
    }

    #[test]
    fn error_from_scrypt_params() {
        let err: TokenError = scrypt::errors::InvalidParams.into();
        assert!(matches!(err, TokenError::InvalidParams(_)));
    }

    #[test]
    fn error_from_scrypt_output_len() {
        let err: TokenError = scrypt::errors::InvalidOutputLen.into();
        assert!(matches!(err, TokenError::KeyDerivation(_)));
    }
}
