//! Error types for environment loading and session management.

use std::io;
use thiserror::Error;

/// Reasons an environment config is rejected before any system is built.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// Identity string was empty
    #[error("{field} must be a non-empty string")]
    EmptyField { field: &'static str },

    /// Numeric field outside its allowed range (or not finite)
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// `behavior.mode` tag not in the known set
    #[error("unknown behavior mode '{0}'")]
    UnknownBehaviorMode(String),

    /// `spatial.distribution.type` tag not in the known set
    #[error("unknown distribution type '{0}'")]
    UnknownDistribution(String),

    /// Custom distribution names an initializer nobody registered
    #[error("no initializer registered under '{0}'")]
    UnknownInitializer(String),

    /// Distribution needs a different bounds shape
    #[error("{distribution} distribution requires {expected} bounds")]
    BoundsMismatch {
        distribution: &'static str,
        expected: &'static str,
    },

    /// Palette entry is not `#RRGGBB`
    #[error("invalid palette color '{0}' (expected #RRGGBB)")]
    InvalidColor(String),

    /// Explicit palette with no entries
    #[error("color_palette must contain at least one color when present")]
    EmptyPalette,

    /// Missing field, wrong type or malformed document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while loading or switching environments.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Id is neither a built-in preset nor a registered environment
    #[error("environment '{0}' not found")]
    UnknownEnvironment(String),

    #[error("environment config rejected: {0}")]
    Config(#[from] ConfigValidationError),

    /// The running system was built from this id's config
    #[error("environment '{0}' is active and cannot be replaced")]
    EnvironmentActive(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = ConfigValidationError::OutOfRange {
            field: "spatial.particle_count",
            value: -5.0,
            expected: "> 0",
        };
        assert_eq!(
            err.to_string(),
            "spatial.particle_count = -5 is out of range (expected > 0)"
        );
    }

    #[test]
    fn test_session_error_wraps_config_error() {
        let err: SessionError = ConfigValidationError::EmptyPalette.into();
        assert!(matches!(err, SessionError::Config(_)));
        assert!(err.to_string().contains("color_palette"));
    }
}
