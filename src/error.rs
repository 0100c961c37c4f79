//! Configuration errors
//!
//! Everything that can go wrong at runtime is resolved by policy (clamping,
//! "not contained"); what remains is bad configuration, caught before the
//! first tick.

use thiserror::Error;

/// Error type for settings and scenario validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Fixed timestep must be finite and strictly positive.
    #[error("invalid timestep {0} (must be finite and > 0)")]
    InvalidTimestep(f32),
    /// Frame time cap must be finite and at least one timestep.
    #[error("invalid max frame time {max} for timestep {dt}")]
    InvalidFrameCap { max: f32, dt: f32 },
    /// A tunable that must be finite was not.
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    /// A tunable that must be non-negative was negative.
    #[error("{name} must be >= 0, got {value}")]
    Negative { name: &'static str, value: f32 },
    /// Scenario has nothing to stand on.
    #[error("scenario has no platforms")]
    NoPlatforms,
    /// Goal platform index does not name a platform.
    #[error("goal platform {index} out of range ({count} platforms)")]
    GoalOutOfRange { index: usize, count: usize },
    /// Start pose contains NaN or infinity.
    #[error("start pose is not finite")]
    NonFiniteStart,
    /// Unknown collider name in config.
    #[error("unknown collider '{0}'")]
    UnknownCollider(String),
    /// I/O error while reading settings.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Settings JSON could not be parsed.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Check that a named value is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

/// Check that a named value is finite and non-negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
