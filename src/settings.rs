//! Simulation tunables
//!
//! Loaded from JSON; every field has a default so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ensure_finite, ensure_non_negative};
use crate::secs_to_ticks;

/// What happens when the player touches an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResponse {
    /// Discard the player and respawn at the start pose next tick
    #[default]
    Reset,
    /// Cancel the velocity component pointing into the obstacle
    InelasticStop,
}

impl CollisionResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionResponse::Reset => "reset",
            CollisionResponse::InelasticStop => "inelastic_stop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reset" => Some(CollisionResponse::Reset),
            "inelastic_stop" | "stop" => Some(CollisionResponse::InelasticStop),
            _ => None,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Stepping ===
    /// Fixed timestep (seconds)
    pub dt: f32,
    /// Per-call frame time cap (seconds)
    pub max_frame_time: f32,
    /// Frame time multiplier (negative runs the clock backward)
    pub time_scale: f32,

    // === Physics ===
    pub gravity: f32,
    /// Player center height when resting on a platform
    pub floor_y: f32,
    pub move_accel: f32,
    pub max_speed: f32,
    /// Horizontal velocity decay per second
    pub air_drag: f32,
    pub jump_speed: f32,

    // === Falling ===
    /// Time between losing support and the reset
    pub fall_grace_secs: f32,
    /// Downward speed added when support is lost
    pub fall_kick: f32,
    /// Depth below `floor_y` beyond which support cannot be regained
    pub recover_depth: f32,

    // === Collisions ===
    pub collision_response: CollisionResponse,
    pub collider_leeway: f32,

    // === Input ===
    pub jump_buffer_secs: f32,
    pub command_ttl_secs: f32,

    // === Diagnostics ===
    /// Interval between player position log lines (0 disables)
    pub telemetry_interval_secs: f32,

    /// Seed for generated courses
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            max_frame_time: MAX_FRAME_TIME,
            time_scale: 1.0,

            gravity: GRAVITY,
            floor_y: FLOOR_Y,
            move_accel: MOVE_ACCEL,
            max_speed: MAX_SPEED,
            air_drag: AIR_DRAG,
            jump_speed: JUMP_SPEED,

            fall_grace_secs: FALL_GRACE_SECS,
            fall_kick: FALL_KICK,
            recover_depth: RECOVER_DEPTH,

            collision_response: CollisionResponse::Reset,
            collider_leeway: COLLIDER_LEEWAY,

            jump_buffer_secs: JUMP_BUFFER_SECS,
            command_ttl_secs: COMMAND_TTL_SECS,

            telemetry_interval_secs: TELEMETRY_INTERVAL_SECS,

            seed: 1,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the stepper and policy cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep(self.dt));
        }
        if !self.max_frame_time.is_finite() || self.max_frame_time < self.dt {
            return Err(ConfigError::InvalidFrameCap {
                max: self.max_frame_time,
                dt: self.dt,
            });
        }
        ensure_finite("time_scale", self.time_scale)?;
        ensure_finite("gravity", self.gravity)?;
        ensure_finite("floor_y", self.floor_y)?;
        ensure_non_negative("move_accel", self.move_accel)?;
        ensure_non_negative("max_speed", self.max_speed)?;
        ensure_non_negative("air_drag", self.air_drag)?;
        ensure_non_negative("jump_speed", self.jump_speed)?;
        ensure_non_negative("fall_grace_secs", self.fall_grace_secs)?;
        ensure_non_negative("fall_kick", self.fall_kick)?;
        ensure_non_negative("recover_depth", self.recover_depth)?;
        ensure_non_negative("collider_leeway", self.collider_leeway)?;
        ensure_non_negative("jump_buffer_secs", self.jump_buffer_secs)?;
        ensure_non_negative("command_ttl_secs", self.command_ttl_secs)?;
        ensure_non_negative("telemetry_interval_secs", self.telemetry_interval_secs)?;
        Ok(())
    }

    /// Fall grace period in whole ticks
    pub fn fall_grace_ticks(&self) -> u64 {
        secs_to_ticks(self.fall_grace_secs, self.dt)
    }

    pub fn jump_buffer_ticks(&self) -> u64 {
        secs_to_ticks(self.jump_buffer_secs, self.dt)
    }

    pub fn command_ttl_ticks(&self) -> u64 {
        secs_to_ticks(self.command_ttl_secs, self.dt)
    }

    /// Telemetry period in ticks (`None` when disabled)
    pub fn telemetry_ticks(&self) -> Option<u64> {
        match secs_to_ticks(self.telemetry_interval_secs, self.dt) {
            0 => None,
            n => Some(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = Settings::from_json(r#"{ "gravity": 20.0, "collision_response": "inelastic_stop" }"#)
            .unwrap();
        assert_eq!(settings.gravity, 20.0);
        assert_eq!(settings.collision_response, CollisionResponse::InelasticStop);
        assert_eq!(settings.dt, SIM_DT);
    }

    #[test]
    fn test_rejects_zero_timestep() {
        let err = Settings::from_json(r#"{ "dt": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimestep(_)));
    }

    #[test]
    fn test_rejects_negative_leeway() {
        let settings = Settings {
            collider_leeway: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Negative { name: "collider_leeway", .. })
        ));
    }

    #[test]
    fn test_rejects_frame_cap_below_dt() {
        let settings = Settings {
            max_frame_time: 0.001,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidFrameCap { .. })));
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_response() {
        let settings = Settings {
            collision_response: CollisionResponse::InelasticStop,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_response_from_str() {
        assert_eq!(CollisionResponse::from_str("RESET"), Some(CollisionResponse::Reset));
        assert_eq!(CollisionResponse::from_str("stop"), Some(CollisionResponse::InelasticStop));
        assert_eq!(CollisionResponse::from_str("bounce"), None);
        assert_eq!(CollisionResponse::InelasticStop.as_str(), "inelastic_stop");
    }

    #[test]
    fn test_tick_conversions() {
        let settings = Settings::default();
        assert_eq!(settings.fall_grace_ticks(), 75);
        assert_eq!(settings.telemetry_ticks(), Some(300));
        let quiet = Settings {
            telemetry_interval_secs: 0.0,
            ..Default::default()
        };
        assert_eq!(quiet.telemetry_ticks(), None);
    }
}
