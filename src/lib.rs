//! Glowhop - a glowing 3D platforming demo
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stepping, bodies, collisions, game state)
//! - `settings`: Data-driven tunables loaded from JSON
//! - `error`: Configuration errors surfaced at engine construction
//!
//! Rendering (offscreen passes, bloom, shaders) lives outside this crate. The
//! core only hands out drawable (shape, transform, material) triples.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{CollisionResponse, Settings};

use glam::{Vec2, Vec3};

/// Simulation constants and physics defaults
pub mod consts {
    /// Fixed simulation timestep (100 Hz)
    pub const SIM_DT: f32 = 1.0 / 100.0;
    /// Largest frame time folded into the accumulator per call (spiral of death cap)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Player center height at which it rests on a platform surface
    pub const FLOOR_Y: f32 = 1.0;
    /// How long the player may fall before a reset fires (seconds)
    pub const FALL_GRACE_SECS: f32 = 0.75;
    /// Extra downward speed applied when support is lost
    pub const FALL_KICK: f32 = 2.0;
    /// How far below the floor the player may sink and still regain support
    pub const RECOVER_DEPTH: f32 = 0.5;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 1.0;
    pub const MOVE_ACCEL: f32 = 24.0;
    pub const MAX_SPEED: f32 = 12.0;
    pub const AIR_DRAG: f32 = 1.5;
    pub const JUMP_SPEED: f32 = 7.0;
    pub const JUMP_BUFFER_SECS: f32 = 0.1;

    /// Default collision tolerance for catalog proxies
    pub const COLLIDER_LEEWAY: f32 = 0.1;

    /// One-shot commands not consumed within this window are dropped (seconds)
    pub const COMMAND_TTL_SECS: f32 = 0.25;
    /// Interval between player position log lines (seconds of simulated time)
    pub const TELEMETRY_INTERVAL_SECS: f32 = 3.0;
}

/// Project a world-space vector onto the horizontal (x, z) plane
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Sign of `x` as -1, 0 or 1 (unlike `f32::signum`, zero maps to zero)
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Convert a duration in seconds to a whole number of fixed ticks (rounded up)
#[inline]
pub fn secs_to_ticks(secs: f32, dt: f32) -> u64 {
    if secs <= 0.0 || dt <= 0.0 {
        return 0;
    }
    // Tolerate f32 noise so 0.75 / 0.01 stays 75 rather than 76
    ((secs / dt) - 1e-3).ceil().max(1.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-0.01), -1.0);
    }

    #[test]
    fn test_horizontal_drops_y() {
        assert_eq!(horizontal(Vec3::new(1.0, 5.0, -2.0)), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(0.75, 0.01), 75);
        assert_eq!(secs_to_ticks(0.0, 0.01), 0);
        assert_eq!(secs_to_ticks(0.005, 0.01), 1);
    }
}
