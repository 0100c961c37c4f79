//! Static level data: platforms, obstacles, boost pads and the start pose

use glam::{Mat4, Vec3};

use super::body::Body;
use super::platform::PlatformQuad;
use crate::error::ConfigError;

/// A pad that kicks the player when touched, then cools down
#[derive(Debug, Clone)]
pub struct BoostPad {
    pub body: Body,
    /// Velocity added on contact
    pub impulse: Vec3,
    pub cooldown_ticks: u64,
    /// Earliest tick at which the pad can fire again
    ready_at: u64,
}

impl BoostPad {
    pub fn new(body: Body, impulse: Vec3, cooldown_ticks: u64) -> Self {
        Self {
            body,
            impulse,
            cooldown_ticks,
            ready_at: 0,
        }
    }

    #[inline]
    pub fn is_ready(&self, now: u64) -> bool {
        now >= self.ready_at
    }

    /// Mark as fired at `now`
    pub fn trigger(&mut self, now: u64) {
        self.ready_at = now + self.cooldown_ticks.max(1);
    }

    /// Make every pad immediately available again
    pub fn rearm(&mut self) {
        self.ready_at = 0;
    }
}

/// Everything the per-tick policy needs to know about the course
#[derive(Debug, Clone)]
pub struct Level {
    pub platforms: Vec<PlatformQuad>,
    /// Index into `platforms` of the finish
    pub goal: usize,
    pub obstacles: Vec<Body>,
    pub boosts: Vec<BoostPad>,
    /// Unplaced player body (shape, material, collider, scale)
    pub player_template: Body,
    /// Where the player spawns, at rest
    pub start: Mat4,
}

impl Level {
    /// A fresh player at the start pose
    pub fn spawn_player(&self) -> Body {
        self.player_template
            .clone()
            .placed(self.start, Vec3::ZERO, Vec3::ZERO)
    }

    /// Refresh cached inverses of the static bodies (after construction or edits)
    pub fn refresh_inverses(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.refresh_inverse();
        }
        for pad in &mut self.boosts {
            pad.body.refresh_inverse();
        }
    }

    /// Reject levels the policy cannot run; warn about degenerate platforms
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.platforms.is_empty() {
            return Err(ConfigError::NoPlatforms);
        }
        if self.goal >= self.platforms.len() {
            return Err(ConfigError::GoalOutOfRange {
                index: self.goal,
                count: self.platforms.len(),
            });
        }
        if !self.start.is_finite() {
            return Err(ConfigError::NonFiniteStart);
        }
        for (i, platform) in self.platforms.iter().enumerate() {
            if platform.is_degenerate() {
                log::warn!("Platform {} is degenerate and will never support the player", i);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collider::ColliderId;
    use crate::sim::draw::{MaterialHandle, ShapeHandle};

    fn level(platforms: Vec<PlatformQuad>, goal: usize) -> Level {
        Level {
            platforms,
            goal,
            obstacles: Vec::new(),
            boosts: Vec::new(),
            player_template: Body::new(ShapeHandle(0), MaterialHandle(0), ColliderId::Sphere),
            start: Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        }
    }

    #[test]
    fn test_validate_requires_platforms() {
        assert!(matches!(level(Vec::new(), 0).validate(), Err(ConfigError::NoPlatforms)));
    }

    #[test]
    fn test_validate_goal_index() {
        let quad = PlatformQuad::axis_aligned(Vec3::ZERO, 4.0, 4.0);
        assert!(matches!(
            level(vec![quad], 1).validate(),
            Err(ConfigError::GoalOutOfRange { index: 1, count: 1 })
        ));
        assert!(level(vec![quad], 0).validate().is_ok());
    }

    #[test]
    fn test_validate_start_pose() {
        let quad = PlatformQuad::axis_aligned(Vec3::ZERO, 4.0, 4.0);
        let mut l = level(vec![quad], 0);
        l.start = Mat4::from_translation(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(l.validate(), Err(ConfigError::NonFiniteStart)));
    }

    #[test]
    fn test_spawn_is_at_rest_on_start() {
        let quad = PlatformQuad::axis_aligned(Vec3::ZERO, 4.0, 4.0);
        let l = level(vec![quad], 0);
        let player = l.spawn_player();
        assert_eq!(player.center, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(player.linear_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_boost_cooldown() {
        let body = Body::new(ShapeHandle(0), MaterialHandle(0), ColliderId::Cube);
        let mut pad = BoostPad::new(body, Vec3::X, 50);
        assert!(pad.is_ready(0));
        pad.trigger(10);
        assert!(!pad.is_ready(59));
        assert!(pad.is_ready(60));
        pad.rearm();
        assert!(pad.is_ready(11));
    }
}
