//! Kinematic bodies
//!
//! A body integrates its own velocity, remembers the pose from before the last
//! step, and blends between the two for rendering so visual smoothness does
//! not depend on the physics rate.

use glam::{Mat4, Quat, Vec3};

use super::collider::{ColliderId, ColliderKind, ColliderProxy};
use super::draw::{Drawable, MaterialHandle, ShapeHandle};

/// Pose captured before a step (blend source)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub center: Vec3,
    pub rotation: Quat,
}

/// A simulated object
#[derive(Debug, Clone)]
pub struct Body {
    pub center: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub linear_velocity: Vec3,
    /// Axis × rate (radians/s)
    pub angular_velocity: Vec3,
    /// Pose from before the most recent `advance`
    pub previous: PoseSample,
    /// Collider catalog entry used when this body is the tested side
    pub collider: ColliderId,
    pub shape: ShapeHandle,
    pub material: MaterialHandle,
    transform: Mat4,
    inverse_transform: Mat4,
    drawn_transform: Mat4,
}

impl Body {
    /// A unit body at the origin, at rest
    pub fn new(shape: ShapeHandle, material: MaterialHandle, collider: ColliderId) -> Self {
        Self {
            center: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            previous: PoseSample {
                center: Vec3::ZERO,
                rotation: Quat::IDENTITY,
            },
            collider,
            shape,
            material,
            transform: Mat4::IDENTITY,
            inverse_transform: Mat4::IDENTITY,
            drawn_transform: Mat4::IDENTITY,
        }
    }

    /// Builder form of `emplace`
    pub fn placed(
        mut self,
        location: Mat4,
        linear_velocity: Vec3,
        angular_velocity: Vec3,
    ) -> Self {
        self.emplace(location, linear_velocity, angular_velocity);
        self
    }

    /// (Re)initialize pose and motion. Both samples collapse onto the new pose
    /// so the first blend does not smear from a stale location.
    pub fn emplace(&mut self, location: Mat4, linear_velocity: Vec3, angular_velocity: Vec3) {
        let (scale, rotation, center) = location.to_scale_rotation_translation();
        self.center = center;
        self.rotation = rotation.normalize();
        self.scale = scale;
        self.linear_velocity = linear_velocity;
        self.angular_velocity = angular_velocity;
        self.previous = PoseSample {
            center: self.center,
            rotation: self.rotation,
        };
        self.refresh_transform();
        self.drawn_transform = self.transform;
        self.refresh_inverse();
    }

    /// One explicit integration step; the pre-step pose becomes `previous`
    pub fn advance(&mut self, dt: f32) {
        self.previous = PoseSample {
            center: self.center,
            rotation: self.rotation,
        };
        self.center += self.linear_velocity * dt;
        let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.rotation = (spin * self.rotation).normalize();
        self.refresh_transform();
    }

    /// Interpolate between `previous` and the current pose for drawing
    pub fn blend_state(&mut self, alpha: f32) {
        debug_assert!((0.0..1.0).contains(&alpha), "blend alpha {alpha} out of range");
        let center = self.previous.center.lerp(self.center, alpha);
        let rotation = self.previous.rotation.slerp(self.rotation, alpha);
        self.drawn_transform = Mat4::from_scale_rotation_translation(self.scale, rotation, center);
    }

    /// Freeze the drawn pose at the current one: `previous` collapses onto it
    /// so any later blend lands on the same pose
    pub fn hold_pose(&mut self) {
        self.previous = PoseSample {
            center: self.center,
            rotation: self.rotation,
        };
        self.refresh_inverse();
        self.drawn_transform = self.transform;
    }

    /// Resync the cached transform with the pose fields and recompute its
    /// inverse (once per tick, before pairwise tests)
    pub fn refresh_inverse(&mut self) {
        self.refresh_transform();
        self.inverse_transform = self.transform.inverse();
    }

    #[inline]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    #[inline]
    pub fn inverse_transform(&self) -> Mat4 {
        self.inverse_transform
    }

    /// Pose to render this frame
    #[inline]
    pub fn drawn_transform(&self) -> Mat4 {
        self.drawn_transform
    }

    /// Radius if the scale is uniform (the body is a true sphere when its shape is)
    pub fn uniform_radius(&self) -> Option<f32> {
        let s = self.scale.abs();
        let tolerance = 1e-5 * s.max_element().max(1.0);
        if (s.x - s.y).abs() <= tolerance && (s.x - s.z).abs() <= tolerance {
            Some(s.x)
        } else {
            None
        }
    }

    /// Coarse overlap test of `other` against this body.
    ///
    /// `other`'s proxy points are carried into this body's local frame through
    /// the cached inverse and checked against the proxy's unit shape, inflated
    /// by its leeway. Two uniformly scaled spheres use the exact center
    /// distance instead.
    pub fn check_if_colliding(&self, other: &Body, proxy: &ColliderProxy) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }

        if proxy.kind == ColliderKind::Sphere
            && let (Some(ra), Some(rb)) = (self.uniform_radius(), other.uniform_radius())
        {
            let reach = ra + rb + proxy.leeway();
            return self.center.distance_squared(other.center) <= reach * reach;
        }

        let to_local = self.inverse_transform * other.transform;
        proxy
            .sample_points()
            .iter()
            .any(|&p| proxy.kind.contains_local(to_local.transform_point3(p), proxy.leeway()))
    }

    /// Drawable at the blended pose
    pub fn drawable(&self) -> Drawable {
        Drawable {
            shape: self.shape,
            transform: self.drawn_transform,
            material: self.material,
        }
    }

    fn refresh_transform(&mut self) {
        self.transform = Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.center);
    }
}
