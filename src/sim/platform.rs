//! Oriented platform footprints and the support (containment) test
//!
//! A platform is stored as one corner plus two spanning edges, never recovered
//! from a general transform. Containment ignores the vertical axis: it is a 2D
//! point-in-parallelogram test on the (x, z) plane.

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::horizontal;

/// Relative determinant below which the spanning edges count as parallel
pub const DEGENERATE_EPSILON: f32 = 1e-5;

/// An oriented rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformQuad {
    /// Reference corner
    pub corner: Vec3,
    /// Edge to the adjacent corner along the first axis
    pub edge_u: Vec3,
    /// Edge to the adjacent corner along the second axis
    pub edge_v: Vec3,
}

impl PlatformQuad {
    pub fn new(corner: Vec3, edge_u: Vec3, edge_v: Vec3) -> Self {
        Self {
            corner,
            edge_u,
            edge_v,
        }
    }

    /// Axis-aligned platform centered at `center` with full `width` (x) and `depth` (z)
    pub fn axis_aligned(center: Vec3, width: f32, depth: f32) -> Self {
        Self::new(
            center - Vec3::new(width / 2.0, 0.0, depth / 2.0),
            Vec3::new(width, 0.0, 0.0),
            Vec3::new(0.0, 0.0, depth),
        )
    }

    /// Platform rotated by `yaw` radians about the vertical axis through `center`
    pub fn rotated(center: Vec3, width: f32, depth: f32, yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        let edge_u = Vec3::new(cos, 0.0, -sin) * width;
        let edge_v = Vec3::new(sin, 0.0, cos) * depth;
        Self::new(center - (edge_u + edge_v) * 0.5, edge_u, edge_v)
    }

    /// The four corners, in winding order
    pub fn corners(&self) -> [Vec3; 4] {
        [
            self.corner,
            self.corner + self.edge_u,
            self.corner + self.edge_u + self.edge_v,
            self.corner + self.edge_v,
        ]
    }

    pub fn center(&self) -> Vec3 {
        self.corner + (self.edge_u + self.edge_v) * 0.5
    }

    /// Horizontal determinant of the spanning edges
    #[inline]
    pub fn determinant(&self) -> f32 {
        horizontal(self.edge_u).perp_dot(horizontal(self.edge_v))
    }

    /// Edges are parallel (or zero) in the horizontal plane
    pub fn is_degenerate(&self) -> bool {
        is_degenerate_span(horizontal(self.edge_u), horizontal(self.edge_v))
    }

    /// Parallelogram coordinates of `p`, or `None` for a degenerate footprint
    pub fn local_coords(&self, p: Vec3) -> Option<Vec2> {
        solve_span(
            horizontal(p - self.corner),
            horizontal(self.edge_u),
            horizontal(self.edge_v),
        )
    }

    /// Does this platform's footprint contain `p` (corners and edges included)?
    ///
    /// A degenerate footprint contains nothing. That is a policy choice: the
    /// system has no unique solution there and we refuse to guess.
    pub fn contains(&self, p: Vec3) -> bool {
        match self.local_coords(p) {
            Some(uv) => (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y),
            None => false,
        }
    }

    /// Model matrix mapping the unit square slab [0,1]×[-1,0]×[0,1] onto the
    /// platform, `thickness` deep below its surface
    pub fn model_transform(&self, thickness: f32) -> Mat4 {
        Mat4::from_cols(
            self.edge_u.extend(0.0),
            Vec4::new(0.0, thickness, 0.0, 0.0),
            self.edge_v.extend(0.0),
            self.corner.extend(1.0),
        )
    }
}

/// Solve `d = x·e1 + y·e2` with Cramer's rule
#[inline]
pub fn solve_span(d: Vec2, e1: Vec2, e2: Vec2) -> Option<Vec2> {
    if is_degenerate_span(e1, e2) {
        return None;
    }
    let det = e1.perp_dot(e2);
    let x = d.perp_dot(e2) / det;
    let y = e1.perp_dot(d) / det;
    Some(Vec2::new(x, y))
}

/// Scale-aware parallel check, so rounding noise on parallel edges never
/// produces a spurious solution
#[inline]
fn is_degenerate_span(e1: Vec2, e2: Vec2) -> bool {
    let det = e1.perp_dot(e2);
    !det.is_finite() || det.abs() <= DEGENERATE_EPSILON * e1.length() * e2.length()
}
