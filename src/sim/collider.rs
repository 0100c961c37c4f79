//! Collider catalog: sampled point-cloud proxies for coarse collision tests
//!
//! A proxy stands in for a body's render geometry. Its points live in the
//! body's unit local space (unit sphere, or the [-1, 1]³ cube) and are fixed
//! at startup. Fidelity is bounded by sample density; that is accepted.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shape family of a proxy, selecting the overlap test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderKind {
    /// Unit sphere centered at the local origin
    Sphere,
    /// Axis-aligned cube spanning [-1, 1] on every local axis
    Cube,
}

impl ColliderKind {
    /// Overlap test for a point already expressed in the tested body's local frame
    #[inline]
    pub fn contains_local(&self, p: Vec3, leeway: f32) -> bool {
        match self {
            ColliderKind::Sphere => intersect_sphere(p, 1.0, leeway),
            ColliderKind::Cube => intersect_cube(p, leeway),
        }
    }
}

/// Named entries of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColliderId {
    /// Once-subdivided tetrahedron (10 points)
    SphereCoarse,
    /// Twice-subdivided tetrahedron (34 points)
    #[default]
    Sphere,
    /// Thrice-subdivided tetrahedron (130 points)
    SphereFine,
    /// Cube surface grid (26 points)
    Cube,
}

impl ColliderId {
    pub const ALL: [ColliderId; 4] = [
        ColliderId::SphereCoarse,
        ColliderId::Sphere,
        ColliderId::SphereFine,
        ColliderId::Cube,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColliderId::SphereCoarse => "sphere_coarse",
            ColliderId::Sphere => "sphere",
            ColliderId::SphereFine => "sphere_fine",
            ColliderId::Cube => "cube",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sphere_coarse" | "coarse" => Some(ColliderId::SphereCoarse),
            "sphere" => Some(ColliderId::Sphere),
            "sphere_fine" | "fine" => Some(ColliderId::SphereFine),
            "cube" | "box" => Some(ColliderId::Cube),
            _ => None,
        }
    }

    /// Like `from_str`, for config values that must name an entry
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| ConfigError::UnknownCollider(s.to_string()))
    }
}

/// A sampled geometric stand-in used for collision tests
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderProxy {
    pub kind: ColliderKind,
    sample_points: Vec<Vec3>,
    leeway: f32,
}

impl ColliderProxy {
    /// Build a proxy; negative or non-finite leeway is clamped to zero
    pub fn new(kind: ColliderKind, sample_points: Vec<Vec3>, leeway: f32) -> Self {
        let leeway = if leeway.is_finite() { leeway.max(0.0) } else { 0.0 };
        Self {
            kind,
            sample_points,
            leeway,
        }
    }

    /// Sphere proxy sampled by a subdivided tetrahedron
    pub fn sphere(subdivisions: u32, leeway: f32) -> Self {
        Self::new(ColliderKind::Sphere, subdivision_sphere(subdivisions), leeway)
    }

    /// Cube proxy sampled on a surface grid with `per_edge` points per edge
    pub fn cube(per_edge: u32, leeway: f32) -> Self {
        Self::new(ColliderKind::Cube, cube_surface(per_edge), leeway)
    }

    #[inline]
    pub fn sample_points(&self) -> &[Vec3] {
        &self.sample_points
    }

    #[inline]
    pub fn leeway(&self) -> f32 {
        self.leeway
    }
}

/// Fixed set of proxies, built once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct ColliderCatalog {
    proxies: HashMap<ColliderId, ColliderProxy>,
}

impl ColliderCatalog {
    /// Standard catalog with one leeway for every entry
    pub fn standard(leeway: f32) -> Self {
        let proxies = ColliderId::ALL
            .iter()
            .map(|&id| {
                let proxy = match id {
                    ColliderId::SphereCoarse => ColliderProxy::sphere(1, leeway),
                    ColliderId::Sphere => ColliderProxy::sphere(2, leeway),
                    ColliderId::SphereFine => ColliderProxy::sphere(3, leeway),
                    ColliderId::Cube => ColliderProxy::cube(3, leeway),
                };
                (id, proxy)
            })
            .collect();
        Self { proxies }
    }

    /// Look up a proxy. Every `ColliderId` is present in a catalog built by `standard`.
    pub fn get(&self, id: ColliderId) -> &ColliderProxy {
        &self.proxies[&id]
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl Default for ColliderCatalog {
    fn default() -> Self {
        Self::standard(crate::consts::COLLIDER_LEEWAY)
    }
}

/// Point-in-sphere test: |p|² ≤ (radius + leeway)²
#[inline]
pub fn intersect_sphere(p: Vec3, radius: f32, leeway: f32) -> bool {
    let r = radius + leeway;
    p.length_squared() <= r * r
}

/// Point-in-unit-cube test, inflated by `leeway` on every axis
#[inline]
pub fn intersect_cube(p: Vec3, leeway: f32) -> bool {
    let limit = 1.0 + leeway;
    p.abs().max_element() <= limit
}

/// Unique vertices of a tetrahedron subdivided `levels` times and projected onto
/// the unit sphere.
pub fn subdivision_sphere(levels: u32) -> Vec<Vec3> {
    let mut points: Vec<Vec3> = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ]
    .iter()
    .map(|v| v.normalize())
    .collect();
    let mut triangles: Vec<[usize; 3]> = vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];

    for _ in 0..levels {
        // Shared edges must reuse the same midpoint
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |a: usize, b: usize, points: &mut Vec<Vec3>| -> usize {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                points.push(((points[a] + points[b]) * 0.5).normalize());
                points.len() - 1
            })
        };

        let mut next = Vec::with_capacity(triangles.len() * 4);
        for [a, b, c] in triangles {
            let ab = midpoint(a, b, &mut points);
            let bc = midpoint(b, c, &mut points);
            let ca = midpoint(c, a, &mut points);
            next.extend_from_slice(&[[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]);
        }
        triangles = next;
    }

    points
}

/// Points of a `per_edge`³ lattice over [-1, 1]³ that lie on the cube surface
pub fn cube_surface(per_edge: u32) -> Vec<Vec3> {
    let n = per_edge.max(2);
    let coord = |i: u32| -1.0 + 2.0 * i as f32 / (n - 1) as f32;
    let mut points = Vec::new();
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let on_surface = [i, j, k].iter().any(|&c| c == 0 || c == n - 1);
                if on_surface {
                    points.push(Vec3::new(coord(i), coord(j), coord(k)));
                }
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdivision_counts() {
        assert_eq!(subdivision_sphere(0).len(), 4);
        assert_eq!(subdivision_sphere(1).len(), 10);
        assert_eq!(subdivision_sphere(2).len(), 34);
        assert_eq!(subdivision_sphere(3).len(), 130);
    }

    #[test]
    fn test_subdivision_points_on_unit_sphere() {
        for p in subdivision_sphere(2) {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cube_surface_counts() {
        assert_eq!(cube_surface(2).len(), 8);
        assert_eq!(cube_surface(3).len(), 26);
        for p in cube_surface(3) {
            assert!((p.abs().max_element() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_test_boundary() {
        assert!(intersect_sphere(Vec3::new(1.1, 0.0, 0.0), 1.0, 0.1));
        assert!(!intersect_sphere(Vec3::new(1.11, 0.0, 0.0), 1.0, 0.1));
    }

    #[test]
    fn test_cube_test_boundary() {
        assert!(intersect_cube(Vec3::new(1.0, -1.0, 1.0), 0.0));
        assert!(intersect_cube(Vec3::new(1.05, 0.0, 0.0), 0.1));
        assert!(!intersect_cube(Vec3::new(0.0, 0.0, -1.2), 0.1));
    }

    #[test]
    fn test_negative_leeway_clamped() {
        let proxy = ColliderProxy::sphere(1, -0.5);
        assert_eq!(proxy.leeway(), 0.0);
    }

    #[test]
    fn test_standard_catalog_has_every_id() {
        let catalog = ColliderCatalog::standard(0.1);
        assert_eq!(catalog.len(), ColliderId::ALL.len());
        for id in ColliderId::ALL {
            let proxy = catalog.get(id);
            assert_eq!(proxy.leeway(), 0.1);
            assert!(!proxy.sample_points().is_empty());
        }
        assert_eq!(catalog.get(ColliderId::Cube).kind, ColliderKind::Cube);
        assert_eq!(catalog.get(ColliderId::SphereFine).kind, ColliderKind::Sphere);
    }

    #[test]
    fn test_collider_id_names() {
        for id in ColliderId::ALL {
            assert_eq!(ColliderId::from_str(id.as_str()), Some(id));
        }
        assert_eq!(ColliderId::from_str("pyramid"), None);
    }

    #[test]
    fn test_parse_reports_unknown_name() {
        assert_eq!(ColliderId::parse("Box").ok(), Some(ColliderId::Cube));
        assert!(matches!(
            ColliderId::parse("pyramid"),
            Err(ConfigError::UnknownCollider(name)) if name == "pyramid"
        ));
    }
}
