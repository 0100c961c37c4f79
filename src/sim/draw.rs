//! Drawable enumeration for an external renderer
//!
//! The core never looks inside shapes or materials; it only hands back opaque
//! handles paired with transforms. The renderer decides what a handle means.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Opaque shape handle supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ShapeHandle(pub u32);

/// Opaque material handle supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MaterialHandle(pub u32);

/// One (shape, transform, material) triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub shape: ShapeHandle,
    pub transform: Mat4,
    pub material: MaterialHandle,
}

impl Drawable {
    pub fn new(shape: ShapeHandle, transform: Mat4, material: MaterialHandle) -> Self {
        Self {
            shape,
            transform,
            material,
        }
    }

    /// GPU-ready record for instanced upload
    pub fn instance(&self) -> DrawInstance {
        DrawInstance {
            model: self.transform.to_cols_array(),
            shape: self.shape.0,
            material: self.material.0,
            _pad: [0; 2],
        }
    }
}

/// Everything to draw this frame, split by render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawSets {
    /// Drawn sharp
    pub normal: Vec<Drawable>,
    /// Drawn into the glow (blurred) pass; may overlap `normal`
    pub blurred: Vec<Drawable>,
}

impl DrawSets {
    /// Add to both passes
    pub fn push_glowing(&mut self, drawable: Drawable) {
        self.normal.push(drawable);
        self.blurred.push(drawable);
    }
}

/// Instance data laid out for a vertex buffer (column-major model matrix)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct DrawInstance {
    pub model: [f32; 16],
    pub shape: u32,
    pub material: u32,
    _pad: [u32; 2],
}

/// Pack a draw list for upload
pub fn instance_bytes(drawables: &[Drawable]) -> Vec<u8> {
    let instances: Vec<DrawInstance> = drawables.iter().map(Drawable::instance).collect();
    bytemuck::cast_slice(&instances).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<DrawInstance>(), 80);
    }

    #[test]
    fn test_instance_bytes_carry_translation() {
        let d = Drawable::new(
            ShapeHandle(3),
            Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            MaterialHandle(7),
        );
        let bytes = instance_bytes(&[d, d]);
        assert_eq!(bytes.len(), 160);
        let instance = d.instance();
        assert_eq!(&bytes[80..], bytemuck::bytes_of(&instance));
        assert_eq!(instance.model[12..15], [1.0, 2.0, 3.0]);
        assert_eq!(instance.shape, 3);
        assert_eq!(instance.material, 7);
    }

    #[test]
    fn test_push_glowing_adds_to_both() {
        let mut sets = DrawSets::default();
        sets.push_glowing(Drawable::new(ShapeHandle(0), Mat4::IDENTITY, MaterialHandle(0)));
        assert_eq!(sets.normal.len(), 1);
        assert_eq!(sets.blurred.len(), 1);
    }
}
