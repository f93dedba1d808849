//! Light slots, light sources, and surface materials.
//!
//! A node becomes a light source by claiming one of the eight hardware
//! light slots. This is not the same as setting the material of the
//! geometry it draws; use [`Material`] for that.

use crate::color::Color;
use glam::Vec4;

/// One of the eight fixed-function light slots (`0..=7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightSlot(u8);

impl LightSlot {
    pub const COUNT: u8 = 8;

    /// Returns `None` for anything outside `0..=7`.
    pub fn new(slot: u8) -> Option<Self> {
        (slot < Self::COUNT).then_some(Self(slot))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

/// Diffuse point light emitted from a node, in the node's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec4,
    pub diffuse: Color,
}

impl LightSource {
    pub fn point(x: f32, y: f32, z: f32, diffuse: Color) -> Self {
        Self {
            position: Vec4::new(x, y, z, 1.0),
            diffuse,
        }
    }
}

/// Surface material for lit geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    pub emission: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::rgba(0.2, 0.2, 0.2, 1.0),
            diffuse: Color::rgba(0.8, 0.8, 0.8, 1.0),
            specular: Color::rgba(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
            emission: Color::rgba(0.0, 0.0, 0.0, 1.0),
        }
    }
}

impl Material {
    /// Default material that glows with `emission`.
    pub fn emissive(emission: Color) -> Self {
        Self {
            emission,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_range() {
        assert_eq!(LightSlot::new(0).map(LightSlot::index), Some(0));
        assert_eq!(LightSlot::new(7).map(LightSlot::index), Some(7));
        assert!(LightSlot::new(8).is_none());
    }

    #[test]
    fn emissive_keeps_defaults() {
        let glow = Material::emissive(Color::grey8(160));
        assert_eq!(glow.diffuse, Material::default().diffuse);
        assert_eq!(glow.emission, Color::grey8(160));
    }
}
