//! The drawing context the scene graph renders into.
//!
//! The engine only issues calls; buffer swap, viewport and projection set-up
//! belong to the host. [`RecordingContext`] is an in-memory implementation
//! that tracks the frame stack with `glam` matrices and keeps a command log,
//! for tests and headless runs.

use crate::color::Color;
use crate::image::ImageHandle;
use crate::lighting::{LightSlot, LightSource, Material};
use glam::{Mat4, Vec2, Vec3};

/// A mesh vertex with its normal and texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub const fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Immediate-mode drawing surface with a stack of coordinate frames.
pub trait DrawContext {
    /// Save the current coordinate frame.
    fn push_frame(&mut self);
    /// Restore the most recently saved frame.
    fn pop_frame(&mut self);

    fn translate(&mut self, offset: Vec3);
    fn scale(&mut self, factors: Vec3);
    /// Rotate by `degrees` around `axis` (right-handed).
    fn rotate(&mut self, degrees: f32, axis: Vec3);
    /// Post-multiply the current frame by an arbitrary matrix.
    fn multiply(&mut self, matrix: Mat4);

    fn set_flat_color(&mut self, color: Color);
    fn set_material(&mut self, material: &Material);

    fn draw_textured_quad(&mut self, quad: &[Vertex; 4], image: ImageHandle);
    fn draw_polygon(&mut self, vertices: &[Vertex]);
    fn draw_lines(&mut self, segments: &[[Vec3; 2]]);
    fn draw_text_3d(&mut self, line: &str, origin: Vec3, scale: f32);

    fn enable_light(&mut self, slot: LightSlot, source: &LightSource);
    fn disable_light(&mut self, slot: LightSlot);
}

/// A draw call captured by [`RecordingContext`], stamped with the
/// model matrix that was current when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Color(Color),
    Material(Material),
    Quad {
        image: ImageHandle,
        quad: [Vertex; 4],
        model: Mat4,
    },
    Polygon {
        vertices: Vec<Vertex>,
        model: Mat4,
    },
    Lines {
        segments: Vec<[Vec3; 2]>,
        model: Mat4,
    },
    Text {
        line: String,
        origin: Vec3,
        scale: f32,
        model: Mat4,
    },
    LightOn {
        slot: LightSlot,
        source: LightSource,
        model: Mat4,
    },
    LightOff(LightSlot),
}

/// In-memory [`DrawContext`].
#[derive(Debug, Clone)]
pub struct RecordingContext {
    current: Mat4,
    stack: Vec<Mat4>,
    max_depth: usize,
    commands: Vec<DrawCommand>,
    lights: Vec<LightSlot>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            stack: Vec::new(),
            max_depth: 0,
            commands: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// The current model matrix.
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Number of saved frames.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Deepest frame stack seen since construction or the last [`clear`](Self::clear).
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Light slots currently switched on, in the order they were enabled.
    pub fn lit(&self) -> &[LightSlot] {
        &self.lights
    }

    /// Quads drawn with the image whose id is `image_id`.
    pub fn quads_with(&self, image_id: u32) -> impl Iterator<Item = (&[Vertex; 4], &Mat4)> {
        self.commands.iter().filter_map(move |cmd| match cmd {
            DrawCommand::Quad { image, quad, model } if image.id == image_id => Some((quad, model)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { line, .. } => Some(line.as_str()),
            _ => None,
        })
    }

    /// Forget recorded commands and reset the frame stack to identity.
    /// Lights that are still on stay on.
    pub fn clear(&mut self) {
        self.current = Mat4::IDENTITY;
        self.stack.clear();
        self.max_depth = 0;
        self.commands.clear();
    }

    /// Map a point from the current frame to world space.
    pub fn to_world(&self, point: Vec3) -> Vec3 {
        self.current.transform_point3(point)
    }
}

impl DrawContext for RecordingContext {
    fn push_frame(&mut self) {
        self.stack.push(self.current);
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    /// # Panics
    /// If there is no saved frame.
    fn pop_frame(&mut self) {
        match self.stack.pop() {
            Some(saved) => self.current = saved,
            None => panic!("pop_frame without a matching push_frame"),
        }
    }

    fn translate(&mut self, offset: Vec3) {
        self.current *= Mat4::from_translation(offset);
    }

    fn scale(&mut self, factors: Vec3) {
        self.current *= Mat4::from_scale(factors);
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.current *= Mat4::from_axis_angle(axis.normalize_or_zero(), degrees.to_radians());
    }

    fn multiply(&mut self, matrix: Mat4) {
        self.current *= matrix;
    }

    fn set_flat_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::Color(color));
    }

    fn set_material(&mut self, material: &Material) {
        self.commands.push(DrawCommand::Material(*material));
    }

    fn draw_textured_quad(&mut self, quad: &[Vertex; 4], image: ImageHandle) {
        self.commands.push(DrawCommand::Quad {
            image,
            quad: *quad,
            model: self.current,
        });
    }

    fn draw_polygon(&mut self, vertices: &[Vertex]) {
        self.commands.push(DrawCommand::Polygon {
            vertices: vertices.to_vec(),
            model: self.current,
        });
    }

    fn draw_lines(&mut self, segments: &[[Vec3; 2]]) {
        self.commands.push(DrawCommand::Lines {
            segments: segments.to_vec(),
            model: self.current,
        });
    }

    fn draw_text_3d(&mut self, line: &str, origin: Vec3, scale: f32) {
        self.commands.push(DrawCommand::Text {
            line: line.to_string(),
            origin,
            scale,
            model: self.current,
        });
    }

    fn enable_light(&mut self, slot: LightSlot, source: &LightSource) {
        if !self.lights.contains(&slot) {
            self.lights.push(slot);
        }
        self.commands.push(DrawCommand::LightOn {
            slot,
            source: *source,
            model: self.current,
        });
    }

    fn disable_light(&mut self, slot: LightSlot) {
        self.lights.retain(|s| *s != slot);
        self.commands.push(DrawCommand::LightOff(slot));
    }
}
