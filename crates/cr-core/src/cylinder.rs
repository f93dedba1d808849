//! Open cylinder of radius 1 around the y axis, with optional end caps.
//! Side and cap normals point away from the axis.

use crate::draw::{DrawContext, Vertex};
use crate::image::{ImageHandle, TexCoords};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    slices: usize,
    ymin: f32,
    ymax: f32,
    /// Even indices sit on `ymin`, odd indices on `ymax`.
    vertices: Vec<Vec3>,
    faces: Vec<[usize; 4]>,
    normals: Vec<Vec3>,
    edges: Vec<[usize; 2]>,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self::new(4, 0.0, 1.0)
    }
}

impl Cylinder {
    /// # Panics
    /// If `slices < 3`.
    pub fn new(slices: usize, ymin: f32, ymax: f32) -> Self {
        assert!(slices >= 3, "a cylinder needs at least 3 slices, got {slices}");

        let mut vertices = Vec::with_capacity(slices * 2);
        for i in 0..slices {
            let theta = i as f32 * TAU / slices as f32;
            let (x, z) = (theta.cos(), theta.sin());
            vertices.push(Vec3::new(x, ymin, -z));
            vertices.push(Vec3::new(x, ymax, -z));
        }

        let k = slices * 2;
        let mut faces = Vec::with_capacity(slices);
        let mut normals = Vec::with_capacity(slices);
        let mut edges = vec![[0, 0]; slices * 3];
        for i in 0..slices {
            let v0 = (i * 2) % k;
            let v1 = (i * 2 + 1) % k;
            let v2 = (i * 2 + 2) % k;
            let v3 = (i * 2 + 3) % k;
            faces.push([v3, v2, v0, v1]);

            let d = vertices[v2] - vertices[v0];
            normals.push(Vec3::new(-d.z, 0.0, d.x).normalize_or_zero());

            edges[i] = [v0, v1];
            edges[i + slices] = [v2, v0];
            edges[i + 2 * slices] = [v1, v3];
        }

        Self {
            slices,
            ymin,
            ymax,
            vertices,
            faces,
            normals,
            edges,
        }
    }

    pub fn slices(&self) -> usize {
        self.slices
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 4]] {
        &self.faces
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Fill the side wall. With an image, it wraps once around the
    /// circumference; without, each slice is a flat polygon.
    pub fn fill(&self, ctx: &mut dyn DrawContext, image: Option<ImageHandle>) {
        let Some(image) = image else {
            for (face, &n) in self.faces.iter().zip(&self.normals) {
                let quad: Vec<Vertex> = face
                    .iter()
                    .map(|&v| Vertex::new(self.vertices[v], n, Vec2::ZERO))
                    .collect();
                ctx.draw_polygon(&quad);
            }
            return;
        };

        let TexCoords {
            left,
            right,
            top,
            bottom,
        } = image.coords;
        let step = (right - left) / self.slices as f32;
        for (i, (face, &n)) in self.faces.iter().zip(&self.normals).enumerate() {
            let l = right - (i + 1) as f32 * step;
            let r = right - i as f32 * step;
            let quad = [
                Vertex::new(self.vertices[face[0]], n, Vec2::new(l, top)),
                Vertex::new(self.vertices[face[1]], n, Vec2::new(l, bottom)),
                Vertex::new(self.vertices[face[2]], n, Vec2::new(r, bottom)),
                Vertex::new(self.vertices[face[3]], n, Vec2::new(r, top)),
            ];
            ctx.draw_textured_quad(&quad, image);
        }
    }

    pub fn edge(&self, ctx: &mut dyn DrawContext) {
        let segments: Vec<[Vec3; 2]> = self
            .edges
            .iter()
            .map(|[a, b]| [self.vertices[*a], self.vertices[*b]])
            .collect();
        ctx.draw_lines(&segments);
    }

    /// Cap at `ymin`.
    pub fn fill_foot(&self, ctx: &mut dyn DrawContext) {
        self.fill_end(ctx, 0, Vec3::NEG_Y);
    }

    /// Cap at `ymax`.
    pub fn fill_head(&self, ctx: &mut dyn DrawContext) {
        self.fill_end(ctx, 1, Vec3::Y);
    }

    fn fill_end(&self, ctx: &mut dyn DrawContext, parity: usize, normal: Vec3) {
        let cap: Vec<Vertex> = (0..self.slices)
            .map(|i| {
                let v = self.vertices[i * 2 + parity];
                let uv = Vec2::new(0.5 * (v.x + 1.0), 0.5 * (v.z + 1.0));
                Vertex::new(v, normal, uv)
            })
            .collect();
        ctx.draw_polygon(&cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, RecordingContext};

    #[test]
    fn mesh_sizes() {
        let c = Cylinder::new(32, 0.0, 1.0);
        assert_eq!(c.vertices().len(), 64);
        assert_eq!(c.faces().len(), 32);
        assert_eq!(c.edges().len(), 96);
        assert_eq!(c.height(), 1.0);
    }

    #[test]
    fn normals_point_outward() {
        let c = Cylinder::new(8, -1.0, 1.0);
        for (face, n) in c.faces().iter().zip(c.normals()) {
            let mid = face.iter().map(|&v| c.vertices()[v]).sum::<Vec3>() / 4.0;
            assert!(mid.dot(*n) > 0.0, "normal {n:?} of face {face:?} points in");
        }
    }

    #[test]
    fn textured_fill_wraps_once() {
        let c = Cylinder::new(4, 0.0, 1.0);
        let mut ctx = RecordingContext::new();
        c.fill(&mut ctx, Some(ImageHandle::new(3)));
        let quads: Vec<_> = ctx.quads_with(3).collect();
        assert_eq!(quads.len(), 4);
        assert_eq!(quads[0].0[3].uv.x, 1.0);
        assert_eq!(quads[3].0[0].uv.x, 0.0);
    }

    #[test]
    fn caps_sit_on_their_ends() {
        let c = Cylinder::new(6, 0.0, 2.0);
        let mut ctx = RecordingContext::new();
        c.fill_foot(&mut ctx);
        c.fill_head(&mut ctx);
        let ys: Vec<f32> = ctx
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Polygon { vertices, .. } => Some(vertices[0].position.y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, [0.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "at least 3 slices")]
    fn degenerate_cylinder_is_rejected() {
        Cylinder::new(2, 0.0, 1.0);
    }
}
