//! Unit cube mesh, `[0,1]³`. Stateless; every function takes the context.

use crate::draw::{DrawContext, Vertex};
use crate::image::ImageHandle;
use glam::{Vec2, Vec3};

pub const FRONT: usize = 0;
pub const BACK: usize = 1;
pub const RIGHT: usize = 2;
pub const LEFT: usize = 3;
pub const TOP: usize = 4;
pub const BOTTOM: usize = 5;

pub const VERTICES: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

/// `FACES[i][j]` is the j-th vertex (counter-clockwise) of face i.
/// Order: front, back, right, left, top, bottom.
pub const FACES: [[usize; 4]; 6] = [
    [3, 0, 1, 2],
    [6, 5, 4, 7],
    [2, 1, 5, 6],
    [7, 4, 0, 3],
    [7, 3, 2, 6],
    [5, 1, 0, 4],
];

pub const NORMALS: [Vec3; 6] = [
    Vec3::Z,
    Vec3::NEG_Z,
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
];

pub const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 7],
    [7, 6],
    [6, 5],
    [5, 4],
    [1, 5],
    [6, 2],
    [3, 7],
    [4, 0],
];

/// Which way a flat decal faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Normal along +z.
    Forward,
    /// Normal along -z; the image is mirrored so it reads correctly from behind.
    Backward,
}

/// Fill every face without texture.
pub fn fill(ctx: &mut dyn DrawContext) {
    for (face, normal) in FACES.iter().zip(NORMALS) {
        let vertices: Vec<Vertex> = face
            .iter()
            .map(|&v| Vertex::new(VERTICES[v], normal, Vec2::ZERO))
            .collect();
        ctx.draw_polygon(&vertices);
    }
}

/// Draw the twelve edges as line segments.
pub fn edge(ctx: &mut dyn DrawContext) {
    let segments: Vec<[Vec3; 2]> = EDGES
        .iter()
        .map(|[a, b]| [VERTICES[*a], VERTICES[*b]])
        .collect();
    ctx.draw_lines(&segments);
}

/// Fill one face with an image stretched over it.
///
/// # Panics
/// If `face` is not in `0..6`.
pub fn fill_face(ctx: &mut dyn DrawContext, face: usize, image: ImageHandle) {
    let c = image.coords;
    let n = NORMALS[face];
    let f = FACES[face];
    let quad = [
        Vertex::new(VERTICES[f[0]], n, Vec2::new(c.left, c.top)),
        Vertex::new(VERTICES[f[1]], n, Vec2::new(c.left, c.bottom)),
        Vertex::new(VERTICES[f[2]], n, Vec2::new(c.right, c.bottom)),
        Vertex::new(VERTICES[f[3]], n, Vec2::new(c.right, c.top)),
    ];
    ctx.draw_textured_quad(&quad, image);
}

/// Draw an image on the unit square `[0,1]²` in the z=0 plane.
pub fn fill_rect(ctx: &mut dyn DrawContext, image: ImageHandle, facing: Facing) {
    let c = image.coords;
    let (n, l, r) = match facing {
        Facing::Forward => (Vec3::Z, c.left, c.right),
        Facing::Backward => (Vec3::NEG_Z, c.right, c.left),
    };
    let quad = [
        Vertex::new(Vec3::new(0.0, 1.0, 0.0), n, Vec2::new(l, c.top)),
        Vertex::new(Vec3::new(0.0, 0.0, 0.0), n, Vec2::new(l, c.bottom)),
        Vertex::new(Vec3::new(1.0, 0.0, 0.0), n, Vec2::new(r, c.bottom)),
        Vertex::new(Vec3::new(1.0, 1.0, 0.0), n, Vec2::new(r, c.top)),
    ];
    ctx.draw_textured_quad(&quad, image);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCommand, RecordingContext};

    #[test]
    fn face_normals_point_outward() {
        let center = Vec3::splat(0.5);
        for (face, normal) in FACES.iter().zip(NORMALS) {
            let corner = VERTICES[face[0]];
            assert!((corner - center).dot(normal) > 0.0);
        }
    }

    #[test]
    fn faces_are_counter_clockwise_seen_from_outside() {
        for (face, normal) in FACES.iter().zip(NORMALS) {
            let a = VERTICES[face[0]];
            let b = VERTICES[face[1]];
            let c = VERTICES[face[2]];
            assert!((b - a).cross(c - b).dot(normal) > 0.0);
        }
    }

    #[test]
    fn fill_face_uses_face_corners() {
        let mut ctx = RecordingContext::new();
        fill_face(&mut ctx, TOP, ImageHandle::new(5));
        match &ctx.commands()[0] {
            DrawCommand::Quad { image, quad, .. } => {
                assert_eq!(image.id, 5);
                assert!(quad.iter().all(|v| v.position.y == 1.0 && v.normal == Vec3::Y));
            }
            other => panic!("expected a quad, got {other:?}"),
        }
    }

    #[test]
    fn fill_and_edge_counts() {
        let mut ctx = RecordingContext::new();
        fill(&mut ctx);
        edge(&mut ctx);
        assert_eq!(ctx.commands().len(), 7);
        match ctx.commands().last() {
            Some(DrawCommand::Lines { segments, .. }) => assert_eq!(segments.len(), 12),
            other => panic!("expected lines, got {other:?}"),
        }
    }
}
