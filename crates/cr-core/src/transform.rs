//! Affine transforms that a node stacks to define its local frame.
//!
//! A transform is an immutable value. Applying it forward and then inverse
//! to the same context restores the frame exactly (to float precision) for
//! every kind except [`Transform::Shear`], whose inverse is not provided.

use crate::draw::DrawContext;
use glam::{Mat4, Vec3, Vec4};

/// The six off-diagonal coefficients of a shear.
/// `k_yx` is how much x feeds into y, `k_xy` how much y feeds into x, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShearCoefficients {
    pub k_xy: f32,
    pub k_yx: f32,
    pub k_xz: f32,
    pub k_zx: f32,
    pub k_yz: f32,
    pub k_zy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate { offset: Vec3 },
    Scale { factors: Vec3 },
    /// Right-handed rotation of `degrees` around `axis`.
    Rotate { axis: Vec3, degrees: f32 },
    Shear(ShearCoefficients),
}

impl Transform {
    pub fn translate(dx: f32, dy: f32, dz: f32) -> Self {
        Transform::Translate {
            offset: Vec3::new(dx, dy, dz),
        }
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        Transform::Scale {
            factors: Vec3::new(sx, sy, sz),
        }
    }

    pub fn rotate(ux: f32, uy: f32, uz: f32, degrees: f32) -> Self {
        Transform::Rotate {
            axis: Vec3::new(ux, uy, uz),
            degrees,
        }
    }

    pub fn shear(k: ShearCoefficients) -> Self {
        Transform::Shear(k)
    }

    /// Apply to the context's current frame.
    pub fn apply_forward(&self, ctx: &mut dyn DrawContext) {
        match *self {
            Transform::Translate { offset } => ctx.translate(offset),
            Transform::Scale { factors } => ctx.scale(factors),
            Transform::Rotate { axis, degrees } => ctx.rotate(degrees, axis),
            Transform::Shear(k) => ctx.multiply(shear_matrix(&k)),
        }
    }

    /// Undo [`apply_forward`](Self::apply_forward). Does nothing for a shear:
    /// its inverse is not implemented.
    pub fn apply_inverse(&self, ctx: &mut dyn DrawContext) {
        match *self {
            Transform::Translate { offset } => ctx.translate(-offset),
            Transform::Scale { factors } => ctx.scale(factors.recip()),
            Transform::Rotate { axis, degrees } => ctx.rotate(-degrees, axis),
            Transform::Shear(_) => {
                log::trace!("shear inverse requested; not implemented, frame left unchanged");
            }
        }
    }

    /// The forward matrix.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Transform::Translate { offset } => Mat4::from_translation(offset),
            Transform::Scale { factors } => Mat4::from_scale(factors),
            Transform::Rotate { axis, degrees } => {
                Mat4::from_axis_angle(axis.normalize_or_zero(), degrees.to_radians())
            }
            Transform::Shear(k) => shear_matrix(&k),
        }
    }

    /// The inverse matrix, or `None` for a shear.
    pub fn inverse_matrix(&self) -> Option<Mat4> {
        match *self {
            Transform::Translate { offset } => Some(Mat4::from_translation(-offset)),
            Transform::Scale { factors } => Some(Mat4::from_scale(factors.recip())),
            Transform::Rotate { axis, degrees } => Some(Mat4::from_axis_angle(
                axis.normalize_or_zero(),
                (-degrees).to_radians(),
            )),
            Transform::Shear(_) => None,
        }
    }
}

/// Column-major shear matrix; column `i` is the image of basis vector `i`.
fn shear_matrix(k: &ShearCoefficients) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, k.k_yx, k.k_zx, 0.0),
        Vec4::new(k.k_xy, 1.0, k.k_zy, 0.0),
        Vec4::new(k.k_xz, k.k_yz, 1.0, 0.0),
        Vec4::W,
    )
}

/// Compose a transform stack into one matrix. The last-pushed transform is
/// the outermost: it is applied to the context first, so it acts on the
/// vertices last.
pub fn compose(stack: &[Transform]) -> Mat4 {
    stack
        .iter()
        .rev()
        .fold(Mat4::IDENTITY, |acc, t| acc * t.matrix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RecordingContext;

    fn samples() -> Vec<Transform> {
        vec![
            Transform::translate(0.0, -0.5, 0.5),
            Transform::scale(0.5, 0.8, 0.01),
            Transform::rotate(0.0, 1.0, 0.0, -2.0),
            Transform::rotate(1.0, 1.0, 0.0, 137.0),
        ]
    }

    #[test]
    fn forward_then_inverse_is_identity() {
        for t in samples() {
            let mut ctx = RecordingContext::new();
            ctx.translate(Vec3::new(3.0, -1.0, 2.0));
            let before = ctx.current();
            t.apply_forward(&mut ctx);
            t.apply_inverse(&mut ctx);
            assert!(
                ctx.current().abs_diff_eq(before, 1e-5),
                "{t:?} did not round-trip"
            );
        }
    }

    #[test]
    fn matrix_inverse_matches() {
        for t in samples() {
            let inv = t.inverse_matrix().unwrap();
            assert!((t.matrix() * inv).abs_diff_eq(Mat4::IDENTITY, 1e-5));
        }
    }

    #[test]
    fn shear_inverse_is_unavailable() {
        let shear = Transform::shear(ShearCoefficients {
            k_yx: 0.5,
            ..Default::default()
        });
        assert!(shear.inverse_matrix().is_none());

        let mut ctx = RecordingContext::new();
        shear.apply_forward(&mut ctx);
        let sheared = ctx.current();
        shear.apply_inverse(&mut ctx);
        assert_eq!(ctx.current(), sheared);
        // x feeds into y.
        assert_eq!(sheared.transform_point3(Vec3::X), Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn compose_matches_context_application_order() {
        let stack = samples();
        let mut ctx = RecordingContext::new();
        for t in stack.iter().rev() {
            t.apply_forward(&mut ctx);
        }
        assert!(ctx.current().abs_diff_eq(compose(&stack), 1e-5));
    }
}
