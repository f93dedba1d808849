//! Leaf payloads drawn on a card side: positioned images and text lines.
//!
//! Positions are in side-local coordinates: the unit square of the side's
//! face, before the side's own scale.

use crate::interaction::Interaction;
use crate::slots::ImageSlot;
use cr_core::cube::{self, Facing};
use cr_core::draw::DrawContext;
use cr_core::image::ImageTable;
use cr_core::record::Side;
use glam::{Vec2, Vec3};

/// Lift off the paper so decals don't z-fight with the face they sit on.
const DECAL_OFFSET: f32 = 0.05;

const LINE_SPACING: f32 = 0.12;

/// Which face of its side a decoration is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Visible while the card is closed.
    Outer,
    /// Visible once the card is open.
    Inner,
}

impl Face {
    /// The cube face a decoration on `side` / `self` sits on.
    pub fn cube_face(self, side: Side) -> usize {
        match (side, self) {
            (Side::Front, Face::Outer) | (Side::Back, Face::Inner) => cube::FRONT,
            (Side::Front, Face::Inner) | (Side::Back, Face::Outer) => cube::BACK,
        }
    }

    /// Depth of the plane just above that face, in side-local z.
    pub fn depth(self, side: Side) -> f32 {
        self.plane(side).0
    }

    /// Depth and orientation of the plane just above that face.
    fn plane(self, side: Side) -> (f32, Facing) {
        if self.cube_face(side) == cube::FRONT {
            (1.0 + DECAL_OFFSET, Facing::Forward)
        } else {
            (-DECAL_OFFSET, Facing::Backward)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardImage {
    pub slot: ImageSlot,
    pub side: Side,
    pub face: Face,
    /// Lower-left corner.
    pub position: Vec2,
    pub scale: f32,
    /// Leftward movement per frame while the card is open.
    pub drift: Option<f32>,
}

impl CardImage {
    pub fn new(slot: ImageSlot, side: Side, face: Face, position: Vec2, scale: f32) -> Self {
        Self {
            slot,
            side,
            face,
            position,
            scale,
            drift: None,
        }
    }

    #[must_use]
    pub fn drifting(mut self, step: f32) -> Self {
        self.drift = Some(step);
        self
    }

    pub(crate) fn change(&mut self, interaction: &Interaction) {
        if let Some(step) = self.drift
            && interaction.is_open
        {
            self.position.x -= step;
        }
    }

    pub(crate) fn depict(&self, ctx: &mut dyn DrawContext, images: &ImageTable) {
        let (z, facing) = self.face.plane(self.side);
        ctx.push_frame();
        ctx.translate(Vec3::new(self.position.x, self.position.y, z));
        ctx.scale(Vec3::new(self.scale, self.scale, 1.0));
        cube::fill_rect(ctx, self.slot.image(images), facing);
        ctx.pop_frame();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardText {
    pub lines: Vec<String>,
    pub side: Side,
    pub face: Face,
    /// Baseline start of the first line.
    pub origin: Vec2,
    pub scale: f32,
}

impl CardText {
    pub fn new(side: Side, face: Face, origin: Vec2, scale: f32) -> Self {
        Self {
            lines: Vec::new(),
            side,
            face,
            origin,
            scale,
        }
    }

    pub(crate) fn depict(&self, ctx: &mut dyn DrawContext) {
        let (z, _) = self.face.plane(self.side);
        for (i, line) in self.lines.iter().enumerate() {
            let origin = Vec3::new(
                self.origin.x,
                self.origin.y - i as f32 * LINE_SPACING,
                z,
            );
            ctx.draw_text_3d(line, origin, self.scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_core::draw::RecordingContext;

    #[test]
    fn inner_face_of_front_is_the_back_of_the_cube() {
        assert_eq!(Face::Inner.cube_face(Side::Front), cube::BACK);
        assert_eq!(Face::Inner.cube_face(Side::Back), cube::FRONT);
        assert_eq!(Face::Outer.cube_face(Side::Front), cube::FRONT);
    }

    #[test]
    fn drift_only_while_open() {
        let mut cloud =
            CardImage::new(ImageSlot::Cloud, Side::Front, Face::Inner, Vec2::new(0.5, 0.6), 0.2)
                .drifting(0.01);
        let mut interaction = Interaction::default();
        cloud.change(&interaction);
        assert_eq!(cloud.position.x, 0.5);
        interaction.is_open = true;
        cloud.change(&interaction);
        assert!(cloud.position.x < 0.5);
    }

    #[test]
    fn image_sits_at_its_position() {
        let table = ImageTable::sequential(ImageSlot::TABLE_LEN);
        let tree = CardImage::new(ImageSlot::Tree, Side::Back, Face::Inner, Vec2::new(0.5, 0.2), 0.25);
        let mut ctx = RecordingContext::new();
        tree.depict(&mut ctx, &table);
        assert_eq!(ctx.depth(), 0);
        let (quad, model) = ctx.quads_with(ImageSlot::Tree.index() as u32).next().unwrap();
        let corner = model.transform_point3(quad[1].position);
        assert!(corner.abs_diff_eq(Vec3::new(0.5, 0.2, 1.0 + DECAL_OFFSET), 1e-6));
    }

    #[test]
    fn text_lines_step_down() {
        let mut text = CardText::new(Side::Front, Face::Outer, Vec2::new(0.1, 0.8), 0.002);
        text.lines = vec!["Hello".into(), "Good Morning".into()];
        let mut ctx = RecordingContext::new();
        text.depict(&mut ctx);
        assert_eq!(ctx.texts().collect::<Vec<_>>(), ["Hello", "Good Morning"]);
    }
}
