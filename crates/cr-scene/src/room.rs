//! The static environment: the room box, its lamp and window, and the
//! shelf that holds display cards.
//!
//! The room node scales the unit cube up to room size, so its fixtures
//! (lamp, window) are placed in unit-room coordinates. The shelf hangs off
//! the scene root instead, so the cards on it are not stretched.

use cr_core::color::Color;
use cr_core::cube;
use cr_core::cylinder::Cylinder;
use cr_core::draw::DrawContext;
use cr_core::image::ImageTable;
use cr_core::lighting::{LightSource, Material};
use glam::Vec3;

use crate::slots::ImageSlot;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Room;

impl Room {
    /// Walls on every face but the open front, floor on the bottom.
    pub(crate) fn depict(&self, ctx: &mut dyn DrawContext, images: &ImageTable) {
        let wall = ImageSlot::Wall.image(images);
        for face in [cube::BACK, cube::RIGHT, cube::LEFT, cube::TOP] {
            cube::fill_face(ctx, face, wall);
        }
        cube::fill_face(ctx, cube::BOTTOM, ImageSlot::Floor.image(images));
    }
}

/// The room's light: a glowing cylinder that also drives a light slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Lamp {
    pub emission: Color,
    cylinder: Cylinder,
}

impl Lamp {
    pub fn new(sides: usize, emission: Color) -> Self {
        Self {
            emission,
            cylinder: Cylinder::new(sides, 0.0, 1.0),
        }
    }

    pub fn sides(&self) -> usize {
        self.cylinder.slices()
    }

    /// Shines from just above the top of the shade.
    pub fn light_source(&self) -> LightSource {
        LightSource::point(0.0, 1.1, 0.0, self.emission)
    }

    pub(crate) fn depict(&self, ctx: &mut dyn DrawContext) {
        ctx.set_material(&Material::emissive(self.emission));
        self.cylinder.fill(ctx, None);
        self.cylinder.fill_head(ctx);
        ctx.set_material(&Material::default());
    }
}

/// A view of the city through a framed pane on the back wall.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Window;

impl Window {
    pub(crate) fn depict(&self, ctx: &mut dyn DrawContext, images: &ImageTable) {
        cube::fill_rect(ctx, ImageSlot::City.image(images), cube::Facing::Forward);
        ctx.push_frame();
        ctx.translate(Vec3::new(0.0, 0.0, 0.01));
        cube::fill_rect(ctx, ImageSlot::Window.image(images), cube::Facing::Forward);
        ctx.pop_frame();
    }
}

/// A board the display cards stand on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shelf {
    pub capacity: usize,
    /// Board extent in scene units.
    pub width: f32,
    pub depth: f32,
}

impl Shelf {
    const THICKNESS: f32 = 0.04;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            width: 0.22 * capacity.max(1) as f32 + 0.04,
            depth: 0.3,
        }
    }

    /// Where the display card in `slot` stands, relative to the shelf.
    pub fn slot_position(&self, slot: usize) -> Vec3 {
        Vec3::new(0.13 + 0.22 * slot as f32, Self::THICKNESS, 0.1)
    }

    pub(crate) fn depict(&self, ctx: &mut dyn DrawContext, images: &ImageTable) {
        let wood = ImageSlot::Floor.image(images);
        ctx.push_frame();
        ctx.scale(Vec3::new(self.width, Self::THICKNESS, self.depth));
        for face in 0..6 {
            cube::fill_face(ctx, face, wood);
        }
        ctx.pop_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_core::draw::{DrawCommand, RecordingContext};

    #[test]
    fn room_leaves_the_front_open() {
        let table = ImageTable::sequential(ImageSlot::TABLE_LEN);
        let mut ctx = RecordingContext::new();
        Room.depict(&mut ctx, &table);
        assert_eq!(ctx.quads_with(ImageSlot::Wall.index() as u32).count(), 4);
        assert_eq!(ctx.quads_with(ImageSlot::Floor.index() as u32).count(), 1);
    }

    #[test]
    fn lamp_restores_the_default_material() {
        let lamp = Lamp::new(16, Color::grey8(160));
        let mut ctx = RecordingContext::new();
        lamp.depict(&mut ctx);
        let materials: Vec<_> = ctx
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Material(m) => Some(*m),
                _ => None,
            })
            .collect();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].emission, Color::grey8(160));
        assert_eq!(materials[1], Material::default());
    }

    #[test]
    fn shelf_slots_fit_on_the_board() {
        let shelf = Shelf::new(9);
        let last = shelf.slot_position(8);
        // A display card is 0.5 * 0.4 wide and centred on its slot.
        assert!(last.x + 0.1 <= shelf.width);
    }
}
