//! One side of a card: a thin paper slab carrying trees, clouds, plain
//! images and a block of text.
//!
//! Decorations are child nodes. The side keeps typed lists of them (trees
//! as canopy/trunk pairs) so they can be addressed by insertion index. The
//! mutation entry points here do not enforce [`TREE_BOUNDS`](crate::card::TREE_BOUNDS);
//! the editor does.

use crate::decoration::{CardImage, CardText, Face};
use crate::interaction::FrameContext;
use crate::node::{Scene, SceneNode};
use crate::slots::ImageSlot;
use cr_core::color::Color;
use cr_core::cube;
use cr_core::draw::DrawContext;
use cr_core::image::ImageTable;
use cr_core::record::Side;
use cr_core::transform::Transform;
use cr_core::{Node, NodeId, NodeIndex};
use glam::{Vec2, Vec3};

/// Dimensions of a side slab in card units.
pub const SIDE_WIDTH: f32 = 0.5;
pub const SIDE_HEIGHT: f32 = 0.8;
pub const SIDE_THICKNESS: f32 = 0.01;

/// The inside shade drops one level every this many open frames.
pub const TINT_PERIOD: u32 = 3;
/// Below this level the inside snaps back to full brightness.
pub const TINT_FLOOR: u8 = 25;

const OUTLINE_COLOR: Color = Color::rgb8(255, 215, 0);

/// The two image nodes that make up one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNodes {
    pub canopy: NodeIndex,
    pub trunk: NodeIndex,
}

/// A square drawn around the selected tree, in side-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub corner: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardSide {
    pub side: Side,
    /// Outer color (paper tint).
    pub color: Color,
    /// Grey level of the inner face, cycled while the card is open.
    pub inside_shade: u8,
    pub outline: Option<Outline>,
    tint_clock: u32,
    /// Sides of the main card animate; display cards are still.
    live: bool,
    trees: Vec<TreeNodes>,
    clouds: Vec<NodeIndex>,
    images: Vec<NodeIndex>,
    text: Option<NodeIndex>,
    /// Clouds that crossed the left edge this frame, waiting for the card
    /// to move them to the other side.
    drifted: Vec<NodeIndex>,
}

impl CardSide {
    pub fn new(side: Side, color: Color, live: bool) -> Self {
        Self {
            side,
            color,
            inside_shade: 255,
            outline: None,
            tint_clock: 0,
            live,
            trees: Vec::new(),
            clouds: Vec::new(),
            images: Vec::new(),
            text: None,
            drifted: Vec::new(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn trees(&self) -> &[TreeNodes] {
        &self.trees
    }

    pub fn clouds(&self) -> &[NodeIndex] {
        &self.clouds
    }

    pub fn images(&self) -> &[NodeIndex] {
        &self.images
    }

    pub(crate) fn take_drifted(&mut self) -> Vec<NodeIndex> {
        std::mem::take(&mut self.drifted)
    }

    pub(crate) fn adopt_cloud(&mut self, cloud: NodeIndex) {
        self.clouds.push(cloud);
    }

    /// Advance the day/night tint by one open frame.
    fn tick_tint(&mut self) {
        self.tint_clock = (self.tint_clock + 1) % TINT_PERIOD;
        if self.tint_clock == 0 {
            self.inside_shade -= 1;
            if self.inside_shade < TINT_FLOOR {
                self.inside_shade = 255;
            }
        }
    }

    pub(crate) fn depict(&self, ctx: &mut dyn DrawContext, images: &ImageTable) {
        let paper = ImageSlot::Paper.image(images);
        let inner = Face::Inner.cube_face(self.side);

        ctx.set_flat_color(self.color);
        for face in (0..6).filter(|f| *f != inner) {
            cube::fill_face(ctx, face, paper);
        }
        ctx.set_flat_color(Color::grey8(self.inside_shade));
        cube::fill_face(ctx, inner, paper);

        if let Some(Outline { corner, size }) = self.outline {
            let z = Face::Inner.depth(self.side);
            let a = Vec3::new(corner.x, corner.y, z);
            let b = Vec3::new(corner.x + size, corner.y, z);
            let c = Vec3::new(corner.x + size, corner.y + size, z);
            let d = Vec3::new(corner.x, corner.y + size, z);
            ctx.set_flat_color(OUTLINE_COLOR);
            ctx.draw_lines(&[[a, b], [b, c], [c, d], [d, a]]);
        }
        ctx.set_flat_color(Color::WHITE);
    }
}

// ─── Construction ────────────────────────────────────────────────────────

fn label(prefix: &str) -> NodeId {
    NodeId::with_prefix(prefix)
}

/// Create a side under `card`, with an empty text block.
pub fn spawn_side(scene: &mut Scene, card: NodeIndex, which: Side, color: Color, live: bool) -> NodeIndex {
    let name = match which {
        Side::Front => "front",
        Side::Back => "back",
    };
    let mut node = Node::new(label(name), SceneNode::Side(CardSide::new(which, color, live)))
        .with_transform(Transform::scale(SIDE_WIDTH, SIDE_HEIGHT, SIDE_THICKNESS));
    if which == Side::Back {
        // Just behind the front slab.
        node.push_transform(Transform::translate(0.0, 0.0, -SIDE_THICKNESS * 1.01));
    }
    let idx = scene.add_node(card, node);

    let (face, origin) = match which {
        Side::Front => (Face::Outer, Vec2::new(0.1, 0.85)),
        Side::Back => (Face::Inner, Vec2::new(0.1, 0.9)),
    };
    let text = scene.add_node(
        idx,
        Node::new(label("text"), SceneNode::Text(CardText::new(which, face, origin, 0.002))),
    );
    side_mut(scene, idx).text = Some(text);
    idx
}

// ─── Access ──────────────────────────────────────────────────────────────

/// # Panics
/// If `idx` is not a card side.
pub fn side_ref(scene: &Scene, idx: NodeIndex) -> &CardSide {
    match scene[idx].behavior.as_side() {
        Some(side) => side,
        None => panic!("{} is not a card side", scene[idx].id),
    }
}

/// # Panics
/// If `idx` is not a card side.
pub fn side_mut(scene: &mut Scene, idx: NodeIndex) -> &mut CardSide {
    let id = scene[idx].id;
    match scene[idx].behavior.as_side_mut() {
        Some(side) => side,
        None => panic!("{id} is not a card side"),
    }
}

fn image_ref(scene: &Scene, idx: NodeIndex) -> &CardImage {
    match scene[idx].behavior.as_image() {
        Some(image) => image,
        None => panic!("{} is not a card image", scene[idx].id),
    }
}

fn image_mut(scene: &mut Scene, idx: NodeIndex) -> &mut CardImage {
    let id = scene[idx].id;
    match scene[idx].behavior.as_image_mut() {
        Some(image) => image,
        None => panic!("{id} is not a card image"),
    }
}

// ─── Trees ───────────────────────────────────────────────────────────────

/// Append a tree at `(x, y)` on the side's inner face. Returns its index.
pub fn add_tree(scene: &mut Scene, side: NodeIndex, x: f32, y: f32, scale: f32) -> usize {
    let which = side_ref(scene, side).side;
    let at = Vec2::new(x, y);
    let trunk = scene.add_node(
        side,
        Node::new(
            label("trunk"),
            SceneNode::Image(CardImage::new(ImageSlot::Trunk, which, Face::Inner, at, scale)),
        ),
    );
    let canopy = scene.add_node(
        side,
        Node::new(
            label("tree"),
            SceneNode::Image(CardImage::new(ImageSlot::Tree, which, Face::Inner, at, scale)),
        ),
    );
    let s = side_mut(scene, side);
    s.trees.push(TreeNodes { canopy, trunk });
    log::debug!("tree {} added on the {:?} side at ({x}, {y})", s.trees.len() - 1, which);
    s.trees.len() - 1
}

/// Move tree `index` to `(x, y)`.
///
/// # Panics
/// If `index` is out of range.
pub fn set_tree_position(scene: &mut Scene, side: NodeIndex, index: usize, x: f32, y: f32) {
    let s = side_ref(scene, side);
    let Some(tree) = s.trees.get(index).copied() else {
        panic!("tree index {index} out of range ({} trees)", s.trees.len());
    };
    for part in [tree.canopy, tree.trunk] {
        image_mut(scene, part).position = Vec2::new(x, y);
    }
}

pub fn tree_position(scene: &Scene, side: NodeIndex, index: usize) -> Option<Vec2> {
    let tree = side_ref(scene, side).trees.get(index)?;
    Some(image_ref(scene, tree.canopy).position)
}

pub fn tree_positions(scene: &Scene, side: NodeIndex) -> Vec<Vec2> {
    side_ref(scene, side)
        .trees
        .iter()
        .map(|t| image_ref(scene, t.canopy).position)
        .collect()
}

pub fn tree_scale(scene: &Scene, side: NodeIndex, index: usize) -> Option<f32> {
    let tree = side_ref(scene, side).trees.get(index)?;
    Some(image_ref(scene, tree.canopy).scale)
}

pub fn tree_count(scene: &Scene, side: NodeIndex) -> usize {
    side_ref(scene, side).trees.len()
}

/// Remove tree `index`. Later trees shift down by one. Returns whether a
/// tree was removed.
pub fn remove_tree(scene: &mut Scene, side: NodeIndex, index: usize) -> bool {
    let s = side_mut(scene, side);
    if index >= s.trees.len() {
        return false;
    }
    let tree = s.trees.remove(index);
    scene.remove_subtree(tree.canopy);
    scene.remove_subtree(tree.trunk);
    true
}

pub fn clear_trees(scene: &mut Scene, side: NodeIndex) {
    let trees = std::mem::take(&mut side_mut(scene, side).trees);
    for tree in trees {
        scene.remove_subtree(tree.canopy);
        scene.remove_subtree(tree.trunk);
    }
}

// ─── Clouds, images, text ────────────────────────────────────────────────

/// Add a cloud on the side's inner face. `drift` is its per-frame step.
pub fn add_cloud(
    scene: &mut Scene,
    side: NodeIndex,
    x: f32,
    y: f32,
    scale: f32,
    drift: Option<f32>,
) -> NodeIndex {
    let which = side_ref(scene, side).side;
    let mut cloud = CardImage::new(ImageSlot::Cloud, which, Face::Inner, Vec2::new(x, y), scale);
    cloud.drift = drift;
    let idx = scene.add_node(side, Node::new(label("cloud"), SceneNode::Image(cloud)));
    side_mut(scene, side).clouds.push(idx);
    idx
}

pub fn cloud_positions(scene: &Scene, side: NodeIndex) -> Vec<Vec2> {
    side_ref(scene, side)
        .clouds
        .iter()
        .map(|c| image_ref(scene, *c).position)
        .collect()
}

/// Add a static image.
pub fn add_image(
    scene: &mut Scene,
    side: NodeIndex,
    slot: ImageSlot,
    face: Face,
    position: Vec2,
    scale: f32,
) -> NodeIndex {
    let which = side_ref(scene, side).side;
    let image = CardImage::new(slot, which, face, position, scale);
    let idx = scene.add_node(side, Node::new(label("image"), SceneNode::Image(image)));
    side_mut(scene, side).images.push(idx);
    idx
}

fn text_node(scene: &Scene, side: NodeIndex) -> NodeIndex {
    match side_ref(scene, side).text {
        Some(idx) => idx,
        None => panic!("{} has no text block", scene[side].id),
    }
}

pub fn set_text(scene: &mut Scene, side: NodeIndex, lines: &[String]) {
    let idx = text_node(scene, side);
    if let SceneNode::Text(text) = &mut scene[idx].behavior
        && text.lines != lines
    {
        text.lines = lines.to_vec();
    }
}

pub fn text(scene: &Scene, side: NodeIndex) -> &[String] {
    let idx = text_node(scene, side);
    match &scene[idx].behavior {
        SceneNode::Text(text) => &text.lines,
        _ => &[],
    }
}

// ─── Per-frame ───────────────────────────────────────────────────────────

/// Tint the inside and collect clouds that drifted off the left edge.
/// Runs after the clouds themselves have moved.
pub(crate) fn change(scene: &mut Scene, idx: NodeIndex, frame: &mut FrameContext) {
    let s = side_mut(scene, idx);
    if !s.is_live() || !frame.interaction.is_open {
        return;
    }
    s.tick_tint();

    let clouds = s.clouds.clone();
    let gone: Vec<NodeIndex> = clouds
        .into_iter()
        .filter(|c| image_ref(scene, *c).position.x <= 0.0)
        .collect();
    if gone.is_empty() {
        return;
    }
    for cloud in &gone {
        scene.remove(idx, *cloud);
    }
    let s = side_mut(scene, idx);
    s.clouds.retain(|c| !gone.contains(c));
    log::trace!("{} clouds left the {:?} side", gone.len(), s.side);
    s.drifted.extend(gone);
}
