//! The card: two sides joined at a hinge along their left edge.
//!
//! The main card (`card_index == 0`) follows the interaction state every
//! frame; display cards (`card_index > 0`) are static snapshots of a
//! saved design and stay closed.
//!
//! Opening is animated incrementally: each frame pushes one more
//! `OPEN_STEP` rotation onto the front side's transform stack rather than
//! recomputing the stack from the absolute angle. Closing pops the last
//! step, so the stack never holds more than `MAX_OPEN / OPEN_STEP` hinge
//! rotations and always sums to the open angle.

use crate::interaction::{FrameContext, Interaction, Selection, default_front_text, default_inside_text};
use crate::node::{Scene, SceneNode};
use crate::palette;
use crate::side::{self, Outline, SIDE_WIDTH};
use crate::slots::ImageSlot;
use crate::decoration::Face;
use crate::error::SceneError;
use cr_core::record::{CardRecord, Placement, Side};
use cr_core::transform::Transform;
use cr_core::{Node, NodeId, NodeIndex};
use glam::{Vec2, Vec3};
use rand::Rng;

/// Degrees the cover turns per frame.
pub const OPEN_STEP: i32 = 2;
pub const MAX_OPEN: i32 = 180;

/// The cover turns about -y so a positive angle swings it towards the viewer.
pub const HINGE_AXIS: Vec3 = Vec3::NEG_Y;

/// Leftward cloud movement per open frame.
pub const CLOUD_STEP: f32 = 0.002;
/// Where a cloud reappears after leaving the other side.
pub const CLOUD_WRAP_X: f32 = 0.7;

pub const DEFAULT_TREE_SCALE: f32 = 0.25;

/// Trees a reset card starts with, all on the front side.
pub const CANONICAL_TREES: [(f32, f32); 3] = [(0.5, 0.2), (0.1, 0.35), (0.5, 0.3)];

/// Where the main card is held, in scene units.
pub const HAND_POSITION: Vec3 = Vec3::new(0.0, -0.5, 0.5);

/// Axis-aligned rectangle in side-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Positions a tree may be moved to.
pub const TREE_BOUNDS: Bounds = Bounds {
    min: Vec2::new(0.0, 0.0),
    max: Vec2::new(0.75, 0.7),
};

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: u32,
    /// 0 for the main card.
    pub card_index: usize,
    pub color_index: usize,
    pub front: NodeIndex,
    pub back: NodeIndex,
    /// Card-frame position and uniform size.
    pub placement: Vec3,
    pub size: f32,
    open_angle: i32,
    /// Length of the front side's stack before any hinge rotation.
    hinge_base: usize,
    flipped: bool,
}

impl Card {
    pub fn is_main(&self) -> bool {
        self.card_index == 0
    }

    pub fn open_angle(&self) -> i32 {
        self.open_angle
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn side(&self, which: Side) -> NodeIndex {
        match which {
            Side::Front => self.front,
            Side::Back => self.back,
        }
    }
}

// ─── Access ──────────────────────────────────────────────────────────────

/// # Panics
/// If `idx` is not a card.
pub fn card_ref(scene: &Scene, idx: NodeIndex) -> &Card {
    match scene[idx].behavior.as_card() {
        Some(card) => card,
        None => panic!("{} is not a card", scene[idx].id),
    }
}

/// # Panics
/// If `idx` is not a card.
pub fn card_mut(scene: &mut Scene, idx: NodeIndex) -> &mut Card {
    let id = scene[idx].id;
    match scene[idx].behavior.as_card_mut() {
        Some(card) => card,
        None => panic!("{id} is not a card"),
    }
}

pub fn open_angle(scene: &Scene, idx: NodeIndex) -> i32 {
    card_ref(scene, idx).open_angle
}

// ─── Construction ────────────────────────────────────────────────────────

/// Build a card with the default design under `parent`.
///
/// The main card (`card_index == 0`) is live: its sides tint and its
/// clouds drift while it is open.
pub fn spawn_card(scene: &mut Scene, parent: NodeIndex, card_index: usize) -> NodeIndex {
    let id = rand::rng().random_range(0..1000);
    let idx = spawn_blank(scene, parent, card_index, id, 0);
    let front = card_ref(scene, idx).front;
    side::set_text(scene, front, &default_front_text());
    let back = card_ref(scene, idx).back;
    side::set_text(scene, back, &default_inside_text());
    plant_canonical_trees(scene, front);
    log::debug!("card {id} spawned in slot {card_index}");
    idx
}

/// Build a card from a saved design under `parent`.
pub fn spawn_card_from_record(
    scene: &mut Scene,
    parent: NodeIndex,
    card_index: usize,
    record: &CardRecord,
) -> Result<NodeIndex, SceneError> {
    if palette::card_color(record.color_index).is_none() {
        return Err(SceneError::UnknownColor(record.color_index));
    }
    let idx = spawn_blank(scene, parent, card_index, record.id, record.color_index);
    apply_record(scene, idx, record)?;
    log::debug!("card {} loaded into slot {card_index}", record.id);
    Ok(idx)
}

/// The card node, both sides, and the fixed decorations every card
/// carries (cover decal, sun, one cloud per side).
fn spawn_blank(scene: &mut Scene, parent: NodeIndex, card_index: usize, id: u32, color_index: usize) -> NodeIndex {
    let live = card_index == 0;
    let color = palette::CARD_COLORS[color_index];
    let placeholder = Card {
        id,
        card_index,
        color_index,
        front: parent,
        back: parent,
        placement: HAND_POSITION,
        size: 1.0,
        open_angle: 0,
        hinge_base: 0,
        flipped: false,
    };
    let idx = scene.add_node(
        parent,
        Node::new(NodeId::with_prefix("card"), SceneNode::Card(placeholder)),
    );
    let front = side::spawn_side(scene, idx, Side::Front, color, live);
    let back = side::spawn_side(scene, idx, Side::Back, color, live);
    let hinge_base = scene[front].transforms().len();
    {
        let card = card_mut(scene, idx);
        card.front = front;
        card.back = back;
        card.hinge_base = hinge_base;
    }
    restack(scene, idx);

    let drift = live.then_some(CLOUD_STEP);
    side::add_image(scene, front, ImageSlot::FrontDecal, Face::Outer, Vec2::new(0.2, 0.15), 0.6);
    side::add_image(scene, back, ImageSlot::Sun, Face::Inner, Vec2::new(0.7, 0.75), 0.2);
    side::add_cloud(scene, front, 0.6, 0.75, 0.25, drift);
    side::add_cloud(scene, back, 0.3, 0.7, 0.25, drift);
    idx
}

fn plant_canonical_trees(scene: &mut Scene, front: NodeIndex) {
    for (x, y) in CANONICAL_TREES {
        side::add_tree(scene, front, x, y, DEFAULT_TREE_SCALE);
    }
}

/// Rebuild the card node's own stack from its placement, size and flip.
fn restack(scene: &mut Scene, idx: NodeIndex) {
    let card = card_ref(scene, idx);
    let (placement, size, flipped) = (card.placement, card.size, card.flipped);
    let node = &mut scene[idx];
    node.truncate_transforms(0);
    // Innermost: center the card on its vertical axis.
    node.push_transform(Transform::translate(-SIDE_WIDTH / 2.0, 0.0, 0.0));
    if flipped {
        node.push_transform(Transform::rotate(0.0, 1.0, 0.0, 180.0));
    }
    if size != 1.0 {
        node.push_transform(Transform::scale(size, size, size));
    }
    node.push_transform(Transform::translate(placement.x, placement.y, placement.z));
}

/// Move and resize a card.
pub fn place_card(scene: &mut Scene, idx: NodeIndex, placement: Vec3, size: f32) {
    let card = card_mut(scene, idx);
    card.placement = placement;
    card.size = size;
    restack(scene, idx);
}

// ─── Records ─────────────────────────────────────────────────────────────

/// Snapshot a card's design.
pub fn card_record(scene: &Scene, idx: NodeIndex) -> CardRecord {
    let card = card_ref(scene, idx);
    let mut placements = Vec::new();
    for which in [Side::Front, Side::Back] {
        for p in side::tree_positions(scene, card.side(which)) {
            placements.push(Placement {
                side: which,
                x: p.x,
                y: p.y,
            });
        }
    }
    CardRecord {
        id: card.id,
        color_index: card.color_index,
        front_text: side::text(scene, card.front).to_vec(),
        inside_text: side::text(scene, card.back).to_vec(),
        placements,
    }
}

/// Replace a card's color, text and trees with a saved design. The card
/// keeps its own id.
pub fn apply_record(scene: &mut Scene, idx: NodeIndex, record: &CardRecord) -> Result<(), SceneError> {
    let Some(color) = palette::card_color(record.color_index) else {
        return Err(SceneError::UnknownColor(record.color_index));
    };
    let (front, back) = {
        let card = card_mut(scene, idx);
        card.color_index = record.color_index;
        (card.front, card.back)
    };
    for s in [front, back] {
        side::side_mut(scene, s).color = color;
        side::clear_trees(scene, s);
    }
    side::set_text(scene, front, &record.front_text);
    side::set_text(scene, back, &record.inside_text);
    for p in &record.placements {
        let target = if p.side == Side::Front { front } else { back };
        side::add_tree(scene, target, p.x, p.y, DEFAULT_TREE_SCALE);
    }
    Ok(())
}

// ─── Per-frame ───────────────────────────────────────────────────────────

pub(crate) fn change(scene: &mut Scene, idx: NodeIndex, frame: &mut FrameContext) {
    let is_main = card_ref(scene, idx).is_main();

    if is_main {
        if frame.take_reset() {
            reset(scene, idx, &mut frame.interaction);
        }
        refresh(scene, idx, &frame.interaction);
        clamp_selection(scene, idx, &mut frame.interaction.selection);
    }
    outline_selection(scene, idx, &frame.interaction, is_main);
    swing(scene, idx, is_main && frame.interaction.is_open);
    rehome_clouds(scene, idx);
    if is_main {
        flip(scene, idx, !frame.interaction.show_front);
    }
}

/// Back to the default design: first color, default text, canonical trees.
fn reset(scene: &mut Scene, idx: NodeIndex, interaction: &mut Interaction) {
    interaction.color_index = 0;
    interaction.front_text = default_front_text();
    interaction.inside_text = default_inside_text();
    interaction.selection = Selection::default();

    let (front, back) = {
        let card = card_ref(scene, idx);
        (card.front, card.back)
    };
    side::clear_trees(scene, front);
    side::clear_trees(scene, back);
    plant_canonical_trees(scene, front);
    log::info!("main card reset to the default design");
}

/// Copy the live color and text onto the main card.
fn refresh(scene: &mut Scene, idx: NodeIndex, interaction: &Interaction) {
    let color_index = match palette::card_color(interaction.color_index) {
        Some(_) => interaction.color_index,
        None => {
            log::warn!("color index {} out of range, using 0", interaction.color_index);
            0
        }
    };
    let color = palette::CARD_COLORS[color_index];
    let (front, back) = {
        let card = card_mut(scene, idx);
        card.color_index = color_index;
        (card.front, card.back)
    };
    side::side_mut(scene, front).color = color;
    side::side_mut(scene, back).color = color;
    side::set_text(scene, front, &interaction.front_text);
    side::set_text(scene, back, &interaction.inside_text);
}

/// Keep the selection pointing at an existing tree. A selection past the
/// end of its side goes back to the first tree there, or to the first
/// tree of the other side if its own side has none.
fn clamp_selection(scene: &Scene, idx: NodeIndex, selection: &mut Selection) {
    let card = card_ref(scene, idx);
    let here = side::tree_count(scene, card.side(selection.side));
    if selection.index < here {
        return;
    }
    let there = side::tree_count(scene, card.side(selection.side.opposite()));
    if here == 0 && there > 0 {
        selection.side = selection.side.opposite();
    }
    if selection.index != 0 {
        log::debug!("selection {} past the end, clamped", selection.index);
    }
    selection.index = 0;
}

fn outline_selection(scene: &mut Scene, idx: NodeIndex, interaction: &Interaction, is_main: bool) {
    let card = card_ref(scene, idx);
    let (front, back) = (card.front, card.back);
    for (which, s) in [(Side::Front, front), (Side::Back, back)] {
        let selected = is_main && interaction.edit_mode && interaction.selection.side == which;
        let outline = if selected {
            let i = interaction.selection.index;
            side::tree_position(scene, s, i)
                .zip(side::tree_scale(scene, s, i))
                .map(|(corner, size)| Outline { corner, size })
        } else {
            None
        };
        side::side_mut(scene, s).outline = outline;
    }
}

/// Move the cover one step toward open or closed.
fn swing(scene: &mut Scene, idx: NodeIndex, open: bool) {
    let card = card_mut(scene, idx);
    let before = card.open_angle;
    let after = if open {
        (before + OPEN_STEP).min(MAX_OPEN)
    } else {
        (before - OPEN_STEP).max(0)
    };
    if after == before {
        return;
    }
    card.open_angle = after;
    let (front, hinge_base) = (card.front, card.hinge_base);

    // Everything above `hinge_base` is one opening step, so closing by a
    // step is undoing the last one.
    let node = &mut scene[front];
    if open || node.transforms().len() <= hinge_base {
        node.push_transform(Transform::Rotate {
            axis: HINGE_AXIS,
            degrees: (after - before) as f32,
        });
    } else {
        node.pop_transform();
    }
    if after == 0 {
        scene[front].truncate_transforms(hinge_base);
        log::debug!("card closed");
    } else if after == MAX_OPEN {
        log::debug!("card open");
    }
}

/// Hand clouds that drifted off one side to the other side, at the far
/// edge and the same height.
fn rehome_clouds(scene: &mut Scene, idx: NodeIndex) {
    let card = card_ref(scene, idx);
    let (front, back) = (card.front, card.back);
    for (from, to, to_side) in [(front, back, Side::Back), (back, front, Side::Front)] {
        let drifted = side::side_mut(scene, from).take_drifted();
        for cloud in drifted {
            if let SceneNode::Image(image) = &mut scene[cloud].behavior {
                image.position.x = CLOUD_WRAP_X;
                image.side = to_side;
            }
            scene.add(to, cloud);
            side::side_mut(scene, to).adopt_cloud(cloud);
            log::trace!("cloud {} moved to the {to_side:?} side", scene[cloud].id);
        }
    }
}

fn flip(scene: &mut Scene, idx: NodeIndex, flipped: bool) {
    let card = card_mut(scene, idx);
    if card.flipped == flipped {
        return;
    }
    card.flipped = flipped;
    restack(scene, idx);
}
