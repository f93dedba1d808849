//! The stage owns the scene and the per-frame context and drives them in
//! the required order: input mutates the interaction between frames,
//! [`Stage::update`] changes state, [`Stage::render`] draws.

use crate::card;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::interaction::{CardEvent, FrameContext, Interaction, Selection};
use crate::node::{Scene, SceneNode};
use crate::room::{Lamp, Room, Shelf, Window};
use crate::slots::ImageSlot;
use cr_core::draw::DrawContext;
use cr_core::image::ImageTable;
use cr_core::lint::{LintSeverity, lint_scene};
use cr_core::record::{CardRecord, parse_records};
use cr_core::transform::Transform;
use cr_core::{Node, NodeId, NodeIndex};
use glam::Vec3;

/// Display cards stand at this fraction of full size.
const DISPLAY_SIZE: f32 = 0.4;

#[derive(Debug)]
pub struct Stage {
    scene: Scene,
    frame: FrameContext,
    config: SceneConfig,
    room: NodeIndex,
    lamp: NodeIndex,
    shelf: NodeIndex,
    main_card: NodeIndex,
}

impl Stage {
    /// Build the room, the main card and an empty shelf.
    pub fn new(images: ImageTable, config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        images.require(ImageSlot::REQUIRED.map(ImageSlot::index))?;

        let mut scene = Scene::new(Node::new(NodeId::intern("root"), SceneNode::Group), images);
        let root = scene.root();

        let room = scene.add_node(
            root,
            Node::new(NodeId::intern("room"), SceneNode::Room(Room))
                .with_transform(Transform::scale(4.0, 2.5, 4.0))
                .with_transform(Transform::translate(-2.0, -1.0, -3.0)),
        );
        let lamp = scene.add_node(
            room,
            Node::new(
                NodeId::intern("lamp"),
                SceneNode::Lamp(Lamp::new(config.lamp_sides, config.lamp_emission()?)),
            )
            .with_light(config.light_slot()?)
            .with_transform(Transform::scale(0.04, 0.08, 0.04))
            .with_transform(Transform::translate(0.1, 0.88, 0.1)),
        );
        scene.add_node(
            room,
            Node::new(NodeId::intern("window"), SceneNode::Window(Window))
                .with_transform(Transform::scale(0.3, 0.3, 1.0))
                .with_transform(Transform::translate(0.55, 0.45, 0.005)),
        );
        let shelf = scene.add_node(
            root,
            Node::new(
                NodeId::intern("shelf"),
                SceneNode::Shelf(Shelf::new(config.shelf_capacity)),
            )
            .with_transform(Transform::translate(-1.0, 0.1, -2.0)),
        );
        let main_card = card::spawn_card(&mut scene, root, 0);

        for d in lint_scene(&scene) {
            match d.severity {
                LintSeverity::Warning => log::warn!("[{}] {}", d.rule, d.message),
                LintSeverity::Info => log::debug!("[{}] {}", d.rule, d.message),
            }
        }
        log::info!("stage built: {} nodes", scene.len());

        Ok(Self {
            scene,
            frame: FrameContext::new(Interaction::default()),
            config,
            room,
            lamp,
            shelf,
            main_card,
        })
    }

    // ─── Frame loop ──────────────────────────────────────────────────────

    /// One state pass over the whole scene.
    pub fn update(&mut self) {
        self.scene.update(&mut self.frame);
        self.frame.advance();
    }

    /// Lights on, draw, lights off. Leaves the context's frame depth as
    /// it found it.
    pub fn render(&self, ctx: &mut dyn DrawContext) {
        self.scene.enable(ctx);
        self.scene.render(ctx, &self.frame);
        self.scene.disable(ctx);
    }

    // ─── Shelf ───────────────────────────────────────────────────────────

    /// Load saved designs onto the shelf, one per line. Bad lines and
    /// designs that don't fit are logged and skipped. Returns how many
    /// cards were added.
    pub fn load_shelf(&mut self, text: &str) -> usize {
        let mut loaded = 0;
        for (line, result) in parse_records(text) {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("shelf line {line} skipped: {e}");
                    continue;
                }
            };
            match self.add_display_card(&record) {
                Ok(_) => loaded += 1,
                Err(e) => log::warn!("shelf line {line} skipped: {e}"),
            }
        }
        log::info!("{loaded} display cards on the shelf");
        loaded
    }

    /// Put a saved design on the next free shelf slot.
    pub fn add_display_card(&mut self, record: &CardRecord) -> Result<NodeIndex, SceneError> {
        let slot = self.display_cards().len();
        if slot >= self.config.shelf_capacity {
            return Err(SceneError::ShelfFull(self.config.shelf_capacity));
        }
        let idx = card::spawn_card_from_record(&mut self.scene, self.shelf, slot + 1, record)?;
        self.arrange_shelf();
        Ok(idx)
    }

    /// Save the main card's design to the shelf. A full shelf drops its
    /// first card to make room.
    pub fn save_to_shelf(&mut self) -> Result<NodeIndex, SceneError> {
        if self.display_cards().len() >= self.config.shelf_capacity
            && let Some(&oldest) = self.display_cards().first()
        {
            log::info!(
                "shelf full, dropping card {}",
                card::card_ref(&self.scene, oldest).id
            );
            self.scene.remove_subtree(oldest);
            self.arrange_shelf();
        }
        let record = self.save_main();
        self.add_display_card(&record)
    }

    /// Display cards in shelf order.
    pub fn display_cards(&self) -> &[NodeIndex] {
        self.scene.children(self.shelf)
    }

    fn arrange_shelf(&mut self) {
        let Some(shelf) = self.scene[self.shelf].behavior.as_shelf().copied() else {
            return;
        };
        let cards = self.display_cards().to_vec();
        for (slot, idx) in cards.into_iter().enumerate() {
            card::card_mut(&mut self.scene, idx).card_index = slot + 1;
            card::place_card(&mut self.scene, idx, shelf.slot_position(slot), DISPLAY_SIZE);
        }
    }

    /// Copy the design on shelf `slot` (0-based) onto the main card.
    pub fn adopt_design(&mut self, slot: usize) -> Result<(), SceneError> {
        let Some(&display) = self.display_cards().get(slot) else {
            return Err(SceneError::UnknownShelfSlot(slot));
        };
        let record = card::card_record(&self.scene, display);
        card::apply_record(&mut self.scene, self.main_card, &record)?;

        let interaction = &mut self.frame.interaction;
        interaction.color_index = record.color_index;
        interaction.front_text = record.front_text;
        interaction.inside_text = record.inside_text;
        interaction.selection = Selection::default();
        log::info!("main card now shows design {}", record.id);
        Ok(())
    }

    /// Snapshot the main card's design.
    pub fn save_main(&self) -> CardRecord {
        card::card_record(&self.scene, self.main_card)
    }

    pub fn request_reset(&mut self) {
        self.frame.request(CardEvent::Reset);
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn interaction(&self) -> &Interaction {
        &self.frame.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.frame.interaction
    }

    pub fn frame(&self) -> &FrameContext {
        &self.frame
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn main_card(&self) -> NodeIndex {
        self.main_card
    }

    pub fn room(&self) -> NodeIndex {
        self.room
    }

    pub fn lamp(&self) -> NodeIndex {
        self.lamp
    }

    pub fn shelf(&self) -> NodeIndex {
        self.shelf
    }

    /// World position of the lamp's light.
    pub fn lamp_position(&self) -> Vec3 {
        let local = match &self.scene[self.lamp].behavior {
            SceneNode::Lamp(lamp) => lamp.light_source().position.truncate(),
            _ => Vec3::ZERO,
        };
        self.scene.world_transform(self.lamp).transform_point3(local)
    }
}
