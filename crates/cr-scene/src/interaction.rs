//! Interaction state and the per-frame context handed to every node.
//!
//! Input handlers write [`Interaction`] between frames; nodes read it (and
//! the main card writes back selection fixes) during `update`. One-shot
//! requests travel as [`CardEvent`]s and are consumed at most once.

use cr_core::record::Side;

pub const DEFAULT_FRONT_TEXT: [&str; 2] = ["Hello", "Good Morning"];
pub const DEFAULT_INSIDE_TEXT: [&str; 2] = ["Have a", "good day!"];

pub fn default_front_text() -> Vec<String> {
    DEFAULT_FRONT_TEXT.map(String::from).to_vec()
}

pub fn default_inside_text() -> Vec<String> {
    DEFAULT_INSIDE_TEXT.map(String::from).to_vec()
}

/// Which tree the user is working on: an index into one side's trees.
/// Weak: the tree list may shrink underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub side: Side,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            index: 0,
            side: Side::Front,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub is_open: bool,
    pub edit_mode: bool,
    /// `false` turns the main card around to show its back.
    pub show_front: bool,
    pub show_instructions: bool,
    pub color_index: usize,
    pub selection: Selection,
    pub front_text: Vec<String>,
    pub inside_text: Vec<String>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            is_open: false,
            edit_mode: false,
            show_front: true,
            show_instructions: true,
            color_index: 0,
            selection: Selection::default(),
            front_text: default_front_text(),
            inside_text: default_inside_text(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    /// Put the main card back to its default design.
    Reset,
}

/// Everything a node may consult while changing or drawing.
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    /// Frames completed so far.
    pub tick: u64,
    pub interaction: Interaction,
    events: Vec<CardEvent>,
}

impl FrameContext {
    pub fn new(interaction: Interaction) -> Self {
        Self {
            tick: 0,
            interaction,
            events: Vec::new(),
        }
    }

    pub fn request(&mut self, event: CardEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    pub fn pending(&self) -> &[CardEvent] {
        &self.events
    }

    /// Consume a pending reset. Returns `true` exactly once per request.
    pub fn take_reset(&mut self) -> bool {
        match self.events.iter().position(|e| *e == CardEvent::Reset) {
            Some(pos) => {
                self.events.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Close out a frame: drop requests nobody consumed and bump the tick.
    pub fn advance(&mut self) {
        if !self.events.is_empty() {
            log::debug!("dropping unconsumed events {:?}", self.events);
            self.events.clear();
        }
        self.tick += 1;
    }
}
