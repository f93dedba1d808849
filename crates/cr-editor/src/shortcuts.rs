//! Keyboard shortcut mapping.
//!
//! Maps key names to semantic [`ShortcutAction`]s. Key names follow the
//! `KeyboardEvent.key` convention (`"e"`, `" "`, `"ArrowUp"`, `"Delete"`).
//! Letters are case-insensitive; Shift only changes how far the arrows
//! move a tree.

use crate::commands::CardAction;

/// Tree nudge per arrow press.
pub const MOVE_STEP: f32 = 0.01;
/// Tree nudge per arrow press with Shift held.
pub const MOVE_STEP_LARGE: f32 = 0.05;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    // ── Card ──
    ToggleOpen,
    FlipCard,
    ResetCard,
    SaveCard,
    /// Switch to the design on a shelf slot (0-based).
    SwitchCard(usize),

    // ── Edit ──
    ToggleEditMode,
    CycleColor,
    /// Prompt for new text; the driver collects the line.
    EditText,
    NextTree,
    SwitchTreeSide,
    MoveTree { dx: f32, dy: f32 },
    AddTree,
    DeleteTree,

    // ── UI ──
    ToggleInstructions,
}

impl ShortcutAction {
    /// The card action this shortcut performs, or `None` for
    /// [`EditText`](Self::EditText), which needs input first.
    pub fn card_action(self) -> Option<CardAction> {
        Some(match self {
            ShortcutAction::ToggleOpen => CardAction::ToggleOpen,
            ShortcutAction::FlipCard => CardAction::FlipCard,
            ShortcutAction::ResetCard => CardAction::Reset,
            ShortcutAction::SaveCard => CardAction::SaveDesign,
            ShortcutAction::SwitchCard(slot) => CardAction::AdoptDesign(slot),
            ShortcutAction::ToggleEditMode => CardAction::ToggleEditMode,
            ShortcutAction::CycleColor => CardAction::CycleColor,
            ShortcutAction::EditText => return None,
            ShortcutAction::NextTree => CardAction::NextTree,
            ShortcutAction::SwitchTreeSide => CardAction::SwitchTreeSide,
            ShortcutAction::MoveTree { dx, dy } => CardAction::MoveTree { dx, dy },
            ShortcutAction::AddTree => CardAction::AddTree,
            ShortcutAction::DeleteTree => CardAction::DeleteTree,
            ShortcutAction::ToggleInstructions => CardAction::ToggleInstructions,
        })
    }
}

/// The instruction lines shown while instructions are enabled.
pub const INSTRUCTIONS: [&str; 13] = [
    "Instructions:",
    "E to toggle edit mode",
    "C to change color",
    "D to reset the card",
    "T to edit the text",
    "S to save the card",
    "Space to open the card",
    "Num keys to change card",
    "Tab to select the next tree",
    "B to switch tree side",
    "Arrows to move the tree",
    "A / X to add or delete a tree",
    "F to flip, I to hide this",
];

/// Resolves key events into shortcut actions.
pub struct KeyMap;

impl KeyMap {
    /// Resolve a key press to an action.
    ///
    /// Returns `None` if the key has no binding.
    pub fn resolve(key: &str, shift: bool) -> Option<ShortcutAction> {
        let step = if shift { MOVE_STEP_LARGE } else { MOVE_STEP };

        // ── Named keys ──
        match key {
            " " | "Space" => return Some(ShortcutAction::ToggleOpen),
            "Delete" => return Some(ShortcutAction::ResetCard),
            "Tab" => return Some(ShortcutAction::NextTree),
            "ArrowUp" => return Some(ShortcutAction::MoveTree { dx: 0.0, dy: step }),
            "ArrowDown" => return Some(ShortcutAction::MoveTree { dx: 0.0, dy: -step }),
            "ArrowRight" => return Some(ShortcutAction::MoveTree { dx: step, dy: 0.0 }),
            "ArrowLeft" => return Some(ShortcutAction::MoveTree { dx: -step, dy: 0.0 }),
            _ => {}
        }

        // ── Single characters ──
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        match c.to_ascii_lowercase() {
            'e' => Some(ShortcutAction::ToggleEditMode),
            'c' => Some(ShortcutAction::CycleColor),
            'd' => Some(ShortcutAction::ResetCard),
            't' => Some(ShortcutAction::EditText),
            's' => Some(ShortcutAction::SaveCard),
            'f' => Some(ShortcutAction::FlipCard),
            'a' => Some(ShortcutAction::AddTree),
            'x' => Some(ShortcutAction::DeleteTree),
            'i' => Some(ShortcutAction::ToggleInstructions),
            'b' => Some(ShortcutAction::SwitchTreeSide),
            '1'..='9' => c
                .to_digit(10)
                .map(|n| ShortcutAction::SwitchCard(n as usize - 1)),
            _ => None,
        }
    }
}
