//! Card editing entry points.
//!
//! Every user-facing mutation of the stage goes through [`apply_action`].
//! Actions that only touch the interaction state take effect on the next
//! `Stage::update`; tree edits go straight to the scene. Tree edits and
//! recoloring need edit mode; the rest work any time.

use cr_core::record::Side;
use cr_scene::card::{self, TREE_BOUNDS};
use cr_scene::palette;
use cr_scene::side;
use cr_scene::{Selection, Stage};
use glam::Vec2;

/// Where a newly added tree is planted, in side-local coordinates.
pub const NEW_TREE_POSITION: Vec2 = Vec2::new(0.3, 0.3);

/// A single user-facing edit.
#[derive(Debug, Clone, PartialEq)]
pub enum CardAction {
    ToggleOpen,
    ToggleEditMode,
    /// Next palette color (edit mode only).
    CycleColor,
    /// Select the next tree on the current side.
    NextTree,
    /// Move the selection to the other side's first tree.
    SwitchTreeSide,
    /// Nudge the selected tree. Refused if it would leave [`TREE_BOUNDS`].
    MoveTree { dx: f32, dy: f32 },
    AddTree,
    DeleteTree,
    /// Replace the text currently facing the user: the cover while closed,
    /// the inside while open.
    SetText(Vec<String>),
    Reset,
    /// Copy the design on a shelf slot (0-based) onto the main card.
    AdoptDesign(usize),
    /// Save the main card's design to the shelf.
    SaveDesign,
    ToggleInstructions,
    FlipCard,
}

/// Apply `action` to the stage. Returns `false` if it was refused or had
/// no effect.
pub fn apply_action(stage: &mut Stage, action: CardAction) -> bool {
    log::debug!("action {action:?}");
    match action {
        CardAction::ToggleOpen => {
            let interaction = stage.interaction_mut();
            interaction.is_open = !interaction.is_open;
            true
        }
        CardAction::ToggleEditMode => {
            let interaction = stage.interaction_mut();
            interaction.edit_mode = !interaction.edit_mode;
            log::info!("edit mode {}", if interaction.edit_mode { "on" } else { "off" });
            true
        }
        CardAction::CycleColor => {
            let interaction = stage.interaction_mut();
            if !interaction.edit_mode {
                return false;
            }
            interaction.color_index = palette::next_color(interaction.color_index);
            true
        }
        CardAction::NextTree => {
            let interaction = stage.interaction_mut();
            if !interaction.edit_mode {
                return false;
            }
            interaction.selection.index += 1;
            true
        }
        CardAction::SwitchTreeSide => {
            let selection = &mut stage.interaction_mut().selection;
            *selection = Selection {
                index: 0,
                side: selection.side.opposite(),
            };
            true
        }
        CardAction::MoveTree { dx, dy } => move_tree(stage, Vec2::new(dx, dy)),
        CardAction::AddTree => add_tree(stage),
        CardAction::DeleteTree => delete_tree(stage),
        CardAction::SetText(lines) => {
            let interaction = stage.interaction_mut();
            if interaction.is_open {
                interaction.inside_text = lines;
            } else {
                interaction.front_text = lines;
            }
            true
        }
        CardAction::Reset => {
            stage.request_reset();
            true
        }
        CardAction::AdoptDesign(slot) => match stage.adopt_design(slot) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("cannot switch cards: {e}");
                false
            }
        },
        CardAction::SaveDesign => match stage.save_to_shelf() {
            Ok(_) => true,
            Err(e) => {
                log::warn!("cannot save card: {e}");
                false
            }
        },
        CardAction::ToggleInstructions => {
            let interaction = stage.interaction_mut();
            interaction.show_instructions = !interaction.show_instructions;
            true
        }
        CardAction::FlipCard => {
            let interaction = stage.interaction_mut();
            interaction.show_front = !interaction.show_front;
            true
        }
    }
}

/// Split a typed line into card text lines. Commas separate lines; blank
/// lines are dropped.
pub fn split_text_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn selected_side(stage: &Stage, which: Side) -> cr_core::NodeIndex {
    card::card_ref(stage.scene(), stage.main_card()).side(which)
}

fn move_tree(stage: &mut Stage, delta: Vec2) -> bool {
    if !stage.interaction().edit_mode {
        return false;
    }
    let Selection { index, side: which } = stage.interaction().selection;
    let target = selected_side(stage, which);
    let Some(at) = side::tree_position(stage.scene(), target, index) else {
        return false;
    };
    let to = at + delta;
    if !TREE_BOUNDS.contains(to) {
        log::debug!("tree {index} stays at {at}: {to} is out of bounds");
        return false;
    }
    side::set_tree_position(stage.scene_mut(), target, index, to.x, to.y);
    true
}

fn add_tree(stage: &mut Stage) -> bool {
    if !stage.interaction().edit_mode {
        return false;
    }
    let which = stage.interaction().selection.side;
    let target = selected_side(stage, which);
    let scale = stage.config().tree_scale;
    let index = side::add_tree(
        stage.scene_mut(),
        target,
        NEW_TREE_POSITION.x,
        NEW_TREE_POSITION.y,
        scale,
    );
    stage.interaction_mut().selection.index = index;
    true
}

fn delete_tree(stage: &mut Stage) -> bool {
    if !stage.interaction().edit_mode {
        return false;
    }
    let Selection { index, side: which } = stage.interaction().selection;
    let target = selected_side(stage, which);
    side::remove_tree(stage.scene_mut(), target, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_core::image::ImageTable;
    use cr_scene::{ImageSlot, SceneConfig};

    fn make_stage() -> Stage {
        Stage::new(ImageTable::sequential(ImageSlot::TABLE_LEN), SceneConfig::default()).unwrap()
    }

    #[test]
    fn color_needs_edit_mode() {
        let mut stage = make_stage();
        assert!(!apply_action(&mut stage, CardAction::CycleColor));
        assert_eq!(stage.interaction().color_index, 0);

        apply_action(&mut stage, CardAction::ToggleEditMode);
        assert!(apply_action(&mut stage, CardAction::CycleColor));
        assert_eq!(stage.interaction().color_index, 1);
    }

    #[test]
    fn color_wraps_after_the_last() {
        let mut stage = make_stage();
        apply_action(&mut stage, CardAction::ToggleEditMode);
        for _ in 0..palette::CARD_COLORS.len() {
            apply_action(&mut stage, CardAction::CycleColor);
        }
        assert_eq!(stage.interaction().color_index, 0);
    }

    #[test]
    fn switching_sides_starts_at_the_first_tree() {
        let mut stage = make_stage();
        stage.interaction_mut().selection.index = 2;
        apply_action(&mut stage, CardAction::SwitchTreeSide);
        assert_eq!(
            stage.interaction().selection,
            Selection {
                index: 0,
                side: Side::Back
            }
        );
    }

    #[test]
    fn split_on_commas() {
        assert_eq!(split_text_input("Happy, Birthday\n"), vec!["Happy", "Birthday"]);
        assert_eq!(split_text_input("One line"), vec!["One line"]);
        assert!(split_text_input("\n").is_empty());
        assert!(split_text_input(" ").is_empty());
        assert_eq!(split_text_input("Hi,, there"), vec!["Hi", "there"]);
    }

    #[test]
    fn blank_text_input_still_saves() {
        let mut stage = make_stage();
        apply_action(&mut stage, CardAction::SetText(split_text_input(" ")));
        stage.update();
        let record = stage.save_main();
        assert!(record.front_text.is_empty());
        let line = cr_core::record::emit_record(&record).unwrap();
        assert_eq!(cr_core::record::parse_record(&line).unwrap(), record);
    }

    #[test]
    fn text_goes_to_the_visible_side() {
        let mut stage = make_stage();
        apply_action(&mut stage, CardAction::SetText(vec!["Cover".into()]));
        apply_action(&mut stage, CardAction::ToggleOpen);
        apply_action(&mut stage, CardAction::SetText(vec!["Inside".into()]));
        assert_eq!(stage.interaction().front_text, vec!["Cover"]);
        assert_eq!(stage.interaction().inside_text, vec!["Inside"]);
    }
}
