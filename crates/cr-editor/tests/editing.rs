//! Integration tests: editing the main card through actions and keys.

use cr_core::image::ImageTable;
use cr_core::record::Side;
use cr_core::NodeIndex;
use cr_editor::{CardAction, KeyMap, ShortcutAction, apply_action};
use cr_scene::card;
use cr_scene::side;
use cr_scene::{ImageSlot, SceneConfig, Selection, Stage};
use glam::Vec2;
use pretty_assertions::assert_eq;

fn make_stage() -> Stage {
    Stage::new(ImageTable::sequential(ImageSlot::TABLE_LEN), SceneConfig::default()).unwrap()
}

fn editing_stage() -> Stage {
    let mut stage = make_stage();
    apply_action(&mut stage, CardAction::ToggleEditMode);
    stage
}

fn front(stage: &Stage) -> NodeIndex {
    card::card_ref(stage.scene(), stage.main_card()).front
}

fn press(stage: &mut Stage, key: &str, shift: bool) -> bool {
    let action = KeyMap::resolve(key, shift)
        .and_then(ShortcutAction::card_action)
        .unwrap();
    apply_action(stage, action)
}

// ─── Moving trees ───────────────────────────────────────────────────────

#[test]
fn arrows_move_the_selected_tree() {
    let mut stage = editing_stage();
    assert!(press(&mut stage, "ArrowRight", true));
    assert!(press(&mut stage, "ArrowUp", false));

    let at = side::tree_position(stage.scene(), front(&stage), 0).unwrap();
    assert!((at - Vec2::new(0.55, 0.21)).length() < 1e-6, "{at}");
    // Only the selected tree moved.
    assert_eq!(
        side::tree_position(stage.scene(), front(&stage), 1),
        Some(Vec2::new(0.1, 0.35))
    );
}

#[test]
fn moves_leaving_the_bounds_are_refused() {
    let mut stage = editing_stage();
    assert!(!apply_action(&mut stage, CardAction::MoveTree { dx: 0.3, dy: 0.0 }));
    assert!(!apply_action(&mut stage, CardAction::MoveTree { dx: 0.0, dy: -0.25 }));
    assert_eq!(
        side::tree_position(stage.scene(), front(&stage), 0),
        Some(Vec2::new(0.5, 0.2))
    );
}

#[test]
fn trees_stay_put_outside_edit_mode() {
    let mut stage = make_stage();
    assert!(!apply_action(&mut stage, CardAction::MoveTree { dx: 0.01, dy: 0.0 }));
    assert!(!apply_action(&mut stage, CardAction::AddTree));
    assert!(!apply_action(&mut stage, CardAction::DeleteTree));
    assert_eq!(side::tree_count(stage.scene(), front(&stage)), 3);
}

#[test]
fn tab_walks_the_trees_and_wraps() {
    let mut stage = editing_stage();
    for expected in [1, 2, 0] {
        press(&mut stage, "Tab", false);
        stage.update();
        assert_eq!(stage.interaction().selection.index, expected);
    }
}

// ─── Adding and deleting ────────────────────────────────────────────────

#[test]
fn added_tree_is_selected() {
    let mut stage = editing_stage();
    press(&mut stage, "b", false);
    assert!(press(&mut stage, "a", false));

    let back = card::card_ref(stage.scene(), stage.main_card()).back;
    assert_eq!(side::tree_count(stage.scene(), back), 1);
    assert_eq!(
        stage.interaction().selection,
        Selection {
            index: 0,
            side: Side::Back
        }
    );

    stage.update();
    let outline = side::side_ref(stage.scene(), back).outline.unwrap();
    assert_eq!(outline.corner, Vec2::new(0.3, 0.3));
}

#[test]
fn deleting_the_last_tree_resets_the_selection() {
    let mut stage = editing_stage();
    stage.interaction_mut().selection.index = 2;
    assert!(press(&mut stage, "x", false));
    assert_eq!(
        side::tree_positions(stage.scene(), front(&stage)),
        vec![Vec2::new(0.5, 0.2), Vec2::new(0.1, 0.35)]
    );

    stage.update();
    assert_eq!(stage.interaction().selection.index, 0);
}

// ─── Text and designs ───────────────────────────────────────────────────

#[test]
fn text_reaches_the_card_on_the_next_frame() {
    let mut stage = make_stage();
    apply_action(
        &mut stage,
        CardAction::SetText(vec!["Happy".into(), "Birthday".into()]),
    );
    stage.update();
    assert_eq!(side::text(stage.scene(), front(&stage)), ["Happy", "Birthday"]);
}

#[test]
fn number_keys_switch_designs() {
    let mut stage = make_stage();
    stage.load_shelf("9,4,Shelf,Design,back,0.2,0.3\n");

    assert!(press(&mut stage, "1", false));
    assert!(!press(&mut stage, "2", false));
    stage.update();

    let record = stage.save_main();
    assert_eq!(record.color_index, 4);
    assert_eq!(record.front_text, vec!["Shelf"]);
    assert_eq!(record.placements.len(), 1);
}

#[test]
fn save_then_reset() {
    let mut stage = editing_stage();
    press(&mut stage, "c", false);
    stage.update();
    assert!(press(&mut stage, "s", false));
    assert_eq!(stage.display_cards().len(), 1);

    assert!(press(&mut stage, "Delete", false));
    stage.update();
    assert_eq!(stage.interaction().color_index, 0);

    let saved = card::card_record(stage.scene(), stage.display_cards()[0]);
    assert_eq!(saved.color_index, 1);
}

#[test]
fn space_opens_and_f_flips() {
    let mut stage = make_stage();
    press(&mut stage, " ", false);
    press(&mut stage, "f", false);
    for _ in 0..5 {
        stage.update();
    }
    let card = card::card_ref(stage.scene(), stage.main_card());
    assert_eq!(card.open_angle(), 10);
    assert!(card.is_flipped());
}
