//! `card-room`: headless driver for the card room.
//!
//! Builds the stage, optionally fills the shelf from a saved-designs file,
//! then plays a short scripted editing session at the configured frame
//! rate, drawing every frame into a recording context.
//!
//! Usage: `card-room [SHELF_FILE] [CONFIG_JSON]`

use cr_core::draw::RecordingContext;
use cr_core::image::ImageTable;
use cr_core::record::emit_record;
use cr_editor::shortcuts::INSTRUCTIONS;
use cr_editor::{CardAction, KeyMap, apply_action, split_text_input};
use cr_scene::{ImageSlot, SceneConfig, Stage};

/// One scripted key press.
struct Press {
    frame: u64,
    key: &'static str,
    shift: bool,
    /// Typed text for the text prompt.
    text: Option<&'static str>,
}

const fn press(frame: u64, key: &'static str) -> Press {
    Press {
        frame,
        key,
        shift: false,
        text: None,
    }
}

const SESSION: &[Press] = &[
    press(0, "e"),
    press(10, "c"),
    press(20, "Tab"),
    Press {
        frame: 30,
        key: "ArrowRight",
        shift: true,
        text: None,
    },
    press(40, "a"),
    Press {
        frame: 50,
        key: "t",
        shift: false,
        text: Some("Happy,Birthday"),
    },
    press(60, " "),
    Press {
        frame: 150,
        key: "t",
        shift: false,
        text: Some("Best,wishes!"),
    },
    press(160, "s"),
    press(170, " "),
    press(260, "1"),
    press(270, "d"),
];

const SESSION_FRAMES: u64 = 300;

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let config = match args.get(2) {
        Some(path) => match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| SceneConfig::from_json(&text).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!("card-room: cannot use config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => SceneConfig::default(),
    };

    let mut stage = match Stage::new(ImageTable::sequential(ImageSlot::TABLE_LEN), config) {
        Ok(stage) => stage,
        Err(e) => {
            eprintln!("card-room: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = args.get(1) {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                stage.load_shelf(&text);
            }
            Err(e) => log::warn!("cannot read shelf file {path}: {e}"),
        }
    }

    if stage.interaction().show_instructions {
        for line in INSTRUCTIONS {
            log::info!("{line}");
        }
    }

    let interval = stage.config().frame_interval();
    let mut ctx = RecordingContext::new();
    let mut script = SESSION.iter().peekable();
    let mut refused = 0;

    for frame in 0..SESSION_FRAMES {
        while let Some(p) = script.next_if(|p| p.frame == frame) {
            let Some(shortcut) = KeyMap::resolve(p.key, p.shift) else {
                log::warn!("unbound key {:?}", p.key);
                continue;
            };
            let action = match shortcut.card_action() {
                Some(action) => action,
                None => CardAction::SetText(split_text_input(p.text.unwrap_or_default())),
            };
            if !apply_action(&mut stage, action) {
                refused += 1;
            }
        }

        stage.update();
        ctx.clear();
        stage.render(&mut ctx);
        std::thread::sleep(interval);
    }

    log::info!(
        "{SESSION_FRAMES} frames, {} draw commands in the last one, frame depth {}",
        ctx.commands().len(),
        ctx.max_depth()
    );
    log::info!(
        "{} display cards, {refused} actions refused",
        stage.display_cards().len()
    );
    match emit_record(&stage.save_main()) {
        Ok(line) => log::info!("main card: {line}"),
        Err(e) => log::warn!("main card cannot be saved: {e}"),
    }
}
