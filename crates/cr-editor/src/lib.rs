pub mod commands;
pub mod shortcuts;

pub use commands::{CardAction, apply_action, split_text_input};
pub use shortcuts::{KeyMap, ShortcutAction};
