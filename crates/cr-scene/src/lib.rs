pub mod card;
pub mod config;
pub mod decoration;
pub mod error;
pub mod interaction;
pub mod node;
pub mod palette;
pub mod room;
pub mod side;
pub mod slots;
pub mod stage;

pub use card::{Card, TREE_BOUNDS};
pub use config::SceneConfig;
pub use decoration::{CardImage, CardText, Face};
pub use error::SceneError;
pub use interaction::{CardEvent, FrameContext, Interaction, Selection};
pub use node::{Scene, SceneNode};
pub use side::CardSide;
pub use slots::ImageSlot;
pub use stage::Stage;
