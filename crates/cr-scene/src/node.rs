//! The closed set of node kinds in a card room.

use crate::card::{self, Card};
use crate::decoration::{CardImage, CardText};
use crate::interaction::FrameContext;
use crate::room::{Lamp, Room, Shelf, Window};
use crate::side::{self, CardSide};
use cr_core::draw::DrawContext;
use cr_core::graph::{Behavior, SceneGraph};
use cr_core::image::ImageTable;
use cr_core::lighting::LightSource;
use cr_core::NodeIndex;

pub type Scene = SceneGraph<SceneNode>;

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    /// Pure grouping; only its transforms matter.
    Group,
    Room(Room),
    Lamp(Lamp),
    Window(Window),
    Shelf(Shelf),
    Card(Card),
    Side(CardSide),
    Image(CardImage),
    Text(CardText),
}

/// Payload-free tag of a [`SceneNode`], cheap to copy out of the graph
/// before handing the graph to a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Group,
    Room,
    Lamp,
    Window,
    Shelf,
    Card,
    Side,
    Image,
    Text,
}

impl SceneNode {
    pub fn kind(&self) -> Kind {
        match self {
            SceneNode::Group => Kind::Group,
            SceneNode::Room(_) => Kind::Room,
            SceneNode::Lamp(_) => Kind::Lamp,
            SceneNode::Window(_) => Kind::Window,
            SceneNode::Shelf(_) => Kind::Shelf,
            SceneNode::Card(_) => Kind::Card,
            SceneNode::Side(_) => Kind::Side,
            SceneNode::Image(_) => Kind::Image,
            SceneNode::Text(_) => Kind::Text,
        }
    }

    pub fn as_card(&self) -> Option<&Card> {
        match self {
            SceneNode::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_card_mut(&mut self) -> Option<&mut Card> {
        match self {
            SceneNode::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn as_side(&self) -> Option<&CardSide> {
        match self {
            SceneNode::Side(side) => Some(side),
            _ => None,
        }
    }

    pub fn as_side_mut(&mut self) -> Option<&mut CardSide> {
        match self {
            SceneNode::Side(side) => Some(side),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&CardImage> {
        match self {
            SceneNode::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut CardImage> {
        match self {
            SceneNode::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_shelf(&self) -> Option<&Shelf> {
        match self {
            SceneNode::Shelf(shelf) => Some(shelf),
            _ => None,
        }
    }
}

impl Behavior for SceneNode {
    type Frame = FrameContext;

    fn change(graph: &mut Scene, idx: NodeIndex, frame: &mut FrameContext) {
        match graph[idx].behavior.kind() {
            Kind::Card => card::change(graph, idx, frame),
            Kind::Side => side::change(graph, idx, frame),
            Kind::Image => {
                if let SceneNode::Image(image) = &mut graph[idx].behavior {
                    image.change(&frame.interaction);
                }
            }
            Kind::Group | Kind::Room | Kind::Lamp | Kind::Window | Kind::Shelf | Kind::Text => {}
        }
    }

    fn depict(&self, ctx: &mut dyn DrawContext, images: &ImageTable, _frame: &FrameContext) {
        match self {
            SceneNode::Group | SceneNode::Card(_) => {}
            SceneNode::Room(room) => room.depict(ctx, images),
            SceneNode::Lamp(lamp) => lamp.depict(ctx),
            SceneNode::Window(window) => window.depict(ctx, images),
            SceneNode::Shelf(shelf) => shelf.depict(ctx, images),
            SceneNode::Side(side) => side.depict(ctx, images),
            SceneNode::Image(image) => image.depict(ctx, images),
            SceneNode::Text(text) => text.depict(ctx),
        }
    }

    fn light_source(&self) -> Option<LightSource> {
        match self {
            SceneNode::Lamp(lamp) => Some(lamp.light_source()),
            _ => None,
        }
    }
}
