//! The image table enumeration shared by the loader and the scene nodes.

use cr_core::image::{ImageHandle, ImageTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Wall = 0,
    Floor = 1,
    Paper = 2,
    Tree = 3,
    Trunk = 4,
    Apple = 5,
    Sun = 6,
    Cloud = 7,
    Window = 8,
    City = 9,
    Background = 10,
    FrontDecal = 12,
}

impl ImageSlot {
    /// Every slot some node draws with. A table handed to `Stage::new`
    /// must cover all of them. `Apple` and `Background` only hold their
    /// place in the table layout.
    pub const REQUIRED: [ImageSlot; 10] = [
        ImageSlot::Wall,
        ImageSlot::Floor,
        ImageSlot::Paper,
        ImageSlot::Tree,
        ImageSlot::Trunk,
        ImageSlot::Sun,
        ImageSlot::Cloud,
        ImageSlot::Window,
        ImageSlot::City,
        ImageSlot::FrontDecal,
    ];

    /// Table size a loader has to provide (slot 11 is unused but counted).
    pub const TABLE_LEN: usize = 13;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Look the slot up in `table`. Panics if the table is incomplete.
    pub fn image(self, table: &ImageTable) -> ImageHandle {
        table.image(self.index())
    }
}
