use cr_core::image::ImageTableError;
use cr_core::record::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Image(#[from] ImageTableError),

    #[error("bad card record: {0}")]
    Record(#[from] RecordError),

    #[error("could not read scene config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid scene config: {0}")]
    InvalidConfig(String),

    #[error("color index {0} is not in the palette")]
    UnknownColor(usize),

    #[error("there is no card on shelf slot {0}")]
    UnknownShelfSlot(usize),

    #[error("the shelf is full ({0} cards)")]
    ShelfFull(usize),
}
