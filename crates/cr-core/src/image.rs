//! The shared, read-only table of loaded images.
//!
//! Images are loaded once at startup by the host and handed to the scene
//! graph as an indexed table. The index enumeration is agreed between the
//! loader and the nodes that draw; the table never changes afterwards.

use std::sync::Arc;
use thiserror::Error;

/// Texture coordinates of an image within its backing texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoords {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl TexCoords {
    pub const FULL: TexCoords = TexCoords {
        left: 0.0,
        right: 1.0,
        top: 1.0,
        bottom: 0.0,
    };
}

impl Default for TexCoords {
    fn default() -> Self {
        Self::FULL
    }
}

/// Opaque handle to an already-loaded image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    pub id: u32,
    pub coords: TexCoords,
}

impl ImageHandle {
    pub const fn new(id: u32) -> Self {
        Self {
            id,
            coords: TexCoords::FULL,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageTableError {
    #[error("image {index} is missing (table holds {len} images)")]
    Missing { index: usize, len: usize },
}

/// Indexed, cheaply clonable image table shared by every node.
#[derive(Debug, Clone)]
pub struct ImageTable(Arc<[ImageHandle]>);

impl ImageTable {
    pub fn new(handles: Vec<ImageHandle>) -> Self {
        Self(handles.into())
    }

    /// A table of `len` handles whose ids equal their index. Used by
    /// headless drivers and tests that have no real textures.
    pub fn sequential(len: usize) -> Self {
        Self::new((0..len as u32).map(ImageHandle::new).collect())
    }

    /// Handle at `index`.
    ///
    /// # Panics
    /// If `index` is out of range. Every index a node draws with must be
    /// valid before the first render; see [`ImageTable::require`].
    pub fn image(&self, index: usize) -> ImageHandle {
        match self.0.get(index) {
            Some(handle) => *handle,
            None => panic!("image index {index} out of range ({} loaded)", self.0.len()),
        }
    }

    pub fn get(&self, index: usize) -> Option<ImageHandle> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Startup completeness check: every listed index must be present.
    pub fn require(&self, indices: impl IntoIterator<Item = usize>) -> Result<(), ImageTableError> {
        for index in indices {
            if index >= self.0.len() {
                return Err(ImageTableError::Missing {
                    index,
                    len: self.0.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_match_indices() {
        let table = ImageTable::sequential(4);
        assert_eq!(table.image(3).id, 3);
        assert_eq!(table.get(4), None);
    }

    #[test]
    fn require_reports_first_missing_index() {
        let table = ImageTable::sequential(3);
        assert_eq!(table.require([0, 2]), Ok(()));
        assert_eq!(
            table.require([1, 7, 9]),
            Err(ImageTableError::Missing { index: 7, len: 3 })
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn invalid_index_is_fatal() {
        ImageTable::sequential(2).image(5);
    }
}
