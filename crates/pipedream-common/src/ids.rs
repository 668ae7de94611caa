//! ID types for scene items and assets.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for item IDs.
static ITEM_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an item living on the canvas (particle, falling
/// petal, orchid stroke, background, buttons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates a new unique item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(ITEM_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for an image asset.
///
/// Assets are opaque to the core: the canvas resolves the name (and an
/// optional tile index into a sprite sheet) to pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId {
    /// Asset name, e.g. `"petal"`
    pub name: String,
    /// Tile index inside a sheet, if any
    pub tile: Option<u32>,
}

impl AssetId {
    /// Creates an ID for a whole image.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tile: None,
        }
    }

    /// Creates an ID for one tile of a sprite sheet.
    #[must_use]
    pub fn tile(name: impl Into<String>, tile: u32) -> Self {
        Self {
            name: name.into(),
            tile: Some(tile),
        }
    }
}
