//=========================================================================
// Asset Store
//=========================================================================
//
// Path → drawable handle + pixel dimensions. Decoding happens in the
// backend; the core only sees the result.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Rect, TextureHandle};
use crate::core::error::{Error, Result};

//=== Sprite ==============================================================

/// A loaded texture and its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub texture: TextureHandle,
    pub width: u32,
    pub height: u32,
}

impl Sprite {
    pub const fn new(texture: TextureHandle, width: u32, height: u32) -> Self {
        Self { texture, width, height }
    }

    /// Rectangle of this sprite's size placed at `(x, y)`.
    pub fn rect_at(&self, x: i32, y: i32) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }
}

//=== AssetStore ==========================================================

/// Source of drawable sprites keyed by path or identifier.
pub trait AssetStore {
    /// Loads the sprite for `path`, failing with [`Error::AssetLoad`].
    fn load(&mut self, path: &str) -> Result<Sprite>;
}

//=== MemoryAssetStore ====================================================

/// Asset store over pre-registered sprites.
///
/// Used for headless runs and tests, and by backends that decode
/// everything up front and hand the results to the core.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    sprites: HashMap<String, Sprite>,
    next_handle: u64,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path` with the given dimensions and a fresh handle.
    pub fn register(&mut self, path: impl Into<String>, width: u32, height: u32) -> Sprite {
        let sprite = Sprite::new(TextureHandle(self.next_handle), width, height);
        self.next_handle += 1;
        self.sprites.insert(path.into(), sprite);
        sprite
    }

    /// Registers `path` with an existing sprite.
    pub fn insert(&mut self, path: impl Into<String>, sprite: Sprite) {
        self.sprites.insert(path.into(), sprite);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl AssetStore for MemoryAssetStore {
    fn load(&mut self, path: &str) -> Result<Sprite> {
        match self.sprites.get(path) {
            Some(sprite) => {
                debug!("Loaded asset {} ({}x{})", path, sprite.width, sprite.height);
                Ok(*sprite)
            }
            None => Err(Error::AssetLoad {
                path: path.to_string(),
                reason: "no such asset registered".to_string(),
            }),
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
