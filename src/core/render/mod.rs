//=========================================================================
// Rendering Contracts
//=========================================================================
//
// Narrow interfaces to the rendering backend and asset store. The core
// never issues lower-level drawing commands; it only asks a `Surface` to
// clear, place textures, and present.
//
// Architecture:
//   AssetStore::load(path) → Sprite { texture, width, height }
//                                ↓
//   Object (Skin → Sprite) → Surface::draw_at(rect, texture)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::error::Result;

//=== Module Declarations =================================================

mod assets;
mod surface;

//=== Public API ==========================================================

pub use assets::{AssetStore, MemoryAssetStore, Sprite};
pub use surface::{DrawCommand, RecordingSurface};

//=== TextureHandle =======================================================

/// Opaque handle to a texture owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

//=== Rect ================================================================

/// Screen-space rectangle (pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns true if the point lies strictly inside the rectangle.
    ///
    /// Edges are excluded, so a cursor resting on the border is outside.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let (x, y) = (self.x as f32, self.y as f32);
        x < px && px < x + self.w as f32 && y < py && py < y + self.h as f32
    }
}

//=== Surface =============================================================

/// Draw target provided by the rendering backend.
///
/// The dispatcher calls `clear`, then `draw_at` once per visible object,
/// then `present`, every frame.
pub trait Surface: Send {
    /// Clears the back buffer.
    fn clear(&mut self);

    /// Draws `texture` stretched to `rect`.
    fn draw_at(&mut self, rect: Rect, texture: TextureHandle);

    /// Presents the finished frame.
    fn present(&mut self);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn draw_at(&mut self, rect: Rect, texture: TextureHandle) {
        (**self).draw_at(rect, texture);
    }

    fn present(&mut self) {
        (**self).present();
    }
}

//=== Skin ================================================================

/// Appearance of an object: which sprite it currently shows.
///
/// Implemented by plain sprites and by `Managed<K, Sprite>`, so an object
/// can be drawn the same way whether or not it switches variants.
pub trait Skin: Send + Sync {
    /// Returns the sprite to draw this frame.
    fn sprite(&self) -> Result<Arc<Sprite>>;
}

impl Skin for Sprite {
    fn sprite(&self) -> Result<Arc<Sprite>> {
        Ok(Arc::new(*self))
    }
}

impl Skin for Arc<Sprite> {
    fn sprite(&self) -> Result<Arc<Sprite>> {
        Ok(Arc::clone(self))
    }
}

//=========================================================================
// Tests
//=========================================================================
