//=========================================================================
// Recording Surface
//=========================================================================
//
// Headless `Surface` that records draw calls instead of rasterizing.
// Frames are captured between `clear` and `present`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Rect, Surface, TextureHandle};

//=== DrawCommand =========================================================

/// A single `draw_at` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub rect: Rect,
    pub texture: TextureHandle,
}

//=== RecordingSurface ====================================================

/// Surface that keeps the draw calls of the last presented frame.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pending: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    presented: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_at(&mut self, rect: Rect, texture: TextureHandle) {
        self.pending.push(DrawCommand { rect, texture });
    }

    fn present(&mut self) {
        // Swap keeps both allocations alive across frames
        std::mem::swap(&mut self.pending, &mut self.last_frame);
        self.pending.clear();
        self.presented += 1;
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_publishes_the_pending_frame() {
        let mut surface = RecordingSurface::new();

        surface.clear();
        surface.draw_at(Rect::new(0, 0, 1, 1), TextureHandle(1));
        surface.draw_at(Rect::new(1, 1, 1, 1), TextureHandle(2));
        assert!(surface.last_frame().is_empty());

        surface.present();
        assert_eq!(surface.frames_presented(), 1);
        assert_eq!(surface.last_frame().len(), 2);
        assert_eq!(surface.last_frame()[1].texture, TextureHandle(2));
    }

    #[test]
    fn empty_frame_replaces_previous() {
        let mut surface = RecordingSurface::new();

        surface.clear();
        surface.draw_at(Rect::new(0, 0, 1, 1), TextureHandle(1));
        surface.present();

        surface.clear();
        surface.present();

        assert!(surface.last_frame().is_empty());
        assert_eq!(surface.frames_presented(), 2);
    }
}
