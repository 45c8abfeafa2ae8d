//=========================================================================
// Frame Statistics
//=========================================================================
//
// Frames-per-second sampling for the dispatch loop. The rate is
// recomputed once every `SAMPLE_FRAMES` presented frames.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::debug;

//=== Constants ===========================================================

/// Frames between two FPS recomputations.
pub const SAMPLE_FRAMES: u32 = 100;

//=== FrameStats ==========================================================

#[derive(Debug, Clone)]
pub struct FrameStats {
    total_frames: u64,
    window_frames: u32,
    window_start: Instant,
    fps: f64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(start: Instant) -> Self {
        Self {
            total_frames: 0,
            window_frames: 0,
            window_start: start,
            fps: 0.0,
        }
    }

    /// Counts one presented frame. Returns the new rate when recomputed.
    pub fn record_frame(&mut self) -> Option<f64> {
        self.record_frame_at(Instant::now())
    }

    fn record_frame_at(&mut self, now: Instant) -> Option<f64> {
        self.total_frames += 1;
        self.window_frames += 1;
        if self.window_frames < SAMPLE_FRAMES {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.window_start).as_secs_f64();
        if elapsed > 0.0 {
            self.fps = f64::from(self.window_frames) / elapsed;
        }
        self.window_frames = 0;
        self.window_start = now;

        debug!("{:.1} fps over the last {} frames", self.fps, SAMPLE_FRAMES);
        Some(self.fps)
    }

    /// Most recent rate, 0.0 until the first sample completes.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
