//! Frame-based sprite-sheet animation with deterministic tick logic.
//!
//! Timing uses integer microseconds (`u64`) so that replays advance clips the
//! same way on every platform. Frame indices refer to cells of a horizontal
//! sprite sheet described by an [`crate::assets::SpriteAsset`].

/// A single cell of a sprite sheet and how long it stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    pub index: usize,
    pub duration_us: u64,
}

/// A sequence of sheet cells that can loop or play once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimationClip {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
}

impl AnimationClip {
    /// Clip that walks cells `0..frame_count` with the same duration each.
    pub fn uniform(frame_count: usize, frame_ms: u64, looping: bool) -> Self {
        Self {
            frames: (0..frame_count)
                .map(|index| AnimationFrame {
                    index,
                    duration_us: frame_ms * 1000,
                })
                .collect(),
            looping,
        }
    }

    /// Total duration of one full cycle in microseconds.
    pub fn total_duration_us(&self) -> u64 {
        self.frames.iter().map(|f| f.duration_us).sum()
    }
}

/// Runtime playback position inside one clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationState {
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sheet cell for the current position, or 0 for an empty clip.
    pub fn current(&self, clip: &AnimationClip) -> usize {
        clip.frames
            .get(self.frame_index)
            .or_else(|| clip.frames.last())
            .map_or(0, |frame| frame.index)
    }

    /// Advance by `dt_us` microseconds and return the sheet cell to display.
    pub fn tick(&mut self, dt_us: u64, clip: &AnimationClip) -> usize {
        if clip.frames.is_empty() || self.finished {
            return self.current(clip);
        }

        self.elapsed_us += dt_us;

        loop {
            let current_frame = &clip.frames[self.frame_index];
            // Zero-length frames would spin forever.
            if current_frame.duration_us == 0 || self.elapsed_us < current_frame.duration_us {
                break;
            }

            self.elapsed_us -= current_frame.duration_us;
            self.frame_index += 1;

            if self.frame_index >= clip.frames.len() {
                if clip.looping {
                    self.frame_index = 0;
                } else {
                    self.frame_index = clip.frames.len() - 1;
                    self.elapsed_us = 0;
                    self.finished = true;
                    break;
                }
            }
        }

        clip.frames[self.frame_index].index
    }
}

/// Convert a frame delta in seconds to whole microseconds. Negative deltas clamp to zero.
pub fn seconds_to_us(dt: f32) -> u64 {
    (f64::from(dt.max(0.0)) * 1_000_000.0).round() as u64
}
