//! Frame timing for the scene update loop.

use std::time::{Duration, Instant};

/// Produces the per-frame time delta handed to scene updates.
///
/// A clock is either real (measures wall time between ticks) or fixed
/// (every tick advances by the same step, for headless and scripted runs).
#[derive(Debug)]
pub struct FrameClock {
    /// Time of the last tick; `None` for a fixed-step clock.
    last_frame: Option<Instant>,
    /// Step used by a fixed-step clock.
    fixed_step: Duration,
    /// Duration of the last frame.
    delta: Duration,
    /// Total time accumulated over all ticks.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::real()
    }
}

impl FrameClock {
    /// Clock measuring wall time.
    pub fn real() -> Self {
        Self {
            last_frame: Some(Instant::now()),
            fixed_step: Duration::ZERO,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Clock advancing by `step` on every tick.
    pub fn fixed(step: Duration) -> Self {
        Self {
            last_frame: None,
            fixed_step: step,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Start a new frame. Returns the delta in milliseconds.
    pub fn tick(&mut self) -> u32 {
        self.delta = match self.last_frame.as_mut() {
            Some(last) => {
                let now = Instant::now();
                let delta = now - *last;
                *last = now;
                delta
            }
            None => self.fixed_step,
        };
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta_millis()
    }

    /// Delta of the last frame in milliseconds, saturating at `u32::MAX`.
    pub fn delta_millis(&self) -> u32 {
        u32::try_from(self.delta.as_millis()).unwrap_or(u32::MAX)
    }

    /// Total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
