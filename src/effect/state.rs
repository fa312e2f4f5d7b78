//! Per-instance effect state
//!
//! Each running effect owns exactly one [`EffectState`]: its lifecycle, a
//! tick counter, a step clock and one state entry per pixel.

use embassy_time::Duration;
use heapless::Vec;

use crate::error::{Error, Result};

/// Upper bound of animation steps applied in one tick
///
/// After a long stall the backlog is dropped instead of replayed.
pub const MAX_CATCHUP_STEPS: u32 = 64;

/// Lifecycle of an effect instance
///
/// Transitions only move forward: `Idle -> Running -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed, no frame rendered yet
    #[default]
    Idle,
    Running,
    /// Terminal
    Stopped,
}

/// Timing of the frame being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTime {
    /// Number of the tick, starting at 0
    pub tick: u64,
    /// Time since the previous tick
    pub dt: Duration,
    /// Whole step intervals elapsed since the previous tick
    pub steps: u32,
    /// Global number of the first step in this tick
    pub first_step: u64,
    /// First frame after construction
    pub is_first: bool,
}

/// Lifecycle, clocks and per-pixel state of one effect instance
#[derive(Debug, Clone)]
pub struct EffectState<P, const N: usize> {
    lifecycle: Lifecycle,
    tick: u64,
    step: u64,
    carry_us: u64,
    pixels: Vec<P, N>,
}

impl<P: Copy + Default, const N: usize> EffectState<P, N> {
    /// Create zeroed state for a strip of `len` pixels
    pub fn new(len: usize) -> Result<Self> {
        if len > N {
            return Err(Error::DimensionMismatch {
                strip: len,
                capacity: N,
            });
        }
        let mut pixels = Vec::new();
        // Length checked above
        let _ = pixels.resize(len, P::default());

        Ok(Self {
            lifecycle: Lifecycle::Idle,
            tick: 0,
            step: 0,
            carry_us: 0,
            pixels,
        })
    }
}

impl<P, const N: usize> EffectState<P, N> {
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Number of pixels, fixed for the lifetime of the state
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [P] {
        &mut self.pixels
    }

    /// Advance clocks by `dt` and start the instance if it is idle
    ///
    /// Returns `None` once the instance is stopped. `interval` is the nominal
    /// duration of one animation step; the part of `dt` that does not make
    /// up a whole step is carried over to the next tick.
    pub fn advance(&mut self, dt: Duration, interval: Duration) -> Option<FrameTime> {
        let is_first = match self.lifecycle {
            Lifecycle::Stopped => return None,
            Lifecycle::Idle => {
                self.lifecycle = Lifecycle::Running;
                true
            }
            Lifecycle::Running => false,
        };

        let interval_us = interval.as_micros().max(1);
        let total_us = self.carry_us.saturating_add(dt.as_micros());
        let due = total_us / interval_us;
        self.carry_us = total_us % interval_us;

        #[allow(clippy::cast_possible_truncation)]
        let steps = due.min(u64::from(MAX_CATCHUP_STEPS)) as u32;

        let time = FrameTime {
            tick: self.tick,
            dt,
            steps,
            first_step: self.step,
            is_first,
        };
        self.tick = self.tick.wrapping_add(1);
        self.step = self.step.wrapping_add(u64::from(steps));

        Some(time)
    }

    /// Stop the instance for good
    pub fn stop(&mut self) {
        self.lifecycle = Lifecycle::Stopped;
    }
}
