//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{
    OutputDriver,
    color::{BLACK, Rgbw},
    config::EffectConfig,
    error::{Error, Result},
    scheduler::{EffectHandle, EffectScheduler},
};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Portable frame scheduler that drives one effect onto one strip.
///
/// This scheduler:
/// - Tracks frame timing with drift correction
/// - Ticks the active effect with the time since the previous frame
/// - Writes the frame to the output driver
/// - Returns timing info so the caller can sleep appropriately
///
/// # Usage
///
/// ```ignore
/// let effects = EffectScheduler::<64, 1>::new(seed);
/// let mut scheduler = FrameScheduler::new(effects, driver);
/// scheduler.play(&EffectConfig::default())?;
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<O: OutputDriver, const MAX_LEDS: usize, const MAX_EFFECTS: usize> {
    output: O,
    effects: EffectScheduler<MAX_LEDS, MAX_EFFECTS>,
    active: Option<EffectHandle>,
    frame: [Rgbw; MAX_LEDS],
    next_frame: Instant,
    last_frame: Option<Instant>,
    frame_duration: Duration,
}

impl<O: OutputDriver, const MAX_LEDS: usize, const MAX_EFFECTS: usize>
    FrameScheduler<O, MAX_LEDS, MAX_EFFECTS>
{
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (60 FPS) for frame timing.
    pub fn new(effects: EffectScheduler<MAX_LEDS, MAX_EFFECTS>, driver: O) -> Self {
        Self::with_frame_duration(effects, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        effects: EffectScheduler<MAX_LEDS, MAX_EFFECTS>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            effects,
            active: None,
            frame: [BLACK; MAX_LEDS],
            next_frame: Instant::from_millis(0),
            last_frame: None,
            frame_duration,
        }
    }

    /// Replace the active effect
    ///
    /// The new effect is built for the full driver length. On error the
    /// previous effect keeps playing, unless its slot was needed.
    pub fn play(&mut self, config: &EffectConfig) -> Result<EffectHandle> {
        let len = self.output.len();
        let handle = match self.effects.construct(config, len) {
            Err(Error::NoFreeSlot) if self.active.is_some() => {
                // Make room by dropping the current effect first
                if let Some(previous) = self.active.take() {
                    self.effects.destroy(previous);
                }
                self.effects.construct(config, len)?
            }
            result => result?,
        };
        if let Some(previous) = self.active.replace(handle) {
            self.effects.destroy(previous);
        }
        self.last_frame = None;

        #[cfg(feature = "esp32-log")]
        println!("[FrameScheduler.play] {}", config.kind().as_str());
        Ok(handle)
    }

    /// Destroy the active effect and blank the strip
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            self.effects.destroy(handle);
        }
        let len = self.output.len().min(MAX_LEDS);
        self.frame[..len].fill(BLACK);
        self.output.write(&self.frame[..len]);
    }

    /// Handle of the effect being played
    pub fn active(&self) -> Option<EffectHandle> {
        self.active
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Ticks the active effect with the time since the previous frame
    /// 3. Writes to the output driver
    /// 4. Returns the deadline for the next frame
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let dt = self
            .last_frame
            .map_or(Duration::from_ticks(0), |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);

        if let Some(handle) = self.active {
            let len = self.output.len().min(MAX_LEDS);
            if self.effects.tick(handle, dt, &mut self.frame[..len]) {
                self.output.write(&self.frame[..len]);
            } else {
                self.active = None;
            }
        }

        // Calculate next frame deadline
        self.next_frame += self.frame_duration;

        // Calculate sleep duration (may be zero if we're behind)
        let sleep_duration = self.next_frame.saturating_duration_since(now);

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
        }
    }

    /// Get a reference to the effect scheduler.
    pub fn effects(&self) -> &EffectScheduler<MAX_LEDS, MAX_EFFECTS> {
        &self.effects
    }

    /// Get a mutable reference to the effect scheduler.
    pub fn effects_mut(&mut self) -> &mut EffectScheduler<MAX_LEDS, MAX_EFFECTS> {
        &mut self.effects
    }

    /// Get a reference to the output driver.
    pub fn output(&self) -> &O {
        &self.output
    }
}
