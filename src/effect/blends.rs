//! Palette blends effect
//!
//! Stretches the palette along the strip and scrolls it with a continuous
//! global phase.

use embassy_time::Duration;

use super::{Effect, EffectState, FrameContext, Lifecycle};
use crate::{
    color::{Rgb, Rgbw, blend_colors, to_rgbw},
    config::BlendsConfig,
    error::Result,
};

const PHASE_RANGE: f32 = 256.0;

#[derive(Debug, Clone)]
pub struct BlendsEffect<const N: usize> {
    cycle_s: u8,
    scale: u8,
    smoothing: u8,
    /// Palette offset in `[0, 256)`
    phase: f32,
    /// Last color shown by every pixel
    state: EffectState<Rgb, N>,
}

impl<const N: usize> BlendsEffect<N> {
    pub fn new(config: &BlendsConfig, len: usize) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            cycle_s: config.cycle_s,
            scale: config.scale,
            smoothing: config.smoothing,
            phase: 0.0,
            state: EffectState::new(len)?,
        })
    }

    pub const fn phase(&self) -> f32 {
        self.phase
    }

    pub fn state(&self) -> &EffectState<Rgb, N> {
        &self.state
    }

    #[allow(clippy::cast_precision_loss)]
    fn advance_phase(&mut self, dt: Duration) {
        if self.cycle_s == 0 {
            return;
        }
        let dt_s = dt.as_micros() as f32 / 1_000_000.0;
        let phase = self.phase + PHASE_RANGE * dt_s / f32::from(self.cycle_s);
        self.phase = libm::fmodf(phase, PHASE_RANGE);
        if !(0.0..PHASE_RANGE).contains(&self.phase) {
            self.phase = 0.0;
        }
    }
}

impl<const N: usize> Effect for BlendsEffect<N> {
    // The phase integrates dt directly; the interval only paces the tick counter
    const STEP_INTERVAL: Duration = Duration::from_millis(16);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(&mut self, ctx: &FrameContext<'_>, dt: Duration, leds: &mut [Rgbw]) {
        let Some(time) = self.state.advance(dt, Self::STEP_INTERVAL) else {
            return;
        };
        self.advance_phase(time.dt);

        let offset = self.phase as u32;
        let scale = u32::from(self.scale);
        let smoothing = if time.is_first { 0 } else { self.smoothing };

        for (i, (previous, led)) in self
            .state
            .pixels_mut()
            .iter_mut()
            .zip(leds.iter_mut())
            .enumerate()
        {
            let position = ((i as u32).wrapping_mul(scale).wrapping_add(offset) & 0xFF) as u8;
            let target = ctx.palette.sample(position);

            *previous = if smoothing == 0 {
                target
            } else {
                blend_colors(*previous, target, smoothing)
            };
            *led = to_rgbw(*previous);
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    fn stop(&mut self) {
        self.state.stop();
    }
}
