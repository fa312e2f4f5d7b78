//! Stars effect
//!
//! Pixels ignite at random to full brightness and fade back into the
//! background.

use embassy_time::Duration;

use super::{Effect, EffectState, FrameContext, Lifecycle, pixel_index};
use crate::{
    color::{BLACK, Rgbw, blend_rgbw, rgbw},
    config::StarsConfig,
    error::Result,
    math8::scale8,
};

const FULL_BRIGHTNESS: u8 = 255;

/// Brightness kept per step, out of 255
const DECAY_SCALE: u8 = 224;

/// Size of the random sample range
const SAMPLE_RANGE: f32 = 65_536.0;

const WHITE: Rgbw = rgbw(255, 255, 255, 0);

#[derive(Debug, Clone)]
pub struct StarsEffect<const N: usize> {
    /// Samples below this value ignite a star
    threshold: u32,
    color: Rgbw,
    background: Rgbw,
    /// Brightness of every pixel
    state: EffectState<u8, N>,
}

impl<const N: usize> StarsEffect<N> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(config: &StarsConfig, len: usize) -> Result<Self> {
        config.validate()?;

        let threshold = libm::roundf(config.probability / 100.0 * SAMPLE_RANGE) as u32;
        let color = if config.color == BLACK {
            WHITE
        } else {
            config.color
        };

        Ok(Self {
            threshold,
            color,
            background: config.background,
            state: EffectState::new(len)?,
        })
    }

    pub fn state(&self) -> &EffectState<u8, N> {
        &self.state
    }
}

impl<const N: usize> Effect for StarsEffect<N> {
    const STEP_INTERVAL: Duration = Duration::from_millis(16);

    fn render(&mut self, ctx: &FrameContext<'_>, dt: Duration, leds: &mut [Rgbw]) {
        let Some(time) = self.state.advance(dt, Self::STEP_INTERVAL) else {
            return;
        };

        // The very first frame always rolls once, even before a full step
        let draws = if time.is_first {
            time.steps.max(1)
        } else {
            time.steps
        };
        let threshold = self.threshold;

        for (i, (brightness, led)) in self
            .state
            .pixels_mut()
            .iter_mut()
            .zip(leds.iter_mut())
            .enumerate()
        {
            let pixel = pixel_index(i);
            for offset in 0..draws {
                let step = time.first_step.wrapping_add(u64::from(offset));
                *brightness = if u32::from(ctx.field.sample(pixel, step)) < threshold {
                    FULL_BRIGHTNESS
                } else {
                    scale8(*brightness, DECAY_SCALE)
                };
            }

            *led = blend_rgbw(self.background, self.color, *brightness);
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    fn stop(&mut self) {
        self.state.stop();
    }
}
