//! TwinkleFox effect
//!
//! Every pixel runs its own clock at a slightly different rate. The clock's
//! low byte is the twinkle phase, the rest counts twinkle cycles. For each
//! cycle a random draw decides whether the pixel lights up and which palette
//! color it shows, so the strip never repeats visibly.

use embassy_time::Duration;

use super::{Effect, EffectState, FrameContext, Lifecycle, pixel_index};
use crate::{
    color::{Rgb, Rgbw, average_light, blend_colors, scale_color, to_rgbw},
    config::TwinkleFoxConfig,
    error::Result,
    math8::{attack_decay_wave8, qsub8},
    noise::RandomField,
};

/// Random stream used to seed per-pixel clocks
const CLOCK_SEED_STREAM: u32 = 0x7F0C;

/// Auto background is the palette average at 1/16 brightness
const AUTO_BACKGROUND_SCALE: u8 = 16;

/// Twinkles this much brighter than the background are drawn as is
const FULL_CONTRAST: u8 = 32;

const SPEED_MULT_BASE: u8 = 8;

/// Per-pixel clock state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwinklePixel {
    /// Pixel clock in 1/8 ms units
    pub clock: u32,
    /// Clock value at the first frame
    pub offset: u32,
    /// Clock rate in eighths (8-23)
    pub speed_mult: u8,
    /// Per-pixel offset of the cycle draws
    pub salt: u8,
}

#[derive(Debug, Clone, Copy)]
struct TwinkleParams {
    speed: u8,
    density: u8,
    cool_like_incandescent: bool,
}

impl TwinkleParams {
    /// Color of one pixel at its current clock
    #[allow(clippy::cast_possible_truncation)]
    fn twinkle(self, ctx: &FrameContext<'_>, pixel: u32, state: TwinklePixel) -> Rgb {
        let ms = state.clock >> 3;
        let ticks = ms >> 8u8.saturating_sub(self.speed).min(7);
        let phase = (ticks & 0xFF) as u8;
        let cycle = ticks >> 8;

        let draw = ctx
            .field
            .sample(pixel, (u64::from(state.salt) << 32) | u64::from(cycle));
        // Top three bits: 0-7, so density 8 lights every cycle
        if (draw >> 13) as u8 >= self.density {
            return Rgb::default();
        }

        let brightness = attack_decay_wave8(phase);
        if brightness == 0 {
            return Rgb::default();
        }

        let mut color = scale_color(ctx.palette.sample((draw & 0xFF) as u8), brightness);
        if self.cool_like_incandescent {
            cool_like_incandescent(&mut color, phase);
        }
        color
    }
}

/// Shift a fading twinkle towards red
fn cool_like_incandescent(color: &mut Rgb, phase: u8) {
    if phase < 128 {
        return;
    }
    let cooling = (phase - 128) >> 4;
    color.g = qsub8(color.g, cooling);
    color.b = qsub8(color.b, cooling * 2);
}

/// Draw a twinkle over the background
fn composite(background: Rgb, background_light: u8, twinkle: Rgb) -> Rgb {
    let delta = average_light(twinkle).saturating_sub(background_light);
    if delta >= FULL_CONTRAST || background == Rgb::default() {
        twinkle
    } else if delta > 0 {
        blend_colors(background, twinkle, delta.saturating_mul(8))
    } else {
        background
    }
}

#[derive(Debug, Clone)]
pub struct TwinkleFoxEffect<const N: usize> {
    params: TwinkleParams,
    auto_background: bool,
    background: Rgb,
    /// Time since the first frame; pixel clocks derive from it
    elapsed_us: u64,
    state: EffectState<TwinklePixel, N>,
}

impl<const N: usize> TwinkleFoxEffect<N> {
    pub fn new(config: &TwinkleFoxConfig, len: usize) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            params: TwinkleParams {
                speed: config.speed,
                density: config.density,
                cool_like_incandescent: config.cool_like_incandescent,
            },
            auto_background: config.auto_background,
            background: config.background,
            elapsed_us: 0,
            state: EffectState::new(len)?,
        })
    }

    /// Background drawn under inactive pixels
    pub const fn background(&self) -> Rgb {
        self.background
    }

    pub fn state(&self) -> &EffectState<TwinklePixel, N> {
        &self.state
    }

    /// Spread pixel clocks, rates and salts
    #[allow(clippy::cast_possible_truncation)]
    fn seed_pixels(&mut self, field: RandomField) {
        let field = field.fork(CLOCK_SEED_STREAM);
        for (i, pixel) in self.state.pixels_mut().iter_mut().enumerate() {
            let index = pixel_index(i);
            let offset = field.sample(index, 0);
            let rate = field.sample(index, 1);

            let offset = u32::from(offset) << 3;
            *pixel = TwinklePixel {
                clock: offset,
                offset,
                speed_mult: SPEED_MULT_BASE + (rate & 0x0F) as u8,
                salt: (rate >> 8) as u8,
            };
        }
    }
}

impl<const N: usize> Effect for TwinkleFoxEffect<N> {
    // Clocks integrate dt directly; the interval only paces the tick counter
    const STEP_INTERVAL: Duration = Duration::from_millis(16);

    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, ctx: &FrameContext<'_>, dt: Duration, leds: &mut [Rgbw]) {
        let Some(time) = self.state.advance(dt, Self::STEP_INTERVAL) else {
            return;
        };

        if time.is_first {
            self.seed_pixels(ctx.field);
        }
        // Follows the palette, which may be replaced between frames
        if self.auto_background {
            self.background = scale_color(ctx.palette.average(), AUTO_BACKGROUND_SCALE);
        }

        let params = self.params;
        let background = self.background;
        let background_light = average_light(background);
        self.elapsed_us = self.elapsed_us.saturating_add(time.dt.as_micros());
        let elapsed_us = self.elapsed_us;

        for (i, (pixel, led)) in self
            .state
            .pixels_mut()
            .iter_mut()
            .zip(leds.iter_mut())
            .enumerate()
        {
            // 1/8 ms per unit, scaled by the rate in eighths; wraps with the clock
            let advance = elapsed_us.saturating_mul(u64::from(pixel.speed_mult)) / 1000;
            pixel.clock = pixel.offset.wrapping_add(advance as u32);

            let twinkle = params.twinkle(ctx, pixel_index(i), *pixel);
            *led = to_rgbw(composite(background, background_light, twinkle));
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    fn stop(&mut self) {
        self.state.stop();
    }
}
