//! Color twinkles effect
//!
//! Random pixels fade in to a palette color and back out to black.

use embassy_time::Duration;

use super::{Effect, EffectState, FrameContext, Lifecycle};
use crate::{
    color::{BLACK, Rgbw, scale_color, to_rgbw},
    config::ColorTwinklesConfig,
    error::Result,
    noise::RandomField,
};

/// Random streams of the spawn draws, outside any pixel index in use
const SPAWN_ROLL: u32 = u32::MAX;
const SPAWN_TARGET: u32 = u32::MAX - 1;
const SPAWN_COLOR: u32 = u32::MAX - 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TwinkleStage {
    #[default]
    Off,
    FadeIn,
    FadeOut,
}

/// State of a single twinkling pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorTwinklePixel {
    pub stage: TwinkleStage,
    pub brightness: u8,
    /// Palette position picked when the twinkle spawned
    pub position: u8,
}

impl ColorTwinklePixel {
    fn fade(&mut self, peak: u8, fade_in: u8, fade_out: u8) {
        match self.stage {
            TwinkleStage::Off => {}
            TwinkleStage::FadeIn => {
                self.brightness = self.brightness.saturating_add(fade_in).min(peak);
                if self.brightness >= peak {
                    self.stage = TwinkleStage::FadeOut;
                }
            }
            TwinkleStage::FadeOut => {
                self.brightness = self.brightness.saturating_sub(fade_out);
                if self.brightness == 0 {
                    self.stage = TwinkleStage::Off;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColorTwinklesEffect<const N: usize> {
    starting_brightness: u8,
    fade_in_speed: u8,
    fade_out_speed: u8,
    density: u8,
    state: EffectState<ColorTwinklePixel, N>,
}

impl<const N: usize> ColorTwinklesEffect<N> {
    pub fn new(config: &ColorTwinklesConfig, len: usize) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            starting_brightness: config.starting_brightness,
            fade_in_speed: config.fade_in_speed,
            fade_out_speed: config.fade_out_speed,
            density: config.density,
            state: EffectState::new(len)?,
        })
    }

    pub fn state(&self) -> &EffectState<ColorTwinklePixel, N> {
        &self.state
    }

    /// Try to light one random pixel
    #[allow(clippy::cast_possible_truncation)]
    fn spawn(&mut self, field: RandomField, step: u64) {
        let roll = (u32::from(field.sample(SPAWN_ROLL, step)) * 255) >> 16;
        if roll >= u32::from(self.density) {
            return;
        }

        let pixels = self.state.pixels_mut();
        let len = pixels.len() as u64;
        if len == 0 {
            return;
        }
        let target = (u64::from(field.sample(SPAWN_TARGET, step)) * len) >> 16;
        let Some(pixel) = pixels.get_mut(target as usize) else {
            return;
        };

        if pixel.stage == TwinkleStage::Off {
            *pixel = ColorTwinklePixel {
                stage: TwinkleStage::FadeIn,
                brightness: 0,
                position: (field.sample(SPAWN_COLOR, step) >> 8) as u8,
            };
        }
    }
}

impl<const N: usize> Effect for ColorTwinklesEffect<N> {
    const STEP_INTERVAL: Duration = Duration::from_millis(40);

    fn render(&mut self, ctx: &FrameContext<'_>, dt: Duration, leds: &mut [Rgbw]) {
        let Some(time) = self.state.advance(dt, Self::STEP_INTERVAL) else {
            return;
        };

        let (peak, fade_in, fade_out) = (
            self.starting_brightness,
            self.fade_in_speed,
            self.fade_out_speed,
        );
        for offset in 0..time.steps {
            self.spawn(ctx.field, time.first_step.wrapping_add(u64::from(offset)));
            for pixel in self.state.pixels_mut() {
                pixel.fade(peak, fade_in, fade_out);
            }
        }

        for (pixel, led) in self.state.pixels().iter().zip(leds.iter_mut()) {
            *led = match pixel.stage {
                TwinkleStage::Off => BLACK,
                TwinkleStage::FadeIn | TwinkleStage::FadeOut => to_rgbw(scale_color(
                    ctx.palette.sample(pixel.position),
                    pixel.brightness,
                )),
            };
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    fn stop(&mut self) {
        self.state.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_rises_to_peak_then_falls_to_off() {
        let mut pixel = ColorTwinklePixel {
            stage: TwinkleStage::FadeIn,
            brightness: 0,
            position: 0,
        };

        let mut trace = [0u8; 6];
        for value in &mut trace {
            pixel.fade(64, 32, 20);
            *value = pixel.brightness;
        }

        assert_eq!(trace, [32, 64, 44, 24, 4, 0]);
        assert_eq!(pixel.stage, TwinkleStage::Off);
    }

    #[test]
    fn off_pixels_stay_dark() {
        let mut pixel = ColorTwinklePixel::default();
        pixel.fade(64, 32, 20);
        assert_eq!(pixel, ColorTwinklePixel::default());
    }
}
