//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait and owns its [`EffectState`].

mod blends;
mod color_twinkles;
mod stars;
mod state;
mod twinkle_fox;

use embassy_time::Duration;

pub use blends::BlendsEffect;
pub use color_twinkles::{ColorTwinklePixel, ColorTwinklesEffect, TwinkleStage};
pub use stars::StarsEffect;
pub use state::{EffectState, FrameTime, Lifecycle, MAX_CATCHUP_STEPS};
pub use twinkle_fox::{TwinkleFoxEffect, TwinklePixel};

use crate::{
    color::Rgbw,
    config::EffectConfig,
    error::Result,
    noise::RandomField,
    palette::{Palette, PresetPalette},
};

const EFFECT_NAME_STARS: &str = "addressable_stars";
const EFFECT_NAME_TWINKLE_FOX: &str = "addressable_twinklefox";
const EFFECT_NAME_COLOR_TWINKLES: &str = "addressable_color_twinkles";
const EFFECT_NAME_BLENDS: &str = "addressable_blends";

const EFFECT_ID_STARS: u8 = 0;
const EFFECT_ID_TWINKLE_FOX: u8 = 1;
const EFFECT_ID_COLOR_TWINKLES: u8 = 2;
const EFFECT_ID_BLENDS: u8 = 3;

/// Everything a renderer reads besides its own state
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Resolved palette of the instance
    pub palette: &'a Palette,
    /// Random field seeded for the instance
    pub field: RandomField,
}

pub trait Effect {
    /// Nominal duration of one discrete animation step
    const STEP_INTERVAL: Duration;

    /// Render a single frame
    ///
    /// `dt` is the time since the previous call. Writes at most
    /// `min(leds.len(), strip length)` pixels and never fails.
    fn render(&mut self, ctx: &FrameContext<'_>, dt: Duration, leds: &mut [Rgbw]);

    fn lifecycle(&self) -> Lifecycle;

    /// Move the instance to its terminal state
    fn stop(&mut self);
}

/// Index of a pixel as seen by the random field
#[inline]
pub(crate) fn pixel_index(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

/// Known effect families
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectKind {
    Stars = EFFECT_ID_STARS,
    TwinkleFox = EFFECT_ID_TWINKLE_FOX,
    ColorTwinkles = EFFECT_ID_COLOR_TWINKLES,
    Blends = EFFECT_ID_BLENDS,
}

impl EffectKind {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_STARS => Self::Stars,
            EFFECT_ID_TWINKLE_FOX => Self::TwinkleFox,
            EFFECT_ID_COLOR_TWINKLES => Self::ColorTwinkles,
            EFFECT_ID_BLENDS => Self::Blends,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stars => EFFECT_NAME_STARS,
            Self::TwinkleFox => EFFECT_NAME_TWINKLE_FOX,
            Self::ColorTwinkles => EFFECT_NAME_COLOR_TWINKLES,
            Self::Blends => EFFECT_NAME_BLENDS,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_STARS => Some(Self::Stars),
            EFFECT_NAME_TWINKLE_FOX => Some(Self::TwinkleFox),
            EFFECT_NAME_COLOR_TWINKLES => Some(Self::ColorTwinkles),
            EFFECT_NAME_BLENDS => Some(Self::Blends),
            _ => None,
        }
    }

    /// Palette used when none is configured or it cannot be resolved
    ///
    /// Stars do not sample a palette; they report the twinkle default.
    pub const fn default_palette(self) -> PresetPalette {
        match self {
            Self::Stars | Self::TwinkleFox => PresetPalette::PartyColors,
            Self::ColorTwinkles | Self::Blends => PresetPalette::RainbowColors,
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot<const N: usize> {
    /// Random stars igniting and fading over a background
    Stars(StarsEffect<N>),
    /// Phase-driven palette twinkles
    TwinkleFox(TwinkleFoxEffect<N>),
    /// Fade-in/fade-out palette twinkles
    ColorTwinkles(ColorTwinklesEffect<N>),
    /// Scrolling palette gradient
    Blends(BlendsEffect<N>),
}

impl<const N: usize> EffectSlot<N> {
    /// Build an idle effect for a strip of `len` pixels
    ///
    /// Validates the configuration and the strip length.
    pub fn from_config(config: &EffectConfig, len: usize) -> Result<Self> {
        Ok(match config {
            EffectConfig::Stars(config) => Self::Stars(StarsEffect::new(config, len)?),
            EffectConfig::TwinkleFox(config) => {
                Self::TwinkleFox(TwinkleFoxEffect::new(config, len)?)
            }
            EffectConfig::ColorTwinkles(config) => {
                Self::ColorTwinkles(ColorTwinklesEffect::new(config, len)?)
            }
            EffectConfig::Blends(config) => Self::Blends(BlendsEffect::new(config, len)?),
        })
    }

    /// Render the current effect
    pub fn render(&mut self, ctx: &FrameContext<'_>, dt: Duration, leds: &mut [Rgbw]) {
        match self {
            Self::Stars(effect) => effect.render(ctx, dt, leds),
            Self::TwinkleFox(effect) => effect.render(ctx, dt, leds),
            Self::ColorTwinkles(effect) => effect.render(ctx, dt, leds),
            Self::Blends(effect) => effect.render(ctx, dt, leds),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self {
            Self::Stars(effect) => effect.lifecycle(),
            Self::TwinkleFox(effect) => effect.lifecycle(),
            Self::ColorTwinkles(effect) => effect.lifecycle(),
            Self::Blends(effect) => effect.lifecycle(),
        }
    }

    pub fn stop(&mut self) {
        match self {
            Self::Stars(effect) => Effect::stop(effect),
            Self::TwinkleFox(effect) => Effect::stop(effect),
            Self::ColorTwinkles(effect) => Effect::stop(effect),
            Self::Blends(effect) => Effect::stop(effect),
        }
    }

    /// Get the effect family for external observation
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Stars(_) => EffectKind::Stars,
            Self::TwinkleFox(_) => EffectKind::TwinkleFox,
            Self::ColorTwinkles(_) => EffectKind::ColorTwinkles,
            Self::Blends(_) => EffectKind::Blends,
        }
    }
}
