//! Effect parameters
//!
//! One config struct per effect family. Defaults match the host schema;
//! values are validated once, when an effect instance is constructed.

use crate::color::{BLACK, Rgb, Rgbw, rgbw};
use crate::effect::EffectKind;
use crate::error::{Error, Result};
use crate::palette::PaletteRef;

const DEFAULT_STARS_PROBABILITY: f32 = 10.0;

const DEFAULT_TWINKLE_SPEED: u8 = 4;
const DEFAULT_TWINKLE_DENSITY: u8 = 5;
const TWINKLE_RANGE: (u8, u8) = (1, 8);

const DEFAULT_STARTING_BRIGHTNESS: u8 = 64;
const DEFAULT_FADE_IN_SPEED: u8 = 32;
const DEFAULT_FADE_OUT_SPEED: u8 = 20;
const DEFAULT_COLOR_TWINKLES_DENSITY: u8 = 255;

const DEFAULT_CYCLE_S: u8 = 20;
const MAX_CYCLE_S: u8 = 20;
const DEFAULT_BLEND_SCALE: u8 = 8;
const MAX_BLEND_SCALE: u8 = 64;

fn check_range(field: &'static str, value: u8, min: u8, max: u8) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::config_range(field, value, f32::from(min), f32::from(max)))
    }
}

fn check_percent(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::config_range(field, value, 0.0, 100.0))
    }
}

/// Convert a 0-100 % channel to 0-255
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_to_u8(field: &'static str, value: f32) -> Result<u8> {
    check_percent(field, value)?;
    Ok(libm::roundf(value * 255.0 / 100.0) as u8)
}

/// Build an RGBW color from 0-100 % channels
pub fn rgbw_from_percent(r: f32, g: f32, b: f32, w: f32) -> Result<Rgbw> {
    Ok(rgbw(
        percent_to_u8("red", r)?,
        percent_to_u8("green", g)?,
        percent_to_u8("blue", b)?,
        percent_to_u8("white", w)?,
    ))
}

/// Build an RGB color from 0-100 % channels
pub fn rgb_from_percent(r: f32, g: f32, b: f32) -> Result<Rgb> {
    Ok(Rgb {
        r: percent_to_u8("red", r)?,
        g: percent_to_u8("green", g)?,
        b: percent_to_u8("blue", b)?,
    })
}

/// Stars effect parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StarsConfig {
    /// Chance for a pixel to ignite on a tick, in percent (0-100)
    pub probability: f32,
    /// Star color; all channels zero means white
    pub color: Rgbw,
    /// Color shown where no star burns
    pub background: Rgbw,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            probability: DEFAULT_STARS_PROBABILITY,
            color: BLACK,
            background: BLACK,
        }
    }
}

impl StarsConfig {
    #[must_use]
    pub fn with_probability(mut self, percent: f32) -> Self {
        self.probability = percent;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgbw) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Rgbw) -> Self {
        self.background = background;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_percent("probability", self.probability)
    }
}

/// TwinkleFox effect parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TwinkleFoxConfig {
    /// Twinkle speed (1-8), each step doubles the rate
    pub speed: u8,
    /// Share of pixels lit per cycle, in eighths (1-8)
    pub density: u8,
    /// Fading twinkles shift towards red, like cooling filaments
    pub cool_like_incandescent: bool,
    /// Derive the background from the palette instead of `background`
    pub auto_background: bool,
    pub background: Rgb,
    pub palette: PaletteRef,
}

impl Default for TwinkleFoxConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_TWINKLE_SPEED,
            density: DEFAULT_TWINKLE_DENSITY,
            cool_like_incandescent: true,
            auto_background: false,
            background: Rgb::default(),
            palette: PaletteRef::Preset(EffectKind::TwinkleFox.default_palette()),
        }
    }
}

impl TwinkleFoxConfig {
    #[must_use]
    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: u8) -> Self {
        self.density = density;
        self
    }

    #[must_use]
    pub fn with_cool_like_incandescent(mut self, enabled: bool) -> Self {
        self.cool_like_incandescent = enabled;
        self
    }

    #[must_use]
    pub fn with_auto_background(mut self, enabled: bool) -> Self {
        self.auto_background = enabled;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: impl Into<PaletteRef>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = TWINKLE_RANGE;
        check_range("twinkle_speed", self.speed, min, max)?;
        check_range("twinkle_density", self.density, min, max)
    }
}

/// Color twinkles effect parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTwinklesConfig {
    /// Peak brightness of a twinkle (1-255)
    pub starting_brightness: u8,
    /// Brightness gained per step while fading in (1-255)
    pub fade_in_speed: u8,
    /// Brightness lost per step while fading out (1-255)
    pub fade_out_speed: u8,
    /// Chance of a new twinkle per step, out of 255
    pub density: u8,
    pub palette: PaletteRef,
}

impl Default for ColorTwinklesConfig {
    fn default() -> Self {
        Self {
            starting_brightness: DEFAULT_STARTING_BRIGHTNESS,
            fade_in_speed: DEFAULT_FADE_IN_SPEED,
            fade_out_speed: DEFAULT_FADE_OUT_SPEED,
            density: DEFAULT_COLOR_TWINKLES_DENSITY,
            palette: PaletteRef::Preset(EffectKind::ColorTwinkles.default_palette()),
        }
    }
}

impl ColorTwinklesConfig {
    #[must_use]
    pub fn with_starting_brightness(mut self, brightness: u8) -> Self {
        self.starting_brightness = brightness;
        self
    }

    #[must_use]
    pub fn with_fade_in_speed(mut self, speed: u8) -> Self {
        self.fade_in_speed = speed;
        self
    }

    #[must_use]
    pub fn with_fade_out_speed(mut self, speed: u8) -> Self {
        self.fade_out_speed = speed;
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: u8) -> Self {
        self.density = density;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: impl Into<PaletteRef>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_range("starting_brightness", self.starting_brightness, 1, 255)?;
        check_range("fade_in_speed", self.fade_in_speed, 1, 255)?;
        check_range("fade_out_speed", self.fade_out_speed, 1, 255)?;
        check_range("density", self.density, 1, 255)
    }
}

/// Palette blends effect parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BlendsConfig {
    /// Seconds per full palette rotation (0-20), 0 freezes the gradient
    pub cycle_s: u8,
    /// Palette positions between neighbouring pixels (1-64)
    pub scale: u8,
    /// Per-frame blend towards the target color, 0 disables smoothing
    pub smoothing: u8,
    pub palette: PaletteRef,
}

impl Default for BlendsConfig {
    fn default() -> Self {
        Self {
            cycle_s: DEFAULT_CYCLE_S,
            scale: DEFAULT_BLEND_SCALE,
            smoothing: 0,
            palette: PaletteRef::Preset(EffectKind::Blends.default_palette()),
        }
    }
}

impl BlendsConfig {
    #[must_use]
    pub fn with_cycle_s(mut self, cycle_s: u8) -> Self {
        self.cycle_s = cycle_s;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_smoothing(mut self, smoothing: u8) -> Self {
        self.smoothing = smoothing;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: impl Into<PaletteRef>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_range("cycle_s", self.cycle_s, 0, MAX_CYCLE_S)?;
        check_range("scale", self.scale, 1, MAX_BLEND_SCALE)
    }
}

/// Parameters of any effect family
#[derive(Debug, Clone, PartialEq)]
pub enum EffectConfig {
    Stars(StarsConfig),
    TwinkleFox(TwinkleFoxConfig),
    ColorTwinkles(ColorTwinklesConfig),
    Blends(BlendsConfig),
}

impl EffectConfig {
    /// Default parameters of an effect family
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Stars => Self::Stars(StarsConfig::default()),
            EffectKind::TwinkleFox => Self::TwinkleFox(TwinkleFoxConfig::default()),
            EffectKind::ColorTwinkles => Self::ColorTwinkles(ColorTwinklesConfig::default()),
            EffectKind::Blends => Self::Blends(BlendsConfig::default()),
        }
    }

    pub const fn kind(&self) -> EffectKind {
        match self {
            Self::Stars(_) => EffectKind::Stars,
            Self::TwinkleFox(_) => EffectKind::TwinkleFox,
            Self::ColorTwinkles(_) => EffectKind::ColorTwinkles,
            Self::Blends(_) => EffectKind::Blends,
        }
    }

    /// Palette reference, if the family uses a palette
    pub const fn palette(&self) -> Option<&PaletteRef> {
        match self {
            Self::Stars(_) => None,
            Self::TwinkleFox(config) => Some(&config.palette),
            Self::ColorTwinkles(config) => Some(&config.palette),
            Self::Blends(config) => Some(&config.palette),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Stars(config) => config.validate(),
            Self::TwinkleFox(config) => config.validate(),
            Self::ColorTwinkles(config) => config.validate(),
            Self::Blends(config) => config.validate(),
        }
    }
}

impl From<StarsConfig> for EffectConfig {
    fn from(config: StarsConfig) -> Self {
        Self::Stars(config)
    }
}

impl From<TwinkleFoxConfig> for EffectConfig {
    fn from(config: TwinkleFoxConfig) -> Self {
        Self::TwinkleFox(config)
    }
}

impl From<ColorTwinklesConfig> for EffectConfig {
    fn from(config: ColorTwinklesConfig) -> Self {
        Self::ColorTwinkles(config)
    }
}

impl From<BlendsConfig> for EffectConfig {
    fn from(config: BlendsConfig) -> Self {
        Self::Blends(config)
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::Stars(StarsConfig::default())
    }
}

