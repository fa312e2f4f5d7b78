//! Built-in palettes
//!
//! Presets are evenly spaced colors on a cyclic gradient, 16 per palette
//! except the single-color fairy light.

use crate::color::{Rgb, rgb_from_u32};

/// Create a palette from a list of hex colors (0xRRGGBB format)
macro_rules! hex_palette {
    ($($color:expr),* $(,)?) => {
        [
            $(rgb_from_u32($color)),*
        ]
    };
}

const PRESET_NAME_PARTY: &str = "party_colors";
const PRESET_NAME_OCEAN: &str = "ocean_colors";
const PRESET_NAME_LAVA: &str = "lava_colors";
const PRESET_NAME_FOREST: &str = "forest_colors";
const PRESET_NAME_RAINBOW: &str = "rainbow_colors";
const PRESET_NAME_SNOW: &str = "snow_colors";
const PRESET_NAME_HOLLY: &str = "holly_colors";
const PRESET_NAME_ICE: &str = "ice_colors";
const PRESET_NAME_FAIRY_LIGHT: &str = "fairy_light";
const PRESET_NAME_RETRO_C9: &str = "retro_c9";
const PRESET_NAME_CLOUD: &str = "cloud_colors";
const PRESET_NAME_INCANDESCENT: &str = "incandescent";

// Purple, red, orange, yellow, green and blue, twice around
#[allow(clippy::unreadable_literal)]
const PARTY_COLORS: [Rgb; 16] = hex_palette![
    0x5500AB, 0x8400FF, 0xFF0000, 0xFF5500,
    0xFFAA00, 0xFFFF00, 0x00FF00, 0x00AB55,
    0x0055AB, 0x0000FF, 0x5500AB, 0xAB0055,
    0xFF0000, 0xFF5500, 0xFFAA00, 0xFFFF00,
];

// Navy through medium blue to aqua green and back
#[allow(clippy::unreadable_literal)]
const OCEAN_COLORS: [Rgb; 16] = hex_palette![
    0x000080, 0x0000AA, 0x0020C0, 0x0040C8,
    0x0060C8, 0x0080C8, 0x0096B4, 0x00AAA0,
    0x00B48C, 0x00BE78, 0x00C864, 0x00BE78,
    0x00AAA0, 0x0080C8, 0x0040C8, 0x0000AA,
];

// Dark red up to yellow and back down
#[allow(clippy::unreadable_literal)]
const LAVA_COLORS: [Rgb; 16] = hex_palette![
    0x800000, 0xAA0000, 0xC80000, 0xFF0000,
    0xFF4000, 0xFF8000, 0xFFC000, 0xFFFF00,
    0xFFC000, 0xFF8000, 0xFF4000, 0xFF0000,
    0xC80000, 0xAA0000, 0x800000, 0x600000,
];

#[allow(clippy::unreadable_literal)]
const FOREST_COLORS: [Rgb; 16] = hex_palette![
    0x004000, 0x006000, 0x008000, 0x20A000,
    0x40C000, 0x60C820, 0x40C000, 0x20A000,
    0x008000, 0x006020, 0x004000, 0x205000,
    0x406000, 0x205000, 0x004010, 0x005000,
];

// Full hue circle, ending where it starts
#[allow(clippy::unreadable_literal)]
const RAINBOW_COLORS: [Rgb; 16] = hex_palette![
    0xFF0000, 0xFF4000, 0xFF8000, 0xFFC000,
    0xFFFF00, 0x80FF00, 0x00FF00, 0x00FF80,
    0x00FFFF, 0x0080FF, 0x0000FF, 0x8000FF,
    0xFF00FF, 0xFF0080, 0xFF0040, 0xFF0000,
];

#[allow(clippy::unreadable_literal)]
const SNOW_COLORS: [Rgb; 16] = hex_palette![
    0xFFFFFF, 0xF0F8FF, 0xE6F0FF, 0xDCEBFF,
    0xC8DCFF, 0xB4C8FF, 0xC8DCFF, 0xDCEBFF,
    0xFFFFFF, 0xF5FAFF, 0xEBF5FF, 0xE1F0FF,
    0xFFFFFF, 0xF0F8FF, 0xE6F5FF, 0xFFFFFF,
];

// Alternating red and green bands
#[allow(clippy::unreadable_literal)]
const HOLLY_COLORS: [Rgb; 16] = hex_palette![
    0xFF0000, 0xFF0000, 0xC80000, 0xA00000,
    0x00FF00, 0x00FF00, 0x00C800, 0x00A000,
    0xFF0000, 0xFF0000, 0xC80000, 0xA00000,
    0x00FF00, 0x00FF00, 0x00C800, 0x00A000,
];

#[allow(clippy::unreadable_literal)]
const ICE_COLORS: [Rgb; 16] = hex_palette![
    0xFFFFFF, 0xE0F0FF, 0xC0E0FF, 0xA0D0FF,
    0x80C0FF, 0x60B0FF, 0x40A0FF, 0x2090FF,
    0x40A0FF, 0x60B0FF, 0x80C0FF, 0xA0D0FF,
    0xC0E0FF, 0xE0F0FF, 0xFFFFFF, 0xF0F8FF,
];

// Warm white only
const FAIRY_LIGHT: [Rgb; 1] = hex_palette![0xFFC864];

// Classic C9 bulb colors, two slots each
#[allow(clippy::unreadable_literal)]
const RETRO_C9: [Rgb; 16] = hex_palette![
    0xFF0000, 0xFF0000, 0xFF8000, 0xFF8000,
    0xFFFF00, 0xFFFF00, 0x00FF00, 0x00FF00,
    0x0000FF, 0x0000FF, 0x8000FF, 0x8000FF,
    0xFF0080, 0xFF0080, 0xFFFFFF, 0xFFFFFF,
];

// Blue and white, like clouds
#[allow(clippy::unreadable_literal)]
const CLOUD_COLORS: [Rgb; 16] = hex_palette![
    0x0000FF, 0x0040FF, 0x4080FF, 0x80C0FF,
    0xC0DCFF, 0xFFFFFF, 0xC0DCFF, 0x80C0FF,
    0x4080FF, 0x0040FF, 0x0000FF, 0x4080FF,
    0x80C0FF, 0xC0DCFF, 0xFFFFFF, 0x80C0FF,
];

// Candle orange to warm yellow
#[allow(clippy::unreadable_literal)]
const INCANDESCENT: [Rgb; 16] = hex_palette![
    0xFF9329, 0xFFA032, 0xFFAA3C, 0xFFB446,
    0xFFBE50, 0xFFC85A, 0xFFBE50, 0xFFB446,
    0xFFAA3C, 0xFFA032, 0xFF9329, 0xFF8C23,
    0xFF821E, 0xFF8C23, 0xFF962D, 0xFFA037,
];

/// Palettes that ship with the crate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetPalette {
    PartyColors,
    OceanColors,
    LavaColors,
    ForestColors,
    RainbowColors,
    SnowColors,
    HollyColors,
    IceColors,
    FairyLight,
    RetroC9,
    CloudColors,
    Incandescent,
}

impl PresetPalette {
    pub const ALL: [Self; 12] = [
        Self::PartyColors,
        Self::OceanColors,
        Self::LavaColors,
        Self::ForestColors,
        Self::RainbowColors,
        Self::SnowColors,
        Self::HollyColors,
        Self::IceColors,
        Self::FairyLight,
        Self::RetroC9,
        Self::CloudColors,
        Self::Incandescent,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PartyColors => PRESET_NAME_PARTY,
            Self::OceanColors => PRESET_NAME_OCEAN,
            Self::LavaColors => PRESET_NAME_LAVA,
            Self::ForestColors => PRESET_NAME_FOREST,
            Self::RainbowColors => PRESET_NAME_RAINBOW,
            Self::SnowColors => PRESET_NAME_SNOW,
            Self::HollyColors => PRESET_NAME_HOLLY,
            Self::IceColors => PRESET_NAME_ICE,
            Self::FairyLight => PRESET_NAME_FAIRY_LIGHT,
            Self::RetroC9 => PRESET_NAME_RETRO_C9,
            Self::CloudColors => PRESET_NAME_CLOUD,
            Self::Incandescent => PRESET_NAME_INCANDESCENT,
        }
    }

    /// Case-insensitive parse of a preset name
    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
    }

    /// Evenly spaced colors of this preset
    pub const fn colors(self) -> &'static [Rgb] {
        match self {
            Self::PartyColors => &PARTY_COLORS,
            Self::OceanColors => &OCEAN_COLORS,
            Self::LavaColors => &LAVA_COLORS,
            Self::ForestColors => &FOREST_COLORS,
            Self::RainbowColors => &RAINBOW_COLORS,
            Self::SnowColors => &SNOW_COLORS,
            Self::HollyColors => &HOLLY_COLORS,
            Self::IceColors => &ICE_COLORS,
            Self::FairyLight => &FAIRY_LIGHT,
            Self::RetroC9 => &RETRO_C9,
            Self::CloudColors => &CLOUD_COLORS,
            Self::Incandescent => &INCANDESCENT,
        }
    }
}
