mod utils;

use smart_leds::{RGB8, RGBW};

pub use smart_leds::White;
pub use utils::{
    average_light, blend_colors, blend_rgbw, rgb_from_u32, rgbw, scale_color, to_rgbw,
};

pub type Rgb = RGB8;
pub type Rgbw = RGBW<u8>;

/// Fully dark pixel
pub const BLACK: Rgbw = rgbw(0, 0, 0, 0);
