use crate::{
    color::{Rgb, Rgbw, White},
    math8::{blend8, scale8},
};

/// Build an RGBW pixel from its four channels
#[inline]
pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Rgbw {
    Rgbw {
        r,
        g,
        b,
        a: White(w),
    }
}

/// Widen an RGB color to RGBW with the white channel off
#[inline]
pub const fn to_rgbw(color: Rgb) -> Rgbw {
    rgbw(color.r, color.g, color.b, 0)
}

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Blend two RGBW colors, white channel included
#[inline]
pub fn blend_rgbw(a: Rgbw, b: Rgbw, amount_of_b: u8) -> Rgbw {
    rgbw(
        blend8(a.r, b.r, amount_of_b),
        blend8(a.g, b.g, amount_of_b),
        blend8(a.b, b.b, amount_of_b),
        blend8(a.a.0, b.a.0, amount_of_b),
    )
}

/// Scale every channel of a color by `brightness` (0-255 = 0.0-1.0)
#[inline]
pub fn scale_color(color: Rgb, brightness: u8) -> Rgb {
    Rgb {
        r: scale8(color.r, brightness),
        g: scale8(color.g, brightness),
        b: scale8(color.b, brightness),
    }
}

/// Perceived light level of a color, the mean of its channels
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn average_light(color: Rgb) -> u8 {
    ((u16::from(color.r) + u16::from(color.g) + u16::from(color.b)) / 3) as u8
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
