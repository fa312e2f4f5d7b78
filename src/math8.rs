//! 8-bit fixed-point helpers shared by the renderers

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
/// `scale8(x, 255) == x` and `scale8(x, 0) == 0`.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values
///
/// `amount_of_b` of 0 returns `a`, 255 returns `b` exactly.
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Subtract with saturation at zero
#[inline]
pub const fn qsub8(value: u8, amount: u8) -> u8 {
    value.saturating_sub(amount)
}

/// Asymmetric triangle wave: fast linear attack, slower linear decay
///
/// Rises from 0 to 255 over the first third of the cycle (0..86),
/// then falls back towards 0 over the remaining two thirds.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn attack_decay_wave8(phase: u8) -> u8 {
    if phase < 86 {
        // 85 * 3 = 255, no overflow
        phase * 3
    } else {
        let i = (phase - 86) as u16;
        let fall = i + i / 2;
        (255 - fall) as u8
    }
}
