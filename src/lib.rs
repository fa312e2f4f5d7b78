#![no_std]

pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod frame_scheduler;
pub mod math8;
pub mod noise;
pub mod palette;
pub mod scheduler;

pub use color::{Rgb, Rgbw};
pub use config::{BlendsConfig, ColorTwinklesConfig, EffectConfig, StarsConfig, TwinkleFoxConfig};
pub use effect::{EffectKind, EffectSlot, Lifecycle};
pub use error::{Error, Result};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use noise::{RandomField, field_sample};
pub use palette::{
    ControlPoint, ExpressionHandle, Palette, PaletteId, PaletteRef, PaletteTable, PresetPalette,
};
pub use scheduler::{EffectHandle, EffectScheduler};

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Number of pixels on the strip
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgbw]);
}
