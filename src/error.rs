//! Construction-time errors
//!
//! Everything that can go wrong is caught while building palettes or
//! constructing effect instances. Rendering a frame never fails.

use core::fmt;

use crate::palette::{PaletteId, PaletteName};

pub type Result<T> = core::result::Result<T, Error>;

/// Key used to look up a palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteKey {
    Name(PaletteName),
    Id(PaletteId),
}

impl fmt::Display for PaletteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "`{name}`"),
            Self::Id(id) => write!(f, "#{}", id.index()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A configuration field is outside its declared range
    #[error("{field} = {value} is outside {min}..={max}")]
    ConfigRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// Palette is not registered in the table
    #[error("unknown palette {0}")]
    UnknownPalette(PaletteKey),
    /// Strip does not fit the effect state
    #[error("strip has {strip} pixels, effect state holds at most {capacity}")]
    DimensionMismatch { strip: usize, capacity: usize },
    /// Palette control points are empty, too many, or not strictly increasing
    #[error("invalid palette control points")]
    InvalidPalette,
    #[error("palette table is full")]
    PaletteTableFull,
    #[error("palette name is longer than {0} bytes")]
    PaletteNameTooLong(usize),
    #[error("all effect slots are in use")]
    NoFreeSlot,
}

impl Error {
    pub(crate) fn config_range(field: &'static str, value: impl Into<f32>, min: f32, max: f32) -> Self {
        Self::ConfigRange {
            field,
            value: value.into(),
            min,
            max,
        }
    }
}
