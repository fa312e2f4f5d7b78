//! Named color gradients with interpolated lookup
//!
//! A [`Palette`] is a short list of control points on the 0-255 position
//! circle. [`PaletteTable`] keeps palettes by name and hands out stable
//! [`PaletteId`]s for use while rendering.
//!
//! The table must not be mutated while frames are being rendered. Renderers
//! only ever see `&PaletteTable`, so the borrow checker enforces this for
//! anything driven through [`crate::EffectScheduler`].

mod presets;

#[cfg(feature = "esp32-log")]
use esp_println::println;
use heapless::{String, Vec};

pub use presets::PresetPalette;

use crate::color::{Rgb, blend_colors};
use crate::error::{Error, PaletteKey, Result};

/// Maximum number of control points in a single palette
pub const MAX_CONTROL_POINTS: usize = 16;

/// Maximum number of palettes a table can hold
pub const MAX_PALETTES: usize = 24;

/// Maximum length of a palette name in bytes
pub const PALETTE_NAME_CAPACITY: usize = 24;

pub type PaletteName = String<PALETTE_NAME_CAPACITY>;

/// Build a palette name, failing if it does not fit
pub fn palette_name(name: &str) -> Result<PaletteName> {
    let mut out = PaletteName::new();
    out.push_str(name)
        .map_err(|()| Error::PaletteNameTooLong(PALETTE_NAME_CAPACITY))?;
    Ok(out)
}

/// Color anchored at a gradient position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPoint {
    pub position: u8,
    pub color: Rgb,
}

impl ControlPoint {
    pub const fn new(position: u8, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Gradient defined by control points
///
/// Cyclic palettes wrap from the last point back to the first one at
/// position 256. Clamped palettes hold the end colors outside the points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    points: Vec<ControlPoint, MAX_CONTROL_POINTS>,
    cyclic: bool,
}

impl Palette {
    /// Create a palette from control points with strictly increasing positions
    pub fn new(points: &[ControlPoint], cyclic: bool) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidPalette);
        }
        if points.windows(2).any(|pair| pair[0].position >= pair[1].position) {
            return Err(Error::InvalidPalette);
        }
        let points = Vec::from_slice(points).map_err(|()| Error::InvalidPalette)?;

        Ok(Self { points, cyclic })
    }

    /// Create a cyclic palette from evenly spaced colors
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_entries(colors: &[Rgb]) -> Result<Self> {
        if colors.is_empty() || colors.len() > MAX_CONTROL_POINTS {
            return Err(Error::InvalidPalette);
        }

        let count = colors.len();
        let mut points = Vec::new();
        for (i, color) in colors.iter().enumerate() {
            // i < 16, so the position always fits a byte
            let position = ((i * 256) / count) as u8;
            points
                .push(ControlPoint::new(position, *color))
                .map_err(|_| Error::InvalidPalette)?;
        }

        Ok(Self {
            points,
            cyclic: true,
        })
    }

    /// Single color palette
    pub fn solid(color: Rgb) -> Self {
        let mut points = Vec::new();
        // Capacity is never zero
        let _ = points.push(ControlPoint::new(0, color));
        Self {
            points,
            cyclic: true,
        }
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub const fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Sample the gradient at `position` (0-255)
    ///
    /// Interpolates linearly between the two control points around the
    /// position.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&self, position: u8) -> Rgb {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Rgb::default();
        };

        let mut pos = u16::from(position);
        let (from, to, from_pos, to_pos) =
            match self.points.iter().position(|p| u16::from(p.position) > pos) {
                Some(0) => {
                    if !self.cyclic {
                        return first.color;
                    }
                    // Wrapped segment, seen from the far side of the circle
                    pos += 256;
                    (last, first, u16::from(last.position), u16::from(first.position) + 256)
                }
                Some(next) => {
                    let (from, to) = (&self.points[next - 1], &self.points[next]);
                    (from, to, u16::from(from.position), u16::from(to.position))
                }
                None => {
                    if !self.cyclic {
                        return last.color;
                    }
                    (last, first, u16::from(last.position), u16::from(first.position) + 256)
                }
            };

        let span = to_pos.saturating_sub(from_pos).max(1);
        let offset = pos.saturating_sub(from_pos);
        let amount = ((u32::from(offset) * 256) / u32::from(span)).min(255) as u8;

        blend_colors(from.color, to.color, amount)
    }

    /// Mean color of 16 evenly spaced samples
    #[allow(clippy::cast_possible_truncation)]
    pub fn average(&self) -> Rgb {
        let (mut r, mut g, mut b) = (0u16, 0u16, 0u16);
        for step in 0..16u8 {
            let color = self.sample(step * 16);
            r += u16::from(color.r);
            g += u16::from(color.g);
            b += u16::from(color.b);
        }
        Rgb {
            r: (r / 16) as u8,
            g: (g / 16) as u8,
            b: (b / 16) as u8,
        }
    }
}

/// Stable handle to a palette registered in a [`PaletteTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteId(u8);

impl PaletteId {
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Opaque handle of a host-side palette expression
///
/// The host evaluates it to a palette name before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionHandle(pub u16);

/// Host-side palette expression evaluator
pub type PaletteResolver = fn(ExpressionHandle) -> Option<&'static str>;

/// How an effect refers to its palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteRef {
    /// Built-in palette, looked up by its name so overrides apply
    Preset(PresetPalette),
    /// Palette registered in the table under this name
    Named(PaletteName),
    /// Palette carried inline by the effect
    Custom(Palette),
    /// Palette chosen by a host expression, resolved on the first frame
    Deferred(ExpressionHandle),
}

impl PaletteRef {
    /// Refer to a palette by name
    ///
    /// Preset names map to [`PaletteRef::Preset`].
    pub fn named(name: &str) -> Result<Self> {
        if let Some(preset) = PresetPalette::parse_from_str(name) {
            return Ok(Self::Preset(preset));
        }
        Ok(Self::Named(palette_name(name)?))
    }
}

impl From<PresetPalette> for PaletteRef {
    fn from(preset: PresetPalette) -> Self {
        Self::Preset(preset)
    }
}

/// Palette registry keyed by name
#[derive(Debug, Clone, Default)]
pub struct PaletteTable {
    entries: Vec<(PaletteName, Palette), MAX_PALETTES>,
}

impl PaletteTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a table holding every [`PresetPalette`]
    pub fn with_presets() -> Self {
        let mut table = Self::new();
        for preset in PresetPalette::ALL {
            // Presets are valid and fit the table by construction
            if let Ok(palette) = Palette::from_entries(preset.colors()) {
                let _ = table.register(preset.as_str(), palette);
            }
        }
        table
    }

    /// Register a palette under `name`
    ///
    /// Re-registering a name replaces the palette and keeps its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn register(&mut self, name: &str, palette: Palette) -> Result<PaletteId> {
        if let Ok(id) = self.resolve(name) {
            #[cfg(feature = "esp32-log")]
            println!("[PaletteTable.register] replacing palette {}", name);
            self.entries[usize::from(id.0)].1 = palette;
            return Ok(id);
        }

        let key = palette_name(name)?;
        let index = self.entries.len();
        self.entries
            .push((key, palette))
            .map_err(|_| Error::PaletteTableFull)?;
        // MAX_PALETTES fits in a byte
        Ok(PaletteId(index as u8))
    }

    /// Find a palette id by name, ignoring ASCII case
    #[allow(clippy::cast_possible_truncation)]
    pub fn resolve(&self, name: &str) -> Result<PaletteId> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|index| PaletteId(index as u8))
            .ok_or_else(|| match palette_name(name) {
                Ok(name) => Error::UnknownPalette(PaletteKey::Name(name)),
                Err(err) => err,
            })
    }

    /// Get a palette by id
    pub fn get(&self, id: PaletteId) -> Option<&Palette> {
        self.entries.get(usize::from(id.0)).map(|(_, palette)| palette)
    }

    /// Sample a registered palette at `position`
    pub fn lookup(&self, id: PaletteId, position: u8) -> Result<Rgb> {
        self.get(id)
            .map(|palette| palette.sample(position))
            .ok_or(Error::UnknownPalette(PaletteKey::Id(id)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
