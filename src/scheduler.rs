//! Effect instance management
//!
//! [`EffectScheduler`] owns the palette table and a fixed number of effect
//! slots. Hosts construct an effect, tick it once per frame with the elapsed
//! time and destroy it when done. Handles carry a slot generation, so a
//! handle outliving its instance is rejected instead of driving a new one.

use embassy_time::Duration;
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{
    color::{Rgb, Rgbw},
    config::EffectConfig,
    effect::{EffectKind, EffectSlot, FrameContext, Lifecycle},
    error::{Error, Result},
    noise::{RandomField, derive_seed},
    palette::{
        ExpressionHandle, Palette, PaletteId, PaletteRef, PaletteResolver, PaletteTable,
        PresetPalette,
    },
};

/// Handle of a constructed effect instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectHandle {
    index: u8,
    generation: u32,
}

impl EffectHandle {
    /// Slot the instance lives in
    pub const fn index(self) -> u8 {
        self.index
    }
}

/// Palette an instance renders with
#[derive(Debug, Clone)]
enum PaletteBinding {
    /// Waiting for the host expression, resolved on the first tick
    Pending(ExpressionHandle),
    Table(PaletteId),
    Inline(Palette),
}

#[derive(Debug, Clone)]
struct Instance<const N: usize> {
    effect: EffectSlot<N>,
    palette: PaletteBinding,
    field: RandomField,
}

/// Built-in palette as a standalone palette
fn preset_palette(preset: PresetPalette) -> Palette {
    Palette::from_entries(preset.colors()).unwrap_or_else(|_| Palette::solid(Rgb::default()))
}

/// Bind a preset, preferring the table entry so overrides apply
fn bind_preset(table: &PaletteTable, preset: PresetPalette) -> PaletteBinding {
    match table.resolve(preset.as_str()) {
        Ok(id) => PaletteBinding::Table(id),
        Err(_) => PaletteBinding::Inline(preset_palette(preset)),
    }
}

/// Evaluate a deferred palette, falling back to the family default
fn bind_deferred(
    table: &PaletteTable,
    resolver: Option<PaletteResolver>,
    expression: ExpressionHandle,
    kind: EffectKind,
) -> PaletteBinding {
    let name = resolver.and_then(|resolve| resolve(expression));
    if let Some(name) = name {
        if let Ok(id) = table.resolve(name) {
            return PaletteBinding::Table(id);
        }
        if let Some(preset) = PresetPalette::parse_from_str(name) {
            return PaletteBinding::Inline(preset_palette(preset));
        }
    }

    #[cfg(feature = "esp32-log")]
    println!(
        "[EffectScheduler.tick] palette expression {} unresolved, using {}",
        expression.0,
        kind.default_palette().as_str()
    );
    bind_preset(table, kind.default_palette())
}

/// Host-facing effect engine
///
/// `MAX_LEDS` bounds the strip length of every instance, `MAX_EFFECTS` the
/// number of live instances.
#[derive(Debug)]
pub struct EffectScheduler<const MAX_LEDS: usize, const MAX_EFFECTS: usize> {
    palettes: PaletteTable,
    resolver: Option<PaletteResolver>,
    seed: u32,
    constructed: u32,
    slots: [Option<Instance<MAX_LEDS>>; MAX_EFFECTS],
    generations: [u32; MAX_EFFECTS],
}

impl<const MAX_LEDS: usize, const MAX_EFFECTS: usize> EffectScheduler<MAX_LEDS, MAX_EFFECTS> {
    /// Create a scheduler with the built-in palettes
    ///
    /// `seed` is the base every instance seed is derived from.
    pub fn new(seed: u32) -> Self {
        Self::with_palettes(PaletteTable::with_presets(), seed)
    }

    /// Create a scheduler with a prepared palette table
    pub fn with_palettes(palettes: PaletteTable, seed: u32) -> Self {
        Self {
            palettes,
            resolver: None,
            seed,
            constructed: 0,
            slots: core::array::from_fn(|_| None),
            generations: [0; MAX_EFFECTS],
        }
    }

    /// Set the evaluator of deferred palette expressions
    #[must_use]
    pub fn with_resolver(mut self, resolver: PaletteResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn palettes(&self) -> &PaletteTable {
        &self.palettes
    }

    /// Mutable palette table access
    ///
    /// Changes are picked up by the next tick of every instance bound to a
    /// table palette, palette-derived backgrounds included.
    pub fn palettes_mut(&mut self) -> &mut PaletteTable {
        &mut self.palettes
    }

    /// Construct an idle effect for a strip of `strip_len` pixels
    pub fn construct(&mut self, config: &EffectConfig, strip_len: usize) -> Result<EffectHandle> {
        let seed = derive_seed(self.seed, self.constructed);
        let handle = self.construct_with_seed(config, strip_len, seed)?;
        self.constructed = self.constructed.wrapping_add(1);
        Ok(handle)
    }

    /// Construct an effect with a fixed random seed
    ///
    /// Two instances with the same config, length and seed render
    /// identical frames for identical `dt` sequences.
    pub fn construct_with_seed(
        &mut self,
        config: &EffectConfig,
        strip_len: usize,
        seed: u32,
    ) -> Result<EffectHandle> {
        let effect = EffectSlot::from_config(config, strip_len)?;
        let palette = self.bind(config)?;

        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(Error::NoFreeSlot)?;
        let handle = EffectHandle {
            index: u8::try_from(index).map_err(|_| Error::NoFreeSlot)?,
            generation: self.generations[index],
        };

        #[cfg(feature = "esp32-log")]
        println!(
            "[EffectScheduler.construct] {} with {} pixels in slot {}",
            config.kind().as_str(),
            strip_len,
            index
        );

        self.slots[index] = Some(Instance {
            effect,
            palette,
            field: RandomField::new(seed),
        });
        Ok(handle)
    }

    fn bind(&self, config: &EffectConfig) -> Result<PaletteBinding> {
        let Some(palette) = config.palette() else {
            return Ok(bind_preset(&self.palettes, config.kind().default_palette()));
        };

        Ok(match palette {
            PaletteRef::Preset(preset) => bind_preset(&self.palettes, *preset),
            PaletteRef::Named(name) => PaletteBinding::Table(self.palettes.resolve(name)?),
            PaletteRef::Custom(palette) => PaletteBinding::Inline(palette.clone()),
            PaletteRef::Deferred(expression) => PaletteBinding::Pending(*expression),
        })
    }

    fn is_live(&self, handle: EffectHandle) -> bool {
        let index = usize::from(handle.index);
        self.generations.get(index) == Some(&handle.generation)
            && self.slots.get(index).is_some_and(Option::is_some)
    }

    /// Render one frame of an instance into `leds`
    ///
    /// `dt` is the time since the previous tick of this instance. Returns
    /// `false` if the handle is stale.
    pub fn tick(&mut self, handle: EffectHandle, dt: Duration, leds: &mut [Rgbw]) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        let Some(Some(instance)) = self.slots.get_mut(usize::from(handle.index)) else {
            return false;
        };

        let kind = instance.effect.kind();
        if let PaletteBinding::Pending(expression) = instance.palette {
            instance.palette = bind_deferred(&self.palettes, self.resolver, expression, kind);
        }
        if let PaletteBinding::Table(id) = instance.palette
            && self.palettes.get(id).is_none()
        {
            instance.palette = PaletteBinding::Inline(preset_palette(kind.default_palette()));
        }

        let palette = match &instance.palette {
            PaletteBinding::Table(id) => self.palettes.get(*id),
            PaletteBinding::Inline(palette) => Some(palette),
            PaletteBinding::Pending(_) => None,
        };
        let Some(palette) = palette else {
            return false;
        };

        let ctx = FrameContext {
            palette,
            field: instance.field,
        };
        instance.effect.render(&ctx, dt, leds);
        true
    }

    /// Stop an instance and free its slot
    ///
    /// Returns `false` if the handle is stale.
    pub fn destroy(&mut self, handle: EffectHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        let index = usize::from(handle.index);
        let Some(mut instance) = self.slots[index].take() else {
            return false;
        };
        instance.effect.stop();
        self.generations[index] = self.generations[index].wrapping_add(1);

        #[cfg(feature = "esp32-log")]
        println!(
            "[EffectScheduler.destroy] {} in slot {}",
            instance.effect.kind().as_str(),
            index
        );
        true
    }

    /// Lifecycle of a live instance
    pub fn lifecycle(&self, handle: EffectHandle) -> Option<Lifecycle> {
        if !self.is_live(handle) {
            return None;
        }
        self.slots[usize::from(handle.index)]
            .as_ref()
            .map(|instance| instance.effect.lifecycle())
    }

    /// Effect family of a live instance
    pub fn kind(&self, handle: EffectHandle) -> Option<EffectKind> {
        if !self.is_live(handle) {
            return None;
        }
        self.slots[usize::from(handle.index)]
            .as_ref()
            .map(|instance| instance.effect.kind())
    }

    /// Number of live instances
    pub fn active(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
