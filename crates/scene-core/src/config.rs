//! Host-facing scene configuration, deserialized from JSON.

use crate::color::{Palette, PaletteName};
use crate::constants::*;
use crate::error::{SceneError, SceneResult};
use crate::pool::OverflowPolicy;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    #[default]
    Matrix,
    Security,
    Dataflow,
    Pipeline,
    Starfield,
    Identity,
}

impl SceneKind {
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Matrix,
        SceneKind::Security,
        SceneKind::Dataflow,
        SceneKind::Pipeline,
        SceneKind::Starfield,
        SceneKind::Identity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Matrix => "matrix",
            SceneKind::Security => "security",
            SceneKind::Dataflow => "dataflow",
            SceneKind::Pipeline => "pipeline",
            SceneKind::Starfield => "starfield",
            SceneKind::Identity => "identity",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn default_palette(&self) -> PaletteName {
        match self {
            SceneKind::Matrix | SceneKind::Starfield => PaletteName::Matrix,
            SceneKind::Security => PaletteName::Security,
            SceneKind::Dataflow => PaletteName::Aws,
            SceneKind::Pipeline => PaletteName::Container,
            SceneKind::Identity => PaletteName::Azure,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Low,
    High,
}

impl Density {
    /// Grid spacing for column- or lattice-based layouts.
    pub fn spacing(&self) -> f32 {
        match self {
            Density::Low => LOW_DENSITY_SPACING_PX,
            Density::High => HIGH_DENSITY_SPACING_PX,
        }
    }

    pub fn rate_multiplier(&self) -> f32 {
        match self {
            Density::Low => 1.0,
            Density::High => HIGH_DENSITY_RATE_MULTIPLIER,
        }
    }

    /// Share of the population cap a static field fills.
    pub fn fill_fraction(&self) -> f32 {
        match self {
            Density::Low => LOW_DENSITY_FILL_FRACTION,
            Density::High => 1.0,
        }
    }
}

/// Options a host passes at mount time. Every key is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneConfig {
    pub scene: SceneKind,
    /// Population cap for the entity pool.
    pub particle_count: usize,
    pub density: Density,
    /// Falls back to the scene's own palette when absent.
    pub palette: Option<PaletteName>,
    /// Hex colours overriding the palette's entity series.
    pub colors: Vec<String>,
    pub seed: Option<u64>,
    pub overflow: OverflowPolicy,
    pub resize_debounce_ms: u32,
    pub show_overlay: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            particle_count: DEFAULT_PARTICLE_COUNT,
            density: Density::default(),
            palette: None,
            colors: Vec::new(),
            seed: None,
            overflow: OverflowPolicy::default(),
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            show_overlay: true,
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SceneResult<()> {
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLE_COUNT {
            return Err(SceneError::InvalidConfig(format!(
                "particleCount must be in 1..={MAX_PARTICLE_COUNT}, got {}",
                self.particle_count
            )));
        }
        self.palette()?;
        Ok(())
    }

    /// Resolved palette: explicit name or the scene default, then custom colours.
    pub fn palette(&self) -> SceneResult<Palette> {
        let name = self.palette.unwrap_or_else(|| self.scene.default_palette());
        Palette::named(name).with_series(&self.colors)
    }

    pub fn resize_debounce_sec(&self) -> f64 {
        self.resize_debounce_ms as f64 / 1000.0
    }
}
