//! Configuration for building and driving a flag
//!
//! `FlagConfig` holds everything needed to build a topology. `PhysicsParams` is
//! the subset that can change while the flag is running without a rebuild, and
//! `SceneConfig` describes the external forces the scene applies each tick.

use crate::error::{
    check_damping, check_mass, check_ratio, check_stiffness, check_tick_rate, check_viscosity,
    FlagError, FlagResult,
};
use crate::integrator::IntegrationRule;
use glam::Vec3;

/// Enable flag and coefficient ratios for one secondary spring family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilySettings {
    pub enabled: bool,
    /// Multiplier applied to the structural stiffness
    pub stiffness_ratio: f32,
    /// Multiplier applied to the structural viscosity
    pub viscosity_ratio: f32,
}

impl Default for FamilySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            stiffness_ratio: 0.2,
            viscosity_ratio: 0.02,
        }
    }
}

impl FamilySettings {
    pub(crate) fn validate(&self, family: &'static str) -> FlagResult<()> {
        check_ratio(family, self.stiffness_ratio)?;
        check_ratio(family, self.viscosity_ratio)
    }
}

/// Parameters that can be changed on a built flag without rebuilding it
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsParams {
    /// Base mass; the pole column carries the full value, the free edge half of it
    pub mass: f32,
    /// Base stiffness, scaled by `mass * tick_rate^2`
    pub stiffness: f32,
    /// Base viscosity, scaled by `mass * tick_rate`
    pub viscosity: f32,
    /// Physics ticks per second
    pub tick_rate: f32,
    /// Fraction of velocity removed from every free particle each tick
    pub damping: f32,
    pub shear: FamilySettings,
    pub bend: FamilySettings,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 0.1,
            viscosity: 0.05,
            tick_rate: 100.0,
            damping: 0.0,
            shear: FamilySettings::default(),
            bend: FamilySettings::default(),
        }
    }
}

impl PhysicsParams {
    pub fn validate(&self) -> FlagResult<()> {
        check_mass(self.mass)?;
        check_stiffness(self.stiffness)?;
        check_viscosity(self.viscosity)?;
        check_tick_rate(self.tick_rate)?;
        check_damping(self.damping)?;
        self.shear.validate("shear")?;
        self.bend.validate("bend")
    }
}

/// Full description of a flag: geometry, resolution, physics and pinning
#[derive(Debug, Clone, PartialEq)]
pub struct FlagConfig {
    /// Position of the particle at grid cell (0, 0)
    pub origin: Vec3,
    pub width: f32,
    pub height: f32,
    pub width_segments: usize,
    pub height_segments: usize,
    pub physics: PhysicsParams,
    pub integration: IntegrationRule,
    /// Grid columns whose particles are pinned
    pub pinned_columns: Vec<usize>,
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            width: 12.0,
            height: 8.0,
            width_segments: 24,
            height_segments: 16,
            physics: PhysicsParams::default(),
            integration: IntegrationRule::default(),
            pinned_columns: vec![0],
        }
    }
}

impl FlagConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_segments(mut self, width_segments: usize, height_segments: usize) -> Self {
        self.width_segments = width_segments;
        self.height_segments = height_segments;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.physics.mass = mass;
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.physics.stiffness = stiffness;
        self
    }

    pub fn with_viscosity(mut self, viscosity: f32) -> Self {
        self.physics.viscosity = viscosity;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: f32) -> Self {
        self.physics.tick_rate = tick_rate;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.physics.damping = damping;
        self
    }

    pub fn with_integration(mut self, rule: IntegrationRule) -> Self {
        self.integration = rule;
        self
    }

    pub fn with_shear(mut self, shear: FamilySettings) -> Self {
        self.physics.shear = shear;
        self
    }

    pub fn with_bend(mut self, bend: FamilySettings) -> Self {
        self.physics.bend = bend;
        self
    }

    pub fn with_pinned_columns(mut self, columns: Vec<usize>) -> Self {
        self.pinned_columns = columns;
        self
    }

    pub fn validate(&self) -> FlagResult<()> {
        let extent_ok = |v: f32| v.is_finite() && v > 0.0;
        if !extent_ok(self.width) || !extent_ok(self.height) {
            return Err(FlagError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width_segments == 0 {
            return Err(FlagError::InvalidResolution {
                width_segments: self.width_segments,
                height_segments: self.height_segments,
            });
        }
        if let Some(&column) = self
            .pinned_columns
            .iter()
            .find(|&&c| c > self.width_segments)
        {
            return Err(FlagError::InvalidPinnedColumn {
                column,
                width_segments: self.width_segments,
            });
        }
        self.physics.validate()
    }
}

/// External forces applied by the flag scene every tick
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub wind_enabled: bool,
    /// Per-axis wind amplitude
    pub wind_amplitude: Vec3,
    /// Per-axis angular frequency of the wind, in radians per second of scene time
    pub wind_frequency: Vec3,
    pub gravity_enabled: bool,
    /// Downward acceleration applied to every particle
    pub gravity_strength: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            wind_enabled: true,
            wind_amplitude: Vec3::new(3.74, 3.72, 3.75),
            wind_frequency: Vec3::new(0.81, 0.98, 1.1),
            gravity_enabled: true,
            gravity_strength: 0.32,
        }
    }
}

impl SceneConfig {
    /// A scene with no external forces
    pub fn calm() -> Self {
        Self {
            wind_enabled: false,
            gravity_enabled: false,
            ..Default::default()
        }
    }
}
