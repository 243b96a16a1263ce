//! Flag scene: the flag plus the uniform forces that drive it

use crate::config::{FlagConfig, SceneConfig};
use crate::error::FlagResult;
use crate::flag::Flag;
use glam::Vec3;

/// A flag on a pole, pushed by gravity and an oscillating wind
#[derive(Debug, Clone)]
pub struct FlagScene {
    pub flag: Flag,
    pub config: SceneConfig,
}

impl FlagScene {
    pub fn new(flag_config: FlagConfig, config: SceneConfig) -> FlagResult<Self> {
        Ok(Self {
            flag: Flag::build(flag_config)?,
            config,
        })
    }

    /// Wind force at scene time `now`, each axis oscillating independently
    pub fn wind_at(&self, now: f32) -> Vec3 {
        let freq = self.config.wind_frequency;
        let phase = Vec3::new(
            (now * freq.x).cos(),
            (now * freq.y).cos(),
            (now * freq.z).cos(),
        );
        self.config.wind_amplitude * phase
    }

    /// Add this tick's external forces, then step the flag
    ///
    /// `now` is the caller's clock in seconds; it only sets the wind phase.
    pub fn update(&mut self, now: f32, dt: f32) -> FlagResult<()> {
        if self.config.gravity_enabled {
            self.flag.apply_gravity(self.config.gravity_strength);
        }
        if self.config.wind_enabled {
            let wind = self.wind_at(now);
            self.flag.add_force(wind);
        }
        self.flag.step(dt)
    }
}
