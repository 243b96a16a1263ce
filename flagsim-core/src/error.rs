//! Validation errors for the mass-spring core
//!
//! Every setter and constructor checks its inputs before touching any state,
//! so a returned error means nothing was changed.

use thiserror::Error;

/// Errors raised at the parameter boundary of the simulator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlagError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("tick rate must be positive and finite, got {0}")]
    InvalidTickRate(f32),

    #[error("stiffness must be non-negative and finite, got {0}")]
    InvalidStiffness(f32),

    #[error("viscosity must be non-negative and finite, got {0}")]
    InvalidViscosity(f32),

    #[error("{family} ratio must be non-negative and finite, got {value}")]
    InvalidRatio { family: &'static str, value: f32 },

    #[error("damping must be in [0, 1], got {0}")]
    InvalidDamping(f32),

    #[error("flag extent must be positive and finite, got {width} x {height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("width segments must be at least 1, got {width_segments} x {height_segments}")]
    InvalidResolution {
        width_segments: usize,
        height_segments: usize,
    },

    #[error("delta time must be non-negative and finite, got {0}")]
    InvalidDeltaTime(f32),

    #[error("particle index {index} out of bounds (count: {count})")]
    ParticleOutOfBounds { index: usize, count: usize },

    #[error("spring endpoints must be two distinct particles, got {index} twice")]
    DegenerateSpring { index: usize },

    #[error("pinned column {column} outside grid with {width_segments} width segments")]
    InvalidPinnedColumn { column: usize, width_segments: usize },

    #[error("position buffer holds {len} floats, {needed} needed")]
    PositionBufferTooSmall { needed: usize, len: usize },
}

/// Convenience alias for `Result<T, FlagError>`
pub type FlagResult<T> = Result<T, FlagError>;

pub(crate) fn check_mass(mass: f32) -> FlagResult<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(FlagError::InvalidMass(mass))
    }
}

pub(crate) fn check_tick_rate(rate: f32) -> FlagResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(FlagError::InvalidTickRate(rate))
    }
}

pub(crate) fn check_stiffness(stiffness: f32) -> FlagResult<()> {
    if stiffness.is_finite() && stiffness >= 0.0 {
        Ok(())
    } else {
        Err(FlagError::InvalidStiffness(stiffness))
    }
}

pub(crate) fn check_viscosity(viscosity: f32) -> FlagResult<()> {
    if viscosity.is_finite() && viscosity >= 0.0 {
        Ok(())
    } else {
        Err(FlagError::InvalidViscosity(viscosity))
    }
}

pub(crate) fn check_ratio(family: &'static str, value: f32) -> FlagResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FlagError::InvalidRatio { family, value })
    }
}

pub(crate) fn check_damping(damping: f32) -> FlagResult<()> {
    if (0.0..=1.0).contains(&damping) {
        Ok(())
    } else {
        Err(FlagError::InvalidDamping(damping))
    }
}

pub(crate) fn check_delta_time(dt: f32) -> FlagResult<()> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(FlagError::InvalidDeltaTime(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_checks() {
        assert!(check_mass(1.0).is_ok());
        assert_eq!(check_mass(0.0), Err(FlagError::InvalidMass(0.0)));
        assert_eq!(check_mass(-2.0), Err(FlagError::InvalidMass(-2.0)));
        assert!(check_mass(f32::NAN).is_err());
        assert!(check_mass(f32::INFINITY).is_err());
    }

    #[test]
    fn test_zero_stiffness_and_viscosity_are_valid() {
        assert!(check_stiffness(0.0).is_ok());
        assert!(check_viscosity(0.0).is_ok());
        assert!(check_stiffness(-0.1).is_err());
        assert!(check_viscosity(-0.1).is_err());
    }

    #[test]
    fn test_damping_range() {
        assert!(check_damping(0.0).is_ok());
        assert!(check_damping(1.0).is_ok());
        assert!(check_damping(1.5).is_err());
        assert!(check_damping(f32::NAN).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = FlagError::ParticleOutOfBounds { index: 7, count: 4 };
        assert_eq!(err.to_string(), "particle index 7 out of bounds (count: 4)");
        let err = FlagError::InvalidRatio {
            family: "shear",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "shear ratio must be non-negative and finite, got -1");
    }
}
