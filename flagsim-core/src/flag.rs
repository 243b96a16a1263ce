//! Grid topology of a flag: particles, the three spring families, and the
//! per-tick orchestration that advances them.
//!
//! Particles are stored row-major, `i = w + h * (width_segments + 1)`. Renderers
//! that map particles onto a surface grid must keep that order.

use crate::config::{FamilySettings, FlagConfig, PhysicsParams};
use crate::engine::{Particle, Spring};
use crate::error::{
    check_damping, check_delta_time, check_mass, check_stiffness, check_tick_rate,
    check_viscosity, FlagError, FlagResult,
};
use crate::integrator::{integrate_all, IntegrationRule};
use glam::Vec3;
use tracing::{debug, trace};

/// Connectivity pattern a spring belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpringFamily {
    /// Right and lower neighbours
    Structural,
    /// Both diagonals of every grid cell
    Shear,
    /// Neighbours two cells away along each axis
    Bend,
}

impl SpringFamily {
    pub const ALL: [SpringFamily; 3] = [
        SpringFamily::Structural,
        SpringFamily::Shear,
        SpringFamily::Bend,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpringFamily::Structural => "structural",
            SpringFamily::Shear => "shear",
            SpringFamily::Bend => "bend",
        }
    }
}

/// Mass of a particle in column `w` of a grid with `width_segments` columns of cells
///
/// The pole column carries the full base mass; the free edge carries half.
pub fn tapered_mass(base_mass: f32, w: usize, width_segments: usize) -> f32 {
    let u = w as f32 / width_segments as f32;
    base_mass * (1.0 - 0.5 * u * u)
}

/// A built mass-spring flag
///
/// Construction goes through [`Flag::build`], so a `Flag` value is always fully
/// built. Dropping it is the only teardown.
#[derive(Debug, Clone)]
pub struct Flag {
    config: FlagConfig,
    particles: Vec<Particle>,
    structural: Vec<Spring>,
    shear: Vec<Spring>,
    bend: Vec<Spring>,
}

impl Flag {
    pub fn build(config: FlagConfig) -> FlagResult<Self> {
        config.validate()?;

        let particles = layout_particles(&config);
        let (structural, shear, bend) = connect_springs(&config, &particles);

        let mut flag = Self {
            config,
            particles,
            structural,
            shear,
            bend,
        };
        flag.update_spring_coefficients();

        debug!(
            particles = flag.particles.len(),
            structural = flag.structural.len(),
            shear = flag.shear.len(),
            bend = flag.bend.len(),
            "built flag topology"
        );
        Ok(flag)
    }

    pub fn config(&self) -> &FlagConfig {
        &self.config
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.config.physics
    }

    pub fn width_segments(&self) -> usize {
        self.config.width_segments
    }

    pub fn height_segments(&self) -> usize {
        self.config.height_segments
    }

    /// Row-major index of the particle at column `w`, row `h`, if it is on the grid
    pub fn index(&self, w: usize, h: usize) -> Option<usize> {
        if w > self.config.width_segments || h > self.config.height_segments {
            return None;
        }
        Some(w + h * (self.config.width_segments + 1))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for collaborators that place or perturb the mesh
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn particle(&self, w: usize, h: usize) -> Option<&Particle> {
        self.index(w, h).map(|i| &self.particles[i])
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn springs(&self, family: SpringFamily) -> &[Spring] {
        match family {
            SpringFamily::Structural => &self.structural,
            SpringFamily::Shear => &self.shear,
            SpringFamily::Bend => &self.bend,
        }
    }

    /// Number of springs built for `family`, whether or not it is enabled
    pub fn spring_count(&self, family: SpringFamily) -> usize {
        self.springs(family).len()
    }

    pub fn is_enabled(&self, family: SpringFamily) -> bool {
        match family {
            SpringFamily::Structural => true,
            SpringFamily::Shear => self.config.physics.shear.enabled,
            SpringFamily::Bend => self.config.physics.bend.enabled,
        }
    }

    /// Springs that take part in the next step
    pub fn active_springs(&self) -> impl Iterator<Item = &Spring> + '_ {
        SpringFamily::ALL
            .into_iter()
            .filter(move |&family| self.is_enabled(family))
            .flat_map(move |family| self.springs(family).iter())
    }

    /// Stiffness of structural springs: `stiffness * mass * tick_rate^2`
    pub fn structural_stiffness(&self) -> f32 {
        let p = &self.config.physics;
        p.stiffness * p.mass * p.tick_rate * p.tick_rate
    }

    /// Viscosity of structural springs: `viscosity * mass * tick_rate`
    pub fn structural_viscosity(&self) -> f32 {
        let p = &self.config.physics;
        p.viscosity * p.mass * p.tick_rate
    }

    /// Stiffness and viscosity currently assigned to springs of `family`
    pub fn family_coefficients(&self, family: SpringFamily) -> (f32, f32) {
        let k = self.structural_stiffness();
        let c = self.structural_viscosity();
        match family {
            SpringFamily::Structural => (k, c),
            SpringFamily::Shear => {
                let s = &self.config.physics.shear;
                (k * s.stiffness_ratio, c * s.viscosity_ratio)
            }
            SpringFamily::Bend => {
                let b = &self.config.physics.bend;
                (k * b.stiffness_ratio, c * b.viscosity_ratio)
            }
        }
    }

    fn update_spring_coefficients(&mut self) {
        for family in SpringFamily::ALL {
            let (k, c) = self.family_coefficients(family);
            let springs = match family {
                SpringFamily::Structural => &mut self.structural,
                SpringFamily::Shear => &mut self.shear,
                SpringFamily::Bend => &mut self.bend,
            };
            for spring in springs.iter_mut() {
                spring.set_coefficients(k, c);
            }
        }
        debug!(
            stiffness = self.structural_stiffness(),
            viscosity = self.structural_viscosity(),
            "updated spring coefficients"
        );
    }

    fn update_masses(&mut self) {
        let columns = self.config.width_segments + 1;
        let base = self.config.physics.mass;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            let w = i % columns;
            // base mass was validated, the taper keeps it in [base/2, base]
            particle.set_mass_unchecked(tapered_mass(base, w, self.config.width_segments));
        }
    }

    pub fn set_stiffness(&mut self, stiffness: f32) -> FlagResult<()> {
        check_stiffness(stiffness)?;
        self.config.physics.stiffness = stiffness;
        self.update_spring_coefficients();
        Ok(())
    }

    pub fn set_viscosity(&mut self, viscosity: f32) -> FlagResult<()> {
        check_viscosity(viscosity)?;
        self.config.physics.viscosity = viscosity;
        self.update_spring_coefficients();
        Ok(())
    }

    /// Reassign every particle's tapered mass and rescale the springs; nothing moves
    pub fn set_mass(&mut self, mass: f32) -> FlagResult<()> {
        check_mass(mass)?;
        self.config.physics.mass = mass;
        self.update_masses();
        self.update_spring_coefficients();
        Ok(())
    }

    /// Rescale the springs for a new physics rate; positions and velocities are kept
    ///
    /// Spring stiffness grows with the square of the rate, so lowering the rate
    /// without lowering the base stiffness makes the system easier to destabilise.
    pub fn set_tick_rate(&mut self, tick_rate: f32) -> FlagResult<()> {
        check_tick_rate(tick_rate)?;
        self.config.physics.tick_rate = tick_rate;
        self.update_spring_coefficients();
        Ok(())
    }

    pub fn set_damping(&mut self, damping: f32) -> FlagResult<()> {
        check_damping(damping)?;
        self.config.physics.damping = damping;
        Ok(())
    }

    /// Replace the enable flag and ratios of the shear or bend family
    ///
    /// The structural family is always on and has no ratios, so it ignores this.
    pub fn set_family(&mut self, family: SpringFamily, settings: FamilySettings) -> FlagResult<()> {
        let slot = match family {
            SpringFamily::Structural => return Ok(()),
            SpringFamily::Shear => {
                settings.validate("shear")?;
                &mut self.config.physics.shear
            }
            SpringFamily::Bend => {
                settings.validate("bend")?;
                &mut self.config.physics.bend
            }
        };
        *slot = settings;
        self.update_spring_coefficients();
        Ok(())
    }

    pub fn set_enabled(&mut self, family: SpringFamily, enabled: bool) {
        match family {
            SpringFamily::Structural => {}
            SpringFamily::Shear => self.config.physics.shear.enabled = enabled,
            SpringFamily::Bend => self.config.physics.bend.enabled = enabled,
        }
    }

    /// Apply a whole parameter set at once; on error nothing changes
    pub fn apply_params(&mut self, params: &PhysicsParams) -> FlagResult<()> {
        params.validate()?;
        let mass_changed = params.mass != self.config.physics.mass;
        self.config.physics = params.clone();
        if mass_changed {
            self.update_masses();
        }
        self.update_spring_coefficients();
        Ok(())
    }

    pub fn set_integration_rule(&mut self, rule: IntegrationRule) {
        self.config.integration = rule;
        for particle in self.particles.iter_mut() {
            particle.rule = rule;
        }
    }

    /// Rebuild with a new resolution; every particle and spring is recreated
    pub fn set_resolution(&mut self, width_segments: usize, height_segments: usize) -> FlagResult<()> {
        let config = self
            .config
            .clone()
            .with_segments(width_segments, height_segments);
        *self = Self::build(config)?;
        Ok(())
    }

    /// Add the same force to every particle
    pub fn add_force(&mut self, f: Vec3) {
        for particle in self.particles.iter_mut() {
            particle.add_force(f);
        }
    }

    /// Pull every particle down with acceleration `strength`
    pub fn apply_gravity(&mut self, strength: f32) {
        for particle in self.particles.iter_mut() {
            let weight = particle.mass() * strength;
            particle.add_force(Vec3::new(0.0, -weight, 0.0));
        }
    }

    /// Advance one tick: enabled springs first, then every particle integrates
    pub fn step(&mut self, dt: f32) -> FlagResult<()> {
        check_delta_time(dt)?;

        for spring in &self.structural {
            spring.apply_force(&mut self.particles);
        }
        if self.config.physics.shear.enabled {
            for spring in &self.shear {
                spring.apply_force(&mut self.particles);
            }
        }
        if self.config.physics.bend.enabled {
            for spring in &self.bend {
                spring.apply_force(&mut self.particles);
            }
        }

        integrate_all(&mut self.particles, dt, self.config.physics.damping);
        trace!(dt, "flag step");
        Ok(())
    }

    /// Current particle positions in row-major order
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.pos)
    }

    /// Copy flat `x, y, z` triples in row-major order into the front of `out`
    ///
    /// Entries past `3 * particle_count()` are left alone.
    pub fn write_positions(&self, out: &mut [f32]) -> FlagResult<()> {
        let needed = self.particles.len() * 3;
        if out.len() < needed {
            return Err(FlagError::PositionBufferTooSmall {
                needed,
                len: out.len(),
            });
        }
        for (chunk, p) in out.chunks_exact_mut(3).zip(&self.particles) {
            chunk.copy_from_slice(&p.pos.to_array());
        }
        Ok(())
    }

    /// Largest distance of a free particle from where the layout placed it
    ///
    /// Zero for a flag at rest in its initial plane, or one that is fully pinned.
    pub fn max_displacement(&self) -> f32 {
        let columns = self.config.width_segments + 1;
        self.particles
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.pinned)
            .map(|(i, p)| {
                let home = layout_position(&self.config, i % columns, i / columns);
                p.pos.distance(home)
            })
            .fold(0.0, f32::max)
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Elastic energy stored in the enabled springs
    pub fn elastic_energy(&self) -> f32 {
        self.active_springs()
            .map(|s| s.potential_energy(&self.particles))
            .sum()
    }
}

/// Build a flag at the origin with default pinning, shear and bend settings
#[allow(clippy::too_many_arguments)]
pub fn build_topology(
    width: f32,
    height: f32,
    width_segments: usize,
    height_segments: usize,
    mass: f32,
    stiffness: f32,
    viscosity: f32,
    tick_rate: f32,
) -> FlagResult<Flag> {
    let config = FlagConfig::new()
        .with_size(width, height)
        .with_segments(width_segments, height_segments)
        .with_mass(mass)
        .with_stiffness(stiffness)
        .with_viscosity(viscosity)
        .with_tick_rate(tick_rate);
    Flag::build(config)
}

/// Point on the flag plane for grid cell `(w, h)`
fn layout_position(config: &FlagConfig, w: usize, h: usize) -> Vec3 {
    let rows = config.height_segments;
    let u = w as f32 / config.width_segments as f32;
    let v = if rows == 0 { 0.0 } else { h as f32 / rows as f32 };
    config.origin + Vec3::new(u * config.width, v * config.height, 0.0)
}

fn layout_particles(config: &FlagConfig) -> Vec<Particle> {
    let cols = config.width_segments;
    let rows = config.height_segments;
    let mut particles = Vec::with_capacity((cols + 1) * (rows + 1));

    for h in 0..=rows {
        for w in 0..=cols {
            let pos = layout_position(config, w, h);
            let mass = tapered_mass(config.physics.mass, w, cols);
            let mut particle = Particle::unchecked(mass, pos).with_rule(config.integration);
            particle.pinned = config.pinned_columns.contains(&w);
            particles.push(particle);
        }
    }
    particles
}

fn connect_springs(
    config: &FlagConfig,
    particles: &[Particle],
) -> (Vec<Spring>, Vec<Spring>, Vec<Spring>) {
    let cols = config.width_segments;
    let rows = config.height_segments;
    let stride = cols + 1;
    // coefficients are filled in afterwards from the scale factors
    let link = |a: usize, b: usize| Spring::between(a, b, 0.0, 0.0, particles);

    let mut structural = Vec::with_capacity(cols * (rows + 1) + rows * (cols + 1));
    for h in 0..=rows {
        for w in 0..=cols {
            let i = w + h * stride;
            if w < cols {
                structural.push(link(i, i + 1));
            }
            if h < rows {
                structural.push(link(i, i + stride));
            }
        }
    }

    let mut shear = Vec::with_capacity(2 * cols * rows);
    for h in 0..rows {
        for w in 0..cols {
            let i = w + h * stride;
            shear.push(link(i, i + stride + 1));
            shear.push(link(i + 1, i + stride));
        }
    }

    let mut bend = Vec::new();
    for h in 0..=rows {
        for w in 0..=cols {
            let i = w + h * stride;
            if w + 2 <= cols {
                bend.push(link(i, i + 2));
            }
            if h + 2 <= rows {
                bend.push(link(i, i + 2 * stride));
            }
        }
    }

    (structural, shear, bend)
}
