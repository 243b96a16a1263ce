use crate::error::{check_mass, check_stiffness, check_viscosity, FlagError, FlagResult};
use crate::integrator::IntegrationRule;
use glam::Vec3;

/// A point mass in the mesh
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Force accumulated since the last integration
    pub force: Vec3,
    mass: f32,
    /// Pinned particles never move; forces added to them are dropped at reset
    pub pinned: bool,
    pub rule: IntegrationRule,
}

impl Particle {
    pub fn new(mass: f32, pos: Vec3) -> FlagResult<Self> {
        check_mass(mass)?;
        Ok(Self::unchecked(mass, pos))
    }

    /// Constructor for callers that have already validated `mass`
    pub(crate) fn unchecked(mass: f32, pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
            pinned: false,
            rule: IntegrationRule::default(),
        }
    }

    pub fn pinned(mass: f32, pos: Vec3) -> FlagResult<Self> {
        let mut particle = Self::new(mass, pos)?;
        particle.pinned = true;
        Ok(particle)
    }

    pub fn with_rule(mut self, rule: IntegrationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Replace the mass; position and velocity are left as they are
    pub fn set_mass(&mut self, mass: f32) -> FlagResult<()> {
        check_mass(mass)?;
        self.mass = mass;
        Ok(())
    }

    pub(crate) fn set_mass_unchecked(&mut self, mass: f32) {
        self.mass = mass;
    }

    pub fn add_force(&mut self, f: Vec3) {
        self.force += f;
    }

    pub(crate) fn apply_damping(&mut self, damping: f32) {
        if !self.pinned {
            self.vel *= 1.0 - damping;
        }
    }

    /// Advance by `dt` with the particle's own rule, then clear the force buffer
    pub fn integrate(&mut self, dt: f32) {
        if !self.pinned {
            self.rule
                .advance(&mut self.pos, &mut self.vel, self.force, self.mass, dt);
        }
        self.force = Vec3::ZERO;
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// A linear spring between two particles, optionally damped by their relative velocity
///
/// Endpoints are indices into the particle array that owns them.
#[derive(Debug, Clone)]
pub struct Spring {
    a: usize,
    b: usize,
    rest_length: f32,
    stiffness: f32,
    viscosity: f32,
}

impl Spring {
    /// Pure Hooke spring; rest length is the current distance between `a` and `b`
    pub fn elastic(a: usize, b: usize, stiffness: f32, particles: &[Particle]) -> FlagResult<Self> {
        Self::damped(a, b, stiffness, 0.0, particles)
    }

    /// Damped spring; rest length is the current distance between `a` and `b`
    pub fn damped(
        a: usize,
        b: usize,
        stiffness: f32,
        viscosity: f32,
        particles: &[Particle],
    ) -> FlagResult<Self> {
        let count = particles.len();
        for index in [a, b] {
            if index >= count {
                return Err(FlagError::ParticleOutOfBounds { index, count });
            }
        }
        if a == b {
            return Err(FlagError::DegenerateSpring { index: a });
        }
        check_stiffness(stiffness)?;
        check_viscosity(viscosity)?;
        Ok(Self::between(a, b, stiffness, viscosity, particles))
    }

    /// Unchecked constructor for callers that already own a valid topology
    pub(crate) fn between(
        a: usize,
        b: usize,
        stiffness: f32,
        viscosity: f32,
        particles: &[Particle],
    ) -> Self {
        Self {
            a,
            b,
            rest_length: particles[a].pos.distance(particles[b].pos),
            stiffness,
            viscosity,
        }
    }

    pub fn a(&self) -> usize {
        self.a
    }

    pub fn b(&self) -> usize {
        self.b
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    pub fn viscosity(&self) -> f32 {
        self.viscosity
    }

    pub fn set_stiffness(&mut self, stiffness: f32) -> FlagResult<()> {
        check_stiffness(stiffness)?;
        self.stiffness = stiffness;
        Ok(())
    }

    pub fn set_viscosity(&mut self, viscosity: f32) -> FlagResult<()> {
        check_viscosity(viscosity)?;
        self.viscosity = viscosity;
        Ok(())
    }

    pub(crate) fn set_coefficients(&mut self, stiffness: f32, viscosity: f32) {
        self.stiffness = stiffness;
        self.viscosity = viscosity;
    }

    pub fn is_damped(&self) -> bool {
        self.viscosity > 0.0
    }

    pub fn current_length(&self, particles: &[Particle]) -> f32 {
        particles[self.a].pos.distance(particles[self.b].pos)
    }

    /// Force this spring exerts on endpoint `b`; endpoint `a` receives the negation
    ///
    /// Returns `None` when the endpoints coincide and the direction is undefined.
    pub fn force_on_b(&self, particles: &[Particle]) -> Option<Vec3> {
        let pa = &particles[self.a];
        let pb = &particles[self.b];
        let delta = pb.pos - pa.pos;
        let length = delta.length();
        if length == 0.0 {
            return None;
        }

        let stretch = length - self.rest_length;
        let direction = delta / length;
        let mut total = direction * (-stretch * self.stiffness);
        if self.is_damped() {
            total -= (pb.vel - pa.vel) * self.viscosity;
        }
        Some(total)
    }

    /// Accumulate the pairwise force into both endpoints
    pub fn apply_force(&self, particles: &mut [Particle]) {
        if let Some(force) = self.force_on_b(particles) {
            particles[self.a].add_force(-force);
            particles[self.b].add_force(force);
        }
    }

    /// Elastic energy stored in the spring, ½·k·stretch²
    pub fn potential_energy(&self, particles: &[Particle]) -> f32 {
        let stretch = self.current_length(particles) - self.rest_length;
        0.5 * self.stiffness * stretch * stretch
    }
}
