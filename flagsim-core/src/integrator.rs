use crate::engine::Particle;
use glam::Vec3;

/// Update rule used by a free particle when it integrates its accumulated force
///
/// `Verlet` is the historical name of the velocity-first rule, which is really
/// semi-implicit (symplectic) Euler. The name is kept; the update order is what
/// matters for the dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationRule {
    /// v += F*dt/m, then x += v*dt
    #[default]
    Verlet,
    /// x += v*dt, then v += F*dt/m
    ExplicitEuler,
}

impl IntegrationRule {
    /// Advance one state by `dt` under `force`
    #[inline]
    pub fn advance(self, pos: &mut Vec3, vel: &mut Vec3, force: Vec3, mass: f32, dt: f32) {
        match self {
            IntegrationRule::Verlet => symplectic_euler(pos, vel, force, mass, dt),
            IntegrationRule::ExplicitEuler => explicit_euler(pos, vel, force, mass, dt),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IntegrationRule::Verlet => "verlet",
            IntegrationRule::ExplicitEuler => "euler",
        }
    }
}

#[inline]
fn symplectic_euler(pos: &mut Vec3, vel: &mut Vec3, force: Vec3, mass: f32, dt: f32) {
    *vel += force * (dt / mass);
    *pos += *vel * dt;
}

#[inline]
fn explicit_euler(pos: &mut Vec3, vel: &mut Vec3, force: Vec3, mass: f32, dt: f32) {
    *pos += *vel * dt;
    *vel += force * (dt / mass);
}

/// Integrate every particle by dt, applying global velocity damping to free ones first
pub fn integrate_all(particles: &mut [Particle], dt: f32, damping: f32) {
    for particle in particles.iter_mut() {
        if damping > 0.0 {
            particle.apply_damping(damping);
        }
        particle.integrate(dt);
    }
}
