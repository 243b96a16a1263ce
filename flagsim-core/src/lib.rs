pub mod config;
pub mod engine;
pub mod error;
pub mod flag;
pub mod integrator;
pub mod runtime;
pub mod scene;

pub use config::{FamilySettings, FlagConfig, PhysicsParams, SceneConfig};
pub use engine::{Particle, Spring};
pub use error::{FlagError, FlagResult};
pub use flag::{build_topology, tapered_mass, Flag, SpringFamily};
pub use integrator::IntegrationRule;
pub use runtime::{
    build_simulation_context, evaluate_probes, get_particle_states, run_simulation,
    step_simulation, ParticleState, ProbeResult, SimulationContext, SimulationResult,
};
pub use scene::FlagScene;
