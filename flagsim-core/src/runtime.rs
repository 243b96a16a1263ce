use crate::config::{FlagConfig, SceneConfig};
use crate::error::FlagResult;
use crate::flag::Flag;
use crate::scene::FlagScene;
use glam::Vec3;
use tracing::{debug, trace};

/// A named scalar read off the final state
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub name: String,
    pub value: f32,
}

/// Final result of a headless run
#[derive(Debug)]
pub struct SimulationResult {
    pub steps: u32,
    pub probes: Vec<ProbeResult>,
    /// Row-major particle positions after the last step
    pub positions: Vec<Vec3>,
}

/// A scene advancing at a fixed physics rate, one tick per call to [`step_simulation`]
#[derive(Debug)]
pub struct SimulationContext {
    pub scene: FlagScene,
    pub current_step: u32,
    pub max_steps: u32,
    /// Accumulated scene time in seconds, drives the wind phase
    pub time: f32,
}

impl SimulationContext {
    /// Length of one physics tick, the reciprocal of the flag's tick rate
    pub fn dt(&self) -> f32 {
        1.0 / self.scene.flag.params().tick_rate
    }

    pub fn is_finished(&self) -> bool {
        self.current_step >= self.max_steps
    }
}

/// Snapshot of a single particle for drawing
#[derive(Debug, Clone, Copy)]
pub struct ParticleState {
    pub pos: Vec3,
    pub vel: Vec3,
    pub mass: f32,
    pub pinned: bool,
}

pub fn build_simulation_context(
    flag_config: FlagConfig,
    scene_config: SceneConfig,
    max_steps: u32,
) -> FlagResult<SimulationContext> {
    let scene = FlagScene::new(flag_config, scene_config)?;
    debug!(max_steps, "built simulation context");
    Ok(SimulationContext {
        scene,
        current_step: 0,
        max_steps,
        time: 0.0,
    })
}

/// Advance one physics tick; returns true once `max_steps` ticks have run
pub fn step_simulation(ctx: &mut SimulationContext) -> FlagResult<bool> {
    if ctx.is_finished() {
        return Ok(true);
    }
    let dt = ctx.dt();
    ctx.scene.update(ctx.time, dt)?;
    ctx.time += dt;
    ctx.current_step += 1;
    trace!(step = ctx.current_step, time = ctx.time, "simulation step");
    Ok(ctx.is_finished())
}

pub fn get_particle_states(ctx: &SimulationContext) -> Vec<ParticleState> {
    ctx.scene
        .flag
        .particles()
        .iter()
        .map(|p| ParticleState {
            pos: p.pos,
            vel: p.vel,
            mass: p.mass(),
            pinned: p.pinned,
        })
        .collect()
}

/// Build a scene, run it for `steps` ticks and read the probes
pub fn run_simulation(
    flag_config: FlagConfig,
    scene_config: SceneConfig,
    steps: u32,
) -> FlagResult<SimulationResult> {
    let mut ctx = build_simulation_context(flag_config, scene_config, steps)?;
    while !step_simulation(&mut ctx)? {}

    let flag = &ctx.scene.flag;
    Ok(SimulationResult {
        steps: ctx.current_step,
        probes: evaluate_probes(flag),
        positions: flag.positions().collect(),
    })
}

/// Free top corner, centroid, largest displacement and energies of the flag
///
/// `max_displacement` is the distance of the free particle furthest from its
/// layout position, see [`Flag::max_displacement`].
pub fn evaluate_probes(flag: &Flag) -> Vec<ProbeResult> {
    let corner = flag
        .particle(flag.width_segments(), flag.height_segments())
        .map_or(Vec3::ZERO, |p| p.pos);
    let centroid = flag.positions().sum::<Vec3>() / flag.particle_count() as f32;

    let probe = |name: &str, value: f32| ProbeResult {
        name: name.to_string(),
        value,
    };
    vec![
        probe("corner_x", corner.x),
        probe("corner_y", corner.y),
        probe("corner_z", corner.z),
        probe("centroid_x", centroid.x),
        probe("centroid_y", centroid.y),
        probe("centroid_z", centroid.z),
        probe("max_displacement", flag.max_displacement()),
        probe("kinetic_energy", flag.kinetic_energy()),
        probe("elastic_energy", flag.elastic_energy()),
    ]
}
