//! Simulation context stepping and probes

use flagsim_core::tests::test_helpers::{approx_eq_f32, run_small_flag};
use flagsim_core::{
    build_simulation_context, evaluate_probes, get_particle_states, run_simulation,
    step_simulation, Flag, FlagConfig, SceneConfig,
};
use glam::Vec3;

#[test]
fn test_context_runs_exactly_max_steps() {
    let config = FlagConfig::new().with_segments(4, 3).with_tick_rate(50.0);
    let mut ctx = build_simulation_context(config, SceneConfig::default(), 10).unwrap();
    assert!(approx_eq_f32(ctx.dt(), 0.02, 1e-9));

    let mut ticks = 0;
    while !step_simulation(&mut ctx).unwrap() {
        ticks += 1;
    }
    ticks += 1;

    assert_eq!(ticks, 10);
    assert_eq!(ctx.current_step, 10);
    assert!(approx_eq_f32(ctx.time, 0.2, 1e-5));

    // stepping a finished context is a no-op
    let time = ctx.time;
    assert!(step_simulation(&mut ctx).unwrap());
    assert_eq!(ctx.current_step, 10);
    assert_eq!(ctx.time, time);
}

#[test]
fn test_tick_rate_change_changes_dt() {
    let mut ctx =
        build_simulation_context(FlagConfig::new().with_segments(2, 2), SceneConfig::calm(), 5)
            .unwrap();
    assert!(approx_eq_f32(ctx.dt(), 0.01, 1e-9));
    ctx.scene.flag.set_tick_rate(200.0).unwrap();
    assert!(approx_eq_f32(ctx.dt(), 0.005, 1e-9));
}

#[test]
fn test_particle_states_follow_grid_order() {
    let ctx = build_simulation_context(
        FlagConfig::new().with_segments(3, 2),
        SceneConfig::default(),
        1,
    )
    .unwrap();
    let states = get_particle_states(&ctx);
    assert_eq!(states.len(), 12);
    for (state, particle) in states.iter().zip(ctx.scene.flag.particles()) {
        assert_eq!(state.pos, particle.pos);
        assert_eq!(state.pinned, particle.pinned);
        assert_eq!(state.mass, particle.mass());
    }
    assert!(states[0].pinned && states[4].pinned && states[8].pinned);
}

#[test]
fn test_run_reports_probes() {
    let result = run_small_flag(100).unwrap();
    assert_eq!(result.steps, 100);
    assert_eq!(result.positions.len(), 9 * 7);

    let names: Vec<&str> = result.probes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "corner_x",
            "corner_y",
            "corner_z",
            "centroid_x",
            "centroid_y",
            "centroid_z",
            "max_displacement",
            "kinetic_energy",
            "elastic_energy",
        ]
    );

    let corner_x = result.probes.iter().find(|p| p.name == "corner_x").unwrap();
    assert_eq!(corner_x.value, result.positions[result.positions.len() - 1].x);
    assert!(result.probes.iter().all(|p| p.value.is_finite()));

    let displacement = result
        .probes
        .iter()
        .find(|p| p.name == "max_displacement")
        .unwrap();
    assert!(displacement.value > 0.0, "wind and gravity should move the flag");
}

#[test]
fn test_max_displacement_tracks_free_particles() {
    let config = FlagConfig::new().with_size(2.0, 1.0).with_segments(2, 1);
    let mut flag = Flag::build(config).unwrap();
    assert_eq!(flag.max_displacement(), 0.0);

    let free = flag.index(2, 1).unwrap();
    flag.particles_mut()[free].pos += Vec3::new(0.0, 0.0, 0.75);
    let near = flag.index(1, 0).unwrap();
    flag.particles_mut()[near].pos += Vec3::new(0.25, 0.0, 0.0);
    // pinned particles are excluded even when moved by hand
    flag.particles_mut()[0].pos += Vec3::new(5.0, 0.0, 0.0);

    assert!(approx_eq_f32(flag.max_displacement(), 0.75, 1e-6));
    let probes = evaluate_probes(&flag);
    let reported = probes.iter().find(|p| p.name == "max_displacement").unwrap();
    assert_eq!(reported.value, flag.max_displacement());
}

#[test]
fn test_calm_run_has_no_displacement() {
    let config = FlagConfig::new().with_segments(4, 3);
    let result = run_simulation(config, SceneConfig::calm(), 50).unwrap();
    let displacement = result
        .probes
        .iter()
        .find(|p| p.name == "max_displacement")
        .unwrap();
    assert_eq!(displacement.value, 0.0);
}

#[test]
fn test_invalid_config_fails_to_build_context() {
    let config = FlagConfig::new().with_mass(0.0);
    assert!(build_simulation_context(config, SceneConfig::default(), 10).is_err());
}
