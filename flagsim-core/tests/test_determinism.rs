//! Determinism tests - identical inputs produce identical trajectories

use flagsim_core::tests::test_helpers::{results_approx_equal, run_small_flag};
use flagsim_core::{run_simulation, FlagConfig, FlagScene, IntegrationRule, SceneConfig};
use glam::Vec3;

#[test]
fn test_repeated_runs_match() {
    let results: Vec<_> = (0..5)
        .map(|_| run_small_flag(250).expect("Run failed"))
        .collect();

    for i in 1..results.len() {
        assert!(
            results_approx_equal(&results[0], &results[i], 0.0),
            "Run {} should match run 0",
            i
        );
    }
}

#[test]
fn test_explicit_euler_determinism() {
    let config = FlagConfig::new()
        .with_segments(6, 4)
        .with_integration(IntegrationRule::ExplicitEuler)
        .with_stiffness(0.02);

    let result1 = run_simulation(config.clone(), SceneConfig::default(), 60).expect("First run failed");
    let result2 = run_simulation(config, SceneConfig::default(), 60).expect("Second run failed");

    assert!(
        results_approx_equal(&result1, &result2, 0.0),
        "Explicit Euler simulation should be deterministic"
    );
}

#[test]
fn test_same_time_sequence_gives_same_trajectory() {
    let times: Vec<(f32, f32)> = (0..200)
        .map(|i| (i as f32 * 0.013, 0.005 + 0.005 * ((i % 3) as f32)))
        .collect();

    let run = || {
        let mut scene = FlagScene::new(
            FlagConfig::new().with_segments(5, 5).with_damping(0.01),
            SceneConfig::default(),
        )
        .unwrap();
        for &(now, dt) in &times {
            scene.update(now, dt).unwrap();
        }
        scene.flag.positions().collect::<Vec<Vec3>>()
    };

    assert_eq!(run(), run());
}
