//! Golden tests - compare outputs to expected snapshots

use flagsim_core::tests::test_helpers::{
    load_expected, result_to_json, run_hanging_flag, run_small_flag, write_expected,
};
use std::path::PathBuf;

fn expected_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push(filename);
    path
}

#[test]
fn test_hanging_flag_golden() {
    let expected_path = expected_path("hanging_flag.expected");
    let expected_json = load_expected(expected_path.to_str().unwrap())
        .expect("hanging_flag.expected is checked in");

    let result = run_hanging_flag(200).expect("Failed to run hanging flag");
    assert_eq!(
        result_to_json(&result),
        expected_json,
        "Output does not match expected snapshot. If this is intentional, update the .expected file."
    );
}

#[test]
fn test_small_flag_golden() {
    let expected_path = expected_path("small_flag.expected");

    let result = run_small_flag(200).expect("Failed to run small flag");
    let actual_json = result_to_json(&result);

    // Try to load expected, or write it if it doesn't exist
    match load_expected(expected_path.to_str().unwrap()) {
        Ok(expected_json) => {
            assert_eq!(actual_json, expected_json,
                "Output does not match expected snapshot. If this is intentional, update the .expected file.");
        }
        Err(_) => {
            eprintln!("Writing expected file for first time: {:?}", expected_path);
            write_expected(expected_path.to_str().unwrap(), &actual_json)
                .expect("Failed to write expected file");
        }
    }
}
