//! Integration tests for the `run` command.
use stroke_pathway::cli::{RunOpts, handle_run_command};
use stroke_pathway::log::LOG_LEVEL_ENV_VAR;
use stroke_pathway::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example model.
fn get_model_dir() -> PathBuf {
    PathBuf::from("demos/simple")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var(LOG_LEVEL_ENV_VAR, "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        ..Default::default()
    };
    handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "processed_data.csv",
        "scenario_list_msu.csv",
        "metadata.toml",
        "stroke_pathway_info.log",
        "stroke_pathway_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }
    assert!(!output_dir.join("debug_nearest_ivt_unit.csv").exists());

    // Scenario settings are layered on top of the model defaults
    let scenario: toml::Table = fs::read_to_string(output_dir.join("scenarios/msu_1.toml"))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(scenario["process_msu_dispatch"].as_float(), Some(5.0));
    assert_eq!(scenario["transfer_time_delay"].as_float(), Some(60.0));

    // Output folder is no longer empty, so running again without overwriting fails before the
    // logger is touched
    let err = handle_run_command(&get_model_dir(), &opts, Some(Settings::default())).unwrap_err();
    assert!(
        err.chain()
            .next()
            .unwrap()
            .to_string()
            .starts_with("Failed to create output directory")
    );

    // Logging has already been initialised, so a second run fails at that point
    let opts = RunOpts {
        output_dir: Some(output_dir),
        overwrite: true,
        debug_model: false,
    };
    assert_eq!(
        handle_run_command(&get_model_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .chain()
            .next()
            .unwrap()
            .to_string(),
        "Failed to initialise logging."
    );
}
