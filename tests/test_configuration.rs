// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration files driving the neurogram engine

use std::collections::HashMap;

use hearing_model::prelude::*;

const CONFIG: &str = r#"
[system]
max_threads = 2

[neurogram]
bin_width = 1e-4
min_cf = 500.0
max_cf = 8000.0
seed = 7

[cochlea]
species = "human_shera"

[synapse]
spont = 50.0
noise = "disabled"

[spikes]
model = "release_sites"
"#;

#[test]
fn test_file_config_reaches_neurogram() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("periphery_configuration.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let config = load_config(Some(path.as_path()), None).unwrap();
    validate_config(&config).unwrap();
    assert_eq!(config.cochlea.species, Species::HumanShera);
    assert_eq!(config.synapse.noise, NoiseMode::Disabled);
    assert_eq!(config.spikes.model, SpikeModel::ReleaseSites);
    // Unlisted sections keep their defaults
    assert_eq!(config.synapse.power_law, PowerLawImplementation::Approximate);

    let ng = Neurogram::with_config(3, config).unwrap();
    assert_eq!(ng.seed(), 7);
    assert!((ng.bin_width() - 1e-4).abs() < 1e-15);
    assert!((ng.cfs()[0] - 500.0).abs() < 1e-9);
    assert!((ng.cfs()[2] - 8000.0).abs() < 1e-6);
}

#[test]
fn test_cli_override_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("periphery_configuration.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let mut cli = HashMap::new();
    cli.insert("max_threads".to_string(), "1".to_string());
    let config = load_config(Some(path.as_path()), Some(&cli)).unwrap();
    assert_eq!(config.system.max_threads, 1);
}

#[test]
fn test_invalid_config_rejected_by_neurogram() {
    let mut config = PeripheryConfig::default();
    config.cochlea.cohc = 2.0;
    config.synapse.spont = -1.0;
    let err = Neurogram::with_config(2, config).unwrap_err();
    assert!(matches!(
        &err,
        PeripheryError::InvalidParameter(msg)
            if msg.contains("cochlea.cohc") && msg.contains("synapse.spont")
    ));
}

#[test]
fn test_human_model_runs_end_to_end() {
    let mut config = PeripheryConfig::default();
    config.cochlea.species = Species::HumanGlasbergMoore;
    config.synapse.noise = NoiseMode::Disabled;
    let stim = Stimulus::ramped_sine_wave(0.02, 0.03, 100_000, 2e-3, 5e-3, 1000.0, 60.0).unwrap();

    let mut ng = Neurogram::with_config(2, config).unwrap();
    ng.set_bin_width(5e-4);
    ng.create(&stim, 3).unwrap();
    assert_eq!(ng.get_output().unwrap().dim(), (2, 50));
}
