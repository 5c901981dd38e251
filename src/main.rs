//! Mirror Room headless driver
//!
//! Loads a scenario (a preset name or a JSON file), runs the photon until the
//! run terminates and prints a JSON report. For the kaleidoscope preset it
//! also reports the mirror images of a randomly placed scene.
//!
//! Usage: `mirror-room [PRESET | scenario.json] [SEED]`

use std::process::ExitCode;

use glam::Vec2;
use serde::Serialize;

use mirror_room::optics::{KaleidoscopeScene, SCENE_RNG_STREAM, SceneFrame};
use mirror_room::sim::{Photon, Simulation, Termination, run_to_end};
use mirror_room::{ConfigError, Scenario, ScenarioConfig};

/// What a finished run looked like
#[derive(Debug, Serialize)]
struct RunReport {
    scenario: Scenario,
    seed: u64,
    ticks: u64,
    termination: Termination,
    photon: Photon,
    path: Vec<Vec2>,
    path_length: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<SceneFrame>,
}

fn parse_args() -> Result<ScenarioConfig, ConfigError> {
    let mut args = std::env::args().skip(1);

    let mut config = match args.next() {
        None => ScenarioConfig::default(),
        Some(arg) if arg.ends_with(".json") => ScenarioConfig::load(&arg)?,
        Some(arg) => match Scenario::from_str(&arg) {
            Some(scenario) => ScenarioConfig::from_preset(scenario),
            None => return Err(ConfigError::UnknownScenario(arg)),
        },
    };

    if let Some(seed) = args.next() {
        match seed.parse() {
            Ok(seed) => config.seed = seed,
            Err(_) => log::warn!("Ignoring non-numeric seed `{}`", seed),
        }
    }
    Ok(config)
}

fn run(config: &ScenarioConfig) -> Result<RunReport, ConfigError> {
    let mut sim = Simulation::from_config(config)?;
    let termination = run_to_end(&mut sim);

    let scene = match config.scenario {
        Scenario::Kaleidoscope => {
            let mut rng = sim.rng_state.stream(SCENE_RNG_STREAM);
            let scene =
                KaleidoscopeScene::randomized(sim.room.clone(), &config.settings, &mut rng)?;
            Some(scene.frame()?)
        }
        _ => None,
    };

    Ok(RunReport {
        scenario: config.scenario,
        seed: config.seed,
        ticks: sim.time_ticks,
        termination,
        photon: sim.photon,
        path_length: sim.path().length_to(sim.photon.position()),
        path: sim.path().points().to_vec(),
        scene,
    })
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Mirror Room (headless) starting...");

    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: mirror-room [lightclock|tiltedfloor|kaleidoscope|FILE.json] [SEED]");
            return ExitCode::FAILURE;
        }
    };

    let report = match run(&config) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Run failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Run finished: {:?} after {} ticks, {} bounce points",
        report.termination,
        report.ticks,
        report.path.len()
    );

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize report: {}", e);
            ExitCode::FAILURE
        }
    }
}
