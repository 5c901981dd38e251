//! End-to-end runs of the preset scenarios

use mirror_room::optics::{KaleidoscopeScene, SCENE_RNG_STREAM};
use mirror_room::sim::{
    Boundary, SimPhase, Simulation, StepEvent, Termination, run_to_end, tick,
};
use mirror_room::{ConfigError, Scenario, ScenarioConfig, SimError};

#[test]
fn test_determinism() {
    // Same seed, same run
    let config = ScenarioConfig {
        seed: 99999,
        ..ScenarioConfig::from_preset(Scenario::LightClock)
    };
    let mut a = Simulation::from_config(&config).unwrap();
    let mut b = Simulation::from_config(&config).unwrap();

    assert_eq!(run_to_end(&mut a), run_to_end(&mut b));
    assert_eq!(a.time_ticks, b.time_ticks);
    assert_eq!(a.path(), b.path());
    assert_eq!(a.photon, b.photon);
}

#[test]
fn test_light_clock_terminates() {
    for seed in 0..20 {
        let config = ScenarioConfig {
            seed,
            ..ScenarioConfig::from_preset(Scenario::LightClock)
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        assert!(sim.detector.is_some());

        let termination = run_to_end(&mut sim);
        assert!(
            matches!(
                termination,
                Termination::Detected
                    | Termination::Absorbed(Boundary::Bottom)
                    | Termination::TickLimit
            ),
            "seed {seed}: {termination:?}"
        );
        assert!(matches!(sim.phase(), SimPhase::Terminated(_)));
        assert_eq!(tick(&mut sim), Err(SimError::Terminated));
        // Every recorded bounce point lies on or inside the cavity walls
        for p in sim.path().points().iter().skip(1) {
            assert!(p.x >= sim.room.left() && p.x <= sim.room.right());
            assert!(p.y >= sim.room.top() && p.y <= sim.room.bottom());
        }
    }
}

#[test]
fn test_tilted_floor_retilts_and_has_no_detector() {
    let config = ScenarioConfig {
        seed: 5,
        max_ticks: Some(5_000),
        ..ScenarioConfig::from_preset(Scenario::TiltedFloor)
    };
    let mut sim = Simulation::from_config(&config).unwrap();
    assert!(sim.detector.is_none());
    assert!(sim.retilt_on_top_bounce);

    let original = sim.room.floor_mirror().copied();
    assert_eq!(run_to_end(&mut sim), Termination::TickLimit);
    let bounced_top = sim
        .path()
        .points()
        .iter()
        .any(|p| p.y == sim.room.top() + sim.room.object_radius());
    if bounced_top {
        assert_ne!(sim.room.floor_mirror().copied(), original);
    }
}

#[test]
fn test_tilted_floor_photons_reach_the_mirror() {
    let mut floor_bounces = 0;
    for seed in 0..200 {
        let config = ScenarioConfig {
            seed,
            max_ticks: Some(2_000),
            ..ScenarioConfig::from_preset(Scenario::TiltedFloor)
        };
        let mut sim = Simulation::from_config(&config).unwrap();

        let mut hit_floor = false;
        while sim.is_running() {
            let event = tick(&mut sim).unwrap();
            assert!(
                !matches!(event, StepEvent::Absorbed(_)),
                "seed {seed}: {event:?} at {:?}",
                sim.photon.position()
            );
            if event == StepEvent::Reflected(Boundary::FloorMirror) {
                hit_floor = true;
                assert!(sim.photon.position().y <= sim.room.floor_limit() + 1e-3);
            }
        }
        assert_eq!(sim.termination(), Some(Termination::TickLimit));
        if hit_floor {
            floor_bounces += 1;
        }
    }
    // Only near-horizontal launches miss the floor for the whole run
    assert!(floor_bounces >= 100, "{floor_bounces} of 200 runs hit the floor mirror");
}

#[test]
fn test_kaleidoscope_scene_frame() {
    let config = ScenarioConfig::from_preset(Scenario::Kaleidoscope);
    let sim = Simulation::from_config(&config).unwrap();
    let start = sim.path().start();
    assert!(start.x >= sim.room.left() && start.x < sim.room.right());
    assert!(start.y >= sim.room.top() && start.y < sim.room.bottom());

    let mut rng = sim.rng_state.stream(SCENE_RNG_STREAM);
    let scene = KaleidoscopeScene::randomized(sim.room.clone(), &config.settings, &mut rng).unwrap();
    // Placement does not replay the photon's launch draws
    assert_ne!(scene.emitter.position, start);
    let frame = scene.frame().unwrap();
    assert_eq!(frame.emitter_images.len(), 4);
    assert_eq!(frame.target_images.len(), 4);
    assert_eq!(frame.aligned, scene.target.contains(scene.emitter.position));
}

#[test]
fn test_invalid_config_rejected_at_setup() {
    let mut config = ScenarioConfig::default();
    config.settings.photon_radius = -1.0;
    assert!(matches!(
        Simulation::from_config(&config),
        Err(ConfigError::NegativeRadius { name: "photon_radius", .. })
    ));
}
