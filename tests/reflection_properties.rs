//! Invariants of the photon engine, checked over random launches

use glam::Vec2;
use proptest::prelude::*;

use mirror_room::sim::{
    Boundary, Detector, FLOOR_TILT_BAND, MirrorLine, Photon, Room, Simulation, StepEvent,
    WallBehavior, step, tick,
};

const SPEED: f32 = 3.5;
const TOLERANCE: f32 = 1e-3;

fn room() -> Room {
    Room::new(0.0, 100.0, 0.0, 100.0, 4.0, 5.0)
        .unwrap()
        .with_walls(WallBehavior::Bounce, WallBehavior::Absorb)
}

/// Launch points clear of every margin, any direction
fn launches() -> impl Strategy<Value = Photon> {
    (6.0f32..94.0, 6.0f32..94.0, 0.0f32..std::f32::consts::TAU)
        .prop_map(|(x, y, angle)| {
            Photon::new(Vec2::new(x, y), Vec2::from_angle(angle), SPEED).unwrap()
        })
}

/// Detectors of any size anywhere in the room, or none at all
fn detectors() -> impl Strategy<Value = Option<Detector>> {
    prop::option::of(
        (0.0f32..100.0, 0.0f32..100.0, 0.0f32..15.0)
            .prop_map(|(x, y, r)| Detector::new(Vec2::new(x, y), r).unwrap()),
    )
}

/// 400x400 room over an absorbing floor, with a tilted mirror drawn from the
/// re-tilt band
fn tilted_room() -> impl Strategy<Value = Room> {
    let limit = 400.0 - 6.0;
    (limit - FLOOR_TILT_BAND..=limit, limit - FLOOR_TILT_BAND..=limit).prop_map(|(a, b)| {
        let line = MirrorLine::new(Vec2::new(0.0, a), Vec2::new(400.0, b)).unwrap();
        Room::new(0.0, 400.0, 0.0, 400.0, 6.0, 6.0)
            .unwrap()
            .with_walls(WallBehavior::Bounce, WallBehavior::Absorb)
            .with_floor_mirror(line)
    })
}

proptest! {
    #[test]
    fn speed_is_preserved(photon in launches()) {
        let room = room();
        let mut photon = photon;
        for _ in 0..400 {
            let (next, event) = step(&photon, &room);
            prop_assert!((next.velocity().length() - SPEED).abs() < TOLERANCE);
            if event.is_terminal() {
                break;
            }
            photon = next;
        }
    }

    #[test]
    fn reflections_land_inside_room(photon in launches()) {
        let room = room();
        let mut photon = photon;
        for _ in 0..400 {
            let (next, event) = step(&photon, &room);
            if let StepEvent::Reflected(_) = event {
                prop_assert!(room.contains(next.position()), "escaped at {:?}", next.position());
            }
            if event.is_terminal() {
                break;
            }
            photon = next;
        }
    }

    #[test]
    fn side_bounce_obeys_law_of_reflection(photon in launches()) {
        let room = room();
        let mut photon = photon;
        for _ in 0..400 {
            let (next, event) = step(&photon, &room);
            if let StepEvent::Reflected(b @ (Boundary::Left | Boundary::Right)) = event {
                let normal = b.inward_normal().unwrap();
                let incoming = photon.velocity();
                let outgoing = next.velocity();
                // Reflected axis exactly negated, the other untouched
                prop_assert_eq!(outgoing.x, -incoming.x);
                prop_assert_eq!(outgoing.y, incoming.y);
                // Same angle to the normal, on the other side
                prop_assert!((incoming.dot(-normal) - outgoing.dot(normal)).abs() < TOLERANCE);
            }
            if event.is_terminal() {
                break;
            }
            photon = next;
        }
    }

    #[test]
    fn path_grows_by_one_per_bounce(
        photon in launches(),
        detector in detectors(),
        seed in any::<u64>(),
    ) {
        let mut sim = Simulation::new(room(), photon, seed).with_max_ticks(2_000);
        sim.detector = detector;
        let mut expected = 1;
        while sim.is_running() {
            let before = sim.path().len();
            let event = tick(&mut sim).unwrap();
            prop_assert!(sim.path().len() >= before);
            if event.records_point() {
                expected += 1;
                prop_assert_eq!(sim.path().last(), sim.photon.position());
            }
            prop_assert_eq!(sim.path().len(), expected);
        }
    }

    #[test]
    fn floor_mirror_reflections_land_on_the_mirror(
        room in tilted_room(),
        x in 20.0f32..380.0,
        y in 20.0f32..280.0,
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let line = *room.floor_mirror().unwrap();
        let normal = line.normal();
        let mut photon = Photon::new(Vec2::new(x, y), Vec2::from_angle(angle), SPEED).unwrap();
        for _ in 0..1_000 {
            let (next, event) = step(&photon, &room);
            if event == StepEvent::Reflected(Boundary::FloorMirror) {
                let p = next.position();
                prop_assert!((normal.dot(p) - line.intercept()).abs() < 1e-2, "off the mirror at {:?}", p);
                prop_assert!(p.y <= room.floor_limit() + 1e-3, "in the floor margin at {:?}", p);
                prop_assert!(next.velocity().dot(normal) < 0.0);
                prop_assert!((next.velocity().length() - SPEED).abs() < TOLERANCE);
            }
            if event.is_terminal() {
                break;
            }
            photon = next;
        }
    }

    #[test]
    fn crossing_the_floor_mirror_is_never_absorbed(
        room in tilted_room(),
        x in 20.0f32..380.0,
        angle in 0.2f32..(std::f32::consts::PI - 0.2),
    ) {
        // Heading down from just above the mirror, clear of the side margins
        let line = *room.floor_mirror().unwrap();
        let t = x / 400.0;
        let y = line.start.y + (line.end.y - line.start.y) * t - 2.0;
        let photon = Photon::new(Vec2::new(x, y), Vec2::from_angle(angle), SPEED).unwrap();

        let (first, event) = step(&photon, &room);
        prop_assert!(!event.is_terminal(), "{:?} at {:?}", event, first.position());
        let (_, event) = step(&first, &room);
        prop_assert!(!event.is_terminal(), "{:?}", event);
    }
}

#[test]
fn falling_photon_scenario() {
    let room = Room::new(0.0, 100.0, 0.0, 100.0, 4.0, 5.0).unwrap();
    let photon = Photon::new(Vec2::new(50.0, 0.0), Vec2::new(0.0, 3.5), SPEED).unwrap();

    let (first, event) = step(&photon, &room);
    assert_eq!(first.position(), Vec2::new(50.0, 3.5));
    assert_eq!(event, StepEvent::None);

    let mut sim = Simulation::new(room, photon, 0);
    let mut last = StepEvent::None;
    while sim.is_running() {
        last = tick(&mut sim).unwrap();
    }
    assert_eq!(last, StepEvent::Absorbed(Boundary::Bottom));
    assert_eq!(sim.photon.position().y, 95.0);
    assert_eq!(sim.path().len(), 2);
}
