//! Fixed-step photon advance
//!
//! `step` is the pure engine: one photon and one room in, the next photon and
//! an event out. `tick` is what the frame driver calls; it wraps `step` with
//! path recording, detection, floor re-tilting and the run state machine.
//!
//! There is no sub-stepping. A photon whose speed exceeds the boundary margin
//! can tunnel straight through a wall in one step; callers keep `speed` well
//! below the radius slack and the cavity size.

use super::collision::{Boundary, reflect_axis_aligned, reflect_off_line};
use super::room::{Room, WallBehavior};
use super::state::{Photon, SimPhase, Simulation, StepEvent, Termination};
use crate::error::SimError;

/// Advance a photon by one unit time step inside `room`
///
/// Boundaries are evaluated per axis, at most one per axis. If a wall that
/// absorbs is hit, absorption wins and the position is clamped on both axes.
/// Otherwise a side mirror reflects first; a bouncing wall hit in the same
/// step only clamps its coordinate and reflects on a later step. The floor
/// mirror sits in front of the bottom wall and hides it once crossed; it
/// reflects when no other wall was touched.
pub fn step(photon: &Photon, room: &Room) -> (Photon, StepEvent) {
    let velocity = photon.velocity();
    let mut position = photon.position() + velocity;
    let floor = room
        .floor_mirror()
        .filter(|line| line.has_crossed(position) && velocity.dot(line.normal()) > 0.0);

    let mut crossings = room.crossings(position, velocity);
    if floor.is_some() && crossings.wall == Some(Boundary::Bottom) {
        crossings.wall = None;
    }

    if let Some(wall) = crossings.wall {
        if room.wall_behavior(wall) == WallBehavior::Absorb {
            position = room.clamp_to(position, wall);
            if let Some(side) = crossings.side {
                position = room.clamp_to(position, side);
            }
            return (photon.with_motion(position, velocity), StepEvent::Absorbed(wall));
        }
    }

    if let Some(side) = crossings.side {
        position = room.clamp_to(position, side);
        if let Some(wall) = crossings.wall {
            position = room.clamp_to(position, wall);
        }
        let velocity = reflect_axis_aligned(velocity, side);
        return (photon.with_motion(position, velocity), StepEvent::Reflected(side));
    }

    if let Some(wall) = crossings.wall {
        position = room.clamp_to(position, wall);
        let velocity = reflect_axis_aligned(velocity, wall);
        return (photon.with_motion(position, velocity), StepEvent::Reflected(wall));
    }

    if let Some(line) = floor {
        let velocity = reflect_off_line(velocity, line.normal(), photon.speed());
        let position = line.project(position);
        return (
            photon.with_motion(position, velocity),
            StepEvent::Reflected(Boundary::FloorMirror),
        );
    }

    (photon.with_motion(position, velocity), StepEvent::None)
}

/// Advance the simulation by one tick
///
/// Refuses with `SimError::Terminated` once the run is over. Detection is
/// checked against the post-step position and takes precedence over whatever
/// `step` reported; the boundary is carried in the `Detected` event and its
/// bounce point is still recorded.
pub fn tick(sim: &mut Simulation) -> Result<StepEvent, SimError> {
    if !sim.is_running() {
        return Err(SimError::Terminated);
    }

    let (photon, mut event) = step(&sim.photon, &sim.room);
    sim.photon = photon;
    sim.time_ticks += 1;

    if event.records_point() {
        sim.path.push(photon.position());
        log::debug!(
            "Tick {}: {:?} at {:?}, velocity {:?}",
            sim.time_ticks,
            event,
            photon.position(),
            photon.velocity()
        );
    }

    if let StepEvent::Reflected(Boundary::Top) = event {
        if sim.retilt_on_top_bounce {
            sim.room = sim.room.retilted(&mut sim.rng);
        }
    }

    if sim
        .detector
        .as_ref()
        .is_some_and(|d| d.is_detecting(photon.position()))
    {
        event = StepEvent::Detected {
            boundary: event.boundary(),
        };
    }

    match event {
        StepEvent::Detected { .. } => {
            sim.phase = SimPhase::Terminated(Termination::Detected);
            log::info!("Photon detected at {:?} after {} ticks", photon.position(), sim.time_ticks);
        }
        StepEvent::Absorbed(wall) => {
            sim.phase = SimPhase::Terminated(Termination::Absorbed(wall));
            log::info!("Photon absorbed by {:?} wall after {} ticks", wall, sim.time_ticks);
        }
        _ => {
            if sim.max_ticks.is_some_and(|max| sim.time_ticks >= max) {
                sim.phase = SimPhase::Terminated(Termination::TickLimit);
                log::warn!("Tick limit reached after {} ticks, stopping run", sim.time_ticks);
            }
        }
    }

    Ok(event)
}

/// Tick until the run terminates
///
/// Without a tick cap this only returns if the photon eventually reaches an
/// absorbing wall or the detector.
pub fn run_to_end(sim: &mut Simulation) -> Termination {
    loop {
        if let Some(termination) = sim.termination() {
            return termination;
        }
        // Only fails when already terminated, which the check above rules out
        let _ = tick(sim);
    }
}
