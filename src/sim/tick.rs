//! Per-frame update
//!
//! One call per display refresh while a session is running. Elapsed time
//! comes from the display timestamps; there is no fixed timestep.

use super::collision::{collision, manage_score};
use super::geometry::Renderer;
use super::obstacle::Motion;
use super::state::{SessionState, World};

/// Turns monotonic frame timestamps (ms) into elapsed seconds
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    previous: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp; the next frame only primes the clock
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Seconds since the last frame, or `None` on the first frame
    pub fn advance(&mut self, timestamp_ms: f64) -> Option<f32> {
        let previous = self.previous.replace(timestamp_ms)?;
        Some(((timestamp_ms - previous).max(0.0) / 1000.0) as f32)
    }
}

/// What a frame produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// First frame after a (re)start: timestamp recorded, nothing moved
    Primed,
    /// Motion applied, no collision
    Continue { scored: bool },
    /// Collision detected; the frame's score update was skipped
    Collided,
}

/// Advance one frame: actor, obstacle, collision, then scoring
pub fn tick<R: Renderer>(
    world: &mut World<R::Handle>,
    session: &mut SessionState,
    clock: &mut FrameClock,
    renderer: &mut R,
    timestamp_ms: f64,
) -> FrameOutcome {
    let Some(dt) = clock.advance(timestamp_ms) else {
        return FrameOutcome::Primed;
    };

    world
        .actor
        .advance(renderer, &world.constants.physics, dt);

    let playfield = world.playfield.bbox;
    if world
        .obstacle
        .advance(renderer, &playfield, &mut world.rng, dt)
        == Motion::Recycled
    {
        world.actor.has_scored_current_obstacle = false;
    }

    if collision(
        &world.actor.entity.bbox,
        &world.obstacle.entity.bbox,
        &world.obstacle.gap,
        &playfield,
    ) {
        return FrameOutcome::Collided;
    }

    let scored = manage_score(&mut world.actor, &world.obstacle.entity.bbox, session);
    FrameOutcome::Continue { scored }
}
