//! Game context: entities, derived constants and session bookkeeping
//!
//! Created once at startup and reset in place on every new session.

use std::fmt::Debug;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::geometry::{PlayfieldBounds, Renderer, TrackedEntity, refresh_bounding_box, track_entity};
use super::obstacle::{Gap, ObstacleState};
use super::physics::{ActorState, PhysicsConstants};
use crate::consts::MIN_PLAYFIELD_EXTENT;
use crate::settings::Settings;

/// Where the session state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Before the first start
    Idle,
    /// Frame loop active
    Running,
    /// Collision happened; restart accepted once `restart_armed`
    Ended { restart_armed: bool },
}

/// Score and lifecycle bookkeeping
#[derive(Debug, Clone)]
pub struct SessionState {
    pub current_score: u64,
    /// Best score ever; never decreases
    pub high_score: u64,
    pub phase: SessionPhase,
    /// Id of the current (or most recent) session, 0 before the first start
    pub session_id: u32,
}

impl SessionState {
    pub fn new(high_score: u64) -> Self {
        Self {
            current_score: 0,
            high_score,
            phase: SessionPhase::Idle,
            session_id: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Raise the high score to the current score if it beats it.
    ///
    /// Returns true if the high score changed.
    pub fn record_high_score(&mut self) -> bool {
        if self.current_score > self.high_score {
            self.high_score = self.current_score;
            true
        } else {
            false
        }
    }
}

/// Constants that depend on playfield size; recomputed on resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedConstants {
    pub physics: PhysicsConstants,
    /// Obstacle scroll speed (pixels/s)
    pub obstacle_speed: f32,
    pub gap_height: f32,
}

impl DerivedConstants {
    pub fn from_playfield(bounds: &PlayfieldBounds, settings: &Settings) -> Self {
        let width = bounds.width.max(MIN_PLAYFIELD_EXTENT);
        let height = bounds.height.max(MIN_PLAYFIELD_EXTENT);
        Self {
            physics: PhysicsConstants::derive(height, settings.jump_duration_secs),
            obstacle_speed: width / settings.crossing_secs,
            gap_height: height * settings.gap_fraction,
        }
    }
}

/// Visual handles the platform hands to the game at startup
#[derive(Debug, Clone)]
pub struct EntityHandles<H> {
    pub playfield: H,
    pub actor: H,
    pub obstacle: H,
}

/// Everything the frame update mutates
#[derive(Debug, Clone)]
pub struct World<H> {
    pub playfield: TrackedEntity<H>,
    pub constants: DerivedConstants,
    pub actor: ActorState<H>,
    pub obstacle: ObstacleState<H>,
    pub rng: Pcg32,
}

impl<H: Clone + Debug> World<H> {
    /// Track the entities, derive constants and draw the first gap
    pub fn new<R: Renderer<Handle = H>>(
        renderer: &mut R,
        handles: EntityHandles<H>,
        settings: &Settings,
        seed: u64,
    ) -> Self {
        let playfield = track_entity(renderer, handles.playfield);
        let constants = DerivedConstants::from_playfield(&playfield.bbox, settings);
        let mut rng = Pcg32::seed_from_u64(seed);

        let actor = ActorState::new(track_entity(renderer, handles.actor), &constants.physics);

        let gap = Gap::at(0.0, constants.gap_height, playfield.bbox.height);
        let mut obstacle = ObstacleState::new(
            track_entity(renderer, handles.obstacle),
            constants.obstacle_speed,
            gap,
        );
        obstacle.redraw_gap(renderer, playfield.bbox.height, &mut rng);

        Self {
            playfield,
            constants,
            actor,
            obstacle,
            rng,
        }
    }

    pub fn bounds(&self) -> &PlayfieldBounds {
        &self.playfield.bbox
    }

    /// Re-read geometry after a viewport change and re-derive constants.
    ///
    /// Positions are kept. The in-flight arc is rebased at the current top
    /// and velocity so the new gravity only shapes the rest of it.
    pub fn handle_resize<R: Renderer<Handle = H>>(&mut self, renderer: &mut R, settings: &Settings) {
        refresh_bounding_box(renderer, &mut self.playfield);
        refresh_bounding_box(renderer, &mut self.actor.entity);
        refresh_bounding_box(renderer, &mut self.obstacle.entity);

        self.actor.rebase(self.constants.physics.gravity);
        self.constants = DerivedConstants::from_playfield(&self.playfield.bbox, settings);
        self.obstacle.speed = self.constants.obstacle_speed;
        self.obstacle
            .resize_gap(renderer, self.constants.gap_height, self.playfield.bbox.height);

        log::debug!(
            "Playfield resized to {:.0}x{:.0}, gravity {:.1}, speed {:.1}",
            self.playfield.bbox.width,
            self.playfield.bbox.height,
            self.constants.physics.gravity,
            self.constants.obstacle_speed
        );
    }

    /// Back to initial positions for a new session
    pub fn reset<R: Renderer<Handle = H>>(&mut self, renderer: &mut R) {
        self.actor.reset(renderer, &self.constants.physics);
        self.obstacle
            .reset(renderer, self.playfield.bbox.height, &mut self.rng);
    }
}
