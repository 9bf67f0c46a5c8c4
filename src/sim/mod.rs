//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Elapsed time comes in from the caller, never read from a clock
//! - Rendering, display and storage only through the collaborator traits

pub mod collision;
pub mod geometry;
pub mod obstacle;
pub mod physics;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{collision, manage_score};
pub use geometry::{
    BoundingBox, PlayfieldBounds, Renderer, TrackedEntity, refresh_bounding_box, track_entity,
};
pub use obstacle::{Gap, Motion, ObstacleState};
pub use physics::{ActorState, PhysicsConstants, trajectory_top};
pub use session::{Directive, Game, GameEvent, Hud};
pub use state::{DerivedConstants, EntityHandles, SessionPhase, SessionState, World};
pub use tick::{FrameClock, FrameOutcome, tick};
