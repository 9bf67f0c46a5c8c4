//! Actor/obstacle intersection and point awards
//!
//! The gap is stored relative to the playfield top, so actor edges are
//! shifted into the same frame before comparing.

use super::geometry::{BoundingBox, PlayfieldBounds};
use super::obstacle::Gap;
use super::physics::ActorState;
use super::state::SessionState;

/// True if the actor left the playfield vertically or overlaps a solid band
pub fn collision(
    actor: &BoundingBox,
    obstacle: &BoundingBox,
    gap: &Gap,
    playfield: &PlayfieldBounds,
) -> bool {
    if actor.top < playfield.top || actor.bottom > playfield.bottom {
        return true;
    }

    // Safe zone: not level with the obstacle
    if !actor.overlaps_horizontally(obstacle) {
        return false;
    }

    let top = actor.top - playfield.top;
    let bottom = actor.bottom - playfield.top;
    top < gap.top || bottom > gap.bottom
}

/// Award one point per obstacle, the first frame the actor is fully past it.
///
/// Returns true if a point was awarded.
pub fn manage_score<H>(
    actor: &mut ActorState<H>,
    obstacle: &BoundingBox,
    session: &mut SessionState,
) -> bool {
    if actor.has_scored_current_obstacle || actor.entity.bbox.left < obstacle.right {
        return false;
    }

    session.current_score += 1;
    actor.has_scored_current_obstacle = true;
    true
}
