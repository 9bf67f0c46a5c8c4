//! Vertical motion of the actor
//!
//! Position is re-evaluated every frame from the last jump origin with the
//! closed-form projectile equation, so the result is independent of how
//! the elapsed time was split into frames.

use std::fmt::Debug;

use glam::Vec2;

use super::geometry::{Renderer, TrackedEntity};
use crate::consts::{JUMP_HEIGHT_FRACTION, MIN_JUMP_DURATION, MIN_PLAYFIELD_EXTENT};

/// Gravity and jump impulse derived from playfield height and jump duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConstants {
    /// Apex height of a single jump (pixels)
    pub max_jump_height: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Upward speed at the moment of a jump (pixels/s)
    pub jump_velocity: f32,
}

impl PhysicsConstants {
    /// Derive constants so a jump peaks at H/5 after T/2 and lands back on
    /// its origin after T. Degenerate inputs are clamped first.
    pub fn derive(playfield_height: f32, jump_duration: f32) -> Self {
        let height = playfield_height.max(MIN_PLAYFIELD_EXTENT);
        let duration = jump_duration.max(MIN_JUMP_DURATION);
        let max_jump_height = height * JUMP_HEIGHT_FRACTION;
        Self {
            max_jump_height,
            gravity: 8.0 * max_jump_height / (duration * duration),
            jump_velocity: 4.0 * max_jump_height / duration,
        }
    }
}

/// Top edge `t` seconds after a jump from `origin` (screen space, y down)
#[inline]
pub fn trajectory_top(origin: f32, velocity: f32, gravity: f32, t: f32) -> f32 {
    origin - velocity * t + gravity * t * t / 2.0
}

/// The jumping entity
#[derive(Debug, Clone)]
pub struct ActorState<H> {
    pub entity: TrackedEntity<H>,
    /// Launch speed captured when the current jump started
    pub velocity_at_jump: f32,
    /// Top edge when the current jump started
    pub jump_origin: f32,
    /// Seconds since the current jump started
    pub elapsed_jump_time: f32,
    /// Jump requested; consumed by the next `advance`
    pub is_jumping: bool,
    /// Point already awarded for the obstacle currently on screen
    pub has_scored_current_obstacle: bool,
}

impl<H: Clone + Debug> ActorState<H> {
    pub fn new(entity: TrackedEntity<H>, constants: &PhysicsConstants) -> Self {
        let jump_origin = entity.bbox.top;
        Self {
            entity,
            velocity_at_jump: constants.jump_velocity,
            jump_origin,
            elapsed_jump_time: 0.0,
            is_jumping: false,
            has_scored_current_obstacle: false,
        }
    }

    /// Request a jump. Mid-air requests restart the arc from the current top.
    pub fn request_jump(&mut self) {
        self.is_jumping = true;
    }

    /// Advance the trajectory by `dt` seconds and push the new transform
    pub fn advance<R: Renderer<Handle = H>>(
        &mut self,
        renderer: &mut R,
        constants: &PhysicsConstants,
        dt: f32,
    ) {
        if self.is_jumping {
            self.jump_origin = self.entity.bbox.top;
            self.velocity_at_jump = constants.jump_velocity;
            self.elapsed_jump_time = 0.0;
            self.is_jumping = false;
        }

        self.elapsed_jump_time += dt.max(0.0);
        let top = trajectory_top(
            self.jump_origin,
            self.velocity_at_jump,
            constants.gravity,
            self.elapsed_jump_time,
        );
        let left = self.entity.bbox.left;
        self.entity.move_to(renderer, Vec2::new(left, top));
    }

    /// Upward speed right now under `gravity` (pixels/s, negative when falling)
    pub fn current_velocity(&self, gravity: f32) -> f32 {
        self.velocity_at_jump - gravity * self.elapsed_jump_time
    }

    /// Restart the arc at the current top with the current velocity.
    ///
    /// Must be called with the gravity the arc was flying under, before new
    /// constants take over; the next `advance` then continues smoothly.
    pub fn rebase(&mut self, gravity: f32) {
        self.velocity_at_jump = self.current_velocity(gravity);
        self.jump_origin = self.entity.bbox.top;
        self.elapsed_jump_time = 0.0;
    }

    /// Put the actor back at its laid-out position with a fresh trajectory
    pub fn reset<R: Renderer<Handle = H>>(&mut self, renderer: &mut R, constants: &PhysicsConstants) {
        self.entity.reset_transform(renderer);
        self.velocity_at_jump = constants.jump_velocity;
        self.jump_origin = self.entity.bbox.top;
        self.elapsed_jump_time = 0.0;
        self.is_jumping = false;
        self.has_scored_current_obstacle = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessSurface, Sprite};
    use crate::sim::geometry::track_entity;
    use proptest::prelude::*;

    fn actor_at_origin(constants: &PhysicsConstants) -> (HeadlessSurface, ActorState<Sprite>) {
        let surface = HeadlessSurface::new(800.0, 500.0);
        let actor = ActorState::new(track_entity(&surface, Sprite::Actor), constants);
        (surface, actor)
    }

    #[test]
    fn test_derived_constants() {
        let c = PhysicsConstants::derive(500.0, 0.5);
        assert!((c.max_jump_height - 100.0).abs() < 1e-4);
        assert!((c.gravity - 3200.0).abs() < 1e-2);
        assert!((c.jump_velocity - 800.0).abs() < 1e-3);
    }

    #[test]
    fn test_trajectory_quarter_second() {
        let c = PhysicsConstants::derive(500.0, 0.5);
        let top = trajectory_top(0.0, c.jump_velocity, c.gravity, 0.25);
        assert!((top - -100.0).abs() < 1e-3);
        // Back at the origin after one full jump duration
        let top = trajectory_top(0.0, c.jump_velocity, c.gravity, 0.5);
        assert!(top.abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_playfield_is_clamped() {
        let c = PhysicsConstants::derive(0.0, 0.0);
        assert!(c.gravity.is_finite());
        assert!(c.jump_velocity.is_finite());
        assert!(c.max_jump_height > 0.0);

        let c = PhysicsConstants::derive(-300.0, -1.0);
        assert!(c.gravity.is_finite() && c.gravity > 0.0);
    }

    #[test]
    fn test_jump_consumed_by_next_advance() {
        let c = PhysicsConstants::derive(500.0, 0.5);
        let (mut surface, mut actor) = actor_at_origin(&c);

        actor.advance(&mut surface, &c, 0.1);
        let before = actor.entity.bbox.top;

        actor.request_jump();
        assert!(actor.is_jumping);
        actor.advance(&mut surface, &c, 0.05);
        assert!(!actor.is_jumping);
        assert_eq!(actor.jump_origin, before);
        assert!((actor.elapsed_jump_time - 0.05).abs() < 1e-6);
        assert_eq!(actor.entity.bbox.bottom, actor.entity.bbox.top + actor.entity.bbox.height);
        let rendered = surface.bounding_box(&Sprite::Actor);
        assert!((rendered.top - actor.entity.bbox.top).abs() < 1e-3);
    }

    #[test]
    fn test_mid_air_jump_resets_origin() {
        let c = PhysicsConstants::derive(500.0, 0.5);
        let (mut surface, mut actor) = actor_at_origin(&c);
        let start = actor.entity.bbox.top;

        // Rising
        actor.advance(&mut surface, &c, 0.1);
        let mid_air = actor.entity.bbox.top;
        assert!(mid_air < start);

        actor.request_jump();
        actor.advance(&mut surface, &c, 0.0);
        assert_eq!(actor.jump_origin, mid_air);
        assert_eq!(actor.entity.bbox.top, mid_air);
    }

    #[test]
    fn test_reset_restores_home() {
        let c = PhysicsConstants::derive(500.0, 0.5);
        let (mut surface, mut actor) = actor_at_origin(&c);
        let home = actor.entity.bbox;

        actor.advance(&mut surface, &c, 0.7);
        actor.has_scored_current_obstacle = true;
        actor.request_jump();

        actor.reset(&mut surface, &c);
        assert_eq!(actor.entity.bbox, home);
        assert_eq!(actor.jump_origin, home.top);
        assert_eq!(actor.elapsed_jump_time, 0.0);
        assert!(!actor.is_jumping);
        assert!(!actor.has_scored_current_obstacle);
    }

    #[test]
    fn test_rebase_continues_arc() {
        let c = PhysicsConstants::derive(500.0, 0.5);
        let (mut surface, mut actor) = actor_at_origin(&c);
        let origin = actor.jump_origin;

        actor.advance(&mut surface, &c, 0.1);
        let top = actor.entity.bbox.top;
        actor.rebase(c.gravity);
        assert_eq!(actor.jump_origin, top);
        assert_eq!(actor.elapsed_jump_time, 0.0);
        assert!((actor.velocity_at_jump - (c.jump_velocity - c.gravity * 0.1)).abs() < 1e-2);

        // Same constants: the rebased arc is the original arc
        actor.advance(&mut surface, &c, 0.15);
        let expected = trajectory_top(origin, c.jump_velocity, c.gravity, 0.25);
        assert!((actor.entity.bbox.top - expected).abs() < 1e-2);
    }

    proptest! {
        #[test]
        fn prop_incremental_matches_closed_form(
            deltas in proptest::collection::vec(0.0f32..0.05, 1..60),
            height in 100.0f32..2000.0,
        ) {
            let c = PhysicsConstants::derive(height, 0.5);
            let (mut surface, mut actor) = actor_at_origin(&c);
            let origin = actor.jump_origin;

            for dt in &deltas {
                actor.advance(&mut surface, &c, *dt);
            }

            let total: f32 = deltas.iter().sum();
            let expected = trajectory_top(origin, c.jump_velocity, c.gravity, total);
            let tolerance = 1e-3 * (1.0 + expected.abs());
            prop_assert!((actor.entity.bbox.top - expected).abs() <= tolerance);
        }
    }
}
