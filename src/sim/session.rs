//! Session state machine and event dispatch
//!
//! Every asynchronous input (key press, display frame, viewport resize,
//! restart timer) arrives here as a `GameEvent`. The platform executes the
//! returned `Directive`; the core never schedules anything itself.

use super::geometry::Renderer;
use super::state::{EntityHandles, SessionPhase, SessionState, World};
use super::tick::{FrameClock, FrameOutcome, tick};
use crate::highscores::HighScoreStore;
use crate::settings::Settings;

/// Score display collaborator
pub trait Hud {
    /// Live score while running
    fn show_score(&mut self, score: u64);

    /// Final and best score once a session ends
    fn show_final_score(&mut self, score: u64, high_score: u64);

    fn set_end_panel_visible(&mut self, visible: bool);
}

/// Inputs delivered to the game, one at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Jump key (also starts/restarts when not running)
    JumpPressed,
    /// Display refresh scheduled for `session`
    Frame { session: u32, timestamp_ms: f64 },
    /// Viewport changed size
    Resized,
    /// One-shot restart debounce for `session` expired
    RestartDelayElapsed { session: u32 },
}

/// Work the platform must schedule after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Deliver the next display frame as `GameEvent::Frame { session, .. }`
    RequestFrame { session: u32 },
    /// Stop the frame loop and fire `RestartDelayElapsed { session }` once
    /// after `delay_ms`
    ArmRestartTimer { session: u32, delay_ms: u32 },
}

/// The game: context object plus its collaborators
pub struct Game<P: Renderer + Hud, S: HighScoreStore> {
    platform: P,
    store: S,
    settings: Settings,
    world: World<P::Handle>,
    session: SessionState,
    clock: FrameClock,
}

impl<P: Renderer + Hud, S: HighScoreStore> Game<P, S> {
    pub fn new(
        mut platform: P,
        store: S,
        handles: EntityHandles<P::Handle>,
        settings: Settings,
        seed: u64,
    ) -> Self {
        let settings = settings.sanitized();
        let high_score = store.load_high_score().unwrap_or(0);
        let world = World::new(&mut platform, handles, &settings, seed);

        platform.show_score(0);
        platform.set_end_panel_visible(false);
        log::info!("Game initialized (seed {}, high score {})", seed, high_score);

        Self {
            platform,
            store,
            settings,
            world,
            session: SessionState::new(high_score),
            clock: FrameClock::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn world(&self) -> &World<P::Handle> {
        &self.world
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Route one event to the current state's handler
    pub fn dispatch(&mut self, event: GameEvent) -> Option<Directive> {
        match event {
            GameEvent::JumpPressed => self.on_jump(),
            GameEvent::Frame {
                session,
                timestamp_ms,
            } => self.on_frame(session, timestamp_ms),
            GameEvent::Resized => {
                self.world.handle_resize(&mut self.platform, &self.settings);
                None
            }
            GameEvent::RestartDelayElapsed { session } => {
                self.on_restart_delay(session);
                None
            }
        }
    }

    fn on_jump(&mut self) -> Option<Directive> {
        match self.session.phase {
            SessionPhase::Running => {
                // Mid-air jumps are allowed and restart the arc
                self.world.actor.request_jump();
                None
            }
            SessionPhase::Idle | SessionPhase::Ended { restart_armed: true } => {
                Some(self.start_session())
            }
            SessionPhase::Ended {
                restart_armed: false,
            } => {
                log::debug!("Restart ignored until the debounce expires");
                None
            }
        }
    }

    fn start_session(&mut self) -> Directive {
        if self.session.session_id > 0 {
            self.world.reset(&mut self.platform);
        } else {
            let height = self.world.bounds().height;
            self.world
                .obstacle
                .redraw_gap(&mut self.platform, height, &mut self.world.rng);
        }

        self.session.current_score = 0;
        self.session.session_id = self.session.session_id.wrapping_add(1);
        self.session.phase = SessionPhase::Running;
        self.clock.reset();

        self.platform.set_end_panel_visible(false);
        self.platform.show_score(0);
        log::info!("Session {} started", self.session.session_id);

        Directive::RequestFrame {
            session: self.session.session_id,
        }
    }

    fn on_frame(&mut self, session: u32, timestamp_ms: f64) -> Option<Directive> {
        if !self.session.is_running() || session != self.session.session_id {
            log::debug!("Dropping stale frame for session {}", session);
            return None;
        }

        match tick(
            &mut self.world,
            &mut self.session,
            &mut self.clock,
            &mut self.platform,
            timestamp_ms,
        ) {
            FrameOutcome::Collided => Some(self.end_session()),
            FrameOutcome::Continue { scored } => {
                if scored {
                    self.platform.show_score(self.session.current_score);
                }
                Some(Directive::RequestFrame { session })
            }
            FrameOutcome::Primed => Some(Directive::RequestFrame { session }),
        }
    }

    fn end_session(&mut self) -> Directive {
        self.session.phase = SessionPhase::Ended {
            restart_armed: false,
        };

        if self.session.record_high_score() {
            self.store.save_high_score(self.session.high_score);
            log::info!("New high score: {}", self.session.high_score);
        }

        self.platform
            .show_final_score(self.session.current_score, self.session.high_score);
        log::info!(
            "Session {} ended with score {}",
            self.session.session_id,
            self.session.current_score
        );

        Directive::ArmRestartTimer {
            session: self.session.session_id,
            delay_ms: self.settings.restart_delay_ms,
        }
    }

    fn on_restart_delay(&mut self, session: u32) {
        let pending = self.session.phase
            == SessionPhase::Ended {
                restart_armed: false,
            };
        if !pending || session != self.session.session_id {
            return;
        }

        self.session.phase = SessionPhase::Ended {
            restart_armed: true,
        };
        self.platform.set_end_panel_visible(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScoreStore;
    use crate::platform::headless::HeadlessSurface;
    use crate::sim::obstacle::Gap;
    use glam::Vec2;

    type TestGame = Game<HeadlessSurface, MemoryHighScoreStore>;

    fn game_with_store(store: MemoryHighScoreStore) -> TestGame {
        Game::new(
            HeadlessSurface::new(800.0, 600.0),
            store,
            HeadlessSurface::handles(),
            Settings::default(),
            5,
        )
    }

    fn game() -> TestGame {
        game_with_store(MemoryHighScoreStore::new())
    }

    /// Put the actor above the playfield so the next frame collides
    fn force_collision(game: &mut TestGame) {
        let left = game.world.actor.entity.bbox.left;
        game.world
            .actor
            .entity
            .move_to(&mut game.platform, Vec2::new(left, -100.0));
        game.world.actor.jump_origin = -100.0;
    }

    /// Run frames until the session ends; returns the directive that ended it
    fn crash(game: &mut TestGame) -> Directive {
        let session = game.session.session_id;
        force_collision(game);
        assert_eq!(
            game.dispatch(GameEvent::Frame {
                session,
                timestamp_ms: 0.0
            }),
            Some(Directive::RequestFrame { session })
        );
        game.dispatch(GameEvent::Frame {
            session,
            timestamp_ms: 16.0,
        })
        .expect("collision frame yields a directive")
    }

    #[test]
    fn test_idle_until_jump() {
        let mut game = game();
        assert_eq!(game.session().phase, SessionPhase::Idle);
        assert_eq!(game.session().high_score, 0);

        // Frames before the first start are ignored
        assert_eq!(
            game.dispatch(GameEvent::Frame {
                session: 0,
                timestamp_ms: 0.0
            }),
            None
        );

        let directive = game.dispatch(GameEvent::JumpPressed);
        assert_eq!(directive, Some(Directive::RequestFrame { session: 1 }));
        assert!(game.session().is_running());
        assert_eq!(game.platform().hud.score, 0);
        assert!(!game.platform().hud.end_panel_visible);
    }

    #[test]
    fn test_jump_while_running_requests_jump() {
        let mut game = game();
        game.dispatch(GameEvent::JumpPressed);
        assert!(!game.world().actor.is_jumping);

        assert_eq!(game.dispatch(GameEvent::JumpPressed), None);
        assert!(game.world().actor.is_jumping);
        assert_eq!(game.session().session_id, 1);
    }

    #[test]
    fn test_collision_ends_session() {
        let mut game = game();
        game.dispatch(GameEvent::JumpPressed);

        let directive = crash(&mut game);
        assert_eq!(
            directive,
            Directive::ArmRestartTimer {
                session: 1,
                delay_ms: Settings::default().restart_delay_ms
            }
        );
        assert_eq!(
            game.session().phase,
            SessionPhase::Ended {
                restart_armed: false
            }
        );
        assert_eq!(game.platform().hud.final_score, Some((0, 0)));

        // The loop is stopped: further frames are dropped
        assert_eq!(
            game.dispatch(GameEvent::Frame {
                session: 1,
                timestamp_ms: 32.0
            }),
            None
        );
    }

    #[test]
    fn test_new_high_score_persisted() {
        let mut game = game_with_store(MemoryHighScoreStore::with_raw("2"));
        assert_eq!(game.session().high_score, 2);
        game.dispatch(GameEvent::JumpPressed);

        game.session.current_score = 3;
        crash(&mut game);

        assert_eq!(game.session().high_score, 3);
        assert_eq!(game.store().raw(), Some("3"));
        assert_eq!(game.store().writes, 1);
        assert_eq!(game.platform().hud.final_score, Some((3, 3)));
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut game = game_with_store(MemoryHighScoreStore::with_raw("5"));
        game.dispatch(GameEvent::JumpPressed);

        game.session.current_score = 5;
        crash(&mut game);

        assert_eq!(game.session().high_score, 5);
        assert_eq!(game.store().raw(), Some("5"));
        assert_eq!(game.store().writes, 0);
        assert_eq!(game.platform().hud.final_score, Some((5, 5)));
    }

    #[test]
    fn test_corrupt_high_score_treated_as_zero() {
        let mut game = game_with_store(MemoryHighScoreStore::with_raw("garbage"));
        assert_eq!(game.session().high_score, 0);
        game.dispatch(GameEvent::JumpPressed);

        game.session.current_score = 1;
        crash(&mut game);
        assert_eq!(game.store().raw(), Some("1"));
    }

    #[test]
    fn test_restart_debounce() {
        let mut game = game();
        game.dispatch(GameEvent::JumpPressed);
        crash(&mut game);

        // Too early
        assert_eq!(game.dispatch(GameEvent::JumpPressed), None);
        assert!(!game.session().is_running());
        assert!(!game.platform().hud.end_panel_visible);

        // Timer fires: restart armed and panel shown
        game.dispatch(GameEvent::RestartDelayElapsed { session: 1 });
        assert_eq!(
            game.session().phase,
            SessionPhase::Ended {
                restart_armed: true
            }
        );
        assert!(game.platform().hud.end_panel_visible);

        // A duplicate firing changes nothing
        game.dispatch(GameEvent::RestartDelayElapsed { session: 1 });
        assert_eq!(
            game.session().phase,
            SessionPhase::Ended {
                restart_armed: true
            }
        );

        let directive = game.dispatch(GameEvent::JumpPressed);
        assert_eq!(directive, Some(Directive::RequestFrame { session: 2 }));
        assert!(!game.platform().hud.end_panel_visible);
    }

    #[test]
    fn test_restart_resets_world_and_score() {
        let mut game = game();
        let actor_home = game.world().actor.entity.bbox;
        let obstacle_home = game.world().obstacle.entity.bbox;

        game.dispatch(GameEvent::JumpPressed);
        game.session.current_score = 4;
        crash(&mut game);
        game.dispatch(GameEvent::RestartDelayElapsed { session: 1 });
        game.dispatch(GameEvent::JumpPressed);

        assert_eq!(game.session().current_score, 0);
        assert_eq!(game.session().high_score, 4);
        assert_eq!(game.platform().hud.score, 0);
        assert_eq!(game.world().actor.entity.bbox, actor_home);
        assert_eq!(game.world().actor.elapsed_jump_time, 0.0);
        assert_eq!(game.world().obstacle.entity.bbox, obstacle_home);

        // Clock was reset: the first frame of the new session only primes
        let top = game.world().actor.entity.bbox.top;
        game.dispatch(GameEvent::Frame {
            session: 2,
            timestamp_ms: 99_999.0,
        });
        assert_eq!(game.world().actor.entity.bbox.top, top);
    }

    #[test]
    fn test_stale_callbacks_ignored() {
        let mut game = game();
        game.dispatch(GameEvent::JumpPressed);
        crash(&mut game);
        game.dispatch(GameEvent::RestartDelayElapsed { session: 1 });
        game.dispatch(GameEvent::JumpPressed);
        assert_eq!(game.session().session_id, 2);

        // Late frame from session 1
        let before = game.world().actor.entity.bbox;
        assert_eq!(
            game.dispatch(GameEvent::Frame {
                session: 1,
                timestamp_ms: 10.0
            }),
            None
        );
        assert_eq!(game.world().actor.entity.bbox, before);

        // Late timer from session 1
        game.dispatch(GameEvent::RestartDelayElapsed { session: 1 });
        assert!(game.session().is_running());
    }

    #[test]
    fn test_resize_mid_session() {
        let mut game = game();
        game.dispatch(GameEvent::JumpPressed);
        game.dispatch(GameEvent::Frame {
            session: 1,
            timestamp_ms: 0.0,
        });
        game.dispatch(GameEvent::Frame {
            session: 1,
            timestamp_ms: 50.0,
        });

        game.platform_mut().resize(1200.0, 900.0);
        assert_eq!(game.dispatch(GameEvent::Resized), None);
        let top = game.world().actor.entity.bbox.top;

        assert!(game.session().is_running());
        assert!((game.world().constants.gap_height - 300.0).abs() < 1e-3);
        assert!((game.world().constants.physics.max_jump_height - 180.0).abs() < 1e-3);

        // A frame with the same timestamp must not move the actor
        game.dispatch(GameEvent::Frame {
            session: 1,
            timestamp_ms: 50.0,
        });
        assert!((game.world().actor.entity.bbox.top - top).abs() < 1e-3);
    }

    #[test]
    fn test_resize_late_in_jump_stays_in_place() {
        let mut game = game();
        game.dispatch(GameEvent::JumpPressed);
        game.world.obstacle.gap = Gap::at(0.0, 600.0, 600.0);
        for timestamp_ms in [0.0, 200.0, 400.0] {
            game.dispatch(GameEvent::Frame {
                session: 1,
                timestamp_ms,
            });
        }
        let before = game.world().actor.entity.bbox.top;

        // Only the height changes, so the actor's laid-out position shifts by 300
        game.platform_mut().resize(800.0, 1200.0);
        game.dispatch(GameEvent::Resized);
        let shifted = game.world().actor.entity.bbox.top;
        assert!((shifted - before - 300.0).abs() < 1e-3);

        let directive = game.dispatch(GameEvent::Frame {
            session: 1,
            timestamp_ms: 400.0,
        });
        assert_eq!(directive, Some(Directive::RequestFrame { session: 1 }));
        assert!((game.world().actor.entity.bbox.top - shifted).abs() < 1e-3);
    }

    #[test]
    fn test_score_shown_when_obstacle_passed() {
        let mut game = game();
        game.dispatch(GameEvent::JumpPressed);

        // Fully open gap, obstacle just behind the actor
        game.world.obstacle.gap = Gap::at(0.0, 600.0, 600.0);
        let actor_left = game.world.actor.entity.bbox.left;
        let width = game.world.obstacle.entity.bbox.width;
        game.world
            .obstacle
            .entity
            .move_to(&mut game.platform, Vec2::new(actor_left - width - 1.0, 0.0));

        game.dispatch(GameEvent::Frame {
            session: 1,
            timestamp_ms: 0.0,
        });
        game.dispatch(GameEvent::Frame {
            session: 1,
            timestamp_ms: 10.0,
        });
        assert_eq!(game.session().current_score, 1);
        assert_eq!(game.platform().hud.score, 1);
    }
}
