//! Skyhop entry point
//!
//! On the web this wires the game into the page; natively it plays one
//! headless session with a simple autopilot and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Skyhop starting...");

    if let Err(err) = skyhop::platform::web::run() {
        log::error!("Startup failed: {:?}", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless_run {
    use skyhop::platform::headless::{HeadlessSurface, Sprite};
    use skyhop::{Directive, Game, GameEvent, MemoryHighScoreStore, Settings};

    /// ~60 Hz display
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop after two simulated minutes
    const MAX_FRAMES: u32 = 60 * 120;

    type HeadlessGame = Game<HeadlessSurface, MemoryHighScoreStore>;

    /// Jump once falling and below the gap's centre line
    fn wants_jump(game: &HeadlessGame) -> bool {
        let world = game.world();
        let actor = &world.actor;
        let falling = actor.elapsed_jump_time > game.settings().jump_duration_secs / 2.0;
        let gap = &world.obstacle.gap;
        let threshold = world.bounds().top + gap.top + gap.height * 0.8;
        falling && actor.entity.bbox.bottom > threshold
    }

    pub fn run() {
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let mut game: HeadlessGame = Game::new(
            HeadlessSurface::new(800.0, 600.0),
            MemoryHighScoreStore::new(),
            HeadlessSurface::handles(),
            settings,
            seed,
        );

        let mut directive = game.dispatch(GameEvent::JumpPressed);
        let mut timestamp_ms = 0.0;
        let mut frames = 0;

        while let Some(Directive::RequestFrame { session }) = directive {
            if frames >= MAX_FRAMES {
                log::info!("Frame cap reached, stopping");
                break;
            }
            if wants_jump(&game) {
                game.dispatch(GameEvent::JumpPressed);
            }
            directive = game.dispatch(GameEvent::Frame {
                session,
                timestamp_ms,
            });
            timestamp_ms += FRAME_MS;
            frames += 1;
        }

        let obstacle = game.world().obstacle.entity.bbox;
        log::info!(
            "Played {} frames ({:.1}s): score {}, high score {}, last obstacle at x={:.0}",
            frames,
            timestamp_ms / 1000.0,
            game.session().current_score,
            game.session().high_score,
            obstacle.left
        );
        log::debug!(
            "Final bands: {:?}",
            game.platform().band_widths(&Sprite::Obstacle)
        );
        println!(
            "score: {}  high score: {}",
            game.session().current_score,
            game.session().high_score
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyhop (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    headless_run::run();
}
