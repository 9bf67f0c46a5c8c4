//! Browser platform
//!
//! DOM elements are the visual handles: geometry comes from
//! `getBoundingClientRect`, motion is a CSS `translate`, and the obstacle's
//! solid bands are its top/bottom border widths.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, Window};

use crate::highscores::LocalStorageHighScoreStore;
use crate::settings::Settings;
use crate::sim::{BoundingBox, Directive, EntityHandles, Game, GameEvent, Hud, Renderer};

/// Element ids expected in the host page
pub mod ids {
    pub const PLAYFIELD: &str = "playfield";
    pub const ACTOR: &str = "actor";
    pub const OBSTACLE: &str = "obstacle";
    pub const SCORE: &str = "score";
    pub const FINAL_SCORE: &str = "final-score";
    pub const HIGH_SCORE: &str = "high-score";
    pub const END_PANEL: &str = "end-panel";
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))
}

fn html_element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    element(document, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not an HTML element", id)))
}

/// DOM-backed renderer and HUD
pub struct DomSurface {
    score: Element,
    final_score: Element,
    high_score: Element,
    end_panel: Element,
}

impl DomSurface {
    /// Look up every element the game needs
    pub fn from_document(document: &Document) -> Result<(Self, EntityHandles<HtmlElement>), JsValue> {
        let handles = EntityHandles {
            playfield: html_element(document, ids::PLAYFIELD)?,
            actor: html_element(document, ids::ACTOR)?,
            obstacle: html_element(document, ids::OBSTACLE)?,
        };
        let surface = Self {
            score: element(document, ids::SCORE)?,
            final_score: element(document, ids::FINAL_SCORE)?,
            high_score: element(document, ids::HIGH_SCORE)?,
            end_panel: element(document, ids::END_PANEL)?,
        };
        Ok((surface, handles))
    }
}

impl Renderer for DomSurface {
    type Handle = HtmlElement;

    fn bounding_box(&self, handle: &HtmlElement) -> BoundingBox {
        let rect = handle.get_bounding_client_rect();
        BoundingBox::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }

    fn set_transform(&mut self, handle: &HtmlElement, offset: Vec2) {
        let transform = format!("translate({}px, {}px)", offset.x, offset.y);
        if let Err(err) = handle.style().set_property("transform", &transform) {
            log::warn!("Failed to set transform: {:?}", err);
        }
    }

    fn set_band_widths(&mut self, handle: &HtmlElement, top_band: f32, bottom_band: f32) {
        let style = handle.style();
        let widths = [("border-top-width", top_band), ("border-bottom-width", bottom_band)];
        for (property, width) in widths {
            if let Err(err) = style.set_property(property, &format!("{}px", width)) {
                log::warn!("Failed to set {}: {:?}", property, err);
            }
        }
    }
}

impl Hud for DomSurface {
    fn show_score(&mut self, score: u64) {
        self.score.set_text_content(Some(&score.to_string()));
    }

    fn show_final_score(&mut self, score: u64, high_score: u64) {
        self.final_score.set_text_content(Some(&score.to_string()));
        self.high_score
            .set_text_content(Some(&high_score.to_string()));
    }

    fn set_end_panel_visible(&mut self, visible: bool) {
        let _ = self
            .end_panel
            .class_list()
            .toggle_with_force("hidden", !visible);
    }
}

type WebGame = Game<DomSurface, LocalStorageHighScoreStore>;

/// Game plus the one outstanding frame callback, if any
struct App {
    game: WebGame,
    pending_frame: Option<i32>,
}

/// Build the game from the page and hook up input
pub fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

    let (surface, handles) = DomSurface::from_document(&document)?;
    let game = Game::new(surface, LocalStorageHighScoreStore, handles, settings, seed);
    let app = Rc::new(RefCell::new(App {
        game,
        pending_frame: None,
    }));

    listen_keyboard(&window, app.clone())?;
    listen_resize(&window, app)?;

    log::info!("Skyhop ready - press a jump key to start");
    Ok(())
}

/// Deliver an event and carry out whatever the game asks for
fn dispatch(app: &Rc<RefCell<App>>, event: GameEvent) {
    let directive = app.borrow_mut().game.dispatch(event);
    match directive {
        Some(Directive::RequestFrame { session }) => request_frame(app, session),
        Some(Directive::ArmRestartTimer { session, delay_ms }) => {
            cancel_pending_frame(app);
            arm_restart_timer(app, session, delay_ms);
        }
        None => {}
    }
}

fn request_frame(app: &Rc<RefCell<App>>, session: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback_app = app.clone();
    let closure = Closure::once(move |timestamp_ms: f64| {
        callback_app.borrow_mut().pending_frame = None;
        dispatch(
            &callback_app,
            GameEvent::Frame {
                session,
                timestamp_ms,
            },
        );
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(handle) => app.borrow_mut().pending_frame = Some(handle),
        Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
    }
    closure.forget();
}

fn cancel_pending_frame(app: &Rc<RefCell<App>>) {
    let Some(handle) = app.borrow_mut().pending_frame.take() else {
        return;
    };
    if let Some(window) = web_sys::window() {
        let _ = window.cancel_animation_frame(handle);
    }
}

/// One-shot debounce; fires once, the game ignores it if the session moved on
fn arm_restart_timer(app: &Rc<RefCell<App>>, session: u32, delay_ms: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let app = app.clone();
    let closure = Closure::once(move || {
        dispatch(&app, GameEvent::RestartDelayElapsed { session });
    });
    let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        timeout,
    ) {
        log::error!("setTimeout failed: {:?}", err);
    }
    closure.forget();
}

fn listen_keyboard(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
        let is_jump = app.borrow().game.settings().is_jump_key(&event.key());
        if !is_jump {
            return;
        }
        // Keep space/arrow keys from scrolling the page
        event.prevent_default();
        if !event.repeat() {
            dispatch(&app, GameEvent::JumpPressed);
        }
    });
    window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn listen_resize(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        dispatch(&app, GameEvent::Resized);
    });
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
