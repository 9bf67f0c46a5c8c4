//! In-memory renderer and HUD
//!
//! Lays entities out like the stylesheet in `index.html` does, in
//! proportion to the playfield size, and applies transforms as offsets.

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::{BoundingBox, EntityHandles, Hud, Renderer};

/// Entities a headless surface knows how to lay out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Playfield,
    Actor,
    Obstacle,
}

/// Last values pushed to the display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    /// (final score, high score) of the last ended session
    pub final_score: Option<(u64, u64)>,
    pub end_panel_visible: bool,
}

/// Renderer + HUD without a display
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    width: f32,
    height: f32,
    offsets: HashMap<Sprite, Vec2>,
    bands: HashMap<Sprite, (f32, f32)>,
    pub hud: HudSnapshot,
}

impl HeadlessSurface {
    pub const ACTOR_SIZE: Vec2 = Vec2::new(40.0, 30.0);
    pub const OBSTACLE_WIDTH: f32 = 80.0;

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offsets: HashMap::new(),
            bands: HashMap::new(),
            hud: HudSnapshot::default(),
        }
    }

    pub fn handles() -> EntityHandles<Sprite> {
        EntityHandles {
            playfield: Sprite::Playfield,
            actor: Sprite::Actor,
            obstacle: Sprite::Obstacle,
        }
    }

    /// Change the viewport; laid-out positions follow, transforms stay
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Band widths last rendered for `sprite`
    pub fn band_widths(&self, sprite: &Sprite) -> Option<(f32, f32)> {
        self.bands.get(sprite).copied()
    }

    fn layout(&self, sprite: Sprite) -> BoundingBox {
        match sprite {
            Sprite::Playfield => BoundingBox::new(0.0, 0.0, self.width, self.height),
            // An eighth in from the left, vertically centred
            Sprite::Actor => BoundingBox::from_min_size(
                Vec2::new(
                    self.width / 8.0,
                    (self.height - Self::ACTOR_SIZE.y) / 2.0,
                ),
                Self::ACTOR_SIZE,
            ),
            // Parked just beyond the right edge, spanning the full height
            Sprite::Obstacle => BoundingBox::new(self.width, 0.0, Self::OBSTACLE_WIDTH, self.height),
        }
    }
}

impl Renderer for HeadlessSurface {
    type Handle = Sprite;

    fn bounding_box(&self, handle: &Sprite) -> BoundingBox {
        let offset = self.offsets.get(handle).copied().unwrap_or(Vec2::ZERO);
        self.layout(*handle).translated(offset)
    }

    fn set_transform(&mut self, handle: &Sprite, offset: Vec2) {
        self.offsets.insert(*handle, offset);
    }

    fn set_band_widths(&mut self, handle: &Sprite, top_band: f32, bottom_band: f32) {
        self.bands.insert(*handle, (top_band, bottom_band));
    }
}

impl Hud for HeadlessSurface {
    fn show_score(&mut self, score: u64) {
        self.hud.score = score;
    }

    fn show_final_score(&mut self, score: u64, high_score: u64) {
        self.hud.final_score = Some((score, high_score));
    }

    fn set_end_panel_visible(&mut self, visible: bool) {
        self.hud.end_panel_visible = visible;
    }
}
