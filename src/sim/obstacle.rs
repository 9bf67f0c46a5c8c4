//! Scrolling obstacle pair with a randomized gap

use std::fmt::Debug;

use glam::Vec2;
use rand::Rng;

use super::geometry::{PlayfieldBounds, Renderer, TrackedEntity};

/// Vertical opening in the obstacle, relative to the playfield top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub top: f32,
    pub bottom: f32,
    pub height: f32,
}

impl Gap {
    /// Place a gap of `height` using a uniform sample `unit` in [0, 1).
    ///
    /// A buffer of half the gap height is kept free, split between the
    /// top and bottom of the playfield.
    pub fn draw(playfield_height: f32, height: f32, unit: f32) -> Self {
        let height = height.clamp(0.0, playfield_height.max(0.0));
        let buffer = height / 2.0;
        let span = (playfield_height - height - buffer).max(0.0);
        let top = unit.clamp(0.0, 1.0) * span + buffer / 2.0;
        Self::at(top, height, playfield_height)
    }

    /// Gap of `height` starting at `top`, clamped inside the playfield
    pub fn at(top: f32, height: f32, playfield_height: f32) -> Self {
        let max_top = (playfield_height - height).max(0.0);
        let top = top.clamp(0.0, max_top);
        Self {
            top,
            bottom: top + height,
            height,
        }
    }

    /// Solid band thicknesses above and below the gap
    pub fn band_widths(&self, playfield_height: f32) -> (f32, f32) {
        (self.top, (playfield_height - self.bottom).max(0.0))
    }
}

/// Result of one frame of obstacle motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Moved left by the frame's displacement
    Advanced,
    /// Left the screen and re-entered from the right with a new gap.
    /// The actor's per-obstacle scoring flag must be cleared.
    Recycled,
}

/// The scrolling obstacle
#[derive(Debug, Clone)]
pub struct ObstacleState<H> {
    pub entity: TrackedEntity<H>,
    /// Leftward speed (pixels/s)
    pub speed: f32,
    pub gap: Gap,
}

impl<H: Clone + Debug> ObstacleState<H> {
    pub fn new(entity: TrackedEntity<H>, speed: f32, gap: Gap) -> Self {
        Self { entity, speed, gap }
    }

    /// Scroll left by `speed * dt`, recycling once the right edge would
    /// reach the playfield's left edge.
    pub fn advance<R, G>(
        &mut self,
        renderer: &mut R,
        playfield: &PlayfieldBounds,
        rng: &mut G,
        dt: f32,
    ) -> Motion
    where
        R: Renderer<Handle = H>,
        G: Rng,
    {
        let displacement = self.speed * dt.max(0.0);
        let bbox = self.entity.bbox;

        if bbox.right - displacement <= playfield.left {
            self.entity
                .move_to(renderer, Vec2::new(playfield.right, bbox.top));
            self.redraw_gap(renderer, playfield.height, rng);
            log::debug!(
                "Obstacle recycled, gap {:.1}..{:.1}",
                self.gap.top,
                self.gap.bottom
            );
            Motion::Recycled
        } else {
            self.entity
                .move_to(renderer, Vec2::new(bbox.left - displacement, bbox.top));
            Motion::Advanced
        }
    }

    /// Draw a fresh gap of the current height and re-render the bands
    pub fn redraw_gap<R, G>(&mut self, renderer: &mut R, playfield_height: f32, rng: &mut G)
    where
        R: Renderer<Handle = H>,
        G: Rng,
    {
        self.gap = Gap::draw(playfield_height, self.gap.height, rng.random::<f32>());
        self.render_bands(renderer, playfield_height);
    }

    /// Apply a new gap height, keeping the gap top where it is if it still fits
    pub fn resize_gap<R: Renderer<Handle = H>>(
        &mut self,
        renderer: &mut R,
        gap_height: f32,
        playfield_height: f32,
    ) {
        let height = gap_height.clamp(0.0, playfield_height.max(0.0));
        self.gap = Gap::at(self.gap.top, height, playfield_height);
        self.render_bands(renderer, playfield_height);
    }

    pub fn render_bands<R: Renderer<Handle = H>>(&self, renderer: &mut R, playfield_height: f32) {
        let (top_band, bottom_band) = self.gap.band_widths(playfield_height);
        renderer.set_band_widths(&self.entity.handle, top_band, bottom_band);
    }

    /// Back to the laid-out position with a fresh gap
    pub fn reset<R, G>(&mut self, renderer: &mut R, playfield_height: f32, rng: &mut G)
    where
        R: Renderer<Handle = H>,
        G: Rng,
    {
        self.entity.reset_transform(renderer);
        self.redraw_gap(renderer, playfield_height, rng);
    }
}
