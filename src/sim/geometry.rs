//! Axis-aligned bounding boxes for tracked visual entities
//!
//! Boxes are in screen space: `top` grows downward, `left` grows rightward.

use std::fmt::Debug;

use glam::Vec2;

/// Axis-aligned bounding box of a rendered entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub width: f32,
    pub height: f32,
}

/// Bounds of the play area; the source of every derived constant
pub type PlayfieldBounds = BoundingBox;

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            bottom: top + height,
            left,
            right: left + width,
            width,
            height,
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Same box moved so its top-left corner sits at `min`
    pub fn moved_to(&self, min: Vec2) -> Self {
        Self::from_min_size(min, self.size())
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        self.moved_to(self.min() + offset)
    }

    /// True unless one box lies strictly to the left or right of the other
    pub fn overlaps_horizontally(&self, other: &BoundingBox) -> bool {
        !(self.right < other.left || self.left > other.right)
    }
}

/// Rendering collaborator: reports geometry and applies transforms.
///
/// The core never draws; it only reads boxes back and pushes offsets.
pub trait Renderer {
    type Handle: Clone + Debug;

    /// Current rendered geometry of `handle`, transform included
    fn bounding_box(&self, handle: &Self::Handle) -> BoundingBox;

    /// Translate `handle` by `offset` from its laid-out position
    fn set_transform(&mut self, handle: &Self::Handle, offset: Vec2);

    /// Render the solid bands above and below an obstacle's gap
    fn set_band_widths(&mut self, handle: &Self::Handle, top_band: f32, bottom_band: f32);
}

/// A visual handle together with its cached bounding box
#[derive(Debug, Clone)]
pub struct TrackedEntity<H> {
    pub handle: H,
    pub bbox: BoundingBox,
    /// Transform currently applied relative to the laid-out position
    pub offset: Vec2,
}

/// Capture an entity's current bounding box
pub fn track_entity<R: Renderer>(renderer: &R, handle: R::Handle) -> TrackedEntity<R::Handle> {
    let bbox = renderer.bounding_box(&handle);
    TrackedEntity {
        handle,
        bbox,
        offset: Vec2::ZERO,
    }
}

/// Re-read the entity's box from the renderer.
///
/// Callers invalidate; nothing here detects staleness.
pub fn refresh_bounding_box<R: Renderer>(renderer: &R, entity: &mut TrackedEntity<R::Handle>) {
    entity.bbox = renderer.bounding_box(&entity.handle);
}

impl<H: Clone + Debug> TrackedEntity<H> {
    /// Analytic reposition: move the top-left corner to `min` and push the
    /// matching transform. No read-back is needed.
    pub fn move_to<R: Renderer<Handle = H>>(&mut self, renderer: &mut R, min: Vec2) {
        let delta = min - self.bbox.min();
        self.offset += delta;
        self.bbox = self.bbox.moved_to(min);
        renderer.set_transform(&self.handle, self.offset);
    }

    /// Drop any transform and re-read the laid-out geometry
    pub fn reset_transform<R: Renderer<Handle = H>>(&mut self, renderer: &mut R) {
        self.offset = Vec2::ZERO;
        renderer.set_transform(&self.handle, self.offset);
        refresh_bounding_box(renderer, self);
    }
}
