//! Collision detection between entity categories
//!
//! Every entity exposes its logical bounds through [`Bounded`]. The pairwise
//! checks in the entity update rules all go through [`Aabb::overlaps`], so
//! collision geometry never depends on whether an asset has loaded.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Horizontal overlap only
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

/// Anything with logical collision bounds
pub trait Bounded {
    fn bounds(&self) -> Aabb;

    fn overlaps<T: Bounded + ?Sized>(&self, other: &T) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// Result of a downward landing check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Surface y the body should rest on
    pub surface_y: f32,
}

/// Check whether a falling body crossed a surface's top edge this frame
///
/// `body` is the body's bounds after integration and `dy` the vertical
/// distance moved this frame. The body lands when its bottom edge was at or
/// above the surface last frame and is below it now, with horizontal overlap.
pub fn landing(body: &Aabb, dy: f32, surface: &Aabb) -> Option<Landing> {
    if dy <= 0.0 {
        return None;
    }
    let top = surface.top();
    let crossed = body.top() < top && body.bottom() > top && body.bottom() - dy <= top;
    if crossed && body.overlaps_x(surface) {
        Some(Landing { surface_y: top })
    } else {
        None
    }
}
