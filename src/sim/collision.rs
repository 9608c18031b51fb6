//! Hit testing for taps, catches and digs
//!
//! Everything in the arcade is either a circle (entities) or an axis-aligned
//! rectangle (bucket, answer buttons), so two primitives cover it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in canvas-local pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from its center and full size
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Overlap test (touching edges count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// A tap at `point` hits a circle when it lies within `radius` of the center
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Bounding box of a circle, used for catch tests
#[inline]
pub fn circle_bounds(center: Vec2, radius: f32) -> Rect {
    Rect::from_center(center, Vec2::splat(radius * 2.0))
}
