//! Axis-aligned rectangles on the integer arena
//!
//! Every entity is a box centred on its position. Edges follow the
//! half-open convention: `right = left + width`, `bottom = top + height`.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Box of the given size centred on `center` (odd sizes lean left/up)
    pub fn from_center(center: IVec2, size: IVec2) -> Self {
        Self::new(
            center.x - size.x / 2,
            center.y - size.y / 2,
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Strict overlap test; touching edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// True once the box no longer shares any area with the arena
    pub fn is_outside_arena(&self) -> bool {
        self.right() < 0 || self.left > ARENA_WIDTH || self.bottom() < 0 || self.top > ARENA_HEIGHT
    }
}

/// Centre that places a box's left edge at `left`
#[inline]
pub fn center_for_left(left: i32, width: i32) -> i32 {
    left + width / 2
}

/// Centre that places a box's right edge at `right`
#[inline]
pub fn center_for_right(right: i32, width: i32) -> i32 {
    right - width + width / 2
}

/// Centre that places a box's top edge at `top`
#[inline]
pub fn center_for_top(top: i32, height: i32) -> i32 {
    top + height / 2
}
