//! Axis-aligned rectangle geometry
//!
//! Entities are integer pixel-space rectangles. Besides the plain AABB test,
//! collision wants to know on which side of an observer another rectangle
//! sits, which `relative_location` answers with four inclusive predicates.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in arena pixels (origin top-left, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Right edge (x + width)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (y + height)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> IVec2 {
        self.pos() + self.size() / 2
    }

    /// Same size, moved to `pos`
    pub fn at(&self, pos: IVec2) -> Self {
        Self::new(pos.x, pos.y, self.width, self.height)
    }

    pub fn translated(&self, delta: IVec2) -> Self {
        self.at(self.pos() + delta)
    }

    /// Strict interior hit test (pointer grab)
    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Standard AABB intersection (touching edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Where a rectangle sits relative to an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Shares a column band and starts at or above the observer
    Upper,
    /// Shares a column band and starts at or below the observer
    Lower,
    /// Shares a row band and the observer's right edge reaches past it
    LeftOf,
    /// Shares a row band and its right edge reaches past the observer's
    RightOf,
    /// Two or more of the above hold (corner contact or overlap)
    Multi,
    None,
}

/// Classify `other` relative to `observer`'s bounding box
pub fn relative_location(observer: &Rect, other: &Rect) -> Location {
    let rows_touch = observer.bottom() >= other.y && observer.y <= other.bottom();
    let columns_touch = observer.right() >= other.x && observer.x <= other.right();

    let candidates = [
        (rows_touch && observer.right() >= other.right(), Location::LeftOf),
        (rows_touch && observer.right() <= other.right(), Location::RightOf),
        (columns_touch && other.y <= observer.y, Location::Upper),
        (columns_touch && other.y >= observer.y, Location::Lower),
    ];

    let mut matched = candidates.iter().filter(|(hit, _)| *hit).map(|(_, loc)| *loc);
    match (matched.next(), matched.next()) {
        (None, _) => Location::None,
        (Some(loc), None) => loc,
        (Some(_), Some(_)) => Location::Multi,
    }
}
