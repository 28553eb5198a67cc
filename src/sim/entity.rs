//! Shared entity state and the capability interface collision works against

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Intended movement direction for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Vector {
    Up,
    Down,
    Left,
    Right,
    /// Not attempting to move
    #[default]
    None,
}

impl Vector {
    pub const DIRECTIONS: [Vector; 4] = [Vector::Up, Vector::Down, Vector::Right, Vector::Left];

    /// Direction implied by moving from `from` to `to`.
    ///
    /// Vertical movement wins over horizontal; `None` when the target equals
    /// the current position (the caller keeps its previous vector).
    pub fn toward(from: IVec2, to: IVec2) -> Option<Vector> {
        let mut vector = None;
        if to.x > from.x {
            vector = Some(Vector::Right);
        }
        if to.x < from.x {
            vector = Some(Vector::Left);
        }
        if to.y < from.y {
            vector = Some(Vector::Up);
        }
        if to.y > from.y {
            vector = Some(Vector::Down);
        }
        vector
    }

    /// The three directions different from this one
    pub fn others(self) -> [Vector; 3] {
        let mut out = [Vector::Up; 3];
        let mut i = 0;
        for dir in Self::DIRECTIONS {
            if dir != self && i < out.len() {
                out[i] = dir;
                i += 1;
            }
        }
        out
    }

    /// Position in the collision case order (UP, DOWN, RIGHT, LEFT)
    pub fn case_index(self) -> Option<usize> {
        match self {
            Vector::Up => Some(0),
            Vector::Down => Some(1),
            Vector::Right => Some(2),
            Vector::Left => Some(3),
            Vector::None => None,
        }
    }

    /// Unit step in arena space (+y down)
    pub fn step(self) -> IVec2 {
        match self {
            Vector::Up => IVec2::new(0, -1),
            Vector::Down => IVec2::new(0, 1),
            Vector::Left => IVec2::new(-1, 0),
            Vector::Right => IVec2::new(1, 0),
            Vector::None => IVec2::ZERO,
        }
    }
}

/// Stable handle for a registered entity, allocated in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Zero-payload signal broadcast to every entity when a collision ends the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped;

/// What the collision engine needs from an entity
pub trait Collidable {
    fn id(&self) -> EntityId;
    fn rect(&self) -> Rect;
    fn vector(&self) -> Vector;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);

    /// Handle the stop broadcast; freezing is the minimum
    fn on_stopped(&mut self, _signal: Stopped) {
        self.set_active(false);
    }
}

/// State shared by every moving rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub rect: Rect,
    pub vector: Vector,
    /// False once frozen; there is no way back within a session
    pub active: bool,
}

impl Body {
    pub fn new(id: EntityId, rect: Rect, vector: Vector) -> Self {
        Self {
            id,
            rect,
            vector,
            active: true,
        }
    }

    /// Reposition, keeping the size. No-op while frozen.
    pub fn update_coord(&mut self, x: i32, y: i32) {
        if self.active {
            self.rect.x = x;
            self.rect.y = y;
        }
    }

    /// Apply arena wrap. Returns true when the body was translated.
    pub fn wrap(&mut self, arena: &Arena) -> bool {
        let target = arena.wrap(&self.rect);
        self.wrap_to(target)
    }

    /// Wrap only across the edge `heading` leads into
    pub fn wrap_heading(&mut self, arena: &Arena, heading: Vector) -> bool {
        let target = arena.wrap_heading(&self.rect, heading);
        self.wrap_to(target)
    }

    fn wrap_to(&mut self, target: Option<IVec2>) -> bool {
        match target {
            Some(pos) if self.active => {
                self.update_coord(pos.x, pos.y);
                true
            }
            _ => false,
        }
    }
}

/// Arena bounds and wrap rules (toroidal, never a bounce)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    /// Horizontal translation is `width - wrap_margin_x`
    pub wrap_margin_x: i32,
    /// Vertical translation is `height - wrap_margin_y`
    pub wrap_margin_y: i32,
    /// Rows at the bottom not considered playable
    pub bottom_inset: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            wrap_margin_x: WRAP_MARGIN_X,
            wrap_margin_y: WRAP_MARGIN_Y,
            bottom_inset: BOTTOM_INSET,
        }
    }
}

impl Arena {
    #[inline]
    pub fn span_x(&self) -> i32 {
        self.width - self.wrap_margin_x
    }

    #[inline]
    pub fn span_y(&self) -> i32 {
        self.height - self.wrap_margin_y
    }

    /// Bottom edge a mover may not reach
    #[inline]
    pub fn floor(&self) -> i32 {
        self.height - self.bottom_inset
    }

    /// Position after wrapping, if `rect` touches or crosses an edge.
    ///
    /// Edges are checked right, left, top, bottom and only the first match
    /// is applied, so a corner exit takes two moves to fully resolve.
    pub fn wrap(&self, rect: &Rect) -> Option<IVec2> {
        let pos = rect.pos();
        if rect.right() >= self.width {
            Some(pos - IVec2::new(self.span_x(), 0))
        } else if rect.x <= 0 {
            Some(pos + IVec2::new(self.span_x(), 0))
        } else if rect.y <= 0 {
            Some(pos + IVec2::new(0, self.span_y()))
        } else if rect.bottom() >= self.floor() {
            Some(pos - IVec2::new(0, self.span_y()))
        } else {
            None
        }
    }

    /// Like `wrap`, but only the edge `heading` moves toward is checked.
    ///
    /// A rect wider than the wrap margin still overhangs the far edge after
    /// wrapping, so the opposite edge must not be tested.
    pub fn wrap_heading(&self, rect: &Rect, heading: Vector) -> Option<IVec2> {
        let pos = rect.pos();
        match heading {
            Vector::Right if rect.right() >= self.width => {
                Some(pos - IVec2::new(self.span_x(), 0))
            }
            Vector::Left if rect.x <= 0 => Some(pos + IVec2::new(self.span_x(), 0)),
            Vector::Up if rect.y <= 0 => Some(pos + IVec2::new(0, self.span_y())),
            Vector::Down if rect.bottom() >= self.floor() => {
                Some(pos - IVec2::new(0, self.span_y()))
            }
            _ => None,
        }
    }
}
