//! Autonomous platforms
//!
//! A platform walks in its current direction toward a wander bound. Reaching
//! the bound resamples it and turns the platform onto a different direction.
//! Each platform owns a ticker; the stop broadcast halts it for good.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Body, Collidable, EntityId, Stopped, Vector};
use super::rect::Rect;
use crate::consts::*;

/// Wander tuning shared by every platform in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wander {
    /// Pixels per step
    pub stride: i32,
    /// High bounds are drawn from [0, arena extent - margin)
    pub margin: i32,
    /// Low bounds are drawn from [0, low_span)
    pub low_span: i32,
}

impl Default for Wander {
    fn default() -> Self {
        Self {
            stride: PLATFORM_STRIDE,
            margin: WANDER_MARGIN,
            low_span: LOW_BOUND_SPAN,
        }
    }
}

/// Fixed-period tick source with an initial delay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    pub period_ms: u32,
    /// Session time at which the next step is due
    pub next_fire_ms: u64,
    pub running: bool,
}

impl Ticker {
    pub fn new(period_ms: u32, initial_delay_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_fire_ms: u64::from(initial_delay_ms),
            running: true,
        }
    }

    /// True when a step is due at `now_ms`. Fires at most once per call.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.running || now_ms < self.next_fire_ms {
            return false;
        }
        self.next_fire_ms += u64::from(self.period_ms);
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// Result of one platform step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformStep {
    /// Ticker not due, or nothing to do
    Idle,
    /// Strode one step (possibly wrapping)
    Moved { wrapped: bool },
    /// Reached the bound and picked a new direction
    Turned { from: Vector, to: Vector },
}

/// Map an initial-direction draw from [0, 8) onto a direction.
///
/// Only 1 through 4 are mapped; every other draw falls back to `Up`.
pub fn initial_vector(draw: u32) -> Vector {
    match draw {
        1 => Vector::Up,
        2 => Vector::Down,
        3 => Vector::Right,
        4 => Vector::Left,
        _ => Vector::Up,
    }
}

/// Pick uniformly among the directions other than `current`
pub fn resample_vector<R: Rng>(current: Vector, rng: &mut R) -> Vector {
    let others = current.others();
    others[rng.random_range(0..others.len())]
}

/// A wandering platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub body: Body,
    pub bound_low: i32,
    pub bound_high: i32,
    pub ticker: Ticker,
}

impl Platform {
    pub fn new(
        id: EntityId,
        rect: Rect,
        vector: Vector,
        arena: &Arena,
        wander: &Wander,
        ticker: Ticker,
    ) -> Self {
        Self {
            body: Body::new(id, rect, vector),
            bound_low: 0,
            bound_high: arena.width - wander.margin,
            ticker,
        }
    }

    /// Advance one tick if the ticker is due
    pub fn tick<R: Rng>(
        &mut self,
        now_ms: u64,
        arena: &Arena,
        wander: &Wander,
        rng: &mut R,
    ) -> PlatformStep {
        if !self.ticker.poll(now_ms) {
            return PlatformStep::Idle;
        }
        self.step(arena, wander, rng)
    }

    /// One move of the wander state machine, regardless of the ticker
    pub fn step<R: Rng>(
        &mut self,
        arena: &Arena,
        wander: &Wander,
        rng: &mut R,
    ) -> PlatformStep {
        let rect = self.body.rect;
        let stride = wander.stride;

        let advance = match self.body.vector {
            Vector::Right => rect.right() < self.bound_high,
            Vector::Left => rect.x > self.bound_low,
            Vector::Up => rect.y > self.bound_low,
            Vector::Down => rect.bottom() < self.bound_high,
            Vector::None => return PlatformStep::Idle,
        };

        if advance {
            let next = rect.pos() + self.body.vector.step() * stride;
            self.body.update_coord(next.x, next.y);
            let wrapped = self.body.wrap_heading(arena, self.body.vector);
            return PlatformStep::Moved { wrapped };
        }

        match self.body.vector {
            Vector::Right => {
                self.bound_high = rng.random_range(0..(arena.width - wander.margin).max(1));
            }
            Vector::Down => {
                self.bound_high = rng.random_range(0..(arena.height - wander.margin).max(1));
            }
            _ => self.bound_low = rng.random_range(0..wander.low_span.max(1)),
        }

        let from = self.body.vector;
        let to = resample_vector(from, rng);
        self.body.vector = to;
        PlatformStep::Turned { from, to }
    }
}

impl Collidable for Platform {
    fn id(&self) -> EntityId {
        self.body.id
    }

    fn rect(&self) -> Rect {
        self.body.rect
    }

    fn vector(&self) -> Vector {
        self.body.vector
    }

    fn is_active(&self) -> bool {
        self.body.active
    }

    fn set_active(&mut self, active: bool) {
        self.body.active = active;
    }

    fn on_stopped(&mut self, _signal: Stopped) {
        self.set_active(false);
        self.ticker.stop();
    }
}
