//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod platform;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, CollisionRule, check, pair_hits};
pub use entity::{Arena, Body, Collidable, EntityId, Stopped, Vector};
pub use platform::{Platform, PlatformStep, Ticker, Wander, initial_vector, resample_vector};
pub use player::{Player, PlayerMove};
pub use rect::{Location, Rect, relative_location};
pub use state::{GameEvent, GamePhase, PlatformSpec, Registry, Session, SessionSummary};
pub use tick::{TickInput, tick};
