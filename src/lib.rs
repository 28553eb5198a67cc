//! Square Dodge - A toroidal arena dodge game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, session state)
//! - `settings`: Data-driven arena and session configuration
//! - `error`: Registration/session errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SessionError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick (milliseconds)
    pub const TICK_MS: u32 = 20;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Delay before a platform takes its first stride
    pub const PLATFORM_START_DELAY_MS: u32 = 100;

    /// Arena dimensions
    pub const ARENA_WIDTH: i32 = 700;
    pub const ARENA_HEIGHT: i32 = 700;
    /// Horizontal wrap translates by ARENA_WIDTH - WRAP_MARGIN_X
    pub const WRAP_MARGIN_X: i32 = 50;
    /// Vertical wrap translates by ARENA_HEIGHT - WRAP_MARGIN_Y
    pub const WRAP_MARGIN_Y: i32 = 70;
    /// Rows at the bottom hidden behind the window chrome
    pub const BOTTOM_INSET: i32 = 20;

    /// Platform defaults
    pub const PLATFORM_STRIDE: i32 = 10;
    /// High wander bound is drawn from [0, ARENA_WIDTH - WANDER_MARGIN)
    pub const WANDER_MARGIN: i32 = 50;
    /// Low wander bound is drawn from [0, LOW_BOUND_SPAN)
    pub const LOW_BOUND_SPAN: i32 = 100;

    /// Player defaults
    pub const PLAYER_START_X: i32 = 50;
    pub const PLAYER_START_Y: i32 = 50;
    pub const PLAYER_SIZE: i32 = 40;

    /// Result screen shows score / SCORE_DIVISOR
    pub const SCORE_DIVISOR: u64 = 5;
}
