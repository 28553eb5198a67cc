use std::fmt;

use crate::sim::{EntityId, Rect};

/// Rejected registration or session setup. No state changes on error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// An entity with this id is already registered
    DuplicateEntity { id: EntityId },
    /// The session already has its player
    DuplicatePlayer { existing: EntityId },
    /// Width or height is not positive
    EmptyRect { rect: Rect },
    /// Arena cannot contain a wrap translation
    ArenaTooSmall { width: i32, height: i32 },
    /// Operation needs a registry that `end` already cleared
    SessionEnded,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEntity { id } => write!(f, "entity {id} is already registered"),
            Self::DuplicatePlayer { existing } => {
                write!(f, "session already has a player ({existing})")
            }
            Self::EmptyRect { rect } => write!(
                f,
                "entity size must be positive: got {}x{} at ({}, {})",
                rect.width, rect.height, rect.x, rect.y
            ),
            Self::ArenaTooSmall { width, height } => {
                write!(f, "arena too small for wrap margins: {width}x{height}")
            }
            Self::SessionEnded => write!(f, "session has ended"),
        }
    }
}

impl std::error::Error for SessionError {}
