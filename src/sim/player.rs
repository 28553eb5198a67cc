//! The pointer-driven player square

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Body, Collidable, EntityId, Vector};
use super::rect::Rect;

/// Outcome of a player move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerMove {
    pub moved: bool,
    pub wrapped: bool,
}

/// The player. No autonomous behavior; every move comes from input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
}

impl Player {
    pub fn new(id: EntityId, rect: Rect) -> Self {
        Self {
            body: Body::new(id, rect, Vector::None),
        }
    }

    /// Record the direction the pointer is pulling in
    pub fn set_desired_vector(&mut self, vector: Vector) {
        self.body.vector = vector;
    }

    /// Jump to `target`, deriving the vector from the displacement, then wrap.
    ///
    /// The vector only informs the collision test; movement itself is free
    /// in both axes.
    pub fn move_to(&mut self, target: IVec2, arena: &Arena) -> PlayerMove {
        if let Some(vector) = Vector::toward(self.body.rect.pos(), target) {
            self.set_desired_vector(vector);
        }

        let before = self.body.rect;
        self.body.update_coord(target.x, target.y);
        let wrapped = self.body.wrap(arena);

        PlayerMove {
            moved: self.body.rect != before,
            wrapped,
        }
    }

    /// Relative move by `delta`
    pub fn advance(&mut self, delta: IVec2, arena: &Arena) -> PlayerMove {
        let target = self.body.rect.translated(delta).pos();
        self.move_to(target, arena)
    }

    /// Pointer released: no longer attempting to move
    pub fn release(&mut self) {
        self.body.vector = Vector::None;
    }
}

impl Collidable for Player {
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
}
