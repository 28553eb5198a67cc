//! Player-versus-platform collision detection
//!
//! Collision is directional: a pair only counts when the mover is heading
//! toward the other rectangle (or the two already touch, which classifies as
//! `Location::Multi`). When the player is pointer-driven its vector decides;
//! when it is idle the platform's vector decides instead.

use serde::{Deserialize, Serialize};

use super::entity::{Collidable, EntityId, Vector};
use super::rect::{Location, Rect, relative_location};
use super::state::Registry;

/// How the player-vector branch walks the direction cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionRule {
    /// The matching case and every later case (UP, DOWN, RIGHT, LEFT order)
    /// are evaluated, so one pair can add several hits
    #[default]
    FallThrough,
    /// Only the matching case is evaluated, as in the platform branch
    Terminated,
}

/// Result of one collision pass over the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// False if any pair collided
    pub movement_possible: bool,
    /// Pairs that did not collide (one score point each)
    pub clear_pairs: u32,
    /// Colliding platforms with their hit count
    pub hits: Vec<(EntityId, u32)>,
}

/// Does `mover`, heading in `vector`, run into `other`?
fn direction_hit(mover: &Rect, other: &Rect, vector: Vector) -> bool {
    let location = relative_location(mover, other);
    let edge_reached = match vector {
        Vector::Up => mover.y <= other.bottom() && location == Location::Upper,
        Vector::Down => mover.bottom() >= other.y && location == Location::Lower,
        Vector::Right => mover.right() >= other.x && location == Location::RightOf,
        Vector::Left => mover.x <= other.right() && location == Location::LeftOf,
        Vector::None => return false,
    };
    edge_reached || location == Location::Multi
}

/// Hit count for one player/platform pair
pub fn pair_hits(player: &dyn Collidable, platform: &dyn Collidable, rule: CollisionRule) -> u32 {
    let player_rect = player.rect();
    let platform_rect = platform.rect();

    match player.vector() {
        Vector::None => u32::from(direction_hit(
            &platform_rect,
            &player_rect,
            platform.vector(),
        )),
        vector => {
            let Some(start) = vector.case_index() else {
                return 0;
            };
            let end = match rule {
                CollisionRule::FallThrough => Vector::DIRECTIONS.len(),
                CollisionRule::Terminated => start + 1,
            };
            Vector::DIRECTIONS[start..end]
                .iter()
                .filter(|dir| direction_hit(&player_rect, &platform_rect, **dir))
                .count() as u32
        }
    }
}

/// Test the player against every registered platform
pub fn check(registry: &Registry, rule: CollisionRule) -> CollisionReport {
    let mut report = CollisionReport {
        movement_possible: true,
        ..Default::default()
    };

    let Some(player) = registry.player() else {
        return report;
    };

    for platform in registry.platforms() {
        let hits = pair_hits(player, platform, rule);
        if hits >= 1 {
            report.movement_possible = false;
            report.hits.push((platform.id(), hits));
        } else {
            report.clear_pairs += 1;
        }
    }

    report
}
