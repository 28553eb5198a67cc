//! Fixed timestep simulation tick
//!
//! Order within a tick: player input, every platform, then one collision pass
//! that sees the positions of this tick only.

use glam::IVec2;

use super::collision::{self, CollisionReport};
use super::entity::{Collidable, Stopped};
use super::platform::PlatformStep;
use super::state::{GameEvent, GamePhase, Session};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drag target for the player (arena coordinates)
    pub target: Option<IVec2>,
    /// Pointer released
    pub release: bool,
    /// Idle/demo mode - the player steers itself away from platforms
    pub idle_mode: bool,
}

/// Advance the session by one tick of `elapsed_ms`.
///
/// Returns the collision report, or `None` when the session is no longer
/// playing (ticks after game over change nothing).
pub fn tick(session: &mut Session, input: &TickInput, elapsed_ms: u32) -> Option<CollisionReport> {
    if session.phase != GamePhase::Playing {
        return None;
    }

    let mut input = input.clone();
    if input.idle_mode {
        input.target = pilot_target(session);
    }

    if let Some(target) = input.target {
        session.set_player_desired_position(target);
    }
    if input.release {
        session.release_player();
    }

    session.time_ms += u64::from(elapsed_ms);
    session.time_ticks += 1;

    let now = session.time_ms;
    for platform in session.registry.platforms_mut() {
        match platform.tick(now, &session.arena, &session.wander, &mut session.rng) {
            PlatformStep::Idle => {}
            PlatformStep::Moved { wrapped } => {
                if wrapped {
                    log::debug!("Platform {} wrapped to {:?}", platform.id(), platform.rect().pos());
                    session.events.push(GameEvent::Wrapped { id: platform.id() });
                }
            }
            PlatformStep::Turned { from, to } => {
                log::debug!("Platform {} turned {:?} -> {:?}", platform.id(), from, to);
                session.events.push(GameEvent::PlatformTurned {
                    id: platform.id(),
                    from,
                    to,
                });
            }
        }
    }

    let report = collision::check(&session.registry, session.rule);
    session.score += u64::from(report.clear_pairs);

    if !report.movement_possible {
        for &(platform, hits) in &report.hits {
            session.events.push(GameEvent::Collision { platform, hits });
        }
        let stopped = session.registry.broadcast(Stopped);
        session.phase = GamePhase::GameOver;
        session.events.push(GameEvent::GameOver {
            score: session.score,
        });
        log::info!(
            "Collision at tick {}: {} entities stopped, score {}",
            session.time_ticks,
            stopped,
            session.score
        );
    }

    session.last_report = Some(report.clone());
    Some(report)
}

/// Demo pilot: one stride directly away from the nearest platform centre
fn pilot_target(session: &Session) -> Option<IVec2> {
    let player = session.player()?;
    let center = player.rect().center();

    let nearest = session
        .platforms()
        .iter()
        .map(|p| p.rect().center())
        .min_by_key(|c| (*c - center).length_squared())?;

    let away = (center - nearest).signum();
    let away = if away == IVec2::ZERO { IVec2::X } else { away };
    Some(player.rect().pos() + away * session.wander.stride)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::settings::Settings;
    use crate::sim::entity::Vector;
    use crate::sim::state::PlatformSpec;

    fn settings(platforms: Vec<PlatformSpec>) -> Settings {
        Settings {
            platforms,
            platform_start_delay_ms: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_platforms_scores_nothing() {
        let mut session = Session::start(&settings(Vec::new())).unwrap();
        for _ in 0..50 {
            let report = tick(&mut session, &TickInput::default(), TICK_MS).unwrap();
            assert!(report.movement_possible);
        }
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_ticks, 50);
    }

    #[test]
    fn test_clear_platforms_score_each_tick() {
        // Two platforms shuttling up and down far from the player
        let platforms = vec![
            PlatformSpec::new(400, 300, 30, 30).heading(Vector::Up),
            PlatformSpec::new(550, 300, 30, 30).heading(Vector::Down),
        ];
        let mut session = Session::start(&settings(platforms)).unwrap();

        for i in 1..=20u64 {
            tick(&mut session, &TickInput::default(), TICK_MS).unwrap();
            assert_eq!(session.score(), 2 * i);
        }
        assert!(!session.is_over());
    }

    #[test]
    fn test_platform_reaching_idle_player_ends_game() {
        let mut s = settings(vec![PlatformSpec::new(150, 150, 50, 50).heading(Vector::Right)]);
        s.player = crate::sim::Rect::new(300, 150, 40, 40);
        let mut session = Session::start(&s).unwrap();

        // Leading edge goes 200 -> 290 without contact
        for _ in 0..9 {
            let report = tick(&mut session, &TickInput::default(), TICK_MS).unwrap();
            assert!(report.movement_possible);
        }
        assert_eq!(session.score(), 9);

        // Tenth stride puts the edge at x = 300
        let report = tick(&mut session, &TickInput::default(), TICK_MS).unwrap();
        assert!(!report.movement_possible);
        assert!(!session.is_movement_possible());
        assert_eq!(report.hits.len(), 1);
        assert_eq!(session.score(), 9);
        assert!(session.is_over());
        assert!(session.registry().listeners().all(|e| !e.is_active()));
        assert!(
            session
                .events()
                .contains(&GameEvent::GameOver { score: 9 })
        );
    }

    #[test]
    fn test_frozen_session_stays_frozen() {
        let mut s = settings(vec![PlatformSpec::new(150, 150, 50, 50).heading(Vector::Right)]);
        s.player = crate::sim::Rect::new(160, 160, 20, 20);
        let mut session = Session::start(&s).unwrap();

        let report = tick(&mut session, &TickInput::default(), TICK_MS).unwrap();
        assert!(!report.movement_possible);
        let frozen_at = session.platforms()[0].rect();
        let player_at = session.player().unwrap().rect();

        for _ in 0..10 {
            let input = TickInput {
                target: Some(IVec2::new(400, 400)),
                ..Default::default()
            };
            assert!(tick(&mut session, &input, TICK_MS).is_none());
        }
        // Direct moves are ignored as well
        session.set_player_desired_position(IVec2::new(500, 500));

        assert!(session.registry().listeners().all(|e| !e.is_active()));
        assert_eq!(session.platforms()[0].rect(), frozen_at);
        assert_eq!(session.player().unwrap().rect(), player_at);
    }

    #[test]
    fn test_player_dragged_into_platform() {
        let mut s = settings(vec![PlatformSpec::new(300, 300, 50, 50).heading(Vector::Up)]);
        s.wander.stride = 0;
        let mut session = Session::start(&s).unwrap();

        let input = TickInput {
            target: Some(IVec2::new(200, 310)),
            ..Default::default()
        };
        assert!(tick(&mut session, &input, TICK_MS).unwrap().movement_possible);

        let input = TickInput {
            target: Some(IVec2::new(270, 310)),
            ..Default::default()
        };
        let report = tick(&mut session, &input, TICK_MS).unwrap();
        assert!(!report.movement_possible);
        // Moving right over a touching platform: RIGHT and LEFT cases both hit
        assert_eq!(report.hits[0].1, 2);
    }

    #[test]
    fn test_start_delay_holds_platforms() {
        let mut s = settings(vec![PlatformSpec::new(400, 400, 30, 30).heading(Vector::Left)]);
        s.platform_start_delay_ms = 100;
        let mut session = Session::start(&s).unwrap();

        for _ in 0..4 {
            tick(&mut session, &TickInput::default(), TICK_MS);
        }
        assert_eq!(session.platforms()[0].rect().x, 400);

        tick(&mut session, &TickInput::default(), TICK_MS);
        assert_eq!(session.platforms()[0].rect().x, 390);
    }

    #[test]
    fn test_determinism() {
        let mut a = Session::start(&Settings::default()).unwrap();
        let mut b = Session::start(&Settings::default()).unwrap();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..200 {
            tick(&mut a, &input, TICK_MS);
            tick(&mut b, &input, TICK_MS);
        }

        assert_eq!(a.score(), b.score());
        assert_eq!(a.phase, b.phase);
        let ra: Vec<_> = a.platforms().iter().map(|p| p.rect()).collect();
        let rb: Vec<_> = b.platforms().iter().map(|p| p.rect()).collect();
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_end_then_tick_is_noop() {
        let mut session = Session::start(&Settings::default()).unwrap();
        tick(&mut session, &TickInput::default(), TICK_MS);
        session.end();
        assert!(tick(&mut session, &TickInput::default(), TICK_MS).is_none());
        assert_eq!(session.score(), 0);
    }
}
