//! Session state: the live entity registry, score, clock and event log
//!
//! Everything a run needs is owned by one `Session`. The registry mirrors the
//! live entities of that session exactly; `end` clears it before any new
//! session can register anything.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionReport, CollisionRule};
use super::entity::{Arena, Collidable, EntityId, Stopped, Vector};
use super::platform::{Platform, Ticker, Wander, initial_vector};
use super::player::{Player, PlayerMove};
use super::rect::Rect;
use crate::error::SessionError;
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entities move and score accrues
    Playing,
    /// A collision froze everything
    GameOver,
    /// `end` ran; the registry is empty
    Ended,
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlatformTurned {
        id: EntityId,
        from: Vector,
        to: Vector,
    },
    Wrapped {
        id: EntityId,
    },
    Collision {
        platform: EntityId,
        hits: u32,
    },
    GameOver {
        score: u64,
    },
}

/// Placement of one platform at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Starting direction; drawn at random when absent
    #[serde(default)]
    pub vector: Option<Vector>,
}

impl PlatformSpec {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            vector: None,
        }
    }

    pub const fn heading(mut self, vector: Vector) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Final numbers handed back by `Session::end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub display_score: u64,
    pub ticks: u64,
    pub time_ms: u64,
}

/// The live entities eligible for collision checks
#[derive(Debug, Clone, Default)]
pub struct Registry {
    player: Option<Player>,
    platforms: Vec<Platform>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.player.as_ref().is_some_and(|p| p.id() == id)
            || self.platforms.iter().any(|p| p.id() == id)
    }

    pub(crate) fn validate(&self, id: EntityId, rect: Rect) -> Result<(), SessionError> {
        if rect.width <= 0 || rect.height <= 0 {
            return Err(SessionError::EmptyRect { rect });
        }
        if self.contains(id) {
            return Err(SessionError::DuplicateEntity { id });
        }
        Ok(())
    }

    pub fn register_player(&mut self, player: Player) -> Result<EntityId, SessionError> {
        if let Some(existing) = &self.player {
            return Err(SessionError::DuplicatePlayer {
                existing: existing.id(),
            });
        }
        self.validate(player.id(), player.rect())?;
        let id = player.id();
        self.player = Some(player);
        Ok(id)
    }

    pub fn register_platform(&mut self, platform: Platform) -> Result<EntityId, SessionError> {
        self.validate(platform.id(), platform.rect())?;
        let id = platform.id();
        self.platforms.push(platform);
        Ok(id)
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Platforms in registration order
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn platforms_mut(&mut self) -> &mut [Platform] {
        &mut self.platforms
    }

    pub fn len(&self) -> usize {
        usize::from(self.player.is_some()) + self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every registered entity, player first
    pub fn listeners(&self) -> impl Iterator<Item = &dyn Collidable> {
        self.player
            .iter()
            .map(|p| p as &dyn Collidable)
            .chain(self.platforms.iter().map(|p| p as &dyn Collidable))
    }

    pub fn listeners_mut(&mut self) -> impl Iterator<Item = &mut dyn Collidable> {
        self.player
            .iter_mut()
            .map(|p| p as &mut dyn Collidable)
            .chain(self.platforms.iter_mut().map(|p| p as &mut dyn Collidable))
    }

    /// Deliver the stop signal to every entity. Returns how many heard it.
    pub fn broadcast(&mut self, signal: Stopped) -> usize {
        let mut delivered = 0;
        for listener in self.listeners_mut() {
            listener.on_stopped(signal);
            delivered += 1;
        }
        delivered
    }

    pub fn clear(&mut self) {
        self.player = None;
        self.platforms.clear();
    }
}

/// One game run
#[derive(Debug, Clone)]
pub struct Session {
    pub arena: Arena,
    pub wander: Wander,
    pub rule: CollisionRule,
    pub phase: GamePhase,
    /// One point per clear player/platform pair per tick
    pub score: u64,
    /// Session clock
    pub time_ms: u64,
    pub time_ticks: u64,
    /// Outcome of the most recent collision pass
    pub last_report: Option<CollisionReport>,
    pub(crate) registry: Registry,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    tick_ms: u32,
    start_delay_ms: u32,
    score_divisor: u64,
    next_id: u32,
}

impl Session {
    /// Start a session: register the player, then every platform in order
    pub fn start(settings: &Settings) -> Result<Self, SessionError> {
        let arena = settings.arena;
        if arena.span_x() <= 0 || arena.span_y() <= 0 || arena.floor() <= 0 {
            return Err(SessionError::ArenaTooSmall {
                width: arena.width,
                height: arena.height,
            });
        }

        let mut session = Self {
            arena,
            wander: settings.wander,
            rule: settings.collision_rule,
            phase: GamePhase::Playing,
            score: 0,
            time_ms: 0,
            time_ticks: 0,
            last_report: None,
            registry: Registry::new(),
            rng: Pcg32::seed_from_u64(settings.seed),
            events: Vec::new(),
            tick_ms: settings.tick_ms.max(1),
            start_delay_ms: settings.platform_start_delay_ms,
            score_divisor: settings.score_divisor.max(1),
            next_id: 1,
        };

        let id = session.next_entity_id();
        session
            .registry
            .register_player(Player::new(id, settings.player))?;

        for spec in &settings.platforms {
            session.add_platform(spec)?;
        }

        log::info!(
            "Session started: arena {}x{}, {} platforms, seed {}",
            arena.width,
            arena.height,
            session.registry.platforms().len(),
            settings.seed
        );
        Ok(session)
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register one more platform
    pub fn add_platform(&mut self, spec: &PlatformSpec) -> Result<EntityId, SessionError> {
        if self.phase == GamePhase::Ended {
            return Err(SessionError::SessionEnded);
        }

        // Rejected specs must not consume a draw from the session RNG
        let id = EntityId(self.next_id);
        if let Err(err) = self.registry.validate(id, spec.rect()) {
            log::warn!("Rejected platform registration: {err}");
            return Err(err);
        }

        let vector = match spec.vector {
            Some(vector) => vector,
            None => initial_vector(self.rng.random_range(0..8)),
        };
        let platform = Platform::new(
            id,
            spec.rect(),
            vector,
            &self.arena,
            &self.wander,
            Ticker::new(self.tick_ms, self.start_delay_ms),
        );

        let id = self.registry.register_platform(platform)?;
        self.next_id += 1;
        Ok(id)
    }

    /// Tick period the session was configured with
    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn player(&self) -> Option<&Player> {
        self.registry.player()
    }

    pub fn platforms(&self) -> &[Platform] {
        self.registry.platforms()
    }

    /// Pointer press: true when it lands inside the player
    pub fn grab_player(&self, point: IVec2) -> bool {
        self.player().is_some_and(|p| p.rect().contains_point(point))
    }

    /// Pointer drag: move the player to `target` (arena coordinates)
    pub fn set_player_desired_position(&mut self, target: IVec2) -> Option<PlayerMove> {
        let arena = self.arena;
        let player = self.registry.player_mut()?;
        let result = player.move_to(target, &arena);
        if result.wrapped {
            log::debug!("Player wrapped to {:?}", player.rect().pos());
            self.events.push(GameEvent::Wrapped { id: player.id() });
        }
        Some(result)
    }

    /// Relative player move
    pub fn advance_player(&mut self, delta: IVec2) -> Option<PlayerMove> {
        let target = self.player()?.rect().translated(delta).pos();
        self.set_player_desired_position(target)
    }

    /// Pointer released
    pub fn release_player(&mut self) {
        if let Some(player) = self.registry.player_mut() {
            player.release();
        }
    }

    /// False once a collision has been detected
    pub fn is_movement_possible(&self) -> bool {
        self.last_report
            .as_ref()
            .is_none_or(|report| report.movement_possible)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Ended)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Score as shown on the result screen
    pub fn display_score(&self) -> u64 {
        self.score / self.score_divisor
    }

    pub fn clean_score(&mut self) {
        self.score = 0;
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stop every tick source, clear the registry and reset the score
    pub fn end(&mut self) -> SessionSummary {
        for platform in self.registry.platforms_mut() {
            platform.ticker.stop();
        }
        self.registry.clear();

        let summary = SessionSummary {
            score: self.score,
            display_score: self.display_score(),
            ticks: self.time_ticks,
            time_ms: self.time_ms,
        };
        self.clean_score();
        self.phase = GamePhase::Ended;

        log::info!(
            "Session ended after {} ticks, score {}",
            summary.ticks,
            summary.display_score
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(platforms: Vec<PlatformSpec>) -> Settings {
        Settings {
            platforms,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_registers_player_then_platforms() {
        let session = Session::start(&Settings::default()).unwrap();
        let registry = session.registry();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.player().map(|p| p.id()), Some(EntityId(1)));
        let ids: Vec<_> = registry.platforms().iter().map(|p| p.id().0).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(session.is_movement_possible());
    }

    #[test]
    fn test_registry_rejects_duplicates_without_change() {
        let arena = Arena::default();
        let wander = Wander::default();
        let mut registry = Registry::new();
        registry
            .register_player(Player::new(EntityId(1), Rect::new(50, 50, 40, 40)))
            .unwrap();

        let second = Player::new(EntityId(9), Rect::new(0, 0, 40, 40));
        assert_eq!(
            registry.register_player(second),
            Err(SessionError::DuplicatePlayer {
                existing: EntityId(1)
            })
        );

        let clash = Platform::new(
            EntityId(1),
            Rect::new(300, 300, 50, 50),
            Vector::Up,
            &arena,
            &wander,
            Ticker::new(20, 0),
        );
        assert_eq!(
            registry.register_platform(clash),
            Err(SessionError::DuplicateEntity { id: EntityId(1) })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_platform_rejected() {
        let result = Session::start(&settings(vec![PlatformSpec::new(100, 100, 0, 20)]));
        assert!(matches!(result, Err(SessionError::EmptyRect { .. })));
    }

    #[test]
    fn test_tiny_arena_rejected() {
        let mut s = Settings::default();
        s.arena.width = 40;
        assert!(matches!(
            Session::start(&s),
            Err(SessionError::ArenaTooSmall { .. })
        ));
    }

    #[test]
    fn test_broadcast_freezes_everyone() {
        let mut session = Session::start(&Settings::default()).unwrap();
        let delivered = session.registry.broadcast(Stopped);
        assert_eq!(delivered, 5);
        assert!(session.registry().listeners().all(|e| !e.is_active()));
        assert!(session.platforms().iter().all(|p| !p.ticker.running));
    }

    #[test]
    fn test_clean_score_zeroes() {
        let mut session = Session::start(&settings(Vec::new())).unwrap();
        session.score = 1234;
        session.clean_score();
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_end_clears_registry_and_score() {
        let mut session = Session::start(&Settings::default()).unwrap();
        session.score = 52;

        let summary = session.end();
        assert_eq!(summary.score, 52);
        assert_eq!(summary.display_score, 10);
        assert!(session.registry().is_empty());
        assert_eq!(session.score(), 0);
        assert!(session.is_over());
        assert_eq!(
            session.add_platform(&PlatformSpec::new(10, 10, 20, 20)),
            Err(SessionError::SessionEnded)
        );
    }

    #[test]
    fn test_rejected_platform_leaves_rng_untouched() {
        let mut rejected = Session::start(&settings(Vec::new())).unwrap();
        let mut clean = Session::start(&settings(Vec::new())).unwrap();

        assert!(rejected.add_platform(&PlatformSpec::new(100, 100, 0, 0)).is_err());

        for (x, y) in [(150, 150), (300, 300), (500, 300)] {
            let spec = PlatformSpec::new(x, y, 30, 30);
            assert_eq!(rejected.add_platform(&spec), clean.add_platform(&spec));
        }
        let vectors = |s: &Session| s.platforms().iter().map(|p| p.vector()).collect::<Vec<_>>();
        assert_eq!(vectors(&rejected), vectors(&clean));
    }

    #[test]
    fn test_advance_player_relative() {
        let mut session = Session::start(&settings(Vec::new())).unwrap();
        let moved = session.advance_player(IVec2::new(10, 0)).unwrap();
        assert!(!moved.wrapped);
        let player = session.player().unwrap();
        assert_eq!(player.rect().pos(), IVec2::new(60, 50));
        assert_eq!(player.vector(), Vector::Right);

        session.advance_player(IVec2::new(0, 15));
        let player = session.player().unwrap();
        assert_eq!(player.rect().pos(), IVec2::new(60, 65));
        assert_eq!(player.vector(), Vector::Down);
    }

    #[test]
    fn test_grab_player() {
        let session = Session::start(&settings(Vec::new())).unwrap();
        // Player starts at (50, 50) with size 40
        assert!(session.grab_player(IVec2::new(70, 70)));
        assert!(!session.grab_player(IVec2::new(20, 70)));
    }
}
