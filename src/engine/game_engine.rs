//! Match orchestration.
//!
//! `GameEngine` owns the arena, both players and the frame clock. Time only
//! moves through `step`, which advances one frame at a time:
//!
//! 1. both players accrue elixir at the current phase's rate
//! 2. the arena simulates every running entity
//! 3. the clock ticks and the match result is re-evaluated
//!
//! Once a result is reached it is latched: later `step` calls do nothing and
//! `apply` fails with `MatchOver`.

use std::sync::Arc;

use tracing::{debug, info};

use super::render::{EntityView, FrameView, Renderer};
use crate::arena::{Arena, ArenaEvent};
use crate::cards::{Card, CardRegistry};
use crate::core::{
    ActionRecord, DefaultScheduler, EngineConfig, EngineError, GameRng, GameScheduler, MatchPhase,
    MatchTiming, Placement, PlayerId, PlayerMap, Result, Scheduler,
};
use crate::economy::Player;
use crate::rules::{ActionMask, GameResult, RulesEngine};

/// A single two-player match.
///
/// ## Example
///
/// ```
/// use arena_sim::core::{EngineConfig, Placement, PlayerId};
/// use arena_sim::engine::GameEngine;
///
/// let deck = ["knight", "archer", "giant", "minions", "musketeer", "valkyrie", "cannon", "barbarian"];
/// let mut engine = GameEngine::new(&deck, &deck, EngineConfig::default(), 7).unwrap();
///
/// engine.apply(PlayerId::BLUE, None).unwrap();
/// engine.step(30);
///
/// assert_eq!(engine.frame(), 30);
/// assert!(!engine.is_terminal());
/// ```
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: EngineConfig,
    registry: Arc<CardRegistry>,
    /// Decks as supplied, before shuffling.
    decks: PlayerMap<Vec<Card>>,
    arena: Arena,
    players: PlayerMap<Player>,
    scheduler: Scheduler,
    rules: DefaultScheduler,
    rng: GameRng,
    history: im::Vector<ActionRecord>,
    phase: MatchPhase,
    result: Option<GameResult>,
}

impl GameEngine {
    /// Create a match with the built-in card catalogue.
    pub fn new<S: AsRef<str>>(
        deck1: &[S],
        deck2: &[S],
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(CardRegistry::standard(config.fps));
        Self::with_registry(registry, deck1, deck2, config, seed)
    }

    /// Create a match drawing cards from `registry`.
    pub fn with_registry<S: AsRef<str>>(
        registry: Arc<CardRegistry>,
        deck1: &[S],
        deck2: &[S],
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let decks = PlayerMap::from_pair(registry.resolve_deck(deck1)?, registry.resolve_deck(deck2)?);
        let arena = Arena::new(config.width, config.height, config.fps, &registry)?;
        let players = PlayerMap::from_pair(
            Player::new(PlayerId::BLUE, decks[PlayerId::BLUE].clone(), &config)?,
            Player::new(PlayerId::RED, decks[PlayerId::RED].clone(), &config)?,
        );

        let mut engine = Self {
            scheduler: Scheduler::new(config.fps),
            rules: DefaultScheduler::new(&config),
            config,
            registry,
            decks,
            arena,
            players,
            rng: GameRng::new(seed),
            history: im::Vector::new(),
            phase: MatchPhase::Normal,
            result: None,
        };
        engine.reset()?;
        Ok(engine)
    }

    /// Start the match over: fresh towers, reshuffled hands, frame 0.
    ///
    /// Each reset draws a new shuffle from the engine's RNG, so successive
    /// matches differ while staying reproducible from the seed.
    pub fn reset(&mut self) -> Result<()> {
        self.arena.reset()?;

        let mut rng = self.rng.fork();
        for side in PlayerId::both() {
            let mut deck = self.decks[side].clone();
            rng.shuffle(&mut deck);
            self.players[side].reset(deck, self.config.starting_elixir)?;
        }

        self.scheduler.reset();
        self.history = im::Vector::new();
        self.phase = MatchPhase::Normal;
        self.result = None;
        info!(seed = self.rng.seed(), "match reset");
        Ok(())
    }

    /// Apply one player's action. `None` passes.
    ///
    /// All checks happen before anything changes, and a failed spawn gives
    /// the elixir and card back, so a rejected action leaves no trace.
    pub fn apply(&mut self, player: PlayerId, action: Option<Placement>) -> Result<()> {
        if self.result.is_some() {
            return Err(EngineError::MatchOver);
        }
        let Some(placement) = action else {
            return Ok(());
        };
        let (x, y) = placement.cell();
        if !self.arena.layout().in_bounds(x, y) {
            return Err(EngineError::OutOfBounds {
                x,
                y,
                width: self.config.width,
                height: self.config.height,
            });
        }
        let card = self.players[player].can_play(placement.hand_index)?.clone();
        if !self.arena.is_legal_placement(player, x, y) {
            return Err(EngineError::IllegalPlacement { x, y });
        }

        let snapshot = self.players[player].clone();
        let played = self.players[player].play_card(placement.hand_index)?;
        debug_assert_eq!(played, card);
        if let Err(error) = self.arena.place(&card, player, x, y) {
            self.players[player] = snapshot;
            return Err(error);
        }

        let frame = self.scheduler.frame();
        self.history
            .push_back(ActionRecord::new(player, placement, frame));
        debug!(%player, card = %card, x, y, frame, "card played");
        Ok(())
    }

    /// Advance the match by `frames` frames.
    pub fn step(&mut self, frames: u64) {
        for _ in 0..frames {
            if self.result.is_some() {
                return;
            }
            self.step_frame();
        }
    }

    fn step_frame(&mut self) {
        let rate = self.rules.elixir_rate(&self.scheduler);
        for (_, player) in self.players.iter_mut() {
            player.step(rate, 1);
        }

        let events = self.arena.step(1, self.scheduler.frame());
        self.apply_events(&events);

        self.scheduler.step(1);

        let phase = self.rules.phase(&self.scheduler);
        if phase != self.phase {
            info!(from = %self.phase, to = %phase, frame = self.scheduler.frame(), "phase change");
            self.phase = phase;
        }

        self.result = self.evaluate();
        if let Some(result) = self.result {
            info!(%result, frame = self.scheduler.frame(), "match over");
        }
    }

    fn apply_events(&mut self, events: &[ArenaEvent]) {
        for event in events {
            match *event {
                ArenaEvent::TowerDestroyed { side, tower } => {
                    self.players[side].lose_tower();
                    debug!(%side, ?tower, "tower destroyed");
                }
                ArenaEvent::KingActivated { side } => self.players[side].activate_king(),
                ArenaEvent::EntityDestroyed { .. } => {}
            }
        }
        for side in PlayerId::both() {
            debug_assert_eq!(self.players[side].towers, self.arena.tower_count(side));
        }
    }

    /// The result the current state implies, if the match is decided.
    ///
    /// A side with no towers loses at once. From overtime on, any tower
    /// lead wins. At the final whistle, equal tower counts fall back to the
    /// healthier weakest tower and then to a draw.
    fn evaluate(&self) -> Option<GameResult> {
        let blue = self.arena.tower_count(PlayerId::BLUE);
        let red = self.arena.tower_count(PlayerId::RED);

        let decided = blue == 0
            || red == 0
            || self.rules.is_game_over(&self.scheduler)
            || (self.rules.is_overtime(&self.scheduler) && blue != red);
        if !decided {
            return None;
        }

        let (blue, red) = if blue == red {
            (
                self.arena.lowest_tower_health(PlayerId::BLUE),
                self.arena.lowest_tower_health(PlayerId::RED),
            )
        } else {
            (i32::from(blue), i32::from(red))
        };
        Some(match blue.cmp(&red) {
            std::cmp::Ordering::Greater => GameResult::Winner(PlayerId::BLUE),
            std::cmp::Ordering::Less => GameResult::Winner(PlayerId::RED),
            std::cmp::Ordering::Equal => GameResult::Draw,
        })
    }

    /// Where `player` may place which hand slot right now.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> ActionMask {
        let (w, h) = (self.config.width, self.config.height);
        let mut mask = ActionMask::new(w, h);
        if self.result.is_some() {
            return mask;
        }
        let slots = self.players[player].get_pseudo_legal_cards();
        if slots.is_empty() {
            return mask;
        }
        let cells = self.arena.placement_mask(player);
        for y in 0..h {
            for x in 0..w {
                if cells[(y * w + x) as usize] {
                    for &slot in &slots {
                        mask.set(x, y, slot, true);
                    }
                }
            }
        }
        mask
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }

    /// `None` while the match is running.
    #[must_use]
    pub fn terminal_value(&self) -> Option<GameResult> {
        self.result
    }

    /// Running entities in simulation order.
    #[must_use]
    pub fn entity_views(&self) -> Vec<EntityView> {
        self.arena.entities().running().map(EntityView::from).collect()
    }

    /// Snapshot of the current frame as seen by `player`.
    #[must_use]
    pub fn frame_view(&self, player: PlayerId) -> FrameView {
        FrameView {
            perspective: player,
            frame: self.scheduler.frame(),
            width: self.config.width,
            height: self.config.height,
            resolution: self.config.resolution,
            entities: self.entity_views(),
        }
    }

    /// Render the current frame for `player`.
    pub fn make_image<R: Renderer>(&self, player: PlayerId, renderer: &mut R) -> R::Output {
        renderer.render(&self.frame_view(player))
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<CardRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.scheduler.frame()
    }

    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Accepted placements since the last reset, oldest first.
    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl RulesEngine for GameEngine {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn apply(&mut self, player: PlayerId, action: Option<Placement>) -> Result<()> {
        GameEngine::apply(self, player, action)
    }

    fn step(&mut self, frames: u64) {
        GameEngine::step(self, frames);
    }

    fn legal_actions(&self, player: PlayerId) -> ActionMask {
        GameEngine::legal_actions(self, player)
    }

    fn terminal_value(&self) -> Option<GameResult> {
        self.result
    }
}

/// Builder for creating a `GameEngine`.
///
/// ```
/// use arena_sim::engine::GameEngineBuilder;
///
/// let deck = ["knight"; 8];
/// let engine = GameEngineBuilder::new()
///     .fps(10)
///     .starting_elixir(7.0)
///     .seed(3)
///     .build(&deck, &deck)
///     .unwrap();
///
/// assert_eq!(engine.config().fps, 10);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GameEngineBuilder {
    config: EngineConfig,
    seed: u64,
    registry: Option<Arc<CardRegistry>>,
}

impl GameEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config = self.config.with_size(width, height);
        self
    }

    pub fn resolution(mut self, resolution: (u32, u32)) -> Self {
        self.config = self.config.with_resolution(resolution);
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.config = self.config.with_fps(fps);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn starting_elixir(mut self, elixir: f64) -> Self {
        self.config = self.config.with_starting_elixir(elixir);
        self
    }

    pub fn elixir_cap(mut self, cap: Option<f64>) -> Self {
        self.config = self.config.with_elixir_cap(cap);
        self
    }

    pub fn timing(mut self, timing: MatchTiming) -> Self {
        self.config = self.config.with_timing(timing);
        self
    }

    /// Use a custom catalogue instead of `CardRegistry::standard`.
    pub fn registry(mut self, registry: Arc<CardRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine.
    pub fn build<S: AsRef<str>>(self, deck1: &[S], deck2: &[S]) -> Result<GameEngine> {
        match self.registry {
            Some(registry) => {
                GameEngine::with_registry(registry, deck1, deck2, self.config, self.seed)
            }
            None => GameEngine::new(deck1, deck2, self.config, self.seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OccupancyRenderer;

    const DECK: [&str; 8] = [
        "knight", "archer", "giant", "minions", "musketeer", "valkyrie", "cannon", "barbarian",
    ];

    fn engine() -> GameEngine {
        GameEngine::new(&DECK, &DECK, EngineConfig::default(), 42).unwrap()
    }

    fn knights() -> GameEngine {
        GameEngine::new(&["knight"; 8], &["knight"; 8], EngineConfig::default(), 1).unwrap()
    }

    #[test]
    fn test_new_engine() {
        let engine = engine();

        assert_eq!(engine.frame(), 0);
        assert_eq!(engine.phase(), MatchPhase::Normal);
        assert_eq!(engine.arena().entities().len(), 6);
        for side in PlayerId::both() {
            assert_eq!(engine.player(side).elixir(), 5.0);
            assert_eq!(engine.player(side).towers, 3);
        }
        assert!(!engine.is_terminal());
        assert_eq!(engine.terminal_value(), None);
    }

    #[test]
    fn test_rejects_bad_deck() {
        let err = GameEngine::new(&["knight"; 7], &DECK, EngineConfig::default(), 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDeck { .. }));

        let mut unknown = DECK;
        unknown[0] = "dragon";
        let err = GameEngine::new(&unknown, &DECK, EngineConfig::default(), 0).unwrap_err();
        assert_eq!(err, EngineError::UnknownCard("dragon".into()));
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = EngineConfig::default().with_fps(0);
        assert!(matches!(
            GameEngine::new(&DECK, &DECK, config, 0),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_pass_is_noop() {
        let mut engine = knights();
        engine.apply(PlayerId::BLUE, None).unwrap();
        assert!(engine.history().is_empty());
        assert_eq!(engine.player(PlayerId::BLUE).elixir(), 5.0);
    }

    #[test]
    fn test_apply_places_card() {
        let mut engine = knights();
        engine
            .apply(PlayerId::BLUE, Some(Placement::new(9, 20, 0)))
            .unwrap();

        assert_eq!(engine.player(PlayerId::BLUE).elixir(), 2.0);
        assert_eq!(engine.arena().entities().len(), 7);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.history()[0].player, PlayerId::BLUE);
    }

    #[test]
    fn test_apply_rejections_leave_state() {
        let mut engine = knights();
        let before = engine.player(PlayerId::BLUE).clone();

        assert!(matches!(
            engine.apply(PlayerId::BLUE, Some(Placement::new(18, 20, 0))),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert_eq!(
            engine.apply(PlayerId::BLUE, Some(Placement::new(9, 20, 4))),
            Err(EngineError::InvalidHandIndex(4))
        );
        assert_eq!(
            engine.apply(PlayerId::BLUE, Some(Placement::new(9, 10, 0))),
            Err(EngineError::IllegalPlacement { x: 9, y: 10 })
        );

        assert_eq!(engine.player(PlayerId::BLUE), &before);
        assert_eq!(engine.arena().entities().len(), 6);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_insufficient_elixir() {
        let mut engine = knights();
        engine
            .apply(PlayerId::RED, Some(Placement::new(9, 10, 0)))
            .unwrap();
        let err = engine
            .apply(PlayerId::RED, Some(Placement::new(9, 10, 0)))
            .unwrap_err();

        assert!(matches!(err, EngineError::InsufficientElixir { cost: 3, .. }));
        assert!(err.is_invalid_action());
        assert_eq!(engine.player(PlayerId::RED).elixir(), 2.0);
    }

    #[test]
    fn test_step_accrues_elixir() {
        let mut engine = knights();
        // 2.8 seconds of normal phase yields one elixir.
        engine.step(84);
        assert!((engine.player(PlayerId::BLUE).elixir() - 6.0).abs() < 1e-9);
        assert_eq!(engine.frame(), 84);
    }

    #[test]
    fn test_elixir_cap() {
        let mut engine = knights();
        engine.step(30 * 60);
        assert_eq!(engine.player(PlayerId::RED).elixir(), 10.0);
    }

    #[test]
    fn test_legal_actions_mask() {
        let engine = knights();
        let mask = engine.legal_actions(PlayerId::BLUE);

        assert_eq!(mask.shape(), (18, 32, 4));
        assert!(mask.get(9, 20, 0));
        assert!(mask.get(9, 20, 3));
        assert!(!mask.get(9, 10, 0));
        for placement in engine.legal_placements(PlayerId::BLUE).iter().take(50) {
            assert!(engine.arena().is_legal_placement(PlayerId::BLUE, placement.x, placement.y));
        }
    }

    #[test]
    fn test_legal_actions_empty_without_elixir() {
        let engine = GameEngineBuilder::new()
            .starting_elixir(0.0)
            .build(&["knight"; 8], &["knight"; 8])
            .unwrap();
        assert!(engine.legal_actions(PlayerId::BLUE).is_empty());
    }

    #[test]
    fn test_phases_advance() {
        let timing = MatchTiming {
            double_elixir_at: 1,
            overtime_at: 2,
            end_at: 3,
        };
        let mut engine = GameEngineBuilder::new()
            .fps(10)
            .timing(timing)
            .build(&DECK, &DECK)
            .unwrap();

        engine.step(10);
        assert_eq!(engine.phase(), MatchPhase::DoubleElixir);
        engine.step(10);
        assert_eq!(engine.phase(), MatchPhase::Overtime);
        assert!(!engine.is_terminal());
    }

    #[test]
    fn test_timeout_draw_and_latch() {
        let timing = MatchTiming {
            double_elixir_at: 1,
            overtime_at: 1,
            end_at: 2,
        };
        let mut engine = GameEngineBuilder::new()
            .fps(10)
            .timing(timing)
            .build(&DECK, &DECK)
            .unwrap();

        engine.step(100);
        assert!(engine.is_terminal());
        assert_eq!(engine.terminal_value(), Some(GameResult::Draw));
        assert_eq!(engine.frame(), 20);
        assert_eq!(
            engine.apply(PlayerId::BLUE, None),
            Err(EngineError::MatchOver)
        );
        assert!(engine.legal_actions(PlayerId::BLUE).is_empty());
    }

    #[test]
    fn test_reset_restores_start() {
        let mut engine = knights();
        engine
            .apply(PlayerId::BLUE, Some(Placement::new(9, 20, 0)))
            .unwrap();
        engine.step(60);
        engine.reset().unwrap();

        assert_eq!(engine.frame(), 0);
        assert_eq!(engine.player(PlayerId::BLUE).elixir(), 5.0);
        assert_eq!(engine.arena().entities().len(), 6);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_entity_views_and_image() {
        let engine = engine();
        let views = engine.entity_views();

        assert_eq!(views.len(), 6);
        assert!(views.iter().any(|v| v.card == "king_tower" && v.health == 6408));

        let grid = engine.make_image(PlayerId::BLUE, &mut OccupancyRenderer);
        assert_eq!(grid.len(), 18 * 32);
        assert_eq!(grid.iter().filter(|c| **c == 1).count(), 3);
        assert_eq!(grid.iter().filter(|c| **c == 2).count(), 3);
    }

    #[test]
    fn test_engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<GameEngine>();
    }

    #[test]
    fn test_rules_engine_trait() {
        fn drive<R: RulesEngine>(rules: &mut R) -> bool {
            rules.apply(PlayerId::RED, None).unwrap();
            rules.step(5);
            rules.is_terminal()
        }
        let mut engine = engine();
        assert!(!drive(&mut engine));
        assert_eq!(engine.frame(), 5);
    }
}
