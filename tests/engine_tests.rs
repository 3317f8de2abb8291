//! Match-level scenarios: combat, economy, atomic actions and termination.

use std::sync::Arc;

use arena_sim::arena::Arena;
use arena_sim::cards::{CardDefinition, CardId, CardRegistry, EntityKind, Stats, TargetFilter};
use arena_sim::core::{EngineConfig, EngineError, MatchTiming, Placement, PlayerId, Position};
use arena_sim::engine::{GameEngine, GameEngineBuilder};
use arena_sim::rules::GameResult;

const DECK: [&str; 8] = [
    "knight",
    "archer",
    "giant",
    "minions",
    "musketeer",
    "valkyrie",
    "cannon",
    "barbarian",
];

/// Standard catalogue plus a stationary building-killer, `siege`, that
/// reaches every tower from its own half.
fn siege_registry(fps: u32, damage: i32, attack_delay: u32) -> Arc<CardRegistry> {
    let mut registry = CardRegistry::standard(fps);
    registry.register(
        CardDefinition::new(CardId::new(900), "siege", EntityKind::Troop)
            .with_cost(1)
            .with_stats(Stats {
                max_health: 5000,
                damage,
                attack_range: 40.0,
                sight_range: 40.0,
                speed: 0.0,
                attack_delay,
                targets: TargetFilter::BUILDINGS,
                ..Stats::default()
            }),
    );
    Arc::new(registry)
}

/// Two knights start just outside each other's range, close the gap and
/// trade blows in load order until the later attacker falls.
#[test]
fn test_mutual_approach_combat() {
    let registry = CardRegistry::standard(30);
    let knight = registry.require("knight").unwrap();
    let mut arena = Arena::new(18, 32, 30, &registry).unwrap();

    let blue = arena.spawn(&knight, PlayerId::BLUE, Position::new(9.0, 16.3)).unwrap()[0];
    let red = arena.spawn(&knight, PlayerId::RED, Position::new(9.0, 15.0)).unwrap()[0];

    arena.step(1, 0);
    let (b, r) = (arena.entities().get(blue).unwrap(), arena.entities().get(red).unwrap());
    assert_eq!(b.target, Some(red));
    assert_eq!(r.target, Some(blue));
    assert!(b.position.distance(r.position) > 1.2);

    // Red is processed second, so it is first to find itself in range.
    arena.step(1, 1);
    assert_eq!(arena.entities().get(blue).unwrap().health, 1766 - 202);
    assert_eq!(arena.entities().get(red).unwrap().health, 1766);

    arena.step(1, 2);
    let (b, r) = (arena.entities().get(blue).unwrap(), arena.entities().get(red).unwrap());
    assert_eq!(r.health, 1766 - 202);
    assert!((b.position.distance(r.position) - 1.2).abs() < 1e-6);

    // Nine hits kill a knight; red lands its ninth on frame 1 + 8 * 36.
    arena.step(287, 3);
    assert!(arena.entities().get(blue).is_none());
    let r = arena.entities().get(red).unwrap();
    assert_eq!(r.health, 1766 - 8 * 202);
    assert_eq!(r.target, None);
}

/// Deck of one 3-cost card, 5 elixir: the second play in a row is refused
/// and leaves elixir and hand alone.
#[test]
fn test_insufficient_elixir_after_first_play() {
    let deck = ["knight"; 8];
    let mut engine = GameEngine::new(&deck, &deck, EngineConfig::default(), 3).unwrap();

    engine.apply(PlayerId::BLUE, Some(Placement::new(4, 20, 0))).unwrap();
    assert_eq!(engine.player(PlayerId::BLUE).elixir(), 2.0);

    let hand = engine.player(PlayerId::BLUE).hand().clone();
    let err = engine
        .apply(PlayerId::BLUE, Some(Placement::new(5, 20, 0)))
        .unwrap_err();

    assert!(matches!(err, EngineError::InsufficientElixir { cost: 3, .. }));
    assert!(err.is_invalid_action());
    assert_eq!(engine.player(PlayerId::BLUE).elixir(), 2.0);
    assert_eq!(engine.player(PlayerId::BLUE).hand(), &hand);
    assert_eq!(engine.history().len(), 1);
}

/// A card whose entity cannot load costs nothing.
#[test]
fn test_failed_spawn_refunds_play() {
    let mut registry = CardRegistry::standard(30);
    registry.register(
        CardDefinition::new(CardId::new(901), "dud", EntityKind::Troop)
            .with_cost(2)
            .with_stats(Stats {
                max_health: 0,
                ..Stats::default()
            }),
    );
    let deck = ["dud"; 8];
    let mut engine =
        GameEngine::with_registry(Arc::new(registry), &deck, &DECK, EngineConfig::default(), 0)
            .unwrap();
    let before = engine.arena().entities().len();
    let hand = engine.player(PlayerId::BLUE).hand().clone();

    let err = engine
        .apply(PlayerId::BLUE, Some(Placement::new(9, 20, 0)))
        .unwrap_err();

    assert!(matches!(err, EngineError::LifecycleFailure { .. }));
    assert_eq!(engine.player(PlayerId::BLUE).elixir(), 5.0);
    assert_eq!(engine.player(PlayerId::BLUE).hand(), &hand);
    assert_eq!(engine.arena().entities().len(), before);
    assert!(engine.history().is_empty());
}

/// A multi-unit card spawns every unit from one play.
#[test]
fn test_multi_unit_card() {
    let deck = ["barbarian"; 8];
    let mut engine = GameEngine::new(&deck, &deck, EngineConfig::default(), 0).unwrap();

    engine.apply(PlayerId::RED, Some(Placement::new(9, 10, 2))).unwrap();

    let barbarians = engine
        .entity_views()
        .into_iter()
        .filter(|view| view.card == "barbarian" && view.side == PlayerId::RED)
        .count();
    assert_eq!(barbarians, 5);
    assert_eq!(engine.player(PlayerId::RED).elixir(), 0.0);
}

/// Destroying every enemy tower wins at once and freezes the match.
#[test]
fn test_destroying_all_towers_wins() {
    let deck = ["siege"; 8];
    let mut engine = GameEngine::with_registry(
        siege_registry(30, 20_000, 1),
        &deck,
        &DECK,
        EngineConfig::default(),
        5,
    )
    .unwrap();

    engine.apply(PlayerId::BLUE, Some(Placement::new(9, 20, 0))).unwrap();
    engine.step(100);

    assert_eq!(engine.terminal_value(), Some(GameResult::Winner(PlayerId::BLUE)));
    assert_eq!(engine.terminal_value().unwrap().value(), 0);
    assert_eq!(engine.arena().tower_count(PlayerId::RED), 0);
    assert_eq!(engine.player(PlayerId::RED).towers, 0);
    assert!(engine.player(PlayerId::RED).king_activated);
    assert_eq!(engine.arena().tower_count(PlayerId::BLUE), 3);

    // One tower per frame: the latch stops the clock right after the last.
    assert_eq!(engine.frame(), 3);
    assert_eq!(engine.apply(PlayerId::RED, None), Err(EngineError::MatchOver));
    assert!(engine.legal_actions(PlayerId::BLUE).is_empty());
}

/// Entering overtime with a tower lead ends the match for the leader.
#[test]
fn test_overtime_tower_lead() {
    let config = EngineConfig::default().with_fps(10).with_timing(MatchTiming {
        double_elixir_at: 0,
        overtime_at: 1,
        end_at: 5,
    });
    let deck = ["siege"; 8];
    let mut engine =
        GameEngine::with_registry(siege_registry(10, 3052, 10_000), &DECK, &deck, config, 9)
            .unwrap();

    engine.apply(PlayerId::RED, Some(Placement::new(9, 10, 1))).unwrap();
    engine.step(1);
    assert_eq!(engine.arena().tower_count(PlayerId::BLUE), 2);
    assert!(engine.player(PlayerId::BLUE).king_activated);
    assert!(!engine.is_terminal());

    engine.step(100);
    assert_eq!(engine.frame(), 10);
    assert_eq!(engine.terminal_value(), Some(GameResult::Winner(PlayerId::RED)));
    assert_eq!(engine.terminal_value().unwrap().value(), 1);
}

/// Equal tower counts at the time limit go to the side whose weakest tower
/// has more health left.
#[test]
fn test_time_limit_weakest_tower_tiebreak() {
    let config = EngineConfig::default().with_fps(10).with_timing(MatchTiming {
        double_elixir_at: 0,
        overtime_at: 1,
        end_at: 2,
    });
    let deck = ["siege"; 8];
    let mut engine =
        GameEngine::with_registry(siege_registry(10, 1000, 10_000), &deck, &DECK, config, 4)
            .unwrap();

    engine.apply(PlayerId::BLUE, Some(Placement::new(9, 20, 0))).unwrap();
    engine.step(1);
    assert_eq!(engine.arena().lowest_tower_health(PlayerId::RED), 3052 - 1000);
    assert_eq!(engine.arena().tower_count(PlayerId::RED), 3);
    assert!(!engine.player(PlayerId::RED).king_activated);

    engine.step(100);
    assert_eq!(engine.frame(), 20);
    assert_eq!(engine.arena().tower_count(PlayerId::BLUE), 3);
    assert_eq!(engine.arena().lowest_tower_health(PlayerId::BLUE), 3052);
    assert_eq!(engine.terminal_value(), Some(GameResult::Winner(PlayerId::BLUE)));
}

/// Once terminal, always terminal with the same result.
#[test]
fn test_termination_is_monotonic() {
    let mut engine = GameEngineBuilder::new()
        .fps(10)
        .timing(MatchTiming {
            double_elixir_at: 1,
            overtime_at: 2,
            end_at: 3,
        })
        .seed(11)
        .build(&DECK, &DECK)
        .unwrap();

    let mut first = None;
    for _ in 0..60 {
        engine.step(1);
        match (first, engine.terminal_value()) {
            (None, result) => first = result,
            (Some(latched), result) => assert_eq!(result, Some(latched)),
        }
        assert_eq!(engine.is_terminal(), first.is_some());
    }

    assert_eq!(first, Some(GameResult::Draw));
    assert_eq!(first.unwrap().value(), -1);
    assert_eq!(engine.frame(), 30);
}

/// Legal actions track elixir and the placement mask together.
#[test]
fn test_legal_actions_follow_elixir() {
    let deck = ["knight"; 8];
    let mut engine = GameEngine::new(&deck, &deck, EngineConfig::default(), 0).unwrap();

    let mask = engine.legal_actions(PlayerId::BLUE);
    assert!(mask.get(4, 20, 0));
    assert!(!mask.get(4, 10, 0));

    engine.apply(PlayerId::BLUE, Some(Placement::new(4, 20, 0))).unwrap();
    assert!(engine.legal_actions(PlayerId::BLUE).is_empty());

    // 3 elixir at 1/2.8 per second takes a little over 8 seconds.
    engine.step(30 * 9);
    let mask = engine.legal_actions(PlayerId::BLUE);
    assert!(!mask.is_empty());
    for placement in mask.iter_legal() {
        assert!(engine.arena().is_legal_placement(PlayerId::BLUE, placement.x, placement.y));
    }
}
