//! End-to-end runs through the public API

use glam::Vec2;
use proptest::prelude::*;

use sky_climber::consts::*;
use sky_climber::highscores::{HighScores, MAX_HIGH_SCORES};
use sky_climber::persistence::{KeyValueStore, MemoryStore, keys, ranking_key};
use sky_climber::sim::{
    GameEvent, GameMode, GamePhase, GameState, Item, ItemKind, Obstacle, ObstacleKind, RunOutcome,
    TickInput, tick,
};
use sky_climber::{Game, Theme};

const VIEWPORT: Vec2 = Vec2::new(400.0, 700.0);
const FRAME_MS: f64 = 1000.0 / 60.0;

fn input_from_bits(bits: u8) -> TickInput {
    TickInput {
        arrow_up: bits & 1 != 0,
        arrow_down: bits & 2 != 0,
        arrow_left: bits & 4 != 0,
        arrow_right: bits & 8 != 0,
        ..Default::default()
    }
}

fn pot_on(pos: Vec2) -> Obstacle {
    Obstacle {
        kind: ObstacleKind::Pot,
        pos,
        size: 40.0,
        speed_offset: 0.0,
        rotation: 0.0,
        rot_speed: 0.0,
        tint: None,
        processed: false,
    }
}

#[test]
fn mission_run_clears_at_goal() {
    let mut game = Game::new(MemoryStore::new(), 3, VIEWPORT);
    game.set_player_name("Climber");
    assert!(game.select_mode(GameMode::Mission));
    game.state.distance = GOAL_DISTANCE - 20.0;

    let mut now = 0.0;
    let mut ended = Vec::new();
    while game.state.phase == GamePhase::Playing {
        // Keep the path clear so only the goal can end the run
        game.state.obstacles.clear();
        now += FRAME_MS;
        ended.extend(
            game.frame(&TickInput::default(), now)
                .into_iter()
                .filter(|e| matches!(e, GameEvent::RunEnded { .. })),
        );
        assert!(game.state.time_ticks < 10_000, "run never cleared");
    }

    assert_eq!(game.state.phase, GamePhase::GameClear);
    assert_eq!(
        ended,
        vec![GameEvent::RunEnded {
            mode: GameMode::Mission,
            outcome: RunOutcome::Cleared,
            score: 1000,
        }]
    );

    let ranking = game.ranking(GameMode::Mission);
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking.entries[0].name, "Climber");
    assert_eq!(ranking.entries[0].score, 1000);
}

#[test]
fn challenge_never_clears() {
    let mut game = Game::new(MemoryStore::new(), 4, VIEWPORT);
    game.select_mode(GameMode::Challenge);
    game.state.distance = GOAL_DISTANCE + 500.0;

    for i in 0..120 {
        game.state.obstacles.clear();
        game.frame(&TickInput::default(), i as f64 * FRAME_MS);
    }
    assert_eq!(game.state.phase, GamePhase::Playing);
}

#[test]
fn challenge_score_item_and_game_over_persist() {
    let mut game = Game::new(MemoryStore::new(), 5, VIEWPORT);
    game.select_mode(GameMode::Challenge);
    game.state.obstacles.clear();

    let player_pos = game.state.player.pos;
    game.state.items.push(Item {
        kind: ItemKind::Score,
        pos: player_pos,
        size: Vec2::splat(ITEM_SIZE),
    });
    let events = game.frame(&TickInput::default(), 0.0);
    assert!(events.contains(&GameEvent::ItemCollected(ItemKind::Score)));
    assert_eq!(game.state.challenge_score, SCORE_ITEM_POINTS);

    // Two hits, spaced past the invulnerability window
    game.state.items.clear();
    for now in [1_000.0, 1_000.0 + INVULNERABILITY_MS] {
        game.state.obstacles.clear();
        let pos = game.state.player.pos;
        game.state.obstacles.push(pot_on(pos));
        game.frame(&TickInput::default(), now);
    }
    assert_eq!(game.state.phase, GamePhase::GameOver);
    assert_eq!(game.state.player.lives, 0);

    // A fresh session over the same storage sees the result
    let store = game.store().clone();
    assert_eq!(
        store.get(keys::BEST_CHALLENGE_SCORE).as_deref(),
        Some("100")
    );
    let next = Game::new(store, 6, VIEWPORT);
    assert_eq!(next.best_challenge_score, 100);
    assert_eq!(next.ranking(GameMode::Challenge).top_score(), Some(100));
}

#[test]
fn profile_survives_sessions() {
    let mut first = Game::new(MemoryStore::new(), 7, VIEWPORT);
    first.set_theme(Theme::Dark);
    first.set_player_name("Rin");

    let second = Game::new(first.store().clone(), 8, VIEWPORT);
    assert_eq!(second.settings.theme, Theme::Dark);
    assert_eq!(second.state.theme, Theme::Dark);
    assert_eq!(second.player_name, "Rin");
}

#[test]
fn restart_returns_to_title_and_next_run_is_fresh() {
    let mut game = Game::new(MemoryStore::new(), 9, VIEWPORT);
    game.select_mode(GameMode::Mission);
    for i in 0..300 {
        game.frame(&input_from_bits(4), i as f64 * FRAME_MS);
    }
    game.state.end_run(RunOutcome::GameOver);
    game.frame(&TickInput::default(), 10_000.0);

    assert!(game.handle_action(sky_climber::platform::Action::Restart));
    assert_eq!(game.state.phase, GamePhase::Start);

    assert!(game.select_mode(GameMode::Challenge));
    assert_eq!(game.state.distance, 0.0);
    assert_eq!(game.state.player.lives, MAX_LIVES);
    assert!(game.state.obstacles.is_empty());
    assert!(game.state.items.is_empty());
}

#[test]
fn same_seed_same_inputs_same_run() {
    let run = |seed: u64| {
        let mut state = GameState::new(seed, VIEWPORT);
        state.start(GameMode::Challenge);
        for i in 0..1_200u32 {
            let input = input_from_bits((i / 40 % 16) as u8);
            tick(&mut state, &input, i as f64 * FRAME_MS);
        }
        state
    };

    let a = run(2024);
    let b = run(2024);
    assert_eq!(a.phase, b.phase);
    assert_eq!(a.player.pos, b.player.pos);
    assert_eq!(a.player.lives, b.player.lives);
    assert_eq!(a.distance, b.distance);
    assert_eq!(a.challenge_score, b.challenge_score);
    assert_eq!(a.obstacles.len(), b.obstacles.len());
    for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
        assert_eq!(x.kind, y.kind);
        assert_eq!(x.pos, y.pos);
    }
    assert_eq!(a.items.len(), b.items.len());
}

#[test]
fn corrupt_ranking_reads_empty_then_recovers() {
    let mut store = MemoryStore::new();
    store.set(&ranking_key(GameMode::Challenge), "[{\"name\":");
    assert!(HighScores::load(&store, GameMode::Challenge).is_empty());

    HighScores::record(&mut store, GameMode::Challenge, "Kai", 40, 1.0);
    assert_eq!(
        HighScores::load(&store, GameMode::Challenge).top_score(),
        Some(40)
    );
}

proptest! {
    #[test]
    fn lives_stay_in_bounds_and_distance_never_drops(
        seed in any::<u64>(),
        challenge in any::<bool>(),
        inputs in prop::collection::vec(0u8..16, 1..600),
    ) {
        let mode = if challenge { GameMode::Challenge } else { GameMode::Mission };
        let mut state = GameState::new(seed, VIEWPORT);
        state.start(mode);
        prop_assert_eq!(state.distance, 0.0);

        let mut last_distance = 0.0;
        for (i, bits) in inputs.iter().enumerate() {
            tick(&mut state, &input_from_bits(*bits), i as f64 * FRAME_MS);

            prop_assert!(state.player.lives <= state.player.max_lives);
            prop_assert!(state.distance >= last_distance);
            last_distance = state.distance;

            if state.phase == GamePhase::GameClear {
                prop_assert_eq!(mode, GameMode::Mission);
                prop_assert!(state.distance >= GOAL_DISTANCE);
            }
            if state.phase != GamePhase::Playing {
                break;
            }
        }

        let ended = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count();
        prop_assert!(ended <= 1);
    }

    #[test]
    fn leaderboard_keeps_best_ten_descending(
        scores in prop::collection::vec(0u64..5_000, 0..40),
    ) {
        let mut board = HighScores::new();
        for (i, score) in scores.iter().enumerate() {
            board.add_score("p", *score, i as f64);
        }

        prop_assert_eq!(board.len(), scores.len().min(MAX_HIGH_SCORES));
        prop_assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));

        let mut expected = scores.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(MAX_HIGH_SCORES);
        let kept: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        prop_assert_eq!(kept, expected);
    }
}
