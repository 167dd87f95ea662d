//! Frame driver
//!
//! Owns the simulation state together with the player's persisted profile
//! (name, theme, best score, leaderboards). The platform loop calls
//! [`Game::frame`] once per display refresh and forwards UI requests
//! (mode selection, ranking view, restart) to the phase transitions here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::highscores::{HighScores, format_score};
use crate::persistence::{KeyValueStore, keys};
use crate::platform::Action;
use crate::settings::{Settings, Theme};
use crate::sim::{GameEvent, GameMode, GamePhase, GameState, RunOutcome, TickInput, tick};

/// Numbers the HUD shows after each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStats {
    pub phase: GamePhase,
    pub mode: GameMode,
    /// Whole distance units (Mission counter)
    pub distance: u32,
    pub challenge_score: u64,
    pub best_challenge_score: u64,
    pub lives: u8,
    pub max_lives: u8,
    /// Speed x10, floored
    pub speed: u32,
}

/// Text for the result overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub title: &'static str,
    pub score: String,
    /// Best Challenge score line; Mission results have none
    pub best: Option<String>,
}

impl ResultSummary {
    pub fn new(mode: GameMode, outcome: RunOutcome, score: u64, best: u64) -> Self {
        let title = match outcome {
            RunOutcome::Cleared => "MISSION CLEAR!",
            RunOutcome::GameOver => "GAME OVER",
        };
        Self {
            title,
            score: format_score(mode, score),
            best: (mode == GameMode::Challenge).then(|| format!("Best: {}", best)),
        }
    }
}

/// A game session bound to a persistence store
pub struct Game<S: KeyValueStore> {
    pub state: GameState,
    pub settings: Settings,
    pub player_name: String,
    pub best_challenge_score: u64,
    store: S,
}

/// `Player<n>` with n in 0..1000
fn default_player_name(seed: u64) -> String {
    let mut rng = Pcg32::seed_from_u64(seed.rotate_left(17));
    format!("Player{}", rng.random_range(0..1000u32))
}

impl<S: KeyValueStore> Game<S> {
    /// Create a session, restoring the saved profile from `store`
    pub fn new(store: S, seed: u64, viewport: Vec2) -> Self {
        let settings = Settings::load(&store);

        let player_name = store
            .get(keys::PLAYER_NAME)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_player_name(seed));

        let best_challenge_score = match store.get(keys::BEST_CHALLENGE_SCORE) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring corrupt best score {:?}", raw);
                0
            }),
            None => 0,
        };

        let mut state = GameState::new(seed, viewport);
        state.theme = settings.theme;

        log::info!(
            "Profile: {} (best challenge {}), theme {}, seed {}",
            player_name,
            best_challenge_score,
            settings.theme.as_str(),
            state.seed
        );

        Self {
            state,
            settings,
            player_name,
            best_challenge_score,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Advance one frame and persist any finished run. Returns the frame's events.
    pub fn frame(&mut self, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
        tick(&mut self.state, input, now_ms);

        let events = self.state.drain_events();
        for event in &events {
            match *event {
                GameEvent::RunEnded {
                    mode,
                    outcome,
                    score,
                } => self.record_run(mode, outcome, score, now_ms),
                GameEvent::PlayerDamaged { lives } => log::debug!("Hit! {} lives left", lives),
                GameEvent::ItemCollected(kind) => log::debug!("Collected {:?}", kind),
                GameEvent::ObstacleAvoided => {}
            }
        }
        events
    }

    fn record_run(&mut self, mode: GameMode, outcome: RunOutcome, score: u64, now_ms: f64) {
        if mode == GameMode::Challenge && score > self.best_challenge_score {
            self.best_challenge_score = score;
            self.store
                .set(keys::BEST_CHALLENGE_SCORE, &score.to_string());
            log::info!("New best challenge score: {}", score);
        }

        let rank = HighScores::record(&mut self.store, mode, &self.player_name, score, now_ms);
        match rank {
            Some(rank) => log::info!("{:?} ({:?}) ranked #{} with {}", mode, outcome, rank, score),
            None => log::info!("{:?} ({:?}) score {} did not rank", mode, outcome, score),
        }
    }

    /// Start a run from the title screen
    pub fn select_mode(&mut self, mode: GameMode) -> bool {
        self.state.start(mode)
    }

    /// Open the leaderboard from the title screen
    pub fn show_ranking(&mut self) -> bool {
        self.state.show_ranking()
    }

    /// Back to the title screen from results or the leaderboard
    pub fn return_to_start(&mut self) -> bool {
        self.state.return_to_start()
    }

    /// One-shot command from keyboard/tap
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Restart => match self.state.phase {
                GamePhase::GameOver | GamePhase::GameClear => self.state.return_to_start(),
                _ => false,
            },
        }
    }

    /// Switch theme and remember it
    pub fn set_theme(&mut self, theme: Theme) {
        if self.settings.theme == theme {
            return;
        }
        self.settings.theme = theme;
        self.state.theme = theme;
        self.settings.save(&mut self.store);
    }

    /// Rename the player. Blank names are rejected and the old name is kept.
    pub fn set_player_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.player_name = name.to_string();
        self.store.set(keys::PLAYER_NAME, name);
        log::info!("Player name set to {}", name);
        true
    }

    /// Viewport changed size
    pub fn resize(&mut self, viewport: Vec2) {
        self.state.resize(viewport);
    }

    /// Stored leaderboard for a mode
    pub fn ranking(&self, mode: GameMode) -> HighScores {
        HighScores::load(&self.store, mode)
    }

    /// Result overlay text for a finished run, read after the run was recorded
    pub fn result_summary(&self, mode: GameMode, outcome: RunOutcome, score: u64) -> ResultSummary {
        ResultSummary::new(mode, outcome, score, self.best_challenge_score)
    }

    pub fn hud(&self) -> HudStats {
        let state = &self.state;
        HudStats {
            phase: state.phase,
            mode: state.mode,
            distance: state.display_distance(),
            challenge_score: state.challenge_score,
            best_challenge_score: self.best_challenge_score,
            lives: state.player.lives,
            max_lives: state.player.max_lives,
            speed: state.display_speed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Obstacle, ObstacleKind};

    const VIEWPORT: Vec2 = Vec2::new(400.0, 700.0);

    fn new_game(store: MemoryStore) -> Game<MemoryStore> {
        Game::new(store, 77, VIEWPORT)
    }

    fn drop_on_player(game: &mut Game<MemoryStore>) {
        let pos = game.state.player.pos;
        game.state.obstacles.push(Obstacle {
            kind: ObstacleKind::Pot,
            pos,
            size: 40.0,
            speed_offset: 0.0,
            rotation: 0.0,
            rot_speed: 0.0,
            tint: None,
            processed: false,
        });
    }

    #[test]
    fn test_default_profile() {
        let game = new_game(MemoryStore::new());
        assert!(game.player_name.starts_with("Player"));
        let n: u32 = game.player_name["Player".len()..].parse().unwrap_or(9999);
        assert!(n < 1000);
        assert_eq!(game.best_challenge_score, 0);
        assert_eq!(game.settings.theme, Theme::Light);
    }

    #[test]
    fn test_restores_profile() {
        let mut store = MemoryStore::new();
        store.set(keys::PLAYER_NAME, "  Ada ");
        store.set(keys::BEST_CHALLENGE_SCORE, "420");
        Settings { theme: Theme::Dark }.save(&mut store);

        let game = new_game(store);
        assert_eq!(game.player_name, "Ada");
        assert_eq!(game.best_challenge_score, 420);
        assert_eq!(game.state.theme, Theme::Dark);
    }

    #[test]
    fn test_corrupt_best_score_is_zero() {
        let mut store = MemoryStore::new();
        store.set(keys::BEST_CHALLENGE_SCORE, "lots");
        assert_eq!(new_game(store).best_challenge_score, 0);
    }

    #[test]
    fn test_rename_rejects_blank() {
        let mut game = new_game(MemoryStore::new());
        assert!(game.set_player_name(" Grace "));
        assert_eq!(game.player_name, "Grace");
        assert!(!game.set_player_name("   "));
        assert_eq!(game.player_name, "Grace");
        assert_eq!(game.store().get(keys::PLAYER_NAME).as_deref(), Some("Grace"));
    }

    #[test]
    fn test_challenge_game_over_persists_once() {
        let mut game = new_game(MemoryStore::new());
        game.set_player_name("Ada");
        assert!(game.select_mode(GameMode::Challenge));
        game.state.player.lives = 1;
        game.state.challenge_score = 250;
        drop_on_player(&mut game);

        game.frame(&TickInput::default(), 10_000.0);
        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(game.best_challenge_score, 250);

        // Further frames change nothing
        game.frame(&TickInput::default(), 10_016.0);
        game.frame(&TickInput::default(), 10_032.0);

        let ranking = game.ranking(GameMode::Challenge);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.entries[0].name, "Ada");
        assert_eq!(ranking.entries[0].score, 250);
        assert_eq!(ranking.entries[0].timestamp, 10_000.0);
        assert_eq!(
            game.store().get(keys::BEST_CHALLENGE_SCORE).as_deref(),
            Some("250")
        );
        assert!(game.ranking(GameMode::Mission).is_empty());
    }

    #[test]
    fn test_lower_challenge_score_keeps_best() {
        let mut store = MemoryStore::new();
        store.set(keys::BEST_CHALLENGE_SCORE, "900");
        let mut game = new_game(store);
        game.select_mode(GameMode::Challenge);
        game.state.player.lives = 1;
        game.state.challenge_score = 30;
        drop_on_player(&mut game);
        game.frame(&TickInput::default(), 0.0);

        assert_eq!(game.best_challenge_score, 900);
        assert_eq!(game.ranking(GameMode::Challenge).top_score(), Some(30));
    }

    #[test]
    fn test_mission_clear_records_goal() {
        let mut game = new_game(MemoryStore::new());
        game.select_mode(GameMode::Mission);
        game.state.distance = 999.99;
        game.frame(&TickInput::default(), 0.0);

        assert_eq!(game.state.phase, GamePhase::GameClear);
        assert_eq!(game.ranking(GameMode::Mission).top_score(), Some(1000));
    }

    #[test]
    fn test_mission_game_over_records_distance() {
        let mut game = new_game(MemoryStore::new());
        game.select_mode(GameMode::Mission);
        game.state.distance = 432.9;
        game.state.player.lives = 1;
        drop_on_player(&mut game);
        game.frame(&TickInput::default(), 0.0);

        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert_eq!(game.ranking(GameMode::Mission).top_score(), Some(432));
    }

    #[test]
    fn test_restart_only_from_results() {
        let mut game = new_game(MemoryStore::new());
        assert!(!game.handle_action(Action::Restart));

        game.select_mode(GameMode::Mission);
        assert!(!game.handle_action(Action::Restart));
        assert_eq!(game.state.phase, GamePhase::Playing);

        game.state.end_run(RunOutcome::GameOver);
        assert!(game.handle_action(Action::Restart));
        assert_eq!(game.state.phase, GamePhase::Start);
    }

    #[test]
    fn test_theme_switch_persists() {
        let mut game = new_game(MemoryStore::new());
        game.set_theme(Theme::Dark);
        assert_eq!(game.state.theme, Theme::Dark);
        assert_eq!(Settings::load(game.store()).theme, Theme::Dark);
    }

    #[test]
    fn test_hud_snapshot() {
        let mut game = new_game(MemoryStore::new());
        game.select_mode(GameMode::Challenge);
        game.state.distance = 12.7;
        game.state.speed = 3.45;
        let hud = game.hud();
        assert_eq!(hud.phase, GamePhase::Playing);
        assert_eq!(hud.mode, GameMode::Challenge);
        assert_eq!(hud.distance, 12);
        assert_eq!(hud.speed, 34);
        assert_eq!(hud.lives, 2);
        assert_eq!(hud.max_lives, 2);
    }

    #[test]
    fn test_challenge_result_shows_best() {
        let mut store = MemoryStore::new();
        store.set(keys::BEST_CHALLENGE_SCORE, "900");
        let mut game = new_game(store);
        game.select_mode(GameMode::Challenge);
        game.state.player.lives = 1;
        game.state.challenge_score = 120;
        drop_on_player(&mut game);

        let events = game.frame(&TickInput::default(), 0.0);
        assert!(events.contains(&GameEvent::RunEnded {
            mode: GameMode::Challenge,
            outcome: RunOutcome::GameOver,
            score: 120,
        }));
        let summary = game.result_summary(GameMode::Challenge, RunOutcome::GameOver, 120);
        assert_eq!(summary.title, "GAME OVER");
        assert_eq!(summary.score, "120");
        assert_eq!(summary.best.as_deref(), Some("Best: 900"));
    }

    #[test]
    fn test_new_best_shows_on_result() {
        let summary = ResultSummary::new(GameMode::Challenge, RunOutcome::GameOver, 40, 40);
        assert_eq!(summary.best.as_deref(), Some("Best: 40"));
    }

    #[test]
    fn test_mission_result_has_no_best() {
        let clear = ResultSummary::new(GameMode::Mission, RunOutcome::Cleared, 1000, 900);
        assert_eq!(clear.title, "MISSION CLEAR!");
        assert_eq!(clear.score, "1000m");
        assert_eq!(clear.best, None);

        let over = ResultSummary::new(GameMode::Mission, RunOutcome::GameOver, 432, 900);
        assert_eq!(over.title, "GAME OVER");
        assert_eq!(over.best, None);
    }

    #[test]
    fn test_session_keeps_seed() {
        assert_eq!(new_game(MemoryStore::new()).state.seed, 77);
    }
}
