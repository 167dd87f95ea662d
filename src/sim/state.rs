//! Game state and core simulation types
//!
//! Everything a running session needs lives in [`GameState`]; nothing is global,
//! so independent games can coexist (and tests can build as many as they like).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::settings::Theme;

/// Current phase of the game (only one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for mode selection
    Start,
    /// Active gameplay
    Playing,
    /// Run ended by losing all lives
    GameOver,
    /// Mission goal reached
    GameClear,
    /// Leaderboard view
    Ranking,
}

/// Game mode picked on the start screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Reach the goal distance
    Mission,
    /// Endless, scored by avoided obstacles and items
    Challenge,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Mission, GameMode::Challenge];

    /// Stable identifier used in storage keys
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Mission => "MISSION",
            GameMode::Challenge => "CHALLENGE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MISSION" => Some(GameMode::Mission),
            "CHALLENGE" => Some(GameMode::Challenge),
            _ => None,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    GameOver,
    Cleared,
}

/// Things that happened during a tick, drained by the frame driver
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerDamaged { lives: u8 },
    ItemCollected(ItemKind),
    ObstacleAvoided,
    /// Emitted exactly once when entering GameOver/GameClear
    RunEnded {
        mode: GameMode,
        outcome: RunOutcome,
        score: u64,
    },
}

/// The climber
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub lives: u8,
    pub max_lives: u8,
    /// Wall-clock ms until which hits are ignored
    pub invulnerable_until: f64,
    /// Limb swing phase (radians)
    pub anim_phase: f32,
    pub anim_speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            lives: MAX_LIVES,
            max_lives: MAX_LIVES,
            invulnerable_until: 0.0,
            anim_phase: 0.0,
            anim_speed: ANIM_SPEED_IDLE,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until
    }

    /// Place at horizontal center, just above the bottom edge
    pub fn reset_position(&mut self, viewport: Vec2) {
        self.pos = Vec2::new(
            viewport.x / 2.0 - self.size.x / 2.0,
            viewport.y - self.size.y - PLAYER_SPAWN_MARGIN,
        );
    }

    /// Keep the whole body inside the viewport
    pub fn clamp_to(&mut self, viewport: Vec2) {
        let max = (viewport - self.size).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    /// Restore one life, capped at max
    pub fn heal(&mut self) {
        if self.lives < self.max_lives {
            self.lives += 1;
        }
    }
}

/// Falling debris types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Debris,
    Glass,
    Pot,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Debris, ObstacleKind::Glass, ObstacleKind::Pot];
}

/// A falling obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Side length (obstacles are square)
    pub size: f32,
    /// Added to the scroll speed while falling
    pub speed_offset: f32,
    pub rotation: f32,
    pub rot_speed: f32,
    /// Light-palette color index picked at spawn; None means draw-time dark palette
    pub tint: Option<u8>,
    /// Avoidance already scored
    pub processed: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(self.size))
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restore one life
    Heart,
    /// Bonus points
    Score,
    /// Permanent speed increase
    Speed,
    /// Random teleport
    Warp,
}

/// A falling power-up
#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Item {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// One scrolling row of building windows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRow {
    pub y: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub mode: GameMode,
    /// Theme used for spawn-time obstacle tints
    pub theme: Theme,
    /// Playfield size in pixels
    pub viewport: Vec2,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub items: Vec<Item>,
    pub windows: Vec<WindowRow>,
    /// Distance climbed this run
    pub distance: f32,
    pub challenge_score: u64,
    /// Current scroll speed
    pub speed: f32,
    /// Permanent bonus from speed items (Challenge)
    pub speed_bonus: f32,
    /// Frames since the last obstacle spawn
    pub spawn_timer: u32,
    /// Ticks simulated this run
    pub time_ticks: u64,
    /// Wall-clock ms until which the damage flash overlay shows
    pub damage_flash_until: f64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session on the start screen
    pub fn new(seed: u64, viewport: Vec2) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            mode: GameMode::Mission,
            theme: Theme::default(),
            viewport,
            player: Player::default(),
            obstacles: Vec::new(),
            items: Vec::new(),
            windows: Vec::new(),
            distance: 0.0,
            challenge_score: 0,
            speed: BASE_SPEED,
            speed_bonus: 0.0,
            spawn_timer: 0,
            time_ticks: 0,
            damage_flash_until: 0.0,
            events: Vec::new(),
        };
        state.player.reset_position(viewport);
        state.init_windows();
        state
    }

    /// Lay out background rows to cover the viewport plus one spare
    pub fn init_windows(&mut self) {
        let rows = (self.viewport.y / WINDOW_ROW_HEIGHT).ceil() as usize + 1;
        self.windows = (0..rows)
            .map(|i| WindowRow {
                y: i as f32 * WINDOW_ROW_HEIGHT,
            })
            .collect();
    }

    /// Viewport changed size
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        if self.phase == GamePhase::Start {
            self.player.reset_position(viewport);
        }
        self.init_windows();
    }

    /// Distance as shown to the player
    pub fn display_distance(&self) -> u32 {
        self.distance.floor() as u32
    }

    /// Speed readout as shown to the player
    pub fn display_speed(&self) -> u32 {
        (self.speed * 10.0).floor() as u32
    }

    /// Score a finished run would record
    pub fn run_score(&self, outcome: RunOutcome) -> u64 {
        match (self.mode, outcome) {
            (GameMode::Mission, RunOutcome::Cleared) => GOAL_DISTANCE as u64,
            (GameMode::Mission, RunOutcome::GameOver) => self.display_distance() as u64,
            (GameMode::Challenge, _) => self.challenge_score,
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Phase transitions ===

    /// Start -> Playing. Returns false if ignored.
    pub fn start(&mut self, mode: GameMode) -> bool {
        match self.phase {
            GamePhase::Playing => return false,
            GamePhase::Start => {}
            other => {
                log::warn!("Mode selection ignored in {:?}", other);
                return false;
            }
        }

        self.mode = mode;
        self.phase = GamePhase::Playing;

        self.distance = 0.0;
        self.challenge_score = 0;
        self.speed = BASE_SPEED;
        self.speed_bonus = 0.0;
        self.spawn_timer = 0;
        self.time_ticks = 0;
        self.damage_flash_until = 0.0;
        self.obstacles.clear();
        self.items.clear();
        self.events.clear();

        self.player.lives = self.player.max_lives;
        self.player.invulnerable_until = 0.0;
        self.player.anim_phase = 0.0;
        self.player.anim_speed = ANIM_SPEED_IDLE;
        self.player.reset_position(self.viewport);

        log::info!("Run started: {:?}", mode);
        true
    }

    /// Playing -> GameOver/GameClear, emitting the run result once
    pub fn end_run(&mut self, outcome: RunOutcome) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if outcome == RunOutcome::Cleared && self.mode != GameMode::Mission {
            return false;
        }

        self.phase = match outcome {
            RunOutcome::GameOver => GamePhase::GameOver,
            RunOutcome::Cleared => GamePhase::GameClear,
        };
        let score = self.run_score(outcome);
        self.events.push(GameEvent::RunEnded {
            mode: self.mode,
            outcome,
            score,
        });

        log::info!("Run ended: {:?} {:?}, score {}", self.mode, outcome, score);
        true
    }

    /// GameOver/GameClear/Ranking -> Start
    pub fn return_to_start(&mut self) -> bool {
        match self.phase {
            GamePhase::GameOver | GamePhase::GameClear | GamePhase::Ranking => {
                self.phase = GamePhase::Start;
                self.player.reset_position(self.viewport);
                true
            }
            _ => false,
        }
    }

    /// Start -> Ranking
    pub fn show_ranking(&mut self) -> bool {
        if self.phase != GamePhase::Start {
            return false;
        }
        self.phase = GamePhase::Ranking;
        true
    }

    /// Apply a hit; ignored while invulnerable. Returns true if a life was lost.
    pub fn take_damage(&mut self, now_ms: f64) -> bool {
        if self.player.is_invulnerable(now_ms) {
            return false;
        }

        self.player.lives = self.player.lives.saturating_sub(1);
        self.player.invulnerable_until = now_ms + INVULNERABILITY_MS;
        self.damage_flash_until = now_ms + DAMAGE_FLASH_MS;
        self.events.push(GameEvent::PlayerDamaged {
            lives: self.player.lives,
        });

        if self.player.lives == 0 {
            self.end_run(RunOutcome::GameOver);
        }
        true
    }
}
