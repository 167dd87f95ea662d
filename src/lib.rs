//! Sky Climber - A building-facade obstacle dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game phases)
//! - `renderer`: Scene building and WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (input keys, clock)
//! - `persistence`: Key-value store (LocalStorage on web)
//! - `highscores`: Per-mode top 10 leaderboards
//! - `game`: Frame driver tying the simulation to persistence

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, HudStats, ResultSummary};
pub use highscores::HighScores;
pub use settings::{Settings, Theme};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate; distance advances `speed / TICKS_PER_SECOND` per tick
    pub const TICKS_PER_SECOND: f32 = 60.0;

    /// Mission mode goal distance
    pub const GOAL_DISTANCE: f32 = 1000.0;

    /// Speed at the start of every run
    pub const BASE_SPEED: f32 = 3.0;
    /// Speed added to the target per difficulty level
    pub const SPEED_PER_LEVEL: f32 = 0.2;
    /// Distance per difficulty level in Mission mode
    pub const MISSION_LEVEL_DISTANCE: f32 = 10.0;
    /// Distance per difficulty level in Challenge mode
    pub const CHALLENGE_LEVEL_DISTANCE: f32 = 30.0;
    /// Mission mode target speed cap (Challenge is uncapped)
    pub const MISSION_SPEED_CAP: f32 = 15.0;
    /// Per-tick easing of current speed toward the target
    pub const SPEED_EASE: f32 = 0.005;
    /// Permanent speed gained from a speed item
    pub const SPEED_ITEM_BOOST: f32 = 1.0;

    /// Obstacle spawns when the frame counter exceeds SPAWN_FACTOR / (speed * SPAWN_SPEED_SCALE)
    pub const SPAWN_FACTOR: f32 = 500.0;
    pub const SPAWN_SPEED_SCALE: f32 = 1.2;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_MOVE_SPEED: f32 = 5.0;
    /// Gap between player feet and the bottom edge at spawn
    pub const PLAYER_SPAWN_MARGIN: f32 = 50.0;
    pub const MAX_LIVES: u8 = 2;
    /// Animation phase advance per tick
    pub const ANIM_SPEED_CLIMB: f32 = 0.4;
    pub const ANIM_SPEED_DESCEND: f32 = 0.1;
    pub const ANIM_SPEED_IDLE: f32 = 0.2;

    /// Hits are ignored for this long after taking damage (ms)
    pub const INVULNERABILITY_MS: f64 = 2000.0;
    /// Damage flash overlay duration (ms)
    pub const DAMAGE_FLASH_MS: f64 = 500.0;
    /// Player blinks on/off in slots of this length while invulnerable (ms)
    pub const BLINK_SLOT_MS: f64 = 100.0;

    /// Forgiving hitbox inset applied to both player and obstacle
    pub const HITBOX_INSET: f32 = 8.0;

    /// Obstacle size range [min, max)
    pub const OBSTACLE_MIN_SIZE: f32 = 30.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 60.0;
    /// Extra fall speed range [min, max)
    pub const OBSTACLE_MIN_SPEED_OFFSET: f32 = 2.0;
    pub const OBSTACLE_MAX_SPEED_OFFSET: f32 = 5.0;
    /// Rotation speed magnitude (radians per tick)
    pub const OBSTACLE_MAX_ROT_SPEED: f32 = 0.05;

    pub const ITEM_SIZE: f32 = 30.0;

    /// Scoring (Challenge mode)
    pub const AVOID_POINTS: u64 = 10;
    pub const SCORE_ITEM_POINTS: u64 = 100;

    /// Background window grid
    pub const WINDOW_ROW_HEIGHT: f32 = 150.0;
    pub const WINDOW_COLUMNS: u32 = 4;
    pub const WINDOW_WIDTH: f32 = 40.0;
    pub const WINDOW_HEIGHT: f32 = 60.0;
    pub const WINDOW_SILL_HEIGHT: f32 = 5.0;
}
