//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Wall-clock time comes in as a parameter
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps_inset};
pub use spawn::{LIGHT_TINT_COUNT, roll_item, spawn_item, spawn_obstacle};
pub use state::{
    GameEvent, GameMode, GamePhase, GameState, Item, ItemKind, Obstacle, ObstacleKind, Player,
    RunOutcome, WindowRow,
};
pub use tick::{TickInput, apply_item, target_speed, tick};
