//! Procedural obstacle and item spawning
//!
//! All rolls come from the session RNG so a seed fully determines a run.

use glam::Vec2;
use rand::Rng;

use super::state::{GameMode, GameState, Item, ItemKind, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::settings::Theme;

/// Number of colors in the light obstacle palette (see `renderer::vertex::colors`)
pub const LIGHT_TINT_COUNT: u8 = 6;

/// Item roll table for Challenge mode, checked in order; first success wins
const CHALLENGE_ITEM_ROLLS: [(ItemKind, f64); 4] = [
    (ItemKind::Score, 0.05),
    (ItemKind::Speed, 0.05),
    (ItemKind::Warp, 0.05),
    (ItemKind::Heart, 0.02),
];

/// Mission mode only drops hearts
const MISSION_ITEM_ROLLS: [(ItemKind, f64); 1] = [(ItemKind::Heart, 0.05)];

/// Random x so that an object of `width` stays on screen
fn spawn_x<R: Rng>(rng: &mut R, viewport_width: f32, width: f32) -> f32 {
    let span = (viewport_width - width).max(0.0);
    rng.random::<f32>() * span
}

/// Spawn one obstacle above the top edge
pub fn spawn_obstacle(state: &mut GameState) {
    let rng = &mut state.rng;

    let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
    let size = rng.random_range(OBSTACLE_MIN_SIZE..OBSTACLE_MAX_SIZE);
    let x = spawn_x(rng, state.viewport.x, size);
    let speed_offset = rng.random_range(OBSTACLE_MIN_SPEED_OFFSET..OBSTACLE_MAX_SPEED_OFFSET);
    let rotation = rng.random::<f32>() * std::f32::consts::PI;
    let rot_speed = rng.random_range(-OBSTACLE_MAX_ROT_SPEED..OBSTACLE_MAX_ROT_SPEED);

    // Light theme colors are fixed at spawn; dark colors come from the kind at draw time
    let tint = match state.theme {
        Theme::Light => Some(rng.random_range(0..LIGHT_TINT_COUNT)),
        Theme::Dark => None,
    };

    log::debug!("Spawn {:?} size {:.1} at x {:.1}", kind, size, x);

    state.obstacles.push(Obstacle {
        kind,
        pos: Vec2::new(x, -size),
        size,
        speed_offset,
        rotation,
        rot_speed,
        tint,
        processed: false,
    });
}

/// Spawn one item of the given kind above the top edge
pub fn spawn_item(state: &mut GameState, kind: ItemKind) {
    let x = spawn_x(&mut state.rng, state.viewport.x, ITEM_SIZE);
    state.items.push(Item {
        kind,
        pos: Vec2::new(x, -ITEM_SIZE),
        size: Vec2::splat(ITEM_SIZE),
    });
}

/// Roll for an item drop after an obstacle spawn.
///
/// Each entry is an independent roll taken in order, so the combined odds are
/// not a clean partition (Challenge drops something ~16.2% of the time).
pub fn roll_item<R: Rng>(rng: &mut R, mode: GameMode) -> Option<ItemKind> {
    let table: &[(ItemKind, f64)] = match mode {
        GameMode::Challenge => &CHALLENGE_ITEM_ROLLS,
        GameMode::Mission => &MISSION_ITEM_ROLLS,
    };
    table
        .iter()
        .find(|(_, chance)| rng.random_bool(*chance))
        .map(|(kind, _)| *kind)
}

/// Spawn an obstacle plus whatever item the roll yields
pub fn spawn_wave(state: &mut GameState) {
    spawn_obstacle(state);
    if let Some(kind) = roll_item(&mut state.rng, state.mode) {
        spawn_item(state, kind);
    }
}
