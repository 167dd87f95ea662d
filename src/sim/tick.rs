//! Per-frame simulation tick
//!
//! Core game loop that advances the run by one frame.

use glam::Vec2;
use rand::Rng;

use super::collision::overlaps_inset;
use super::spawn::spawn_wave;
use super::state::{GameEvent, GameMode, GamePhase, GameState, ItemKind, RunOutcome};
use crate::consts::*;

/// Held keys for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub arrow_up: bool,
    pub arrow_down: bool,
    pub arrow_left: bool,
    pub arrow_right: bool,
    pub w: bool,
    pub s: bool,
    pub a: bool,
    pub d: bool,
}

impl TickInput {
    #[inline]
    pub fn up(&self) -> bool {
        self.arrow_up || self.w
    }

    #[inline]
    pub fn down(&self) -> bool {
        self.arrow_down || self.s
    }

    #[inline]
    pub fn left(&self) -> bool {
        self.arrow_left || self.a
    }

    #[inline]
    pub fn right(&self) -> bool {
        self.arrow_right || self.d
    }
}

/// Target speed from the difficulty curve
pub fn target_speed(mode: GameMode, distance: f32, speed_bonus: f32) -> f32 {
    match mode {
        GameMode::Challenge => {
            let level = (distance / CHALLENGE_LEVEL_DISTANCE).floor();
            BASE_SPEED + level * SPEED_PER_LEVEL + speed_bonus
        }
        GameMode::Mission => {
            let level = (distance / MISSION_LEVEL_DISTANCE).floor();
            (BASE_SPEED + level * SPEED_PER_LEVEL).min(MISSION_SPEED_CAP)
        }
    }
}

/// Frames between obstacle spawns at the given speed
#[inline]
pub fn spawn_interval(speed: f32) -> f32 {
    SPAWN_FACTOR / (speed * SPAWN_SPEED_SCALE)
}

/// Advance the game by one frame. `now_ms` is wall-clock time for the
/// invulnerability and flash timers.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    move_player(state, input);

    state.distance += state.speed / TICKS_PER_SECOND;

    if state.mode == GameMode::Mission && state.distance >= GOAL_DISTANCE {
        state.end_run(RunOutcome::Cleared);
        return;
    }

    // Ease toward the difficulty curve
    let target = target_speed(state.mode, state.distance, state.speed_bonus);
    if state.speed < target {
        state.speed += SPEED_EASE;
    }

    scroll_background(state);

    state.spawn_timer += 1;
    if state.spawn_timer as f32 > spawn_interval(state.speed) {
        spawn_wave(state);
        state.spawn_timer = 0;
    }

    update_obstacles(state, now_ms);
    if state.phase != GamePhase::Playing {
        return;
    }

    update_items(state);
}

fn move_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    if input.left() {
        player.pos.x -= PLAYER_MOVE_SPEED;
    }
    if input.right() {
        player.pos.x += PLAYER_MOVE_SPEED;
    }
    if input.up() {
        player.pos.y -= PLAYER_MOVE_SPEED;
    }
    if input.down() {
        player.pos.y += PLAYER_MOVE_SPEED;
    }

    // Limbs swing faster while climbing
    player.anim_speed = if input.up() {
        ANIM_SPEED_CLIMB
    } else if input.down() {
        ANIM_SPEED_DESCEND
    } else {
        ANIM_SPEED_IDLE
    };
    player.anim_phase += player.anim_speed;

    player.clamp_to(state.viewport);
}

fn scroll_background(state: &mut GameState) {
    let height = state.viewport.y;
    for row in &mut state.windows {
        row.y += state.speed;
        if row.y > height {
            row.y = -WINDOW_ROW_HEIGHT;
        }
    }
}

fn update_obstacles(state: &mut GameState, now_ms: f64) {
    let height = state.viewport.y;
    let speed = state.speed;
    let scores_avoidance = state.mode == GameMode::Challenge;
    let player_rect = state.player.rect();
    let mut hits = 0usize;
    let mut avoided = 0u64;

    state.obstacles.retain_mut(|obs| {
        obs.pos.y += speed + obs.speed_offset;
        obs.rotation += obs.rot_speed;

        if obs.pos.y > height {
            if scores_avoidance && !obs.processed {
                obs.processed = true;
                avoided += 1;
            }
            return false;
        }

        if overlaps_inset(&player_rect, &obs.rect(), HITBOX_INSET) {
            hits += 1;
            return false;
        }
        true
    });

    if avoided > 0 {
        state.challenge_score += avoided * AVOID_POINTS;
        for _ in 0..avoided {
            state.events.push(GameEvent::ObstacleAvoided);
        }
    }

    // Every hit removes its obstacle; only the first can land inside a tick
    // because the next ones fall into the invulnerability window
    for _ in 0..hits {
        state.take_damage(now_ms);
        if state.phase != GamePhase::Playing {
            break;
        }
    }
}

fn update_items(state: &mut GameState) {
    let height = state.viewport.y;
    let speed = state.speed;
    let mut collected = Vec::new();

    let player_rect = state.player.rect();
    state.items.retain_mut(|item| {
        item.pos.y += speed;
        if item.pos.y > height {
            return false;
        }
        if player_rect.overlaps(&item.rect()) {
            collected.push(item.kind);
            return false;
        }
        true
    });

    for kind in collected {
        apply_item(state, kind);
    }
}

/// Apply a collected item's effect
pub fn apply_item(state: &mut GameState, kind: ItemKind) {
    match kind {
        ItemKind::Heart => state.player.heal(),
        ItemKind::Score => state.challenge_score += SCORE_ITEM_POINTS,
        ItemKind::Speed => {
            state.speed += SPEED_ITEM_BOOST;
            state.speed_bonus += SPEED_ITEM_BOOST;
        }
        ItemKind::Warp => {
            let span = (state.viewport - state.player.size).max(Vec2::ZERO);
            let x = state.rng.random::<f32>() * span.x;
            let y = state.rng.random::<f32>() * span.y;
            state.player.pos = Vec2::new(x, y);
        }
    }
    state.events.push(GameEvent::ItemCollected(kind));
}
