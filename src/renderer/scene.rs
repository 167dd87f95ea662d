//! Scene building
//!
//! Turns a [`GameState`] snapshot into a [`DrawList`] of colored triangles in
//! screen pixels (origin top-left, y down). Pure: the same state and clock
//! always produce the same vertices.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::settings::Theme;
use crate::sim::{GameState, Item, ItemKind, Obstacle, ObstacleKind, Player};

const CIRCLE_SEGMENTS: u32 = 24;
const LIMB_WIDTH: f32 = 4.0;
const LIMB_SWING: f32 = 10.0;
const COIN_RADIUS: f32 = 12.0;
const GLOW_RADIUS: f32 = 16.0;
const GLOW_ALPHA: f32 = 0.35;
const MARK_WIDTH: f32 = 2.0;

/// Triangle list accumulated from draw primitives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    vertices: Vec<Vertex>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: [f32; 4]) {
        self.vertices.extend(shapes::rect(pos, size, color));
    }

    pub fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]) {
        self.vertices.extend(shapes::polygon(points, color));
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.vertices
            .extend(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    pub fn fill_half_disc(&mut self, center: Vec2, radius: f32, bulge: Vec2, color: [f32; 4]) {
        self.vertices.extend(shapes::half_disc(
            center,
            radius,
            bulge,
            color,
            CIRCLE_SEGMENTS / 2,
        ));
    }

    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::line(from, to, width, color));
    }

    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::polyline(points, width, color));
    }

    pub fn stroke_outline(&mut self, points: &[Vec2], width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::outline(points, width, color));
    }
}

/// Background color behind the building windows
pub fn clear_color(theme: Theme) -> [f32; 4] {
    match theme {
        Theme::Light => colors::CLEAR_LIGHT,
        Theme::Dark => colors::CLEAR_DARK,
    }
}

/// Build the full frame: background rows, player, obstacles, items, damage flash
pub fn build_scene(state: &GameState, now_ms: f64) -> DrawList {
    let mut list = DrawList::new();

    draw_background(&mut list, state);
    draw_player(&mut list, &state.player, now_ms);
    for obstacle in &state.obstacles {
        draw_obstacle(&mut list, obstacle, state.theme);
    }
    for item in &state.items {
        draw_item(&mut list, item);
    }

    if now_ms < state.damage_flash_until {
        list.fill_rect(Vec2::ZERO, state.viewport, colors::DAMAGE_FLASH);
    }

    list
}

fn draw_background(list: &mut DrawList, state: &GameState) {
    let (pane, sill) = match state.theme {
        Theme::Light => (colors::WINDOW_LIGHT, colors::SILL_LIGHT),
        Theme::Dark => (colors::WINDOW_DARK, colors::SILL_DARK),
    };

    let columns = WINDOW_COLUMNS as f32;
    let gap = (state.viewport.x - WINDOW_WIDTH * columns) / (columns + 1.0);
    let size = Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    for row in &state.windows {
        for c in 0..WINDOW_COLUMNS {
            let x = gap + c as f32 * (WINDOW_WIDTH + gap);
            list.fill_rect(Vec2::new(x, row.y), size, pane);
            list.fill_rect(
                Vec2::new(x, row.y + WINDOW_HEIGHT - WINDOW_SILL_HEIGHT),
                Vec2::new(WINDOW_WIDTH, WINDOW_SILL_HEIGHT),
                sill,
            );
        }
    }
}

/// Blink slot: hidden on even 100 ms slots while invulnerable
fn player_hidden(player: &Player, now_ms: f64) -> bool {
    player.is_invulnerable(now_ms) && (now_ms / BLINK_SLOT_MS).floor() as i64 % 2 == 0
}

fn draw_player(list: &mut DrawList, player: &Player, now_ms: f64) {
    if player_hidden(player, now_ms) {
        return;
    }

    let color = colors::PLAYER;
    let Vec2 { x, y } = player.pos;
    let Vec2 { x: w, y: h } = player.size;
    let cx = x + w / 2.0;

    // Head
    list.fill_circle(Vec2::new(cx, y + 10.0), 8.0, color);
    // Body
    list.fill_rect(Vec2::new(cx - 4.0, y + 15.0), Vec2::new(8.0, 20.0), color);

    let swing = player.anim_phase.sin() * LIMB_SWING;

    // Arms
    list.stroke_line(
        Vec2::new(cx - 4.0, y + 20.0),
        Vec2::new(x, y + 5.0 + swing),
        LIMB_WIDTH,
        color,
    );
    list.stroke_line(
        Vec2::new(cx + 4.0, y + 20.0),
        Vec2::new(x + w, y + 5.0 - swing),
        LIMB_WIDTH,
        color,
    );
    // Legs
    list.stroke_line(
        Vec2::new(cx - 2.0, y + 35.0),
        Vec2::new(x, y + h - 5.0 - swing),
        LIMB_WIDTH,
        color,
    );
    list.stroke_line(
        Vec2::new(cx + 2.0, y + 35.0),
        Vec2::new(x + w, y + h - 5.0 + swing),
        LIMB_WIDTH,
        color,
    );
}

fn debris_outline(s: f32) -> [Vec2; 4] {
    [
        Vec2::new(-s / 2.0, -s / 2.0),
        Vec2::new(s / 2.0, -s / 3.0),
        Vec2::new(s / 3.0, s / 2.0),
        Vec2::new(-s / 2.0, s / 3.0),
    ]
}

fn shard_outline(s: f32) -> [Vec2; 3] {
    [
        Vec2::new(0.0, -s / 2.0),
        Vec2::new(s / 2.0, s / 2.0),
        Vec2::new(-s / 2.0, 0.0),
    ]
}

fn box_outline(min: Vec2, size: Vec2) -> [Vec2; 4] {
    [
        min,
        min + Vec2::new(size.x, 0.0),
        min + size,
        min + Vec2::new(0.0, size.y),
    ]
}

/// Local shape points rotated about and moved to `center`
fn place_rotated(center: Vec2, rotation: Vec2, points: &[Vec2]) -> Vec<Vec2> {
    points.iter().map(|&p| center + rotation.rotate(p)).collect()
}

fn draw_obstacle(list: &mut DrawList, obstacle: &Obstacle, theme: Theme) {
    let s = obstacle.size;
    let center = obstacle.pos + Vec2::splat(s / 2.0);
    let rotation = Vec2::from_angle(obstacle.rotation);
    let place = |points: &[Vec2]| place_rotated(center, rotation, points);

    let tint = match (theme, obstacle.tint) {
        (Theme::Light, Some(index)) => {
            let palette = &colors::LIGHT_OBSTACLE_PALETTE;
            Some(palette[index as usize % palette.len()])
        }
        _ => None,
    };

    if let Some(color) = tint {
        let shape = match obstacle.kind {
            ObstacleKind::Debris => place(&debris_outline(s)[..]),
            ObstacleKind::Glass => place(&shard_outline(s)[..]),
            ObstacleKind::Pot => place(&box_outline(Vec2::splat(-s / 2.0), Vec2::splat(s))[..]),
        };
        list.fill_polygon(&shape, color);
        return;
    }

    match obstacle.kind {
        ObstacleKind::Debris => list.fill_polygon(&place(&debris_outline(s)[..]), colors::DEBRIS),
        ObstacleKind::Glass => {
            let shard = place(&shard_outline(s)[..]);
            list.fill_polygon(&shard, colors::GLASS);
            list.stroke_outline(&shard, 1.0, colors::GLASS_EDGE);
        }
        ObstacleKind::Pot => {
            let pot = box_outline(Vec2::splat(-s / 3.0), Vec2::splat(s * 0.6));
            list.fill_polygon(&place(&pot[..]), colors::POT);
            list.fill_half_disc(
                center + rotation.rotate(Vec2::new(0.0, -s / 3.0)),
                s / 3.0,
                rotation.rotate(Vec2::NEG_Y),
                colors::PLANT,
            );
        }
    }
}

fn draw_item(list: &mut DrawList, item: &Item) {
    let origin = item.pos;
    let at = |x: f32, y: f32| origin + Vec2::new(x, y);
    let coin = at(15.0, 15.0);

    match item.kind {
        ItemKind::Heart => {
            list.fill_circle(at(9.0, 11.0), 7.0, colors::HEART);
            list.fill_circle(at(21.0, 11.0), 7.0, colors::HEART);
            list.fill_polygon(
                &[at(2.5, 13.0), at(27.5, 13.0), at(15.0, 27.0)],
                colors::HEART,
            );
        }
        ItemKind::Score => {
            draw_coin(list, coin, colors::SCORE_COIN);
            // Dollar sign
            list.stroke_polyline(
                &[
                    at(19.0, 10.5),
                    at(12.0, 10.5),
                    at(11.0, 13.0),
                    at(19.0, 17.0),
                    at(18.0, 19.5),
                    at(11.0, 19.5),
                ],
                MARK_WIDTH,
                colors::ITEM_MARK,
            );
            list.stroke_line(at(15.0, 7.5), at(15.0, 22.5), MARK_WIDTH, colors::ITEM_MARK);
        }
        ItemKind::Speed => {
            draw_coin(list, coin, colors::SPEED_COIN);
            list.stroke_polyline(
                &[at(9.0, 18.0), at(15.0, 11.0), at(21.0, 18.0)],
                3.0,
                colors::ITEM_MARK,
            );
        }
        ItemKind::Warp => {
            list.fill_polygon(
                &[at(15.0, 0.0), at(30.0, 15.0), at(15.0, 30.0), at(0.0, 15.0)],
                colors::WARP,
            );
            // Question mark
            list.stroke_polyline(
                &[
                    at(11.0, 11.0),
                    at(13.0, 8.0),
                    at(17.0, 8.0),
                    at(19.0, 11.0),
                    at(15.0, 15.0),
                    at(15.0, 18.0),
                ],
                MARK_WIDTH,
                colors::ITEM_MARK,
            );
            list.fill_circle(at(15.0, 22.0), 1.5, colors::ITEM_MARK);
        }
    }
}

fn draw_coin(list: &mut DrawList, center: Vec2, color: [f32; 4]) {
    list.fill_circle(center, GLOW_RADIUS, colors::with_alpha(color, GLOW_ALPHA));
    list.fill_circle(center, COIN_RADIUS, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameMode;

    fn playing_state(theme: Theme) -> GameState {
        let mut state = GameState::new(5, Vec2::new(400.0, 700.0));
        state.theme = theme;
        state.start(GameMode::Challenge);
        state
    }

    fn count_color(list: &DrawList, color: [f32; 4]) -> usize {
        list.vertices().iter().filter(|v| v.color == color).count()
    }

    fn obstacle(kind: ObstacleKind, tint: Option<u8>) -> Obstacle {
        Obstacle {
            kind,
            pos: Vec2::new(100.0, 100.0),
            size: 40.0,
            speed_offset: 2.0,
            rotation: 0.7,
            rot_speed: 0.01,
            tint,
            processed: false,
        }
    }

    #[test]
    fn test_background_windows() {
        let state = playing_state(Theme::Light);
        let list = build_scene(&state, 0.0);
        let rows = state.windows.len();
        // Pane + sill per window, 6 vertices each
        assert_eq!(count_color(&list, colors::WINDOW_LIGHT), rows * 4 * 6);
        assert_eq!(count_color(&list, colors::SILL_LIGHT), rows * 4 * 6);

        // First window sits one gap in: (400 - 160) / 5
        let first = list.vertices()[0].position;
        assert_eq!(first, [48.0, 0.0]);
    }

    #[test]
    fn test_scene_is_deterministic() {
        let mut state = playing_state(Theme::Dark);
        state.obstacles.push(obstacle(ObstacleKind::Pot, None));
        state.items.push(Item {
            kind: ItemKind::Warp,
            pos: Vec2::new(50.0, 60.0),
            size: Vec2::splat(ITEM_SIZE),
        });
        assert_eq!(build_scene(&state, 1234.0), build_scene(&state, 1234.0));
        assert_eq!(build_scene(&state, 1234.0).len() % 3, 0);
    }

    #[test]
    fn test_player_blinks_while_invulnerable() {
        let mut state = playing_state(Theme::Light);
        state.player.invulnerable_until = 1000.0;

        // floor(200 / 100) is even: hidden
        assert_eq!(count_color(&build_scene(&state, 200.0), colors::PLAYER), 0);
        // Odd slot: drawn
        assert!(count_color(&build_scene(&state, 150.0), colors::PLAYER) > 0);
        // Window over: always drawn
        assert!(count_color(&build_scene(&state, 1200.0), colors::PLAYER) > 0);
    }

    #[test]
    fn test_damage_flash_overlay_is_last() {
        let mut state = playing_state(Theme::Light);
        state.damage_flash_until = 500.0;

        let flashing = build_scene(&state, 100.0);
        let last = flashing.vertices()[flashing.len() - 1];
        assert_eq!(last.color, colors::DAMAGE_FLASH);

        let after = build_scene(&state, 500.0);
        assert_eq!(count_color(&after, colors::DAMAGE_FLASH), 0);
    }

    #[test]
    fn test_tint_only_in_light_theme() {
        let mut state = playing_state(Theme::Light);
        state.obstacles.push(obstacle(ObstacleKind::Debris, Some(2)));
        let tinted = colors::LIGHT_OBSTACLE_PALETTE[2];
        assert_eq!(count_color(&build_scene(&state, 0.0), tinted), 6);

        state.theme = Theme::Dark;
        let dark = build_scene(&state, 0.0);
        assert_eq!(count_color(&dark, tinted), 0);
        assert_eq!(count_color(&dark, colors::DEBRIS), 6);
    }

    #[test]
    fn test_dark_pot_has_plant() {
        let mut state = playing_state(Theme::Dark);
        state.obstacles.push(obstacle(ObstacleKind::Pot, None));
        let list = build_scene(&state, 0.0);
        assert_eq!(count_color(&list, colors::POT), 6);
        assert!(count_color(&list, colors::PLANT) > 0);
    }

    #[test]
    fn test_clear_color_per_theme() {
        assert_ne!(clear_color(Theme::Light), clear_color(Theme::Dark));
    }
}
