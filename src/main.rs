//! Sky Climber entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use sky_climber::highscores::{format_date, format_score};
    use sky_climber::persistence::LocalStorage;
    use sky_climber::platform::{self, Action, Key};
    use sky_climber::renderer::{RenderState, build_scene, clear_color};
    use sky_climber::sim::{GameEvent, GameMode, GamePhase, TickInput};
    use sky_climber::{Game, HudStats, ResultSummary, Theme};

    const TOUCH_BUTTONS: [&str; 4] = ["btn-up", "btn-down", "btn-left", "btn-right"];

    /// Browser-side session: the game plus everything the page owns
    struct App {
        game: Game<LocalStorage>,
        render_state: Option<RenderState>,
        input: TickInput,
        /// Last HUD written to the DOM
        hud: Option<HudStats>,
        /// Phase the screens were last laid out for
        shown_phase: Option<GamePhase>,
    }

    impl App {
        fn new(seed: u64, viewport: Vec2) -> Self {
            Self {
                game: Game::new(LocalStorage::open(), seed, viewport),
                render_state: None,
                input: TickInput::default(),
                hud: None,
                shown_phase: None,
            }
        }

        /// One animation frame: step, then draw, then sync the DOM
        fn frame(&mut self, document: &Document) {
            let now = platform::now_ms();
            let events = self.game.frame(&self.input, now);

            for event in &events {
                if let GameEvent::RunEnded { mode, outcome, score } = event {
                    show_result(document, &self.game.result_summary(*mode, *outcome, *score));
                }
            }

            self.render(now);
            self.sync_screens(document);
            self.update_hud(document);
        }

        fn render(&mut self, now: f64) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let state = &self.game.state;
            let scene = build_scene(state, now);
            match render_state.render(scene.vertices(), state.viewport, clear_color(state.theme)) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Show the overlay matching the current phase
        fn sync_screens(&mut self, document: &Document) {
            let phase = self.game.state.phase;
            if self.shown_phase == Some(phase) {
                return;
            }
            self.shown_phase = Some(phase);

            set_hidden(document, "start-screen", phase != GamePhase::Start);
            set_hidden(document, "hud", phase != GamePhase::Playing);
            set_hidden(document, "controls", phase != GamePhase::Playing);
            set_hidden(
                document,
                "result-screen",
                !matches!(phase, GamePhase::GameOver | GamePhase::GameClear),
            );
            set_hidden(document, "ranking-screen", phase != GamePhase::Ranking);

            if phase == GamePhase::Playing {
                let challenge = self.game.state.mode == GameMode::Challenge;
                set_hidden(document, "hud-distance", challenge);
                set_hidden(document, "hud-score", !challenge);
                set_hidden(document, "hud-best", !challenge);
            }
            if phase == GamePhase::Ranking {
                self.fill_rankings(document);
            }
            if phase != GamePhase::Playing {
                // Keys held when the run ended must not leak into the next one
                self.input.release_all();
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let hud = self.game.hud();
            if self.hud == Some(hud) {
                return;
            }
            self.hud = Some(hud);

            set_text(document, "#hud-distance .hud-value", &format!("{}m", hud.distance));
            set_text(document, "#hud-score .hud-value", &hud.challenge_score.to_string());
            set_text(
                document,
                "#hud-best .hud-value",
                &hud.best_challenge_score.to_string(),
            );
            set_text(
                document,
                "#hud-lives .hud-value",
                &format!("{}/{}", hud.lives, hud.max_lives),
            );
            set_text(document, "#hud-speed .hud-value", &hud.speed.to_string());
        }

        /// Rebuild both ranking lists
        fn fill_rankings(&self, document: &Document) {
            let now = platform::now_ms();
            for mode in GameMode::ALL {
                let id = format!("ranking-{}", mode.as_str().to_lowercase());
                let Some(list) = document.get_element_by_id(&id) else {
                    continue;
                };
                list.set_text_content(None);

                let scores = self.game.ranking(mode);
                if scores.is_empty() {
                    append_line(document, &list, "No records yet");
                    continue;
                }
                for (i, entry) in scores.entries.iter().enumerate() {
                    let line = format!(
                        "{}. {}  {}  ({})",
                        i + 1,
                        entry.name,
                        format_score(mode, entry.score),
                        format_date(entry.timestamp, now)
                    );
                    append_line(document, &list, &line);
                }
            }
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let (viewport, width, height) = canvas_size(canvas, dpr);
            self.game.resize(viewport);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn append_line(document: &Document, list: &Element, text: &str) {
        if let Ok(li) = document.create_element("li") {
            li.set_text_content(Some(text));
            let _ = list.append_child(&li);
        }
    }

    fn show_result(document: &Document, summary: &ResultSummary) {
        set_text(document, "#result-title", summary.title);
        set_text(document, "#result-score", &summary.score);
        if let Some(best) = &summary.best {
            set_text(document, "#result-best", best);
        }
        set_hidden(document, "result-best", summary.best.is_none());
    }

    /// Logical viewport (CSS px) and surface size (device px)
    fn canvas_size(canvas: &HtmlCanvasElement, dpr: f64) -> (Vec2, u32, u32) {
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Vec2::new(client_w as f32, client_h as f32), width, height)
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, Box<dyn std::error::Error>> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        Ok(RenderState::new(surface, &adapter, width, height).await?)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Sky Climber starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let (viewport, width, height) = canvas_size(&canvas, dpr);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, viewport)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let a = app.borrow();
            apply_theme(&document, a.game.settings.theme);
            if let Some(input) = document
                .get_element_by_id("player-name")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_value(&a.game.player_name);
            }
        }

        // Without a GPU the game still runs, it just draws nothing
        match init_renderer(&canvas, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        setup_keyboard(app.clone())?;
        setup_touch_buttons(&document, app.clone());
        setup_menu_buttons(&document, app.clone());
        setup_resize(&canvas, app.clone())?;

        request_animation_frame(app);

        log::info!("Sky Climber running!");
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if let Some(key) = Key::from_key_name(&event.key()) {
                    if a.game.state.phase == GamePhase::Playing {
                        event.prevent_default();
                    }
                    a.input.set_key(key, true);
                }
                if let Some(action) = Action::from_key_code(&event.code()) {
                    if a.game.handle_action(action) {
                        event.prevent_default();
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    app.borrow_mut().input.set_key(key, false);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Focus lost: keyup never arrives
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().input.release_all();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_touch_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for id in TOUCH_BUTTONS {
            let (Some(btn), Some(key)) = (document.get_element_by_id(id), Key::from_button_id(id))
            else {
                continue;
            };

            for (event_name, pressed) in [
                ("mousedown", true),
                ("touchstart", true),
                ("mouseup", false),
                ("mouseleave", false),
                ("touchend", false),
            ] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    app.borrow_mut().input.set_key(key, pressed);
                });
                let _ = btn
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Wire a click handler to an element, if present
    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for (id, mode) in [
            ("mission-btn", GameMode::Mission),
            ("challenge-btn", GameMode::Challenge),
        ] {
            let app = app.clone();
            on_click(document, id, move || {
                app.borrow_mut().game.select_mode(mode);
            });
        }

        {
            let app = app.clone();
            on_click(document, "ranking-btn", move || {
                app.borrow_mut().game.show_ranking();
            });
        }

        {
            let app = app.clone();
            on_click(document, "ranking-back-btn", move || {
                app.borrow_mut().game.return_to_start();
            });
        }

        // Click/tap anywhere on the result screen restarts
        {
            let app = app.clone();
            on_click(document, "result-screen", move || {
                app.borrow_mut().game.handle_action(Action::Restart);
            });
        }

        {
            let app = app.clone();
            on_click(document, "theme-btn", move || {
                let mut a = app.borrow_mut();
                let theme = match a.game.settings.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Light,
                };
                a.game.set_theme(theme);
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    apply_theme(&document, theme);
                }
            });
        }

        on_click(document, "name-save-btn", move || {
            let Some(input) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("player-name"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let mut a = app.borrow_mut();
            if !a.game.set_player_name(&input.value()) {
                input.set_value(&a.game.player_name);
            }
        });
    }

    fn apply_theme(document: &Document, theme: Theme) {
        if let Some(body) = document.body() {
            let _ = body
                .class_list()
                .toggle_with_force("dark-theme", theme == Theme::Dark);
        }
        set_text(document, "#theme-btn", theme.as_str());
    }

    fn setup_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            app.borrow_mut().resize(&canvas, dpr);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            app.borrow_mut().frame(&document);
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot runs against an in-memory store.
/// Usage: `sky-climber [seed] [mission|challenge] [light|dark]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use sky_climber::Game;
    use sky_climber::consts::TICKS_PER_SECOND;
    use sky_climber::highscores::{format_date, format_score};
    use sky_climber::persistence::MemoryStore;
    use sky_climber::settings::Theme;
    use sky_climber::sim::{GameEvent, GameMode, GamePhase, RunOutcome};

    env_logger::init();
    log::info!("Sky Climber (native) starting...");
    log::info!("Rendering needs a browser canvas; running a headless demo instead");

    const MAX_SECONDS: u64 = 180;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    let modes: Vec<GameMode> = match args.get(1) {
        Some(arg) => match GameMode::from_str(arg) {
            Some(mode) => vec![mode],
            None => {
                log::warn!("Unknown mode {:?}, running both", arg);
                GameMode::ALL.to_vec()
            }
        },
        None => GameMode::ALL.to_vec(),
    };

    let mut game = Game::new(MemoryStore::new(), seed, Vec2::new(400.0, 700.0));
    if let Some(arg) = args.get(2) {
        match Theme::from_str(arg) {
            Some(theme) => game.set_theme(theme),
            None => log::warn!("Unknown theme {:?}, keeping {}", arg, game.settings.theme.as_str()),
        }
    }
    println!(
        "Seed {}, theme {}, player {}",
        game.state.seed,
        game.settings.theme.as_str(),
        game.player_name
    );

    let frame_ms = 1000.0 / TICKS_PER_SECOND as f64;
    let mut now = 0.0;

    for &mode in &modes {
        game.select_mode(mode);
        let max_ticks = MAX_SECONDS * TICKS_PER_SECOND as u64;
        let mut hits = 0;

        while game.state.phase == GamePhase::Playing && game.state.time_ticks < max_ticks {
            let input = autopilot::steer(&game.state);
            now += frame_ms;
            for event in game.frame(&input, now) {
                if let GameEvent::PlayerDamaged { .. } = event {
                    hits += 1;
                }
            }
        }

        let hud = game.hud();
        println!(
            "{:?}: {:?} after {} ticks, distance {}m, score {}, hits {}",
            mode, hud.phase, game.state.time_ticks, hud.distance, hud.challenge_score, hits
        );
        if game.state.phase == GamePhase::Playing {
            // Time limit reached
            game.state.end_run(RunOutcome::GameOver);
            game.frame(&Default::default(), now);
        }
        game.return_to_start();
    }

    for &mode in &modes {
        println!("{} ranking:", mode.as_str());
        for (i, entry) in game.ranking(mode).entries.iter().enumerate() {
            println!(
                "  {}. {} {} ({})",
                i + 1,
                entry.name,
                format_score(mode, entry.score),
                format_date(entry.timestamp, now)
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use sky_climber::sim::{GameState, Rect, TickInput};

    /// How far above the player falling obstacles are considered
    const LOOKAHEAD: f32 = 160.0;
    const MARGIN: f32 = 12.0;

    /// Dodge the nearest threatening obstacle, otherwise drift toward an item
    pub fn steer(state: &GameState) -> TickInput {
        let player = state.player.rect();
        let center = player.center().x;
        let mut input = TickInput::default();

        let threat = state
            .obstacles
            .iter()
            .map(|o| o.rect())
            .filter(|r| in_lane(&player, r) && r.bottom() > player.top() - LOOKAHEAD)
            .filter(|r| r.top() < player.bottom())
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));

        if let Some(obstacle) = threat {
            let room_left = player.left() > MARGIN;
            let room_right = player.right() < state.viewport.x - MARGIN;
            let go_left = obstacle.center().x > center;
            if (go_left && room_left) || !room_right {
                input.arrow_left = true;
            } else {
                input.arrow_right = true;
            }
            return input;
        }

        if let Some(item) = state.items.first() {
            let target = item.rect().center().x;
            input.arrow_left = target < center - MARGIN;
            input.arrow_right = target > center + MARGIN;
        }
        input
    }

    fn in_lane(player: &Rect, obstacle: &Rect) -> bool {
        obstacle.right() > player.left() - MARGIN && obstacle.left() < player.right() + MARGIN
    }
}
