//! Snack Dash entry point
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
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use snack_dash::{BoostTrigger, GameConfig};
    use snack_dash::platform::{FrameClock, KeyState, canvas_to_field, fit_display_size};
    use snack_dash::sim::{GameEvent, GameState};

    // Hands each frame's snapshot to the page's renderer, if it registered one
    #[wasm_bindgen(inline_js = "
        export function draw_frame(json) {
            if (typeof window.snackDashDraw === 'function') {
                window.snackDashDraw(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn draw_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        keys: KeyState,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        fn new(state: GameState, canvas: HtmlCanvasElement) -> Self {
            Self {
                state,
                clock: FrameClock::new(),
                keys: KeyState::new(),
                canvas,
            }
        }

        fn field_size(&self) -> Vec2 {
            Vec2::new(self.state.config.field_width, self.state.config.field_height)
        }

        /// Reset and begin a fresh run
        fn start_run(&mut self) {
            self.state.reset();
            self.state.start();
            self.clock.restart();
            self.keys.clear();
            if let Some(overlay) = document().and_then(|d| overlay(&d)) {
                let _ = overlay.style().set_property("display", "none");
            }
        }

        /// Run one simulation step. Returns the final score if the run ended.
        fn update(&mut self, time: f64) -> Option<u32> {
            let dt = self.clock.delta(time);
            if !self.state.is_running() {
                return None;
            }

            let input = self.keys.take_input();
            let outcome = self.state.advance(dt, &input);

            let mut game_over = None;
            for event in &outcome.events {
                match event {
                    GameEvent::GameOver { score } => game_over = Some(*score),
                    other => log::debug!("{:?}", other),
                }
            }
            game_over
        }

        /// Pass the current snapshot to the page renderer
        fn render(&self) {
            match serde_json::to_string(&self.state.snapshot()) {
                Ok(json) => draw_frame(&json),
                Err(e) => log::warn!("Snapshot serialization failed: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else {
                return;
            };
            let hud = self.state.hud();
            set_text(&document, "score", &format!("Score: {}", hud.score));
            set_text(&document, "lives", &format!("Lives: {}", hud.lives));
            set_text(&document, "power", &hud.power.to_string());
        }

        /// First touch point in field coordinates
        fn touch_to_field(&self, event: &TouchEvent) -> Option<Vec2> {
            let touch = event.touches().get(0)?;
            let rect = self.canvas.get_bounding_client_rect();
            let client = Vec2::new(
                touch.client_x() as f32 - rect.left() as f32,
                touch.client_y() as f32 - rect.top() as f32,
            );
            let display = Vec2::new(rect.width() as f32, rect.height() as f32);
            Some(canvas_to_field(client, display, self.field_size()))
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn overlay(document: &Document) -> Option<HtmlElement> {
        document.get_element_by_id("overlay")?.dyn_into().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Snack Dash starting...");

        let Some(document) = document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game canvas found");
            return;
        };

        let mut config = GameConfig::load_or_default(canvas.get_attribute("data-config").as_deref());
        config.field_width = canvas.width() as f32;
        config.field_height = canvas.height() as f32;
        // `data-boost="hold"` switches to level-triggered boost without a full config
        if let Some(trigger) = canvas
            .get_attribute("data-boost")
            .as_deref()
            .and_then(BoostTrigger::from_str)
        {
            config.boost_trigger = trigger;
        }
        let seed = config.seed.unwrap_or(js_sys::Date::now() as u64);
        log::info!(
            "Game initialized with seed: {}, boost trigger: {}",
            seed,
            config.boost_trigger.as_str()
        );
        let state = GameState::seeded(config, seed);

        let game = Rc::new(RefCell::new(Game::new(state, canvas.clone())));

        setup_input_handlers(&canvas, game.clone());
        bind_start_button(&document, game.clone());
        setup_resize(&canvas, game.borrow().field_size());
        game.borrow().update_hud();

        request_animation_frame(game);

        log::info!("Snack Dash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.key()) {
                    // Arrows and space would otherwise scroll the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur - drop held keys so nothing sticks
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - new run, player jumps to the finger
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.start_run();
                if let Some(pos) = g.touch_to_field(&event) {
                    g.keys.set_pointer(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if let Some(pos) = g.touch_to_field(&event) {
                    g.keys.set_pointer(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn bind_start_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().start_run();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn show_game_over(game: Rc<RefCell<Game>>, score: u32) {
        let Some(document) = document() else {
            return;
        };
        if let Some(overlay) = overlay(&document) {
            let _ = overlay.style().set_property("display", "flex");
            overlay.set_inner_html(&format!(
                "<h2>Game Over</h2><p>Your score: {score}</p><button id=\"start\">Play Again</button>"
            ));
        }
        bind_start_button(&document, game);
    }

    fn setup_resize(canvas: &HtmlCanvasElement, field: Vec2) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let resize = move || {
            let Some(width) = web_sys::window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|v| v.as_f64())
            else {
                return;
            };
            let size = fit_display_size(field, width as f32);
            let style = canvas.style();
            let _ = style.set_property("width", &format!("{}px", size.x));
            let _ = style.set_property("height", &format!("{}px", size.y));
        };
        resize();

        let closure = Closure::<dyn FnMut()>::new(resize);
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let game_over = {
            let mut g = game.borrow_mut();
            let game_over = g.update(time);
            g.render();
            g.update_hud();
            game_over
        };

        if let Some(score) = game_over {
            log::info!("Game over, score {}", score);
            show_game_over(game.clone(), score);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use snack_dash::GameConfig;
    use snack_dash::sim::{GameEvent, GameState, TickInput};

    /// 60 Hz frame
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Simple bot: sidestep obstacles about to land, otherwise chase the
    /// lowest snack
    pub fn autopilot(state: &GameState) -> TickInput {
        let player = state.player.rect;
        let centre = player.pos.x + player.size.x / 2.0;

        let threat = state
            .obstacles
            .iter()
            .filter(|o| o.rect.bottom() > player.pos.y - 120.0 && o.rect.pos.y < player.bottom())
            .filter(|o| o.rect.right() + 16.0 > player.pos.x && o.rect.pos.x - 16.0 < player.right())
            .max_by(|a, b| a.rect.pos.y.total_cmp(&b.rect.pos.y));
        if let Some(obstacle) = threat {
            let obstacle_centre = obstacle.rect.pos.x + obstacle.rect.size.x / 2.0;
            let dx = if centre < obstacle_centre { -1 } else { 1 };
            return TickInput::new(dx, 0);
        }

        let target = state
            .snacks
            .iter()
            .max_by(|a, b| a.rect.pos.y.total_cmp(&b.rect.pos.y));
        match target {
            Some(snack) => {
                let snack_centre = snack.rect.pos.x + snack.rect.size.x / 2.0;
                let dx = if (snack_centre - centre).abs() < 4.0 {
                    0
                } else if snack_centre < centre {
                    -1
                } else {
                    1
                };
                TickInput::new(dx, 0)
            }
            None => TickInput::default(),
        }
    }

    /// How a headless session went
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RunSummary {
        pub frames: u32,
        pub score: u32,
        pub lives: u8,
        pub shield_saves: u32,
    }

    pub fn run(config: GameConfig) -> RunSummary {
        log::info!("Headless run, boost trigger: {}", config.boost_trigger.as_str());
        let mut state = GameState::new(config);
        state.reset();
        state.start();

        let mut frames = 0;
        let mut shield_saves = 0;
        while state.is_running() && frames < MAX_FRAMES {
            let input = autopilot(&state);
            let outcome = state.advance(FRAME_MS, &input);
            if outcome.has(&GameEvent::ShieldAbsorbed) {
                shield_saves += 1;
            }
            for event in &outcome.events {
                match event {
                    GameEvent::GameOver { score } => log::info!("Game over at frame {frames}, score {score}"),
                    other => log::debug!("frame {frames}: {other:?}"),
                }
            }
            frames += 1;
        }

        let hud = state.hud();
        println!(
            "Final score: {} (lives {}, {} shield saves, {:.1}s simulated)",
            hud.score,
            hud.lives,
            shield_saves,
            frames as f32 * FRAME_MS / 1000.0
        );
        RunSummary {
            frames,
            score: hud.score,
            lives: hud.lives,
            shield_saves,
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
use snack_dash::{BoostTrigger, GameConfig};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snack Dash (native) starting...");
    log::info!("Native mode runs a headless autoplay session - build for wasm32 to play in the browser");

    // Optional path to a JSON config file
    let json = std::env::args().nth(1).and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read config {path}: {e}");
            None
        }
    });
    let mut config = GameConfig::load_or_default(json.as_deref());

    // Optional boost trigger override: edge/press or level/hold
    if let Some(name) = std::env::args().nth(2) {
        match BoostTrigger::from_str(&name) {
            Some(trigger) => config.boost_trigger = trigger,
            None => log::warn!("Unknown boost trigger {name:?}, keeping {}", config.boost_trigger.as_str()),
        }
    }

    headless::run(config);
}
