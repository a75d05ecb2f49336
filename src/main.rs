//! Tank Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use tank_arena::consts::*;
    use tank_arena::renderer::CanvasRenderer;
    use tank_arena::sim::{GamePhase, GameState, TickInput, spawn_wave, tick};
    use tank_arena::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        settings: Settings,
        highscores: HighScores,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Currently held keys, folded into a movement axis each frame
        keys: HashSet<String>,
        /// Active touch steering; wins over the keyboard while present
        touch_axis: Option<Vec2>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for high score submission
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                renderer: None,
                settings: Settings::load(),
                highscores: HighScores::load(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                keys: HashSet::new(),
                touch_axis: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Playing,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            // Touch steering wins over the keyboard while a finger is down
            self.input.move_axis = self
                .touch_axis
                .unwrap_or_else(|| key_axis(&self.keys));

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire = false;
                self.input.pause = false;
                self.input.skip_level = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Submit the run to the leaderboard once, when it ends
            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::GameOver {
                    if let Some(rank) = self.highscores.add_score(
                        self.state.score,
                        self.state.level,
                        js_sys::Date::now(),
                    ) {
                        log::info!("New high score, rank {}", rank);
                        self.highscores.save();
                    }
                }
                self.last_phase = phase;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref renderer) = self.renderer {
                if let Err(e) = renderer.render(&self.state) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("lives") {
                el.set_text_content(Some(&self.state.lives().to_string()));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                } else {
                    el.set_text_content(Some(""));
                }
            }

            // Show/hide pause menu
            if let Some(el) = document.get_element_by_id("pause-menu") {
                if self.state.phase == GamePhase::Paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                    if let Some(level_el) = document.get_element_by_id("final-level") {
                        level_el.set_text_content(Some(&self.state.level.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Reset game state for a fresh run
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            spawn_wave(&mut self.state);
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.touch_axis = None;
            self.last_phase = GamePhase::Playing;
        }
    }

    /// Fold held keys into a movement axis
    fn key_axis(keys: &HashSet<String>) -> Vec2 {
        let down = |k: &str| keys.contains(k);
        let mut axis = Vec2::ZERO;
        if down("ArrowUp") || down("w") || down("W") {
            axis.y -= 1.0;
        }
        if down("ArrowDown") || down("s") || down("S") {
            axis.y += 1.0;
        }
        if down("ArrowLeft") || down("a") || down("A") {
            axis.x -= 1.0;
        }
        if down("ArrowRight") || down("d") || down("D") {
            axis.x += 1.0;
        }
        axis
    }

    /// Convert a touch position into a steering axis: deflection from the
    /// canvas center, clamped to unit length
    fn touch_axis_at(canvas: &HtmlCanvasElement, x: f32, y: f32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let center = Vec2::new(
            rect.left() as f32 + rect.width() as f32 / 2.0,
            rect.top() as f32 + rect.height() as f32 / 2.0,
        );
        let half = Vec2::new(rect.width() as f32 / 2.0, rect.height() as f32 / 2.0);
        ((Vec2::new(x, y) - center) / half).clamp_length_max(1.0)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tank Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // The arena is a fixed 800x600; CSS handles display scaling
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            let renderer = CanvasRenderer::new(&canvas).expect("failed to create renderer");
            g.renderer = Some(renderer);
            spawn_wave(&mut g.state);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Tank Arena running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        g.input.fire = true;
                    }
                    "Escape" => g.input.pause = true,
                    "+" | "=" => g.input.skip_level = true, // Debug: skip to next level
                    key @ ("ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight") => {
                        event.prevent_default();
                        g.keys.insert(key.to_string());
                    }
                    key => {
                        g.keys.insert(key.to_string());
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.remove(event.key().as_str());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if !game.borrow().settings.touch_controls {
            return;
        }

        // Touch start: fire and begin steering
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.input.fire = true;
                if let Some(touch) = event.touches().get(0) {
                    g.touch_axis = Some(touch_axis_at(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    ));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: steer
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().touch_axis = Some(touch_axis_at(
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    ));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: stop steering when the last finger lifts
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    game.borrow_mut().touch_axis = None;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tank_arena::consts::SIM_DT;
    use tank_arena::sim::{GameState, TickInput, spawn_wave, tick};

    env_logger::init();
    log::info!("Tank Arena (native) starting...");
    log::info!("Run with `trunk serve` for the playable web version");

    // Headless smoke run: ten simulated seconds of a right-strafing,
    // trigger-happy player against the first wave
    let mut state = GameState::new(0xC0FFEE);
    spawn_wave(&mut state);

    let input = TickInput {
        move_axis: glam::Vec2::new(1.0, 0.0),
        fire: true,
        ..Default::default()
    };
    for _ in 0..600 {
        tick(&mut state, &input, SIM_DT);
    }

    log::info!(
        "10s simulated: phase {:?}, level {}, score {}, {} enemies, {} bullets in flight",
        state.phase,
        state.level,
        state.score,
        state.enemies.len(),
        state.bullets.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
