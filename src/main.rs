//! Long Cat entry point
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
    use web_sys::{HtmlCanvasElement, TouchEvent};

    use long_cat::audio::{AudioManager, SoundEffect};
    use long_cat::consts::*;
    use long_cat::input::{InputState, touch_buttons};
    use long_cat::levels::builtin_levels;
    use long_cat::renderer::frame::{board_extent, build_touch_pad, fade_overlay, select_extent};
    use long_cat::renderer::{RenderState, build_frame, build_level_select};
    use long_cat::scene::{Scene, SceneCommand, SceneManager};
    use long_cat::sim::{GameState, tick};
    use long_cat::{LevelData, Progress, Settings};

    /// Game instance holding all state
    struct Game {
        levels: Vec<LevelData>,
        state: Option<GameState>,
        scenes: SceneManager,
        progress: Progress,
        settings: Settings,
        input: InputState,
        audio: AudioManager,
        render_state: Option<RenderState>,
        /// Canvas size in CSS pixels
        viewport: Vec2,
        /// A touch was seen this session
        touch_seen: bool,
        last_time: f64,
        seed: u64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let levels = builtin_levels();
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                scenes: SceneManager::new(levels.len()),
                levels,
                state: None,
                progress: Progress::load(),
                settings,
                input: InputState::new(),
                audio,
                render_state: None,
                viewport: Vec2::ONE,
                touch_seen: false,
                last_time: 0.0,
                seed,
            }
        }

        /// Run one frame of scene flow and simulation
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);
            let buttons = self.input.snapshot();

            let commands = self.scenes.update(&buttons, &self.progress, dt);
            self.apply(commands);
            self.audio.update(dt);

            if self.scenes.gameplay_active() {
                if let Some(state) = self.state.as_mut() {
                    tick(state, &buttons.tick_input(), dt);
                }
            } else if let Some(state) = self.state.as_mut() {
                // Keep sparks alive under the fade
                state.particles.update(dt);
            }

            let events = self
                .state
                .as_mut()
                .map(GameState::drain_events)
                .unwrap_or_default();
            for event in &events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
                let commands = self.scenes.on_game_event(event, &mut self.progress);
                self.apply(commands);
            }
        }

        fn apply(&mut self, commands: Vec<SceneCommand>) {
            for command in commands {
                match command {
                    SceneCommand::StartLevel(index) => self.start_level(index),
                    SceneCommand::ExitLevel => self.state = None,
                    SceneCommand::SaveProgress => self.progress.save(),
                    SceneCommand::Toggle(toggle) => {
                        let on = self.settings.toggle(toggle);
                        log::info!("{:?} {}", toggle, if on { "on" } else { "off" });
                        self.audio.apply_settings(&self.settings);
                        self.settings.save();
                    }
                    SceneCommand::StartMusic => self.audio.start_music(),
                    SceneCommand::StopMusic => self.audio.stop_music(),
                    SceneCommand::Sound(effect) => self.audio.play(effect),
                }
            }
        }

        fn start_level(&mut self, index: usize) {
            let Some(data) = self.levels.get(index) else {
                log::warn!("No level {}", index);
                return;
            };
            self.seed = self.seed.wrapping_add(1);
            self.state = Some(GameState::new(index, data, self.seed));
        }

        /// Touch pad is drawn and hit-tested outside the title screen
        fn pad_visible(&self) -> bool {
            !matches!(self.scenes.scene(), Scene::Title)
                && self.settings.effective_touch_controls(self.touch_seen)
        }

        /// Render the current frame
        fn render(&mut self) {
            let (mut vertices, extent) = match (self.scenes.scene(), &self.state) {
                (Scene::Playing { .. }, Some(state)) => {
                    (build_frame(state, &self.settings), board_extent(state))
                }
                (Scene::LevelSelect { cursor }, _) => (
                    build_level_select(self.levels.len(), cursor, &self.progress),
                    select_extent(self.levels.len()),
                ),
                _ => (Vec::new(), glam::Vec2::ONE),
            };
            vertices.extend(fade_overlay(extent, self.scenes.fade_alpha()));
            let overlay = if self.pad_visible() {
                build_touch_pad(self.viewport, self.input.held())
            } else {
                Vec::new()
            };

            if let Some(ref mut render_state) = self.render_state {
                render_state.set_extent(extent);
                match render_state.render(&vertices, &overlay) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Show the DOM overlay for the current scene
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let scene = self.scenes.scene();
            let overlays = [
                ("title-screen", matches!(scene, Scene::Title)),
                ("level-select", matches!(scene, Scene::LevelSelect { .. })),
                ("hud", matches!(scene, Scene::Playing { .. })),
            ];
            for (id, visible) in overlays {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            }

            if let Some(state) = &self.state {
                if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                    el.set_text_content(Some(&(state.level_index + 1).to_string()));
                }
                if let Some(el) = document.query_selector("#hud-moves .hud-value").ok().flatten() {
                    el.set_text_content(Some(&state.moves.to_string()));
                }
            }
            if let Scene::LevelSelect { cursor } = scene {
                if let Some(el) = document.get_element_by_id("select-level") {
                    el.set_text_content(Some(&(cursor + 1).to_string()));
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Long Cat starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> found");
            return;
        };

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().viewport =
            Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match init_renderer(&instance, &canvas, width, height).await {
            Some(render_state) => game.borrow_mut().render_state = Some(render_state),
            None => log::error!("Rendering unavailable, running without graphics"),
        }

        setup_input_handlers(game.clone(), &canvas);

        request_animation_frame(game);

        log::info!("Long Cat running!");
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Option<RenderState> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| log::error!("Failed to create surface: {}", e))
            .ok()?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| log::error!("Failed to get adapter: {}", e))
            .ok()?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, glam::Vec2::ONE)
            .await
            .map_err(|e| log::error!("Failed to create device: {}", e))
            .ok()
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>, canvas: &HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Touches: every change recomputes the buttons under the fingers
        for name in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.touch_seen = true;

                let rect = canvas_clone.get_bounding_client_rect();
                g.viewport = Vec2::new(rect.width() as f32, rect.height() as f32);
                let touches = event.touches();
                let points: Vec<Vec2> = (0..touches.length())
                    .filter_map(|i| touches.get(i))
                    .map(|touch| {
                        Vec2::new(
                            touch.client_x() as f32 - rect.left() as f32,
                            touch.client_y() as f32 - rect.top() as f32,
                        )
                    })
                    .collect();
                let touched = touch_buttons(&points, g.viewport, g.pad_visible());
                g.input.set_touched(touched);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if event.repeat() {
                    return;
                }
                if g.input.key(&event.code(), true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.key(&event.code(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside): drop held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.clear();
                log::debug!("Input cleared (window blur)");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless replay: `long-cat [level] [moves]`
///
/// Moves are `U D L R`, `Z` for undo and `X` for reset.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use long_cat::consts::SIM_DT;
    use long_cat::levels::builtin_levels;
    use long_cat::sim::{GameEvent, GameState, TickInput, play_turn};

    env_logger::init();
    log::info!("Long Cat (native) starting...");

    let mut args = std::env::args().skip(1);
    let level_index = match args.next().map(|s| s.parse::<usize>()) {
        None => 0,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Invalid level number: {}", e);
            std::process::exit(2);
        }
    };
    let moves = args.next().unwrap_or_default();

    let levels = builtin_levels();
    let Some(data) = levels.get(level_index) else {
        eprintln!(
            "No level {} (there are {} levels)",
            level_index,
            levels.len()
        );
        std::process::exit(2);
    };

    let mut state = GameState::new(level_index, data, 0);
    println!("Level {}:\n{}", level_index + 1, state.to_ascii());

    let mut completed = false;
    for cmd in moves.chars() {
        let Some(input) = TickInput::from_command(cmd) else {
            log::warn!("Skipping unknown move {:?}", cmd);
            continue;
        };
        play_turn(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            log::debug!("{:?}", event);
            match event {
                GameEvent::Hurt => println!("{}: ouch, move undone", cmd),
                GameEvent::Blocked => println!("{}: blocked", cmd),
                GameEvent::LevelComplete { .. } => completed = true,
                _ => {}
            }
        }
        if completed {
            break;
        }
    }

    println!("{}", state.to_ascii());
    if completed {
        println!("Level complete in {} moves!", state.moves);
    } else {
        println!(
            "Not solved yet ({} moves, {} grow items left)",
            state.moves,
            state.grow_items().len()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
