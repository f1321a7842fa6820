//! Space Raider entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use space_raider::assets::{AssetManifest, Requirement, dom};
    use space_raider::audio::{AudioSink, WebAudio};
    use space_raider::renderer::RenderState;
    use space_raider::scene::{DrawCmd, Scene, TextRole};
    use space_raider::sim::{Steering, TickInput};
    use space_raider::{Flow, FrameController, FrameInput, Settings, StartupError};

    /// Ticks allowed per animation frame when the tab falls behind
    const MAX_CATCH_UP_TICKS: u32 = 4;

    /// Keyboard state between ticks, keyed by `KeyboardEvent.key`
    #[derive(Default)]
    struct Keys {
        held: HashSet<&'static str>,
        up: bool,
        down: bool,
        confirm: bool,
        escape: bool,
        close: bool,
    }

    /// Canonical name for a key the game uses
    fn game_key(key: &str) -> Option<&'static str> {
        match key {
            "ArrowUp" | "w" | "W" => Some("up"),
            "ArrowDown" | "s" | "S" => Some("down"),
            "ArrowLeft" | "a" | "A" => Some("left"),
            "ArrowRight" | "d" | "D" => Some("right"),
            " " => Some("fire"),
            "Enter" => Some("confirm"),
            "Escape" => Some("escape"),
            _ => None,
        }
    }

    impl Keys {
        /// Returns true when the key belongs to the game
        fn press(&mut self, key: &str, repeat: bool) -> bool {
            let Some(name) = game_key(key) else {
                return false;
            };
            if !repeat {
                match name {
                    "up" => self.up = true,
                    "down" => self.down = true,
                    "confirm" => self.confirm = true,
                    "escape" => self.escape = true,
                    _ => {}
                }
            }
            self.held.insert(name);
            true
        }

        fn release(&mut self, key: &str) {
            if let Some(name) = game_key(key) {
                self.held.remove(name);
            }
        }

        fn snapshot(&mut self) -> FrameInput {
            let input = FrameInput {
                keys: TickInput {
                    steering: Steering {
                        up: self.held.contains("up"),
                        down: self.held.contains("down"),
                        left: self.held.contains("left"),
                        right: self.held.contains("right"),
                    },
                    fire: self.held.contains("fire"),
                },
                up_pressed: self.up,
                down_pressed: self.down,
                confirm_pressed: self.confirm,
                escape_pressed: self.escape,
                close_requested: self.close,
            };
            self.up = false;
            self.down = false;
            self.confirm = false;
            self.escape = false;
            input
        }
    }

    /// Game instance holding all state
    struct Game {
        frames: FrameController,
        audio: WebAudio,
        render_state: RenderState,
        keys: Keys,
        document: Document,
        /// Wall time of the last tick (ms)
        last_tick: f64,
    }

    impl Game {
        /// Run every tick that is due, bounded by the catch-up limit
        fn update(&mut self, now: f64) -> Flow {
            let delay = self.frames.frame_delay_ms().max(1) as f64;
            let mut ticks = 0;
            while now - self.last_tick >= delay && ticks < MAX_CATCH_UP_TICKS {
                self.last_tick += delay;
                ticks += 1;
                let input = self.keys.snapshot();
                if self.frames.step(&input, now as u64, &mut self.audio) == Flow::Exit {
                    return Flow::Exit;
                }
            }
            // Drop the backlog rather than fast-forwarding after a stall
            if now - self.last_tick >= delay {
                self.last_tick = now;
            }
            Flow::Continue
        }

        /// Render the current frame
        fn render(&mut self, scene: &Scene) {
            match self.render_state.render(scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Copy the scene's text labels into the DOM overlay
        fn update_hud(&self, scene: &Scene) {
            let mut status = None;
            let mut lines: [Option<(&str, bool, bool)>; 4] = [None; 4];
            for cmd in &scene.commands {
                let DrawCmd::Text {
                    role,
                    text,
                    selected,
                    highlighted,
                    ..
                } = cmd
                else {
                    continue;
                };
                match role {
                    TextRole::Status => status = Some(text.as_str()),
                    TextRole::MenuLine(i) | TextRole::Banner(i) => {
                        if let Some(slot) = lines.get_mut(*i) {
                            *slot = Some((text.as_str(), *selected, *highlighted));
                        }
                    }
                }
            }

            if let Some(el) = self.document.get_element_by_id(dom::HUD_STATUS) {
                el.set_text_content(status);
                let _ = el.class_list().toggle_with_force("hidden", status.is_none());
            }

            let banner = scene
                .texts()
                .any(|(role, _)| matches!(role, TextRole::Banner(_)));
            if let Some(el) = self.document.get_element_by_id(dom::OVERLAY) {
                let classes = el.class_list();
                let _ = classes.toggle_with_force("hidden", lines.iter().all(Option::is_none));
                let _ = classes.toggle_with_force("banner", banner);
            }

            for (id, line) in dom::OVERLAY_LINES.iter().zip(lines) {
                let Some(el) = self.document.get_element_by_id(id) else {
                    continue;
                };
                let (text, selected, highlighted) = line.unwrap_or(("", false, false));
                el.set_text_content(Some(text));
                let classes = el.class_list();
                let _ = classes.toggle_with_force("selected", selected);
                let _ = classes.toggle_with_force("highlighted", highlighted);
            }
        }
    }

    fn missing(what: &str) -> StartupError {
        StartupError::MissingAssets(vec![what.to_string()])
    }

    pub async fn run() -> Result<(), StartupError> {
        log::info!("Space Raider starting...");

        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;

        AssetManifest::browser().verify(|req| match req {
            Requirement::DomElement(id) => document.get_element_by_id(id).is_some(),
            Requirement::TerminalSize { .. } => true,
        })?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(dom::CANVAS)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| missing("#canvas (not a canvas element)"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load()?;

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Gpu(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StartupError::Gpu(format!("failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;

        let now = js_sys::Date::now();
        let seed = now as u64;
        let mut audio = WebAudio::new(&settings);
        let mut frames = FrameController::new(settings, seed, now as u64);
        frames.start(&mut audio);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            frames,
            audio,
            render_state,
            keys: Keys::default(),
            document,
            last_tick: now,
        }));

        setup_input_handlers(&window, game.clone());
        setup_focus_handlers(&window, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Space Raider running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Browsers only start audio after a user gesture
                g.audio.resume();
                if g.keys.press(&event.key(), event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.release(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Keyup never arrives for keys held while the window loses focus
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.held.clear();
                log::info!("Window blurred, released held keys");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.close = true;
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let flow = {
            let mut g = game.borrow_mut();
            let flow = g.update(js_sys::Date::now());
            let scene = Scene::build(&g.frames);
            g.render(&scene);
            g.audio.update();
            g.update_hud(&scene);
            flow
        };

        if flow == Flow::Exit {
            log::info!("Game exited");
            return;
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
const LOG_FILE: &str = "space-raider.log";

/// The terminal UI owns stdout, so logs go to a file
#[cfg(not(target_arch = "wasm32"))]
fn init_logging() -> Result<(), space_raider::StartupError> {
    let file = std::fs::File::create(LOG_FILE)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| space_raider::StartupError::Logger(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    if let Err(e) = init_logging() {
        eprintln!("space-raider: {}", e);
        return ExitCode::FAILURE;
    }
    log::info!("Space Raider (native) starting...");

    match space_raider::Settings::load().and_then(space_raider::terminal::run) {
        Ok(()) => {
            log::info!("Space Raider exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("space-raider: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
