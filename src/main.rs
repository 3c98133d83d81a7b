//! O Juízo dos Céus entry point
//!
//! The browser build wires DOM events, storage and WebGPU around a
//! [`Session`](juizo::Session). The native build runs a headless session
//! driven by the autopilot, which is handy for balance checks.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, PointerEvent};

    use juizo::camera::Camera;
    use juizo::consts::SIM_DT;
    use juizo::input::{Control, InputMapper, KeyboardBackend, RawInput, TouchBackend};
    use juizo::narrative::{Narrator, OfflineNarrative};
    use juizo::persistence::local::LocalStorageStore;
    use juizo::renderer::{RenderState, SceneOptions, build_scene};
    use juizo::roster::{self, Character};
    use juizo::{GameHooks, QualityPreset, Session, Settings, Tuning};

    const DEFAULT_PLAYER: &str = "guest";

    /// Mirrors outbound game events into the page
    struct DomHooks {
        document: Document,
        narrator: Narrator<OfflineNarrative>,
        boss: &'static str,
    }

    impl DomHooks {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn show(&self, id: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", "");
            }
        }
    }

    impl GameHooks for DomHooks {
        fn on_game_over(&mut self) {
            self.set_text("result-title", "Fim de Jogo");
            self.show("result");
        }

        fn on_victory(&mut self) {
            self.set_text("result-title", "Vitória");
            self.show("result");
        }

        fn on_collect_currency(&mut self, amount: u32) {
            self.set_text("hud-loot", &format!("+{amount}"));
        }

        fn on_checkpoint(&mut self, x: i32) {
            log::info!("Checkpoint at x={x}");
        }

        fn set_player_hp(&mut self, hp: i32) {
            self.set_text("hud-hp", &hp.to_string());
        }

        fn on_boss_encountered(&mut self) {
            let line = self.narrator.boss_challenge(self.boss);
            self.set_text("narration", &line);
        }
    }

    struct Game {
        session: Session<DomHooks, LocalStorageStore>,
        render_state: Option<RenderState>,
        camera: Camera,
        scene_options: SceneOptions,
        /// Used only to decide which keys swallow their browser default
        key_filter: KeyboardBackend,
        last_time: f64,
    }

    impl Game {
        fn new(document: &Document, settings: &Settings, player_id: &str, touch_device: bool) -> Self {
            let session = build_session(document, settings, player_id, touch_device);
            let character = Character::get(session.progress.character);
            Self {
                scene_options: SceneOptions::new(settings, character),
                session,
                render_state: None,
                camera: Camera::default(),
                key_filter: KeyboardBackend::new(settings.bindings.clone()),
                last_time: 0.0,
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.session.advance(dt);
            self.camera.follow(&self.session.state.player);

            if let Some(render_state) = self.render_state.as_mut() {
                let vertices = build_scene(&self.session.state, &self.camera, &self.scene_options);
                match render_state.render(&vertices) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of GPU memory"),
                    Err(e) => log::warn!("Render error: {e:?}"),
                }
            }
        }
    }

    fn build_session(
        document: &Document,
        settings: &Settings,
        player_id: &str,
        touch_device: bool,
    ) -> Session<DomHooks, LocalStorageStore> {
        let mut input = InputMapper::new().with_backend(Box::new(KeyboardBackend::new(settings.bindings.clone())));
        if settings.touch_mode.enabled(touch_device) {
            input.push(Box::new(TouchBackend::new()));
        }
        log::info!("Input backends: {:?}", input.backend_names());

        let hooks = DomHooks {
            document: document.clone(),
            narrator: Narrator::new(OfflineNarrative),
            boss: "",
        };
        let seed = js_sys::Date::now() as u64;
        let mut session = Session::load(player_id, LocalStorageStore::new(), input, hooks, seed, Tuning::default());
        session.apply_settings(settings);

        let chapter = roster::chapter(session.progress.chapter);
        let character = Character::get(session.progress.character);
        let hooks = session.hooks_mut();
        hooks.boss = chapter.boss;
        let intro = hooks.narrator.chapter_intro(chapter.name, character.name);
        hooks.set_text("narration", &intro);

        log::info!("Chapter {} ({}) with {}, seed {seed}", chapter.index, chapter.name, character.name);
        session
    }

    /// Size the canvas backing store to its CSS box at device resolution
    fn fit_canvas(canvas: &HtmlCanvasElement, dpr: f64) -> (u32, u32) {
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let mut settings = Settings::load();
        // A `data-quality` attribute on the canvas overrides and persists the preset
        if let Some(preset) = canvas.dataset().get("quality").as_deref().and_then(QualityPreset::from_str) {
            settings.apply_preset(preset);
            settings.save();
        }
        log::info!("Quality preset: {}", settings.quality.as_str());
        let player_id = canvas.dataset().get("player").unwrap_or_else(|| DEFAULT_PLAYER.to_string());
        let touch_device = window.navigator().max_touch_points() > 0;
        let (width, height) = fit_canvas(&canvas, window.device_pixel_ratio());

        let game = Rc::new(RefCell::new(Game::new(&document, &settings, &player_id, touch_device)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(&window, game.clone());
        setup_touch_controls(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        setup_resize(&window, canvas, game.clone());
        setup_restart_button(&document, &settings, &player_id, touch_device, game.clone());

        game.borrow_mut().session.begin();
        request_animation_frame(game);

        log::info!("O Juízo dos Céus running");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if code == "Escape" {
                    g.session.toggle_pause();
                    return;
                }
                if g.key_filter.is_bound(&code) {
                    event.prevent_default();
                }
                g.session.handle_input(&RawInput::KeyDown(code));
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if g.key_filter.is_bound(&code) {
                    event.prevent_default();
                }
                g.session.handle_input(&RawInput::KeyUp(code));
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Hook every `[data-control]` button up to the touch backend
    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        let Ok(buttons) = document.query_selector_all("[data-control]") else {
            return;
        };
        for i in 0..buttons.length() {
            let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            let Some(control) = button.dataset().get("control").as_deref().and_then(Control::from_str) else {
                continue;
            };

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    event.prevent_default();
                    game.borrow_mut().session.handle_input(&RawInput::ButtonDown(control));
                });
                let _ = button.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            for release in ["pointerup", "pointercancel", "pointerleave"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                    game.borrow_mut().session.handle_input(&RawInput::ButtonUp(control));
                });
                let _ = button.add_event_listener_with_callback(release, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Tab switch, minimize
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.handle_input(&RawInput::Blur);
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click outside the page
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.handle_input(&RawInput::Blur);
                log::info!("Auto-paused (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let (width, height) = fit_canvas(&canvas, dpr);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(
        document: &Document,
        settings: &Settings,
        player_id: &str,
        touch_device: bool,
        game: Rc<RefCell<Game>>,
    ) {
        let Some(button) = document.get_element_by_id("restart-btn") else {
            return;
        };
        let document = document.clone();
        let settings = settings.clone();
        let player_id = player_id.to_string();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
            if let Some(result) = document.get_element_by_id("result") {
                let _ = result.set_attribute("class", "hidden");
            }
            let mut g = game.borrow_mut();
            g.session.stop();
            g.session = build_session(&document, &settings, &player_id, touch_device);
            g.session.begin();
            g.last_time = 0.0;
        });
        let _ = button.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use juizo::consts::SIM_DT;
    use juizo::input::{Autopilot, InputMapper};
    use juizo::persistence::file::FileStore;
    use juizo::{GameHooks, Session, Settings, Tuning};

    /// Frames simulated when no count is given (two minutes at 60 Hz)
    const DEFAULT_FRAMES: u32 = 7200;

    #[derive(Debug, Default)]
    struct LogHooks {
        loot: u32,
    }

    impl GameHooks for LogHooks {
        fn on_game_over(&mut self) {
            log::info!("Game over");
        }

        fn on_victory(&mut self) {
            log::info!("Victory");
        }

        fn on_collect_currency(&mut self, amount: u32) {
            self.loot += amount;
        }

        fn on_checkpoint(&mut self, x: i32) {
            log::info!("Checkpoint at x={x}");
        }

        fn set_player_hp(&mut self, hp: i32) {
            log::debug!("Player hp {hp}");
        }

        fn on_boss_encountered(&mut self) {
            log::info!("Boss encountered");
        }
    }

    /// Tuning overrides from a JSON file; defaults when unreadable
    fn load_tuning(path: &str) -> Tuning {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning, could not read {path}: {e}");
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let player_id = args.next().unwrap_or_else(|| "autopilot".to_string());
        let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_FRAMES);
        let tuning = args.next().map(|path| load_tuning(&path)).unwrap_or_default();

        let store = FileStore::new(std::env::temp_dir().join("juizo"));
        let input = InputMapper::new().with_backend(Box::new(Autopilot::new()));
        let mut session = Session::load(&player_id, store, input, LogHooks::default(), 7, tuning);
        session.apply_settings(&Settings::load());
        session.begin();

        let mut ticks = 0;
        for _ in 0..frames {
            ticks += session.advance(SIM_DT);
            if session.is_finished() {
                break;
            }
        }
        session.stop();

        let state = &session.state;
        let alive = state.enemies.iter().filter(|e| !e.is_dead()).count();
        log::info!(
            "{ticks} ticks: phase {:?}, player x {:.0} hp {}, {alive} enemies standing, loot {}",
            state.phase,
            state.player.pos.x,
            state.player.hp,
            session.hooks().loot,
        );
        if let Some(error) = session.last_save_error() {
            log::warn!("Last save failed: {error}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("O Juízo dos Céus (headless) starting");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
