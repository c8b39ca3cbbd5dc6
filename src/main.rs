//! Pop the Lock entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement};

    use pop_the_lock::audio::{AudioManager, SoundEffect};
    use pop_the_lock::platform::{Driver, FpsCounter, InputEvent, map_key};
    use pop_the_lock::renderer::{DrawCommand, DrawList, Renderer, SdfRenderState, draw_game};
    use pop_the_lock::sim::Game;
    use pop_the_lock::{HighScores, Settings};

    /// Everything the browser host owns
    struct Host {
        driver: Driver,
        render_state: Option<SdfRenderState>,
        draw_list: DrawList,
        fps: FpsCounter,
        audio: AudioManager,
        pixel_ratio: f32,
        overlay: Option<Element>,
        overlay_html: String,
    }

    impl Host {
        fn new(seed: u64, width: f32, height: f32, pixel_ratio: f32) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            Self {
                driver: Driver::new(Game::new(seed), settings, HighScores::load()),
                render_state: None,
                draw_list: DrawList::new(width, height),
                fps: FpsCounter::default(),
                audio,
                pixel_ratio,
                overlay: None,
                overlay_html: String::new(),
            }
        }

        fn push_input(&mut self, event: InputEvent) {
            self.audio.resume();
            self.driver.push_input(event);
            self.audio.set_volume(self.driver.settings.effective_volume());
        }

        /// One animation frame: input, simulation, render
        fn frame(&mut self, time: f64) {
            let report = self.driver.frame(time);
            let max_hits = self.driver.game.params.max_hits;
            for event in report.events {
                self.audio.play(SoundEffect::for_event(event, max_hits));
            }
            if report.rank == Some(1) {
                self.audio.play(SoundEffect::HighScore);
            }
            self.fps.record(time);

            let driver = &self.driver;
            draw_game(
                &mut self.draw_list,
                &driver.game,
                &driver.settings,
                &driver.high_scores,
            );
            self.render();
            self.update_overlay();
        }

        /// Match the canvas backing store and draw list to the element's new size
        fn resize(&mut self, css_width: f32, css_height: f32, pixel_ratio: f32) {
            self.pixel_ratio = pixel_ratio;
            self.draw_list.resize(css_width, css_height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(
                    (css_width * pixel_ratio) as u32,
                    (css_height * pixel_ratio) as u32,
                );
            }
            self.driver.pause_clock();
            log::info!("Resized to {}x{} @{}x", css_width, css_height, pixel_ratio);
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.draw_list, self.pixel_ratio) {
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

        /// Mirror the frame's text into the DOM layer above the canvas
        fn update_overlay(&mut self) {
            let Some(ref overlay) = self.overlay else {
                return;
            };

            let mut html = String::new();
            for cmd in self.draw_list.texts() {
                if let DrawCommand::Text {
                    content,
                    size,
                    color,
                    position,
                    ..
                } = cmd
                {
                    let css = color.to_css();
                    html.push_str(&text_div(content, *size, &css, position.x, position.y));
                }
            }
            let size = self.draw_list.screen_size();
            if self.driver.settings.show_fps {
                let label = format!("{} FPS", self.fps.fps());
                html.push_str(&text_div(&label, 16, "white", size.x - 90.0, 8.0));
            }
            if self.driver.autopilot() {
                html.push_str(&text_div("AUTOPILOT", 16, "white", 8.0, size.y - 28.0));
            }

            // Only touch the DOM when the text changed
            if html != self.overlay_html {
                overlay.set_inner_html(&html);
                self.overlay_html = html;
            }
        }

        /// Final overlay once the loop has stopped
        fn show_stopped(&mut self) {
            if let Some(ref overlay) = self.overlay {
                overlay.set_inner_html(&text_div(
                    "Stopped. Reload the page to play again.",
                    32,
                    "white",
                    10.0,
                    100.0,
                ));
            }
            log::info!("Game loop stopped");
        }
    }

    fn text_div(content: &str, size: u32, color: &str, x: f32, y: f32) -> String {
        let escaped = content
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        format!(
            "<div style=\"position:absolute;left:{x}px;top:{y}px;font:{size}px monospace;\
             line-height:1.2;color:{color};white-space:pre\">{escaped}</div>"
        )
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Pop the Lock starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element with id 'canvas'");
            return;
        };

        // Canvas backing store in device pixels, layout in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let host = Rc::new(RefCell::new(Host::new(
            seed,
            client_w as f32,
            client_h as f32,
            dpr as f32,
        )));
        host.borrow_mut().overlay = document.get_element_by_id("text-layer");
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match SdfRenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => host.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&canvas, host.clone());
        setup_focus_handlers(host.clone());
        setup_resize_handler(&canvas, host.clone());

        request_animation_frame(host);

        log::info!("Pop the Lock running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Mouse click
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                host.borrow_mut().push_input(InputEvent::Action);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                host.borrow_mut().push_input(InputEvent::Action);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                if let Some(input) = map_key(&event.key()) {
                    // Keep space from scrolling the page
                    event.prevent_default();
                    host.borrow_mut().push_input(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Tab hidden: drop the stale timestamp so the reticle doesn't jump
        {
            let host = host.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    host.borrow_mut().driver.pause_clock();
                    log::info!("Tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur / focus
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut h = host.borrow_mut();
                if h.driver.settings.mute_on_blur {
                    h.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                host.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            if client_w <= 0 || client_h <= 0 {
                return;
            }
            canvas.set_width((client_w as f64 * dpr) as u32);
            canvas.set_height((client_h as f64 * dpr) as u32);
            host.borrow_mut().resize(client_w as f32, client_h as f32, dpr as f32);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            host.borrow_mut().frame(time);
            // Quit ends the loop: no further frames are scheduled
            if host.borrow().driver.is_running() {
                request_animation_frame(host);
            } else {
                host.borrow_mut().show_stopped();
            }
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pop the Lock (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    if let Err(e) = native::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use pop_the_lock::consts::TARGET_FPS;
    use pop_the_lock::platform::{Driver, InputEvent, frame_interval};
    use pop_the_lock::renderer::{DrawList, Renderer, draw_game};
    use pop_the_lock::sim::{DifficultyParams, Game, GameEvent};
    use pop_the_lock::{HighScores, Settings, Tuning, TuningError};

    /// Logical frames before the demo gives up (five minutes)
    const MAX_FRAMES: u32 = TARGET_FPS * 300;

    /// Play one run on autopilot with a fixed 1/60 s logical step, then quit
    pub fn run(tuning_path: Option<String>) -> Result<(), TuningError> {
        let params = match tuning_path {
            Some(path) => {
                let params = Tuning::load(Path::new(&path))?.params()?;
                log::info!("Loaded tuning from {}", path);
                params
            }
            None => DifficultyParams::default(),
        };

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let game = Game::with_params(params, seed);
        log::info!("Game initialized with seed: {}", seed);

        let mut driver = Driver::new(game, Settings::load(), HighScores::load());
        let mut draw_list = DrawList::new(1280.0, 720.0);
        driver.push_input(InputEvent::ToggleAutopilot);

        let dt = frame_interval();
        let mut frame = 0;
        while driver.is_running() && frame < MAX_FRAMES {
            let elapsed = frame as f32 * dt;
            let report = driver.step(dt, elapsed as f64 * 1000.0);
            draw_game(
                &mut draw_list,
                &driver.game,
                &driver.settings,
                &driver.high_scores,
            );

            for event in &report.events {
                let (hits, won) = match *event {
                    GameEvent::Won { hits } => (hits, true),
                    GameEvent::Missed { hits, .. } => (hits, false),
                    _ => continue,
                };
                log::info!(
                    "Demo run {} with {} hits after {:.1}s",
                    if won { "won" } else { "lost" },
                    hits,
                    elapsed
                );
                if let Some(rank) = report.rank {
                    log::info!("Leaderboard rank {}", rank);
                }
                log::debug!("Final frame: {} draw calls", draw_list.frame().len());
                driver.push_input(InputEvent::Quit);
            }
            frame += 1;
        }

        if driver.is_running() {
            log::warn!(
                "Demo stopped after {} frames at {} hits ({} px screen)",
                MAX_FRAMES,
                driver.game.session.hits,
                draw_list.screen_size()
            );
        }
        Ok(())
    }
}
