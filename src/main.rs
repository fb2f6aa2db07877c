//! Speedy Sums entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use speedy_sums::consts::*;
    use speedy_sums::renderer::{RenderState, TextLabel, VertexCanvas, draw_frame};
    use speedy_sums::sim::TickInput;
    use speedy_sums::{Session, Settings, UserStore};

    /// Name used when the player cancels the login prompt; never saved
    const GUEST: &str = "guest";

    const GOODBYE_HTML: &str =
        r#"<div class="label" style="left:40%;top:45%">Thanks for playing!</div>"#;

    /// Game instance holding all state
    struct Game {
        session: Session<UserStore>,
        render_state: Option<RenderState>,
        frame: VertexCanvas,
        last_time: f64,
        input: TickInput,
        /// Labels currently in the DOM overlay
        shown_labels: Vec<TextLabel>,
        quit: bool,
    }

    impl Game {
        fn new(session: Session<UserStore>) -> Self {
            Self {
                session,
                render_state: None,
                frame: VertexCanvas::default(),
                last_time: 0.0,
                input: TickInput::default(),
                shown_labels: Vec::new(),
                quit: false,
            }
        }

        /// Advance one frame
        fn update(&mut self, elapsed_ms: f32) {
            self.session.frame(&self.input, elapsed_ms);
            // One-shot
            self.input.pause = false;
        }

        /// Render the current frame
        fn render(&mut self) {
            self.frame.begin_frame();
            draw_frame(self.session.state(), &mut self.frame, self.session.best_score());

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.frame) {
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

        /// Mirror the frame's text labels into the DOM overlay
        fn update_labels(&mut self) {
            if self.frame.labels == self.shown_labels {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("labels") {
                el.set_inner_html(&labels_html(&self.frame.labels));
            }
            self.shown_labels = self.frame.labels.clone();
        }

        fn restart(&mut self, seed: u64) {
            self.session.restart(seed);
            self.input = TickInput::default();
            log::info!("Game restarted with seed: {}", seed);
        }
    }

    fn labels_html(labels: &[TextLabel]) -> String {
        let mut html = String::new();
        for label in labels {
            let [r, g, b, a] = label.color;
            html.push_str(&format!(
                concat!(
                    "<div class=\"label\" style=\"left:{:.2}%;top:{:.2}%;",
                    "color:rgba({},{},{},{})\">{}</div>"
                ),
                label.pos.x / PLAYFIELD_WIDTH * 100.0,
                label.pos.y / PLAYFIELD_HEIGHT * 100.0,
                (r * 255.0) as u8,
                (g * 255.0) as u8,
                (b * 255.0) as u8,
                a,
                escape_html(&label.text)
            ));
        }
        html
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Prompt until the player logs in. Cancelling plays as a guest.
    fn login(window: &web_sys::Window, store: &mut UserStore) -> String {
        loop {
            let has_account = window
                .confirm_with_message("Speedy Sums\n\nOK to log in, Cancel to sign up")
                .unwrap_or(true);
            let Ok(Some(user)) = window.prompt_with_message("Username") else {
                return GUEST.to_string();
            };
            let Ok(Some(password)) = window.prompt_with_message("Password") else {
                return GUEST.to_string();
            };
            let user = user.trim().to_string();

            let result = if has_account {
                store.login(&user, &password)
            } else {
                store.signup(&user, &password)
            };
            match result {
                Ok(()) if has_account => {
                    log::info!("Logged in as {}", user);
                    return user;
                }
                Ok(()) => {
                    let _ = window.alert_with_message("Signup successful, you can log in now");
                }
                Err(e) => {
                    let _ = window.alert_with_message(&format!("Error: {}", e));
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Speedy Sums starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let settings = Settings::load();
        let mut store = UserStore::open_local_storage().map_err(|e| e.to_string())?;
        let user = login(&window, &mut store);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(user, store, settings, seed);
        let game = Rc::new(RefCell::new(Game::new(session)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| e.to_string())?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Speedy Sums running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        g.input.up = true;
                    }
                    "ArrowDown" | "s" | "S" => {
                        event.prevent_default();
                        g.input.down = true;
                    }
                    "p" | "P" if !event.repeat() => g.input.pause = true,
                    "r" | "R" if g.session.is_over() => g.restart(js_sys::Date::now() as u64),
                    "q" | "Q" if g.session.is_over() => {
                        g.quit = true;
                        log::info!("Quit with score {}", g.session.state().score);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.input.up = false,
                    "ArrowDown" | "s" | "S" => g.input.down = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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

            if g.quit {
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("labels"))
                {
                    el.set_inner_html(GOODBYE_HTML);
                }
                return;
            }

            let elapsed_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                FRAME_MS
            };
            g.last_time = time;

            g.update(elapsed_ms);
            g.render();
            g.update_labels();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use std::io;

    use speedy_sums::platform::terminal;
    use speedy_sums::{Session, Settings, UserStore};

    env_logger::init();
    log::info!("Speedy Sums (native) starting...");

    let settings = Settings::load();
    let mut store = UserStore::open_or_empty(&settings.users_path);

    let mut input = terminal::ConsoleInput::new();
    let Some(user) = terminal::login_prompt(&mut store, &mut input, io::stdout())? else {
        return Ok(());
    };

    let seed = terminal::clock_seed();
    log::info!("Game initialized with seed: {}", seed);
    let mut session = Session::new(user, store, settings, seed);
    terminal::run(&mut session)?;

    println!(
        "Final score: {}  Best score: {}",
        session.state().score,
        session.best_score()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
