//! Coin Pusher entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use coin_pusher::Tuning;
    use coin_pusher::TuningError;
    use coin_pusher::consts::*;
    use coin_pusher::renderer::{RenderError, RenderState, scene};
    use coin_pusher::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// How long the coin button stays pressed in
    const BUTTON_PRESS_MS: i32 = 100;
    /// Shown on a reel before its first stop
    const BLANK_REEL: &str = "❓";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        document: Document,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, document: Document) -> Result<Self, TuningError> {
            Ok(Self {
                state: GameState::new(seed, tuning)?,
                render_state: None,
                document,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            })
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.drop_coin = false;
                self.input.pause = false;
            }
            // Drop backlog we could not catch up on
            self.accumulator = self.accumulator.min(SIM_DT);

            for event in self.state.events.drain(..) {
                match event {
                    GameEvent::DropRejected => log::debug!("Reels still spinning, drop ignored"),
                    GameEvent::SpinResolved(outcome) if outcome.is_win() => {
                        log::info!("Score {} after win of {}", self.state.score, outcome.payout)
                    }
                    _ => {}
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };

            let vertices = scene::build(&self.state);
            match render_state.render(&vertices) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let document = &self.document;

            set_text(document, "score", &self.state.score.to_string());

            for (i, reel) in self.state.slot.reels.iter().enumerate() {
                if let Some(el) = document.get_element_by_id(&format!("reel{}", i + 1)) {
                    let _ = el.class_list().toggle_with_force("spinning", reel.spinning);
                    let glyph = reel.symbol.map_or(BLANK_REEL, |s| s.glyph());
                    if el.text_content().as_deref() != Some(glyph) {
                        el.set_text_content(Some(glyph));
                    }
                }
            }

            set_text(document, "slotResult", &self.state.slot.display.label());

            if let Some(el) = document.get_element_by_id("winNotification") {
                let _ = el
                    .class_list()
                    .toggle_with_force("show", self.state.win_banner.is_some());
            }
            if let Some(banner) = &self.state.win_banner {
                set_text(document, "winTitle", &banner.title());
                set_text(document, "winMessage", &banner.message());
            }

            if let Some(el) = document.get_element_by_id("pauseOverlay") {
                let paused = self.state.phase == GamePhase::Paused;
                let _ = el.class_list().toggle_with_force("show", paused);
            }
        }

        /// Queue a drop and animate the coin button
        fn request_drop(&mut self) {
            self.input.drop_coin = true;
            if let Some(button) = self.document.get_element_by_id("coinButton") {
                if let Ok(button) = button.dyn_into::<HtmlElement>() {
                    press_button(button);
                }
            }
        }
    }

    /// Write text into an element only when it changed
    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Scale the button down, then restore it after a short delay
    fn press_button(button: HtmlElement) {
        let _ = button.style().set_property("transform", "scale(0.9)");

        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move || {
            let _ = button.style().set_property("transform", "scale(1)");
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            BUTTON_PRESS_MS,
        );
        closure.forget();
    }

    /// Optional balance override embedded in the page
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .filter(|json| !json.trim().is_empty())
        else {
            return Tuning::default();
        };

        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from page");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring page tuning: {}", e);
                Tuning::default()
            }
        }
    }

    /// Match the canvas backing store to its CSS size
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Coin Pusher starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "gameCanvas is not a canvas")?;

        let (width, height) = fit_canvas(&window, &canvas);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let tuning = load_tuning(&document);
        let game = Game::new(seed, tuning, document.clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Rc::new(RefCell::new(game));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let world = game.borrow().state.layout.size;
        let render_state = init_renderer(&instance, canvas.clone(), width, height, world)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, &document, game.clone());
        setup_auto_pause(&document, game.clone());
        setup_resize(&window, canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Coin Pusher running!");
        Ok(())
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
        world: glam::Vec2,
    ) -> Result<RenderState, RenderError> {
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, world).await
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) {
        // Coin button
        if let Some(button) = document.get_element_by_id("coinButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().request_drop();
            });
            let _ = button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        g.request_drop();
                    }
                    "Escape" => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Running {
                    g.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &web_sys::Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&window_clone, &canvas);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
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
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
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
    if let Err(e) = wasm_game::run().await {
        log::error!("Coin Pusher failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Coin Pusher (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable version");

    // Usage: coin-pusher [seed] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| coin_pusher::Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                coin_pusher::Tuning::default()
            }
        },
        None => coin_pusher::Tuning::default(),
    };

    if let Err(e) = headless::run(seed, tuning, 60.0) {
        log::error!("Headless run failed: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use coin_pusher::Tuning;
    use coin_pusher::TuningError;
    use coin_pusher::consts::SIM_DT;
    use coin_pusher::sim::{GameEvent, GameState, TickInput, tick};

    /// Player presses the button as soon as the reels are free
    pub fn run(seed: u64, tuning: Tuning, seconds: f32) -> Result<(), TuningError> {
        let mut state = GameState::new(seed, tuning)?;
        let ticks = (seconds / SIM_DT) as u64;

        let mut dropped = 0u32;
        let mut spins = 0u32;
        let mut wins = 0u32;
        let mut paid = 0u32;

        for _ in 0..ticks {
            let input = TickInput {
                drop_coin: !state.slot.is_spinning(),
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);

            for event in state.events.drain(..) {
                match event {
                    GameEvent::CoinDropped { .. } => dropped += 1,
                    GameEvent::SpinResolved(outcome) => {
                        spins += 1;
                        if outcome.is_win() {
                            wins += 1;
                            paid += outcome.payout;
                        }
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Seed {}: {:.0}s simulated, {} coins dropped, {} spins, {} wins paying {}",
            seed,
            seconds,
            dropped,
            spins,
            wins,
            paid
        );
        log::info!(
            "Final score {} with {} coins on the field",
            state.score,
            state.coins.len()
        );
        Ok(())
    }
}
