//! Sky Flap entry point
//!
//! Handles platform-specific initialization and runs the game loops.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent};

    use sky_flap::audio::AudioManager;
    use sky_flap::backend::{
        ApiClient, BackendStatus, LeaderboardEntry, Session, WebReporter, validate_display_name,
    };
    use sky_flap::persistence::LocalStore;
    use sky_flap::platform::{FixedStep, FrameLoop};
    use sky_flap::renderer::{Scene, SdfRenderState};
    use sky_flap::sim::{GameEvent, GamePhase};
    use sky_flap::{GameController, Settings};

    type WebController = GameController<LocalStore, AudioManager, WebReporter>;

    thread_local! {
        /// Running loops; dropping them cancels their animation frames
        static LOOPS: RefCell<Vec<FrameLoop>> = const { RefCell::new(Vec::new()) };
    }

    /// Stop both loops (used by the page on teardown / hot reload)
    #[wasm_bindgen]
    pub fn stop_game() {
        LOOPS.with(|loops| loops.borrow_mut().clear());
    }

    /// What the HUD last showed, so the DOM is only touched on change
    #[derive(PartialEq, Clone, Default)]
    struct HudSnapshot {
        phase: Option<GamePhase>,
        score: u32,
        best: u32,
        fps: u32,
        status: Option<String>,
        user: Option<String>,
    }

    /// Game instance holding all state
    struct Game {
        controller: WebController,
        scene: Scene,
        settings: Settings,
        clock: FixedStep,
        render_state: Option<SdfRenderState>,
        client: ApiClient,
        status: Rc<RefCell<BackendStatus>>,
        last_render: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        hud: HudSnapshot,
        new_best: bool,
        leaderboard_generation: Option<u32>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let store = LocalStore::new();
            let settings = Settings::load(&store);
            let client = ApiClient::new(settings.api_base.clone());
            let status = Rc::new(RefCell::new(BackendStatus::default()));

            let audio = AudioManager::new(&settings);
            let reporter = WebReporter::new(client.clone(), status.clone());
            let mut controller = GameController::new(seed, store, audio, reporter);
            controller.set_session(Session::load(controller.store()));

            // Separate stream so cosmetics never touch obstacle generation
            let scene = Scene::new(seed ^ 0x9E37_79B9_7F4A_7C15, &settings);

            Self {
                controller,
                scene,
                settings,
                clock: FixedStep::default(),
                render_state: None,
                client,
                status,
                last_render: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                hud: HudSnapshot::default(),
                new_best: false,
                leaderboard_generation: None,
            }
        }

        /// Run due simulation ticks and hand events to the scene
        fn physics_frame(&mut self, time: f64) -> Vec<GameEvent> {
            let steps = self.clock.frame(time);
            for _ in 0..steps {
                self.controller.tick();
            }

            let events = self.controller.drain_events();
            for event in &events {
                self.scene.apply_event(event, self.controller.state());
                match event {
                    GameEvent::Started | GameEvent::Resumed => self.clock.reset(),
                    GameEvent::Crashed { new_high_score, .. } => self.new_best = *new_high_score,
                    GameEvent::Reset => self.new_best = false,
                    _ => {}
                }
            }
            events
        }

        /// Draw the latest snapshot
        fn render_frame(&mut self, time: f64) {
            let dt = if self.last_render > 0.0 {
                ((time - self.last_render) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_render = time;
            self.scene.update(dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.controller.state(), &self.scene, time) {
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

        /// Drop the session if the server rejected it
        fn check_session(&mut self) {
            let expired = std::mem::take(&mut self.status.borrow_mut().session_expired);
            if expired && self.controller.session().is_some() {
                log::warn!("Session expired");
                self.sign_out();
            }
        }

        fn sign_in(&mut self, session: Session) {
            if let Err(e) = session.save(self.controller.store_mut()) {
                log::warn!("Could not persist session: {}", e);
            }
            self.controller.set_session(Some(session));
        }

        fn sign_out(&mut self) {
            if let Err(e) = Session::clear(self.controller.store_mut()) {
                log::warn!("Could not clear session: {}", e);
            }
            self.controller.set_session(None);
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.controller.set_volume(self.settings.effective_volume());
            if let Err(e) = self.settings.save(self.controller.store_mut()) {
                log::warn!("Could not save settings: {}", e);
            }
            log::info!("Muted: {}", self.settings.muted);
        }

        fn toggle_pause(&mut self) {
            match self.controller.phase() {
                GamePhase::Playing => self.controller.pause(),
                GamePhase::Paused => self.controller.resume(),
                GamePhase::Ready | GamePhase::GameOver => {}
            }
        }

        /// The single action input, also unlocks audio on the first gesture
        fn primary_input(&mut self) {
            self.controller.sound().resume();
            self.controller.primary_input();
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let snapshot = HudSnapshot {
                phase: Some(self.controller.phase()),
                score: self.controller.score(),
                best: self.controller.high_score(),
                fps: if self.settings.show_fps { self.fps } else { 0 },
                status: self.status.borrow().message.clone(),
                user: self
                    .controller
                    .session()
                    .map(|s| s.user.display_name.clone()),
            };
            if snapshot == self.hud {
                return;
            }

            set_text(document, "hud-score", &snapshot.score.to_string());
            set_text(document, "hud-best", &snapshot.best.to_string());
            set_hidden(document, "hud-fps", !self.settings.show_fps);
            set_text(document, "hud-fps-value", &snapshot.fps.to_string());

            let phase = snapshot.phase.unwrap_or(GamePhase::Ready);
            set_hidden(document, "ready-prompt", phase != GamePhase::Ready);
            set_hidden(document, "pause-menu", phase != GamePhase::Paused);
            set_hidden(document, "game-over", phase != GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                set_text(document, "final-score", &snapshot.score.to_string());
                set_text(document, "final-best", &snapshot.best.to_string());
                set_hidden(document, "new-best", !self.new_best);
            }

            set_text(
                document,
                "backend-status",
                snapshot.status.as_deref().unwrap_or(""),
            );
            match &snapshot.user {
                Some(name) => {
                    set_text(document, "user-name", name);
                    set_hidden(document, "login-form", true);
                    set_hidden(document, "user-panel", false);
                }
                None => {
                    set_hidden(document, "login-form", false);
                    set_hidden(document, "user-panel", true);
                }
            }

            self.hud = snapshot;
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn show_leaderboard(entries: &[LeaderboardEntry]) -> Option<()> {
        let document = web_sys::window()?.document()?;
        let list = document.get_element_by_id("leaderboard")?;
        list.set_inner_html("");
        for entry in entries {
            let row = document.create_element("li").ok()?;
            row.set_text_content(Some(&format!(
                "{} - {}",
                entry.user.display_name, entry.score
            )));
            list.append_child(&row).ok()?;
        }
        Some(())
    }

    /// Fetch and show the leaderboard in the background
    fn refresh_leaderboard(game: &Rc<RefCell<Game>>) {
        let (client, status, limit) = {
            let g = game.borrow();
            (g.client.clone(), g.status.clone(), g.settings.leaderboard_limit)
        };
        wasm_bindgen_futures::spawn_local(async move {
            match client.leaderboard(limit).await {
                Ok(entries) => {
                    log::debug!("Leaderboard: {} rows", entries.len());
                    show_leaderboard(&entries);
                }
                Err(e) => status.borrow_mut().message = Some(e.user_message()),
            }
        });
    }

    /// Confirm a restored session is still valid
    fn verify_session(game: &Rc<RefCell<Game>>) {
        let client = {
            let g = game.borrow();
            if g.controller.session().is_none() {
                return;
            }
            g.client.clone()
        };
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match client.me().await {
                Ok(user) => game.borrow_mut().sign_in(Session::new(user)),
                Err(e) if e.needs_login() => game.borrow_mut().sign_out(),
                // Offline is fine, keep the local session
                Err(e) => log::warn!("Could not verify session: {}", e),
            }
        });
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {}", e).into());
        }

        log::info!("Sky Flap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = fit_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU, falling back to WebGL
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                match SdfRenderState::new(surface, &adapter, width, height).await {
                    Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                    Err(e) => log::error!("Renderer unavailable: {}", e),
                }
            }
            // Still playable through the HUD, just nothing drawn
            Err(e) => log::error!("No graphics adapter: {}", e),
        }

        verify_session(&game);

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone())?;
        setup_auto_pause(&document, game.clone())?;
        setup_resize(canvas.clone(), game.clone())?;

        set_hidden(&document, "hud", false);

        let physics_loop = {
            let game = game.clone();
            FrameLoop::start("physics", move |time| {
                let events = game.borrow_mut().physics_frame(time);
                let crashed = events
                    .iter()
                    .any(|e| matches!(e, GameEvent::Crashed { .. }));
                if crashed {
                    refresh_leaderboard(&game);
                }
            })
        };

        let render_loop = {
            let game = game.clone();
            let document = document.clone();
            FrameLoop::start("render", move |time| {
                let mut g = game.borrow_mut();
                g.check_session();
                g.render_frame(time);
                g.update_hud(&document);

                // First frame, and again once a submission has landed
                let generation = g.status.borrow().generation;
                if g.leaderboard_generation != Some(generation) {
                    g.leaderboard_generation = Some(generation);
                    drop(g);
                    refresh_leaderboard(&game);
                }
            })
        };

        LOOPS.with(|loops| {
            let mut loops = loops.borrow_mut();
            loops.clear();
            loops.push(physics_loop);
            loops.push(render_loop);
        });

        log::info!("Sky Flap running!");
        Ok(())
    }

    /// Size the canvas backing store to its CSS size at device pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Mouse click - flap / restart
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().primary_input();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().primary_input();
            });
            canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                // Let the login field have its keys
                let typing = event
                    .target()
                    .map(|t| t.dyn_into::<HtmlInputElement>().is_ok())
                    .unwrap_or(false);
                if typing || event.repeat() {
                    return;
                }

                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" | "Enter" => {
                        event.prevent_default();
                        g.primary_input();
                    }
                    "Escape" | "p" | "P" => g.toggle_pause(),
                    "m" | "M" => g.toggle_mute(),
                    "r" | "R" => g.controller.restart(),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn on_click(
        document: &Document,
        id: &str,
        mut handler: impl FnMut() + 'static,
    ) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            on_click(document, "restart-btn", move || {
                game.borrow_mut().controller.restart();
            })?;
        }
        {
            let game = game.clone();
            on_click(document, "resume-btn", move || {
                game.borrow_mut().controller.resume();
            })?;
        }
        {
            let game = game.clone();
            on_click(document, "mute-btn", move || game.borrow_mut().toggle_mute())?;
        }

        // Sign in with a display name
        {
            let game = game.clone();
            on_click(document, "login-btn", move || {
                let Some(input) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("login-name"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let raw = input.value();
                let (client, status) = {
                    let g = game.borrow();
                    (g.client.clone(), g.status.clone())
                };
                if let Err(e) = validate_display_name(&raw) {
                    status.borrow_mut().message = Some(e.user_message());
                    return;
                }

                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match client.login(&raw).await {
                        Ok(user) => {
                            status.borrow_mut().message = None;
                            game.borrow_mut().sign_in(Session::new(user));
                        }
                        Err(e) => status.borrow_mut().message = Some(e.user_message()),
                    }
                });
            })?;
        }

        // Sign out
        on_click(document, "logout-btn", move || {
            let client = game.borrow().client.clone();
            game.borrow_mut().sign_out();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = client.logout().await {
                    log::warn!("Logout request failed: {}", e);
                }
            });
        })?;

        Ok(())
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().controller.pause();
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().controller.pause();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Sky Flap failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Flap (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let score = autopilot_run(seed, 60 * 60);
    println!("Autopilot scored {} (seed {})", score, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one headless run, flapping whenever the bird sinks below the next gap
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_run(seed: u64, max_ticks: u32) -> u32 {
    use sky_flap::GameController;
    use sky_flap::audio::Silent;
    use sky_flap::backend::Offline;
    use sky_flap::consts::*;
    use sky_flap::persistence::MemoryStore;
    use sky_flap::sim::GamePhase;

    let mut game = GameController::new(seed, MemoryStore::new(), Silent, Offline);
    game.jump();

    for _ in 0..max_ticks {
        let state = game.state();
        let bird = &state.bird;
        let target = state
            .pipes
            .iter()
            .find(|p| p.right() > bird.x)
            .map(|p| p.gap_top + PIPE_GAP * 0.6)
            .unwrap_or(PLAY_HEIGHT / 2.0);
        if bird.y + bird.height > target && bird.velocity >= 0.0 {
            game.jump();
        }

        game.tick();
        if game.phase() == GamePhase::GameOver {
            break;
        }
    }

    for event in game.drain_events() {
        log::debug!("{:?}", event);
    }
    game.score()
}
