//! Waterdrop '88 entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use waterdrop88::audio::AudioManager;
    use waterdrop88::consts::*;
    use waterdrop88::highscore::LocalStorageScore;
    use waterdrop88::render::{colors, Frame, Overlay};
    use waterdrop88::sim::{tick, GameEvent, GamePhase, GameState, TickInput};
    use waterdrop88::{ScoreStore, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        score_store: LocalStorageScore,
        audio: AudioManager,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let score_store = LocalStorageScore;
            let high_score = score_store.load();
            let mut audio = AudioManager::new();
            audio.set_muted(settings.muted);
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            Self {
                state: GameState::new(seed, Tuning::default(), high_score),
                settings,
                score_store,
                audio,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks for the elapsed frame time
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.start = false;
                self.input.pause = false;
                self.input.reset = false;
            }

            // Drain side-effect signals: audio cues and high score persistence
            for event in self.state.take_events() {
                self.audio.play(event.cue());
                if let GameEvent::GameOver { new_record: true, .. } = event {
                    self.score_store.save(self.state.high_score);
                }
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
        }

        /// Move the catcher toward an absolute playfield x
        fn set_target(&mut self, x: f32) {
            self.input.target_x = Some(x);
        }

        /// Draw the current frame to the 2D canvas
        fn render(&self, ctx: &CanvasRenderingContext2d) {
            let frame = Frame::capture(&self.state);

            // Sky gradient background
            let gradient = ctx
                .create_linear_gradient(0.0, 0.0, 0.0, PLAYFIELD_HEIGHT as f64);
            let _ = gradient.add_color_stop(0.0, colors::SKY_TOP);
            let _ = gradient.add_color_stop(1.0, colors::SKY_BOTTOM);
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(0.0, 0.0, PLAYFIELD_WIDTH as f64, PLAYFIELD_HEIGHT as f64);

            // Drops
            for drop in &frame.drops {
                ctx.set_fill_style_str(colors::DROP);
                ctx.begin_path();
                let _ = ctx.ellipse(
                    drop.cx as f64,
                    drop.cy as f64,
                    drop.rx as f64,
                    drop.ry as f64,
                    0.0,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
                ctx.set_fill_style_str(colors::DROP_HIGHLIGHT);
                ctx.fill_rect(drop.highlight_x as f64, drop.highlight_y as f64, 2.0, 2.0);
            }

            // Splash particles (fade out over their lifetime)
            if self.settings.effective_particles() {
                ctx.set_fill_style_str(colors::DROP);
                for particle in &frame.particles {
                    ctx.set_global_alpha(particle.alpha as f64);
                    ctx.fill_rect(particle.x as f64, particle.y as f64, 3.0, 3.0);
                }
                ctx.set_global_alpha(1.0);
            }

            // Bucket body and rim
            ctx.set_fill_style_str(colors::BUCKET_BODY);
            let b = frame.bucket_body;
            ctx.fill_rect(b.x as f64, b.y as f64, b.w as f64, b.h as f64);
            ctx.set_fill_style_str(colors::BUCKET_RIM);
            let r = frame.bucket_rim;
            ctx.fill_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);

            // HUD
            ctx.set_fill_style_str(colors::HUD_TEXT);
            ctx.set_font("bold 16px monospace");
            ctx.set_text_align("center");
            for line in &frame.hud {
                let _ = ctx.fill_text(&line.text, line.x as f64, line.y as f64);
            }
            if self.settings.show_fps {
                ctx.set_text_align("left");
                let _ = ctx.fill_text(&format!("{} FPS", self.fps), 10.0, 20.0);
                ctx.set_text_align("center");
            }

            // Phase overlay
            if let Some(overlay) = frame.overlay {
                ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
                ctx.fill_rect(0.0, 0.0, PLAYFIELD_WIDTH as f64, PLAYFIELD_HEIGHT as f64);
                ctx.set_fill_style_str(colors::HUD_TEXT);
                ctx.set_font("bold 32px monospace");
                let cx = (PLAYFIELD_WIDTH / 2.0) as f64;
                let cy = (PLAYFIELD_HEIGHT / 2.0) as f64;
                match overlay {
                    Overlay::PressStart => {
                        let _ = ctx.fill_text("WATERDROP '88", cx, cy - 20.0);
                        ctx.set_font("bold 16px monospace");
                        let _ = ctx.fill_text("Press SPACE or tap Start", cx, cy + 20.0);
                    }
                    Overlay::Paused => {
                        let _ = ctx.fill_text("PAUSED", cx, cy);
                    }
                    Overlay::GameOver => {
                        let _ = ctx.fill_text("GAME OVER", cx, cy - 30.0);
                        ctx.set_font("bold 16px monospace");
                        let _ = ctx.fill_text(
                            &format!("Final Score: {}", self.state.score),
                            cx,
                            cy + 10.0,
                        );
                        let _ = ctx.fill_text(
                            &format!("Best: {}", self.state.high_score),
                            cx,
                            cy + 35.0,
                        );
                    }
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Waterdrop '88 starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_tilt_controls(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game, ctx);

        log::info!("Waterdrop '88 running!");
    }

    /// Convert a canvas-local pixel position to playfield x (the canvas may
    /// be CSS-scaled)
    fn canvas_to_playfield_x(canvas: &HtmlCanvasElement, x: f32) -> f32 {
        let client_w = canvas.client_width() as f32;
        if client_w > 0.0 {
            x * PLAYFIELD_WIDTH / client_w
        } else {
            x
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - absolute position under the cursor
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let x = canvas_to_playfield_x(&canvas_clone, event.offset_x() as f32);
                game.borrow_mut().set_target(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - absolute position under the finger
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let x = canvas_to_playfield_x(&canvas_clone, x);
                    game.borrow_mut().set_target(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start doubles as the start button once a run has ended
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.state.phase != GamePhase::Running {
                    g.input.start = true;
                    g.audio.resume();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - discrete steps plus run control
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().to_lowercase().as_str() {
                    "arrowleft" | "a" => {
                        let x = g.state.catcher.x - KEYBOARD_STEP;
                        g.set_target(x);
                    }
                    "arrowright" | "d" => {
                        let x = g.state.catcher.x + KEYBOARD_STEP;
                        g.set_target(x);
                    }
                    " " => {
                        g.input.start = true;
                        g.audio.resume();
                    }
                    "escape" | "p" => g.input.pause = true,
                    "r" => g.input.reset = true,
                    "m" => {
                        let muted = !g.audio.muted();
                        g.audio.set_muted(muted);
                        g.settings.muted = muted;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Device-tilt steering: gamma clamped to +/-30 degrees maps to
    /// center +/- a third of the playfield
    fn setup_tilt_controls(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure =
            Closure::<dyn FnMut(_)>::new(move |event: web_sys::DeviceOrientationEvent| {
                let mut g = game.borrow_mut();
                if !g.settings.tilt_controls || g.state.phase != GamePhase::Running {
                    return;
                }
                let gamma = event.gamma().unwrap_or(0.0) as f32;
                let normalized = gamma.clamp(-TILT_MAX_DEGREES, TILT_MAX_DEGREES) / TILT_MAX_DEGREES;
                let x = PLAYFIELD_WIDTH / 2.0 + normalized * (PLAYFIELD_WIDTH / 3.0);
                g.set_target(x);
            });
        let _ = window
            .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.start = true;
                g.audio.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.reset = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let muted = !g.audio.muted();
                g.audio.set_muted(muted);
                g.settings.muted = muted;
                g.settings.save();
                log::info!("Muted: {}", muted);
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
                    if g.state.phase == GamePhase::Running {
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
                if g.state.phase == GamePhase::Running {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ctx: CanvasRenderingContext2d) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, ctx, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ctx: CanvasRenderingContext2d, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(&ctx);
        }

        request_animation_frame(game, ctx);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use waterdrop88::highscore::{MemoryScore, ScoreStore};
    use waterdrop88::sim::{tick, GameEvent, GamePhase, GameState, TickInput};
    use waterdrop88::Tuning;

    env_logger::init();
    log::info!("Waterdrop '88 (native) starting...");
    log::info!("Headless attract-mode run; build with trunk for the web version");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(88);
    let mut score_store = MemoryScore::default();
    let mut state = GameState::new(seed, Tuning::default(), score_store.load());

    // One minute of autopilot at 60 Hz, or until the run ends
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    tick(&mut state, &TickInput { start: true, ..input.clone() });
    for _ in 0..3600 {
        if state.phase == GamePhase::GameOver {
            break;
        }
        tick(&mut state, &input);
    }

    for event in state.take_events() {
        if let GameEvent::GameOver { new_record: true, .. } = event {
            score_store.save(state.high_score);
        }
    }

    println!(
        "seed {} | {} ticks | score {} | level {} | lives {} | phase {:?}",
        state.seed, state.time_ticks, state.score, state.level, state.lives, state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
