//! Mini Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop. On the
//! web the variant comes from `?game=<slug>` (falling back to the last one
//! played); natively every variant runs headless under a simple autoplayer.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use mini_arcade::audio::{AudioManager, SoundEffect};
    use mini_arcade::consts::*;
    use mini_arcade::renderer::{Align, CanvasRenderer, Color, DrawCommand, SceneOptions, scene_with};
    use mini_arcade::sim::{
        GameEvent, GamePhase, GameRules, Intent, Interaction, Session, Target, tick,
    };
    use mini_arcade::{
        BalloonPop, BestScores, MathQuiz, PaintCatch, Settings, TreasureHunt, Tuning, Variant,
        platform,
    };

    /// Game instance holding all frontend state
    struct Game<R: GameRules> {
        session: Session<R>,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        best: BestScores,
        /// Intents waiting for the next tick
        pending: Vec<Intent>,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl<R: GameRules> Game<R> {
        fn new(rules: R, renderer: CanvasRenderer, settings: Settings, seed: u64) -> Self {
            let variant = rules.variant();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                session: Session::new(rules, seed),
                renderer,
                audio,
                settings,
                best: BestScores::load(variant),
                pending: Vec::new(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn push(&mut self, intent: Intent) {
            self.pending.push(intent);
        }

        /// Primary action (space, click on an overlay): start, restart,
        /// resume, or dig
        fn primary(&mut self) {
            self.audio.resume();
            let intent = match self.session.phase {
                GamePhase::Waiting => Intent::Start,
                GamePhase::GameOver => Intent::Restart,
                GamePhase::Paused => Intent::Resume,
                GamePhase::Playing => Intent::Fire,
            };
            self.push(intent);
        }

        fn toggle_pause(&mut self) {
            match self.session.phase {
                GamePhase::Playing => self.push(Intent::Pause),
                GamePhase::Paused => self.push(Intent::Resume),
                _ => {}
            }
        }

        /// Click/tap at an arena position
        fn pointer(&mut self, pos: Vec2) {
            self.audio.resume();
            match self.session.phase {
                GamePhase::Playing => self.push(Intent::Select(Target::Point(pos))),
                _ => self.primary(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let intents = std::mem::take(&mut self.pending);
                tick(&mut self.session, &intents, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            self.handle_events();

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

        fn handle_events(&mut self) {
            for event in self.session.drain_events() {
                if let Some(sound) = SoundEffect::for_event(&event) {
                    self.audio.play(sound);
                }
                if let GameEvent::GameOver { score } = event {
                    let variant = self.session.rules.variant();
                    if !self.best.qualifies(score) {
                        continue;
                    }
                    if let Some(rank) = self.best.record(score) {
                        self.best.save(variant);
                        log::info!("Score {} placed #{} for {}", score, rank, variant.name());
                        if rank == 1 {
                            self.audio.play(SoundEffect::HighScore);
                        }
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            let options = SceneOptions {
                reduced_motion: self.settings.reduced_motion,
            };
            let mut commands = scene_with(&self.session, options);
            let arena = self.session.arena();
            if let Some(best) = self.best.best() {
                commands.push(DrawCommand::Text {
                    pos: Vec2::new(arena.x - 16.0, arena.y - 16.0),
                    text: format!("Best {}", best),
                    size: 16.0,
                    color: Color::WHITE.with_alpha(0.7),
                    align: Align::Right,
                });
            }
            if self.settings.show_fps {
                commands.push(DrawCommand::Text {
                    pos: Vec2::new(16.0, arena.y - 16.0),
                    text: format!("{} fps", self.fps),
                    size: 14.0,
                    color: Color::WHITE.with_alpha(0.6),
                    align: Align::Left,
                });
            }
            self.renderer.draw(&commands);
        }
    }

    /// Variant from `?game=<slug>`
    fn variant_from_query() -> Option<Variant> {
        let search = web_sys::window()?.location().search().ok()?;
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "game")
            .and_then(|(_, v)| Variant::from_slug(v))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Mini Arcade starting...");

        let mut settings = Settings::load();
        let variant = variant_from_query().unwrap_or(settings.last_variant);
        if settings.last_variant != variant {
            settings.last_variant = variant;
            settings.save();
        }

        let tuning_key = format!("mini_arcade_tuning_{}", variant.slug());
        let tuning = Tuning::for_variant_with_override(
            variant,
            platform::read(&tuning_key).as_deref(),
        );

        match variant {
            Variant::MathQuiz => start(MathQuiz::with_tuning(tuning), settings),
            Variant::BalloonPop => start(BalloonPop::with_tuning(tuning), settings),
            Variant::PaintCatch => start(PaintCatch::with_tuning(tuning), settings),
            Variant::TreasureHunt => start(TreasureHunt::with_tuning(tuning), settings),
        }
    }

    fn start<R: GameRules + 'static>(rules: R, settings: Settings) {
        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if let Some(title) = document.get_element_by_id("title") {
            title.set_text_content(Some(rules.variant().name()));
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Backing store sized to the arena at device resolution
        let tuning = rules.tuning();
        let dpr = window.device_pixel_ratio();
        canvas.set_width((tuning.arena_width as f64 * dpr) as u32);
        canvas.set_height((tuning.arena_height as f64 * dpr) as u32);
        let renderer = CanvasRenderer::new(&canvas, dpr);

        let seed = js_sys::Date::now() as u64;
        let variant = rules.variant();
        let game = Rc::new(RefCell::new(Game::new(rules, renderer, settings, seed)));
        log::info!("{} initialized with seed: {}", variant.name(), seed);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);
        log::info!("Mini Arcade running!");
    }

    /// Client coordinates -> arena pixels
    fn to_arena(canvas: &HtmlCanvasElement, arena: Vec2, client_x: f64, client_y: f64) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let (w, h) = (rect.width().max(1.0), rect.height().max(1.0));
        Vec2::new(
            ((client_x - rect.left()) / w) as f32 * arena.x,
            ((client_y - rect.top()) / h) as f32 * arena.y,
        )
    }

    fn setup_input_handlers<R: GameRules + 'static>(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game<R>>>,
    ) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Mouse click
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let arena = g.session.arena();
                let pos = to_arena(
                    &canvas_ref,
                    arena,
                    event.client_x() as f64,
                    event.client_y() as f64,
                );
                g.pointer(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: taps select; in Paint Catch holding a side of the screen
        // also steers the bucket
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                let arena = g.session.arena();
                let pos = to_arena(
                    &canvas_ref,
                    arena,
                    touch.client_x() as f64,
                    touch.client_y() as f64,
                );

                let steer = g.session.rules.interaction() == Interaction::Catch
                    && g.session.phase == GamePhase::Playing;
                if let (true, Some(player)) = (steer, g.session.player) {
                    let left = pos.x < player.pos.x;
                    g.push(Intent::MoveLeft(left));
                    g.push(Intent::MoveRight(!left));
                } else {
                    g.pointer(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.push(Intent::MoveLeft(false));
                g.push(Intent::MoveRight(false));
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        g.primary();
                    }
                    "p" | "P" | "Escape" => g.toggle_pause(),
                    "r" | "R" => {
                        if g.session.phase == GamePhase::Paused {
                            g.push(Intent::Reset);
                        }
                    }
                    "ArrowLeft" | "a" | "A" => g.push(Intent::MoveLeft(true)),
                    "ArrowRight" | "d" | "D" => g.push(Intent::MoveRight(true)),
                    "m" | "M" => {
                        g.settings.muted = !g.settings.muted;
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        g.settings.save();
                    }
                    "v" | "V" => {
                        g.settings.reduced_motion = !g.settings.reduced_motion;
                        g.settings.save();
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    "c" | "C" => {
                        // Only from the start screen so a run can't wipe its own table
                        if g.session.phase == GamePhase::Waiting {
                            let variant = g.session.rules.variant();
                            g.best.reset(variant);
                            log::info!("Best scores cleared for {}", variant.name());
                        }
                    }
                    key => {
                        if let Some(n) = key.parse::<usize>().ok().filter(|n| (1..=CHOICE_COUNT).contains(n)) {
                            g.push(Intent::Select(Target::Choice(n - 1)));
                        }
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.push(Intent::MoveLeft(false)),
                    "ArrowRight" | "d" | "D" => g.push(Intent::MoveRight(false)),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame<R: GameRules + 'static>(game: Rc<RefCell<Game<R>>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop<R: GameRules + 'static>(game: Rc<RefCell<Game<R>>>, time: f64) {
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
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause<R: GameRules + 'static>(game: Rc<RefCell<Game<R>>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.settings.pause_on_blur && g.session.phase == GamePhase::Playing {
                        g.push(Intent::Pause);
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
                if g.settings.pause_on_blur && g.session.phase == GamePhase::Playing {
                    g.push(Intent::Pause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use mini_arcade::{BalloonPop, MathQuiz, PaintCatch, TreasureHunt};

    env_logger::init();
    log::info!("Mini Arcade (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the real games");

    let seed = 2024;
    demo::report(MathQuiz::default(), seed);
    demo::report(BalloonPop::default(), seed);
    demo::report(PaintCatch::default(), seed);
    demo::report(TreasureHunt::default(), seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autoplayer: answers correctly, avoids hazards, chases rewards
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use mini_arcade::consts::SIM_DT;
    use mini_arcade::sim::{
        GamePhase, GameRules, Intent, Interaction, Outcome, Session, Target, tick,
    };

    pub fn report<R: GameRules>(rules: R, seed: u64) {
        let name = rules.variant().name();
        let mut session = Session::new(rules, seed);
        tick(&mut session, &[Intent::Start], 0.0);

        let mut frames = 0u32;
        while session.phase == GamePhase::Playing && frames < 60 * 600 {
            let intents = decide(&session);
            tick(&mut session, &intents, SIM_DT);
            session.drain_events();
            frames += 1;
        }

        println!(
            "{:<14} score {:>5}  best streak {:>3}  tier {}  lives {}  ({:.1}s)",
            name,
            session.score,
            session.max_streak,
            session.tier,
            session
                .lives
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string()),
            session.elapsed
        );
    }

    fn is_hazard<R: GameRules>(session: &Session<R>, kind: R::Kind) -> bool {
        session.rules.reward(kind).outcome == Outcome::Hazard
    }

    fn decide<R: GameRules>(session: &Session<R>) -> Vec<Intent> {
        if session.awaiting_answer() {
            let index = session
                .challenge
                .as_ref()
                .map(|c| c.correct_index())
                .unwrap_or_default();
            return vec![Intent::Select(Target::Choice(index))];
        }
        if session.challenge.is_some() {
            return Vec::new();
        }

        let target = session
            .entities
            .alive()
            .filter(|e| !is_hazard(session, e.kind))
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        match session.rules.interaction() {
            Interaction::Choices => Vec::new(),
            Interaction::Tap => target
                .map(|e| vec![Intent::Select(Target::Point(e.pos))])
                .unwrap_or_default(),
            Interaction::Catch | Interaction::Dig => {
                let (Some(player), Some(e)) = (session.player, target) else {
                    return vec![Intent::MoveLeft(false), Intent::MoveRight(false)];
                };
                let dx = e.pos.x - player.pos.x;
                let close = dx.abs() < e.radius();
                let mut intents = vec![
                    Intent::MoveLeft(!close && dx < 0.0),
                    Intent::MoveRight(!close && dx > 0.0),
                ];
                if close && session.rules.interaction() == Interaction::Dig {
                    intents.push(Intent::Fire);
                }
                intents
            }
        }
    }
}
