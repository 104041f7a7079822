//! Penalty Shot entry point
//!
//! Web: binds pointer input on the pitch, runs the frame loop and mirrors the
//! game view into the DOM. Native: headless demo session played by the bot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, PointerEvent};

    use penalty_shot::audio::{AudioManager, SoundEffect};
    use penalty_shot::sim::{GameState, PhaseKind, TickInput, View, tick};
    use penalty_shot::{AutoPlayer, Settings};

    /// Longest frame fed to the sim (ms); a backgrounded tab just pauses
    const MAX_FRAME_MS: f64 = 250.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        last_time: f64,
        carry_ms: f64,
        settings: Settings,
        audio: AudioManager,
        /// Demo mode bot
        bot: Option<AutoPlayer>,
        /// Last view written to the DOM
        last_view: Option<View>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let audio = AudioManager::new(settings.effective_volume());
            Self {
                state: GameState::new(seed),
                input: TickInput::default(),
                last_time: 0.0,
                carry_ms: 0.0,
                settings,
                audio,
                bot: None,
                last_view: None,
            }
        }

        /// Run the sim for one frame
        fn update(&mut self, dt_ms: u64) {
            let user = std::mem::take(&mut self.input);
            let input = match self.bot.as_mut() {
                Some(bot) => bot.input_with(&self.state, &user),
                None => user,
            };
            tick(&mut self.state, &input, dt_ms);

            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Mirror the view into the DOM (only when it changed)
        fn update_dom(&mut self, document: &Document) {
            let view = self.state.view();
            if self.last_view == Some(view) {
                return;
            }
            self.last_view = Some(view);

            if let Some(pitch) = document.get_element_by_id("pitch") {
                let _ = pitch.set_attribute("data-phase", view.phase.as_str());
                let _ = pitch.set_attribute("data-keeper", view.keeper.as_str());
                let motion = if self.settings.reduced_motion { "reduced" } else { "full" };
                let _ = pitch.set_attribute("data-motion", motion);
            }

            set_style(document, "power-fill", "width", &format!("{}%", view.power));
            if self.settings.show_power_value {
                set_text(document, "power-value", &format!("{}%", view.power));
            }

            set_style(document, "ball", "left", &format!("{}%", view.ball.x));
            set_style(document, "ball", "top", &format!("{}%", view.ball.y));

            if let Some(el) = document.get_element_by_id("result-overlay") {
                if view.phase == PhaseKind::Resolved {
                    let _ = el.set_attribute("class", "");
                    let text = match view.result {
                        Some(result) => result.as_str().to_uppercase(),
                        None => String::new(),
                    };
                    el.set_text_content(Some(&text));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            set_text(document, "score-goals", &view.successes.to_string());
            set_text(document, "score-attempts", &view.attempts.to_string());
            set_text(document, "score-rate", &format!("{}%", view.success_rate));
            set_text(document, "score-streak", &view.best_streak.to_string());
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_style(document: &Document, id: &str, prop: &str, value: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let _ = el.style().set_property(prop, value);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(pitch) = document.get_element_by_id("pitch") else {
            web_sys::console::error_1(&"No #pitch element".into());
            return;
        };

        let settings = Settings::load(&pitch);
        let _ = console_log::init_with_level(settings.log_level());
        log::info!("Penalty Shot starting...");

        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        setup_input_handlers(&pitch, game.clone());
        setup_reset_button(&document, game.clone());
        setup_demo_button(&document, game.clone());
        request_animation_frame(game);

        log::info!("Penalty Shot running!");
    }

    fn setup_input_handlers(pitch: &Element, game: Rc<RefCell<Game>>) {
        // Stop touch scrolling and text selection on the pitch
        if let Ok(el) = pitch.clone().dyn_into::<web_sys::HtmlElement>() {
            let _ = el.style().set_property("touch-action", "none");
            let _ = el.style().set_property("user-select", "none");
        }

        // Press start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().input.press = true;
            });
            let _ = pitch
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Press end - also when the pointer is lost, so a shot never sticks
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().input.release = true;
            });
            let _ = pitch.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // No context menu on long press
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = pitch
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_reset_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.reset = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_demo_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("demo-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.bot = match g.bot {
                    Some(_) => None,
                    None => Some(AutoPlayer::new(js_sys::Date::now() as u64)),
                };
                // Keep a pending reset; drop half-finished presses
                g.input.press = false;
                g.input.release = false;
                log::info!("Demo mode: {}", g.bot.is_some());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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

            let elapsed = if g.last_time > 0.0 {
                (time - g.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            g.last_time = time;

            // Carry the sub-millisecond remainder so the clock does not drift
            let total = elapsed + g.carry_ms;
            let dt_ms = total.floor();
            g.carry_ms = total - dt_ms;

            g.update(dt_ms as u64);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_dom(&document);
            }
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
    use penalty_shot::consts::{OVERLAY_DELAY_MS, RESET_DELAY_MS};
    use penalty_shot::sim::{GameEvent, GameState, tick};
    use penalty_shot::{AutoPlayer, Settings};

    /// Rounds in the headless demo
    const DEMO_ROUNDS: u32 = 10;
    /// Simulated frame length (ms)
    const FRAME_MS: u64 = 16;

    env_logger::init();
    let settings = Settings::load();
    log::info!("Penalty Shot (native) starting...");
    log::info!("Native mode plays a headless demo - run with `trunk serve` for the web version");
    log::debug!("Settings: {:?}", settings);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Game initialized with seed: {}", seed);

    let mut state = GameState::new(seed);
    let mut bot = AutoPlayer::new(seed.wrapping_add(1));

    // Worst case a round is a full charge plus both display delays
    let max_frames = DEMO_ROUNDS as u64 * (2500 + OVERLAY_DELAY_MS + RESET_DELAY_MS) / FRAME_MS + 1;
    let mut rounds = 0;
    for _ in 0..max_frames {
        let input = bot.input(&state);
        tick(&mut state, &input, FRAME_MS);

        for event in state.drain_events() {
            if let GameEvent::RoundReset = event {
                rounds += 1;
                if let Ok(json) = serde_json::to_string(&state.view()) {
                    log::debug!("view: {}", json);
                }
            }
        }
        if rounds >= DEMO_ROUNDS {
            break;
        }
    }

    let session = state.session;
    println!(
        "{} goals from {} shots ({}%), best streak {}",
        session.successes,
        session.attempts,
        session.success_rate(),
        session.best_streak
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
