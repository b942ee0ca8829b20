//! Car Dodger entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use car_dodger::audio::WebAudio;
    use car_dodger::consts::MAX_FRAME_MS;
    use car_dodger::persistence::LocalStore;
    use car_dodger::platform::assets::{self, ImageBank};
    use car_dodger::platform::dom::{self, DomHud};
    use car_dodger::renderer::CanvasRenderer;
    use car_dodger::stage::{Director, MANIFEST, PreloadStage, Services};
    use car_dodger::{Settings, Tuning};

    /// Browser game wrapper
    struct Game {
        director: Rc<RefCell<Director>>,
        renderer: CanvasRenderer,
        last_time: f64,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            // First frame and long stalls are clamped
            let delta = if self.last_time > 0.0 {
                ((time - self.last_time) as f32).clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;
            self.director.borrow_mut().frame(time, delta);
        }

        fn render(&self) {
            let director = self.director.borrow();
            if let Err(e) = self.renderer.render(director.game_state()) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Car Dodger starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let tuning = Tuning::default();

        // Canvas inside the page's game container
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_id("canvas");
        canvas.set_width(tuning.canvas_width as u32);
        canvas.set_height(tuning.canvas_height as u32);
        match document.get_element_by_id("game-container") {
            Some(container) => container.append_child(&canvas)?,
            None => document
                .body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&canvas)?,
        };

        let mut store = LocalStore::open();
        let settings = Settings::load(&store);
        // Writes defaults back on first run so the key exists for editing
        settings.save(&mut store);

        let audio = WebAudio::new();
        let sounds = audio.bank();
        let images: ImageBank = Rc::new(RefCell::new(HashMap::new()));

        let services = Services {
            hud: Box::new(DomHud::new(document.clone())),
            audio: Box::new(audio),
            store: Box::new(store),
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Seed: {}", seed);
        let preload = PreloadStage::new(MANIFEST, services, tuning, settings.clone(), seed);
        let director = Rc::new(RefCell::new(Director::new(Box::new(preload))));

        dom::wire_controls(&document, director.clone())?;
        assets::load_manifest(MANIFEST, director.clone(), images.clone(), sounds, &settings);

        let game = Rc::new(RefCell::new(Game {
            director,
            renderer: CanvasRenderer::new(&canvas, images)?,
            last_time: 0.0,
        }));

        // Start game loop
        request_animation_frame(game);

        log::info!("Car Dodger running!");
        Ok(())
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
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Car Dodger (native) starting...");
    log::info!("Native mode runs a headless session - use `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => car_dodger::Tuning::default(),
    };
    headless::run(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Read a tuning override file, falling back to defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> car_dodger::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| car_dodger::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Tuning loaded from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            car_dodger::Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use car_dodger::audio::SilentAudio;
    use car_dodger::persistence::MemoryStore;
    use car_dodger::platform::{InputEvent, LogHud};
    use car_dodger::sim::GameState;
    use car_dodger::stage::{Director, LoadOutcome, MANIFEST, PreloadStage, Services};
    use car_dodger::{HighScore, Settings, Tuning};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Two simulated minutes
    const MAX_FRAMES: u32 = 60 * 120;
    /// How far ahead the autopilot looks for traffic
    const LOOKAHEAD: f32 = 320.0;
    const SEED: u64 = 0x00C0_FFEE;

    pub fn run(tuning: Tuning) {
        let store = MemoryStore::new();
        let settings = Settings::load(&store);
        let high = HighScore::load(&store);
        log::info!("Previous best: {}", high.0);

        let services = Services {
            hud: Box::new(LogHud::default()),
            audio: Box::new(SilentAudio::new()),
            store: Box::new(store),
        };
        let preload = PreloadStage::new(MANIFEST, services, tuning, settings, SEED);
        let mut director = Director::new(Box::new(preload));

        for spec in MANIFEST {
            director.asset_settled(spec.key, LoadOutcome::Loaded);
        }

        let mut time = 0.0f64;
        let mut frames = 0;
        while frames < MAX_FRAMES {
            time += FRAME_MS as f64;
            director.frame(time, FRAME_MS);
            frames += 1;

            let Some(state) = director.game_state() else {
                continue;
            };
            if state.game_over {
                break;
            }
            if let Some(input) = autopilot(state) {
                director.input(input);
            }
        }

        match director.game_state() {
            Some(state) => log::info!(
                "Session over after {} frames: score {}, best {}, multiplier {:.2}, crashed: {}",
                frames,
                state.score,
                state.high_score,
                state.multiplier,
                state.game_over
            ),
            None => log::warn!("Session ended before gameplay started"),
        }
    }

    fn lane_blocked(state: &GameState, lane: usize) -> bool {
        let y = state.player.pos.y;
        state
            .enemies
            .iter()
            .any(|e| e.lane == lane && e.pos.y < y + 40.0 && e.pos.y > y - LOOKAHEAD)
    }

    /// Steer out of a lane with oncoming traffic
    fn autopilot(state: &GameState) -> Option<InputEvent> {
        let lane = state.player.lane;
        if state.player.is_transitioning() || !lane_blocked(state, lane) {
            return None;
        }
        if lane > 0 && !lane_blocked(state, lane - 1) {
            Some(InputEvent::MoveLeft)
        } else if lane < state.lanes.last_index() && !lane_blocked(state, lane + 1) {
            Some(InputEvent::MoveRight)
        } else {
            None
        }
    }
}
