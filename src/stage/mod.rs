//! Stage system
//!
//! A stage is one phase of the app driven by the frame loop: first the
//! preload stage fetches assets, then it hands over to the gameplay stage,
//! which runs until the page closes.
//!
//! Collaborators (HUD, audio, storage) are bundled in [`Services`] and moved
//! from stage to stage; nothing reaches for globals.

pub mod gameplay;
pub mod preload;

pub use gameplay::GameplayStage;
pub use preload::{AssetKind, AssetSpec, LoadOutcome, LoadTracker, MANIFEST, PreloadStage};

use crate::audio::AudioSink;
use crate::persistence::KeyValueStore;
use crate::platform::{Hud, InputEvent};
use crate::sim::GameState;

/// Everything a stage talks to outside the simulation
pub struct Services {
    pub hud: Box<dyn Hud>,
    pub audio: Box<dyn AudioSink>,
    pub store: Box<dyn KeyValueStore>,
}

/// What the director should do after a frame
pub enum StageTransition {
    None,
    Replace(Box<dyn Stage>),
}

/// Stage lifecycle. Only `on_frame` is required.
pub trait Stage {
    fn name(&self) -> &'static str;

    /// Called once when the stage becomes active
    fn setup(&mut self) {}

    /// Called every frame with the loop's timestamp and elapsed time
    fn on_frame(&mut self, time_ms: f64, delta_ms: f32) -> StageTransition;

    fn handle_input(&mut self, _event: InputEvent) {}

    /// An asset fetch finished, successfully or not
    fn asset_settled(&mut self, _key: &str, _outcome: LoadOutcome) {}

    /// Game state to draw, if this stage has one
    fn game_state(&self) -> Option<&GameState> {
        None
    }
}

/// Runs the active stage and performs transitions
pub struct Director {
    stage: Box<dyn Stage>,
}

impl Director {
    pub fn new(mut first: Box<dyn Stage>) -> Self {
        log::info!("Entering stage: {}", first.name());
        first.setup();
        Self { stage: first }
    }

    pub fn frame(&mut self, time_ms: f64, delta_ms: f32) {
        if let StageTransition::Replace(mut next) = self.stage.on_frame(time_ms, delta_ms) {
            log::info!("Stage {} -> {}", self.stage.name(), next.name());
            next.setup();
            self.stage = next;
        }
    }

    pub fn input(&mut self, event: InputEvent) {
        self.stage.handle_input(event);
    }

    pub fn asset_settled(&mut self, key: &str, outcome: LoadOutcome) {
        self.stage.asset_settled(key, outcome);
    }

    pub fn stage_name(&self) -> &'static str {
        self.stage.name()
    }

    pub fn game_state(&self) -> Option<&GameState> {
        self.stage.game_state()
    }
}
