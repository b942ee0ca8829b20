//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, on-screen buttons, pointer)
//! - HUD text and overlays (DOM on web, log lines natively)
//! - Asset fetching (web only)

#[cfg(target_arch = "wasm32")]
pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod dom;

/// Player intents, independent of where they came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    ToggleMute,
    Restart,
    /// Any pointer press; used to unlock audio
    PointerDown,
}

/// Map a keyboard `key` value to an input. Auto-repeat is ignored so a held
/// key counts as a single press.
pub fn input_for_key(key: &str, repeat: bool) -> Option<InputEvent> {
    if repeat {
        return None;
    }
    match key {
        "ArrowLeft" => Some(InputEvent::MoveLeft),
        "ArrowRight" => Some(InputEvent::MoveRight),
        _ => None,
    }
}

/// Score readouts and overlays
pub trait Hud {
    /// Loader progress, `fraction` in [0, 1]
    fn set_load_progress(&mut self, fraction: f32);

    /// All assets settled
    fn loading_complete(&mut self);

    fn set_score(&mut self, score: u64);

    fn set_high_score(&mut self, high_score: u64);

    fn set_sound_icon(&mut self, sound_on: bool);

    fn show_game_over(&mut self, final_score: u64);

    fn hide_game_over(&mut self);
}

/// Percentage shown by the loader, rounded
pub fn progress_percent(fraction: f32) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

pub fn progress_label(fraction: f32) -> String {
    format!("Loading... {}%", progress_percent(fraction))
}

pub fn score_label(score: u64) -> String {
    format!("Score: {}", score)
}

pub fn high_score_label(high_score: u64) -> String {
    format!("High: {}", high_score)
}

pub fn sound_icon(sound_on: bool) -> &'static str {
    if sound_on { "🔊" } else { "🔇" }
}

/// HUD that writes to the log (native builds)
#[derive(Debug, Default)]
pub struct LogHud {
    last_score: Option<u64>,
}

impl Hud for LogHud {
    fn set_load_progress(&mut self, fraction: f32) {
        log::debug!("{}", progress_label(fraction));
    }

    fn loading_complete(&mut self) {
        log::info!("Assets ready");
    }

    fn set_score(&mut self, score: u64) {
        if self.last_score != Some(score) {
            log::debug!("{}", score_label(score));
            self.last_score = Some(score);
        }
    }

    fn set_high_score(&mut self, high_score: u64) {
        log::debug!("{}", high_score_label(high_score));
    }

    fn set_sound_icon(&mut self, sound_on: bool) {
        log::debug!("sound {}", if sound_on { "on" } else { "off" });
    }

    fn show_game_over(&mut self, final_score: u64) {
        log::info!("Game over - {}", score_label(final_score));
    }

    fn hide_game_over(&mut self) {}
}
