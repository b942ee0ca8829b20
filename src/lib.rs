//! Car Dodger - a four-lane dodge-traffic-and-collect-coins arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawning, collisions, scoring)
//! - `stage`: Preload and gameplay stages driven by the frame loop
//! - `audio`: Named sound handles and the browser audio backend
//! - `platform`: HUD and input abstraction, browser bindings
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance
//! - `renderer`: Canvas 2D drawing (web only)

pub mod audio;
pub mod error;
pub mod highscore;
pub mod persistence;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stage;
pub mod tuning;

#[cfg(test)]
mod test_utils;

pub use highscore::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// LocalStorage key for the best score
    pub const HIGH_SCORE_KEY: &str = "car_dodger_high";
    /// LocalStorage key for player settings
    pub const SETTINGS_KEY: &str = "car_dodger_settings";

    /// Player car display size and anchor
    pub const PLAYER_SIZE: Vec2 = Vec2::new(78.0, 120.0);
    pub const PLAYER_ORIGIN: Vec2 = Vec2::new(0.5, 0.7);
    /// Player body is smaller than the sprite
    pub const PLAYER_BODY_SCALE: Vec2 = Vec2::new(0.8, 0.6);

    /// Enemy car display size and anchor
    pub const ENEMY_SIZE: Vec2 = Vec2::new(56.0, 92.0);
    pub const ENEMY_ORIGIN: Vec2 = Vec2::new(0.5, 0.7);

    pub const COIN_SIZE: Vec2 = Vec2::new(46.0, 46.0);
    pub const COIN_ORIGIN: Vec2 = Vec2::new(0.5, 0.5);

    /// Shadow ellipse under the player
    pub const SHADOW_OFFSET_Y: f32 = 22.0;
    pub const SHADOW_WIDTH_FRACTION: f32 = 0.88;
    pub const SHADOW_HEIGHT: f32 = 18.0;
    pub const SHADOW_ALPHA: f64 = 0.2;

    /// Longest frame the browser loop will simulate (tab switches)
    pub const MAX_FRAME_MS: f32 = 100.0;
    /// Delay before the loading overlay fades after assets settle
    pub const PRELOAD_HIDE_DELAY_MS: i32 = 200;
    /// Assets still unsettled after this long are given up on
    pub const ASSET_TIMEOUT_MS: f32 = 10_000.0;
}
