//! Data-driven game balance
//!
//! Every gameplay number lives here so a run can be re-tuned from JSON without
//! touching the simulation. Missing fields fall back to the shipped defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Layout ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub lane_count: usize,
    /// Road width as a fraction of canvas width (lanes span the road)
    pub road_width_fraction: f32,
    /// Player y as a fraction of canvas height
    pub player_y_fraction: f32,
    pub start_lane: usize,

    // === Traffic ===
    /// Downward speed of enemies before multiplier and jitter (px/s)
    pub base_speed: f32,
    pub spawn_interval_min_ms: u32,
    pub spawn_interval_max_ms: u32,
    /// Probability that a coin spawns alongside an enemy
    pub coin_chance: f64,
    /// Upper bound of the random speed bonus added to each enemy
    pub enemy_speed_jitter: f32,
    pub coin_speed_factor: f32,
    pub enemy_spawn_y: f32,
    pub coin_spawn_y: f32,
    /// Entities further than this below the canvas are destroyed
    pub offscreen_margin: f32,

    // === Player ===
    pub lane_change_ms: f32,

    // === Scoring ===
    /// Passive points per second at multiplier 1.0
    pub passive_score_rate: f32,
    /// Multiplier is recomputed whenever score lands on a multiple of this
    pub ramp_step: u64,
    pub ramp_divisor: f32,
    pub coin_base_points: u64,
    /// Coin bonus is floor(multiplier * this)
    pub coin_multiplier_points: f32,

    // === Effects ===
    pub shake_ms: f32,
    /// Shake amplitude as a fraction of canvas size
    pub shake_intensity: f32,
    pub dash_scroll_rate: f32,
    pub road_scroll_rate: f32,
    pub tree_scroll_rate: f32,
    pub hud_refresh_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 540.0,
            canvas_height: 960.0,
            lane_count: 4,
            road_width_fraction: 0.6,
            player_y_fraction: 0.78,
            start_lane: 1,

            base_speed: 180.0,
            spawn_interval_min_ms: 800,
            spawn_interval_max_ms: 1200,
            coin_chance: 0.26,
            enemy_speed_jitter: 0.25,
            coin_speed_factor: 0.9,
            enemy_spawn_y: -120.0,
            coin_spawn_y: -80.0,
            offscreen_margin: 200.0,

            lane_change_ms: 180.0,

            passive_score_rate: 2.0,
            ramp_step: 30,
            ramp_divisor: 200.0,
            coin_base_points: 10,
            coin_multiplier_points: 2.0,

            shake_ms: 350.0,
            shake_intensity: 0.015,
            dash_scroll_rate: 0.95,
            road_scroll_rate: 0.8,
            tree_scroll_rate: 0.35,
            hud_refresh_ms: 200.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 {
            return Err(out_of_range("canvas_width", self.canvas_width as f64));
        }
        if self.canvas_height <= 0.0 {
            return Err(out_of_range("canvas_height", self.canvas_height as f64));
        }
        if self.lane_count == 0 {
            return Err(out_of_range("lane_count", 0.0));
        }
        if self.start_lane >= self.lane_count {
            return Err(out_of_range("start_lane", self.start_lane as f64));
        }
        if !(0.0..=1.0).contains(&self.road_width_fraction) {
            return Err(out_of_range(
                "road_width_fraction",
                self.road_width_fraction as f64,
            ));
        }
        if !(0.0..=1.0).contains(&self.coin_chance) {
            return Err(out_of_range("coin_chance", self.coin_chance));
        }
        if self.spawn_interval_min_ms > self.spawn_interval_max_ms {
            return Err(ConfigError::InvertedSpawnRange {
                min: self.spawn_interval_min_ms,
                max: self.spawn_interval_max_ms,
            });
        }
        if self.ramp_step == 0 {
            return Err(out_of_range("ramp_step", 0.0));
        }
        if self.ramp_divisor <= 0.0 {
            return Err(out_of_range("ramp_divisor", self.ramp_divisor as f64));
        }
        if self.lane_change_ms <= 0.0 {
            return Err(out_of_range("lane_change_ms", self.lane_change_ms as f64));
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: f64) -> ConfigError {
    ConfigError::OutOfRange { field, value }
}
