//! Game state and core simulation types
//!
//! The gameplay stage owns exactly one [`GameState`]; everything that changes
//! during a run lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Hitbox;
use super::lanes::LaneSet;
use super::tween::LaneTween;
use crate::consts::*;
use crate::highscore::HighScore;
use crate::tuning::Tuning;

/// Lane-change direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Things that happened during a tick or a player action.
///
/// The simulation never touches audio, HUD or storage; the stage drains these
/// and performs the side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player started moving to a new lane
    LaneChanged { lane: usize },
    /// A coin was picked up
    CoinCollected { points: u64 },
    /// Player hit traffic; the run is over
    Crashed { final_score: u64 },
    /// The run's final score beat the previous best
    NewHighScore { score: u64 },
}

/// The player's car
#[derive(Debug, Clone)]
pub struct Player {
    pub lane: usize,
    pub pos: Vec2,
    /// In-flight lane change (None when idle)
    pub tween: Option<LaneTween>,
}

impl Player {
    pub fn hitbox() -> Hitbox {
        Hitbox::for_sprite(PLAYER_SIZE, PLAYER_ORIGIN, PLAYER_BODY_SCALE)
    }

    /// True while a lane change is animating
    pub fn is_transitioning(&self) -> bool {
        self.tween.is_some()
    }

    /// The shadow follows the car at a fixed offset
    pub fn shadow_position(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, SHADOW_OFFSET_Y)
    }
}

/// Oncoming car
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Downward speed (px/s)
    pub vel_y: f32,
    pub lane: usize,
}

impl Enemy {
    pub fn hitbox() -> Hitbox {
        Hitbox::for_sprite(ENEMY_SIZE, ENEMY_ORIGIN, Vec2::ONE)
    }
}

/// Collectible coin
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    /// Downward speed (px/s)
    pub vel_y: f32,
    pub lane: usize,
}

impl Coin {
    pub fn hitbox() -> Hitbox {
        Hitbox::for_sprite(COIN_SIZE, COIN_ORIGIN, Vec2::ONE)
    }
}

/// Background tile offsets (cosmetic only)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Parallax {
    pub dashes: f32,
    pub road: f32,
    pub trees: f32,
}

/// Camera shake effect
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    pub remaining_ms: f32,
    /// Amplitude as a fraction of canvas size
    pub intensity: f32,
    /// Current render offset
    pub offset: Vec2,
}

impl CameraShake {
    pub fn start(&mut self, duration_ms: f32, intensity: f32) {
        self.remaining_ms = duration_ms;
        self.intensity = intensity;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub lanes: LaneSet,
    pub player: Player,
    /// Active enemies (spawn order)
    pub enemies: Vec<Enemy>,
    /// Active coins (spawn order)
    pub coins: Vec<Coin>,
    pub score: u64,
    /// Best score across runs; survives restart
    pub high_score: u64,
    /// Difficulty multiplier, derived from score
    pub multiplier: f32,
    pub base_speed: f32,
    pub spawn_timer_ms: f32,
    pub spawn_interval_ms: f32,
    /// Latched on crash, cleared only by restart
    pub game_over: bool,
    pub parallax: Parallax,
    pub camera: CameraShake,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let lanes = LaneSet::new(
            tuning.canvas_width,
            tuning.lane_count,
            tuning.road_width_fraction,
        );
        let mut state = Self {
            lanes,
            player: Player {
                lane: 0,
                pos: Vec2::ZERO,
                tween: None,
            },
            enemies: Vec::new(),
            coins: Vec::new(),
            score: 0,
            high_score: 0,
            multiplier: 1.0,
            base_speed: tuning.base_speed,
            spawn_timer_ms: 0.0,
            spawn_interval_ms: 0.0,
            game_over: false,
            parallax: Parallax::default(),
            camera: CameraShake::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        };
        state.reset_player();
        state.spawn_interval_ms = state.roll_spawn_interval();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drain events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn lane_x(&self, lane: usize) -> f32 {
        self.lanes
            .x(lane)
            .unwrap_or(self.tuning.canvas_width / 2.0)
    }

    fn reset_player(&mut self) {
        let lane = self.tuning.start_lane.min(self.lanes.last_index());
        self.player.lane = lane;
        self.player.pos = Vec2::new(
            self.lane_x(lane),
            self.tuning.canvas_height * self.tuning.player_y_fraction,
        );
        self.player.tween = None;
    }

    /// Request a lane change.
    ///
    /// Ignored while game over, while another lane change is animating, or
    /// when it would leave the road. Returns whether the move started.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        if self.game_over || self.player.is_transitioning() {
            return false;
        }
        let target = match direction {
            Direction::Left => self.player.lane.checked_sub(1),
            Direction::Right => {
                (self.player.lane < self.lanes.last_index()).then_some(self.player.lane + 1)
            }
        };
        let Some(lane) = target else { return false };
        let Some(to_x) = self.lanes.x(lane) else {
            return false;
        };

        self.player.lane = lane;
        self.player.tween = Some(LaneTween::new(
            self.player.pos.x,
            to_x,
            self.tuning.lane_change_ms,
        ));
        self.events.push(GameEvent::LaneChanged { lane });
        true
    }

    /// Points a coin is worth at the current multiplier
    pub fn coin_value(&self) -> u64 {
        self.tuning.coin_base_points
            + (self.multiplier * self.tuning.coin_multiplier_points).floor() as u64
    }

    /// Pick up the coin at `index`. Returns the points awarded.
    pub fn collect_coin(&mut self, index: usize) -> u64 {
        if self.game_over || index >= self.coins.len() {
            return 0;
        }
        self.coins.remove(index);
        let points = self.coin_value();
        self.score += points;
        self.events.push(GameEvent::CoinCollected { points });
        points
    }

    /// End the run. Only the first crash of a run has any effect.
    pub fn crash(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.events.push(GameEvent::Crashed {
            final_score: self.score,
        });
        if HighScore(self.high_score).beaten_by(self.score) {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore { score: self.score });
        }
    }

    /// Start a fresh run. High score is kept.
    pub fn restart(&mut self) {
        self.enemies.clear();
        self.coins.clear();
        self.score = 0;
        self.multiplier = 1.0;
        self.base_speed = self.tuning.base_speed;
        self.spawn_interval_ms = self.roll_spawn_interval();
        self.game_over = false;
        self.camera = CameraShake::default();
        self.reset_player();
    }

    /// Draw the next spawn interval
    pub fn roll_spawn_interval(&mut self) -> f32 {
        let min = self.tuning.spawn_interval_min_ms;
        let max = self.tuning.spawn_interval_max_ms.max(min);
        self.rng.random_range(min..=max) as f32
    }

    pub fn roll_coin(&mut self) -> bool {
        self.rng.random_bool(self.tuning.coin_chance.clamp(0.0, 1.0))
    }

    fn random_lane(&mut self) -> usize {
        self.rng.random_range(0..self.lanes.count().max(1))
    }

    /// Spawn an enemy above the screen in a random lane
    pub fn spawn_enemy(&mut self) {
        let lane = self.random_lane();
        let jitter = 1.0 + self.rng.random::<f32>() * self.tuning.enemy_speed_jitter;
        let enemy = Enemy {
            id: self.next_entity_id(),
            pos: Vec2::new(self.lane_x(lane), self.tuning.enemy_spawn_y),
            vel_y: self.base_speed * self.multiplier * jitter,
            lane,
        };
        self.enemies.push(enemy);
    }

    /// Spawn a coin above the screen in a random lane
    pub fn spawn_coin(&mut self) {
        let lane = self.random_lane();
        let coin = Coin {
            id: self.next_entity_id(),
            pos: Vec2::new(self.lane_x(lane), self.tuning.coin_spawn_y),
            vel_y: self.base_speed * self.tuning.coin_speed_factor * self.multiplier,
            lane,
        };
        self.coins.push(coin);
    }

    /// Advance animations that run regardless of game over
    pub fn advance_effects(&mut self, dt_ms: f32) {
        if let Some(tween) = self.player.tween.as_mut() {
            self.player.pos.x = tween.advance(dt_ms);
            if tween.is_finished() {
                self.player.tween = None;
            }
        }

        if self.camera.is_active() {
            self.camera.remaining_ms -= dt_ms;
            if self.camera.is_active() {
                let amp = Vec2::new(self.tuning.canvas_width, self.tuning.canvas_height)
                    * self.camera.intensity;
                let jx: f32 = self.rng.random_range(-1.0..=1.0);
                let jy: f32 = self.rng.random_range(-1.0..=1.0);
                self.camera.offset = Vec2::new(jx, jy) * amp;
            } else {
                self.camera = CameraShake::default();
            }
        }
    }
}
