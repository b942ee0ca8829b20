//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio, storage or DOM dependencies

pub mod collision;
pub mod lanes;
pub mod state;
pub mod tick;
pub mod tween;

pub use collision::{Aabb, Hitbox};
pub use lanes::LaneSet;
pub use state::{
    CameraShake, Coin, Direction, Enemy, GameEvent, GameState, Parallax, Player,
};
pub use tick::tick;
pub use tween::{LaneTween, ease_out_cubic};
