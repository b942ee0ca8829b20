//! Per-frame simulation step
//!
//! Order within a frame mirrors an arcade-physics engine: bodies move and
//! overlaps resolve first, then the scene's own update runs. Once the run is
//! over only physics and animations continue.

use super::state::{Coin, Enemy, GameState, Player};

/// Advance the game by one frame of `delta_ms` milliseconds
pub fn tick(state: &mut GameState, delta_ms: f32) {
    let dt_ms = delta_ms.max(0.0);
    let dt = dt_ms / 1000.0;

    integrate(state, dt);
    resolve_overlaps(state);
    state.advance_effects(dt_ms);

    if state.game_over {
        return;
    }

    scroll_background(state, dt);
    advance_spawner(state, dt_ms);
    accrue_passive_score(state, dt);
    cleanup_offscreen(state);
}

/// Move every entity by its velocity
fn integrate(state: &mut GameState, dt: f32) {
    for enemy in &mut state.enemies {
        enemy.pos.y += enemy.vel_y * dt;
    }
    for coin in &mut state.coins {
        coin.pos.y += coin.vel_y * dt;
    }
}

/// Coins first, then traffic
fn resolve_overlaps(state: &mut GameState) {
    if state.game_over {
        return;
    }
    let player_box = Player::hitbox().at(state.player.pos);

    let coin_box = Coin::hitbox();
    let mut i = 0;
    while i < state.coins.len() {
        if coin_box.at(state.coins[i].pos).overlaps(&player_box) {
            state.collect_coin(i);
        } else {
            i += 1;
        }
    }

    let enemy_box = Enemy::hitbox();
    if state
        .enemies
        .iter()
        .any(|e| enemy_box.at(e.pos).overlaps(&player_box))
    {
        state.crash();
    }
}

fn scroll_background(state: &mut GameState, dt: f32) {
    let world = state.base_speed * state.multiplier * dt;
    let tuning = &state.tuning;
    state.parallax.dashes += world * tuning.dash_scroll_rate;
    state.parallax.road += world * tuning.road_scroll_rate;
    state.parallax.trees += world * tuning.tree_scroll_rate;
}

fn advance_spawner(state: &mut GameState, dt_ms: f32) {
    state.spawn_timer_ms += dt_ms;
    if state.spawn_timer_ms > state.spawn_interval_ms {
        state.spawn_timer_ms = 0.0;
        state.spawn_interval_ms = state.roll_spawn_interval();
        state.spawn_enemy();
        if state.roll_coin() {
            state.spawn_coin();
        }
    }
}

/// Time-based score, then the difficulty ramp on exact step multiples
fn accrue_passive_score(state: &mut GameState, dt: f32) {
    let gained = (dt * state.tuning.passive_score_rate * state.multiplier).floor();
    if gained >= 1.0 {
        state.score += gained as u64;
    }

    if state.score > 0 && state.score % state.tuning.ramp_step == 0 {
        let ramped = 1.0 + state.score as f32 / state.tuning.ramp_divisor;
        state.multiplier = state.multiplier.max(ramped);
    }
}

/// Destroy anything that has fallen past the bottom margin
fn cleanup_offscreen(state: &mut GameState) {
    let limit = state.tuning.canvas_height;
    let margin = state.tuning.offscreen_margin;
    state.enemies.retain(|e| e.pos.y - margin <= limit);
    state.coins.retain(|c| c.pos.y - margin <= limit);
}
