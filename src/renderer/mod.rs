//! Canvas 2D rendering
//!
//! Draws a [`GameState`] back to front: grass, roadside trees, road, lane
//! dashes, then the player's shadow, coins, traffic and the player. Any image
//! that failed to load is replaced by a flat shape of the same size.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::*;
use crate::platform::assets::ImageBank;
use crate::sim::GameState;

const GRASS: &str = "#7ec850";
const ROAD: &str = "#2b2b2b";
const ROAD_EDGE: &str = "#5a5a5a";
const DASH: &str = "#ffffff";
const PLAYER_FALLBACK: &str = "#2f80ed";
const ENEMY_FALLBACK: &str = "#e53935";
const COIN_FALLBACK: &str = "#f7c948";
const TREE_FALLBACK: &str = "#3f8f3a";

const ROAD_RADIUS: f64 = 6.0;
const DASH_WIDTH: f64 = 6.0;
const DASH_HEIGHT: f64 = 40.0;
const DASH_GAP: f64 = 30.0;
const EDGE_STRIPE: f64 = 60.0;
const TREE_ALPHA: f64 = 0.95;
/// Spacing of fallback tree blobs when the tree image is missing
const TREE_SPACING: f64 = 140.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    images: ImageBank,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, images: ImageBank) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            images,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    fn image(&self, key: &str) -> Option<HtmlImageElement> {
        self.images.borrow().get(key).cloned()
    }

    /// Draw one frame. Without a game state (still loading) only the grass is drawn.
    pub fn render(&self, state: Option<&GameState>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(GRASS);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        let Some(state) = state else {
            return Ok(());
        };

        ctx.save();
        let shake = state.camera.offset;
        ctx.translate(shake.x as f64, shake.y as f64)?;
        let drawn = self.draw_scene(state);
        ctx.restore();
        drawn
    }

    fn draw_scene(&self, state: &GameState) -> Result<(), JsValue> {
        self.draw_trees(state.parallax.trees as f64)?;
        self.draw_road(state)?;
        self.draw_shadow(state)?;

        for coin in &state.coins {
            self.draw_sprite("coin", coin.pos, COIN_SIZE, COIN_ORIGIN, COIN_FALLBACK)?;
        }
        for enemy in &state.enemies {
            self.draw_sprite("enemycar", enemy.pos, ENEMY_SIZE, ENEMY_ORIGIN, ENEMY_FALLBACK)?;
        }
        self.draw_sprite(
            "carsheet",
            state.player.pos,
            PLAYER_SIZE,
            PLAYER_ORIGIN,
            PLAYER_FALLBACK,
        )
    }

    fn draw_trees(&self, scroll: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(TREE_ALPHA);

        let pattern = match self.image("tree") {
            Some(img) if img.natural_height() > 0 => ctx
                .create_pattern_with_html_image_element(&img, "repeat")?
                .map(|p| (p, img.natural_height() as f64)),
            _ => None,
        };

        match pattern {
            Some((pattern, tile_h)) => {
                let offset = scroll.rem_euclid(tile_h);
                ctx.translate(0.0, offset)?;
                ctx.set_fill_style_canvas_pattern(&pattern);
                ctx.fill_rect(0.0, -tile_h, self.width, self.height + tile_h);
            }
            None => {
                ctx.set_fill_style_str(TREE_FALLBACK);
                let offset = scroll.rem_euclid(TREE_SPACING);
                let mut y = offset - TREE_SPACING;
                while y < self.height + TREE_SPACING {
                    for x in [self.width * 0.1, self.width * 0.9] {
                        ctx.begin_path();
                        ctx.arc(x, y, 26.0, 0.0, TAU)?;
                        ctx.fill();
                    }
                    y += TREE_SPACING;
                }
            }
        }

        ctx.restore();
        Ok(())
    }

    fn draw_road(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let left = state.lanes.road_left() as f64;
        let width = state.lanes.road_width() as f64;

        ctx.set_fill_style_str(ROAD);
        rounded_rect(ctx, left, 0.0, width, self.height, ROAD_RADIUS);
        ctx.fill();

        // Shoulder stripes scroll with the road layer
        ctx.set_fill_style_str(ROAD_EDGE);
        let road_offset = (state.parallax.road as f64).rem_euclid(EDGE_STRIPE * 2.0);
        let mut y = road_offset - EDGE_STRIPE * 2.0;
        while y < self.height {
            ctx.fill_rect(left, y, 4.0, EDGE_STRIPE);
            ctx.fill_rect(left + width - 4.0, y, 4.0, EDGE_STRIPE);
            y += EDGE_STRIPE * 2.0;
        }

        // Dashes between neighbouring lanes
        ctx.set_fill_style_str(DASH);
        let period = DASH_HEIGHT + DASH_GAP;
        let dash_offset = (state.parallax.dashes as f64).rem_euclid(period);
        let lanes: Vec<f64> = state.lanes.iter().map(f64::from).collect();
        for pair in lanes.windows(2) {
            let x = (pair[0] + pair[1]) / 2.0 - DASH_WIDTH / 2.0;
            let mut y = dash_offset - period;
            while y < self.height {
                ctx.fill_rect(x, y, DASH_WIDTH, DASH_HEIGHT);
                y += period;
            }
        }
        Ok(())
    }

    fn draw_shadow(&self, state: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let at = state.player.shadow_position();
        ctx.save();
        ctx.set_global_alpha(SHADOW_ALPHA);
        ctx.set_fill_style_str("#000000");
        ctx.begin_path();
        ctx.ellipse(
            at.x as f64,
            at.y as f64,
            (PLAYER_SIZE.x * SHADOW_WIDTH_FRACTION / 2.0) as f64,
            (SHADOW_HEIGHT / 2.0) as f64,
            0.0,
            0.0,
            TAU,
        )?;
        ctx.fill();
        ctx.restore();
        Ok(())
    }

    /// Draw `key` with its anchor (`origin`, in size fractions) at `pos`
    fn draw_sprite(
        &self,
        key: &str,
        pos: Vec2,
        size: Vec2,
        origin: Vec2,
        fallback: &str,
    ) -> Result<(), JsValue> {
        let top_left = pos - origin * size;
        let (x, y, w, h) = (
            top_left.x as f64,
            top_left.y as f64,
            size.x as f64,
            size.y as f64,
        );

        match self.image(key) {
            Some(img) if img.complete() && img.natural_width() > 0 => {
                self.ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(&img, x, y, w, h)?;
            }
            _ => {
                self.ctx.set_fill_style_str(fallback);
                rounded_rect(&self.ctx, x, y, w, h, (w.min(h) / 4.0).min(12.0));
                self.ctx.fill();
            }
        }
        Ok(())
    }
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.quadratic_curve_to(x + w, y, x + w, y + r);
    ctx.line_to(x + w, y + h - r);
    ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
    ctx.line_to(x + r, y + h);
    ctx.quadratic_curve_to(x, y + h, x, y + h - r);
    ctx.line_to(x, y + r);
    ctx.quadratic_curve_to(x, y, x + r, y);
    ctx.close_path();
}
