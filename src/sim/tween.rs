//! Lane-change interpolation

/// Cubic ease-out: fast start, gentle settle
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

/// An in-flight horizontal move between two lane x-coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneTween {
    pub from_x: f32,
    pub to_x: f32,
    pub elapsed_ms: f32,
    pub duration_ms: f32,
}

impl LaneTween {
    pub fn new(from_x: f32, to_x: f32, duration_ms: f32) -> Self {
        Self {
            from_x,
            to_x,
            elapsed_ms: 0.0,
            duration_ms,
        }
    }

    /// Advance by `dt_ms` and return the interpolated x
    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        self.current_x()
    }

    pub fn current_x(&self) -> f32 {
        let t = if self.duration_ms > 0.0 {
            self.elapsed_ms / self.duration_ms
        } else {
            1.0
        };
        self.from_x + (self.to_x - self.from_x) * ease_out_cubic(t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}
