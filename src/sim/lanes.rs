//! Lane geometry
//!
//! Lanes are evenly spaced x-coordinates spanning a road centred on the
//! canvas. The outermost lanes sit on the road edges.

/// Fixed lane x-coordinates, computed once per run
#[derive(Debug, Clone, PartialEq)]
pub struct LaneSet {
    xs: Vec<f32>,
    road_width: f32,
    center_x: f32,
}

impl LaneSet {
    pub fn new(canvas_width: f32, lane_count: usize, road_width_fraction: f32) -> Self {
        let road_width = canvas_width * road_width_fraction;
        let center_x = canvas_width / 2.0;
        let left = center_x - road_width / 2.0;

        let xs = if lane_count <= 1 {
            vec![center_x; lane_count]
        } else {
            let step = road_width / (lane_count - 1) as f32;
            (0..lane_count).map(|i| left + i as f32 * step).collect()
        };

        Self {
            xs,
            road_width,
            center_x,
        }
    }

    /// x-coordinate of a lane (None when out of range)
    #[inline]
    pub fn x(&self, lane: usize) -> Option<f32> {
        self.xs.get(lane).copied()
    }

    pub fn count(&self) -> usize {
        self.xs.len()
    }

    pub fn last_index(&self) -> usize {
        self.xs.len().saturating_sub(1)
    }

    pub fn road_width(&self) -> f32 {
        self.road_width
    }

    /// Left edge of the road
    pub fn road_left(&self) -> f32 {
        self.center_x - self.road_width / 2.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.xs.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_four_lanes() {
        let lanes = LaneSet::new(540.0, 4, 0.6);
        let xs: Vec<f32> = lanes.iter().collect();
        // road 324 wide starting at 108, step 108
        assert_eq!(xs, vec![108.0, 216.0, 324.0, 432.0]);
        assert_eq!(lanes.road_left(), 108.0);
        assert_eq!(lanes.last_index(), 3);
    }

    #[test]
    fn test_even_spacing() {
        let lanes = LaneSet::new(800.0, 6, 0.5);
        let xs: Vec<f32> = lanes.iter().collect();
        let step = xs[1] - xs[0];
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 1e-3);
        }
        // Centred on the canvas
        assert!((xs[0] + xs[5] - 800.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_lane_is_centred() {
        let lanes = LaneSet::new(540.0, 1, 0.6);
        assert_eq!(lanes.x(0), Some(270.0));
        assert_eq!(lanes.x(1), None);
    }
}
