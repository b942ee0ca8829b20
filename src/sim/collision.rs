//! Overlap detection between sprite bodies
//!
//! Bodies are axis-aligned rectangles centred on the sprite frame. A sprite's
//! position is its origin point, which for cars sits below the frame centre.

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Strict intersection: boxes that only touch do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Body shape relative to a sprite's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Offset from sprite position to body centre
    pub offset: Vec2,
    pub half_extents: Vec2,
}

impl Hitbox {
    /// Body for a sprite of `size` drawn around `origin` (0..1 in each axis),
    /// shrunk by `body_scale`
    pub fn for_sprite(size: Vec2, origin: Vec2, body_scale: Vec2) -> Self {
        Self {
            offset: (Vec2::splat(0.5) - origin) * size,
            half_extents: size * body_scale * 0.5,
        }
    }

    /// World-space box for a sprite at `pos`
    #[inline]
    pub fn at(&self, pos: Vec2) -> Aabb {
        let center = pos + self.offset;
        Aabb {
            min: center - self.half_extents,
            max: center + self.half_extents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_is_not_overlap() {
        let a = Aabb {
            min: Vec2::new(0.0, 0.0),
            max: Vec2::new(10.0, 10.0),
        };
        let b = Aabb {
            min: Vec2::new(10.0, 0.0),
            max: Vec2::new(20.0, 10.0),
        };
        assert!(!a.overlaps(&b));
        let c = Aabb {
            min: Vec2::new(9.5, 9.5),
            max: Vec2::new(20.0, 20.0),
        };
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_origin_shifts_body_up() {
        let hitbox = Hitbox::for_sprite(
            Vec2::new(78.0, 120.0),
            Vec2::new(0.5, 0.7),
            Vec2::new(0.8, 0.6),
        );
        assert_eq!(hitbox.offset.x, 0.0);
        assert!((hitbox.offset.y + 24.0).abs() < 1e-4);
        let aabb = hitbox.at(Vec2::new(216.0, 748.8));
        assert!((aabb.max.x - aabb.min.x - 62.4).abs() < 1e-3);
        assert!((aabb.max.y - aabb.min.y - 72.0).abs() < 1e-3);
    }

    #[test]
    fn test_adjacent_lanes_do_not_overlap() {
        // Lanes are 108 apart; player body is 62.4 wide, enemy 56 wide
        let player = Hitbox::for_sprite(
            Vec2::new(78.0, 120.0),
            Vec2::new(0.5, 0.7),
            Vec2::new(0.8, 0.6),
        );
        let enemy = Hitbox::for_sprite(Vec2::new(56.0, 92.0), Vec2::new(0.5, 0.7), Vec2::ONE);
        let p = player.at(Vec2::new(216.0, 748.8));
        assert!(!p.overlaps(&enemy.at(Vec2::new(324.0, 748.8))));
        assert!(p.overlaps(&enemy.at(Vec2::new(216.0, 748.8))));
    }
}
