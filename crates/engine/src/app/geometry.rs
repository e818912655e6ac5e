use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn try_normalize(self) -> Option<Vec2> {
        let len_sq = self.length_squared();
        if len_sq <= 0.0 || !len_sq.is_finite() {
            return None;
        }
        let inv_len = len_sq.sqrt().recip();
        Some(Vec2 {
            x: self.x * inv_len,
            y: self.y * inv_len,
        })
    }

    pub fn normalize_or_zero(self) -> Vec2 {
        self.try_normalize().unwrap_or(Vec2::ZERO)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Axis-aligned rectangle; `(x, y)` is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Strict overlap test; rectangles that only share an edge do not overlap
    /// and an empty rectangle never overlaps anything.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    pub fn inflated(&self, amount_x: f32, amount_y: f32) -> Rect {
        Rect::new(
            self.x - amount_x,
            self.y - amount_y,
            self.width + amount_x * 2.0,
            self.height + amount_y * 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Facing derived from the dominant axis of `delta`; ties favour the
    /// horizontal axis. Returns `None` for a zero vector.
    pub fn from_dominant_axis(delta: Vec2) -> Option<Direction> {
        if delta.x == 0.0 && delta.y == 0.0 {
            return None;
        }
        if delta.x.abs() >= delta.y.abs() {
            if delta.x < 0.0 {
                Some(Direction::Left)
            } else {
                Some(Direction::Right)
            }
        } else if delta.y < 0.0 {
            Some(Direction::Up)
        } else {
            Some(Direction::Down)
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_does_not_normalize() {
        assert!(Vec2::ZERO.try_normalize().is_none());
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn diagonal_normalizes_to_unit_length() {
        let unit = Vec2::new(1.0, -1.0).try_normalize().expect("unit");
        assert!((unit.length() - 1.0).abs() < 1e-6);
        assert!((unit.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&b.translated(Vec2::new(-0.5, 0.0))));
    }

    #[test]
    fn empty_rect_never_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert!(!a.overlaps(&empty));
        assert!(!empty.overlaps(&a));
    }

    #[test]
    fn contains_rect_is_inclusive() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert!(!outer.contains_rect(&Rect::new(-0.1, 0.0, 10.0, 10.0)));
        assert!(!outer.contains_rect(&Rect::new(95.0, 45.0, 10.0, 10.0)));
    }

    #[test]
    fn dominant_axis_picks_facing() {
        assert_eq!(
            Direction::from_dominant_axis(Vec2::new(3.0, 1.0)),
            Some(Direction::Right)
        );
        assert_eq!(
            Direction::from_dominant_axis(Vec2::new(-1.0, 4.0)),
            Some(Direction::Down)
        );
        assert_eq!(
            Direction::from_dominant_axis(Vec2::new(0.0, -2.0)),
            Some(Direction::Up)
        );
        assert_eq!(Direction::from_dominant_axis(Vec2::ZERO), None);
    }
}
