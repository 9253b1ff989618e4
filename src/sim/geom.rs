//! Integer vector helpers, compass directions and axis-aligned hit boxes
//!
//! World coordinates follow screen conventions: x grows to the right and
//! y grows downwards.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One of the eight compass directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Unit step along this direction (diagonals move one unit on both axes)
    pub fn unit(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::UpLeft => IVec2::new(-1, -1),
            Direction::UpRight => IVec2::new(1, -1),
            Direction::DownLeft => IVec2::new(-1, 1),
            Direction::DownRight => IVec2::new(1, 1),
        }
    }

    /// Direction from the sign of each component, `None` for the zero vector
    pub fn from_signs(x: i32, y: i32) -> Option<Self> {
        match (x.signum(), y.signum()) {
            (0, 0) => None,
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            (1, 1) => Some(Direction::DownRight),
            (1, -1) => Some(Direction::UpRight),
            (-1, 1) => Some(Direction::DownLeft),
            _ => Some(Direction::UpLeft),
        }
    }
}

/// Vector operations the game needs on top of `IVec2`'s own arithmetic
pub trait VectorExt {
    /// Euclidean length
    fn magnitude(&self) -> f64;
    /// Multiply by a real factor, truncating each component toward zero
    fn scaled(&self, factor: f64) -> IVec2;
    /// Compass direction from the sign of each component.
    ///
    /// The zero vector classifies as `Right`.
    fn major_direction(&self) -> Direction;
}

impl VectorExt for IVec2 {
    fn magnitude(&self) -> f64 {
        self.as_dvec2().length()
    }

    fn scaled(&self, factor: f64) -> IVec2 {
        IVec2::new(
            (self.x as f64 * factor) as i32,
            (self.y as f64 * factor) as i32,
        )
    }

    fn major_direction(&self) -> Direction {
        Direction::from_signs(self.x, self.y).unwrap_or(Direction::Right)
    }
}

/// Axis-aligned box relative to an entity's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitBox {
    pub min: IVec2,
    pub max: IVec2,
}

impl HitBox {
    pub const fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Box spanning `[0, width] x [0, height]`
    pub const fn sized(width: i32, height: i32) -> Self {
        Self::new(IVec2::ZERO, IVec2::new(width, height))
    }

    /// Box centred on the owner's position
    pub const fn centered(half: i32) -> Self {
        Self::new(IVec2::new(-half, -half), IVec2::new(half, half))
    }

    /// World-space corners for an owner at `pos`
    pub fn at(&self, pos: IVec2) -> (IVec2, IVec2) {
        (pos + self.min, pos + self.max)
    }

    /// Centre of the box in world space
    pub fn center(&self, pos: IVec2) -> IVec2 {
        pos + (self.min + self.max) / 2
    }

    /// Inclusive overlap test: boxes sharing an edge or a corner collide.
    pub fn collide(pos_a: IVec2, box_a: &HitBox, pos_b: IVec2, box_b: &HitBox) -> bool {
        let (min_a, max_a) = box_a.at(pos_a);
        let (min_b, max_b) = box_b.at(pos_b);
        min_a.x <= max_b.x && max_a.x >= min_b.x && min_a.y <= max_b.y && max_a.y >= min_b.y
    }

    /// Whether the segment `from -> to` touches this box placed at `pos`.
    ///
    /// Slab clipping on both axes, bounds inclusive.
    pub fn intersects_segment(&self, pos: IVec2, from: IVec2, to: IVec2) -> bool {
        let (min, max) = self.at(pos);
        let (min, max) = (min.as_dvec2(), max.as_dvec2());
        let start = from.as_dvec2();
        let delta = (to - from).as_dvec2();

        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;
        for axis in 0..2 {
            let (s, d, lo, hi) = (start[axis], delta[axis], min[axis], max[axis]);
            if d == 0.0 {
                if s < lo || s > hi {
                    return false;
                }
                continue;
            }
            let (mut t0, mut t1) = ((lo - s) / d, (hi - s) / d);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }
        true
    }
}
