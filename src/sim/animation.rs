//! Time-bounded procedural motion: knockback bounce and camera shake

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Direction;
use crate::consts::*;

/// Knockback that pushes its owner along `direction` with decaying speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounce {
    pub direction: Direction,
    frame: u32,
}

impl Bounce {
    pub fn new(direction: Direction) -> Self {
        Self { direction, frame: 0 }
    }

    /// Distance travelled on `frame`, truncated after the power is taken
    pub fn displacement(frame: u32) -> i32 {
        (BOUNCE_SPEED * BOUNCE_DECAY.powi(frame as i32)) as i32
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn is_over(&self) -> bool {
        self.frame >= BOUNCE_FRAMES
    }

    /// Offset for the current frame, advancing the counter
    pub fn step(&mut self) -> IVec2 {
        if self.is_over() {
            return IVec2::ZERO;
        }
        let offset = self.direction.unit() * Self::displacement(self.frame);
        self.frame += 1;
        offset
    }

    /// Apply one frame to `pos`
    pub fn execute(&mut self, pos: &mut IVec2) {
        *pos += self.step();
    }
}

/// Random jitter around a rest position, ending exactly at that position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraShake {
    pub origin: IVec2,
    frame: u32,
}

impl CameraShake {
    pub fn new(origin: IVec2) -> Self {
        Self { origin, frame: 0 }
    }

    pub fn is_over(&self) -> bool {
        self.frame >= SHAKE_FRAMES
    }

    pub fn execute<R: Rng>(&mut self, pos: &mut IVec2, rng: &mut R) {
        if self.is_over() {
            *pos = self.origin;
            return;
        }
        self.frame += 1;
        if self.is_over() {
            *pos = self.origin;
        } else {
            let jitter = IVec2::new(
                rng.random_range(-SHAKE_AMPLITUDE..=SHAKE_AMPLITUDE),
                rng.random_range(-SHAKE_AMPLITUDE..=SHAKE_AMPLITUDE),
            );
            *pos = self.origin + jitter;
        }
    }
}
