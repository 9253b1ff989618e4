//! Tenebris - a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, AI, collisions, command queue)
//! - `app`: Top-level state machine and the fixed-rate driver
//! - `view`: Draw-call layer consumed by a renderer backend
//! - `audio`, `save`, `settings`, `input`: Platform-side collaborators

pub mod app;
pub mod audio;
pub mod error;
pub mod input;
pub mod menu;
pub mod save;
pub mod settings;
pub mod sim;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{GameError, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICKS_PER_SECOND: u32 = 30;
    /// Maximum simulation steps per rendered frame (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed to the accumulator, in seconds
    pub const MAX_FRAME_TIME: f64 = 0.1;

    /// Size of one map tile in world units
    pub const TILE_SIZE: i32 = 16;

    /// Visible area, used by the camera to centre on the player
    pub const VIEW_WIDTH: i32 = 320;
    pub const VIEW_HEIGHT: i32 = 192;

    /// Default arena size when none is given by a level layout
    pub const DEFAULT_ARENA_WIDTH: i32 = 960;
    pub const DEFAULT_ARENA_HEIGHT: i32 = 640;
    /// Projectiles further than this outside the arena are discarded
    pub const PROJECTILE_MARGIN: i32 = 32;

    /// Ticks the arena must stay empty of monsters before the level ends
    pub const END_COUNTER_TICKS: u32 = 60;

    /// Bounce knockback
    pub const BOUNCE_SPEED: f64 = 7.0;
    pub const BOUNCE_DECAY: f64 = 0.8;
    pub const BOUNCE_FRAMES: u32 = 10;

    /// Camera shake
    pub const SHAKE_FRAMES: u32 = 10;
    pub const SHAKE_AMPLITUDE: i32 = 4;

    /// Explosion lifetime and damage decay exponent
    pub const EXPLOSION_FRAME_COUNT: u32 = 8;
    pub const EXPLOSION_DECAY: f64 = 0.8;
    pub const EXPLOSION_RADIUS: i32 = 24;
    /// Damage an explosive bullet hands to the explosion it creates
    pub const GRENADE_EXPLOSION_DAMAGE: i32 = 20;

    /// Ticks between two Harbinger spells
    pub const HARBINGER_SHOT_COOLDOWN: u32 = 30;

    /// Segments in the HUD health bar
    pub const HEALTH_SEGMENTS: u32 = 7;
}
