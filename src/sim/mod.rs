//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each collection)
//! - Collections change membership only while the command queue is drained
//! - No rendering or platform dependencies (sound, saves and state changes
//!   go through traits passed into each tick)

pub mod ai;
pub mod animation;
pub mod autopilot;
pub mod collision;
pub mod command;
pub mod effect;
pub mod entity;
pub mod geom;
pub mod level;
pub mod monster;
pub mod player;
pub mod projectile;
pub mod scenery;
pub mod state;
pub mod tick;
pub mod weapon;

pub use animation::{Bounce, CameraShake};
pub use command::{Command, CommandHandler, CommandQueue};
pub use effect::{Explosion, Particle, ParticleKind};
pub use entity::{Entity, EntityId, EntityRef, MoveState};
pub use geom::{Direction, HitBox, VectorExt};
pub use level::build_arena;
pub use monster::{Monster, MonsterKind};
pub use player::Player;
pub use projectile::{Projectile, ProjectileKind};
pub use scenery::{StaticElement, StaticKind};
pub use state::{Arena, ArenaSnapshot, Camera};
pub use tick::{ArenaController, TickContext};
pub use weapon::{Weapon, WeaponKind};
