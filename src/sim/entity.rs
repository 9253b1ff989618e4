//! Shared entity vocabulary: identity handles, movement state and the
//! capability trait every simulated object implements.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::effect::Explosion;
use super::geom::{Direction, HitBox};
use super::monster::Monster;
use super::player::Player;
use super::projectile::Projectile;
use super::scenery::StaticElement;

static NEXT_ENTITY_ID: AtomicU32 = AtomicU32::new(1);

/// Opaque identity of a live entity.
///
/// Ids are unique for the whole process, so two entities built from the
/// same values are still told apart by the command queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Four-way movement/facing state used for animation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveState {
    #[default]
    Idle,
    Left,
    Right,
    /// Facing the viewer (moving down the screen)
    Front,
    /// Facing away (moving up the screen)
    Back,
}

impl MoveState {
    /// State for walking along `v`: the dominant axis wins, horizontal on ties
    pub fn toward(v: IVec2) -> Self {
        if v == IVec2::ZERO {
            MoveState::Idle
        } else if v.x.abs() >= v.y.abs() {
            if v.x > 0 { MoveState::Right } else { MoveState::Left }
        } else if v.y > 0 {
            MoveState::Front
        } else {
            MoveState::Back
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            MoveState::Idle => None,
            MoveState::Left => Some(Direction::Left),
            MoveState::Right => Some(Direction::Right),
            MoveState::Front => Some(Direction::Down),
            MoveState::Back => Some(Direction::Up),
        }
    }
}

/// Capabilities shared by everything that lives in the arena
pub trait Entity {
    fn id(&self) -> EntityId;
    fn position(&self) -> IVec2;
    fn hitbox(&self) -> HitBox;

    fn collides_with(&self, other: &dyn Entity) -> bool {
        HitBox::collide(self.position(), &self.hitbox(), other.position(), &other.hitbox())
    }
}

/// Borrowed view of the other side of an interaction
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Player(&'a Player),
    Monster(&'a Monster),
    Projectile(&'a Projectile),
    Scenery(&'a StaticElement),
    Explosion(&'a Explosion),
}

impl EntityRef<'_> {
    fn as_entity(&self) -> &dyn Entity {
        match *self {
            EntityRef::Player(p) => p,
            EntityRef::Monster(m) => m,
            EntityRef::Projectile(p) => p,
            EntityRef::Scenery(s) => s,
            EntityRef::Explosion(e) => e,
        }
    }
}

impl Entity for EntityRef<'_> {
    fn id(&self) -> EntityId {
        self.as_entity().id()
    }

    fn position(&self) -> IVec2 {
        self.as_entity().position()
    }

    fn hitbox(&self) -> HitBox {
        self.as_entity().hitbox()
    }
}

/// HP after taking `damage`: floored at zero, negative damage heals without a cap.
pub(crate) fn apply_damage(hp: i32, damage: i32) -> i32 {
    hp.saturating_sub(damage).max(0)
}
