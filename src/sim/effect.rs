//! Area effects and purely visual particles

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::geom::HitBox;
use crate::consts::*;

/// Blast left behind by a grenade. Its damage decays every frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub id: EntityId,
    pub pos: IVec2,
    damage: i32,
    frame: u32,
}

impl Explosion {
    /// Blast seeded with `damage`; the first frame deals twice that
    pub fn new(pos: IVec2, damage: i32) -> Self {
        Self {
            id: EntityId::next(),
            pos,
            damage: damage.saturating_mul(2),
            frame: 1,
        }
    }

    /// Damage dealt this frame
    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn update(&mut self) {
        self.damage = (self.damage as f64).powf(EXPLOSION_DECAY) as i32;
        self.frame += 1;
    }

    pub fn is_over(&self) -> bool {
        self.frame > EXPLOSION_FRAME_COUNT
    }
}

impl Entity for Explosion {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> IVec2 {
        self.pos
    }

    fn hitbox(&self) -> HitBox {
        HitBox::centered(EXPLOSION_RADIUS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    DamageBlood,
    DeathBlood,
    SpellExplosion,
    BreakableWallDamage,
}

impl ParticleKind {
    pub fn frame_count(self) -> u32 {
        match self {
            ParticleKind::DamageBlood => 5,
            ParticleKind::DeathBlood => 8,
            ParticleKind::SpellExplosion => 6,
            ParticleKind::BreakableWallDamage => 5,
        }
    }
}

/// Short-lived decoration with no gameplay effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    pub id: EntityId,
    pub kind: ParticleKind,
    pub pos: IVec2,
    frame: u32,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: IVec2) -> Self {
        Self {
            id: EntityId::next(),
            kind,
            pos,
            frame: 1,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn update(&mut self) {
        self.frame += 1;
    }

    pub fn is_over(&self) -> bool {
        self.frame > self.kind.frame_count()
    }
}

impl Entity for Particle {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> IVec2 {
        self.pos
    }

    fn hitbox(&self) -> HitBox {
        HitBox::sized(0, 0)
    }
}
