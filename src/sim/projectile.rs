//! Bullets, grenades and spells in flight

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::effect::{Explosion, ParticleKind};
use super::entity::{Entity, EntityId, EntityRef};
use super::geom::{Direction, HitBox};
use crate::consts::GRENADE_EXPLOSION_DAMAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Pistol round
    Bullet,
    /// Grenade: explodes on impact
    ExplosiveBullet,
    /// Harbinger magic, hurts the player
    Spell,
}

impl ProjectileKind {
    pub fn velocity(self) -> i32 {
        match self {
            ProjectileKind::Bullet => 8,
            ProjectileKind::ExplosiveBullet => 6,
            ProjectileKind::Spell => 5,
        }
    }

    pub fn hitbox(self) -> HitBox {
        match self {
            ProjectileKind::Bullet => HitBox::sized(2, 2),
            ProjectileKind::ExplosiveBullet => HitBox::sized(3, 3),
            ProjectileKind::Spell => HitBox::sized(5, 5),
        }
    }

    /// Hostile projectiles hit the player, friendly ones hit monsters
    pub fn is_hostile(self) -> bool {
        matches!(self, ProjectileKind::Spell)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub pos: IVec2,
    pub direction: Direction,
    pub velocity: i32,
    pub damage: i32,
}

impl Projectile {
    pub fn new(kind: ProjectileKind, pos: IVec2, direction: Direction, damage: i32) -> Self {
        Self {
            id: EntityId::next(),
            kind,
            pos,
            direction,
            velocity: kind.velocity(),
            damage,
        }
    }

    pub fn bullet(pos: IVec2, direction: Direction) -> Self {
        Self::new(ProjectileKind::Bullet, pos, direction, 10)
    }

    pub fn explosive(pos: IVec2, direction: Direction) -> Self {
        Self::new(ProjectileKind::ExplosiveBullet, pos, direction, 10)
    }

    pub fn spell(pos: IVec2, direction: Direction, damage: i32) -> Self {
        Self::new(ProjectileKind::Spell, pos, direction, damage)
    }

    pub fn is_hostile(&self) -> bool {
        self.kind.is_hostile()
    }

    /// Advance one tick along the flight direction
    pub fn update(&mut self) {
        self.pos += self.direction.unit() * self.velocity;
    }

    /// Commands for this projectile striking `other`
    pub fn interact(&self, other: EntityRef<'_>) -> Vec<Command> {
        let hits = match other {
            EntityRef::Monster(_) => !self.is_hostile(),
            EntityRef::Player(_) => self.is_hostile(),
            EntityRef::Scenery(element) => element.kind.blocks_projectiles(),
            EntityRef::Projectile(_) | EntityRef::Explosion(_) => false,
        };
        if hits { self.impact() } else { Vec::new() }
    }

    fn impact(&self) -> Vec<Command> {
        let mut commands = vec![Command::DeleteProjectile(self.id)];
        match self.kind {
            ProjectileKind::Bullet => {}
            ProjectileKind::ExplosiveBullet => {
                commands.push(Command::CreateEffect(Explosion::new(
                    self.pos,
                    GRENADE_EXPLOSION_DAMAGE,
                )));
                commands.push(Command::ShakeCamera);
            }
            ProjectileKind::Spell => commands.push(Command::CreateParticle {
                position: self.pos,
                kind: ParticleKind::SpellExplosion,
            }),
        }
        commands
    }
}

impl Entity for Projectile {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> IVec2 {
        self.pos
    }

    fn hitbox(&self) -> HitBox {
        self.kind.hitbox()
    }
}
