//! Monster kinds and their combat state

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::animation::Bounce;
use super::command::Command;
use super::effect::ParticleKind;
use super::entity::{Entity, EntityId, EntityRef, MoveState, apply_damage};
use super::geom::HitBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Peon,
    Heavy,
    /// Ranged caster
    Harbinger,
    SpikedScout,
    Warden,
}

/// Default stats a level spawns a monster kind with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterStats {
    pub hp: i32,
    pub speed: i32,
    pub player_damage: i32,
    pub vision_range: i32,
    pub shooting_range: i32,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 5] = [
        MonsterKind::Peon,
        MonsterKind::Heavy,
        MonsterKind::Harbinger,
        MonsterKind::SpikedScout,
        MonsterKind::Warden,
    ];

    pub fn stats(self) -> MonsterStats {
        let (hp, speed, player_damage, vision_range, shooting_range) = match self {
            MonsterKind::Peon => (30, 1, 10, 120, 0),
            MonsterKind::Heavy => (80, 1, 25, 100, 0),
            MonsterKind::Harbinger => (40, 1, 15, 250, 150),
            MonsterKind::SpikedScout => (20, 2, 8, 160, 0),
            MonsterKind::Warden => (150, 1, 30, 140, 0),
        };
        MonsterStats {
            hp,
            speed,
            player_damage,
            vision_range,
            shooting_range,
        }
    }

    pub fn hitbox(self) -> HitBox {
        match self {
            MonsterKind::Peon => HitBox::sized(13, 15),
            MonsterKind::Heavy => HitBox::sized(19, 19),
            MonsterKind::Harbinger => HitBox::sized(13, 17),
            MonsterKind::SpikedScout => HitBox::sized(11, 11),
            MonsterKind::Warden => HitBox::sized(23, 23),
        }
    }

    pub fn can_shoot(self) -> bool {
        matches!(self, MonsterKind::Harbinger)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: EntityId,
    pub kind: MonsterKind,
    pub pos: IVec2,
    hp: i32,
    pub speed: i32,
    /// Damage dealt to the player on contact (and per spell for casters)
    pub player_damage: i32,
    pub vision_range: i32,
    /// Zero for monsters that cannot shoot
    pub shooting_range: i32,
    /// Ticks until the next spell
    pub shot_cooldown: u32,
    pub moving: MoveState,
    pub animation: Option<Bounce>,
}

impl Monster {
    pub fn new(
        kind: MonsterKind,
        pos: IVec2,
        hp: i32,
        speed: i32,
        player_damage: i32,
        vision_range: i32,
    ) -> Self {
        Self {
            id: EntityId::next(),
            kind,
            pos,
            hp,
            speed,
            player_damage,
            vision_range,
            shooting_range: 0,
            shot_cooldown: 0,
            moving: MoveState::Idle,
            animation: None,
        }
    }

    pub fn harbinger(
        pos: IVec2,
        hp: i32,
        speed: i32,
        player_damage: i32,
        vision_range: i32,
        shooting_range: i32,
    ) -> Self {
        Self {
            shooting_range,
            ..Self::new(MonsterKind::Harbinger, pos, hp, speed, player_damage, vision_range)
        }
    }

    /// Monster with the kind's default stats
    pub fn spawn(kind: MonsterKind, pos: IVec2) -> Self {
        let stats = kind.stats();
        Self {
            shooting_range: stats.shooting_range,
            ..Self::new(
                kind,
                pos,
                stats.hp,
                stats.speed,
                stats.player_damage,
                stats.vision_range,
            )
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.hp = apply_damage(self.hp, damage);
    }

    pub fn is_bouncing(&self) -> bool {
        self.animation.is_some_and(|b| !b.is_over())
    }

    /// Commands resulting from `other` touching this monster
    pub fn interact(&mut self, other: EntityRef<'_>) -> Vec<Command> {
        if !self.is_alive() {
            return vec![Command::DeleteMonster(self.id)];
        }
        match other {
            EntityRef::Projectile(p) if !p.is_hostile() => {
                self.take_damage(p.damage);
                self.animation = Some(Bounce::new(p.direction));
            }
            EntityRef::Explosion(e) => self.take_damage(e.damage()),
            _ => return Vec::new(),
        }

        if self.is_alive() {
            vec![Command::CreateParticle {
                position: self.pos,
                kind: ParticleKind::DamageBlood,
            }]
        } else {
            vec![
                Command::DeleteMonster(self.id),
                Command::CreateParticle {
                    position: self.pos,
                    kind: ParticleKind::DeathBlood,
                },
            ]
        }
    }
}

impl Entity for Monster {
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
