//! Static map elements: walls, sandbags, spikes and vision blockers

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::effect::ParticleKind;
use super::entity::{Entity, EntityId, EntityRef, apply_damage};
use super::geom::HitBox;
use crate::consts::TILE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticKind {
    Wall,
    BreakableWall,
    SandBag,
    /// Floor trap, hurts the player on contact
    Spike,
    /// Blocks monster line of sight only
    VisionBlocker,
}

impl StaticKind {
    pub fn blocks_movement(self) -> bool {
        matches!(
            self,
            StaticKind::Wall | StaticKind::BreakableWall | StaticKind::SandBag
        )
    }

    pub fn blocks_vision(self) -> bool {
        matches!(
            self,
            StaticKind::Wall | StaticKind::BreakableWall | StaticKind::VisionBlocker
        )
    }

    pub fn blocks_projectiles(self) -> bool {
        matches!(
            self,
            StaticKind::Wall | StaticKind::BreakableWall | StaticKind::SandBag
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticElement {
    pub id: EntityId,
    pub kind: StaticKind,
    pub pos: IVec2,
    /// Only meaningful for breakable walls
    pub hp: i32,
    /// Contact damage, only meaningful for spikes
    pub damage: i32,
}

impl StaticElement {
    fn new(kind: StaticKind, pos: IVec2, hp: i32, damage: i32) -> Self {
        Self {
            id: EntityId::next(),
            kind,
            pos,
            hp,
            damage,
        }
    }

    pub fn wall(pos: IVec2) -> Self {
        Self::new(StaticKind::Wall, pos, 0, 0)
    }

    pub fn breakable_wall(pos: IVec2, hp: i32) -> Self {
        Self::new(StaticKind::BreakableWall, pos, hp, 0)
    }

    pub fn sandbag(pos: IVec2) -> Self {
        Self::new(StaticKind::SandBag, pos, 0, 0)
    }

    pub fn spike(pos: IVec2, damage: i32) -> Self {
        Self::new(StaticKind::Spike, pos, 0, damage)
    }

    pub fn vision_blocker(pos: IVec2) -> Self {
        Self::new(StaticKind::VisionBlocker, pos, 0, 0)
    }

    pub fn is_breakable(&self) -> bool {
        self.kind == StaticKind::BreakableWall
    }

    /// Breakable walls only; other elements shrug damage off
    pub fn is_alive(&self) -> bool {
        !self.is_breakable() || self.hp > 0
    }

    pub fn take_damage(&mut self, damage: i32) {
        if self.is_breakable() {
            self.hp = apply_damage(self.hp, damage);
        }
    }

    /// Commands for `other` touching this element
    pub fn interact(&mut self, other: EntityRef<'_>) -> Vec<Command> {
        if !self.is_breakable() {
            return Vec::new();
        }
        let damage = match other {
            EntityRef::Projectile(p) => p.damage,
            EntityRef::Explosion(e) => e.damage(),
            _ => return Vec::new(),
        };
        self.take_damage(damage);

        let debris = Command::CreateParticle {
            position: self.pos,
            kind: ParticleKind::BreakableWallDamage,
        };
        if self.is_alive() {
            vec![debris]
        } else {
            vec![Command::DeleteBreakableWall(self.id), debris]
        }
    }
}

impl Entity for StaticElement {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> IVec2 {
        self.pos
    }

    fn hitbox(&self) -> HitBox {
        HitBox::sized(TILE_SIZE - 1, TILE_SIZE - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geom::Direction;
    use crate::sim::projectile::Projectile;

    #[test]
    fn test_breakable_wall_damage() {
        let mut wall = StaticElement::breakable_wall(IVec2::ZERO, 50);
        wall.take_damage(20);
        assert_eq!(wall.hp, 30);
        wall.take_damage(0);
        assert_eq!(wall.hp, 30);
        wall.take_damage(-10);
        assert_eq!(wall.hp, 40);
        wall.take_damage(i32::MAX);
        assert_eq!(wall.hp, 0);
        assert!(!wall.is_alive());
    }

    #[test]
    fn test_plain_wall_ignores_damage() {
        let mut wall = StaticElement::wall(IVec2::ZERO);
        let bullet = Projectile::bullet(IVec2::ZERO, Direction::Right);
        assert!(wall.interact(EntityRef::Projectile(&bullet)).is_empty());
        assert!(wall.is_alive());
    }

    #[test]
    fn test_breakable_wall_destroyed_by_bullet() {
        let mut wall = StaticElement::breakable_wall(IVec2::new(32, 0), 10);
        let bullet = Projectile::bullet(IVec2::new(30, 0), Direction::Right);
        let commands = wall.interact(EntityRef::Projectile(&bullet));
        assert_eq!(commands[0], Command::DeleteBreakableWall(wall.id));
        assert!(matches!(
            commands[1],
            Command::CreateParticle { kind: ParticleKind::BreakableWallDamage, .. }
        ));
    }

    #[test]
    fn test_breakable_wall_survives_weak_hit() {
        let mut wall = StaticElement::breakable_wall(IVec2::ZERO, 25);
        let bullet = Projectile::bullet(IVec2::ZERO, Direction::Right);
        let commands = wall.interact(EntityRef::Projectile(&bullet));
        assert_eq!(wall.hp, 15);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_blocking_rules() {
        assert!(StaticKind::SandBag.blocks_movement());
        assert!(!StaticKind::SandBag.blocks_vision());
        assert!(StaticKind::VisionBlocker.blocks_vision());
        assert!(!StaticKind::VisionBlocker.blocks_movement());
        assert!(!StaticKind::Spike.blocks_movement());
    }
}
