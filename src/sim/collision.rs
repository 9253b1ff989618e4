//! Collision detection
//!
//! Movement is resolved immediately against static elements; every other
//! contact is turned into commands on the arena's queue so that no
//! collection changes while it is being iterated.

use glam::IVec2;

use super::entity::{Entity, EntityRef};
use super::geom::{HitBox, VectorExt};
use super::scenery::StaticElement;
use super::state::Arena;
use crate::audio::{SoundEffect, SoundSink};

fn blocking_overlaps<'a>(
    pos: IVec2,
    hitbox: HitBox,
    elements: &'a [StaticElement],
) -> impl Iterator<Item = &'a StaticElement> {
    elements.iter().filter(move |e| {
        e.kind.blocks_movement() && HitBox::collide(pos, &hitbox, e.pos, &e.hitbox())
    })
}

/// Whether moving a box from `from` to `to` would push it into a blocking
/// element it does not already overlap.
pub fn is_blocked(from: IVec2, to: IVec2, hitbox: HitBox, elements: &[StaticElement]) -> bool {
    blocking_overlaps(to, hitbox, elements)
        .any(|e| !HitBox::collide(from, &hitbox, e.pos, &e.hitbox()))
}

/// Move by `delta`, sliding along walls one axis at a time.
///
/// Returns true if the position changed.
pub fn try_move(pos: &mut IVec2, hitbox: HitBox, delta: IVec2, elements: &[StaticElement]) -> bool {
    if delta == IVec2::ZERO {
        return false;
    }
    let candidates = [delta, IVec2::new(delta.x, 0), IVec2::new(0, delta.y)];
    for step in candidates {
        if step == IVec2::ZERO {
            continue;
        }
        if !is_blocked(*pos, *pos + step, hitbox, elements) {
            *pos += step;
            return true;
        }
    }
    false
}

/// Detect every colliding pair and queue the resulting commands.
///
/// Pairs checked: player with monsters and spikes, projectiles with their
/// first target (monster, player or blocking element), explosions with
/// monsters, the player and breakable walls, and monsters with each other.
pub fn check_collisions(arena: &mut Arena, sound: &mut dyn SoundSink) {
    let Arena {
        player,
        monsters,
        projectiles,
        effects,
        elements,
        commands,
        ..
    } = arena;

    if let Some(player) = player.as_mut() {
        let hp_before = player.hp();
        for monster in monsters.iter_mut() {
            if player.collides_with(&*monster) {
                commands.extend(player.interact(EntityRef::Monster(monster)));
                commands.extend(monster.interact(EntityRef::Player(player)));
            }
        }
        for element in elements.iter() {
            if player.collides_with(element) {
                commands.extend(player.interact(EntityRef::Scenery(element)));
            }
        }
        if player.hp() < hp_before {
            sound.play(SoundEffect::PlayerHurt);
        }
    }

    // A projectile is consumed by the first thing it hits
    for projectile in projectiles.iter() {
        if !projectile.is_hostile() {
            if let Some(monster) = monsters
                .iter_mut()
                .find(|m| m.is_alive() && projectile.collides_with(&**m))
            {
                commands.extend(monster.interact(EntityRef::Projectile(projectile)));
                commands.extend(projectile.interact(EntityRef::Monster(monster)));
                continue;
            }
        } else if let Some(player) = player.as_mut() {
            if projectile.collides_with(&*player) {
                let hp_before = player.hp();
                commands.extend(player.interact(EntityRef::Projectile(projectile)));
                commands.extend(projectile.interact(EntityRef::Player(player)));
                if player.hp() < hp_before {
                    sound.play(SoundEffect::PlayerHurt);
                }
                continue;
            }
        }
        if let Some(element) = elements
            .iter_mut()
            .find(|e| e.kind.blocks_projectiles() && projectile.collides_with(&**e))
        {
            commands.extend(element.interact(EntityRef::Projectile(projectile)));
            commands.extend(projectile.interact(EntityRef::Scenery(element)));
        }
    }

    for explosion in effects.iter() {
        for monster in monsters.iter_mut() {
            if monster.is_alive() && explosion.collides_with(&*monster) {
                commands.extend(monster.interact(EntityRef::Explosion(explosion)));
            }
        }
        if let Some(player) = player.as_mut() {
            if explosion.collides_with(&*player) {
                let hp_before = player.hp();
                commands.extend(player.interact(EntityRef::Explosion(explosion)));
                if player.hp() < hp_before {
                    sound.play(SoundEffect::PlayerHurt);
                }
            }
        }
        for element in elements.iter_mut() {
            if element.is_breakable() && element.is_alive() && explosion.collides_with(&*element) {
                commands.extend(element.interact(EntityRef::Explosion(explosion)));
            }
        }
    }

    // Overlapping monsters push each other apart one unit per tick
    for i in 0..monsters.len() {
        for j in (i + 1)..monsters.len() {
            let (head, tail) = monsters.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if !a.collides_with(&*b) {
                continue;
            }
            let a_center = a.hitbox().center(a.pos);
            let b_center = b.hitbox().center(b.pos);
            let away = (a_center - b_center).major_direction().unit();
            let hitbox = a.hitbox();
            try_move(&mut a.pos, hitbox, away, elements);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::command::Command;
    use crate::sim::effect::Explosion;
    use crate::sim::geom::Direction;
    use crate::sim::monster::{Monster, MonsterKind};
    use crate::sim::player::Player;
    use crate::sim::projectile::Projectile;
    use crate::testing::RecordingSound;

    fn arena() -> Arena {
        Arena::new(1)
    }

    #[test]
    fn test_try_move_slides_along_wall() {
        let wall = StaticElement::wall(IVec2::new(20, 0));
        let mut pos = IVec2::new(4, 0);
        // Diagonal into the wall: x is blocked, y still moves
        assert!(try_move(&mut pos, HitBox::sized(13, 15), IVec2::new(4, 4), &[wall]));
        assert_eq!(pos, IVec2::new(4, 4));
    }

    #[test]
    fn test_overlapping_box_can_escape() {
        let wall = StaticElement::wall(IVec2::new(10, 0));
        let mut pos = IVec2::ZERO;
        assert!(try_move(&mut pos, HitBox::sized(13, 15), IVec2::new(-2, 0), &[wall]));
        assert_eq!(pos, IVec2::new(-2, 0));
    }

    #[test]
    fn test_lethal_bullet_queues_monster_delete() {
        let mut arena = arena();
        let monster = Monster::new(MonsterKind::Peon, IVec2::ZERO, 10, 1, 5, 100);
        let bullet = Projectile::bullet(IVec2::ZERO, Direction::Right);
        let (monster_id, bullet_id) = (monster.id, bullet.id);
        arena.monsters.push(monster);
        arena.projectiles.push(bullet);

        check_collisions(&mut arena, &mut RecordingSound::default());

        assert!(arena.commands.contains(&Command::DeleteMonster(monster_id)));
        assert!(arena.commands.contains(&Command::DeleteProjectile(bullet_id)));
        // Nothing is removed before the drain phase
        assert_eq!(arena.monsters.len(), 1);
        assert_eq!(arena.projectiles.len(), 1);
    }

    #[test]
    fn test_bullet_consumed_once() {
        let mut arena = arena();
        arena.monsters.push(Monster::new(MonsterKind::Heavy, IVec2::ZERO, 50, 1, 5, 100));
        arena.monsters.push(Monster::new(MonsterKind::Heavy, IVec2::new(2, 0), 50, 1, 5, 100));
        arena.projectiles.push(Projectile::bullet(IVec2::new(1, 1), Direction::Right));

        check_collisions(&mut arena, &mut RecordingSound::default());

        let hurt = arena.monsters.iter().filter(|m| m.hp() < 50).count();
        assert_eq!(hurt, 1);
    }

    #[test]
    fn test_player_hit_by_monster() {
        let mut arena = arena();
        arena.set_player(Player::new(IVec2::new(100, 100), 100, 2));
        arena.monsters.push(Monster::new(MonsterKind::Peon, IVec2::new(100, 100), 30, 1, 20, 100));
        let mut sound = RecordingSound::default();

        check_collisions(&mut arena, &mut sound);

        let player = arena.player.as_ref().unwrap();
        assert_eq!(player.hp(), 80);
        assert!(player.animation.is_some());
        assert!(arena.commands.iter().any(|c| matches!(c, Command::CreateParticle { .. })));
        assert_eq!(sound.played, vec![SoundEffect::PlayerHurt]);
    }

    #[test]
    fn test_missing_player_is_skipped() {
        let mut arena = arena();
        arena.monsters.push(Monster::spawn(MonsterKind::Peon, IVec2::ZERO));
        arena.projectiles.push(Projectile::spell(IVec2::ZERO, Direction::Left, 10));
        check_collisions(&mut arena, &mut RecordingSound::default());
        assert!(arena.commands.is_empty());
    }

    #[test]
    fn test_explosive_against_wall_queues_effect_and_shake() {
        let mut arena = arena();
        arena.elements.push(StaticElement::wall(IVec2::new(16, 0)));
        arena.projectiles.push(Projectile::explosive(IVec2::new(14, 4), Direction::Right));

        check_collisions(&mut arena, &mut RecordingSound::default());

        assert!(arena.commands.iter().any(|c| matches!(c, Command::CreateEffect(_))));
        assert!(arena.commands.contains(&Command::ShakeCamera));
    }

    #[test]
    fn test_explosion_damages_everything_in_range() {
        let mut arena = arena();
        arena.set_player(Player::new(IVec2::new(66, 50), 100, 2));
        arena.monsters.push(Monster::spawn(MonsterKind::Warden, IVec2::new(40, 40)));
        arena.elements.push(StaticElement::breakable_wall(IVec2::new(50, 30), 100));
        arena.effects.push(Explosion::new(IVec2::new(50, 50), 20));

        check_collisions(&mut arena, &mut RecordingSound::default());

        assert_eq!(arena.monsters[0].hp(), 110);
        assert_eq!(arena.player.as_ref().unwrap().hp(), 60);
        assert_eq!(arena.elements[0].hp, 60);
    }

    #[test]
    fn test_monsters_push_apart() {
        let mut arena = arena();
        arena.monsters.push(Monster::spawn(MonsterKind::Peon, IVec2::new(100, 100)));
        arena.monsters.push(Monster::spawn(MonsterKind::Peon, IVec2::new(104, 100)));

        check_collisions(&mut arena, &mut RecordingSound::default());

        assert_eq!(arena.monsters[0].pos, IVec2::new(99, 100));
        assert_eq!(arena.monsters[0].hp(), 30);
        assert_eq!(arena.monsters[1].hp(), 30);
        assert!(arena.commands.is_empty());
    }
}
