//! Monster behaviour: sight checks, chasing and spell casting

use glam::IVec2;

use super::collision::try_move;
use super::command::{Command, CommandHandler};
use super::entity::{Entity, MoveState};
use super::geom::VectorExt;
use super::monster::Monster;
use super::projectile::Projectile;
use super::scenery::StaticElement;
use crate::consts::HARBINGER_SHOT_COOLDOWN;

/// No sight-blocking element crosses the straight line between two points
pub fn has_line_of_sight(from: IVec2, to: IVec2, elements: &[StaticElement]) -> bool {
    !elements
        .iter()
        .filter(|e| e.kind.blocks_vision())
        .any(|e| e.hitbox().intersects_segment(e.pos, from, to))
}

/// Advance one monster by a tick.
///
/// `target` is the player's position, `None` once the player is dead.
/// Returns true when the monster cast a spell.
pub fn update_monster(
    monster: &mut Monster,
    target: Option<IVec2>,
    elements: &[StaticElement],
    commands: &mut impl CommandHandler,
) -> bool {
    monster.shot_cooldown = monster.shot_cooldown.saturating_sub(1);

    if monster.animation.is_some_and(|b| b.is_over()) {
        monster.animation = None;
    }
    if let Some(bounce) = &mut monster.animation {
        let step = bounce.step();
        try_move(&mut monster.pos, monster.kind.hitbox(), step, elements);
        return false;
    }

    let Some(target) = target else {
        monster.moving = MoveState::Idle;
        return false;
    };
    let to_target = target - monster.pos;
    let distance = to_target.magnitude();
    if distance > monster.vision_range as f64 || !has_line_of_sight(monster.pos, target, elements) {
        monster.moving = MoveState::Idle;
        return false;
    }

    if monster.kind.can_shoot() && distance <= monster.shooting_range as f64 {
        monster.moving = MoveState::Idle;
        if monster.shot_cooldown > 0 {
            return false;
        }
        let origin = monster.hitbox().center(monster.pos);
        commands.handle_command(Command::CreateProjectile(Projectile::spell(
            origin,
            to_target.major_direction(),
            monster.player_damage,
        )));
        monster.shot_cooldown = HARBINGER_SHOT_COOLDOWN;
        return true;
    }

    monster.moving = MoveState::toward(to_target);
    if let Some(direction) = monster.moving.direction() {
        try_move(
            &mut monster.pos,
            monster.kind.hitbox(),
            direction.unit() * monster.speed,
            elements,
        );
    }
    false
}
