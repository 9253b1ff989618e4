//! Demo-mode AI that plays in place of a human

use glam::IVec2;

use super::ai::has_line_of_sight;
use super::entity::Entity;
use super::geom::{Direction, VectorExt};
use super::player::PLAYER_HITBOX;
use super::state::Arena;
use crate::input::{Action, TickInput};

/// Closer than this the autopilot backs away instead of advancing
const KEEP_DISTANCE: f64 = 48.0;

/// Synthesize held actions for the current arena.
///
/// Targets the nearest visible monster: walks toward it (or away when too
/// close), aims along its major direction and fires. Reloads an empty
/// pistol, prefers the grenade launcher against tough monsters.
pub fn drive(arena: &Arena, input: &TickInput) -> TickInput {
    let mut out = TickInput {
        action: input.action,
        ..Default::default()
    };
    let Some(player) = arena.player.as_ref() else {
        return out;
    };
    let eye = player.muzzle();

    let target = arena
        .monsters
        .iter()
        .filter(|m| m.is_alive())
        .map(|m| (m, m.hitbox().center(m.pos) - eye))
        .filter(|(m, _)| has_line_of_sight(eye, m.hitbox().center(m.pos), &arena.elements))
        .min_by_key(|(_, offset)| offset.length_squared());

    let Some((monster, offset)) = target else {
        // Nothing in sight: wander toward the nearest monster anyway
        if let Some(m) = arena.monsters.iter().min_by_key(|m| (m.pos - eye).length_squared()) {
            push_moves(&mut out, m.pos - eye);
        }
        return out;
    };

    let distance = offset.magnitude();
    if distance < KEEP_DISTANCE {
        push_moves(&mut out, -offset);
    } else {
        push_moves(&mut out, offset);
    }
    push_looks(&mut out, aim(offset));

    let weapon = player.equipped_weapon();
    if out.action.is_none() {
        let wants_grenade = monster.hp() > 60 && distance > KEEP_DISTANCE;
        let grenade_ready = player.weapons().get(1).is_some_and(|w| w.can_shoot());
        if wants_grenade && grenade_ready && player.selected_weapon() != 1 {
            out.action = Some(Action::SelectWeapon(1));
        } else if !wants_grenade && player.selected_weapon() != 0 {
            out.action = Some(Action::SelectWeapon(0));
        } else if !weapon.is_loaded() && !weapon.is_reloading() {
            out.action = Some(Action::Reload);
        }
    }
    out
}

/// Shots travel along compass directions: only go diagonal when both axes matter
fn aim(offset: IVec2) -> Direction {
    let (ax, ay) = (offset.x.abs(), offset.y.abs());
    if ax > ay * 2 {
        IVec2::new(offset.x, 0).major_direction()
    } else if ay > ax * 2 {
        IVec2::new(0, offset.y).major_direction()
    } else {
        offset.major_direction()
    }
}

fn push_moves(out: &mut TickInput, toward: IVec2) {
    if toward.x > PLAYER_HITBOX.max.x / 2 {
        out.active.insert(Action::MoveRight);
    } else if toward.x < -PLAYER_HITBOX.max.x / 2 {
        out.active.insert(Action::MoveLeft);
    }
    if toward.y > PLAYER_HITBOX.max.y / 2 {
        out.active.insert(Action::MoveDown);
    } else if toward.y < -PLAYER_HITBOX.max.y / 2 {
        out.active.insert(Action::MoveUp);
    }
}

fn push_looks(out: &mut TickInput, direction: Direction) {
    let unit = direction.unit();
    match unit.x {
        1 => out.active.insert(Action::LookRight),
        -1 => out.active.insert(Action::LookLeft),
        _ => false,
    };
    match unit.y {
        1 => out.active.insert(Action::LookDown),
        -1 => out.active.insert(Action::LookUp),
        _ => false,
    };
}
