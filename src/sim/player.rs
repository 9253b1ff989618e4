//! The player character and its per-tick controller

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::animation::Bounce;
use super::collision::try_move;
use super::command::{Command, CommandQueue};
use super::effect::ParticleKind;
use super::entity::{Entity, EntityId, EntityRef, MoveState, apply_damage};
use super::geom::{Direction, HitBox, VectorExt};
use super::scenery::{StaticElement, StaticKind};
use super::weapon::Weapon;
use crate::audio::SoundSink;
use crate::error::{GameError, Result};
use crate::input::{Action, TickInput};

/// Player hit box (one tile, slightly narrower than tall)
pub const PLAYER_HITBOX: HitBox = HitBox::sized(13, 15);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub pos: IVec2,
    hp: i32,
    max_hp: i32,
    pub speed: i32,
    pub moving: MoveState,
    pub looking: Direction,
    weapons: Vec<Weapon>,
    selected: usize,
    /// Knockback in progress
    pub animation: Option<Bounce>,
}

impl Player {
    /// New player carrying a pistol (slot 0) and a grenade launcher (slot 1)
    pub fn new(pos: IVec2, hp: i32, speed: i32) -> Self {
        Self {
            id: EntityId::next(),
            pos,
            hp,
            max_hp: hp,
            speed,
            moving: MoveState::Idle,
            looking: Direction::Right,
            weapons: vec![Weapon::pistol(), Weapon::grenade_launcher()],
            selected: 0,
            animation: None,
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.hp = apply_damage(self.hp, damage);
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn selected_weapon(&self) -> usize {
        self.selected
    }

    pub fn equipped_weapon(&self) -> &Weapon {
        &self.weapons[self.selected]
    }

    pub fn equipped_weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.selected]
    }

    /// Switch to the weapon in `index`. Unknown slots leave the selection unchanged.
    pub fn select_weapon(&mut self, index: usize) -> Result<()> {
        if index >= self.weapons.len() {
            return Err(GameError::InvalidWeapon {
                index,
                available: self.weapons.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    /// Knockback currently moving the player
    pub fn is_bouncing(&self) -> bool {
        self.animation.is_some_and(|b| !b.is_over())
    }

    /// Where shots leave from
    pub fn muzzle(&self) -> IVec2 {
        PLAYER_HITBOX.center(self.pos)
    }

    /// Commands resulting from `other` touching the player
    pub fn interact(&mut self, other: EntityRef<'_>) -> Vec<Command> {
        let (damage, knockback) = match other {
            EntityRef::Projectile(p) if p.is_hostile() => (p.damage, p.direction),
            EntityRef::Monster(m) if m.is_alive() && !self.is_bouncing() => {
                (m.player_damage, self.away_from(&other))
            }
            EntityRef::Explosion(e) if !self.is_bouncing() => (e.damage(), self.away_from(&other)),
            EntityRef::Scenery(s) if s.kind == StaticKind::Spike && !self.is_bouncing() => {
                (s.damage, self.away_from(&other))
            }
            _ => return Vec::new(),
        };

        self.take_damage(damage);
        self.animation = Some(Bounce::new(knockback));

        let mut commands = vec![Command::CreateParticle {
            position: self.pos,
            kind: ParticleKind::DamageBlood,
        }];
        if !self.is_alive() {
            commands.push(Command::CreateParticle {
                position: self.pos,
                kind: ParticleKind::DeathBlood,
            });
            commands.push(Command::KillPlayer);
        }
        commands
    }

    fn away_from(&self, other: &dyn Entity) -> Direction {
        let from = other.hitbox().center(other.position());
        (PLAYER_HITBOX.center(self.pos) - from).major_direction()
    }

    /// Apply one tick of input: weapon handling, walking or knockback, aiming and firing
    pub fn update(
        &mut self,
        input: &TickInput,
        elements: &[StaticElement],
        bounds: IVec2,
        commands: &mut CommandQueue,
        sound: &mut dyn SoundSink,
    ) {
        match input.action {
            Some(Action::SelectWeapon(index)) => {
                if let Err(e) = self.select_weapon(index) {
                    log::warn!("Ignoring weapon switch: {}", e);
                }
            }
            Some(Action::Reload) => {
                self.equipped_weapon_mut().begin_reload(sound);
            }
            _ => {}
        }
        for weapon in &mut self.weapons {
            weapon.update();
        }

        if self.animation.is_some_and(|b| b.is_over()) {
            self.animation = None;
        }
        let delta = match &mut self.animation {
            Some(bounce) => bounce.step(),
            None => {
                let (state, step) = resolve_movement(input);
                self.moving = state;
                step * self.speed
            }
        };
        try_move(&mut self.pos, PLAYER_HITBOX, delta, elements);
        self.pos = self.pos.clamp(IVec2::ZERO, (bounds - PLAYER_HITBOX.max).max(IVec2::ZERO));

        if let Some(direction) = look_direction(input) {
            self.looking = direction;
            let muzzle = self.muzzle();
            self.weapons[self.selected].shoot(commands, sound, muzzle, direction);
        }
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> IVec2 {
        self.pos
    }

    fn hitbox(&self) -> HitBox {
        PLAYER_HITBOX
    }
}

/// Resolve held MOVE actions into a display state and a unit step.
///
/// Holding both sides of an opposing pair (left+right or up+down) cancels
/// all movement. Otherwise intents add up, so diagonals are possible, and
/// the display state prefers the horizontal axis.
pub fn resolve_movement(input: &TickInput) -> (MoveState, IVec2) {
    let left = input.is_active(Action::MoveLeft);
    let right = input.is_active(Action::MoveRight);
    let up = input.is_active(Action::MoveUp);
    let down = input.is_active(Action::MoveDown);
    if (left && right) || (up && down) {
        return (MoveState::Idle, IVec2::ZERO);
    }
    let step = IVec2::new(right as i32 - left as i32, down as i32 - up as i32);
    (MoveState::toward(step), step)
}

/// Aim from held LOOK actions; opposing looks cancel on their axis
fn look_direction(input: &TickInput) -> Option<Direction> {
    let x = input.is_active(Action::LookRight) as i32 - input.is_active(Action::LookLeft) as i32;
    let y = input.is_active(Action::LookDown) as i32 - input.is_active(Action::LookUp) as i32;
    Direction::from_signs(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::sim::effect::Explosion;
    use crate::sim::monster::{Monster, MonsterKind};
    use crate::sim::projectile::Projectile;
    use crate::testing::RecordingSound;

    const BOUNDS: IVec2 = IVec2::new(1000, 1000);

    fn holding(actions: &[Action]) -> TickInput {
        TickInput::holding(actions.iter().copied())
    }

    fn step(player: &mut Player, input: &TickInput) -> CommandQueue {
        let mut commands = CommandQueue::new();
        let mut sound = RecordingSound::default();
        player.update(input, &[], BOUNDS, &mut commands, &mut sound);
        commands
    }

    #[test]
    fn test_new_player_loadout() {
        let player = Player::new(IVec2::new(10, 10), 100, 2);
        assert_eq!(player.hp(), 100);
        assert_eq!(player.weapons().len(), 2);
        assert_eq!(player.equipped_weapon().kind, crate::sim::weapon::WeaponKind::Pistol);
        assert_eq!(player.moving, MoveState::Idle);
    }

    #[test]
    fn test_select_weapon() {
        let mut player = Player::new(IVec2::ZERO, 100, 2);
        player.select_weapon(1).unwrap();
        assert_eq!(
            player.equipped_weapon().kind,
            crate::sim::weapon::WeaponKind::GrenadeLauncher
        );
        let err = player.select_weapon(2).unwrap_err();
        assert!(matches!(err, GameError::InvalidWeapon { index: 2, available: 2 }));
        assert_eq!(player.selected_weapon(), 1);
    }

    #[test]
    fn test_opposing_moves_cancel() {
        let (state, step) = resolve_movement(&holding(&[Action::MoveLeft, Action::MoveRight]));
        assert_eq!(state, MoveState::Idle);
        assert_eq!(step, IVec2::ZERO);

        let (state, _) = resolve_movement(&holding(&[Action::MoveUp, Action::MoveDown]));
        assert_eq!(state, MoveState::Idle);

        let (state, _) = resolve_movement(&holding(&[
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveRight,
        ]));
        assert_eq!(state, MoveState::Idle);
    }

    #[test]
    fn test_move_up_faces_back() {
        let mut player = Player::new(IVec2::new(100, 100), 100, 3);
        step(&mut player, &holding(&[Action::MoveUp]));
        assert_eq!(player.moving, MoveState::Back);
        assert_eq!(player.pos, IVec2::new(100, 97));
    }

    #[test]
    fn test_diagonal_walk_prefers_horizontal_state() {
        let mut player = Player::new(IVec2::new(100, 100), 100, 2);
        step(&mut player, &holding(&[Action::MoveDown, Action::MoveLeft]));
        assert_eq!(player.moving, MoveState::Left);
        assert_eq!(player.pos, IVec2::new(98, 102));
    }

    #[test]
    fn test_walls_block_walking() {
        let mut player = Player::new(IVec2::new(100, 100), 100, 4);
        let wall = StaticElement::wall(IVec2::new(116, 100));
        let mut commands = CommandQueue::new();
        let mut sound = RecordingSound::default();
        player.update(
            &holding(&[Action::MoveRight]),
            std::slice::from_ref(&wall),
            BOUNDS,
            &mut commands,
            &mut sound,
        );
        assert_eq!(player.pos, IVec2::new(100, 100));
    }

    #[test]
    fn test_clamped_to_bounds() {
        let mut player = Player::new(IVec2::new(1, 1), 100, 4);
        step(&mut player, &holding(&[Action::MoveLeft, Action::MoveUp]));
        assert_eq!(player.pos, IVec2::ZERO);
    }

    #[test]
    fn test_look_fires_equipped_weapon() {
        let mut player = Player::new(IVec2::new(100, 100), 100, 2);
        let commands = step(&mut player, &holding(&[Action::LookUp]));
        assert_eq!(player.looking, Direction::Up);
        assert_eq!(commands.len(), 1);
        assert!(matches!(
            commands.iter().next(),
            Some(Command::CreateProjectile(p)) if p.direction == Direction::Up && p.pos == player.muzzle()
        ));
    }

    #[test]
    fn test_reload_action_plays_sound() {
        let mut player = Player::new(IVec2::ZERO, 100, 2);
        let mut commands = CommandQueue::new();
        let mut sound = RecordingSound::default();
        player.update(
            &TickInput::with_action(Action::Reload),
            &[],
            BOUNDS,
            &mut commands,
            &mut sound,
        );
        assert!(player.equipped_weapon().is_reloading());
        assert_eq!(sound.played, vec![SoundEffect::PistolReload]);
    }

    #[test]
    fn test_invalid_selection_is_ignored() {
        let mut player = Player::new(IVec2::ZERO, 100, 2);
        step(&mut player, &TickInput::with_action(Action::SelectWeapon(7)));
        assert_eq!(player.selected_weapon(), 0);
    }

    #[test]
    fn test_monster_contact_hurts_and_bounces() {
        let mut player = Player::new(IVec2::new(100, 100), 100, 2);
        let monster = Monster::new(MonsterKind::Peon, IVec2::new(110, 100), 10, 1, 20, 100);
        let commands = player.interact(EntityRef::Monster(&monster));
        assert_eq!(player.hp(), 80);
        assert_eq!(player.animation.map(|b| b.direction), Some(Direction::Left));
        assert!(commands.iter().any(|c| matches!(
            c,
            Command::CreateParticle { kind: ParticleKind::DamageBlood, .. }
        )));

        // Knockback grants contact immunity
        assert!(player.interact(EntityRef::Monster(&monster)).is_empty());
        assert_eq!(player.hp(), 80);
    }

    #[test]
    fn test_spell_hits_even_while_bouncing() {
        let mut player = Player::new(IVec2::ZERO, 100, 2);
        player.animation = Some(Bounce::new(Direction::Left));
        let spell = Projectile::spell(IVec2::ZERO, Direction::Right, 15);
        player.interact(EntityRef::Projectile(&spell));
        assert_eq!(player.hp(), 85);
        assert_eq!(player.animation.map(|b| b.direction), Some(Direction::Right));
    }

    #[test]
    fn test_lethal_hit_kills() {
        let mut player = Player::new(IVec2::ZERO, 30, 2);
        let explosion = Explosion::new(IVec2::ZERO, 20);
        let commands = player.interact(EntityRef::Explosion(&explosion));
        assert!(!player.is_alive());
        assert_eq!(commands.last(), Some(&Command::KillPlayer));
    }

    #[test]
    fn test_spike_contact() {
        let mut player = Player::new(IVec2::ZERO, 50, 2);
        let spike = StaticElement::spike(IVec2::new(4, 4), 5);
        player.interact(EntityRef::Scenery(&spike));
        assert_eq!(player.hp(), 45);
        let wall = StaticElement::wall(IVec2::ZERO);
        player.animation = None;
        assert!(player.interact(EntityRef::Scenery(&wall)).is_empty());
    }

    #[test]
    fn test_bounce_replaces_walking() {
        let mut player = Player::new(IVec2::new(100, 100), 100, 2);
        player.animation = Some(Bounce::new(Direction::Left));
        step(&mut player, &holding(&[Action::MoveRight]));
        assert_eq!(player.pos, IVec2::new(93, 100));
    }
}
