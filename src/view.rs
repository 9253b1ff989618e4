//! Draw-call layer
//!
//! The simulation knows nothing about pixels. A backend implements
//! [`Renderer`]; [`draw_arena`] walks the arena and issues one sprite per
//! entity in screen coordinates, then the HUD.

use glam::IVec2;

use crate::consts::HEALTH_SEGMENTS;
use crate::menu::Menu;
use crate::sim::effect::ParticleKind;
use crate::sim::entity::MoveState;
use crate::sim::monster::MonsterKind;
use crate::sim::projectile::ProjectileKind;
use crate::sim::scenery::StaticKind;
use crate::sim::state::Arena;
use crate::sim::weapon::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    Monster(MonsterKind),
    Projectile(ProjectileKind),
    Static(StaticKind),
    Explosion { frame: u32 },
    Particle { kind: ParticleKind, frame: u32 },
}

/// Heads-up display contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    /// Filled segments of the health bar
    pub health: u32,
    pub weapon: WeaponKind,
    pub ammo: u32,
    pub capacity: u32,
    pub reloading: bool,
    pub monsters_left: usize,
}

impl Hud {
    /// HUD for the current arena, `None` once the player is dead
    pub fn from_arena(arena: &Arena) -> Option<Self> {
        let player = arena.player.as_ref()?;
        let weapon = player.equipped_weapon();
        Some(Self {
            health: health_segments(player.max_hp(), player.hp()),
            weapon: weapon.kind,
            ammo: weapon.ammo(),
            capacity: weapon.capacity(),
            reloading: weapon.is_reloading(),
            monsters_left: arena.monsters.len(),
        })
    }
}

pub trait Renderer {
    fn draw_sprite(&mut self, sprite: Sprite, screen_pos: IVec2, state: MoveState);
    fn draw_hud(&mut self, hud: &Hud);
    fn draw_menu(&mut self, menu: &Menu);
}

/// Draw every entity relative to the camera, then the HUD
pub fn draw_arena(arena: &Arena, renderer: &mut dyn Renderer) {
    let camera = &arena.camera;

    for element in &arena.elements {
        renderer.draw_sprite(
            Sprite::Static(element.kind),
            camera.to_screen(element.pos),
            MoveState::Idle,
        );
    }
    for particle in &arena.particles {
        renderer.draw_sprite(
            Sprite::Particle {
                kind: particle.kind,
                frame: particle.frame(),
            },
            camera.to_screen(particle.pos),
            MoveState::Idle,
        );
    }
    for monster in &arena.monsters {
        renderer.draw_sprite(
            Sprite::Monster(monster.kind),
            camera.to_screen(monster.pos),
            monster.moving,
        );
    }
    if let Some(player) = &arena.player {
        renderer.draw_sprite(Sprite::Player, camera.to_screen(player.pos), player.moving);
    }
    for projectile in &arena.projectiles {
        renderer.draw_sprite(
            Sprite::Projectile(projectile.kind),
            camera.to_screen(projectile.pos),
            MoveState::Idle,
        );
    }
    for explosion in &arena.effects {
        renderer.draw_sprite(
            Sprite::Explosion {
                frame: explosion.frame(),
            },
            camera.to_screen(explosion.pos),
            MoveState::Idle,
        );
    }

    if let Some(hud) = Hud::from_arena(arena) {
        renderer.draw_hud(&hud);
    }
}

/// Filled segments of the health bar.
///
/// Each segment is worth `max_hp / 7` (at least 1); a partly filled segment
/// still shows.
pub fn health_segments(max_hp: i32, hp: i32) -> u32 {
    if hp <= 0 {
        return 0;
    }
    let portion = (max_hp / HEALTH_SEGMENTS as i32).max(1) as u32;
    (hp as u32).div_ceil(portion).min(HEALTH_SEGMENTS)
}

/// Renderer that only counts draw calls, for headless runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingRenderer {
    pub sprites: u64,
    pub huds: u64,
    pub menus: u64,
    pub last_hud: Option<Hud>,
}

impl Renderer for CountingRenderer {
    fn draw_sprite(&mut self, _sprite: Sprite, _screen_pos: IVec2, _state: MoveState) {
        self.sprites += 1;
    }

    fn draw_hud(&mut self, hud: &Hud) {
        self.huds += 1;
        self.last_hud = Some(hud.clone());
    }

    fn draw_menu(&mut self, _menu: &Menu) {
        self.menus += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::monster::Monster;
    use crate::sim::player::Player;
    use crate::sim::scenery::StaticElement;

    #[derive(Default)]
    struct Recorder {
        sprites: Vec<(Sprite, IVec2)>,
        hud: Option<Hud>,
    }

    impl Renderer for Recorder {
        fn draw_sprite(&mut self, sprite: Sprite, screen_pos: IVec2, _state: MoveState) {
            self.sprites.push((sprite, screen_pos));
        }

        fn draw_hud(&mut self, hud: &Hud) {
            self.hud = Some(hud.clone());
        }

        fn draw_menu(&mut self, _menu: &Menu) {}
    }

    #[test]
    fn test_health_segments() {
        assert_eq!(health_segments(100, 50), 4);
        assert_eq!(health_segments(140, 1), 1);
        assert_eq!(health_segments(150, 75), 4);
        assert_eq!(health_segments(140, 140), 7);
        assert_eq!(health_segments(140, 500), 7);
        assert_eq!(health_segments(100, 0), 0);
        assert_eq!(health_segments(100, -5), 0);
        assert_eq!(health_segments(3, 2), 2);
        assert_eq!(health_segments(140, i32::MAX), 7);
        assert_eq!(health_segments(i32::MAX, i32::MAX), 7);
    }

    #[test]
    fn test_hud_after_uncapped_healing() {
        let mut arena = Arena::new(0);
        let mut player = Player::new(IVec2::new(100, 100), 140, 2);
        player.take_damage(i32::MIN);
        assert_eq!(player.hp(), i32::MAX);
        arena.set_player(player);

        let mut renderer = CountingRenderer::default();
        draw_arena(&arena, &mut renderer);
        assert_eq!(renderer.last_hud.map(|h| h.health), Some(7));
    }

    #[test]
    fn test_draw_arena_uses_camera() {
        let mut arena = Arena::new(0);
        arena.set_player(Player::new(IVec2::new(100, 100), 140, 2));
        arena.add_monster(Monster::spawn(MonsterKind::Peon, IVec2::new(150, 120)));
        arena.add_element(StaticElement::wall(IVec2::new(0, 0)));
        arena.camera.pos = IVec2::new(50, 60);

        let mut recorder = Recorder::default();
        draw_arena(&arena, &mut recorder);

        assert_eq!(
            recorder.sprites,
            vec![
                (Sprite::Static(StaticKind::Wall), IVec2::new(-50, -60)),
                (Sprite::Monster(MonsterKind::Peon), IVec2::new(100, 60)),
                (Sprite::Player, IVec2::new(50, 40)),
            ]
        );
        let hud = recorder.hud.unwrap();
        assert_eq!(hud.health, 7);
        assert_eq!(hud.weapon, WeaponKind::Pistol);
        assert_eq!(hud.ammo, 10);
        assert_eq!(hud.monsters_left, 1);
    }

    #[test]
    fn test_no_hud_without_player() {
        let arena = Arena::new(0);
        let mut renderer = CountingRenderer::default();
        draw_arena(&arena, &mut renderer);
        assert_eq!(renderer.huds, 0);
        assert_eq!(renderer.sprites, 0);
    }
}
