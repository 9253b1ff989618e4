//! Arena state: every live entity plus the pending command queue
//!
//! Collections only change membership while the queue is drained.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::CameraShake;
use super::command::CommandQueue;
use super::effect::{Explosion, Particle};
use super::monster::Monster;
use super::player::Player;
use super::projectile::Projectile;
use super::scenery::StaticElement;
use crate::consts::*;

/// Viewport offset into the world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: IVec2,
    pub shake: Option<CameraShake>,
}

impl Camera {
    /// Start shaking around the current rest position. A shake that is
    /// already running restarts from its own origin.
    pub fn shake(&mut self) {
        let origin = self.shake.map_or(self.pos, |s| s.origin);
        self.shake = Some(CameraShake::new(origin));
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    /// Follow `target` (kept at the centre of the view) unless shaking
    pub fn update<R: Rng>(&mut self, target: Option<IVec2>, rng: &mut R) {
        if let Some(shake) = &mut self.shake {
            shake.execute(&mut self.pos, rng);
            if shake.is_over() {
                self.shake = None;
            }
            return;
        }
        if let Some(target) = target {
            self.pos = target - IVec2::new(VIEW_WIDTH / 2, VIEW_HEIGHT / 2);
        }
    }

    /// World to screen coordinates
    pub fn to_screen(&self, world: IVec2) -> IVec2 {
        world - self.pos
    }
}

/// The live world of one play session
#[derive(Debug)]
pub struct Arena {
    /// `None` once the player has died
    pub player: Option<Player>,
    pub monsters: Vec<Monster>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Explosion>,
    pub particles: Vec<Particle>,
    pub elements: Vec<StaticElement>,
    pub camera: Camera,
    pub commands: CommandQueue,
    /// Width and height of the playable area
    pub size: IVec2,
    pub seed: u64,
    pub rng: Pcg32,
    pub time_ticks: u64,
}

impl Arena {
    pub fn new(seed: u64) -> Self {
        Self::with_size(seed, IVec2::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT))
    }

    pub fn with_size(seed: u64, size: IVec2) -> Self {
        Self {
            player: None,
            monsters: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            particles: Vec::new(),
            elements: Vec::new(),
            camera: Camera::default(),
            commands: CommandQueue::new(),
            size,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
        }
    }

    pub fn set_player(&mut self, player: Player) {
        self.player = Some(player);
    }

    pub fn add_monster(&mut self, monster: Monster) {
        self.monsters.push(monster);
    }

    pub fn add_element(&mut self, element: StaticElement) {
        self.elements.push(element);
    }

    pub fn player_position(&self) -> Option<IVec2> {
        self.player.as_ref().map(|p| p.pos)
    }

    /// Whether `pos` is inside the arena, allowing a margin for projectiles
    pub fn contains(&self, pos: IVec2) -> bool {
        within_bounds(self.size, pos)
    }

    /// Serializable copy of every entity, for debugging and replays
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            time_ticks: self.time_ticks,
            camera: self.camera.pos,
            player: self.player.clone(),
            monsters: self.monsters.clone(),
            projectiles: self.projectiles.clone(),
            effects: self.effects.clone(),
            particles: self.particles.clone(),
            elements: self.elements.clone(),
        }
    }
}

pub(crate) fn within_bounds(size: IVec2, pos: IVec2) -> bool {
    let min = IVec2::splat(-PROJECTILE_MARGIN);
    let max = size + IVec2::splat(PROJECTILE_MARGIN);
    pos.cmpge(min).all() && pos.cmple(max).all()
}

/// Serializable copy of every entity in an arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub time_ticks: u64,
    pub camera: IVec2,
    pub player: Option<Player>,
    pub monsters: Vec<Monster>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Explosion>,
    pub particles: Vec<Particle>,
    pub elements: Vec<StaticElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follows_target() {
        let mut camera = Camera::default();
        let mut rng = Pcg32::seed_from_u64(1);
        camera.update(Some(IVec2::new(500, 300)), &mut rng);
        assert_eq!(camera.pos, IVec2::new(500 - VIEW_WIDTH / 2, 300 - VIEW_HEIGHT / 2));
        assert_eq!(camera.to_screen(IVec2::new(500, 300)), IVec2::new(VIEW_WIDTH / 2, VIEW_HEIGHT / 2));
    }

    #[test]
    fn test_camera_shake_returns_home() {
        let mut camera = Camera {
            pos: IVec2::new(10, 20),
            shake: None,
        };
        let mut rng = Pcg32::seed_from_u64(3);
        camera.shake();
        for _ in 0..SHAKE_FRAMES {
            camera.update(Some(IVec2::new(999, 999)), &mut rng);
        }
        assert!(!camera.is_shaking());
        assert_eq!(camera.pos, IVec2::new(10, 20));
    }

    #[test]
    fn test_restarted_shake_keeps_origin() {
        let mut camera = Camera {
            pos: IVec2::new(10, 20),
            shake: None,
        };
        let mut rng = Pcg32::seed_from_u64(3);
        camera.shake();
        camera.update(None, &mut rng);
        camera.shake();
        assert_eq!(camera.shake.map(|s| s.origin), Some(IVec2::new(10, 20)));
    }

    #[test]
    fn test_snapshot_survives_json() {
        use crate::sim::geom::Direction;
        use crate::sim::monster::MonsterKind;

        let mut arena = Arena::new(8);
        arena.set_player(Player::new(IVec2::new(40, 40), 140, 2));
        arena.add_monster(Monster::spawn(MonsterKind::Harbinger, IVec2::new(200, 80)));
        arena.add_element(StaticElement::breakable_wall(IVec2::new(16, 0), 30));
        arena.projectiles.push(Projectile::spell(IVec2::new(180, 80), Direction::Left, 15));
        arena.effects.push(Explosion::new(IVec2::new(300, 300), 20));
        arena.time_ticks = 12;

        let snapshot = arena.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: ArenaSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.time_ticks, 12);
        assert_eq!(restored.monsters[0].id, arena.monsters[0].id);
        assert_eq!(restored.elements[0].hp, 30);
    }

    #[test]
    fn test_contains_with_margin() {
        let arena = Arena::with_size(0, IVec2::new(100, 100));
        assert!(arena.contains(IVec2::new(-PROJECTILE_MARGIN, 50)));
        assert!(!arena.contains(IVec2::new(-PROJECTILE_MARGIN - 1, 50)));
        assert!(!arena.contains(IVec2::new(50, 100 + PROJECTILE_MARGIN + 1)));
    }
}
