//! Weapons: ammo, shot cooldown and reload timers

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::command::{Command, CommandHandler};
use super::geom::Direction;
use super::projectile::Projectile;
use crate::audio::{SoundEffect, SoundSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    GrenadeLauncher,
}

impl WeaponKind {
    /// Magazine size
    pub fn capacity(self) -> u32 {
        match self {
            WeaponKind::Pistol => 10,
            WeaponKind::GrenadeLauncher => 1,
        }
    }

    /// Ticks between two shots
    pub fn cooldown_ticks(self) -> u32 {
        match self {
            WeaponKind::Pistol => 8,
            WeaponKind::GrenadeLauncher => 20,
        }
    }

    /// Ticks a reload takes
    pub fn reload_ticks(self) -> u32 {
        match self {
            WeaponKind::Pistol => 30,
            WeaponKind::GrenadeLauncher => 45,
        }
    }

    /// Starts reloading on its own once the magazine is empty
    pub fn auto_reload(self) -> bool {
        matches!(self, WeaponKind::GrenadeLauncher)
    }

    pub fn shot_sound(self) -> SoundEffect {
        match self {
            WeaponKind::Pistol => SoundEffect::PistolShot,
            WeaponKind::GrenadeLauncher => SoundEffect::GrenadeLaunch,
        }
    }

    pub fn reload_sound(self) -> SoundEffect {
        match self {
            WeaponKind::Pistol => SoundEffect::PistolReload,
            WeaponKind::GrenadeLauncher => SoundEffect::GrenadeReload,
        }
    }

    /// Fresh projectile of this weapon's ammunition type
    pub fn projectile(self, pos: IVec2, direction: Direction) -> Projectile {
        match self {
            WeaponKind::Pistol => Projectile::bullet(pos, direction),
            WeaponKind::GrenadeLauncher => Projectile::explosive(pos, direction),
        }
    }
}

/// Ammo and timers of one owned weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    ammo: u32,
    reloading: bool,
    /// Ticks until the next shot is allowed
    cooldown: u32,
    /// Ticks until a running reload completes
    reload_timer: u32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            ammo: kind.capacity(),
            reloading: false,
            cooldown: 0,
            reload_timer: 0,
        }
    }

    pub fn pistol() -> Self {
        Self::new(WeaponKind::Pistol)
    }

    pub fn grenade_launcher() -> Self {
        Self::new(WeaponKind::GrenadeLauncher)
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn capacity(&self) -> u32 {
        self.kind.capacity()
    }

    pub fn is_loaded(&self) -> bool {
        self.ammo > 0
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn can_shoot(&self) -> bool {
        self.ammo > 0 && self.cooldown == 0 && !self.reloading
    }

    /// Count both timers down by one tick, stopping at zero
    pub fn tick_timer(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        self.reload_timer = self.reload_timer.saturating_sub(1);
    }

    /// Begin a reload. Returns false when one is already running.
    pub fn start_reload(&mut self) -> bool {
        if self.reloading {
            return false;
        }
        self.reloading = true;
        self.reload_timer = self.kind.reload_ticks();
        true
    }

    /// Finish a running reload whose timer has elapsed
    pub fn reload(&mut self) -> bool {
        if !self.reloading || self.reload_timer > 0 {
            return false;
        }
        self.ammo = self.kind.capacity();
        self.reloading = false;
        true
    }

    /// Per-tick update: advance timers and complete a due reload
    pub fn update(&mut self) {
        self.tick_timer();
        self.reload();
    }

    /// Start a reload and announce it
    pub fn begin_reload(&mut self, sound: &mut dyn SoundSink) -> bool {
        let started = self.start_reload();
        if started {
            sound.play(self.kind.reload_sound());
        }
        started
    }

    /// Fire one round from `pos` toward `direction`.
    ///
    /// Emits a `CreateProjectile` command; returns false without side effects
    /// when the weapon cannot shoot.
    pub fn shoot(
        &mut self,
        handler: &mut impl CommandHandler,
        sound: &mut dyn SoundSink,
        pos: IVec2,
        direction: Direction,
    ) -> bool {
        if !self.can_shoot() {
            return false;
        }
        self.ammo -= 1;
        self.cooldown = self.kind.cooldown_ticks();
        handler.handle_command(Command::CreateProjectile(self.kind.projectile(pos, direction)));
        sound.play(self.kind.shot_sound());

        if self.ammo == 0 && self.kind.auto_reload() {
            self.begin_reload(sound);
        }
        true
    }
}
