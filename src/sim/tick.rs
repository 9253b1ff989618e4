//! Fixed-step arena tick
//!
//! One call to [`ArenaController::tick`] runs, in order: input handling,
//! player, camera, monsters, projectiles, effects, particles, collision
//! detection, the command drain and finally the win/lose checks. Later
//! phases rely on earlier ones (collisions see moved entities, the end
//! checks see the drained collections).

use super::ai;
use super::autopilot;
use super::collision;
use super::command::{Command, CommandHandler};
use super::effect::Particle;
use super::entity::{Entity, EntityId};
use super::state::{Arena, within_bounds};
use crate::app::{AppState, StateChanger};
use crate::audio::{SoundEffect, SoundSink};
use crate::consts::END_COUNTER_TICKS;
use crate::input::{Action, TickInput};
use crate::menu::MenuKind;
use crate::save::{MAX_LEVEL, SaveDataProvider};

/// Collaborators a tick talks to
pub struct TickContext<'a> {
    pub sound: &'a mut dyn SoundSink,
    pub saves: &'a mut dyn SaveDataProvider,
    pub states: &'a mut dyn StateChanger,
}

/// Drives an [`Arena`] one tick at a time
#[derive(Debug)]
pub struct ArenaController {
    arena: Arena,
    end_counter: u32,
    finished: bool,
    screen_shake: bool,
}

impl ArenaController {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            end_counter: END_COUNTER_TICKS,
            finished: false,
            screen_shake: true,
        }
    }

    /// Disable camera shake (reduced motion)
    pub fn with_screen_shake(mut self, enabled: bool) -> Self {
        self.screen_shake = enabled;
        self
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Ticks left before an empty arena counts as cleared
    pub fn end_counter(&self) -> u32 {
        self.end_counter
    }

    /// A level-end or death transition has been requested
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the arena by one tick
    pub fn tick(&mut self, input: &TickInput, ctx: &mut TickContext<'_>) {
        match input.action {
            Some(Action::Quit) => {
                ctx.states.set_state(None);
                return;
            }
            Some(Action::Esc) => {
                ctx.states.set_state(Some(AppState::Menu(MenuKind::Pause)));
                return;
            }
            _ => {}
        }

        let input = if input.autopilot {
            autopilot::drive(&self.arena, input)
        } else {
            input.clone()
        };

        self.update_player(&input, ctx.sound);
        self.update_camera();
        self.update_monsters(ctx.sound);
        self.update_projectiles();
        self.update_effects();
        self.update_particles();
        self.check_collisions(ctx.sound);
        self.trigger_commands(ctx.sound);
        self.check_level_end(ctx);
        self.check_player_death(ctx);
        self.arena.time_ticks += 1;
    }

    fn update_player(&mut self, input: &TickInput, sound: &mut dyn SoundSink) {
        let Arena {
            player,
            elements,
            commands,
            size,
            ..
        } = &mut self.arena;
        if let Some(player) = player.as_mut() {
            player.update(input, elements, *size, commands, sound);
        }
    }

    fn update_camera(&mut self) {
        let target = self.arena.player_position();
        let Arena { camera, rng, .. } = &mut self.arena;
        camera.update(target, rng);
    }

    fn update_monsters(&mut self, sound: &mut dyn SoundSink) {
        let target = self.arena.player_position();
        let Arena {
            monsters,
            elements,
            commands,
            ..
        } = &mut self.arena;
        for monster in monsters.iter_mut() {
            if ai::update_monster(monster, target, elements, commands) {
                sound.play(SoundEffect::SpellCast);
            }
        }
    }

    fn update_projectiles(&mut self) {
        let Arena {
            projectiles,
            commands,
            size,
            ..
        } = &mut self.arena;
        for projectile in projectiles.iter_mut() {
            projectile.update();
            if !within_bounds(*size, projectile.pos) {
                commands.handle_command(Command::DeleteProjectile(projectile.id));
            }
        }
    }

    fn update_effects(&mut self) {
        let Arena { effects, commands, .. } = &mut self.arena;
        for explosion in effects.iter_mut() {
            explosion.update();
            if explosion.is_over() {
                commands.handle_command(Command::DeleteEffect(explosion.id));
            }
        }
    }

    fn update_particles(&mut self) {
        let Arena {
            particles, commands, ..
        } = &mut self.arena;
        for particle in particles.iter_mut() {
            particle.update();
            if particle.is_over() {
                commands.handle_command(Command::DeleteParticle(particle.id));
            }
        }
    }

    /// Queue commands for every colliding pair; collections are untouched
    pub fn check_collisions(&mut self, sound: &mut dyn SoundSink) {
        collision::check_collisions(&mut self.arena, sound);
    }

    /// Apply every pending command in FIFO order and empty the queue
    pub fn trigger_commands(&mut self, sound: &mut dyn SoundSink) {
        for command in self.arena.commands.take() {
            self.handle_command(command, sound);
        }
    }

    /// Apply one command. Targets that are already gone are ignored.
    pub fn handle_command(&mut self, command: Command, sound: &mut dyn SoundSink) {
        let arena = &mut self.arena;
        match command {
            Command::CreateProjectile(projectile) => arena.projectiles.push(projectile),
            Command::DeleteProjectile(id) => {
                remove_entity(&mut arena.projectiles, id);
            }
            Command::CreateParticle { position, kind } => {
                arena.particles.push(Particle::new(kind, position));
            }
            Command::DeleteParticle(id) => {
                remove_entity(&mut arena.particles, id);
            }
            Command::CreateEffect(explosion) => {
                arena.effects.push(explosion);
                sound.play(SoundEffect::Explosion);
            }
            Command::DeleteEffect(id) => {
                remove_entity(&mut arena.effects, id);
            }
            Command::DeleteMonster(id) => {
                if remove_entity(&mut arena.monsters, id) {
                    log::debug!("Monster {} killed", id.raw());
                    sound.play(SoundEffect::MonsterDeath);
                }
            }
            Command::DeleteBreakableWall(id) => {
                let before = arena.elements.len();
                arena.elements.retain(|e| !(e.id == id && e.is_breakable()));
                if arena.elements.len() != before {
                    sound.play(SoundEffect::WallBreak);
                }
            }
            Command::ShakeCamera => {
                if self.screen_shake {
                    arena.camera.shake();
                }
            }
            Command::KillPlayer => {
                if arena.player.take().is_some() {
                    log::info!("Player died at tick {}", arena.time_ticks);
                    sound.play(SoundEffect::PlayerDeath);
                }
            }
        }
    }

    fn check_level_end(&mut self, ctx: &mut TickContext<'_>) {
        if !self.arena.monsters.is_empty() || self.arena.player.is_none() {
            return;
        }
        self.end_counter = self.end_counter.saturating_sub(1);
        if self.end_counter > 0 || self.finished {
            return;
        }
        self.finished = true;

        let level = ctx.saves.level();
        if level >= MAX_LEVEL {
            log::info!("Final level {} cleared", level);
            ctx.sound.play(SoundEffect::Victory);
            ctx.states.set_state(Some(AppState::Menu(MenuKind::Victory)));
        } else {
            log::info!("Level {} cleared", level);
            ctx.saves.increase_level();
            ctx.sound.play(SoundEffect::LevelComplete);
            ctx.states
                .set_state(Some(AppState::Menu(MenuKind::LevelCompleted)));
        }
    }

    fn check_player_death(&mut self, ctx: &mut TickContext<'_>) {
        if self.arena.player.is_some() || self.finished {
            return;
        }
        self.finished = true;

        if ctx.saves.difficulty().is_permadeath() {
            ctx.saves.delete_save();
            ctx.sound.play(SoundEffect::GameOver);
            ctx.states.set_state(Some(AppState::Menu(MenuKind::GameOver)));
        } else {
            ctx.states.set_state(Some(AppState::Menu(MenuKind::Death)));
        }
    }
}

/// Remove the entity with `id`, returning whether it was present
fn remove_entity<T: Entity>(items: &mut Vec<T>, id: EntityId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
