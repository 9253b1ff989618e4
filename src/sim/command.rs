//! Deferred world mutations
//!
//! Controllers and `interact` implementations never add or remove entities
//! directly. They emit commands which the arena applies in one FIFO pass
//! at the end of the tick.

use glam::IVec2;

use super::effect::{Explosion, ParticleKind};
use super::entity::EntityId;
use super::projectile::Projectile;

/// A queued mutation of the arena's collections
#[derive(Debug, Clone)]
pub enum Command {
    CreateProjectile(Projectile),
    DeleteProjectile(EntityId),
    CreateParticle { position: IVec2, kind: ParticleKind },
    DeleteParticle(EntityId),
    CreateEffect(Explosion),
    DeleteEffect(EntityId),
    DeleteMonster(EntityId),
    DeleteBreakableWall(EntityId),
    ShakeCamera,
    KillPlayer,
}

/// Commands compare by the identity of the entity they carry or target
impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        use Command::*;
        match (self, other) {
            (CreateProjectile(a), CreateProjectile(b)) => a.id == b.id,
            (CreateEffect(a), CreateEffect(b)) => a.id == b.id,
            (
                CreateParticle { position: pa, kind: ka },
                CreateParticle { position: pb, kind: kb },
            ) => pa == pb && ka == kb,
            (DeleteProjectile(a), DeleteProjectile(b))
            | (DeleteParticle(a), DeleteParticle(b))
            | (DeleteEffect(a), DeleteEffect(b))
            | (DeleteMonster(a), DeleteMonster(b))
            | (DeleteBreakableWall(a), DeleteBreakableWall(b)) => a == b,
            (ShakeCamera, ShakeCamera) | (KillPlayer, KillPlayer) => true,
            _ => false,
        }
    }
}

impl Eq for Command {}

/// Sink for commands produced during a tick
pub trait CommandHandler {
    fn handle_command(&mut self, command: Command);
}

impl CommandHandler for Vec<Command> {
    fn handle_command(&mut self, command: Command) {
        self.push(command);
    }
}

/// Pending commands of one arena, drained once per tick
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.pending.extend(commands);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.pending.iter()
    }

    pub fn contains(&self, command: &Command) -> bool {
        self.pending.contains(command)
    }

    /// Take every pending command in enqueue order, leaving the queue empty
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }
}

impl CommandHandler for CommandQueue {
    fn handle_command(&mut self, command: Command) {
        self.pending.push(command);
    }
}
