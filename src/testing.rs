//! Test doubles shared by unit tests

use crate::app::{AppState, StateChanger};
use crate::audio::{SoundEffect, SoundSink};
use crate::save::{Difficulty, SaveDataProvider};

#[derive(Debug, Default)]
pub struct RecordingSound {
    pub played: Vec<SoundEffect>,
}

impl SoundSink for RecordingSound {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}

#[derive(Debug, Default)]
pub struct RecordingStates {
    pub requests: Vec<Option<AppState>>,
}

impl StateChanger for RecordingStates {
    fn set_state(&mut self, state: Option<AppState>) {
        self.requests.push(state);
    }
}

/// Save provider that never touches the disk
#[derive(Debug)]
pub struct MemorySave {
    pub level: u32,
    pub difficulty: Difficulty,
    pub increased: u32,
    pub deleted: bool,
}

impl MemorySave {
    pub fn new(level: u32, difficulty: Difficulty) -> Self {
        Self {
            level,
            difficulty,
            increased: 0,
            deleted: false,
        }
    }
}

impl SaveDataProvider for MemorySave {
    fn level(&self) -> u32 {
        self.level
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn increase_level(&mut self) {
        self.level += 1;
        self.increased += 1;
    }

    fn delete_save(&mut self) {
        self.deleted = true;
    }
}
