//! Save slots
//!
//! One JSON file per save inside a directory. The arena only sees the
//! active save through [`SaveDataProvider`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Number of levels in a campaign
pub const MAX_LEVEL: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Normal,
    Champion,
    /// Champion stats plus permanent death: dying deletes the save
    Heartless,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Champion => "Champion",
            Difficulty::Heartless => "Heartless",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Difficulty::Normal),
            "champion" => Some(Difficulty::Champion),
            "heartless" => Some(Difficulty::Heartless),
            _ => None,
        }
    }

    pub fn is_permadeath(&self) -> bool {
        matches!(self, Difficulty::Heartless)
    }

    /// Multiplier applied to monster HP and damage
    pub fn monster_scale(&self) -> f64 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Champion | Difficulty::Heartless => 1.5,
        }
    }

    pub fn player_hp(&self) -> i32 {
        match self {
            Difficulty::Normal => 140,
            Difficulty::Champion | Difficulty::Heartless => 100,
        }
    }
}

/// Progress of one campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub id: u32,
    pub level: u32,
    pub difficulty: Difficulty,
}

/// What the arena needs to know about (and do to) the active save
pub trait SaveDataProvider {
    fn level(&self) -> u32;
    fn difficulty(&self) -> Difficulty;
    fn increase_level(&mut self);
    fn delete_save(&mut self);
}

/// Directory of save files
#[derive(Debug)]
pub struct SaveManager {
    dir: PathBuf,
    saves: Vec<SaveData>,
}

impl SaveManager {
    /// Open (creating if needed) a save directory and load every valid save in it
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut saves = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !is_save_file(&path) {
                continue;
            }
            match read_save(&path) {
                Ok(save) => saves.push(save),
                Err(e) => log::warn!("Skipping unreadable save {}: {}", path.display(), e),
            }
        }
        saves.sort_by_key(|s| s.id);
        log::info!("Loaded {} save(s) from {}", saves.len(), dir.display());
        Ok(Self { dir, saves })
    }

    pub fn saves(&self) -> &[SaveData] {
        &self.saves
    }

    pub fn save_count(&self) -> usize {
        self.saves.len()
    }

    /// Most recently created save
    pub fn last_open(&self) -> Option<&SaveData> {
        self.saves.last()
    }

    pub fn create_new_save(&mut self, difficulty: Difficulty) -> Result<SaveData> {
        self.create_new_save_at(difficulty, 1)
    }

    pub fn create_new_save_at(&mut self, difficulty: Difficulty, level: u32) -> Result<SaveData> {
        let id = self.saves.last().map_or(1, |s| s.id + 1);
        let save = SaveData {
            id,
            level: level.clamp(1, MAX_LEVEL),
            difficulty,
        };
        self.store(&save)?;
        log::info!("Created save {} ({}, level {})", id, difficulty.as_str(), save.level);
        Ok(save)
    }

    /// Write `save` to disk and refresh the in-memory copy
    pub fn store(&mut self, save: &SaveData) -> Result<()> {
        write_save(&self.path_for(save.id), save)?;
        match self.saves.iter_mut().find(|s| s.id == save.id) {
            Some(existing) => *existing = save.clone(),
            None => {
                self.saves.push(save.clone());
                self.saves.sort_by_key(|s| s.id);
            }
        }
        Ok(())
    }

    /// Delete a save. Returns false if it did not exist.
    pub fn delete_save(&mut self, id: u32) -> Result<bool> {
        let before = self.saves.len();
        self.saves.retain(|s| s.id != id);
        remove_if_exists(&self.path_for(id))?;
        let removed = self.saves.len() != before;
        if removed {
            log::info!("Deleted save {}", id);
        }
        Ok(removed)
    }

    /// Bind a save for use by the arena
    pub fn activate(&self, save: SaveData) -> ActiveSave {
        ActiveSave {
            path: self.path_for(save.id),
            data: save,
            deleted: false,
        }
    }

    fn path_for(&self, id: u32) -> PathBuf {
        self.dir.join(format!("save_{id}.json"))
    }
}

/// The save being played; every mutation is written through to disk
#[derive(Debug, Clone)]
pub struct ActiveSave {
    path: PathBuf,
    data: SaveData,
    deleted: bool,
}

impl ActiveSave {
    pub fn data(&self) -> &SaveData {
        &self.data
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl SaveDataProvider for ActiveSave {
    fn level(&self) -> u32 {
        self.data.level
    }

    fn difficulty(&self) -> Difficulty {
        self.data.difficulty
    }

    fn increase_level(&mut self) {
        self.data.level = self.data.level.saturating_add(1);
        if self.deleted {
            return;
        }
        if let Err(e) = write_save(&self.path, &self.data) {
            log::warn!("Failed to persist level {}: {}", self.data.level, e);
        }
    }

    fn delete_save(&mut self) {
        self.deleted = true;
        match remove_if_exists(&self.path) {
            Ok(()) => log::info!("Deleted save {}", self.data.id),
            Err(e) => log::warn!("Failed to delete save {}: {}", self.data.id, e),
        }
    }
}

fn is_save_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("save_"))
}

fn read_save(path: &Path) -> Result<SaveData> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn write_save(path: &Path, save: &SaveData) -> Result<()> {
    let json = serde_json::to_string_pretty(save)?;
    fs::write(path, json)?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_save_starts_at_level_one() {
        let dir = tempdir().expect("tempdir");
        let mut manager = SaveManager::open(dir.path()).unwrap();
        let save = manager.create_new_save(Difficulty::Normal).unwrap();
        assert_eq!(save.level, 1);
        assert_eq!(manager.save_count(), 1);
        assert_eq!(manager.last_open(), Some(&save));
    }

    #[test]
    fn test_saves_survive_reopen() {
        let dir = tempdir().expect("tempdir");
        {
            let mut manager = SaveManager::open(dir.path()).unwrap();
            manager.create_new_save(Difficulty::Champion).unwrap();
            manager.create_new_save_at(Difficulty::Heartless, 4).unwrap();
        }
        let manager = SaveManager::open(dir.path()).unwrap();
        assert_eq!(manager.save_count(), 2);
        let last = manager.last_open().unwrap();
        assert_eq!(last.id, 2);
        assert_eq!(last.level, 4);
        assert_eq!(last.difficulty, Difficulty::Heartless);
    }

    #[test]
    fn test_active_save_increase_level_persists() {
        let dir = tempdir().expect("tempdir");
        let mut manager = SaveManager::open(dir.path()).unwrap();
        let save = manager.create_new_save(Difficulty::Normal).unwrap();
        let mut active = manager.activate(save);
        active.increase_level();
        assert_eq!(active.level(), 2);

        let reopened = SaveManager::open(dir.path()).unwrap();
        assert_eq!(reopened.last_open().map(|s| s.level), Some(2));
    }

    #[test]
    fn test_active_save_delete() {
        let dir = tempdir().expect("tempdir");
        let mut manager = SaveManager::open(dir.path()).unwrap();
        let save = manager.create_new_save(Difficulty::Heartless).unwrap();
        let mut active = manager.activate(save);
        active.delete_save();
        assert!(active.is_deleted());

        // Deleted saves are not resurrected by later progress
        active.increase_level();
        let reopened = SaveManager::open(dir.path()).unwrap();
        assert_eq!(reopened.save_count(), 0);
    }

    #[test]
    fn test_delete_missing_save_is_noop() {
        let dir = tempdir().expect("tempdir");
        let mut manager = SaveManager::open(dir.path()).unwrap();
        assert!(!manager.delete_save(42).unwrap());
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("save_9.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let manager = SaveManager::open(dir.path()).unwrap();
        assert_eq!(manager.save_count(), 0);
    }

    #[test]
    fn test_difficulty_names() {
        assert_eq!(Difficulty::from_name("HEARTLESS"), Some(Difficulty::Heartless));
        assert_eq!(Difficulty::from_name("easy"), None);
        assert!(Difficulty::Heartless.is_permadeath());
        assert!(!Difficulty::Champion.is_permadeath());
    }
}
