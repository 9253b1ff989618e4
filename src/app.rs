//! Application state machine and fixed-rate driver
//!
//! [`Game`] owns everything outside the simulation: settings, saves, audio
//! and menus. Each call to [`Game::step`] runs one fixed tick of whatever
//! screen is active and applies the state change the tick requested.

use std::time::Duration;

use serde::Serialize;

use crate::audio::{AudioManager, SoundEffect, SoundSink};
use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS};
use crate::error::Result;
use crate::input::{Action, InputSource, TickInput};
use crate::menu::{Menu, MenuKind, MenuOption};
use crate::save::{ActiveSave, Difficulty, SaveDataProvider, SaveManager};
use crate::settings::Settings;
use crate::sim::level::build_arena;
use crate::sim::state::ArenaSnapshot;
use crate::sim::tick::{ArenaController, TickContext};
use crate::view::{Renderer, draw_arena};

/// Screen the application is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AppState {
    Arena,
    Menu(MenuKind),
}

/// Receives state change requests. `None` means exit.
pub trait StateChanger {
    fn set_state(&mut self, state: Option<AppState>);
}

/// Collects the request made during a tick; the last one wins
#[derive(Debug, Default)]
pub struct StateRequests {
    pending: Option<Option<AppState>>,
}

impl StateRequests {
    pub fn take(&mut self) -> Option<Option<AppState>> {
        self.pending.take()
    }
}

impl StateChanger for StateRequests {
    fn set_state(&mut self, state: Option<AppState>) {
        self.pending = Some(state);
    }
}

/// Accumulator turning wall-clock time into whole simulation steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
}

impl FixedTimestep {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / tick_rate_hz.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add elapsed time and return how many ticks to run now.
    /// Long frames are clamped and at most `MAX_SUBSTEPS` ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.min(Duration::from_secs_f64(MAX_FRAME_TIME));

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Victory,
    GameOver,
    Quit,
    /// Tick limit reached while still playing
    TimedOut,
}

/// What happened during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub seed: u64,
    pub ticks: u64,
    pub level: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub levels_completed: u32,
    pub deaths: u32,
    pub player_hp: Option<i32>,
    pub monsters_left: Option<usize>,
    pub sounds_played: u64,
}

/// A level being played on a save
#[derive(Debug)]
struct Session {
    save: ActiveSave,
    controller: ArenaController,
}

pub struct Game {
    settings: Settings,
    saves: SaveManager,
    audio: AudioManager,
    session: Option<Session>,
    requests: StateRequests,
    /// `None` once the game has exited
    state: Option<AppState>,
    menu: Menu,
    seed: u64,
    ticks: u64,
    levels_completed: u32,
    deaths: u32,
    outcome: Option<Outcome>,
}

impl Game {
    /// Start at the main menu
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        let saves = SaveManager::open(&settings.save_dir)?;
        let audio = AudioManager::from_settings(&settings);
        Ok(Self {
            settings,
            saves,
            audio,
            session: None,
            requests: StateRequests::default(),
            state: Some(AppState::Menu(MenuKind::Main)),
            menu: Menu::new(MenuKind::Main),
            seed,
            ticks: 0,
            levels_completed: 0,
            deaths: 0,
            outcome: None,
        })
    }

    pub fn state(&self) -> Option<AppState> {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn saves(&self) -> &SaveManager {
        &self.saves
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn controller(&self) -> Option<&ArenaController> {
        self.session.as_ref().map(|s| &s.controller)
    }

    pub fn controller_mut(&mut self) -> Option<&mut ArenaController> {
        self.session.as_mut().map(|s| &mut s.controller)
    }

    /// Create a save and enter its first level
    pub fn start_new_game(&mut self, difficulty: Difficulty, level: u32) -> Result<()> {
        let data = self.saves.create_new_save_at(difficulty, level)?;
        let save = self.saves.activate(data);
        self.enter_level(save)
    }

    /// Resume the most recent save, or start a new one
    pub fn continue_game(&mut self) -> Result<()> {
        match self.saves.last_open().cloned() {
            Some(data) => {
                let save = self.saves.activate(data);
                self.enter_level(save)
            }
            None => self.start_new_game(self.settings.default_difficulty, 1),
        }
    }

    fn enter_level(&mut self, save: ActiveSave) -> Result<()> {
        let level = save.level();
        let arena = build_arena(level, save.difficulty(), self.seed.wrapping_add(level as u64))?;
        let controller =
            ArenaController::new(arena).with_screen_shake(self.settings.effective_screen_shake());
        self.session = Some(Session { save, controller });
        self.set_state(Some(AppState::Arena));
        Ok(())
    }

    /// Rebuild the current save's level
    fn reload_level(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => self.enter_level(session.save),
            None => self.continue_game(),
        }
    }

    fn set_state(&mut self, state: Option<AppState>) {
        log::info!("State {:?} -> {:?}", self.state, state);
        if let Some(AppState::Menu(kind)) = state {
            self.menu = Menu::new(kind);
        }
        self.state = state;
    }

    /// Run one tick of the active screen. Returns false once exited.
    pub fn step(&mut self, input: &TickInput, renderer: &mut dyn Renderer) -> Result<bool> {
        match self.state {
            None => return Ok(false),
            Some(AppState::Arena) => self.step_arena(input, renderer)?,
            Some(AppState::Menu(_)) => self.step_menu(input, renderer)?,
        }
        self.ticks += 1;
        Ok(self.is_running())
    }

    fn step_arena(&mut self, input: &TickInput, renderer: &mut dyn Renderer) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            // Nothing to play: back to the title screen
            self.set_state(Some(AppState::Menu(MenuKind::Main)));
            return Ok(());
        };

        let mut ctx = TickContext {
            sound: &mut self.audio,
            saves: &mut session.save,
            states: &mut self.requests,
        };
        session.controller.tick(input, &mut ctx);
        draw_arena(session.controller.arena(), renderer);

        if let Some(request) = self.requests.take() {
            self.apply_request(request)?;
        }
        Ok(())
    }

    /// Follow up on a transition requested by the arena
    fn apply_request(&mut self, request: Option<AppState>) -> Result<()> {
        match request {
            Some(AppState::Menu(MenuKind::LevelCompleted)) => {
                self.levels_completed += 1;
                self.sync_save()?;
            }
            Some(AppState::Menu(MenuKind::Victory)) => {
                self.levels_completed += 1;
                self.outcome = Some(Outcome::Victory);
            }
            Some(AppState::Menu(MenuKind::Death)) => self.deaths += 1,
            Some(AppState::Menu(MenuKind::GameOver)) => {
                self.deaths += 1;
                self.outcome = Some(Outcome::GameOver);
                self.sync_save()?;
            }
            _ => {}
        }
        self.set_state(request);
        Ok(())
    }

    /// Refresh the manager's view of the active save
    fn sync_save(&mut self) -> Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        let data = session.save.data().clone();
        if session.save.is_deleted() {
            self.saves.delete_save(data.id)?;
        } else {
            self.saves.store(&data)?;
        }
        Ok(())
    }

    fn step_menu(&mut self, input: &TickInput, renderer: &mut dyn Renderer) -> Result<()> {
        let chosen = match input.action {
            Some(Action::Quit) => Some(MenuOption::Quit),
            Some(Action::Esc) if self.menu.kind == MenuKind::Pause => Some(MenuOption::Resume),
            Some(action) => self.menu.handle(action),
            // Demo mode takes the default choice
            None if input.autopilot => self.menu.selected(),
            None => None,
        };
        renderer.draw_menu(&self.menu);

        if let Some(option) = chosen {
            self.audio.play(SoundEffect::MenuSelect);
            self.choose(option)?;
        }
        Ok(())
    }

    fn choose(&mut self, option: MenuOption) -> Result<()> {
        log::debug!("Menu {:?}: {:?}", self.menu.kind, option);
        match option {
            MenuOption::Continue => self.continue_game(),
            MenuOption::NewGame => self.start_new_game(self.settings.default_difficulty, 1),
            MenuOption::Resume => {
                if self.session.is_some() {
                    self.set_state(Some(AppState::Arena));
                }
                Ok(())
            }
            MenuOption::NextLevel | MenuOption::Retry => self.reload_level(),
            MenuOption::MainMenu => {
                self.session = None;
                self.set_state(Some(AppState::Menu(MenuKind::Main)));
                Ok(())
            }
            MenuOption::Quit => {
                self.set_state(None);
                Ok(())
            }
        }
    }

    /// Step until the game exits or `max_ticks` ticks have run
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        max_ticks: Option<u64>,
    ) -> Result<RunSummary> {
        while self.is_running() && max_ticks.is_none_or(|max| self.ticks < max) {
            let tick_input = input.poll();
            self.step(&tick_input, renderer)?;
        }
        Ok(self.summary())
    }

    /// Entities of the level being played, if any
    pub fn snapshot(&self) -> Option<ArenaSnapshot> {
        self.controller().map(|c| c.arena().snapshot())
    }

    pub fn summary(&self) -> RunSummary {
        let outcome = match (self.state, self.outcome) {
            (None, Some(outcome)) => outcome,
            (None, None) => Outcome::Quit,
            (Some(_), _) => Outcome::TimedOut,
        };
        let arena = self.controller().map(|c| c.arena());
        RunSummary {
            outcome,
            seed: self.seed,
            ticks: self.ticks,
            level: self.session.as_ref().map(|s| s.save.level()),
            difficulty: self.session.as_ref().map(|s| s.save.difficulty()),
            levels_completed: self.levels_completed,
            deaths: self.deaths,
            player_hp: arena.and_then(|a| a.player.as_ref()).map(|p| p.hp()),
            monsters_left: arena.map(|a| a.monsters.len()),
            sounds_played: self.audio.played(),
        }
    }
}
