//! Menu screens: option lists with wrap-around selection

use serde::{Deserialize, Serialize};

use crate::input::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuKind {
    Main,
    Pause,
    LevelCompleted,
    Victory,
    /// Died on a difficulty that allows retrying
    Death,
    /// Died with permanent death: the save is gone
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuOption {
    Continue,
    NewGame,
    Resume,
    NextLevel,
    Retry,
    MainMenu,
    Quit,
}

impl MenuOption {
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Continue => "Continue",
            MenuOption::NewGame => "New game",
            MenuOption::Resume => "Resume",
            MenuOption::NextLevel => "Next level",
            MenuOption::Retry => "Retry",
            MenuOption::MainMenu => "Main menu",
            MenuOption::Quit => "Quit",
        }
    }
}

impl MenuKind {
    /// Options in display order, the default choice first
    pub fn options(self) -> Vec<MenuOption> {
        use MenuOption::*;
        match self {
            MenuKind::Main => vec![Continue, NewGame, Quit],
            MenuKind::Pause => vec![Resume, MainMenu, Quit],
            MenuKind::LevelCompleted => vec![NextLevel, MainMenu],
            MenuKind::Victory => vec![Quit, MainMenu],
            MenuKind::Death => vec![Retry, MainMenu],
            MenuKind::GameOver => vec![Quit, MainMenu],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MenuKind::Main => "Tenebris",
            MenuKind::Pause => "Paused",
            MenuKind::LevelCompleted => "Level complete",
            MenuKind::Victory => "Victory",
            MenuKind::Death => "You died",
            MenuKind::GameOver => "Game over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub kind: MenuKind,
    options: Vec<MenuOption>,
    selected: usize,
}

impl Menu {
    pub fn new(kind: MenuKind) -> Self {
        Self::with_options(kind, kind.options())
    }

    pub fn with_options(kind: MenuKind, options: Vec<MenuOption>) -> Self {
        Self {
            kind,
            options,
            selected: 0,
        }
    }

    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<MenuOption> {
        self.options.get(self.selected).copied()
    }

    pub fn next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        }
    }

    /// Navigate with up/down, confirm with exec. Returns the confirmed option.
    pub fn handle(&mut self, action: Action) -> Option<MenuOption> {
        match action {
            Action::MoveUp | Action::LookUp => self.previous(),
            Action::MoveDown | Action::LookDown => self.next(),
            Action::Exec => return self.selected(),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps() {
        let mut menu = Menu::new(MenuKind::Main);
        assert_eq!(menu.selected(), Some(MenuOption::Continue));
        menu.previous();
        assert_eq!(menu.selected(), Some(MenuOption::Quit));
        menu.next();
        menu.next();
        assert_eq!(menu.selected(), Some(MenuOption::NewGame));
    }

    #[test]
    fn test_empty_menu_is_safe() {
        let mut menu = Menu::with_options(MenuKind::Main, Vec::new());
        menu.next();
        menu.previous();
        assert_eq!(menu.selected_index(), 0);
        assert_eq!(menu.selected(), None);
        assert_eq!(menu.handle(Action::Exec), None);
    }

    #[test]
    fn test_handle_confirms_selection() {
        let mut menu = Menu::new(MenuKind::Pause);
        assert_eq!(menu.handle(Action::MoveDown), None);
        assert_eq!(menu.handle(Action::Exec), Some(MenuOption::MainMenu));
    }
}
