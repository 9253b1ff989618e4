//! Player input as seen by the simulation
//!
//! A platform layer maps keys to [`Action`]s; each tick receives the single
//! action pressed this tick plus the set of actions currently held.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
    /// Switch to the weapon in the given slot
    SelectWeapon(usize),
    Reload,
    /// Confirm (menus)
    Exec,
    Esc,
    Quit,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Action newly pressed this tick
    pub action: Option<Action>,
    /// Actions held down
    pub active: HashSet<Action>,
    /// Demo mode - the autopilot plays the game
    pub autopilot: bool,
}

impl TickInput {
    pub fn with_action(action: Action) -> Self {
        Self {
            action: Some(action),
            ..Default::default()
        }
    }

    pub fn holding(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            active: actions.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn autopilot() -> Self {
        Self {
            autopilot: true,
            ..Default::default()
        }
    }

    pub fn is_active(&self, action: Action) -> bool {
        self.active.contains(&action)
    }
}

/// Source of per-tick input
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Replays queued inputs, then falls back to a default input forever
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<TickInput>,
    fallback: TickInput,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
            fallback: TickInput::default(),
        }
    }

    /// Endless autopilot
    pub fn autopilot() -> Self {
        Self {
            queue: VecDeque::new(),
            fallback: TickInput::autopilot(),
        }
    }

    pub fn push(&mut self, input: TickInput) {
        self.queue.push_back(input);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_falls_back() {
        let mut input = ScriptedInput::new([TickInput::with_action(Action::Reload)]);
        assert_eq!(input.poll().action, Some(Action::Reload));
        assert_eq!(input.poll(), TickInput::default());
        assert_eq!(input.poll(), TickInput::default());
    }

    #[test]
    fn test_holding() {
        let input = TickInput::holding([Action::MoveLeft, Action::LookUp]);
        assert!(input.is_active(Action::MoveLeft));
        assert!(input.is_active(Action::LookUp));
        assert!(!input.is_active(Action::MoveRight));
        assert_eq!(input.action, None);
    }

    #[test]
    fn test_autopilot_source() {
        let mut input = ScriptedInput::autopilot();
        assert!(input.poll().autopilot);
    }
}
