//! Keyboard bindings for the review session.
//!
//! Front ends translate their native key events into [`Key`] and resolve
//! them here, so the bindings are the same whatever terminal library reads
//! the keyboard.

use std::collections::HashMap;

use crate::session::{Direction, SessionCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Enter,
    Esc,
}

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Session(SessionCommand),
    /// Prompt for a new search string
    EditSearch,
    CycleSort,
    ToggleConnected,
    Quit,
}

#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, InputAction>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(
            Key::Char('a'),
            InputAction::Session(SessionCommand::Approve { custom_name: None }),
        );
        map.bind(Key::Char('r'), InputAction::Session(SessionCommand::Reject));
        map.bind(Key::Char('s'), InputAction::Session(SessionCommand::Skip));
        map.bind(
            Key::Char('k'),
            InputAction::Session(SessionCommand::Navigate(Direction::Up)),
        );
        map.bind(
            Key::Up,
            InputAction::Session(SessionCommand::Navigate(Direction::Up)),
        );
        map.bind(
            Key::Char('j'),
            InputAction::Session(SessionCommand::Navigate(Direction::Down)),
        );
        map.bind(
            Key::Down,
            InputAction::Session(SessionCommand::Navigate(Direction::Down)),
        );
        map.bind(Key::Enter, InputAction::Session(SessionCommand::RefreshDetail));
        map.bind(Key::Char('g'), InputAction::Session(SessionCommand::Reload));
        map.bind(Key::Char('/'), InputAction::EditSearch);
        map.bind(Key::Char('o'), InputAction::CycleSort);
        map.bind(Key::Char('c'), InputAction::ToggleConnected);
        map.bind(Key::Char('q'), InputAction::Quit);
        map.bind(Key::Esc, InputAction::Quit);
        map
    }
}

impl KeyMap {
    /// A map with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key`, replacing any previous binding.
    pub fn bind(&mut self, key: Key, action: InputAction) -> &mut Self {
        self.bindings.insert(key, action);
        self
    }

    pub fn unbind(&mut self, key: Key) -> Option<InputAction> {
        self.bindings.remove(&key)
    }

    /// Letter keys match case-insensitively unless the exact case is bound.
    pub fn resolve(&self, key: Key) -> Option<&InputAction> {
        self.bindings.get(&key).or_else(|| match key {
            Key::Char(c) if c.is_ascii_uppercase() => {
                self.bindings.get(&Key::Char(c.to_ascii_lowercase()))
            }
            _ => None,
        })
    }

    /// Keys bound to `action`, sorted for stable help output.
    pub fn keys_for(&self, action: &InputAction) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .bindings
            .iter()
            .filter(|(_, bound)| *bound == action)
            .map(|(key, _)| *key)
            .collect();
        keys.sort_by_key(|key| key.to_string());
        keys
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::Up => write!(f, "↑"),
            Self::Down => write!(f, "↓"),
            Self::Enter => write!(f, "enter"),
            Self::Esc => write!(f, "esc"),
        }
    }
}
