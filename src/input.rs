// Keyboard input translation

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, ModifiersState, NamedKey};

pub const SPACE: char = ' ';
pub const ESCAPE: char = '\u{1b}';

/// A discrete key press: one character plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: char,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyPress {
    pub const fn new(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
        }
    }

    pub const fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub const fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// True when a command modifier is held, which makes the press a
    /// shortcut for something else rather than a viewer control.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt
    }
}

impl From<char> for KeyPress {
    fn from(key: char) -> Self {
        Self::new(key)
    }
}

/// Turn a winit key event into a [`KeyPress`].
///
/// Only presses produce a value (auto-repeat included). Characters are
/// lowercased so Shift and Caps Lock do not change the meaning of a key.
pub fn key_press(event: &KeyEvent, modifiers: ModifiersState) -> Option<KeyPress> {
    press_from(event.state, &event.logical_key, modifiers)
}

fn press_from(state: ElementState, key: &Key, modifiers: ModifiersState) -> Option<KeyPress> {
    if state != ElementState::Pressed {
        return None;
    }
    let key = key_char(key)?;
    Some(KeyPress {
        key,
        ctrl: modifiers.control_key(),
        alt: modifiers.alt_key(),
    })
}

/// The viewer character for a logical key, if it has one.
fn key_char(key: &Key) -> Option<char> {
    match key {
        Key::Named(NamedKey::Space) => Some(SPACE),
        Key::Named(NamedKey::Escape) => Some(ESCAPE),
        Key::Character(text) => text.chars().next().map(|c| c.to_ascii_lowercase()),
        _ => None,
    }
}
