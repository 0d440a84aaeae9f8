//! Input boundary
//!
//! The simulation never polls a device. It asks an [`InputSource`] which
//! keys are down once per tick and maps them through [`KeyBindings`].
//! [`KeyboardState`] is the in-memory source used by hosts and tests: the
//! host flips bits as window events arrive, clones share the same state.

use std::cell::Cell;
use std::rc::Rc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ecs::components::PlayerInputComponent;

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// W key
    W,
    /// Space bar
    Space,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
}

bitflags! {
    /// One bit per [`KeyCode`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyFlags: u16 {
        /// A key
        const A = 1 << 0;
        /// D key
        const D = 1 << 1;
        /// W key
        const W = 1 << 2;
        /// Space bar
        const SPACE = 1 << 3;
        /// Left arrow
        const LEFT = 1 << 4;
        /// Right arrow
        const RIGHT = 1 << 5;
        /// Up arrow
        const UP = 1 << 6;
    }
}

impl From<KeyCode> for KeyFlags {
    fn from(key: KeyCode) -> Self {
        match key {
            KeyCode::A => Self::A,
            KeyCode::D => Self::D,
            KeyCode::W => Self::W,
            KeyCode::Space => Self::SPACE,
            KeyCode::Left => Self::LEFT,
            KeyCode::Right => Self::RIGHT,
            KeyCode::Up => Self::UP,
        }
    }
}

/// Raw key-down provider
pub trait InputSource {
    /// Whether `key` is currently held
    fn is_key_down(&self, key: KeyCode) -> bool;
}

/// Source that never reports a key
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn is_key_down(&self, _key: KeyCode) -> bool {
        false
    }
}

/// Shared key-down state
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    keys: Rc<Cell<KeyFlags>>,
}

impl KeyboardState {
    /// Create a state with every key released
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as held
    pub fn press(&self, key: KeyCode) {
        self.set(key, true);
    }

    /// Mark `key` as released
    pub fn release(&self, key: KeyCode) {
        self.set(key, false);
    }

    /// Set the held state of `key`
    pub fn set(&self, key: KeyCode, down: bool) {
        let mut keys = self.keys.get();
        keys.set(KeyFlags::from(key), down);
        self.keys.set(keys);
    }

    /// Release every key
    pub fn release_all(&self) {
        self.keys.set(KeyFlags::empty());
    }

    /// Raw flag set
    pub fn flags(&self) -> KeyFlags {
        self.keys.get()
    }
}

impl InputSource for KeyboardState {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.get().contains(KeyFlags::from(key))
    }
}

/// Which keys drive the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Keys that walk left
    pub left: Vec<KeyCode>,
    /// Keys that walk right
    pub right: Vec<KeyCode>,
    /// Keys that jump
    pub jump: Vec<KeyCode>,
}

impl KeyBindings {
    /// Sample `source` into a player input snapshot
    pub fn sample(&self, source: &dyn InputSource) -> PlayerInputComponent {
        let any_down = |keys: &[KeyCode]| keys.iter().any(|&key| source.is_key_down(key));
        PlayerInputComponent {
            left: any_down(&self.left),
            right: any_down(&self.right),
            jump: any_down(&self.jump),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyCode::A, KeyCode::Left],
            right: vec![KeyCode::D, KeyCode::Right],
            jump: vec![KeyCode::Space],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_clones_share_state() {
        let keyboard = KeyboardState::new();
        let host_side = keyboard.clone();
        host_side.press(KeyCode::Space);
        assert!(keyboard.is_key_down(KeyCode::Space));

        host_side.release(KeyCode::Space);
        assert!(!keyboard.is_key_down(KeyCode::Space));
    }

    #[test]
    fn test_bindings_sample() {
        let keyboard = KeyboardState::new();
        keyboard.press(KeyCode::Left);
        keyboard.press(KeyCode::D);

        let input = KeyBindings::default().sample(&keyboard);
        assert!(input.left && input.right && !input.jump);
        assert!(input.horizontal_cancels());

        keyboard.release_all();
        assert_eq!(KeyBindings::default().sample(&keyboard), PlayerInputComponent::default());
        assert_eq!(KeyBindings::default().sample(&NoInput), PlayerInputComponent::default());
    }
}
