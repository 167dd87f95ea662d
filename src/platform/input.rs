//! Keyboard and on-screen button mapping into the held-key state

use crate::sim::TickInput;

/// The eight movement keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    S,
    A,
    D,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "w" | "W" => Some(Key::W),
            "s" | "S" => Some(Key::S),
            "a" | "A" => Some(Key::A),
            "d" | "D" => Some(Key::D),
            _ => None,
        }
    }

    /// Map an on-screen touch button id
    pub fn from_button_id(id: &str) -> Option<Self> {
        match id {
            "btn-up" => Some(Key::ArrowUp),
            "btn-down" => Some(Key::ArrowDown),
            "btn-left" => Some(Key::ArrowLeft),
            "btn-right" => Some(Key::ArrowRight),
            _ => None,
        }
    }
}

/// One-shot commands outside the held-key state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Space on the result screens: back to the title
    Restart,
}

impl Action {
    /// Map a `KeyboardEvent.code` value
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Action::Restart),
            _ => None,
        }
    }
}

impl TickInput {
    /// Press or release a key
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        let flag = match key {
            Key::ArrowUp => &mut self.arrow_up,
            Key::ArrowDown => &mut self.arrow_down,
            Key::ArrowLeft => &mut self.arrow_left,
            Key::ArrowRight => &mut self.arrow_right,
            Key::W => &mut self.w,
            Key::S => &mut self.s,
            Key::A => &mut self.a,
            Key::D => &mut self.d,
        };
        *flag = pressed;
    }

    /// Release everything (focus lost)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}
