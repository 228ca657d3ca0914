use std::time::Duration;

/// Top-level input event: keyboard or resize
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    Key(InputEvent),
    Resize,
}

/// Key codes the trainer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
}

/// Modifier key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const fn none() -> Self {
        Self { ctrl: false, alt: false }
    }
}

/// Input event from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl InputEvent {
    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::none())
    }

    /// Check if this is a specific character without modifiers
    pub fn is_char(&self, ch: char) -> bool {
        matches!(self.key, KeyCode::Char(c) if c == ch)
            && !self.modifiers.ctrl
            && !self.modifiers.alt
    }

    /// Digit keys `1`..=`9` as a zero-based slot.
    pub fn digit_slot(&self) -> Option<usize> {
        match self.key {
            KeyCode::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => {
                c.to_digit(10).filter(|d| *d > 0).map(|d| d as usize - 1)
            }
            _ => None,
        }
    }
}

/// Trait for reading input events
pub trait InputSource {
    /// Poll for an input event with a timeout
    /// Returns None if no event is available within the timeout
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: Modifiers = Modifiers { ctrl: true, alt: false };

    #[test]
    fn digit_slots_are_zero_based() {
        assert_eq!(InputEvent::key(KeyCode::Char('1')).digit_slot(), Some(0));
        assert_eq!(InputEvent::key(KeyCode::Char('7')).digit_slot(), Some(6));
        assert_eq!(InputEvent::key(KeyCode::Char('0')).digit_slot(), None);
        assert_eq!(InputEvent::key(KeyCode::Char('x')).digit_slot(), None);
        assert_eq!(InputEvent::new(KeyCode::Char('2'), CTRL).digit_slot(), None);
    }

    #[test]
    fn is_char_ignores_ctrl_chords() {
        assert!(InputEvent::key(KeyCode::Char('q')).is_char('q'));
        assert!(!InputEvent::new(KeyCode::Char('q'), CTRL).is_char('q'));
    }
}
