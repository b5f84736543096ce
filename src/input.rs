use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const BACKSPACE: &str = "Backspace";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Shift alone still produces a printable character.
    pub fn blocks_input(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Raw key press as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub modifiers: Modifiers,
}

/// What a raw key means to the typing cores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Char(char),
    Backspace,
    Ignored,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(c.to_string())
    }

    pub fn backspace() -> Self {
        Self::new(BACKSPACE)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn action(&self) -> KeyAction {
        if self.modifiers.blocks_input() {
            return KeyAction::Ignored;
        }
        if self.key == BACKSPACE {
            return KeyAction::Backspace;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => KeyAction::Char(c),
            _ => KeyAction::Ignored,
        }
    }
}

impl From<char> for KeyInput {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

impl From<&str> for KeyInput {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<KeyEvent> for KeyInput {
    fn from(event: KeyEvent) -> Self {
        let modifiers = Modifiers {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
            meta: event.modifiers.contains(KeyModifiers::SUPER)
                || event.modifiers.contains(KeyModifiers::META),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
        };
        let key = match event.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Backspace => BACKSPACE.to_string(),
            other => format!("{other:?}"),
        };
        Self { key, modifiers }
    }
}

/// Splits a string into one key press per character
pub fn keys_for(text: &str) -> Vec<KeyInput> {
    text.chars().map(KeyInput::char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_single_char_is_judged() {
        assert_eq!(KeyInput::char('a').action(), KeyAction::Char('a'));
        assert_eq!(KeyInput::char(' ').action(), KeyAction::Char(' '));
        assert_eq!(KeyInput::char('Ä').action(), KeyAction::Char('Ä'));
    }

    #[test]
    fn backspace_is_recognised() {
        assert_eq!(KeyInput::backspace().action(), KeyAction::Backspace);
    }

    #[test]
    fn multi_character_names_are_ignored() {
        assert_eq!(KeyInput::new("Shift").action(), KeyAction::Ignored);
        assert_eq!(KeyInput::new("ArrowLeft").action(), KeyAction::Ignored);
        assert_eq!(KeyInput::new("").action(), KeyAction::Ignored);
    }

    #[test]
    fn modifier_combinations_are_ignored() {
        for modifiers in [
            Modifiers {
                ctrl: true,
                ..Default::default()
            },
            Modifiers {
                alt: true,
                ..Default::default()
            },
            Modifiers {
                meta: true,
                ..Default::default()
            },
        ] {
            let key = KeyInput::char('c').with_modifiers(modifiers);
            assert_eq!(key.action(), KeyAction::Ignored);
        }
        let ctrl_backspace = KeyInput::backspace().with_modifiers(Modifiers {
            ctrl: true,
            ..Default::default()
        });
        assert_eq!(ctrl_backspace.action(), KeyAction::Ignored);
    }

    #[test]
    fn shift_does_not_block_input() {
        let key = KeyInput::char('A').with_modifiers(Modifiers {
            shift: true,
            ..Default::default()
        });
        assert_eq!(key.action(), KeyAction::Char('A'));
    }

    #[test]
    fn crossterm_events_convert() {
        let event = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(KeyInput::from(event).action(), KeyAction::Char('x'));

        let event = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(KeyInput::from(event).action(), KeyAction::Backspace);

        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyInput::from(event).action(), KeyAction::Ignored);

        let event = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyInput::from(event).action(), KeyAction::Ignored);
    }
}
