use std::fmt;

/// Keys the presentation core reacts to, independent of the windowing
/// toolkit. Letters are stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Char(char),
}

impl Key {
    pub fn char(c: char) -> Self {
        Self::Char(c.to_ascii_lowercase())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArrowUp => f.write_str("\u{2191}"),
            Self::ArrowDown => f.write_str("\u{2193}"),
            Self::ArrowLeft => f.write_str("\u{2190}"),
            Self::ArrowRight => f.write_str("\u{2192}"),
            Self::Escape => f.write_str("Esc"),
            Self::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextSlide,
    PreviousSlide,
    /// Dismiss the open modal.
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(Key, Command)>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            bindings: vec![
                (Key::ArrowDown, Command::NextSlide),
                (Key::Char('n'), Command::NextSlide),
                (Key::ArrowUp, Command::PreviousSlide),
                (Key::Char('p'), Command::PreviousSlide),
                (Key::Escape, Command::Cancel),
            ],
        }
    }
}

impl Keymap {
    pub fn command(&self, key: Key) -> Option<Command> {
        let key = match key {
            Key::Char(c) => Key::char(c),
            other => other,
        };
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, command)| *command)
    }

    /// Keys bound to `command`, in binding order.
    pub fn keys_for(&self, command: Command) -> impl Iterator<Item = Key> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, c)| *c == command)
            .map(|(key, _)| *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keymap = Keymap::default();
        assert_eq!(keymap.command(Key::ArrowDown), Some(Command::NextSlide));
        assert_eq!(keymap.command(Key::Char('N')), Some(Command::NextSlide));
        assert_eq!(keymap.command(Key::char('p')), Some(Command::PreviousSlide));
        assert_eq!(keymap.command(Key::Escape), Some(Command::Cancel));
        assert_eq!(keymap.command(Key::ArrowLeft), None);
        assert_eq!(keymap.command(Key::Char('x')), None);
    }

    #[test]
    fn test_keys_for_command() {
        let keymap = Keymap::default();
        let keys: Vec<_> = keymap.keys_for(Command::PreviousSlide).collect();
        assert_eq!(keys, vec![Key::ArrowUp, Key::Char('p')]);
    }

    #[test]
    fn test_key_labels() {
        assert_eq!(Key::char('n').to_string(), "N");
        assert_eq!(Key::Escape.to_string(), "Esc");
    }
}
