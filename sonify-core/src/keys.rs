/// A key press with its modifier state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleTheme,
    Export,
    DismissMenu,
}

impl Shortcut {
    pub fn prevents_default(self) -> bool {
        !matches!(self, Shortcut::DismissMenu)
    }
}

pub fn route(chord: &KeyChord) -> Option<Shortcut> {
    match chord.key.as_str() {
        "k" if chord.command() => Some(Shortcut::ToggleTheme),
        "e" if chord.command() => Some(Shortcut::Export),
        "Escape" if !chord.command() => Some(Shortcut::DismissMenu),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_shortcuts() {
        assert_eq!(route(&KeyChord::new("k").with_ctrl()), Some(Shortcut::ToggleTheme));
        assert_eq!(route(&KeyChord::new("k").with_meta()), Some(Shortcut::ToggleTheme));
        assert_eq!(route(&KeyChord::new("e").with_ctrl()), Some(Shortcut::Export));
        assert_eq!(route(&KeyChord::new("k")), None);
        assert_eq!(route(&KeyChord::new("x").with_ctrl()), None);
        assert!(Shortcut::Export.prevents_default());
    }

    #[test]
    fn escape_only_unmodified() {
        assert_eq!(route(&KeyChord::new("Escape")), Some(Shortcut::DismissMenu));
        assert_eq!(route(&KeyChord::new("Escape").with_ctrl()), None);
        assert!(!Shortcut::DismissMenu.prevents_default());
    }
}
