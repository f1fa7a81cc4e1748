use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Light or dark page theme. Light is assumed whenever nothing was stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Plotly template matching this theme.
    pub fn chart_template(self) -> &'static str {
        match self {
            ThemePreference::Light => "plotly_white",
            ThemePreference::Dark => "plotly_dark",
        }
    }

    /// Icon shown on the toggle: the sun offers a way out of dark mode.
    pub fn icon_class(self) -> &'static str {
        match self {
            ThemePreference::Light => "fas fa-moon",
            ThemePreference::Dark => "fas fa-sun",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(format!("unknown theme `{other}`")),
        }
    }
}

/// Durable key/value storage, `window.localStorage` in the browser.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store used off the browser and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The active theme, seeded from storage and written back on every change.
pub struct ThemeStore<S> {
    store: S,
    key: String,
    current: ThemePreference,
}

impl<S: PreferenceStore> ThemeStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = load(&store, &key);
        Self {
            store,
            key,
            current,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.current
    }

    /// Switch themes. A store that refuses the write only loses persistence.
    pub fn set_preference(&mut self, theme: ThemePreference) {
        self.current = theme;
        if let Err(err) = self.store.set(&self.key, theme.as_str()) {
            log::warn!("theme preference not persisted: {err}");
        }
    }

    pub fn toggle(&mut self) -> ThemePreference {
        let next = self.current.toggled();
        self.set_preference(next);
        next
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

/// Unset, unreadable or unknown values read as light.
fn load<S: PreferenceStore>(store: &S, key: &str) -> ThemePreference {
    match store.get(key) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
            log::warn!("ignoring stored theme: {err}");
            ThemePreference::default()
        }),
        Ok(None) => ThemePreference::default(),
        Err(err) => {
            log::warn!("theme preference unreadable: {err}");
            ThemePreference::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::BrokenStore;

    #[test]
    fn unset_preference_is_light() {
        let store = ThemeStore::new(MemoryStore::new(), "theme");
        assert_eq!(store.preference(), ThemePreference::Light);
    }

    #[test]
    fn preference_round_trips_through_storage() {
        let mut store = ThemeStore::new(MemoryStore::new(), "theme");
        for theme in [ThemePreference::Dark, ThemePreference::Light] {
            store.set_preference(theme);
            assert_eq!(store.preference(), theme);
        }
        assert_eq!(store.store().get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn garbage_in_storage_reads_as_light() {
        let mut mem = MemoryStore::new();
        mem.set("theme", "sepia").unwrap();
        assert_eq!(ThemeStore::new(mem, "theme").preference(), ThemePreference::Light);
    }

    #[test]
    fn failing_storage_still_tracks_the_active_theme() {
        let mut broken = ThemeStore::new(BrokenStore, "theme");
        assert_eq!(broken.preference(), ThemePreference::Light);
        broken.set_preference(ThemePreference::Dark);
        assert_eq!(broken.preference(), ThemePreference::Dark);
        assert_eq!(broken.toggle(), ThemePreference::Light);
        assert_eq!(broken.toggle(), ThemePreference::Dark);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut store = ThemeStore::new(MemoryStore::new(), "theme");
        assert_eq!(store.toggle(), ThemePreference::Dark);
        assert_eq!(store.toggle(), ThemePreference::Light);
        assert_eq!(ThemePreference::Dark.chart_template(), "plotly_dark");
        assert_eq!(ThemePreference::Dark.icon_class(), "fas fa-sun");
    }
}
