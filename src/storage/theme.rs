use super::kv::{KeyValueStore, StorageError};
use crate::theme::Theme;
use std::sync::Arc;

/// Storage key holding `"light"` or `"dark"`.
pub const THEME_KEY: &str = "theme";

/// Persisted light/dark preference.
pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
    theme: Theme,
}

impl ThemeStore {
    /// Load the stored preference.
    ///
    /// With nothing stored (or an unrecognised value), `system_prefers_dark`
    /// decides; with no signal either, the theme is light. The resolved value
    /// is written back so the next start is stable.
    pub fn init(
        store: Arc<dyn KeyValueStore>,
        system_prefers_dark: Option<bool>,
    ) -> Result<Self, StorageError> {
        let stored = store.get(THEME_KEY)?;
        let theme = match stored.as_deref().and_then(Theme::from_str_name) {
            Some(theme) => theme,
            None => {
                if let Some(raw) = &stored {
                    tracing::warn!(value = %raw, "Ignoring unrecognised stored theme");
                }
                let theme = if system_prefers_dark == Some(true) {
                    Theme::Dark
                } else {
                    Theme::Light
                };
                tracing::debug!(theme = %theme, ?system_prefers_dark, "No stored theme, using system default");
                store.set(THEME_KEY, theme.as_str())?;
                theme
            }
        };
        Ok(Self { store, theme })
    }

    pub fn get(&self) -> Theme {
        self.theme
    }

    /// Change and persist the preference.
    pub fn set(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, theme.as_str())?;
        tracing::info!(theme = %theme, "Theme changed");
        self.theme = theme;
        Ok(())
    }

    /// Switch to the other theme and return it.
    pub fn toggle(&mut self) -> Result<Theme, StorageError> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}
