//! Display preferences
//!
//! A single boolean (dark mode) persisted under the `darkMode` key as a
//! serialized JSON boolean. Defaults to dark when unset or unreadable.
//! Persistence failures are logged and ignored.

use super::LocalStorage;

/// Key the display mode is stored under
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Dark,
    Light,
}

impl DisplayMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Owned display preference, read once at startup and passed to the views
#[derive(Debug, Clone)]
pub struct DisplayPreferences {
    storage: LocalStorage,
    dark: bool,
}

impl DisplayPreferences {
    /// Load the stored preference
    pub fn load(storage: LocalStorage) -> Self {
        let dark = read_dark(&storage);
        Self { storage, dark }
    }

    /// Current value (true = dark)
    pub fn read(&self) -> bool {
        self.dark
    }

    pub fn mode(&self) -> DisplayMode {
        DisplayMode::from_dark(self.dark)
    }

    /// Set and persist immediately
    pub fn write(&mut self, dark: bool) {
        self.dark = dark;
        let value = if dark { "true" } else { "false" };
        if let Err(e) = self.storage.set_item(DARK_MODE_KEY, value) {
            tracing::warn!("Failed to persist display preference: {:#}", e);
        }
    }

    /// Negate, persist and return the new value
    pub fn toggle(&mut self) -> bool {
        let next = !self.read();
        self.write(next);
        next
    }
}

fn read_dark(storage: &LocalStorage) -> bool {
    match storage.get_item(DARK_MODE_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
            tracing::debug!("Ignoring malformed {} value {:?}: {}", DARK_MODE_KEY, raw, e);
            true
        }),
        Ok(None) => true,
        Err(e) => {
            tracing::debug!("Display preference unavailable: {:#}", e);
            true
        }
    }
}
