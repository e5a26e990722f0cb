//! Dark/light theme resolution, application and persistence.
//!
//! The active mode is resolved once at startup from the stored preference,
//! then the OS colour scheme, then Dark. Afterwards it only changes through
//! [`ThemeController::toggle_theme`] (or an explicit [`ThemeController::apply_theme`]).
//! Storage failures are logged and otherwise ignored; the in-memory mode
//! stays authoritative.

use crate::palette::Palette;
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Key under which the mode string is persisted
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme {0:?}, expected \"dark\" or \"light\"")]
pub struct ParseThemeError(String);

impl FromStr for ThemeMode {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

/// Source of the operating system's colour-scheme preference
pub trait ColorSchemeProbe {
    /// `Some(true)` when the OS prefers dark, `None` when it cannot tell
    fn prefers_dark(&self) -> Option<bool>;
}

impl ColorSchemeProbe for Option<bool> {
    fn prefers_dark(&self) -> Option<bool> {
        *self
    }
}

impl<T: ColorSchemeProbe + ?Sized> ColorSchemeProbe for Box<T> {
    fn prefers_dark(&self) -> Option<bool> {
        (**self).prefers_dark()
    }
}

/// Desktop colour-scheme detection
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemColorScheme;

impl ColorSchemeProbe for SystemColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        match dark_light::detect() {
            dark_light::Mode::Dark => Some(true),
            dark_light::Mode::Light => Some(false),
            dark_light::Mode::Default => None,
        }
    }
}

/// Theme markers set on the root of the rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRoot {
    markers: BTreeSet<&'static str>,
}

impl DocumentRoot {
    pub fn has(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn markers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.markers.iter().copied()
    }

    fn set_mode(&mut self, mode: ThemeMode) {
        self.markers.remove(mode.toggle().as_str());
        self.markers.insert(mode.as_str());
    }
}

/// Stored value, then OS preference, then Dark.
///
/// Unreadable storage and unrecognised stored values count as absent.
pub fn resolve_initial_theme<S, P>(store: &S, probe: &P) -> ThemeMode
where
    S: KeyValueStore + ?Sized,
    P: ColorSchemeProbe + ?Sized,
{
    match store.get(THEME_KEY) {
        Ok(Some(stored)) => match stored.parse::<ThemeMode>() {
            Ok(mode) => {
                tracing::debug!("using stored theme {}", mode);
                return mode;
            }
            Err(e) => tracing::warn!("ignoring stored theme: {}", e),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!("theme storage unavailable, using defaults: {}", e),
    }

    match probe.prefers_dark() {
        Some(true) => ThemeMode::Dark,
        Some(false) => ThemeMode::Light,
        None => ThemeMode::Dark,
    }
}

/// Owns the active theme, the document markers and the preference store
pub struct ThemeController<S> {
    store: S,
    mode: ThemeMode,
    root: DocumentRoot,
}

impl<S: KeyValueStore> ThemeController<S> {
    /// Resolves the initial mode and applies it once. The OS preference is
    /// only consulted here; afterwards the stored value is authoritative.
    pub fn new<P: ColorSchemeProbe + ?Sized>(store: S, probe: &P) -> Self {
        let mode = resolve_initial_theme(&store, probe);
        let mut controller = ThemeController {
            store,
            mode,
            root: DocumentRoot::default(),
        };
        controller.apply_theme(mode);
        controller
    }

    /// Marks the document root and persists the mode; safe to repeat
    pub fn apply_theme(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.root.set_mode(mode);
        if let Err(e) = self.store.set(THEME_KEY, mode.as_str()) {
            tracing::warn!("could not persist theme {}: {}", mode, e);
        }
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        let next = self.mode.toggle();
        self.apply_theme(next);
        tracing::info!("theme switched to {}", next);
        next
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn root(&self) -> &DocumentRoot {
        &self.root
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
