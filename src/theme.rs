//! Light/dark theme selection and persistence.
//!
//! Startup order is: persisted preference, then the OS dark-scheme signal, then
//! light. An explicit user choice always wins over later OS signal changes.
//! Storage failures are logged and never stop the theme from being applied.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::cli::ThemeArgs;
use crate::config::SiteConfig;
use crate::shell::{Shell, ids};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    /// Interprets a persisted value. Only the empty string means "no
    /// preference"; anything other than `dark` selects light.
    fn from_persisted(value: &str) -> Option<Self> {
        match value {
            "" => None,
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            other => {
                tracing::warn!(value = other, "unrecognized persisted theme; using light");
                Some(Self::Light)
            }
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("preference storage is unavailable")]
    Unavailable,
    #[error("preference storage i/o failed: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("preference storage is corrupt: {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encode preferences failed")]
    Encode(#[source] serde_json::Error),
}

/// Key-value preference storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A backend that refuses every read and write, like storage disabled by the
/// host.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl PreferenceStore for DisabledStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Preferences kept as a JSON object in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());

        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&entries).map_err(StorageError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

/// Theme state owned by the controller for one page lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    pub applied: Theme,
    /// An explicit choice that could not be persisted.
    pub unsaved_choice: Option<Theme>,
}

#[derive(Debug, Clone)]
struct ThemeLabels {
    storage_key: String,
    dark_class: String,
    switch_to_light: String,
    switch_to_dark: String,
}

pub struct ThemeController<S> {
    store: S,
    state: ThemeState,
    labels: ThemeLabels,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Resolves the startup theme and applies it to the shell.
    pub fn start(store: S, config: &SiteConfig, prefers_dark: bool, shell: &mut Shell) -> Self {
        let labels = ThemeLabels {
            storage_key: config.storage_key.clone(),
            dark_class: config.dark_class.clone(),
            switch_to_light: config.switch_to_light_label.clone(),
            switch_to_dark: config.switch_to_dark_label.clone(),
        };

        let mut controller = Self {
            store,
            state: ThemeState {
                applied: Theme::Light,
                unsaved_choice: None,
            },
            labels,
        };

        let theme = match controller.saved_theme() {
            Some(theme) => {
                tracing::debug!(%theme, "using persisted theme");
                theme
            }
            None => Theme::from_prefers_dark(prefers_dark),
        };
        controller.apply(theme, shell);
        controller
    }

    pub fn applied(&self) -> Theme {
        self.state.applied
    }

    pub fn state(&self) -> ThemeState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Switches to the opposite theme and tries to persist it.
    pub fn toggle(&mut self, shell: &mut Shell) -> Theme {
        let theme = self.state.applied.opposite();
        self.apply(theme, shell);

        match self.store.set(&self.labels.storage_key, theme.as_str()) {
            Ok(()) => self.state.unsaved_choice = None,
            Err(err) => {
                tracing::warn!(error = %err, "could not save theme preference");
                self.state.unsaved_choice = Some(theme);
            }
        }
        theme
    }

    /// Follows an OS color-scheme change unless the user has chosen a theme.
    ///
    /// Returns the theme applied, or `None` when the explicit choice was kept.
    pub fn on_color_scheme_change(&mut self, prefers_dark: bool, shell: &mut Shell) -> Option<Theme> {
        if self.saved_theme().is_some() || self.state.unsaved_choice.is_some() {
            tracing::debug!(prefers_dark, "explicit theme choice kept");
            return None;
        }
        let theme = Theme::from_prefers_dark(prefers_dark);
        self.apply(theme, shell);
        Some(theme)
    }

    fn saved_theme(&self) -> Option<Theme> {
        match self.store.get(&self.labels.storage_key) {
            Ok(value) => value.as_deref().and_then(Theme::from_persisted),
            Err(err) => {
                tracing::warn!(error = %err, "could not read theme preference");
                None
            }
        }
    }

    fn apply(&mut self, theme: Theme, shell: &mut Shell) {
        self.state.applied = theme;
        let label = match theme {
            Theme::Dark => {
                shell.add_body_class(&self.labels.dark_class);
                &self.labels.switch_to_light
            }
            Theme::Light => {
                shell.remove_body_class(&self.labels.dark_class);
                &self.labels.switch_to_dark
            }
        };
        if let Some(toggle) = shell.require_mut(ids::THEME_TOGGLE) {
            toggle.set_text(label);
        }
    }
}

pub fn show(args: ThemeArgs) -> anyhow::Result<()> {
    let config = SiteConfig::load_or_default(args.config.as_deref().map(Path::new))
        .context("load site config")?;
    let mut shell = Shell::default();
    let controller = ThemeController::start(
        FileStore::new(&args.prefs),
        &config,
        args.prefers_dark,
        &mut shell,
    );
    println!("{}", controller.applied());
    Ok(())
}

pub fn toggle(args: ThemeArgs) -> anyhow::Result<()> {
    let config = SiteConfig::load_or_default(args.config.as_deref().map(Path::new))
        .context("load site config")?;
    let mut shell = Shell::default();
    let mut controller = ThemeController::start(
        FileStore::new(&args.prefs),
        &config,
        args.prefers_dark,
        &mut shell,
    );
    let theme = controller.toggle(&mut shell);
    tracing::info!(%theme, prefs = %args.prefs, "toggled theme");
    println!("{theme}");
    Ok(())
}
