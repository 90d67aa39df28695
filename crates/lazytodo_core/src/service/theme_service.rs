//! Theme preference use-cases.
//!
//! # Responsibility
//! - Resolve the theme to apply from the stored choice and the OS signal.
//! - Persist explicit user choices.
//!
//! # Invariants
//! - An explicit stored choice always wins over the OS preference.
//! - OS preference changes apply only while no explicit choice is stored.

use crate::model::theme::{Theme, ThemePreference};
use crate::repo::kv_store::{KeyValueStore, RepoError};
use crate::repo::todo_repo::{load_theme_preference, save_theme_preference};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ThemeError {
    Repo(RepoError),
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ThemeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ThemeError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Theme facade over a key-value store.
pub struct ThemeService<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> ThemeService<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Explicit choice stored by an earlier toggle, if any.
    pub fn stored_preference(&self) -> Result<ThemePreference, ThemeError> {
        Ok(load_theme_preference(&self.kv)?)
    }

    /// Theme to apply at startup.
    pub fn resolve(&self, system_prefers_dark: bool) -> Result<Theme, ThemeError> {
        let theme = match self.stored_preference()? {
            Some(is_dark) => Theme::from_dark(is_dark),
            None => Theme::from_dark(system_prefers_dark),
        };
        Ok(theme)
    }

    /// Switches away from `current` and records it as the explicit choice.
    pub fn toggle(&self, current: Theme) -> Result<Theme, ThemeError> {
        let next = current.toggled();
        if let Err(err) = save_theme_preference(&self.kv, next.is_dark()) {
            error!(
                "event=theme_toggle module=theme status=error error_code=write_failed error={}",
                err
            );
            return Err(err.into());
        }
        info!("event=theme_toggle module=theme status=ok theme={next}");
        Ok(next)
    }

    /// Reacts to an OS color-scheme change.
    ///
    /// Returns the theme to apply, or `None` when an explicit choice is stored.
    pub fn on_system_change(&self, prefers_dark: bool) -> Result<Option<Theme>, ThemeError> {
        if self.stored_preference()?.is_some() {
            return Ok(None);
        }
        Ok(Some(Theme::from_dark(prefers_dark)))
    }
}
