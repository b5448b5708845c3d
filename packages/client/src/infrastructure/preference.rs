//! Preference stores.
//!
//! `FilePreferenceStore` persists the settings as JSON so they survive
//! restarts. `InMemoryPreferenceStore` backs tests and ephemeral sessions.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{NotificationPreference, PreferenceStore},
    error::PreferenceError,
    observable::lock,
};

/// On-disk layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    notifications: NotificationPreference,
    permission_auto_requested: bool,
}

/// JSON file preference store
pub struct FilePreferenceStore {
    path: PathBuf,
    settings: Mutex<PersistedSettings>,
}

impl FilePreferenceStore {
    /// Open the store at `path`. A missing or unreadable file yields the
    /// defaults; it is written on the first change.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = read_settings(&path).unwrap_or_else(|e| {
            tracing::warn!(
                "Using default notification preferences ({}): {}",
                path.display(),
                e
            );
            PersistedSettings::default()
        });
        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, settings: &PersistedSettings) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn read_settings(path: &Path) -> Result<PersistedSettings, PreferenceError> {
    if !path.exists() {
        return Ok(PersistedSettings::default());
    }
    let json = fs::read_to_string(path)?;
    let mut settings: PersistedSettings = serde_json::from_str(&json)?;
    settings.notifications = settings.notifications.normalized();
    Ok(settings)
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> NotificationPreference {
        lock(&self.settings).notifications
    }

    fn store(&self, preference: &NotificationPreference) -> Result<(), PreferenceError> {
        let mut settings = lock(&self.settings);
        let mut updated = *settings;
        updated.notifications = preference.normalized();
        self.persist(&updated)?;
        *settings = updated;
        Ok(())
    }

    fn permission_auto_requested(&self) -> bool {
        lock(&self.settings).permission_auto_requested
    }

    fn mark_permission_auto_requested(&self) -> Result<(), PreferenceError> {
        let mut settings = lock(&self.settings);
        let mut updated = *settings;
        updated.permission_auto_requested = true;
        self.persist(&updated)?;
        *settings = updated;
        Ok(())
    }
}

/// In-memory preference store
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    settings: Mutex<PersistedSettings>,
}

impl InMemoryPreferenceStore {
    pub fn new(preference: NotificationPreference) -> Self {
        Self {
            settings: Mutex::new(PersistedSettings {
                notifications: preference.normalized(),
                permission_auto_requested: false,
            }),
        }
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self) -> NotificationPreference {
        lock(&self.settings).notifications
    }

    fn store(&self, preference: &NotificationPreference) -> Result<(), PreferenceError> {
        lock(&self.settings).notifications = preference.normalized();
        Ok(())
    }

    fn permission_auto_requested(&self) -> bool {
        lock(&self.settings).permission_auto_requested
    }

    fn mark_permission_auto_requested(&self) -> Result<(), PreferenceError> {
        lock(&self.settings).permission_auto_requested = true;
        Ok(())
    }
}
