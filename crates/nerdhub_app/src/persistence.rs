use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use hub_logging::{hub_info, hub_warn};
use nerdhub_client::StateFile;
use nerdhub_core::ViewPreferences;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedPrefs {
    entries: BTreeMap<String, String>,
}

/// Missing or unreadable files yield the defaults.
pub(crate) fn load_preferences(path: &Path) -> ViewPreferences {
    let content = match StateFile::new(path).read() {
        Ok(Some(text)) => text,
        Ok(None) => return ViewPreferences::default(),
        Err(err) => {
            hub_warn!("Failed to read preferences from {:?}: {}", path, err);
            return ViewPreferences::default();
        }
    };

    match ron::from_str::<PersistedPrefs>(&content) {
        Ok(prefs) => {
            hub_info!("Loaded preferences from {:?}", path);
            ViewPreferences::from_entries(&prefs.entries)
        }
        Err(err) => {
            hub_warn!("Failed to parse preferences from {:?}: {}", path, err);
            ViewPreferences::default()
        }
    }
}

pub(crate) fn save_preferences(path: &Path, prefs: &ViewPreferences) -> Result<()> {
    let state = PersistedPrefs {
        entries: prefs.to_entries(),
    };
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(&state, pretty).context("Failed to serialize preferences")?;
    StateFile::new(path)
        .write(&content)
        .with_context(|| format!("Failed to write preferences to {}", path.display()))?;
    hub_info!("Saved preferences to {:?}", path);
    Ok(())
}

/// Returns whether anything was removed.
pub(crate) fn reset_preferences(path: &Path) -> Result<bool> {
    StateFile::new(path)
        .remove()
        .with_context(|| format!("Failed to remove {}", path.display()))
}
