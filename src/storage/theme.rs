//! Theme preference collaborator
//!
//! Lives beside the timer core, not inside it: the core never reads the
//! theme. Persisted as a bare string under its own key, defaulting to dark
//! when nothing is stored or the stored value is unrecognized.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::kv::KeyValueStore;

pub const APP_THEME_KEY: &str = "appTheme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Load the stored theme, defaulting to dark.
pub async fn load_theme<S: KeyValueStore>(store: &S) -> Theme {
    match store.get(APP_THEME_KEY).await {
        Ok(Some(value)) if value.trim() == "light" => Theme::Light,
        Ok(Some(value)) if value.trim() == "dark" => Theme::Dark,
        Ok(Some(value)) => {
            warn!("Unrecognized stored theme {:?}, defaulting to dark", value);
            Theme::Dark
        }
        Ok(None) => Theme::Dark,
        Err(err) => {
            warn!("Failed to read stored theme, defaulting to dark: {}", err);
            Theme::Dark
        }
    }
}

/// Persist the theme. Fail-soft like every other storage write.
pub async fn save_theme<S: KeyValueStore>(store: &S, theme: Theme) {
    if let Err(err) = store.set(APP_THEME_KEY, theme.as_str()).await {
        error!("Failed to persist theme: {}", err);
    }
}
