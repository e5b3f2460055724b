use super::storage::{keys, KeyValueStore};
use crate::types::Theme;

/// Stored theme, light when nothing valid is stored
pub fn current_theme(storage: &dyn KeyValueStore) -> Theme {
    storage
        .get(keys::THEME)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

pub fn set_theme(storage: &dyn KeyValueStore, theme: Theme) -> Theme {
    if let Err(e) = storage.set(keys::THEME, theme.as_str()) {
        tracing::warn!("Failed to persist theme: {}", e);
    }
    theme
}

pub fn toggle_theme(storage: &dyn KeyValueStore) -> Theme {
    set_theme(storage, current_theme(storage).toggled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStore;

    #[test]
    fn defaults_to_light_and_toggles() {
        let store = MemoryStore::new();
        assert_eq!(current_theme(&store), Theme::Light);
        assert_eq!(toggle_theme(&store), Theme::Dark);
        assert_eq!(current_theme(&store), Theme::Dark);
        assert_eq!(toggle_theme(&store), Theme::Light);
    }

    #[test]
    fn ignores_unknown_values() {
        let store = MemoryStore::new();
        store.set(keys::THEME, "sepia").unwrap();
        assert_eq!(current_theme(&store), Theme::Light);
    }
}
