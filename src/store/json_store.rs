use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::prefs::UiPreferences;

const PREFERENCES_FILE: &str = "appearance_settings.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keynav");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing or unreadable files load as the default value.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(file = %path.display(), error = %err, "ignoring corrupt store file");
                T::default()
            }),
            Err(_) => T::default(),
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_preferences(&self) -> UiPreferences {
        self.load(PREFERENCES_FILE)
    }

    pub fn save_preferences(&self, prefs: &UiPreferences) -> Result<()> {
        self.save(PREFERENCES_FILE, prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load_preferences(), UiPreferences::default());
    }

    #[test]
    fn test_round_trip_preferences() {
        let (_dir, store) = make_test_store();
        let prefs = UiPreferences {
            floating_text_enabled: true,
            floating_texts: vec!["nice".into(), "great".into()],
        };
        store.save_preferences(&prefs).unwrap();
        assert_eq!(store.load_preferences(), prefs);
        assert!(!store.file_path("appearance_settings.tmp").exists());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let (_dir, store) = make_test_store();
        fs::write(
            store.file_path(PREFERENCES_FILE),
            r##"{"floating_text_enabled": true, "theme_color": "#333", "font_size": 14}"##,
        )
        .unwrap();
        let prefs = store.load_preferences();
        assert!(prefs.floating_text_enabled);
        assert!(prefs.floating_texts.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(PREFERENCES_FILE), "{not json").unwrap();
        assert_eq!(store.load_preferences(), UiPreferences::default());
    }
}
