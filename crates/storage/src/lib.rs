use cephalo_core::Preferences;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PREFS_SCHEMA_VERSION: u32 = 1;
const PREFS_FILE: &str = "preferences.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("unsupported preferences version {found} (expected {})", PREFS_SCHEMA_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferencesEnvelope {
    version: u32,
    preferences: Preferences,
}

impl Storage {
    pub fn from_default_project() -> StorageResult<Self> {
        let dirs = ProjectDirs::from("dev", "Cephalo", "Cephalo")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.config_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.root.join(PREFS_FILE)
    }

    /// Stored preferences, or defaults when nothing has been saved
    pub fn load_preferences(&self) -> StorageResult<Preferences> {
        let path = self.preferences_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no preferences file, using defaults");
            return Ok(Preferences::default());
        }

        let bytes = fs::read(&path)?;
        let envelope: PreferencesEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version != PREFS_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion { found: envelope.version });
        }

        tracing::debug!(path = %path.display(), "preferences loaded");
        Ok(envelope.preferences)
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;

        let envelope =
            PreferencesEnvelope { version: PREFS_SCHEMA_VERSION, preferences: preferences.clone() };

        let bytes = serde_json::to_vec_pretty(&envelope)?;
        let path = self.preferences_path();
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Write default preferences unless a file already exists
    ///
    /// Returns `true` when a file was created.
    pub fn init_preferences(&self) -> StorageResult<bool> {
        if self.preferences_path().exists() {
            return Ok(false);
        }
        self.save_preferences(&Preferences::default())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cephalo_core::{Locale, MetricId, Norm};

    #[test]
    fn preferences_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let mut prefs = Preferences {
            locale: Locale::Es,
            reference_length_mm: 20.0,
            ..Default::default()
        };
        prefs.analyses.extended = false;
        prefs.norms.set(MetricId::Anb, Norm::new(3.0, 2.0));

        store.save_preferences(&prefs).expect("save should succeed");
        let loaded = store.load_preferences().expect("load should succeed");

        assert_eq!(loaded, prefs);
        assert!(!store.preferences_path().with_extension("tmp").exists());
    }

    #[test]
    fn load_defaults_when_file_absent() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        let loaded = store.load_preferences().expect("load should succeed");
        assert_eq!(loaded, Preferences::default());
    }

    #[test]
    fn saved_file_is_versioned_envelope() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path().join("nested"));
        store.save_preferences(&Preferences::default()).expect("save should succeed");

        let raw = fs::read_to_string(store.preferences_path()).expect("file should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["version"], 1);
        assert_eq!(value["preferences"]["locale"], "en");
        assert_eq!(value["preferences"]["reference_length_mm"], 10.0);
    }

    #[test]
    fn rejects_unknown_version() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());
        fs::write(store.preferences_path(), r#"{"version":7,"preferences":{}}"#)
            .expect("write should succeed");

        let err = store.load_preferences().expect_err("version 7 should be rejected");
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 7 }));
    }

    #[test]
    fn partial_preferences_fill_defaults() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());
        fs::write(store.preferences_path(), r#"{"version":1,"preferences":{"locale":"es"}}"#)
            .expect("write should succeed");

        let loaded = store.load_preferences().expect("load should succeed");
        assert_eq!(loaded.locale, Locale::Es);
        assert!(loaded.analyses.steiner);
    }

    #[test]
    fn init_does_not_overwrite() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = Storage::with_root(temp.path());

        assert!(store.init_preferences().expect("init should succeed"));
        let custom = Preferences { locale: Locale::Es, ..Default::default() };
        store.save_preferences(&custom).expect("save should succeed");

        assert!(!store.init_preferences().expect("init should succeed"));
        assert_eq!(store.load_preferences().expect("load should succeed"), custom);
    }
}
