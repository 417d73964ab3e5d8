use super::backend::StorageBackend;
use crate::config::StoreConfig;
use crate::error::{Result, SettingsError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// File-backed settings storage: one JSON document at `config.data_file()`.
pub struct FsBackend {
    config: StoreConfig,
}

impl FsBackend {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::from_config(StoreConfig::new(data_dir))
    }

    pub fn from_config(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(SettingsError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load(&self) -> Result<Option<Value>> {
        let data_file = self.config.data_file();
        if !data_file.exists() {
            debug!(path = %data_file.display(), "no settings file yet");
            return Ok(None);
        }
        let content = fs::read_to_string(&data_file).map_err(SettingsError::Io)?;
        match serde_json::from_str(&content) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) => {
                // Invalid JSON loads as empty input. The file is moved aside first
                // so the next save cannot overwrite it.
                let aside = self.config.data_dir.join(format!(
                    "{}.corrupt-{}",
                    self.config.file_name,
                    Uuid::new_v4()
                ));
                fs::rename(&data_file, &aside).map_err(SettingsError::Io)?;
                warn!(
                    path = %data_file.display(),
                    moved_to = %aside.display(),
                    error = %err,
                    "settings file is not valid JSON, moved it aside"
                );
                Ok(Some(Value::Null))
            }
        }
    }

    fn save(&self, raw: &Value) -> Result<()> {
        let root = &self.config.data_dir;
        self.ensure_dir(root)?;

        let content = if self.config.pretty {
            serde_json::to_string_pretty(raw)
        } else {
            serde_json::to_string(raw)
        }
        .map_err(SettingsError::Serialization)?;

        let tmp_file = root.join(format!(".settings-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(SettingsError::Io)?;
        if let Err(err) = fs::rename(&tmp_file, self.config.data_file()) {
            let _ = fs::remove_file(&tmp_file);
            return Err(SettingsError::Io(err));
        }
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.config.data_file()
    }
}
