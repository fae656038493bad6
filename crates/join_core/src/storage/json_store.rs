use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "mirror.json";
const STORE_ENV_VAR: &str = "JOIN_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredMirror {
    schema_version: u32,
    #[serde(default)]
    items: BTreeMap<String, Value>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("join").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("join")
            .join(STORE_FILE_NAME))
    }
}

/// File-backed key-value mirror of the remote store.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    path: PathBuf,
}

impl LocalMirror {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_path()?))
    }

    pub fn get_item(&self, key: &str) -> Result<Option<Value>, AppError> {
        let mut items = load_items(&self.path)?;
        Ok(items.remove(key))
    }

    pub fn set_item(&self, key: &str, value: Value) -> Result<(), AppError> {
        let mut items = load_items(&self.path)?;
        items.insert(key.to_string(), value);
        save_items(&self.path, &items)
    }
}

pub fn load_items(path: &Path) -> Result<BTreeMap<String, Value>, AppError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredMirror = serde_json::from_str(&content)
        .map_err(|err| AppError::invalid_data(format!("{}: {}", path.display(), err)))?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    Ok(stored.items)
}

pub fn save_items(path: &Path, items: &BTreeMap<String, Value>) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredMirror {
        schema_version: SCHEMA_VERSION,
        items: items.clone(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
