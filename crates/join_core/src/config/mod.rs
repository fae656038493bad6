use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "JOIN_CONFIG_PATH";

pub const DEFAULT_REMOTE_ENDPOINT: &str = "https://remote-storage.developerakademie.org/item";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned = canonicalize_key(raw);
    if cleaned.is_empty() {
        return Some("default".into());
    }

    match cleaned.as_str() {
        "vanilla" | "light" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

/// Lower-cases and joins word runs with single underscores: " Remote-Token " -> "remote_token".
pub fn canonicalize_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_REMOTE_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub remote: RemoteSettings,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub remote_enabled: Option<bool>,
    pub remote_endpoint: Option<String>,
    pub remote_token: Option<String>,
    pub remote_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Applies one `KEY=VALUE` pair.
    pub fn apply(&mut self, raw: &str) -> Result<(), AppError> {
        let (key_raw, value_raw) = raw
            .trim()
            .split_once('=')
            .ok_or_else(|| AppError::invalid_input("override must be in KEY=VALUE format"))?;
        let value = value_raw.trim().to_string();
        let key = canonicalize_key(key_raw);

        match key.as_str() {
            "" => return Err(AppError::invalid_input("override key cannot be empty")),
            "theme" => self.theme = Some(value),
            "remote_enabled" => {
                let enabled = parse_bool(&value).ok_or_else(|| {
                    AppError::invalid_input(format!("remote.enabled expects true/false, got '{value}'"))
                })?;
                self.remote_enabled = Some(enabled);
            }
            "remote_endpoint" => {
                if value.is_empty() {
                    return Err(AppError::invalid_input("remote.endpoint cannot be empty"));
                }
                self.remote_endpoint = Some(value);
            }
            "remote_token" => self.remote_token = Some(value),
            "remote_timeout_secs" => {
                let secs = value.parse::<u64>().map_err(|_| {
                    AppError::invalid_input(format!("remote.timeout_secs expects seconds, got '{value}'"))
                })?;
                self.remote_timeout_secs = Some(secs);
            }
            other => {
                return Err(AppError::invalid_input(format!(
                    "unknown config field '{other}'"
                )));
            }
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("join").join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("join")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref()
        && let Some(normalized) = canonical_theme_name(theme)
    {
        merged.theme = Some(normalized);
    }
    if let Some(enabled) = overrides.remote_enabled {
        merged.remote.enabled = enabled;
    }
    if let Some(endpoint) = overrides.remote_endpoint.as_ref() {
        merged.remote.endpoint = endpoint.clone();
    }
    if let Some(token) = overrides.remote_token.as_ref() {
        merged.remote.token = token.clone();
    }
    if let Some(secs) = overrides.remote_timeout_secs {
        merged.remote.timeout_secs = secs;
    }

    merged
}
