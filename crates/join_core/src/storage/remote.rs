//! Client for the remote key-value service that backs up the local mirror.
//!
//! Writes are `POST <endpoint>` with `{key, value, token}`; reads are
//! `GET <endpoint>?key=..&token=..` answering `{"data": {"value": "<json>"}}`.

use crate::config::RemoteSettings;
use crate::error::AppError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

pub trait RemoteStore: Send + Sync {
    fn set_item(&self, key: &str, value: &Value) -> Result<(), AppError>;

    fn get_item(&self, key: &str) -> Result<Option<Value>, AppError>;
}

pub struct HttpRemoteStore {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: String,
}

impl HttpRemoteStore {
    pub fn new(settings: &RemoteSettings) -> Result<Self, AppError> {
        if settings.endpoint.trim().is_empty() {
            return Err(AppError::invalid_input("remote endpoint is required"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| AppError::remote(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim().to_string(),
            token: settings.token.clone(),
        })
    }
}

impl RemoteStore for HttpRemoteStore {
    fn set_item(&self, key: &str, value: &Value) -> Result<(), AppError> {
        self.client
            .post(&self.endpoint)
            .json(&write_payload(key, value, &self.token))
            .send()
            .map_err(|err| AppError::remote(format!("write of '{key}' failed: {err}")))?
            .error_for_status()
            .map_err(|err| AppError::remote(format!("write of '{key}' rejected: {err}")))?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<Value>, AppError> {
        let body: Value = self
            .client
            .get(&self.endpoint)
            .query(&[("key", key), ("token", self.token.as_str())])
            .send()
            .map_err(|err| AppError::remote(format!("read of '{key}' failed: {err}")))?
            .error_for_status()
            .map_err(|err| AppError::remote(format!("read of '{key}' rejected: {err}")))?
            .json()
            .map_err(|err| AppError::invalid_data(format!("read of '{key}': {err}")))?;
        parse_read_response(key, &body)
    }
}

pub fn write_payload(key: &str, value: &Value, token: &str) -> Value {
    serde_json::json!({
        "key": key,
        "value": value,
        "token": token,
    })
}

/// Extracts `data.value` from a read response. The service returns the stored
/// value as a JSON string; an already decoded value is taken as-is.
pub fn parse_read_response(key: &str, body: &Value) -> Result<Option<Value>, AppError> {
    let value = match body.get("data").and_then(|data| data.get("value")) {
        Some(Value::Null) | None => return Ok(None),
        Some(value) => value,
    };

    match value {
        Value::String(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|err| AppError::invalid_data(format!("remote value for '{key}': {err}"))),
        other => Ok(Some(other.clone())),
    }
}

/// In-process store, used for offline runs and tests.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    items: Mutex<BTreeMap<String, Value>>,
    fail_writes: bool,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, to exercise best-effort handling.
    pub fn failing() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            fail_writes: true,
        }
    }

    pub fn with_items<I, K>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            items: Mutex::new(items.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            fail_writes: false,
        }
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn set_item(&self, key: &str, value: &Value) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::remote(format!("write of '{key}' failed: offline")));
        }
        let mut items = self
            .items
            .lock()
            .map_err(|_| AppError::remote("memory store poisoned"))?;
        items.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<Value>, AppError> {
        let items = self
            .items
            .lock()
            .map_err(|_| AppError::remote("memory store poisoned"))?;
        Ok(items.get(key).cloned())
    }
}
