//! Write-through persistence: the local mirror is updated synchronously, the
//! remote store gets a best-effort copy from a background writer.

use crate::error::AppError;
use crate::storage::json_store::LocalMirror;
use crate::storage::remote::RemoteStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, warn};

struct PendingWrite {
    key: String,
    value: Value,
}

/// Single background thread that forwards writes in issue order.
struct RemoteWriter {
    sender: Option<Sender<PendingWrite>>,
    handle: Option<JoinHandle<()>>,
}

impl RemoteWriter {
    fn spawn(remote: Arc<dyn RemoteStore>) -> Self {
        let (sender, receiver) = mpsc::channel::<PendingWrite>();
        let handle = std::thread::spawn(move || {
            for write in receiver {
                match remote.set_item(&write.key, &write.value) {
                    Ok(()) => debug!(key = %write.key, "remote write stored"),
                    Err(err) => warn!(key = %write.key, error = %err, "remote write dropped"),
                }
            }
        });

        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    fn enqueue(&self, key: &str, value: Value) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        let write = PendingWrite {
            key: key.to_string(),
            value,
        };
        if sender.send(write).is_err() {
            warn!(key, "remote writer stopped, write dropped");
        }
    }

    fn drain(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("remote writer panicked");
        }
    }
}

impl Drop for RemoteWriter {
    fn drop(&mut self) {
        self.drain();
    }
}

pub struct SyncedStore {
    local: LocalMirror,
    remote: Option<Arc<dyn RemoteStore>>,
    writer: Mutex<Option<RemoteWriter>>,
}

impl SyncedStore {
    pub fn local_only(local: LocalMirror) -> Self {
        Self {
            local,
            remote: None,
            writer: Mutex::new(None),
        }
    }

    pub fn with_remote(local: LocalMirror, remote: Arc<dyn RemoteStore>) -> Self {
        let writer = RemoteWriter::spawn(Arc::clone(&remote));
        Self {
            local,
            remote: Some(remote),
            writer: Mutex::new(Some(writer)),
        }
    }

    pub fn local(&self) -> &LocalMirror {
        &self.local
    }

    /// Reads a key from the local mirror. Absent keys are `None`; a value that
    /// does not match `T` is `invalid_data`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.local.get_item(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|err| AppError::invalid_data(format!("stored '{key}': {err}"))),
            None => Ok(None),
        }
    }

    /// Persists locally, then queues the remote copy without waiting for it.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value)?;
        self.local.set_item(key, value.clone())?;
        debug!(key, "local mirror updated");

        match self.writer.lock() {
            Ok(writer) => {
                if let Some(writer) = writer.as_ref() {
                    writer.enqueue(key, value);
                }
            }
            Err(_) => warn!(key, "remote writer lock poisoned, write dropped"),
        }
        Ok(())
    }

    /// Copies the remote values of `keys` into the local mirror; returns the
    /// keys that were present remotely.
    pub fn pull(&self, keys: &[&str]) -> Result<Vec<String>, AppError> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("remote store is not enabled"))?;

        let mut pulled = Vec::new();
        for key in keys {
            if let Some(value) = remote.get_item(key)? {
                self.local.set_item(key, value)?;
                pulled.push(key.to_string());
            } else {
                debug!(key, "remote has no value, local copy kept");
            }
        }
        Ok(pulled)
    }

    /// Sends the local values of `keys` to the remote store and waits for each
    /// acknowledgement; returns the keys that were present locally.
    pub fn push(&self, keys: &[&str]) -> Result<Vec<String>, AppError> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("remote store is not enabled"))?;

        let mut pushed = Vec::new();
        for key in keys {
            if let Some(value) = self.local.get_item(key)? {
                remote.set_item(key, &value)?;
                pushed.push(key.to_string());
            }
        }
        Ok(pushed)
    }

    /// Blocks until every queued remote write has been attempted.
    pub fn flush(&self) {
        let Ok(mut slot) = self.writer.lock() else {
            warn!("remote writer lock poisoned, nothing flushed");
            return;
        };
        if let Some(mut writer) = slot.take() {
            writer.drain();
            if let Some(remote) = self.remote.as_ref() {
                *slot = Some(RemoteWriter::spawn(Arc::clone(remote)));
            }
        }
    }
}
