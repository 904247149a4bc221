// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory LocalState for deterministic testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tagswipe_core::{Adapter, AdapterType, HealthStatus, LocalState, TagswipeError};

/// Key/value state held in a shared map.
///
/// Clones share the same map, so a clone handed to a second engine simulates
/// a reload on the same device.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalState {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryLocalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.values.lock().await.clone()
    }

    /// Seed a value directly, bypassing the failure switch.
    pub async fn seed(&self, key: &str, value: &str) {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    fn check_writable(&self) -> Result<(), TagswipeError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TagswipeError::Storage {
                source: "memory local state is read-only".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Adapter for MemoryLocalState {
    fn name(&self) -> &str {
        "memory-local-state"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LocalState
    }

    async fn health_check(&self) -> Result<HealthStatus, TagswipeError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TagswipeError> {
        Ok(())
    }
}

#[async_trait]
impl LocalState for MemoryLocalState {
    async fn get(&self, key: &str) -> Result<Option<String>, TagswipeError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), TagswipeError> {
        self.check_writable()?;
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), TagswipeError> {
        self.check_writable()?;
        self.values.lock().await.remove(key);
        Ok(())
    }
}
