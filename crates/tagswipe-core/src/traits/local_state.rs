// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key/value state that survives reloads on one device.

use async_trait::async_trait;

use crate::error::TagswipeError;
use crate::traits::adapter::Adapter;

/// Device-local key/value persistence.
///
/// A completed `set` or `remove` must be durable: the queue awaits every
/// write before reporting an operation as done, so an implementation must not
/// buffer writes past its own return.
#[async_trait]
pub trait LocalState: Adapter {
    async fn get(&self, key: &str) -> Result<Option<String>, TagswipeError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), TagswipeError>;

    async fn remove(&self, key: &str) -> Result<(), TagswipeError>;
}
