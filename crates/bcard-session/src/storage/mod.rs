// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::error::Error;

use bcard_api_client::Claims;
use serde::{Deserialize, Serialize};

mod ephemeral;
mod on_disk;

pub use ephemeral::{EphemeralSessionStorage, EphemeralSessionStorageError};
pub use on_disk::{OnDiskSessionStorage, OnDiskSessionStorageError};

/// Persistence boundary for the session: two keyed slots, written together
/// on login and cleared together on logout or decode failure.
pub trait SessionStorage {
    type StorageError: Error;

    #[allow(async_fn_in_trait)]
    async fn load_session(&self) -> Result<StoredSession, Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn store_session(&self, session: &StoredSession) -> Result<(), Self::StorageError>;

    /// Remove both slots. Must succeed when nothing is stored.
    #[allow(async_fn_in_trait)]
    async fn remove_session(&self) -> Result<(), Self::StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub claims: Claims,
}
