// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use tokio::sync::Mutex;

use super::{SessionStorage, StoredSession};

#[derive(Debug, thiserror::Error)]
pub enum EphemeralSessionStorageError {
    #[error("no session stored")]
    NoSessionStored,
}

/// In-memory session storage for tests and stateless embedders.
#[derive(Default)]
pub struct EphemeralSessionStorage {
    session: Mutex<Option<StoredSession>>,
}

impl SessionStorage for EphemeralSessionStorage {
    type StorageError = EphemeralSessionStorageError;

    async fn load_session(&self) -> Result<StoredSession, EphemeralSessionStorageError> {
        self.session
            .lock()
            .await
            .clone()
            .ok_or(EphemeralSessionStorageError::NoSessionStored)
    }

    async fn store_session(
        &self,
        session: &StoredSession,
    ) -> Result<(), EphemeralSessionStorageError> {
        self.session.lock().await.replace(session.clone());
        Ok(())
    }

    async fn remove_session(&self) -> Result<(), EphemeralSessionStorageError> {
        self.session.lock().await.take();
        Ok(())
    }
}
