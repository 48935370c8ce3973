// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fs::File,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bcard_api_client::Claims;

use super::{SessionStorage, StoredSession};

const TOKEN_FILE: &str = "token.json";
const USER_FILE: &str = "user.json";

#[derive(Debug, thiserror::Error)]
pub enum OnDiskSessionStorageError {
    #[error("no session stored")]
    NoSessionStored,

    #[error("session snapshot is inconsistent: one slot present without the other")]
    InconsistentSnapshot,

    #[error("failed to create session directory")]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write session file")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize session")]
    SerializeError(#[source] serde_json::Error),

    #[error("failed to read session from file")]
    ReadError(#[source] serde_json::Error),

    #[error("failed to remove session file")]
    RemoveError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Session persisted as two JSON files in a directory: the raw token and
/// the decoded claims snapshot.
pub struct OnDiskSessionStorage {
    dir: PathBuf,
}

impl OnDiskSessionStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    fn write_json<T: serde::Serialize>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), OnDiskSessionStorageError> {
        let json = serde_json::to_string(value)
            .map_err(OnDiskSessionStorageError::SerializeError)?;
        std::fs::write(path, json).map_err(|source| OnDiskSessionStorageError::WriteError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_file(&self, path: &Path) -> Result<(), OnDiskSessionStorageError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OnDiskSessionStorageError::RemoveError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl SessionStorage for OnDiskSessionStorage {
    type StorageError = OnDiskSessionStorageError;

    async fn load_session(&self) -> Result<StoredSession, OnDiskSessionStorageError> {
        let token_file = File::open(self.token_path());
        let user_file = File::open(self.user_path());
        let (token_file, user_file) = match (token_file, user_file) {
            (Ok(token), Ok(user)) => (token, user),
            (Err(t), Err(u))
                if t.kind() == ErrorKind::NotFound && u.kind() == ErrorKind::NotFound =>
            {
                return Err(OnDiskSessionStorageError::NoSessionStored)
            }
            // One slot without the other. The caller is expected to clear
            // both and fall back to an anonymous session.
            _ => return Err(OnDiskSessionStorageError::InconsistentSnapshot),
        };

        let token: String =
            serde_json::from_reader(token_file).map_err(OnDiskSessionStorageError::ReadError)?;
        let claims: Claims =
            serde_json::from_reader(user_file).map_err(OnDiskSessionStorageError::ReadError)?;
        Ok(StoredSession { token, claims })
    }

    async fn store_session(
        &self,
        session: &StoredSession,
    ) -> Result<(), OnDiskSessionStorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| {
            OnDiskSessionStorageError::CreateDirError {
                path: self.dir.clone(),
                source,
            }
        })?;

        self.write_json(&self.token_path(), &session.token)?;
        if let Err(err) = self.write_json(&self.user_path(), &session.claims) {
            // Never leave a dangling token without claims.
            let _ = self.remove_file(&self.token_path());
            return Err(err);
        }
        Ok(())
    }

    async fn remove_session(&self) -> Result<(), OnDiskSessionStorageError> {
        self.remove_file(&self.token_path())?;
        self.remove_file(&self.user_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(id: &str) -> Claims {
        Claims {
            id: id.to_string(),
            name: None,
            email: None,
            is_business: false,
            is_admin: false,
            exp: None,
        }
    }

    #[tokio::test]
    async fn store_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskSessionStorage::new(dir.path().join("session"));
        let session = StoredSession {
            token: "t1".to_string(),
            claims: claims("u1"),
        };
        storage.store_session(&session).await.unwrap();

        let loaded = storage.load_session().await.unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn load_fails_when_nothing_stored() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskSessionStorage::new(dir.path().join("session"));
        assert!(matches!(
            storage.load_session().await,
            Err(OnDiskSessionStorageError::NoSessionStored)
        ));
    }

    #[tokio::test]
    async fn load_fails_on_dangling_token() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskSessionStorage::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(TOKEN_FILE), r#""t1""#).unwrap();
        assert!(matches!(
            storage.load_session().await,
            Err(OnDiskSessionStorageError::InconsistentSnapshot)
        ));
    }

    #[tokio::test]
    async fn remove_clears_both_slots_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskSessionStorage::new(dir.path().join("session"));
        let session = StoredSession {
            token: "t1".to_string(),
            claims: claims("u1"),
        };
        storage.store_session(&session).await.unwrap();

        storage.remove_session().await.unwrap();
        assert!(!storage.token_path().exists());
        assert!(!storage.user_path().exists());

        // Removing again is a no-op.
        storage.remove_session().await.unwrap();
    }

    #[tokio::test]
    async fn store_overwrites_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let storage = OnDiskSessionStorage::new(dir.path().join("session"));
        storage
            .store_session(&StoredSession {
                token: "t1".to_string(),
                claims: claims("u1"),
            })
            .await
            .unwrap();
        storage
            .store_session(&StoredSession {
                token: "t2".to_string(),
                claims: claims("u2"),
            })
            .await
            .unwrap();

        let loaded = storage.load_session().await.unwrap();
        assert_eq!(loaded.token, "t2");
        assert_eq!(loaded.claims.id, "u2");
    }
}
