// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, sync::Arc};

use bcard_api_client::Claims;
use serde::Serialize;
use tokio::sync::MutexGuard;

/// Session state observable by the rest of the application.
///
/// Token and claims only ever exist together: the `Authenticated` variant
/// carries both, every other variant carries neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Restoring,
    Authenticated {
        token: String,
        claims: Claims,
    },
    Anonymous,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            SessionState::Authenticated { claims, .. } => Some(claims),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "Uninitialized"),
            SessionState::Restoring => write!(f, "Restoring"),
            SessionState::Authenticated { claims, .. } => {
                write!(f, "Authenticated as {}", claims.id)
            }
            SessionState::Anonymous => write!(f, "Anonymous"),
        }
    }
}

#[derive(Clone)]
pub struct SharedSessionState {
    inner: Arc<tokio::sync::Mutex<SessionState>>,
}

impl SharedSessionState {
    pub(crate) fn new() -> Self {
        SharedSessionState {
            inner: Arc::new(tokio::sync::Mutex::new(SessionState::default())),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().await
    }

    pub async fn get(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.lock().await.is_authenticated()
    }

    pub async fn user_id(&self) -> Option<String> {
        self.inner
            .lock()
            .await
            .claims()
            .map(|claims| claims.id.clone())
    }

    /// Business role hint from the decoded claims. False when anonymous.
    pub async fn is_business(&self) -> bool {
        self.inner
            .lock()
            .await
            .claims()
            .map(|claims| claims.is_business)
            .unwrap_or(false)
    }

    /// Admin role hint from the decoded claims. False when anonymous.
    pub async fn is_admin(&self) -> bool {
        self.inner
            .lock()
            .await
            .claims()
            .map(|claims| claims.is_admin)
            .unwrap_or(false)
    }

    pub(crate) async fn set(&self, state: SessionState) {
        let mut guard = self.inner.lock().await;
        tracing::info!("Session state: {} -> {}", *guard, state);
        *guard = state;
    }
}
