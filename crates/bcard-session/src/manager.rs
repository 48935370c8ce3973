// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use bcard_api_client::{
    decode_claims,
    request::{ImageBody, LoginRequestBody, NameBody, RegisterRequestBody, DEFAULT_COUNTRY},
    types::Address,
    BcardApi, BcardApiError,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::{
    error::{Result, SessionError, ValidationError},
    shared_state::{SessionState, SharedSessionState},
    storage::{SessionStorage, StoredSession},
};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Session lifecycle notifications for embedders. `ForcedSignOut` is the
/// signal to route the user back to the sign-in surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: String },
    SignedOut,
    ForcedSignOut,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub is_business: bool,
}

/// Drives the authentication lifecycle: restore on startup, login,
/// registration, logout and the forced sign-out on unauthorized responses.
///
/// The in-memory state, the persisted snapshot and the bearer token on the
/// api client move together. Any failure along the way leaves all three
/// either fully authenticated or fully cleared, never in between.
pub struct SessionManager<S, A>
where
    S: SessionStorage,
{
    storage: Arc<tokio::sync::Mutex<S>>,
    api: A,
    state: SharedSessionState,
    event_tx: UnboundedSender<SessionEvent>,
}

impl<S, A> Clone for SessionManager<S, A>
where
    S: SessionStorage,
    A: Clone,
{
    fn clone(&self) -> Self {
        SessionManager {
            storage: Arc::clone(&self.storage),
            api: self.api.clone(),
            state: self.state.clone(),
            event_tx: self.event_tx.clone(),
        }
    }
}

impl<S, A> SessionManager<S, A>
where
    S: SessionStorage,
    S::StorageError: Send + Sync + 'static,
    A: BcardApi,
{
    pub fn new(storage: S, api: A, event_tx: UnboundedSender<SessionEvent>) -> Self {
        SessionManager {
            storage: Arc::new(tokio::sync::Mutex::new(storage)),
            api,
            state: SharedSessionState::new(),
            event_tx,
        }
    }

    pub fn shared_state(&self) -> SharedSessionState {
        self.state.clone()
    }

    /// Rebuild the session from the persisted snapshot, without any network
    /// call. A missing, inconsistent, undecodable or expired snapshot ends
    /// in `Anonymous` with both storage slots cleared.
    pub async fn restore(&self) -> Result<()> {
        self.state.set(SessionState::Restoring).await;

        let loaded = {
            let storage = self.storage.lock().await;
            storage.load_session().await
        };
        let stored = match loaded {
            Ok(stored) => stored,
            Err(err) => {
                debug!("No usable persisted session: {err}");
                return self.clear_session().await;
            }
        };

        // The raw token is authoritative; the claims snapshot on disk is
        // only a cache of its payload.
        let claims = match decode_claims(&stored.token) {
            Ok(claims) => claims,
            Err(err) => {
                warn!("Discarding persisted token: {err}");
                return self.clear_session().await;
            }
        };
        if claims.is_expired() {
            info!("Persisted token has expired, starting anonymous");
            return self.clear_session().await;
        }

        self.api.set_bearer_token(Some(stored.token.clone()));
        let user_id = claims.id.clone();
        self.state
            .set(SessionState::Authenticated {
                token: stored.token,
                claims,
            })
            .await;
        let _ = self.event_tx.send(SessionEvent::SignedIn { user_id });
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let request = LoginRequestBody {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = self
            .intercept(self.api.login(&request).await)
            .await
            .map_err(SessionError::Api)?;
        let claims = decode_claims(&token).map_err(SessionError::Api)?;
        if claims.is_expired() {
            return Err(SessionError::ClaimsExpired);
        }

        // Persist before flipping the observable state, so a write failure
        // leaves the session untouched.
        let stored = StoredSession {
            token: token.clone(),
            claims: claims.clone(),
        };
        self.storage
            .lock()
            .await
            .store_session(&stored)
            .await
            .map_err(SessionError::storage)?;

        self.api.set_bearer_token(Some(token.clone()));
        let user_id = claims.id.clone();
        self.state
            .set(SessionState::Authenticated { token, claims })
            .await;
        let _ = self.event_tx.send(SessionEvent::SignedIn { user_id });
        Ok(())
    }

    /// Validate and submit a registration, then sign in with the same
    /// credentials. Validation failures short-circuit before any remote
    /// call.
    pub async fn register(&self, form: RegistrationForm) -> Result<()> {
        validate_registration(&form)?;

        let request = RegisterRequestBody {
            name: NameBody::from_display(&form.name),
            email: form.email.clone(),
            password: form.password.clone(),
            phone: form.phone.clone(),
            image: ImageBody::default(),
            address: Address {
                country: DEFAULT_COUNTRY.to_string(),
                ..Default::default()
            },
            is_business: form.is_business,
        };
        self.intercept(self.api.register(&request).await)
            .await
            .map_err(SessionError::Api)?;

        // Registration alone does not establish a session.
        self.login(&form.email, &form.password).await
    }

    /// Clear the session everywhere. A no-op when already anonymous.
    pub async fn logout(&self) -> Result<()> {
        if !self.state.is_authenticated().await {
            debug!("Logout requested while not signed in");
            return Ok(());
        }
        self.clear_session().await?;
        let _ = self.event_tx.send(SessionEvent::SignedOut);
        Ok(())
    }

    /// Forced sign-out after the service rejected our credential. The
    /// in-memory state is dropped even if clearing storage fails.
    pub async fn handle_unauthorized(&self) {
        if !self.state.is_authenticated().await {
            return;
        }
        warn!("Credential rejected by the service, forcing sign-out");
        if let Err(err) = self.clear_session().await {
            error!("Failed to clear stored session during forced sign-out: {err}");
        }
        let _ = self.event_tx.send(SessionEvent::ForcedSignOut);
    }

    /// Wrap a remote call result, forcing a sign-out when the service
    /// answered unauthorized. Every component talking to the service is
    /// expected to route its results through here.
    pub async fn intercept<T>(
        &self,
        result: std::result::Result<T, BcardApiError>,
    ) -> std::result::Result<T, BcardApiError> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.handle_unauthorized().await;
            }
        }
        result
    }

    async fn clear_session(&self) -> Result<()> {
        let removed = self.storage.lock().await.remove_session().await;
        self.api.set_bearer_token(None);
        self.state.set(SessionState::Anonymous).await;
        removed.map_err(SessionError::storage)
    }
}

fn validate_registration(form: &RegistrationForm) -> std::result::Result<(), ValidationError> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if form.email.trim().is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if !form.email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if form.phone.trim().is_empty() {
        return Err(ValidationError::MissingField("phone"));
    }
    Ok(())
}
