// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use bcard_api_client::BcardApiError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("remote call failed")]
    Api(#[source] BcardApiError),

    #[error("token claims are already expired")]
    ClaimsExpired,

    #[error("session store error")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SessionError {
    pub(crate) fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SessionError::Storage {
            source: Box::new(err),
        }
    }
}

/// Client-side pre-submission checks. These short-circuit before any
/// remote call is made.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

pub type Result<T> = std::result::Result<T, SessionError>;
