// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

//! Authentication session lifecycle: restore, login, registration, logout
//! and forced sign-out on rejected credentials.

mod error;
mod manager;
mod shared_state;
pub mod storage;

pub use error::{Result, SessionError, ValidationError};
pub use manager::{RegistrationForm, SessionEvent, SessionManager, MIN_PASSWORD_LEN};
pub use shared_state::{SessionState, SharedSessionState};
