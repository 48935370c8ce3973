// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum BcardApiError {
    #[error("invalid base url")]
    InvalidBaseUrl,

    #[error("missing or rejected credentials")]
    Unauthorized,

    #[error("requested entity not found")]
    NotFound,

    #[error("endpoint failure ({status}): {message}")]
    Endpoint { status: StatusCode, message: String },

    #[error("request failed")]
    Request(#[from] reqwest::Error),

    #[error("auth response carried no usable token")]
    NoToken,

    #[error("failed to decode token claims: {0}")]
    DecodeClaims(String),
}

impl BcardApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BcardApiError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BcardApiError::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, BcardApiError>;
