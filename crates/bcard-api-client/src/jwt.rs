// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::error::BcardApiError;

/// Identity payload decoded from a bearer token.
///
/// The payload is decoded without signature verification and is only ever
/// used as a display hint. Authorization is enforced by the remote service
/// on every mutating call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "isBusiness", default)]
    pub is_business: bool,

    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,

    // Seconds since the unix epoch, when present.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn is_expired_at(&self, unix_seconds: i64) -> bool {
        self.exp.map(|exp| exp <= unix_seconds).unwrap_or(false)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// Decode the claims segment of a compact JWT. No signature verification.
pub fn decode_claims(token: &str) -> Result<Claims, BcardApiError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| BcardApiError::DecodeClaims("not a compact jwt".to_string()))?;
    let bytes = base64_url::decode(payload)
        .map_err(|err| BcardApiError::DecodeClaims(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| BcardApiError::DecodeClaims(err.to_string()))
}
