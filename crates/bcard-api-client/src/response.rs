// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BcardApiError;

/// Pull the bearer token out of an authentication response.
///
/// The service has shipped several response shapes over time: a bare string
/// token, `{token, user}`, `{token}` and `{accessToken}`. All are normalized
/// to the token string; anything else is a hard failure.
pub fn extract_token(body: &Value) -> Result<String, BcardApiError> {
    let token = match body {
        Value::String(token) => Some(token.as_str()),
        Value::Object(fields) => fields
            .get("token")
            .or_else(|| fields.get("accessToken"))
            .and_then(Value::as_str),
        _ => None,
    };
    match token {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(BcardApiError::NoToken),
    }
}

/// Structured diagnostic payload some endpoints return on failure.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Normalize a failure body to a display string: structured payloads are
/// reduced to their message, anything else is passed through verbatim.
pub(crate) fn normalize_error_body(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.message)
        .unwrap_or_else(|| body.to_string())
}
