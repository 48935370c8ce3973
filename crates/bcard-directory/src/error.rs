// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use bcard_api_client::BcardApiError;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("remote call failed")]
    Api(#[source] BcardApiError),

    #[error("card {0} is not in the local cache")]
    UnknownCard(String),

    #[error("a like toggle for card {0} is already in flight")]
    LikeInFlight(String),

    #[error("card {0} does not belong to the signed-in user")]
    NotCardOwner(String),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
