// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

//! Locally cached card directory with optimistic like toggles and pure
//! query views over the cached snapshot.

mod error;
pub mod query;
mod store;

pub use error::{DirectoryError, Result};
pub use store::{CardStore, LoadState};
