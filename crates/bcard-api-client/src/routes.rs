// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub(crate) const USERS: &str = "users";
pub(crate) const LOGIN: &str = "login";
pub(crate) const REGISTER: &str = "register";
pub(crate) const CARDS: &str = "cards";
