// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

//! Pure, read-only views over a card snapshot. None of these touch the
//! network or the cache; callers pass the snapshot they already hold.

use bcard_api_client::types::Card;

pub const SEARCH_PREVIEW_LIMIT: usize = 5;

/// Cards created by the given user.
pub fn filter_by_owner<'a>(cards: &'a [Card], user_id: &str) -> Vec<&'a Card> {
    cards
        .iter()
        .filter(|card| card.is_owned_by(user_id))
        .collect()
}

/// Cards the given user has liked.
pub fn filter_liked<'a>(cards: &'a [Card], user_id: &str) -> Vec<&'a Card> {
    cards
        .iter()
        .filter(|card| card.is_liked_by(user_id))
        .collect()
}

/// Case-insensitive match on title or description, preserving the snapshot
/// order. An empty query matches everything.
pub fn search<'a>(cards: &'a [Card], query: &str) -> Vec<&'a Card> {
    let needle = query.to_lowercase();
    cards
        .iter()
        .filter(|card| {
            card.title.to_lowercase().contains(&needle)
                || card.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Search capped for typeahead dropdowns.
pub fn search_preview<'a>(cards: &'a [Card], query: &str) -> Vec<&'a Card> {
    let mut matches = search(cards, query);
    matches.truncate(SEARCH_PREVIEW_LIMIT);
    matches
}
