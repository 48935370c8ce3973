// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    collections::HashSet,
    sync::Arc,
};

use bcard_api_client::{
    request::{CardForm, CardUpdateForm, CreateCardRequestBody, UpdateCardRequestBody},
    types::Card,
    BcardApi,
};
use bcard_session::{storage::SessionStorage, SessionManager};
use tracing::{debug, warn};

use crate::error::{DirectoryError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Default)]
struct CardCache {
    cards: Vec<Card>,
    load_state: LoadState,
    // Card ids with a like toggle currently awaiting the server.
    likes_in_flight: HashSet<String>,
    // Bumped on every wholesale replacement, so stale rollbacks can tell
    // the snapshot changed under them.
    generation: u64,
}

impl CardCache {
    fn position(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id == card_id)
    }

    fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == card_id)
    }
}

/// Locally cached view of the card directory, kept in sync with the remote
/// service.
///
/// Like toggles are applied optimistically: the flip is visible in the
/// cache before the server answers, reconciled with the response on
/// success and rolled back on failure. At most one toggle per card is in
/// flight at a time.
pub struct CardStore<S, A>
where
    S: SessionStorage,
{
    session: SessionManager<S, A>,
    api: A,
    cache: Arc<tokio::sync::Mutex<CardCache>>,
}

impl<S, A> Clone for CardStore<S, A>
where
    S: SessionStorage,
    A: Clone,
{
    fn clone(&self) -> Self {
        CardStore {
            session: self.session.clone(),
            api: self.api.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S, A> CardStore<S, A>
where
    S: SessionStorage,
    S::StorageError: Send + Sync + 'static,
    A: BcardApi,
{
    pub fn new(session: SessionManager<S, A>, api: A) -> Self {
        CardStore {
            session,
            api,
            cache: Arc::new(tokio::sync::Mutex::new(CardCache::default())),
        }
    }

    /// Refresh the whole cache from the service. On success the previous
    /// snapshot is replaced wholesale; on failure it is kept and only the
    /// load state records the failure.
    pub async fn load(&self) -> Result<()> {
        {
            let mut cache = self.cache.lock().await;
            cache.load_state = LoadState::Loading;
        }
        match self.session.intercept(self.api.list_cards().await).await {
            Ok(cards) => {
                let mut cache = self.cache.lock().await;
                debug!("Loaded {} cards", cards.len());
                cache.cards = cards;
                cache.load_state = LoadState::Loaded;
                cache.generation = cache.generation.wrapping_add(1);
                Ok(())
            }
            Err(err) => {
                let mut cache = self.cache.lock().await;
                cache.load_state = LoadState::Failed;
                Err(DirectoryError::Api(err))
            }
        }
    }

    pub async fn load_state(&self) -> LoadState {
        self.cache.lock().await.load_state
    }

    /// Snapshot of the cached cards.
    pub async fn cards(&self) -> Vec<Card> {
        self.cache.lock().await.cards.clone()
    }

    pub async fn card(&self, card_id: &str) -> Option<Card> {
        self.cache.lock().await.card(card_id).cloned()
    }

    /// Cached card, falling back to a remote fetch on a miss. The fetched
    /// card is inserted into the cache.
    pub async fn get_card(&self, card_id: &str) -> Result<Card> {
        if let Some(card) = self.card(card_id).await {
            return Ok(card);
        }
        let card = self
            .session
            .intercept(self.api.get_card(card_id).await)
            .await
            .map_err(DirectoryError::Api)?;
        let mut cache = self.cache.lock().await;
        if cache.position(card_id).is_none() {
            cache.cards.push(card.clone());
        }
        Ok(card)
    }

    /// Optimistic like toggle.
    ///
    /// Declined silently when not signed in. Rejected when a toggle for the
    /// same card is still awaiting the server. The optimistic flip and the
    /// in-flight marker are applied under a single cache lock, so observers
    /// never see one without the other.
    pub async fn toggle_like(&self, card_id: &str) -> Result<()> {
        let Some(user_id) = self.session.shared_state().user_id().await else {
            debug!("Ignoring like toggle while not signed in");
            return Ok(());
        };

        let (previous_likes, flip_generation) = {
            let mut cache = self.cache.lock().await;
            let Some(card) = cache.card(card_id) else {
                return Err(DirectoryError::UnknownCard(card_id.to_string()));
            };
            if cache.likes_in_flight.contains(card_id) {
                return Err(DirectoryError::LikeInFlight(card_id.to_string()));
            }
            let previous = card.likes.clone();
            cache.likes_in_flight.insert(card_id.to_string());
            let generation = cache.generation;
            let card = cache
                .card_mut(card_id)
                .ok_or_else(|| DirectoryError::UnknownCard(card_id.to_string()))?;
            if card.is_liked_by(&user_id) {
                card.likes.retain(|id| id != &user_id);
            } else {
                card.likes.push(user_id.clone());
            }
            (previous, generation)
        };

        let result = self
            .session
            .intercept(self.api.toggle_like(card_id).await)
            .await;

        let mut cache = self.cache.lock().await;
        cache.likes_in_flight.remove(card_id);
        match result {
            Ok(updated) => {
                // The card may have been dropped by a refresh while the
                // toggle was in flight; the result is then discarded.
                if let Some(card) = cache.card_mut(card_id) {
                    card.likes = dedup_likes(updated.likes);
                }
                Ok(())
            }
            Err(err) => {
                warn!("Like toggle for card {card_id} failed, rolling back: {err}");
                // A snapshot that was replaced while the toggle was in
                // flight is fresher than the pre-toggle likes; only roll
                // back the entry the toggle actually flipped.
                if cache.generation == flip_generation {
                    if let Some(card) = cache.card_mut(card_id) {
                        card.likes = previous_likes;
                    }
                }
                Err(DirectoryError::Api(err))
            }
        }
    }

    pub async fn create_card(&self, form: CardForm) -> Result<Card> {
        let body = CreateCardRequestBody::from_form(form);
        let card = self
            .session
            .intercept(self.api.create_card(&body).await)
            .await
            .map_err(DirectoryError::Api)?;
        self.cache.lock().await.cards.push(card.clone());
        Ok(card)
    }

    pub async fn update_card(&self, card_id: &str, form: CardUpdateForm) -> Result<Card> {
        let body = UpdateCardRequestBody::from_form(form);
        let card = self
            .session
            .intercept(self.api.update_card(card_id, &body).await)
            .await
            .map_err(DirectoryError::Api)?;
        let mut cache = self.cache.lock().await;
        match cache.position(card_id) {
            Some(index) => cache.cards[index] = card.clone(),
            None => cache.cards.push(card.clone()),
        }
        Ok(card)
    }

    /// Delete a card. Gated on ownership before the remote call; the
    /// service enforces its own rule again.
    pub async fn delete_card(&self, card_id: &str) -> Result<()> {
        let user_id = self
            .session
            .shared_state()
            .user_id()
            .await
            .unwrap_or_default();
        {
            let cache = self.cache.lock().await;
            let Some(card) = cache.card(card_id) else {
                return Err(DirectoryError::UnknownCard(card_id.to_string()));
            };
            if !card.is_owned_by(&user_id) {
                return Err(DirectoryError::NotCardOwner(card_id.to_string()));
            }
        }

        self.session
            .intercept(self.api.delete_card(card_id).await)
            .await
            .map_err(DirectoryError::Api)?;

        let mut cache = self.cache.lock().await;
        if let Some(index) = cache.position(card_id) {
            cache.cards.remove(index);
        }
        Ok(())
    }
}

fn dedup_likes(likes: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    likes
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
