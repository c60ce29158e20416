// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::DeckError;
use crate::types::card::Card;
use crate::types::card_id::CardId;

/// The canonical, insertion-ordered collection of cards in a deck.
///
/// Not safe for concurrent mutation: callers sharing a store across threads
/// must synchronize externally.
#[derive(Clone, Debug, Default)]
pub struct DeckStore {
    cards: Vec<Card>,
}

impl DeckStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Appends a card to the canonical order and returns its identity.
    pub fn add(&mut self, card: Card) -> CardId {
        let id = card.id();
        log::debug!("Adding card {id} at position {}", self.cards.len());
        self.cards.push(card);
        id
    }

    /// Removes the card with the given identity.
    pub fn remove(&mut self, id: CardId) -> Result<Card, DeckError> {
        let index = self.find_index(id)?;
        Ok(self.cards.remove(index))
    }

    /// The canonical position of the card with the given identity.
    pub fn find_index(&self, id: CardId) -> Result<usize, DeckError> {
        self.cards
            .iter()
            .position(|card| card.id() == id)
            .ok_or(DeckError::CardNotFound(id))
    }

    /// The position of the first card whose sides equal the given text.
    /// Duplicates are legal, so this is only meaningful when the caller has
    /// text and no identity.
    pub fn position_of(&self, side_a: &str, side_b: &str) -> Option<usize> {
        self.cards
            .iter()
            .position(|card| card.side_a() == side_a && card.side_b() == side_b)
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id() == id)
    }

    /// Cards in canonical order.
    pub fn all(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Card identities in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(Card::id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card-for-card structural equality, in order.
    pub fn same_content(&self, other: &DeckStore) -> bool {
        self.len() == other.len()
            && self
                .all()
                .zip(other.all())
                .all(|(a, b)| a.same_content(b))
    }
}

impl FromIterator<Card> for DeckStore {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
