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

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::DeckError;
use crate::store::DeckStore;
use crate::types::card::Card;
use crate::types::card::Face;
use crate::types::card::require_text;
use crate::types::card_id::CardId;

/// Shown in place of a card when the deck is empty.
pub const NO_CARD_SELECTED: &str = "No card selected.";

/// A navigable, reorderable view over a deck.
///
/// The session owns the deck store and is the only writer of the working
/// order. Every card in the store appears exactly once in the working order,
/// and the original order is always read from the store rather than from a
/// snapshot.
///
/// Not safe for concurrent mutation: the working order and the store are
/// updated in two steps.
#[derive(Debug)]
pub struct Session {
    store: DeckStore,
    working: Vec<CardId>,
    cursor: Option<usize>,
    face: Face,
}

impl Session {
    /// Wraps a freshly loaded store, in canonical order.
    pub fn load(store: DeckStore) -> Self {
        let working: Vec<CardId> = store.ids().collect();
        let cursor = first_index(&working);
        log::debug!("Session loaded with {} cards.", working.len());
        Self {
            store,
            working,
            cursor,
            face: Face::Front,
        }
    }

    pub fn store(&self) -> &DeckStore {
        &self.store
    }

    pub fn into_store(self) -> DeckStore {
        self.store
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Cards in working order.
    pub fn working(&self) -> impl Iterator<Item = &Card> {
        self.working.iter().filter_map(|id| self.lookup(*id))
    }

    /// True if the working order matches the canonical order.
    pub fn is_original_order(&self) -> bool {
        self.working.iter().copied().eq(self.store.ids())
    }

    /// The selected card, or `None` if the deck is empty.
    pub fn current(&self) -> Option<&Card> {
        let index = self.cursor?;
        self.lookup(self.working[index])
    }

    /// The text on the face of the selected card.
    pub fn current_text(&self) -> &str {
        match self.current() {
            Some(card) => card.side(self.face),
            None => NO_CARD_SELECTED,
        }
    }

    /// Turns the card over. The face is kept when navigating.
    pub fn flip(&mut self) -> Face {
        self.face = self.face.flipped();
        self.face
    }

    /// Moves the cursor by `delta`, wrapping around both ends.
    pub fn advance(&mut self, delta: i64) -> Option<&Card> {
        if let Some(index) = self.cursor {
            let n = self.working.len() as i64;
            let next = (index as i64 + delta.rem_euclid(n)) % n;
            self.cursor = Some(next as usize);
        }
        self.current()
    }

    /// Shuffles the working order with the thread-local generator.
    pub fn shuffle(&mut self) {
        let mut rng = rand::thread_rng();
        self.shuffle_with(&mut rng);
    }

    /// Shuffles the working order uniformly. The canonical order is left as
    /// it is.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.working.shuffle(rng);
        self.cursor = first_index(&self.working);
        log::debug!("Shuffled {} cards.", self.working.len());
    }

    /// Resets the working order to the store's current canonical order.
    pub fn restore_original_order(&mut self) {
        self.working = self.store.ids().collect();
        self.cursor = first_index(&self.working);
    }

    /// Appends a new card to both orders and selects it.
    pub fn add_card(
        &mut self,
        side_a: impl Into<String>,
        side_b: impl Into<String>,
    ) -> Result<CardId, DeckError> {
        let side_a = side_a.into();
        let side_b = side_b.into();
        require_text("side 1", &side_a)?;
        require_text("side 2", &side_b)?;
        let id = self.store.add(Card::new(side_a, side_b));
        self.working.push(id);
        self.cursor = Some(self.working.len() - 1);
        Ok(id)
    }

    /// Replaces both sides of the selected card.
    pub fn edit_current(
        &mut self,
        side_a: impl Into<String>,
        side_b: impl Into<String>,
    ) -> Result<(), DeckError> {
        let index = self.cursor.ok_or(DeckError::NoSelection)?;
        let side_a = side_a.into();
        let side_b = side_b.into();
        require_text("side 1", &side_a)?;
        require_text("side 2", &side_b)?;
        let id = self.working[index];
        match self.store.get_mut(id) {
            Some(card) => {
                card.set_side_a(side_a);
                card.set_side_b(side_b);
                Ok(())
            }
            None => {
                self.diverged(id);
                Err(DeckError::CardNotFound(id))
            }
        }
    }

    /// Removes the selected card from both orders and selects the card that
    /// followed it.
    pub fn delete_current(&mut self) -> Result<Card, DeckError> {
        let index = self.cursor.ok_or(DeckError::NoSelection)?;
        let id = self.working[index];
        let last = self.working.len() - 1;
        let removed = match self.store.remove(id) {
            Ok(card) => card,
            Err(e) => {
                self.diverged(id);
                return Err(e);
            }
        };
        self.working.remove(index);
        // The successor of the last card is the first card.
        self.cursor = if self.working.is_empty() {
            None
        } else if index == last {
            Some(0)
        } else {
            Some(index)
        };
        Ok(removed)
    }

    fn lookup(&self, id: CardId) -> Option<&Card> {
        let card = self.store.get(id);
        if card.is_none() {
            self.diverged(id);
        }
        card
    }

    /// The working order names a card the deck lacks. Fatal in debug builds.
    fn diverged(&self, id: CardId) {
        log::error!("Card {id} is in the working order but not in the deck.");
        debug_assert!(
            self.store.get(id).is_some(),
            "working order and deck diverged on card {id}"
        );
    }
}

fn first_index(working: &[CardId]) -> Option<usize> {
    if working.is_empty() { None } else { Some(0) }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn session_of(cards: &[(&str, &str)]) -> Session {
        let store: DeckStore = cards.iter().map(|(a, b)| Card::new(*a, *b)).collect();
        Session::load(store)
    }

    fn working_fronts(session: &Session) -> Vec<&str> {
        session.working().map(Card::side_a).collect()
    }

    fn canonical_fronts(session: &Session) -> Vec<&str> {
        session.store().all().map(Card::side_a).collect()
    }

    fn current_front(session: &Session) -> Option<&str> {
        session.current().map(Card::side_a)
    }

    #[test]
    fn test_load_selects_first_card() {
        let session = session_of(&[("A", "1"), ("B", "2")]);
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(current_front(&session), Some("A"));
        assert!(session.is_original_order());
    }

    #[test]
    fn test_empty_deck() {
        let mut session = Session::load(DeckStore::new());
        assert_eq!(session.cursor(), None);
        assert!(session.current().is_none());
        assert_eq!(session.current_text(), NO_CARD_SELECTED);
        assert!(session.advance(1).is_none());
        assert!(session.advance(-3).is_none());
        assert_eq!(session.cursor(), None);
        session.shuffle();
        session.restore_original_order();
        assert_eq!(session.cursor(), None);
    }

    #[test]
    fn test_empty_deck_rejects_edit_and_delete() {
        let mut session = Session::load(DeckStore::new());
        assert!(matches!(
            session.edit_current("Q", "A"),
            Err(DeckError::NoSelection)
        ));
        assert!(matches!(
            session.delete_current(),
            Err(DeckError::NoSelection)
        ));
    }

    #[test]
    fn test_single_card_wraps_to_itself() {
        let mut session = session_of(&[("Q1", "A1")]);
        let id = session.current().map(Card::id);
        session.advance(1);
        session.advance(1);
        assert_eq!(session.current().map(Card::id), id);
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn test_wrap_around() {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3")]);
        session.advance(-1);
        assert_eq!(current_front(&session), Some("C"));
        session.advance(1);
        assert_eq!(current_front(&session), Some("A"));
        session.advance(2);
        assert_eq!(current_front(&session), Some("C"));
        session.advance(1);
        assert_eq!(current_front(&session), Some("A"));
    }

    #[test]
    fn test_advance_is_modular() {
        for n in 1..6_i64 {
            let cards: Vec<(String, String)> =
                (0..n).map(|i| (format!("Q{i}"), format!("A{i}"))).collect();
            let store: DeckStore = cards.iter().map(|(a, b)| Card::new(a, b)).collect();
            for start in 0..n {
                for delta in [-13, -7, -1, 0, 1, 2, 5, 11, i64::MAX, i64::MIN] {
                    let mut session = Session::load(store.clone());
                    session.advance(start);
                    session.advance(delta);
                    let expected = ((start as i128 + delta as i128).rem_euclid(n as i128)) as usize;
                    assert_eq!(session.cursor(), Some(expected), "n={n} start={start} delta={delta}");
                }
            }
        }
    }

    #[test]
    fn test_shuffle_preserves_content() {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4"), ("E", "5")]);
        let mut rng = StdRng::seed_from_u64(7);
        session.shuffle_with(&mut rng);
        assert_eq!(session.cursor(), Some(0));
        let mut shuffled = working_fronts(&session);
        shuffled.sort();
        assert_eq!(shuffled, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(canonical_fronts(&session), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_shuffle_eventually_reorders() {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut moved = false;
        for _ in 0..20 {
            session.shuffle_with(&mut rng);
            if !session.is_original_order() {
                moved = true;
                break;
            }
        }
        assert!(moved);
    }

    #[test]
    fn test_restore_reflects_additions() -> Result<(), DeckError> {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3")]);
        let mut rng = StdRng::seed_from_u64(3);
        session.shuffle_with(&mut rng);
        session.add_card("D", "4")?;
        session.restore_original_order();
        assert_eq!(working_fronts(&session), vec!["A", "B", "C", "D"]);
        assert_eq!(session.cursor(), Some(0));
        assert!(session.is_original_order());
        Ok(())
    }

    #[test]
    fn test_add_card_lockstep() -> Result<(), DeckError> {
        let mut session = session_of(&[("A", "1")]);
        let id = session.add_card("B", "2")?;
        assert_eq!(session.cursor(), Some(1));
        assert_eq!(session.current().map(Card::id), Some(id));
        assert_eq!(session.store().ids().filter(|i| *i == id).count(), 1);
        assert_eq!(session.working().filter(|c| c.id() == id).count(), 1);
        Ok(())
    }

    #[test]
    fn test_add_card_to_empty_deck() -> Result<(), DeckError> {
        let mut session = Session::load(DeckStore::new());
        session.add_card("Q", "A")?;
        assert_eq!(session.cursor(), Some(0));
        assert_eq!(current_front(&session), Some("Q"));
        Ok(())
    }

    #[test]
    fn test_blank_rejection_leaves_deck_unchanged() {
        let mut session = session_of(&[("A", "1")]);
        for (a, b) in [("", "x"), ("  ", "x"), ("x", ""), ("x", "\n\t")] {
            assert!(matches!(
                session.add_card(a, b),
                Err(DeckError::BlankField { .. })
            ));
        }
        assert_eq!(session.len(), 1);
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn test_edit_current_in_place() -> Result<(), DeckError> {
        let mut session = session_of(&[("A", "1"), ("B", "2")]);
        let mut rng = StdRng::seed_from_u64(11);
        session.shuffle_with(&mut rng);
        session.advance(1);
        let id = session.current().map(Card::id);
        session.edit_current("B'", "2'")?;
        assert_eq!(session.current().map(Card::id), id);
        assert_eq!(current_front(&session), Some("B'"));
        let in_store = session
            .store()
            .all()
            .find(|c| Some(c.id()) == id)
            .map(Card::side_b);
        assert_eq!(in_store, Some("2'"));
        Ok(())
    }

    #[test]
    fn test_edit_rejects_blank() {
        let mut session = session_of(&[("A", "1")]);
        assert!(matches!(
            session.edit_current("A", " "),
            Err(DeckError::BlankField { field: "side 2" })
        ));
        assert_eq!(session.current().map(Card::side_b), Some("1"));
    }

    #[test]
    fn test_delete_first_of_three() -> Result<(), DeckError> {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3")]);
        let removed = session.delete_current()?;
        assert_eq!(removed.side_a(), "A");
        assert_eq!(working_fronts(&session), vec!["B", "C"]);
        assert_eq!(canonical_fronts(&session), vec!["B", "C"]);
        assert_eq!(current_front(&session), Some("B"));
        Ok(())
    }

    #[test]
    fn test_delete_last_position_wraps() -> Result<(), DeckError> {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3")]);
        session.advance(-1);
        session.delete_current()?;
        assert_eq!(working_fronts(&session), vec!["A", "B"]);
        assert_eq!(current_front(&session), Some("A"));
        Ok(())
    }

    #[test]
    fn test_delete_middle() -> Result<(), DeckError> {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3")]);
        session.advance(1);
        session.delete_current()?;
        assert_eq!(current_front(&session), Some("C"));
        assert_eq!(session.cursor(), Some(1));
        Ok(())
    }

    #[test]
    fn test_delete_only_card() -> Result<(), DeckError> {
        let mut session = session_of(&[("Q1", "A1")]);
        session.delete_current()?;
        assert!(session.is_empty());
        assert!(session.store().is_empty());
        assert_eq!(session.cursor(), None);
        assert_eq!(session.current_text(), NO_CARD_SELECTED);
        Ok(())
    }

    #[test]
    fn test_delete_duplicate_removes_the_selected_one() -> Result<(), DeckError> {
        let mut session = session_of(&[("Q", "A"), ("X", "Y"), ("Q", "A")]);
        session.advance(-1);
        let target = session.current().map(Card::id);
        let removed = session.delete_current()?;
        assert_eq!(Some(removed.id()), target);
        let survivors: Vec<CardId> = session.store().ids().collect();
        assert_eq!(survivors.len(), 2);
        assert!(!survivors.iter().any(|id| Some(*id) == target));
        assert_eq!(session.store().position_of("Q", "A"), Some(0));
        Ok(())
    }

    #[test]
    fn test_delete_in_shuffled_order() -> Result<(), DeckError> {
        let mut session = session_of(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")]);
        let mut rng = StdRng::seed_from_u64(5);
        session.shuffle_with(&mut rng);
        session.advance(2);
        let doomed = session.current().map(Card::id);
        session.delete_current()?;
        assert!(session.working().all(|c| Some(c.id()) != doomed));
        assert!(session.store().all().all(|c| Some(c.id()) != doomed));
        assert_eq!(session.len(), session.store().len());
        Ok(())
    }

    #[test]
    fn test_flip_persists_across_navigation() {
        let mut session = session_of(&[("A", "1"), ("B", "2")]);
        assert_eq!(session.current_text(), "A");
        session.flip();
        assert_eq!(session.current_text(), "1");
        session.advance(1);
        assert_eq!(session.current_text(), "2");
        assert_eq!(session.flip(), Face::Front);
        assert_eq!(session.current_text(), "B");
    }

    fn diverged_session() -> Session {
        let mut session = session_of(&[("A", "1"), ("B", "2")]);
        if let Some(id) = session.current().map(Card::id) {
            let _ = session.store.remove(id);
        }
        session
    }

    #[test]
    #[should_panic(expected = "diverged")]
    fn test_divergence_on_delete() {
        let mut session = diverged_session();
        let _ = session.delete_current();
    }

    #[test]
    #[should_panic(expected = "diverged")]
    fn test_divergence_on_edit() {
        let mut session = diverged_session();
        let _ = session.edit_current("Q", "A");
    }

    #[test]
    #[should_panic(expected = "diverged")]
    fn test_divergence_on_current() {
        let session = diverged_session();
        let _ = session.current();
    }

    #[test]
    #[should_panic(expected = "diverged")]
    fn test_divergence_on_working() {
        let session = diverged_session();
        let _ = session.working().count();
    }
}
