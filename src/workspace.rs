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

use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use blake3::Hash;

use crate::codec::deserialize;
use crate::codec::serialize;
use crate::error::DeckError;
use crate::repository;
use crate::repository::CreateOutcome;
use crate::session::Session;
use crate::store::DeckStore;

/// The answer to "save changes before closing?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Save,
    Discard,
    Cancel,
}

/// A deck loaded from a file, together with its session.
pub struct OpenDeck {
    name: String,
    directory: PathBuf,
    session: Session,
    /// Digest of the deck as it was last read or written.
    saved: Hash,
}

impl OpenDeck {
    fn new(name: &str, directory: &Path, store: DeckStore) -> Result<Self, DeckError> {
        let saved = digest(&store)?;
        Ok(Self {
            name: name.to_string(),
            directory: directory.to_path_buf(),
            session: Session::load(store),
            saved,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path(&self) -> PathBuf {
        repository::deck_path(&self.name, &self.directory)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// True if the cards differ from what is on disk. Reordering the working
    /// order is not a change; only the canonical order is persisted.
    pub fn is_dirty(&self) -> bool {
        match digest(self.session.store()) {
            Ok(current) => current != self.saved,
            Err(_) => true,
        }
    }

    fn save(&mut self) -> Result<(), DeckError> {
        let start = Instant::now();
        let bytes = serialize(self.session.store())?;
        repository::write(&self.name, &self.directory, &bytes)?;
        self.saved = blake3::hash(&bytes);
        let duration = start.elapsed().as_millis();
        log::debug!("Deck saved in {duration}ms.");
        log::info!("Saved {} cards to {}.", self.session.store().len(), self.path().display());
        Ok(())
    }
}

fn digest(store: &DeckStore) -> Result<Hash, DeckError> {
    Ok(blake3::hash(&serialize(store)?))
}

/// Owns the deck currently being worked on. At most one deck is open at a
/// time; opening another replaces it.
#[derive(Default)]
pub struct Workspace {
    deck: Option<OpenDeck>,
}

impl Workspace {
    pub fn new() -> Self {
        Self { deck: None }
    }

    /// A workspace with the named deck open.
    pub fn load(name: &str, directory: &Path) -> Result<Self, DeckError> {
        let mut workspace = Self::new();
        workspace.open(name, directory, Confirmation::Cancel)?;
        Ok(workspace)
    }

    pub fn deck(&self) -> Option<&OpenDeck> {
        self.deck.as_ref()
    }

    pub fn session(&self) -> Result<&Session, DeckError> {
        self.deck
            .as_ref()
            .map(OpenDeck::session)
            .ok_or(DeckError::NoDeckOpen)
    }

    pub fn session_mut(&mut self) -> Result<&mut Session, DeckError> {
        self.deck
            .as_mut()
            .map(OpenDeck::session_mut)
            .ok_or(DeckError::NoDeckOpen)
    }

    /// Creates an empty deck file and opens it in place of the current deck.
    /// Returns `None` if the caller cancelled. If the file already exists
    /// nothing is opened.
    pub fn create(
        &mut self,
        name: &str,
        directory: &Path,
        choice: Confirmation,
    ) -> Result<Option<CreateOutcome>, DeckError> {
        if !self.settle(choice)? {
            return Ok(None);
        }
        let outcome = repository::create_empty(name, directory)?;
        if outcome == CreateOutcome::Created {
            self.replace(OpenDeck::new(name, directory, DeckStore::new())?);
        }
        Ok(Some(outcome))
    }

    /// Loads a deck file in place of the current deck. Returns false if the
    /// caller cancelled. On failure the previously open deck stays open.
    pub fn open(
        &mut self,
        name: &str,
        directory: &Path,
        choice: Confirmation,
    ) -> Result<bool, DeckError> {
        if !self.settle(choice)? {
            return Ok(false);
        }
        log::debug!("Loading deck...");
        let start = Instant::now();
        let bytes = repository::read(name, directory)?;
        let store = deserialize(&bytes)?;
        let deck = OpenDeck::new(name, directory, store)?;
        let duration = start.elapsed().as_millis();
        log::debug!("Deck loaded in {duration}ms.");
        self.replace(deck);
        Ok(true)
    }

    /// Writes the open deck in canonical order.
    pub fn save(&mut self) -> Result<(), DeckError> {
        self.deck.as_mut().ok_or(DeckError::NoDeckOpen)?.save()
    }

    pub fn is_dirty(&self) -> bool {
        self.deck.as_ref().is_some_and(OpenDeck::is_dirty)
    }

    /// Closes the open deck, saving first if asked to. Returns false if the
    /// caller cancelled. A failed save keeps the deck open and is returned as
    /// an error, so the close does not go ahead.
    pub fn close(&mut self, choice: Confirmation) -> Result<bool, DeckError> {
        if !self.settle(choice)? {
            return Ok(false);
        }
        self.deck = None;
        Ok(true)
    }

    /// Applies the answer to "save changes?" before the open deck is let go.
    /// Clean decks need no answer.
    fn settle(&mut self, choice: Confirmation) -> Result<bool, DeckError> {
        let Some(deck) = self.deck.as_mut() else {
            return Ok(true);
        };
        if deck.is_dirty() {
            match choice {
                Confirmation::Save => deck.save()?,
                Confirmation::Discard => {
                    log::info!("Discarding unsaved changes to {}.", deck.name());
                }
                Confirmation::Cancel => return Ok(false),
            }
        }
        Ok(true)
    }

    fn replace(&mut self, deck: OpenDeck) {
        if let Some(previous) = &self.deck {
            log::debug!("Closing deck {}.", previous.name());
        }
        self.deck = Some(deck);
    }
}
