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
use crate::types::card_id::CardId;

/// A two-sided study card.
#[derive(Clone, Debug)]
pub struct Card {
    /// Identity used to reconcile the working and canonical orders.
    id: CardId,
    /// The front of the card.
    side_a: String,
    /// The back of the card.
    side_b: String,
}

/// Which side of a card is facing the user.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub fn flipped(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }
}

impl Card {
    pub fn new(side_a: impl Into<String>, side_b: impl Into<String>) -> Self {
        Self {
            id: CardId::fresh(),
            side_a: side_a.into(),
            side_b: side_b.into(),
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn side_a(&self) -> &str {
        &self.side_a
    }

    pub fn side_b(&self) -> &str {
        &self.side_b
    }

    pub fn side(&self, face: Face) -> &str {
        match face {
            Face::Front => &self.side_a,
            Face::Back => &self.side_b,
        }
    }

    pub fn set_side_a(&mut self, text: impl Into<String>) {
        self.side_a = text.into();
    }

    pub fn set_side_b(&mut self, text: impl Into<String>) {
        self.side_b = text.into();
    }

    /// Structural comparison of both sides, ignoring identity.
    pub fn same_content(&self, other: &Card) -> bool {
        self.side_a == other.side_a && self.side_b == other.side_b
    }

    /// True if both sides hold something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !is_blank(&self.side_a) && !is_blank(&self.side_b)
    }
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Rejects text that is empty or pure whitespace.
pub fn require_text(field: &'static str, text: &str) -> Result<(), DeckError> {
    if is_blank(text) {
        Err(DeckError::BlankField { field })
    } else {
        Ok(())
    }
}
