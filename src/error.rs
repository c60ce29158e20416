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

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::card_id::CardId;

/// Errors raised by the deck model, the codec, and the deck repository.
#[derive(Debug, Error)]
pub enum DeckError {
    /// User-supplied text is empty after trimming.
    #[error("{field} must not be blank.")]
    BlankField { field: &'static str },
    /// The deck has no cards, so there is nothing to edit or delete.
    #[error("no card selected.")]
    NoSelection,
    /// No deck is open in the workspace.
    #[error("no deck is open.")]
    NoDeckOpen,
    /// A card identity is missing from the deck. When raised by the session
    /// this means the working order and the canonical order have diverged.
    #[error("card {0} not found in deck.")]
    CardNotFound(CardId),
    /// The deck file does not exist.
    #[error("deck file not found: {}", .0.display())]
    DeckNotFound(PathBuf),
    /// The deck file is not a well-formed deck document.
    #[error("malformed deck file at byte {position}: {message}")]
    Format { position: u64, message: String },
    /// The filesystem refused a read or write.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeckError {
    pub fn format(position: u64, message: impl Into<String>) -> Self {
        DeckError::Format {
            position,
            message: message.into(),
        }
    }
}

/// A human-readable error, used at the command line boundary.
#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ErrorReport {}

impl From<DeckError> for ErrorReport {
    fn from(value: DeckError) -> Self {
        ErrorReport::new(&value.to_string())
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::new(&format!("I/O error: {value}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(&format!("JSON error: {value}"))
    }
}

impl From<walkdir::Error> for ErrorReport {
    fn from(value: walkdir::Error) -> Self {
        ErrorReport::new(&format!("directory walk error: {value}"))
    }
}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(message: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail() {
        let result: Fallible<()> = fail("directory does not exist.");
        assert_eq!(
            result,
            Err(ErrorReport::new("directory does not exist."))
        );
    }

    #[test]
    fn test_deck_error_message() {
        let report: ErrorReport = DeckError::BlankField { field: "side 1" }.into();
        assert_eq!(report.to_string(), "side 1 must not be blank.");
    }

    #[test]
    fn test_format_error_message() {
        let err = DeckError::format(12, "unexpected end of file");
        assert_eq!(
            err.to_string(),
            "malformed deck file at byte 12: unexpected end of file"
        );
    }
}
