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

use clap::Parser;

use crate::cmd::add::add_card;
use crate::cmd::check::check_deck;
use crate::cmd::export::export_deck;
use crate::cmd::list::list_decks;
use crate::cmd::new::new_deck;
use crate::cmd::show::show_deck;
use crate::cmd::study::study_deck;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Create a new, empty deck.
    New {
        /// Name of the deck.
        name: String,
        /// Optional path to the deck directory.
        directory: Option<String>,
    },
    /// List the decks in a directory.
    List {
        /// Optional path to the deck directory.
        directory: Option<String>,
    },
    /// Print the cards of a deck in their original order.
    Show {
        /// Name of the deck.
        name: String,
        /// Optional path to the deck directory.
        directory: Option<String>,
    },
    /// Add a card to a deck.
    Add {
        /// Name of the deck.
        name: String,
        /// Text of the front side.
        side1: String,
        /// Text of the back side.
        side2: String,
        /// Optional path to the deck directory.
        directory: Option<String>,
    },
    /// Check that a deck file can be read.
    Check {
        /// Name of the deck.
        name: String,
        /// Optional path to the deck directory.
        directory: Option<String>,
    },
    /// Export a deck as JSON.
    Export {
        /// Name of the deck.
        name: String,
        /// Optional path to the deck directory.
        directory: Option<String>,
    },
    /// Browse and edit a deck interactively.
    Study {
        /// Name of the deck.
        name: String,
        /// Optional path to the deck directory.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::New { name, directory } => new_deck(&name, directory),
        Command::List { directory } => list_decks(directory),
        Command::Show { name, directory } => show_deck(&name, directory),
        Command::Add {
            name,
            side1,
            side2,
            directory,
        } => add_card(&name, side1, side2, directory),
        Command::Check { name, directory } => check_deck(&name, directory),
        Command::Export { name, directory } => export_deck(&name, directory),
        Command::Study { name, directory } => study_deck(&name, directory),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Command::try_parse_from(["flashdeck", "add", "spanish", "hola", "hello", "/decks"]);
        match cli {
            Ok(Command::Add {
                name,
                side1,
                side2,
                directory,
            }) => {
                assert_eq!(name, "spanish");
                assert_eq!(side1, "hola");
                assert_eq!(side2, "hello");
                assert_eq!(directory.as_deref(), Some("/decks"));
            }
            _ => panic!("expected the add command"),
        }
    }

    #[test]
    fn test_directory_is_optional() {
        let cli = Command::try_parse_from(["flashdeck", "study", "spanish"]);
        assert!(matches!(cli, Ok(Command::Study { directory: None, .. })));
    }
}
