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

use serde::Serialize;

use crate::cmd::resolve_directory;
use crate::error::DeckError;
use crate::error::Fallible;
use crate::workspace::OpenDeck;
use crate::workspace::Workspace;

pub fn export_deck(name: &str, directory: Option<String>) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    let workspace = Workspace::load(name, &directory)?;
    let deck = workspace.deck().ok_or(DeckError::NoDeckOpen)?;
    let export: Export = get_export(deck);
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    deck_name: String,
    file_path: String,
    cards: Vec<CardExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport {
    position: usize,
    side1: String,
    side2: String,
}

fn get_export(deck: &OpenDeck) -> Export {
    let cards = deck
        .session()
        .store()
        .all()
        .enumerate()
        .map(|(i, card)| CardExport {
            position: i + 1,
            side1: card.side_a().to_string(),
            side2: card.side_b().to_string(),
        })
        .collect();
    Export {
        deck_name: deck.name().to_string(),
        file_path: deck.path().display().to_string(),
        cards,
    }
}
