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

use crate::cmd::resolve_directory;
use crate::error::Fallible;
use crate::workspace::Workspace;

pub fn add_card(
    name: &str,
    side1: String,
    side2: String,
    directory: Option<String>,
) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    let mut workspace = Workspace::load(name, &directory)?;
    let session = workspace.session_mut()?;
    if let Some(index) = session.store().position_of(&side1, &side2) {
        log::warn!("{name} already has this card at position {}.", index + 1);
    }
    session.add_card(side1, side2)?;
    workspace.save()?;
    let count = workspace.session()?.len();
    println!("Added card {count} to {name}.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::codec::deserialize;
    use crate::repository::create_empty;
    use crate::repository::read;
    use crate::types::card::Card;

    #[test]
    fn test_add_card() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        create_empty("geography", dir.path())?;
        add_card(
            "geography",
            "Capital of Peru?".to_string(),
            "Lima".to_string(),
            Some(path.clone()),
        )?;
        add_card(
            "geography",
            "Capital of Chile?".to_string(),
            "Santiago".to_string(),
            Some(path),
        )?;
        let store = deserialize(&read("geography", dir.path())?)?;
        let answers: Vec<&str> = store.all().map(Card::side_b).collect();
        assert_eq!(answers, vec!["Lima", "Santiago"]);
        Ok(())
    }

    #[test]
    fn test_add_blank_card() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        create_empty("geography", dir.path())?;
        let result = add_card("geography", " ".to_string(), "Lima".to_string(), Some(path));
        assert!(result.is_err());
        let store = deserialize(&read("geography", dir.path())?)?;
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_add_to_missing_deck() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        let result = add_card("nope", "Q".to_string(), "A".to_string(), Some(path));
        assert!(result.is_err());
        Ok(())
    }
}
