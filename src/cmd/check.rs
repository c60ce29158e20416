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

pub fn check_deck(name: &str, directory: Option<String>) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    let workspace = Workspace::load(name, &directory)?;
    let store = workspace.session()?.store();
    let incomplete = store.all().filter(|card| !card.is_complete()).count();
    if incomplete > 0 {
        log::warn!("{incomplete} cards have a blank side.");
    }
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::check_deck;
    use crate::error::Fallible;
    use crate::repository::create_empty;
    use crate::repository::write;

    #[test]
    fn test_non_existent_directory() {
        assert!(check_deck("deck", Some("./derpherp".to_string())).is_err());
    }

    #[test]
    fn test_valid_deck() -> Fallible<()> {
        let dir = tempdir()?;
        create_empty("deck", dir.path())?;
        assert!(check_deck("deck", Some(dir.path().display().to_string())).is_ok());
        Ok(())
    }

    #[test]
    fn test_malformed_deck() -> Fallible<()> {
        let dir = tempdir()?;
        write("deck", dir.path(), b"<flashcards><flashcard>")?;
        assert!(check_deck("deck", Some(dir.path().display().to_string())).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_deck() -> Fallible<()> {
        let dir = tempdir()?;
        assert!(check_deck("deck", Some(dir.path().display().to_string())).is_err());
        Ok(())
    }
}
