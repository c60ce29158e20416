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
use crate::error::fail;
use crate::repository::CreateOutcome;
use crate::repository::create_empty;
use crate::repository::deck_path;

pub fn new_deck(name: &str, directory: Option<String>) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    match create_empty(name, &directory)? {
        CreateOutcome::Created => {
            println!("Created {}.", deck_path(name, &directory).display());
            Ok(())
        }
        CreateOutcome::AlreadyExists => fail(format!("deck \"{name}\" already exists.")),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::repository::exists;

    #[test]
    fn test_new_deck() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        new_deck("chemistry", Some(path.clone()))?;
        assert!(exists("chemistry", dir.path()));
        assert!(new_deck("chemistry", Some(path)).is_err());
        Ok(())
    }
}
