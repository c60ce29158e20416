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

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::codec::serialize;
use crate::error::DeckError;
use crate::store::DeckStore;
use crate::types::card::require_text;

/// The extension of deck files.
pub const DECK_EXTENSION: &str = "xml";

/// The result of creating a deck file.
#[derive(Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// The path of the file holding the deck `name` in `dir`.
pub fn deck_path(name: &str, dir: &Path) -> PathBuf {
    dir.join(format!("{name}.{DECK_EXTENSION}"))
}

pub fn exists(name: &str, dir: &Path) -> bool {
    deck_path(name, dir).is_file()
}

/// Creates a file holding an empty deck. An existing file is left alone.
pub fn create_empty(name: &str, dir: &Path) -> Result<CreateOutcome, DeckError> {
    require_text("deck name", name)?;
    let path = deck_path(name, dir);
    let contents = serialize(&DeckStore::new())?;
    let file = OpenOptions::new().write(true).create_new(true).open(&path);
    let mut file = match file {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            log::info!("Deck file {} already exists.", path.display());
            return Ok(CreateOutcome::AlreadyExists);
        }
        Err(source) => return Err(DeckError::Io { path, source }),
    };
    file.write_all(&contents)
        .map_err(|source| DeckError::Io {
            path: path.clone(),
            source,
        })?;
    log::info!("Created deck file {}.", path.display());
    Ok(CreateOutcome::Created)
}

pub fn read(name: &str, dir: &Path) -> Result<Vec<u8>, DeckError> {
    let path = deck_path(name, dir);
    match std::fs::read(&path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DeckError::DeckNotFound(path)),
        Err(source) => Err(DeckError::Io { path, source }),
    }
}

pub fn write(name: &str, dir: &Path, bytes: &[u8]) -> Result<(), DeckError> {
    let path = deck_path(name, dir);
    std::fs::write(&path, bytes).map_err(|source| DeckError::Io { path, source })
}

/// Names of the deck files directly inside `dir`, sorted.
pub fn list(dir: &Path) -> Result<Vec<String>, DeckError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            DeckError::Io { path, source }
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == DECK_EXTENSION) {
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}
