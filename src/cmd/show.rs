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

pub fn show_deck(name: &str, directory: Option<String>) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    let workspace = Workspace::load(name, &directory)?;
    let store = workspace.session()?.store();
    println!("{name}: {} cards", store.len());
    for (i, card) in store.all().enumerate() {
        println!("{}. {}", i + 1, card.side_a());
        println!("   {}", card.side_b());
    }
    Ok(())
}
