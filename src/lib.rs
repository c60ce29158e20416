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

//! A manager for two-sided flashcard decks. Each deck is one XML file in a
//! directory. A deck is browsed and edited through a session, which keeps
//! a working order over the deck's canonical order.
//!
//! Nothing here is thread-safe: a deck is owned by one session at a time.

pub mod cli;
pub mod cmd;
pub mod codec;
pub mod error;
pub mod repository;
pub mod session;
pub mod store;
pub mod types;
pub mod workspace;
