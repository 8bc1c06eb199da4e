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

//! flashdeck-core: Core library for the flashdeck flashcard tool.
//!
//! This library provides I/O-free types and algorithms for:
//! - The know / don't-know review scheduler
//! - Typed flashcard records and a generic repository abstraction
//! - Deck filtering, statistics and review sessions
//! - Markdown to HTML rendering of card text

pub mod config;
pub mod deck;
pub mod error;
pub mod markdown;
pub mod repository;
pub mod scheduler;
pub mod seed;
pub mod session;
pub mod stats;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use deck::{CardFilter, Scope, deck_names, next_card_id};
pub use error::{ErrorReport, Fallible, fail};
pub use repository::{InMemoryRepository, Record, Repository};
pub use scheduler::{DuePolicy, Response, is_due, is_mastered, mark_known, mark_unknown, review};
pub use session::ReviewSession;
pub use stats::{CollectionStats, DeckStats};
pub use types::flashcard::{CardId, Difficulty, Flashcard};
pub use types::timestamp::Timestamp;
