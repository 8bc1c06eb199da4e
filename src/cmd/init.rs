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

use flashdeck_core::Flashcard;
use flashdeck_core::error::Fallible;
use flashdeck_core::repository::Repository;
use flashdeck_core::seed::seed_flashcards;

use crate::collection::Collection;

/// Create the collection database, seeding it with sample cards unless
/// `empty` is set or it already holds cards. Returns the number of cards
/// inserted.
pub fn init_collection(directory: Option<String>, empty: bool) -> Fallible<usize> {
    let Collection { directory, mut db, .. } = Collection::new(directory)?;
    let existing = db.count::<Flashcard>()?;
    let inserted = if empty || existing > 0 {
        0
    } else {
        let cards = seed_flashcards();
        let count = cards.len();
        db.replace_all(cards)?;
        count
    };
    log::info!(
        "Initialized collection in {} ({existing} existing, {inserted} inserted)",
        directory.display()
    );
    Ok(inserted)
}
