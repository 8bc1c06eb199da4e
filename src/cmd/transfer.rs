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

//! Moving a collection in and out as JSON. The format is the array the
//! browser front-end keeps in `localStorage`.

use std::fs::read_to_string;
use std::fs::write;

use flashdeck_core::Flashcard;
use flashdeck_core::error::Fallible;
use flashdeck_core::repository::Repository;

use crate::collection::Collection;

pub fn export_collection(directory: Option<String>, output: Option<String>) -> Fallible<()> {
    let Collection { db, .. } = Collection::new(directory)?;
    let cards: Vec<Flashcard> = db.all()?;
    let json = serde_json::to_string_pretty(&cards)?;
    match output {
        Some(path) => {
            write(&path, json)?;
            log::info!("Exported {} cards to {path}", cards.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Replace the collection with the cards in `input`. Returns the number of
/// cards imported.
pub fn import_collection(directory: Option<String>, input: String) -> Fallible<usize> {
    let Collection { mut db, .. } = Collection::new(directory)?;
    let json = read_to_string(&input)?;
    let cards: Vec<Flashcard> = serde_json::from_str(&json)?;
    let count = cards.len();
    db.replace_all(cards)?;
    println!("Imported {count} cards.");
    Ok(count)
}
