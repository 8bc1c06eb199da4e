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

use flashdeck_core::CardFilter;
use flashdeck_core::CardId;
use flashdeck_core::Difficulty;
use flashdeck_core::Flashcard;
use flashdeck_core::Response;
use flashdeck_core::Scope;
use flashdeck_core::Timestamp;
use flashdeck_core::deck_names;
use flashdeck_core::error::Fallible;
use flashdeck_core::error::fail;
use flashdeck_core::next_card_id;
use flashdeck_core::repository::Repository;
use flashdeck_core::review;

use crate::collection::Collection;

pub struct NewCard {
    pub question: String,
    pub answer: String,
    pub deck: String,
    pub difficulty: u8,
}

pub fn add_card(directory: Option<String>, new: NewCard, now: Timestamp) -> Fallible<CardId> {
    if new.question.trim().is_empty() || new.answer.trim().is_empty() {
        return fail("question and answer must not be empty.");
    }
    if new.deck.trim().is_empty() {
        return fail("deck must not be empty.");
    }
    let difficulty = Difficulty::new(new.difficulty)?;
    let Collection { mut db, .. } = Collection::new(directory)?;
    let cards: Vec<Flashcard> = db.all()?;
    let id = next_card_id(&cards)?;
    let card = Flashcard::new(id, new.question, new.answer, new.deck, difficulty, now);
    db.insert(card)?;
    println!("Added card {id}.");
    Ok(id)
}

pub fn delete_card(directory: Option<String>, id: u32) -> Fallible<()> {
    let Collection { mut db, .. } = Collection::new(directory)?;
    if !Repository::<Flashcard>::delete(&mut db, CardId::new(id))? {
        return fail(format!("no card with id {id}."));
    }
    println!("Deleted card {id}.");
    Ok(())
}

pub fn list_cards(
    directory: Option<String>,
    deck: Option<String>,
    due_only: bool,
    now: Timestamp,
) -> Fallible<()> {
    let Collection { db, config, .. } = Collection::new(directory)?;
    let cards: Vec<Flashcard> = db.all()?;
    let filter = CardFilter {
        deck,
        scope: if due_only { Scope::Due } else { Scope::All },
        limit: None,
    };
    let selected = filter.apply(&cards, now, config.review.due_policy);
    if selected.is_empty() {
        println!("No cards.");
    }
    for card in &selected {
        println!("{}", format_card_line(card));
    }
    Ok(())
}

pub fn list_decks(directory: Option<String>) -> Fallible<()> {
    let Collection { db, .. } = Collection::new(directory)?;
    let cards: Vec<Flashcard> = db.all()?;
    for deck in deck_names(&cards) {
        println!("{deck}");
    }
    Ok(())
}

/// Answer one card outside of a drill session.
pub fn review_card(
    directory: Option<String>,
    id: u32,
    response: Response,
    now: Timestamp,
) -> Fallible<Flashcard> {
    let Collection { mut db, .. } = Collection::new(directory)?;
    let Some(card) = db.get(CardId::new(id))? else {
        return fail(format!("no card with id {id}."));
    };
    let updated = review(card, response, now);
    db.update(updated.clone())?;
    log::debug!("Card {id} answered {}", response.as_str());
    println!("{}", format_card_line(&updated));
    Ok(updated)
}

fn format_card_line(card: &Flashcard) -> String {
    format!(
        "{:>4}  [{}]  {}  (difficulty {}, repetitions {}, next review {})",
        card.id.value(),
        card.deck,
        card.question,
        card.difficulty,
        card.repetitions,
        card.next_review.date()
    )
}
