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

//! WASM bindings for flashdeck - runs the flashcard reviewer in the browser.
//!
//! The whole collection lives in memory and is written back to
//! `localStorage` after every change.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::console;

use flashdeck_core::CardFilter;
use flashdeck_core::CollectionStats;
use flashdeck_core::DuePolicy;
use flashdeck_core::Response;
use flashdeck_core::ReviewSession;
use flashdeck_core::Scope;
use flashdeck_core::deck::deck_names;
use flashdeck_core::deck::next_card_id;
use flashdeck_core::error::ErrorReport;
use flashdeck_core::error::Fallible;
use flashdeck_core::error::fail;
use flashdeck_core::markdown::markdown_to_html_inline;
use flashdeck_core::repository::InMemoryRepository;
use flashdeck_core::repository::Repository;
use flashdeck_core::seed::seed_flashcards;
use flashdeck_core::types::flashcard::CardId;
use flashdeck_core::types::flashcard::Difficulty;
use flashdeck_core::types::flashcard::Flashcard;
use flashdeck_core::types::timestamp::Timestamp;

mod storage;

use storage::Storage;

const STORAGE_KEY: &str = "flashcards";

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"flashdeck WASM initialized".into());
}

fn js_error(err: ErrorReport) -> JsValue {
    JsValue::from_str(err.message())
}

fn parse_now(now_str: &str) -> Fallible<Timestamp> {
    Timestamp::parse(now_str)
}

/// Session progress, as handed to JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Progress {
    total: usize,
    reviewed: usize,
    remaining: usize,
    known: usize,
    unknown: usize,
    percent_done: usize,
    finished: bool,
}

/// The main application state managed from JavaScript.
#[wasm_bindgen]
pub struct FlashdeckApp {
    cards: InMemoryRepository<Flashcard>,
    session: Option<ReviewSession>,
    storage: Storage,
}

#[wasm_bindgen]
impl FlashdeckApp {
    /// Load the collection from localStorage, or start from the sample cards.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<FlashdeckApp, JsValue> {
        Self::load(Storage::new()).map_err(js_error)
    }

    /// Deck names as a JSON array.
    #[wasm_bindgen]
    pub fn deck_names(&self) -> Result<String, JsValue> {
        let cards = self.cards.all().map_err(js_error)?;
        serde_json::to_string(&deck_names(&cards)).map_err(|e| js_error(e.into()))
    }

    /// Collection statistics as JSON.
    #[wasm_bindgen]
    pub fn stats(&self, now_str: &str) -> Result<String, JsValue> {
        self.stats_json(now_str).map_err(js_error)
    }

    /// Start a session over the due cards (or every card, if `all`).
    /// Returns the number of cards in it.
    #[wasm_bindgen]
    pub fn start_session(
        &mut self,
        now_str: &str,
        deck: Option<String>,
        all: bool,
        card_limit: Option<usize>,
    ) -> Result<usize, JsValue> {
        let now = parse_now(now_str).map_err(js_error)?;
        let filter = CardFilter {
            deck,
            scope: if all { Scope::All } else { Scope::Due },
            limit: card_limit,
        };
        self.start(&filter, now).map_err(js_error)
    }

    /// Whether a session is running and has a card to show.
    #[wasm_bindgen]
    pub fn has_card(&self) -> bool {
        self.current_card().is_some()
    }

    #[wasm_bindgen]
    pub fn current_question_html(&self) -> Option<String> {
        self.current_card()
            .map(|card| markdown_to_html_inline(&card.question))
    }

    /// The answer of the current card, once it has been revealed.
    #[wasm_bindgen]
    pub fn current_answer_html(&self) -> Option<String> {
        if !self.is_revealed() {
            return None;
        }
        self.current_card()
            .map(|card| markdown_to_html_inline(&card.answer))
    }

    #[wasm_bindgen]
    pub fn current_deck_name(&self) -> Option<String> {
        self.current_card().map(|card| card.deck)
    }

    #[wasm_bindgen]
    pub fn current_difficulty(&self) -> Option<u8> {
        self.current_card().map(|card| card.difficulty.value())
    }

    #[wasm_bindgen]
    pub fn is_revealed(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_revealed())
    }

    #[wasm_bindgen]
    pub fn reveal(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reveal();
        }
    }

    #[wasm_bindgen]
    pub fn know(&mut self, now_str: &str) -> Result<(), JsValue> {
        let now = parse_now(now_str).map_err(js_error)?;
        self.answer(Response::Know, now).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn dont_know(&mut self, now_str: &str) -> Result<(), JsValue> {
        let now = parse_now(now_str).map_err(js_error)?;
        self.answer(Response::DontKnow, now).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn skip(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.skip();
        }
    }

    /// Revert the last answer. Returns whether there was one.
    #[wasm_bindgen]
    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.undo_last().map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn end_session(&mut self, now_str: &str) -> Result<(), JsValue> {
        let now = parse_now(now_str).map_err(js_error)?;
        if let Some(session) = self.session.as_mut() {
            session.end(now);
        }
        Ok(())
    }

    /// Session progress as JSON, or `null` outside a session.
    #[wasm_bindgen]
    pub fn progress(&self) -> Result<String, JsValue> {
        let progress = self.session.as_ref().map(|s| Progress {
            total: s.total(),
            reviewed: s.reviewed(),
            remaining: s.remaining(),
            known: s.known(),
            unknown: s.unknown(),
            percent_done: s.percent_done(),
            finished: s.is_finished(),
        });
        serde_json::to_string(&progress).map_err(|e| js_error(e.into()))
    }

    /// Add a card. Returns its id.
    #[wasm_bindgen]
    pub fn add_card(
        &mut self,
        question: &str,
        answer: &str,
        deck: &str,
        difficulty: u8,
        now_str: &str,
    ) -> Result<u32, JsValue> {
        let now = parse_now(now_str).map_err(js_error)?;
        self.create_card(question, answer, deck, difficulty, now)
            .map(CardId::value)
            .map_err(js_error)
    }

    /// Delete a card, dropping it from the running session too.
    #[wasm_bindgen]
    pub fn delete_card(&mut self, id: u32, now_str: &str) -> Result<bool, JsValue> {
        let now = parse_now(now_str).map_err(js_error)?;
        self.remove_card(CardId::new(id), now).map_err(js_error)
    }

    /// Every card as a JSON array.
    #[wasm_bindgen]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.serialize().map_err(js_error)
    }

    /// Replace the collection with a JSON export. Returns the number of cards.
    #[wasm_bindgen]
    pub fn import_json(&mut self, json: &str) -> Result<usize, JsValue> {
        self.import(json).map_err(js_error)
    }

    /// Throw away all changes and go back to the sample cards.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.replace(seed_flashcards()).map_err(js_error)
    }
}

impl FlashdeckApp {
    fn load(storage: Storage) -> Fallible<Self> {
        let cards = match storage.get(STORAGE_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                ErrorReport::new(format!("stored flashcards are unreadable: {e}"))
            })?,
            None => seed_flashcards(),
        };
        let app = Self {
            cards: InMemoryRepository::from_records(cards)?,
            session: None,
            storage,
        };
        app.save()?;
        Ok(app)
    }

    fn serialize(&self) -> Fallible<String> {
        let cards = self.cards.all()?;
        Ok(serde_json::to_string(&cards)?)
    }

    fn save(&self) -> Fallible<()> {
        self.storage.set(STORAGE_KEY, &self.serialize()?)
    }

    fn stats_json(&self, now_str: &str) -> Fallible<String> {
        let now = parse_now(now_str)?;
        let cards = self.cards.all()?;
        let stats = CollectionStats::new(&cards, now, DuePolicy::default());
        Ok(serde_json::to_string(&stats)?)
    }

    fn start(&mut self, filter: &CardFilter, now: Timestamp) -> Fallible<usize> {
        let cards = self.cards.all()?;
        let session = ReviewSession::new(&cards, filter, DuePolicy::default(), now);
        let total = session.total();
        self.session = Some(session);
        Ok(total)
    }

    fn current_card(&self) -> Option<Flashcard> {
        let id = self.session.as_ref()?.current()?;
        self.cards.get(id).ok().flatten()
    }

    fn answer(&mut self, response: Response, now: Timestamp) -> Fallible<()> {
        let Some(session) = self.session.as_mut() else {
            return fail("no session in progress.");
        };
        session.answer(&mut self.cards, response, now)?;
        self.save()
    }

    fn undo_last(&mut self) -> Fallible<bool> {
        let Some(session) = self.session.as_mut() else {
            return Ok(false);
        };
        let restored = session.undo(&mut self.cards)?.is_some();
        if restored {
            self.save()?;
        }
        Ok(restored)
    }

    fn create_card(
        &mut self,
        question: &str,
        answer: &str,
        deck: &str,
        difficulty: u8,
        now: Timestamp,
    ) -> Fallible<CardId> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return fail("question and answer must not be empty.");
        }
        if deck.trim().is_empty() {
            return fail("deck must not be empty.");
        }
        let difficulty = Difficulty::new(difficulty)?;
        let id = next_card_id(&self.cards.all()?)?;
        let card = Flashcard::new(id, question, answer, deck, difficulty, now);
        self.cards.insert(card)?;
        self.save()?;
        Ok(id)
    }

    fn remove_card(&mut self, id: CardId, now: Timestamp) -> Fallible<bool> {
        let removed = self.cards.delete(id)?;
        if removed {
            if let Some(session) = self.session.as_mut() {
                session.forget(id, now);
            }
            self.save()?;
        }
        Ok(removed)
    }

    fn import(&mut self, json: &str) -> Fallible<usize> {
        let cards: Vec<Flashcard> = serde_json::from_str(json)?;
        let count = cards.len();
        self.replace(cards)?;
        Ok(count)
    }

    fn replace(&mut self, cards: Vec<Flashcard>) -> Fallible<()> {
        self.cards.replace_all(cards)?;
        self.session = None;
        self.save()
    }
}

/// The current local time, in the same naive format the CLI stores.
#[wasm_bindgen]
pub fn now_timestamp() -> String {
    let date = js_sys::Date::new_0();
    format_local_time(
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds(),
        date.get_milliseconds(),
    )
}

fn format_local_time(
    year: u32,
    month: u32,
    day: u32,
    hours: u32,
    minutes: u32,
    seconds: u32,
    millis: u32,
) -> String {
    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}
