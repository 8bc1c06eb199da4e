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

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::scheduler::DuePolicy;
use crate::scheduler::is_due;
use crate::types::flashcard::CardId;
use crate::types::flashcard::Flashcard;
use crate::types::timestamp::Timestamp;

/// Distinct deck labels in the order they first appear.
pub fn deck_names(cards: &[Flashcard]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut names = Vec::new();
    for card in cards {
        if seen.insert(card.deck.as_str()) {
            names.push(card.deck.clone());
        }
    }
    names
}

/// The id a newly created card should get.
pub fn next_card_id(cards: &[Flashcard]) -> Fallible<CardId> {
    match cards.iter().map(|card| card.id).max() {
        Some(id) => id.next(),
        None => Ok(CardId::new(1)),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only cards that are due.
    #[default]
    Due,
    /// Every card, due or not.
    All,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardFilter {
    pub deck: Option<String>,
    pub scope: Scope,
    pub limit: Option<usize>,
}

impl CardFilter {
    /// Select cards, keeping collection order.
    pub fn apply(&self, cards: &[Flashcard], now: Timestamp, policy: DuePolicy) -> Vec<Flashcard> {
        let selected = cards
            .iter()
            .filter(|card| match &self.deck {
                Some(deck) => &card.deck == deck,
                None => true,
            })
            .filter(|card| match self.scope {
                Scope::Due => is_due(card, now, policy),
                Scope::All => true,
            })
            .cloned();
        match self.limit {
            Some(limit) => selected.take(limit).collect(),
            None => selected.collect(),
        }
    }
}
