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

use serde::Serialize;

use crate::deck::deck_names;
use crate::scheduler::DuePolicy;
use crate::scheduler::is_due;
use crate::scheduler::is_mastered;
use crate::types::flashcard::Flashcard;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub mastered: usize,
    pub due: usize,
    /// Share of mastered cards, rounded to the nearest percent.
    pub mastered_percent: u32,
    pub decks: Vec<DeckStats>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeckStats {
    pub deck: String,
    pub total: usize,
    pub mastered: usize,
    pub due: usize,
}

impl CollectionStats {
    pub fn new(cards: &[Flashcard], now: Timestamp, policy: DuePolicy) -> Self {
        let (total, mastered, due) = counts(cards.iter(), now, policy);
        let decks = deck_names(cards)
            .into_iter()
            .map(|deck| {
                let (total, mastered, due) =
                    counts(cards.iter().filter(|c| c.deck == deck), now, policy);
                DeckStats {
                    deck,
                    total,
                    mastered,
                    due,
                }
            })
            .collect();
        Self {
            total,
            mastered,
            due,
            mastered_percent: percent(mastered, total),
            decks,
        }
    }
}

fn counts<'a>(
    cards: impl Iterator<Item = &'a Flashcard>,
    now: Timestamp,
    policy: DuePolicy,
) -> (usize, usize, usize) {
    let mut total = 0;
    let mut mastered = 0;
    let mut due = 0;
    for card in cards {
        total += 1;
        if is_mastered(card) {
            mastered += 1;
        }
        if is_due(card, now, policy) {
            due += 1;
        }
    }
    (total, mastered, due)
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_flashcards;

    fn now() -> Timestamp {
        Timestamp::parse("2023-03-13T12:00:00.000").unwrap()
    }

    #[test]
    fn test_seed_stats() {
        let stats = CollectionStats::new(&seed_flashcards(), now(), DuePolicy::Instant);
        // Cards 1, 4 and 5 have difficulty 1 and at least three repetitions.
        assert_eq!(stats.total, 5);
        assert_eq!(stats.mastered, 3);
        assert_eq!(stats.due, 3);
        assert_eq!(stats.mastered_percent, 60);
        assert_eq!(stats.decks.len(), 5);
        assert_eq!(
            stats.decks[0],
            DeckStats {
                deck: "Geography".to_string(),
                total: 1,
                mastered: 1,
                due: 1,
            }
        );
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }

    #[test]
    fn test_empty_collection() {
        let stats = CollectionStats::new(&[], now(), DuePolicy::Instant);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.mastered_percent, 0);
        assert!(stats.decks.is_empty());
    }

    #[test]
    fn test_serializes_to_json() {
        let stats = CollectionStats::new(&seed_flashcards(), now(), DuePolicy::Day);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total"], 5);
        assert_eq!(json["decks"][1]["deck"], "Biology");
    }
}
