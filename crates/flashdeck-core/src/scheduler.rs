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

//! The review scheduler.
//!
//! A card answered correctly gets one step easier and is scheduled
//! `repetitions * 2` days out, so the interval grows linearly with the
//! success streak. A card answered incorrectly gets one step harder, loses
//! its streak, and comes back the next day.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;
use crate::types::flashcard::Flashcard;
use crate::types::timestamp::Timestamp;

/// Days added per consecutive successful recall.
const DAYS_PER_REPETITION: i64 = 2;

/// Days until a forgotten card is shown again.
const RETRY_INTERVAL_DAYS: i64 = 1;

/// A card at or below this difficulty may count as mastered.
const MASTERED_MAX_DIFFICULTY: u8 = 2;

/// A card needs at least this many consecutive recalls to count as mastered.
const MASTERED_MIN_REPETITIONS: u32 = 3;

/// The user's answer to a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Response {
    Know,
    DontKnow,
}

impl Response {
    pub fn as_str(&self) -> &'static str {
        match self {
            Response::Know => "know",
            Response::DontKnow => "dont-know",
        }
    }
}

impl TryFrom<String> for Response {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "know" => Ok(Response::Know),
            "dont-know" => Ok(Response::DontKnow),
            _ => fail(format!("invalid response string: {value}")),
        }
    }
}

/// How the due check compares a card's next review against the clock.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuePolicy {
    /// Compare full timestamps.
    #[default]
    Instant,
    /// Compare calendar days, so everything scheduled for today is due.
    Day,
}

/// Record a successful recall.
pub fn mark_known(card: Flashcard, now: Timestamp) -> Flashcard {
    let repetitions = card.repetitions.saturating_add(1);
    let interval_days = i64::from(repetitions) * DAYS_PER_REPETITION;
    Flashcard {
        difficulty: card.difficulty.easier(),
        repetitions,
        last_reviewed: Some(now),
        next_review: now.plus_days(interval_days),
        ..card
    }
}

/// Record a failed recall.
pub fn mark_unknown(card: Flashcard, now: Timestamp) -> Flashcard {
    Flashcard {
        difficulty: card.difficulty.harder(),
        repetitions: 0,
        last_reviewed: Some(now),
        next_review: now.plus_days(RETRY_INTERVAL_DAYS),
        ..card
    }
}

pub fn review(card: Flashcard, response: Response, now: Timestamp) -> Flashcard {
    match response {
        Response::Know => mark_known(card, now),
        Response::DontKnow => mark_unknown(card, now),
    }
}

pub fn is_due(card: &Flashcard, now: Timestamp, policy: DuePolicy) -> bool {
    match policy {
        DuePolicy::Instant => card.next_review <= now,
        DuePolicy::Day => card.next_review.date() <= now.date(),
    }
}

/// Reporting-only classification; the scheduler never consults it.
pub fn is_mastered(card: &Flashcard) -> bool {
    card.difficulty.value() <= MASTERED_MAX_DIFFICULTY
        && card.repetitions >= MASTERED_MIN_REPETITIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::types::flashcard::CardId;
    use crate::types::flashcard::Difficulty;

    fn now() -> Timestamp {
        Timestamp::parse("2024-03-10T09:30:00.000").unwrap()
    }

    fn card(difficulty: u8, repetitions: u32) -> Flashcard {
        Flashcard {
            id: CardId::new(1),
            question: "What is the powerhouse of the cell?".to_string(),
            answer: "Mitochondria".to_string(),
            deck: "Biology".to_string(),
            difficulty: Difficulty::new(difficulty).unwrap(),
            repetitions,
            last_reviewed: Some(Timestamp::parse("2023-03-11T00:00:00.000").unwrap()),
            next_review: Timestamp::parse("2023-03-15T00:00:00.000").unwrap(),
        }
    }

    fn days_until(card: &Flashcard, from: Timestamp) -> i64 {
        card.next_review.seconds_since(from) / 86_400
    }

    #[test]
    fn test_known_properties_hold_for_all_states() {
        for difficulty in 1..=5u8 {
            for repetitions in 0..10u32 {
                let before = card(difficulty, repetitions);
                let after = mark_known(before.clone(), now());
                assert_eq!(after.difficulty.value(), difficulty.saturating_sub(1).max(1));
                assert_eq!(after.repetitions, repetitions + 1);
                assert_eq!(
                    days_until(&after, now()),
                    (i64::from(repetitions) + 1) * 2
                );
                assert_eq!(after.last_reviewed, Some(now()));
                assert!(after.next_review >= now());
                assert_eq!(after.id, before.id);
                assert_eq!(after.question, before.question);
                assert_eq!(after.deck, before.deck);
            }
        }
    }

    #[test]
    fn test_unknown_properties_hold_for_all_states() {
        for difficulty in 1..=5u8 {
            for repetitions in 0..10u32 {
                let after = mark_unknown(card(difficulty, repetitions), now());
                assert_eq!(after.difficulty.value(), (difficulty + 1).min(5));
                assert_eq!(after.repetitions, 0);
                assert_eq!(after.next_review, now().plus_days(1));
                assert_eq!(after.last_reviewed, Some(now()));
            }
        }
    }

    #[test]
    fn test_known_is_not_idempotent() {
        let once = mark_known(card(4, 0), now());
        let twice = mark_known(once.clone(), now());
        assert_ne!(once, twice);
        assert_eq!(once.repetitions, 1);
        assert_eq!(twice.repetitions, 2);
        assert!(twice.next_review > once.next_review);
    }

    #[test]
    fn test_consecutive_successes_push_review_further_out() {
        let mut current = card(5, 0);
        let mut previous_interval = 0;
        for _ in 0..6 {
            current = mark_known(current, now());
            let interval = days_until(&current, now());
            assert!(interval > previous_interval);
            previous_interval = interval;
        }
        assert_eq!(previous_interval, 12);
    }

    #[test]
    fn test_known_with_huge_repetitions() {
        let after = mark_known(card(3, 100_000_000), now());
        assert_eq!(after.repetitions, 100_000_001);
        assert!(after.next_review > now());

        let after = mark_known(card(3, u32::MAX), now());
        assert_eq!(after.repetitions, u32::MAX);
        assert!(after.next_review > now());
        assert_eq!(after.last_reviewed, Some(now()));
    }

    #[test]
    fn test_known_after_import_of_huge_repetitions() -> Fallible<()> {
        let json = r#"{
            "id": 7,
            "question": "Q",
            "answer": "A",
            "deck": "D",
            "difficulty": 2,
            "repetitions": 100000000,
            "nextReview": "2023-03-15T00:00:00.000"
        }"#;
        let imported: Flashcard = serde_json::from_str(json)?;
        let after = mark_known(imported, now());
        assert!(after.next_review >= now());
        Ok(())
    }

    #[test]
    fn test_known_floor_clamp() {
        assert_eq!(mark_known(card(1, 0), now()).difficulty, Difficulty::EASIEST);
    }

    #[test]
    fn test_unknown_ceiling_clamp() {
        assert_eq!(mark_unknown(card(5, 3), now()).difficulty, Difficulty::HARDEST);
    }

    #[test]
    fn test_scenario_known_from_three_one() {
        let after = mark_known(card(3, 1), now());
        assert_eq!(after.difficulty.value(), 2);
        assert_eq!(after.repetitions, 2);
        assert_eq!(after.next_review, now().plus_days(4));
    }

    #[test]
    fn test_scenario_known_from_one_five() {
        let after = mark_known(card(1, 5), now());
        assert_eq!(after.difficulty.value(), 1);
        assert_eq!(after.repetitions, 6);
        assert_eq!(after.next_review, now().plus_days(12));
    }

    #[test]
    fn test_scenario_unknown_from_two_four() {
        let after = mark_unknown(card(2, 4), now());
        assert_eq!(after.difficulty.value(), 3);
        assert_eq!(after.repetitions, 0);
        assert_eq!(after.next_review, now().plus_days(1));
    }

    #[test]
    fn test_review_dispatches_on_response() {
        assert_eq!(
            review(card(3, 1), Response::Know, now()),
            mark_known(card(3, 1), now())
        );
        assert_eq!(
            review(card(3, 1), Response::DontKnow, now()),
            mark_unknown(card(3, 1), now())
        );
    }

    #[test]
    fn test_due_is_inclusive() {
        let mut c = card(3, 1);
        c.next_review = now();
        assert!(is_due(&c, now(), DuePolicy::Instant));
        c.next_review = Timestamp::parse("2024-03-10T09:30:00.001").unwrap();
        assert!(!is_due(&c, now(), DuePolicy::Instant));
    }

    #[test]
    fn test_due_by_day_includes_later_today() {
        let mut c = card(3, 1);
        c.next_review = Timestamp::parse("2024-03-10T23:00:00.000").unwrap();
        assert!(!is_due(&c, now(), DuePolicy::Instant));
        assert!(is_due(&c, now(), DuePolicy::Day));
        c.next_review = Timestamp::parse("2024-03-11T00:00:00.000").unwrap();
        assert!(!is_due(&c, now(), DuePolicy::Day));
    }

    #[test]
    fn test_freshly_answered_card_is_not_due() {
        assert!(!is_due(&mark_known(card(2, 0), now()), now(), DuePolicy::Instant));
        assert!(!is_due(&mark_unknown(card(2, 0), now()), now(), DuePolicy::Instant));
    }

    #[test]
    fn test_mastery() {
        assert!(is_mastered(&card(2, 3)));
        assert!(is_mastered(&card(1, 7)));
        assert!(!is_mastered(&card(3, 3)));
        assert!(!is_mastered(&card(2, 2)));
    }

    #[test]
    fn test_response_string_roundtrip() -> Fallible<()> {
        for response in [Response::Know, Response::DontKnow] {
            assert_eq!(response, Response::try_from(response.as_str().to_string())?);
        }
        assert!(Response::try_from("maybe".to_string()).is_err());
        Ok(())
    }

    #[test]
    fn test_due_policy_deserializes_lowercase() -> Fallible<()> {
        let policy: DuePolicy = serde_json::from_str("\"day\"")?;
        assert_eq!(policy, DuePolicy::Day);
        assert_eq!(DuePolicy::default(), DuePolicy::Instant);
        Ok(())
    }
}
