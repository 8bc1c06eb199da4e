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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::repository::Record;
use crate::types::timestamp::Timestamp;

/// The easiest difficulty a card can have.
pub const MIN_DIFFICULTY: u8 = 1;

/// The hardest difficulty a card can have.
pub const MAX_DIFFICULTY: u8 = 5;

/// Identifies a flashcard for its whole lifetime.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Fallible<Self> {
        match self.0.checked_add(1) {
            Some(id) => Ok(Self(id)),
            None => fail("no card ids left: the largest id is already in use."),
        }
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CardId> for i64 {
    fn from(id: CardId) -> i64 {
        id.0 as i64
    }
}

/// How hard a card is, on a scale from 1 (easiest) to 5.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASIEST: Difficulty = Difficulty(MIN_DIFFICULTY);
    pub const HARDEST: Difficulty = Difficulty(MAX_DIFFICULTY);

    pub fn new(value: u8) -> Fallible<Self> {
        if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&value) {
            Ok(Self(value))
        } else {
            fail(format!(
                "difficulty must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}, got {value}."
            ))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// One step easier, floored at the easiest difficulty.
    pub fn easier(self) -> Self {
        Self(self.0.saturating_sub(1).max(MIN_DIFFICULTY))
    }

    /// One step harder, capped at the hardest difficulty.
    pub fn harder(self) -> Self {
        Self((self.0 + 1).min(MAX_DIFFICULTY))
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, MAX_DIFFICULTY)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Difficulty::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

/// A single flashcard and its review state.
///
/// The serialized field names match the JSON the browser front-end keeps in
/// `localStorage`, so collections can move between the two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    pub deck: String,
    pub difficulty: Difficulty,
    /// Consecutive successful recalls since the last failure.
    pub repetitions: u32,
    /// When the card was last answered. `None` if it never was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<Timestamp>,
    /// The card is not due before this instant.
    pub next_review: Timestamp,
}

impl Flashcard {
    /// A card that has never been reviewed and is due at `created_at`.
    pub fn new(
        id: CardId,
        question: impl Into<String>,
        answer: impl Into<String>,
        deck: impl Into<String>,
        difficulty: Difficulty,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            deck: deck.into(),
            difficulty,
            repetitions: 0,
            last_reviewed: None,
            next_review: created_at,
        }
    }
}

impl Record for Flashcard {
    type Id = CardId;

    const COLLECTION: &'static str = "flashcards";

    fn id(&self) -> CardId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_bounds() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(6).is_err());
        for value in 1..=5 {
            assert_eq!(Difficulty::new(value).map(Difficulty::value), Ok(value));
        }
    }

    #[test]
    fn test_difficulty_steps_clamp() -> Fallible<()> {
        assert_eq!(Difficulty::EASIEST.easier(), Difficulty::EASIEST);
        assert_eq!(Difficulty::HARDEST.harder(), Difficulty::HARDEST);
        assert_eq!(Difficulty::new(3)?.easier(), Difficulty::new(2)?);
        assert_eq!(Difficulty::new(3)?.harder(), Difficulty::new(4)?);
        Ok(())
    }

    #[test]
    fn test_difficulty_display() -> Fallible<()> {
        assert_eq!(Difficulty::new(2)?.to_string(), "2/5");
        Ok(())
    }

    #[test]
    fn test_serialized_shape() -> Fallible<()> {
        let card = Flashcard {
            id: CardId::new(3),
            question: "What is the formula for calculating the area of a circle?".to_string(),
            answer: "πr²".to_string(),
            deck: "Mathematics".to_string(),
            difficulty: Difficulty::new(3)?,
            repetitions: 1,
            last_reviewed: Some(Timestamp::parse("2023-03-09T00:00:00.000")?),
            next_review: Timestamp::parse("2023-03-12T00:00:00.000")?,
        };
        let json = serde_json::to_value(&card)?;
        assert_eq!(json["id"], 3);
        assert_eq!(json["difficulty"], 3);
        assert_eq!(json["lastReviewed"], "2023-03-09T00:00:00.000");
        assert_eq!(json["nextReview"], "2023-03-12T00:00:00.000");
        let back: Flashcard = serde_json::from_value(json)?;
        assert_eq!(back, card);
        Ok(())
    }

    #[test]
    fn test_deserialize_browser_export() -> Fallible<()> {
        let json = r#"{
            "id": 1,
            "question": "What is the capital of France?",
            "answer": "Paris",
            "deck": "Geography",
            "lastReviewed": "2023-03-10T00:00:00.000Z",
            "nextReview": "2023-03-13T00:00:00.000Z",
            "difficulty": 1,
            "repetitions": 3
        }"#;
        let card: Flashcard = serde_json::from_str(json)?;
        assert_eq!(card.id, CardId::new(1));
        assert_eq!(card.difficulty, Difficulty::EASIEST);
        assert_eq!(card.repetitions, 3);
        Ok(())
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_difficulty() {
        let json = r#"{
            "id": 1, "question": "q", "answer": "a", "deck": "d",
            "nextReview": "2023-03-13T00:00:00.000",
            "difficulty": 9, "repetitions": 0
        }"#;
        assert!(serde_json::from_str::<Flashcard>(json).is_err());
    }

    #[test]
    fn test_new_card_is_unreviewed() -> Fallible<()> {
        let now = Timestamp::parse("2024-05-01T10:00:00.000")?;
        let card = Flashcard::new(CardId::new(7), "q", "a", "Deck", Difficulty::new(3)?, now);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.last_reviewed, None);
        assert_eq!(card.next_review, now);
        let json = serde_json::to_value(&card)?;
        assert!(json.get("lastReviewed").is_none());
        Ok(())
    }
}
