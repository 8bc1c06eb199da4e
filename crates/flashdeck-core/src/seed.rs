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

//! Sample cards for a fresh collection.

use chrono::NaiveDate;

use crate::types::flashcard::CardId;
use crate::types::flashcard::Difficulty;
use crate::types::flashcard::Flashcard;
use crate::types::timestamp::Timestamp;

struct SeedCard {
    question: &'static str,
    answer: &'static str,
    deck: &'static str,
    last_reviewed: (i32, u32, u32),
    next_review: (i32, u32, u32),
    difficulty: u8,
    repetitions: u32,
}

const SEED: [SeedCard; 5] = [
    SeedCard {
        question: "What is the capital of France?",
        answer: "Paris",
        deck: "Geography",
        last_reviewed: (2023, 3, 10),
        next_review: (2023, 3, 13),
        difficulty: 1,
        repetitions: 3,
    },
    SeedCard {
        question: "What is the powerhouse of the cell?",
        answer: "Mitochondria",
        deck: "Biology",
        last_reviewed: (2023, 3, 11),
        next_review: (2023, 3, 15),
        difficulty: 2,
        repetitions: 2,
    },
    SeedCard {
        question: "What is the formula for calculating the area of a circle?",
        answer: "πr²",
        deck: "Mathematics",
        last_reviewed: (2023, 3, 9),
        next_review: (2023, 3, 12),
        difficulty: 3,
        repetitions: 1,
    },
    SeedCard {
        question: "What does HTML stand for?",
        answer: "HyperText Markup Language",
        deck: "Web Development",
        last_reviewed: (2023, 3, 8),
        next_review: (2023, 3, 11),
        difficulty: 1,
        repetitions: 4,
    },
    SeedCard {
        question: "Who wrote 'Romeo and Juliet'?",
        answer: "William Shakespeare",
        deck: "Literature",
        last_reviewed: (2023, 3, 7),
        next_review: (2023, 3, 14),
        difficulty: 1,
        repetitions: 5,
    },
];

fn midnight((year, month, day): (i32, u32, u32)) -> Timestamp {
    let ndt = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    Timestamp::new(ndt)
}

/// The sample collection, with ids starting at 1.
pub fn seed_flashcards() -> Vec<Flashcard> {
    SEED.iter()
        .zip(1..)
        .map(|(seed, id)| Flashcard {
            id: CardId::new(id),
            question: seed.question.to_string(),
            answer: seed.answer.to_string(),
            deck: seed.deck.to_string(),
            difficulty: Difficulty::new(seed.difficulty).unwrap_or(Difficulty::EASIEST),
            repetitions: seed.repetitions,
            last_reviewed: Some(midnight(seed.last_reviewed)),
            next_review: midnight(seed.next_review),
        })
        .collect()
}
