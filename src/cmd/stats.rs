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

use clap::ValueEnum;
use flashdeck_core::CollectionStats;
use flashdeck_core::Flashcard;
use flashdeck_core::Timestamp;
use flashdeck_core::error::Fallible;
use flashdeck_core::repository::Repository;

use crate::collection::Collection;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    /// A human-readable table.
    Text,
    /// JSON, for scripts.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(directory: Option<String>, format: StatsFormat, now: Timestamp) -> Fallible<()> {
    let Collection { db, config, .. } = Collection::new(directory)?;
    let cards: Vec<Flashcard> = db.all()?;
    let stats = CollectionStats::new(&cards, now, config.review.due_policy);
    let output = match format {
        StatsFormat::Text => render_text(&stats),
        StatsFormat::Json => serde_json::to_string_pretty(&stats)?,
    };
    println!("{output}");
    Ok(())
}

fn render_text(stats: &CollectionStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total cards:     {}\n", stats.total));
    out.push_str(&format!(
        "Mastered:        {} ({}%)\n",
        stats.mastered, stats.mastered_percent
    ));
    out.push_str(&format!("Due for review:  {}\n", stats.due));
    if !stats.decks.is_empty() {
        let width = stats
            .decks
            .iter()
            .map(|d| d.deck.chars().count())
            .max()
            .unwrap_or(0)
            .max("Deck".len());
        out.push('\n');
        out.push_str(&format!("{:<width$}  Total  Mastered  Due\n", "Deck"));
        for deck in &stats.decks {
            out.push_str(&format!(
                "{:<width$}  {:>5}  {:>8}  {:>3}\n",
                deck.deck, deck.total, deck.mastered, deck.due
            ));
        }
    }
    out.trim_end().to_string()
}
