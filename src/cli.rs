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

use clap::Parser;
use flashdeck_core::Response;
use flashdeck_core::Scope;
use flashdeck_core::Timestamp;
use flashdeck_core::error::Fallible;

use crate::cmd::cards::NewCard;
use crate::cmd::cards::add_card;
use crate::cmd::cards::delete_card;
use crate::cmd::cards::list_cards;
use crate::cmd::cards::list_decks;
use crate::cmd::cards::review_card;
use crate::cmd::drill::server::ServerConfig;
use crate::cmd::drill::server::start_server;
use crate::cmd::init::init_collection;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::cmd::transfer::export_collection;
use crate::cmd::transfer::import_collection;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Create a collection, seeded with sample cards.
    Init {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Do not insert the sample cards.
        #[arg(long)]
        empty: bool,
    },
    /// Add a card.
    Add {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        deck: String,
        /// Starting difficulty, from 1 (easiest) to 5 (hardest).
        #[arg(long, default_value_t = 1)]
        difficulty: u8,
    },
    /// Delete a card by id.
    Delete {
        id: u32,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// List cards.
    List {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Only list cards from this deck.
        #[arg(long)]
        deck: Option<String>,
        /// Only list cards that are due now.
        #[arg(long)]
        due: bool,
    },
    /// List deck names.
    Decks {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Print collection statistics.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Answer a single card without starting a drill.
    Review {
        id: u32,
        /// Either `know` or `dont-know`.
        #[arg(value_parser = parse_response)]
        response: Response,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Export all cards as JSON.
    Export {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Replace all cards with the contents of a JSON export.
    Import {
        /// Path to the JSON file.
        input: String,
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Drill cards through a web interface.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Only drill cards from this deck.
        #[arg(long)]
        deck: Option<String>,
        /// Drill every card, not only the due ones.
        #[arg(long)]
        all: bool,
        /// Maximum number of cards to drill in a session. By default, all due cards are drilled.
        #[arg(long)]
        card_limit: Option<usize>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long)]
        host: Option<String>,
        /// The port to use for the web server. Default is 8000.
        #[arg(long)]
        port: Option<u16>,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
}

fn parse_response(value: &str) -> Result<Response, String> {
    Response::try_from(value.to_string()).map_err(|e| e.message().to_string())
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Init { directory, empty } => {
            let inserted = init_collection(directory, empty)?;
            println!("Initialized collection with {inserted} sample cards.");
            Ok(())
        }
        Command::Add {
            directory,
            question,
            answer,
            deck,
            difficulty,
        } => {
            let card = NewCard {
                question,
                answer,
                deck,
                difficulty,
            };
            add_card(directory, card, Timestamp::now()).map(|_| ())
        }
        Command::Delete { id, directory } => delete_card(directory, id),
        Command::List {
            directory,
            deck,
            due,
        } => list_cards(directory, deck, due, Timestamp::now()),
        Command::Decks { directory } => list_decks(directory),
        Command::Stats { directory, format } => print_stats(directory, format, Timestamp::now()),
        Command::Review {
            id,
            response,
            directory,
        } => review_card(directory, id, response, Timestamp::now()).map(|_| ()),
        Command::Export { directory, output } => export_collection(directory, output),
        Command::Import { input, directory } => import_collection(directory, input).map(|_| ()),
        Command::Drill {
            directory,
            deck,
            all,
            card_limit,
            host,
            port,
            open_browser,
        } => {
            let config = ServerConfig {
                directory,
                host,
                port,
                session_started_at: Timestamp::now(),
                card_limit,
                deck_filter: deck,
                scope: if all { Scope::All } else { Scope::Due },
                open_browser,
            };
            start_server(config).await
        }
    }
}
