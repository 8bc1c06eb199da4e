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

use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use flashdeck_core::CardFilter;
use flashdeck_core::Flashcard;
use flashdeck_core::ReviewSession;
use flashdeck_core::Scope;
use flashdeck_core::Timestamp;
use flashdeck_core::error::Fallible;
use flashdeck_core::error::fail;
use flashdeck_core::repository::Repository;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::spawn;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::collection::Collection;
use crate::utils::CACHE_CONTROL_IMMUTABLE;
use crate::utils::wait_for_server;

/// Drill settings from the command line. Unset values fall back to the
/// collection's `flashdeck.toml`, then to defaults.
pub struct ServerConfig {
    pub directory: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub session_started_at: Timestamp,
    pub card_limit: Option<usize>,
    pub deck_filter: Option<String>,
    pub scope: Scope,
    pub open_browser: Option<bool>,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let Collection {
        db,
        config: settings,
        ..
    } = Collection::new(config.directory)?;

    let host = config.host.unwrap_or(settings.drill.host);
    let port = config.port.unwrap_or(settings.drill.port);
    let open_browser = config.open_browser.unwrap_or(settings.drill.open_browser);

    let cards: Vec<Flashcard> = db.all()?;
    let filter = CardFilter {
        deck: config.deck_filter,
        scope: config.scope,
        limit: config.card_limit.or(settings.drill.card_limit),
    };
    let session = ReviewSession::new(
        &cards,
        &filter,
        settings.review.due_policy,
        config.session_started_at,
    );

    if session.total() == 0 {
        println!("No cards due.");
        return Ok(());
    }
    log::debug!("Session has {} cards", session.total());

    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        mutable: Arc::new(Mutex::new(MutableState { db, session })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{host}:{port}");

    if open_browser {
        // Open the browser once the server is up.
        let browser_host = host.clone();
        spawn(async move {
            match wait_for_server(&browser_host, port).await {
                Ok(_) => {
                    if let Err(e) = open::that(format!("http://{browser_host}:{port}/")) {
                        log::warn!("Failed to open browser: {e}");
                    }
                }
                Err(e) => log::warn!("Failed to connect to server: {e}"),
            }
        });
    }

    // Start the server with graceful shutdown on Ctrl+C or shutdown button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    let mutable = state.lock()?;
    if mutable.session.is_finished() {
        Ok(())
    } else {
        fail("Session interrupted before completion")
    }
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
