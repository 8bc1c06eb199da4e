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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use flashdeck_core::Flashcard;
use flashdeck_core::ReviewSession;
use flashdeck_core::Timestamp;
use flashdeck_core::error::ErrorReport;
use flashdeck_core::error::Fallible;
use flashdeck_core::error::fail;
use flashdeck_core::markdown::markdown_to_html_inline;
use flashdeck_core::repository::Repository;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    match render_page(&state) {
        Ok(body) => (StatusCode::OK, Html(page_template(body).into_string())),
        Err(e) => error_response(e),
    }
}

pub fn error_response(e: ErrorReport) -> (StatusCode, Html<String>) {
    log::error!("{e}");
    let body = html! {
        div.error {
            h1 { "Something went wrong" }
            p { (e.message()) }
        }
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(page_template(body).into_string()),
    )
}

fn render_page(state: &ServerState) -> Fallible<Markup> {
    let mutable = state.lock()?;
    let MutableState { db, session } = &*mutable;
    match session.current() {
        Some(id) => {
            let card: Option<Flashcard> = db.get(id)?;
            let Some(card) = card else {
                return fail(format!("card {id} no longer exists."));
            };
            Ok(render_session(session, &card))
        }
        None => Ok(render_completion(session)),
    }
}

fn render_session(session: &ReviewSession, card: &Flashcard) -> Markup {
    let progress_style = format!("width: {}%;", session.percent_done());
    let question = markdown_to_html_inline(&card.question);
    let controls = if session.is_revealed() {
        html! {
            form action="/" method="post" {
                div.responses {
                    input id="dont-know" type="submit" name="action" value="Don't Know" title="I did not remember this. Shortcut: 1.";
                    input id="know" type="submit" name="action" value="Know" title="I remembered this. Shortcut: 2.";
                }
            }
        }
    } else {
        html! {
            form action="/" method="post" {
                div.responses {
                    input id="skip" type="submit" name="action" value="Skip" title="Come back to this card later. Shortcut: s.";
                    input id="reveal" type="submit" name="action" value="Reveal" title="Show the answer. Shortcut: space.";
                }
            }
        }
    };
    html! {
        div.root {
            div.header {
                form.header-action action="/" method="post" {
                    (undo_button(!session.can_undo()))
                }
                div.progress-bar {
                    div.progress-fill style=(progress_style) {}
                }
                form.header-action action="/" method="post" {
                    input id="end" type="submit" name="action" value="End" title="End the session (answers are already saved)";
                }
            }
            div.card-container {
                div.card {
                    div.card-header {
                        h1 { (card.deck) }
                        span.difficulty { "Difficulty: " (card.difficulty) }
                    }
                    div.card-content {
                        div.question.rich-text { (PreEscaped(question)) }
                        @if session.is_revealed() {
                            div.answer.rich-text { (PreEscaped(markdown_to_html_inline(&card.answer))) }
                        } @else {
                            div.answer.rich-text {}
                        }
                    }
                }
            }
            div.controls {
                (controls)
            }
            div.counter {
                (session.reviewed() + 1) " of " (session.total())
            }
        }
    }
}

fn render_completion(session: &ReviewSession) -> Markup {
    let started_at = session.started_at();
    let finished_at: Timestamp = session.finished_at().unwrap_or(started_at);
    let duration = finished_at.seconds_since(started_at).max(0);
    let reviewed = session.reviewed();
    let pace = if reviewed == 0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", duration as f64 / reviewed as f64)
    };
    html! {
        div.finished {
            h1 { "Session Completed \u{1F389}" }
            div.summary {
                "Reviewed " (reviewed) " cards in " (duration) " seconds."
            }
            h2 { "Session Stats" }
            div.stats {
                table {
                    tbody {
                        tr {
                            td.key { "Total Cards" }
                            td.val { (session.total()) }
                        }
                        tr {
                            td.key { "Cards Reviewed" }
                            td.val { (reviewed) }
                        }
                        tr {
                            td.key { "Known" }
                            td.val { (session.known()) }
                        }
                        tr {
                            td.key { "Not Known" }
                            td.val { (session.unknown()) }
                        }
                        tr {
                            td.key { "Started" }
                            td.val { (started_at) }
                        }
                        tr {
                            td.key { "Finished" }
                            td.val { (finished_at) }
                        }
                        tr {
                            td.key { "Duration (seconds)" }
                            td.val { (duration) }
                        }
                        tr {
                            td.key { "Pace (s/card)" }
                            td.val { (pace) }
                        }
                    }
                }
            }
            div.shutdown-container {
                form action="/" method="post" {
                    @if session.can_undo() {
                        input #undo type="submit" name="action" value="Undo" title="Undo the last answer";
                    }
                    input #shutdown .shutdown-button type="submit" name="action" value="Shutdown" title="Shut down the server";
                }
            }
        }
    }
}

fn undo_button(disabled: bool) -> Markup {
    if disabled {
        html! {
            input id="undo" type="submit" name="action" value="Undo" disabled;
        }
    } else {
        html! {
            input id="undo" type="submit" name="action" value="Undo" title="Undo last answer. Shortcut: u.";
        }
    }
}
