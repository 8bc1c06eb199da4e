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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;
use flashdeck_core::Response;
use flashdeck_core::Timestamp;
use flashdeck_core::error::Fallible;
use serde::Deserialize;

use crate::cmd::drill::get::error_response;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub enum Action {
    Reveal,
    Know,
    #[serde(rename = "Don't Know")]
    DontKnow,
    Skip,
    Undo,
    End,
    Shutdown,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    match apply_action(&state, form.action) {
        Ok(()) => Ok(Redirect::to("/")),
        Err(e) => Err(error_response(e)),
    }
}

fn apply_action(state: &ServerState, action: Action) -> Fallible<()> {
    if action == Action::Shutdown {
        state.shutdown();
        return Ok(());
    }
    let mut mutable = state.lock()?;
    let MutableState { db, session } = &mut *mutable;
    let now = Timestamp::now();
    match action {
        Action::Reveal => session.reveal(),
        Action::Know | Action::DontKnow => {
            let response = if action == Action::Know {
                Response::Know
            } else {
                Response::DontKnow
            };
            if session.current().is_none() {
                log::warn!("Ignoring {} with no card left", response.as_str());
            } else if !session.is_revealed() {
                log::warn!("Ignoring {} before the answer was revealed", response.as_str());
            } else {
                let card = session.answer(db, response, now)?;
                log::debug!(
                    "Card {} answered {}, next review {}",
                    card.id,
                    response.as_str(),
                    card.next_review
                );
            }
        }
        Action::Skip => session.skip(),
        Action::Undo => {
            if let Some(card) = session.undo(db)? {
                log::debug!("Undid answer to card {}", card.id);
            }
        }
        Action::End => session.end(now),
        Action::Shutdown => {}
    }
    Ok(())
}
