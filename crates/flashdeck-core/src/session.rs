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

use std::collections::VecDeque;

use crate::deck::CardFilter;
use crate::error::Fallible;
use crate::error::fail;
use crate::repository::Repository;
use crate::scheduler::DuePolicy;
use crate::scheduler::Response;
use crate::scheduler::review;
use crate::types::flashcard::CardId;
use crate::types::flashcard::Flashcard;
use crate::types::timestamp::Timestamp;

/// An answer given during the session, kept so it can be undone.
#[derive(Clone, Debug)]
struct Answer {
    /// The card as it was before the answer.
    before: Flashcard,
    response: Response,
}

/// A pass over a queue of cards.
///
/// The session only holds card ids; card state lives in the repository
/// passed to [`ReviewSession::answer`] and [`ReviewSession::undo`].
#[derive(Debug)]
pub struct ReviewSession {
    queue: VecDeque<CardId>,
    total: usize,
    reveal: bool,
    answers: Vec<Answer>,
    started_at: Timestamp,
    finished_at: Option<Timestamp>,
}

impl ReviewSession {
    pub fn new(
        cards: &[Flashcard],
        filter: &CardFilter,
        policy: DuePolicy,
        started_at: Timestamp,
    ) -> Self {
        let queue: VecDeque<CardId> = filter
            .apply(cards, started_at, policy)
            .iter()
            .map(|card| card.id)
            .collect();
        Self {
            total: queue.len(),
            queue,
            reveal: false,
            answers: Vec::new(),
            started_at,
            finished_at: None,
        }
    }

    /// The card being shown, unless the session is over.
    pub fn current(&self) -> Option<CardId> {
        if self.is_finished() {
            None
        } else {
            self.queue.front().copied()
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal
    }

    pub fn reveal(&mut self) {
        if self.current().is_some() {
            self.reveal = true;
        }
    }

    /// Apply `response` to the current card and persist the result.
    pub fn answer<R: Repository<Flashcard>>(
        &mut self,
        repo: &mut R,
        response: Response,
        now: Timestamp,
    ) -> Fallible<Flashcard> {
        let Some(id) = self.current() else {
            return fail("no card to answer.");
        };
        if !self.reveal {
            return fail("reveal the answer before responding.");
        }
        let Some(before) = repo.get(id)? else {
            return fail(format!("card {id} no longer exists."));
        };
        let after = review(before.clone(), response, now);
        repo.update(after.clone())?;
        self.answers.push(Answer { before, response });
        self.queue.pop_front();
        self.reveal = false;
        if self.queue.is_empty() {
            self.finished_at = Some(now);
        }
        Ok(after)
    }

    /// Move the current card to the back of the queue without answering it.
    pub fn skip(&mut self) {
        if self.current().is_some() {
            self.queue.rotate_left(1);
            self.reveal = false;
        }
    }

    /// Revert the most recent answer. Returns the restored card, if any.
    pub fn undo<R: Repository<Flashcard>>(&mut self, repo: &mut R) -> Fallible<Option<Flashcard>> {
        let Some(Answer { before, .. }) = self.answers.last() else {
            return Ok(None);
        };
        let before = before.clone();
        repo.update(before.clone())?;
        self.answers.pop();
        self.queue.push_front(before.id);
        self.reveal = false;
        self.finished_at = None;
        Ok(Some(before))
    }

    /// Drop a card that was deleted from the collection, both from the queue
    /// and from the undo history.
    pub fn forget(&mut self, id: CardId, now: Timestamp) {
        if self.queue.front() == Some(&id) {
            self.reveal = false;
        }
        self.queue.retain(|queued| *queued != id);
        self.answers.retain(|answer| answer.before.id != id);
        self.total = self.queue.len() + self.answers.len();
        if self.queue.is_empty() {
            self.end(now);
        }
    }

    /// End the session early.
    pub fn end(&mut self, now: Timestamp) {
        if self.finished_at.is_none() {
            self.finished_at = Some(now);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.answers.is_empty()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn reviewed(&self) -> usize {
        self.answers.len()
    }

    pub fn known(&self) -> usize {
        self.count(Response::Know)
    }

    pub fn unknown(&self) -> usize {
        self.count(Response::DontKnow)
    }

    fn count(&self, response: Response) -> usize {
        self.answers
            .iter()
            .filter(|a| a.response == response)
            .count()
    }

    pub fn percent_done(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            (self.reviewed() * 100) / self.total
        }
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Timestamp> {
        self.finished_at
    }
}
