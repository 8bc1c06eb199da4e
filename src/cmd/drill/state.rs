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
use std::sync::MutexGuard;

use flashdeck_core::ReviewSession;
use flashdeck_core::error::ErrorReport;
use flashdeck_core::error::Fallible;
use tokio::sync::oneshot::Sender;

use crate::db::Database;

#[derive(Clone)]
pub struct ServerState {
    pub mutable: Arc<Mutex<MutableState>>,
    pub shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

pub struct MutableState {
    pub db: Database,
    pub session: ReviewSession,
}

impl ServerState {
    pub fn lock(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("session state is poisoned."))
    }

    /// Ask the server to stop. Later calls do nothing.
    pub fn shutdown(&self) {
        let sender = match self.shutdown_tx.lock() {
            Ok(mut tx) => tx.take(),
            Err(_) => None,
        };
        if let Some(tx) = sender {
            let _ = tx.send(());
        }
    }
}
