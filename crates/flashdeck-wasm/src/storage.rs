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

//! Browser localStorage wrapper for persisting data.

use flashdeck_core::error::ErrorReport;
use flashdeck_core::error::Fallible;
use wasm_bindgen::JsValue;
use web_sys::Storage as WebStorage;

fn storage_error(err: JsValue) -> ErrorReport {
    ErrorReport::new(format!("localStorage error: {err:?}"))
}

pub struct Storage {
    inner: Option<WebStorage>,
}

impl Storage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { inner }
    }

    /// Storage that keeps nothing, for running outside a browser.
    #[cfg(test)]
    pub fn detached() -> Self {
        Self { inner: None }
    }

    pub fn get(&self, key: &str) -> Fallible<Option<String>> {
        match &self.inner {
            Some(storage) => storage.get_item(key).map_err(storage_error),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Fallible<()> {
        match &self.inner {
            Some(storage) => storage.set_item(key, value).map_err(storage_error),
            None => Ok(()),
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
