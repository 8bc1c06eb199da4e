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

//! Collection settings, read from `flashdeck.toml`.
//!
//! ```toml
//! [drill]
//! host = "127.0.0.1"
//! port = 8000
//! open_browser = true
//! card_limit = 20
//!
//! [review]
//! due_policy = "day"
//! ```

use serde::Deserialize;

use crate::error::Fallible;
use crate::scheduler::DuePolicy;

pub const CONFIG_FILE_NAME: &str = "flashdeck.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub drill: DrillConfig,
    pub review: ReviewConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrillConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
    pub card_limit: Option<usize>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            open_browser: true,
            card_limit: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewConfig {
    pub due_policy: DuePolicy,
}

impl Config {
    pub fn from_toml(source: &str) -> Fallible<Self> {
        Ok(toml::from_str(source)?)
    }
}
