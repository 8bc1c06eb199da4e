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

use std::env::current_dir;
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use flashdeck_core::config::CONFIG_FILE_NAME;
use flashdeck_core::config::Config;
use flashdeck_core::error::Fallible;
use flashdeck_core::error::fail;

use crate::db::Database;

pub const DATABASE_FILE_NAME: &str = "flashdeck.db";

/// A collection directory: the card database and its settings.
pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub config: Config,
}

impl Collection {
    /// Open the collection in `directory`, or the current directory.
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        if !directory.exists() {
            return fail("directory does not exist.");
        }
        let directory = directory.canonicalize()?;
        let config = load_config(&directory)?;
        let db_path = directory.join(DATABASE_FILE_NAME);
        log::debug!("Opening database at {}", db_path.display());
        let db = Database::open(&db_path)?;
        Ok(Self {
            directory,
            db,
            config,
        })
    }
}

fn load_config(directory: &Path) -> Fallible<Config> {
    let path = directory.join(CONFIG_FILE_NAME);
    if !path.exists() {
        log::debug!("No {CONFIG_FILE_NAME} found, using defaults");
        return Ok(Config::default());
    }
    let source = read_to_string(&path)?;
    Config::from_toml(&source)
}
