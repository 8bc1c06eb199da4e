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

use flashdeck_core::error::Fallible;
use tempfile::tempdir;

use crate::cmd::init::init_collection;

/// A fresh collection directory holding the sample cards. Every sample card
/// is overdue, so a drill over it starts with cards 1 through 5.
pub fn create_tmp_collection() -> Fallible<String> {
    let dir = tempdir()?.keep();
    let dir = dir.canonicalize()?.display().to_string();
    init_collection(Some(dir.clone()), false)?;
    Ok(dir)
}
