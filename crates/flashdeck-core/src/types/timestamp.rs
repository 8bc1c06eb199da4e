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

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::Duration;
use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::date::Date;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// A timestamp without a timezone and millisecond precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    pub fn into_inner(self) -> NaiveDateTime {
        self.0
    }

    /// The current timestamp in the user's local time.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(chrono::Local::now().naive_local().trunc_subsecs(3))
    }

    /// The date component of this timestamp.
    pub fn date(self) -> Date {
        Date::new(self.0.date())
    }

    /// The same time of day, `days` calendar days later. Saturates at the
    /// latest (or earliest) representable timestamp.
    pub fn plus_days(self, days: i64) -> Self {
        let shifted = Duration::try_days(days).and_then(|d| self.0.checked_add_signed(d));
        match shifted {
            Some(ndt) => Self(ndt),
            None if days < 0 => Self::new(NaiveDateTime::MIN),
            None => Self::new(NaiveDateTime::MAX),
        }
    }

    /// Whole seconds elapsed between `earlier` and this timestamp.
    pub fn seconds_since(self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }

    /// Parses `YYYY-MM-DDTHH:MM:SS.sss`. A trailing `Z`, as produced by
    /// JavaScript's `toISOString`, is accepted and ignored.
    pub fn parse(value: &str) -> Fallible<Self> {
        let trimmed = value.strip_suffix('Z').unwrap_or(value);
        let ndt = NaiveDateTime::parse_from_str(trimmed, FORMAT)
            .map_err(|_| ErrorReport::new(format!("Failed to parse timestamp: '{value}'.")))?;
        Ok(Self::new(ndt))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Timestamp::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}
