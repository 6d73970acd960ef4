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
use std::str::FromStr;

use chrono::DateTime;
use chrono::Datelike;
use chrono::Duration;
use chrono::Local;
use chrono::LocalResult;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeZone;
use chrono::Utc;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::invalid;
use crate::types::timestamp::Timestamp;

/// Earliest year accepted from user input.
pub const MIN_YEAR: i32 = 1;

/// Latest year accepted from user input. Day bounds and the month grid step
/// into the following year, which must stay within four digits.
pub const MAX_YEAR: i32 = 9998;

/// Reject years outside `MIN_YEAR..=MAX_YEAR`.
pub fn check_year(year: i32) -> Fallible<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        invalid(format!(
            "year {year} is out of range ({MIN_YEAR} to {MAX_YEAR})."
        ))
    }
}

/// Step between candidates when midnight falls in a DST gap.
const GAP_SEARCH_STEP_MINUTES: i64 = 15;

/// Bound on the gap search: two days, enough to skip a whole missing day.
const GAP_SEARCH_STEPS: i64 = 2 * 24 * 60 / GAP_SEARCH_STEP_MINUTES;

/// A calendar date in the user's local time zone.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    pub fn today() -> Self {
        Timestamp::now().local_date()
    }

    pub fn succ(self) -> Self {
        Self(self.0 + Duration::days(1))
    }

    pub fn plus_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// The first instant of this day, local time.
    pub fn start_of_day(self) -> Timestamp {
        let naive = self.0.and_time(NaiveTime::MIN);
        Timestamp::new(first_instant_from(naive, |candidate| {
            Local
                .from_local_datetime(candidate)
                .map(|ts| ts.with_timezone(&Utc))
        }))
    }

    /// The last representable instant of this day, local time.
    pub fn end_of_day(self) -> Timestamp {
        self.succ().start_of_day().minus_micros(1)
    }
}

/// The earliest valid instant at or after the local time `naive`. When
/// `naive` falls in a gap, later candidates are tried until one resolves.
fn first_instant_from<F>(naive: NaiveDateTime, resolve: F) -> DateTime<Utc>
where
    F: Fn(&NaiveDateTime) -> LocalResult<DateTime<Utc>>,
{
    let step = Duration::minutes(GAP_SEARCH_STEP_MINUTES);
    let mut candidate = naive;
    for _ in 0..GAP_SEARCH_STEPS {
        match resolve(&candidate) {
            LocalResult::Single(ts) => return ts,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => {}
        }
        match candidate.checked_add_signed(step) {
            Some(next) => candidate = next,
            None => break,
        }
    }
    log::warn!("No valid local time near {naive}, using UTC.");
    Utc.from_utc_datetime(&naive)
}

impl FromStr for Date {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?;
        check_year(date.year())?;
        Ok(Self(date))
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
