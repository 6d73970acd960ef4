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

use chrono::Datelike;
use chrono::NaiveDate;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::date::check_year;

/// A calendar month, e.g. `2025-06`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Fallible<Self> {
        check_year(year)?;
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(first) => Ok(Self { first }),
            None => Err(ErrorReport::validation(format!(
                "invalid month: {year}-{month:02}"
            ))),
        }
    }

    pub fn containing(date: Date) -> Self {
        let date = date.into_inner();
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn first_day(self) -> Date {
        Date::new(self.first)
    }

    /// Every day of the month, in order.
    pub fn days(self) -> Vec<Date> {
        let mut days = Vec::new();
        let mut date = self.first;
        while date.month() == self.first.month() {
            days.push(Date::new(date));
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        days
    }
}

impl FromStr for Month {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorReport::validation(format!("invalid month: {s} (expected YYYY-MM)"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}
