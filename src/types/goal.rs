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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::types::date::Date;
use crate::types::goal_type::GoalType;
use crate::types::timestamp::Timestamp;

/// Opaque goal identity. Backed by the SQLite row id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct GoalId(i64);

impl GoalId {
    #[cfg(test)]
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for GoalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GoalId {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(GoalId)
            .map_err(|_| ErrorReport::validation(format!("invalid goal id: {s}")))
    }
}

impl ToSql for GoalId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for GoalId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id: i64 = FromSql::column_result(value)?;
        Ok(GoalId(id))
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub goal_type: GoalType,
    pub target_count: i64,
    pub created_at: Timestamp,
    /// Informational: counting is bounded by it, but reaching it does not
    /// close the goal.
    pub deadline: Option<Timestamp>,
    pub completion_acknowledged: bool,
}

impl Goal {
    /// The goal's counting window. An absent bound is unconstrained.
    pub fn window(&self) -> (Option<Timestamp>, Option<Timestamp>) {
        (Some(self.created_at), self.deadline)
    }

    /// Whether the goal's window, taken as local calendar days, covers the
    /// given date.
    pub fn is_active_on(&self, date: Date) -> bool {
        let (start, end) = self.window();
        let after_start = start.is_none_or(|start| start.local_date() <= date);
        let before_end = end.is_none_or(|end| date <= end.local_date());
        after_start && before_end
    }
}
