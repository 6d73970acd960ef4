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

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeStruct;

use crate::config::WordGoalScope;
use crate::db::Database;
use crate::error::Fallible;
use crate::types::goal::Goal;
use crate::types::goal_type::GoalType;

/// How far along a goal is. Derived on every read, never stored.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Progress {
    pub current_count: usize,
    pub target_count: i64,
}

impl Progress {
    pub fn new(current_count: usize, target_count: i64) -> Self {
        Self {
            current_count,
            target_count,
        }
    }

    /// `current / target`, with the target floored at one.
    pub fn ratio(&self) -> f64 {
        self.current_count as f64 / self.target_count.max(1) as f64
    }

    pub fn is_complete(&self) -> bool {
        self.ratio() >= 1.0
    }

    /// Whole-number percentage, capped at 100.
    pub fn percent(&self) -> u32 {
        (self.ratio() * 100.0).min(100.0) as u32
    }

    pub fn remaining(&self) -> usize {
        let target = self.target_count.max(0) as usize;
        target.saturating_sub(self.current_count)
    }
}

impl Serialize for Progress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Progress", 6)?;
        state.serialize_field("currentCount", &self.current_count)?;
        state.serialize_field("targetCount", &self.target_count)?;
        state.serialize_field("ratio", &self.ratio())?;
        state.serialize_field("isComplete", &self.is_complete())?;
        state.serialize_field("percent", &self.percent())?;
        state.serialize_field("remaining", &self.remaining())?;
        state.end()
    }
}

/// Compute a goal's progress from the current contents of the store.
///
/// Video goals count videos watched within the goal's window. Word goals
/// count every remembered word under [`WordGoalScope::AllTime`], or only
/// those inside the window under [`WordGoalScope::GoalWindow`].
pub fn compute_progress(goal: &Goal, db: &Database, scope: WordGoalScope) -> Fallible<Progress> {
    let (start, end) = goal.window();
    let current_count = match (goal.goal_type, scope) {
        (GoalType::Video, _) => db.watched_count(start, end)?,
        (GoalType::Word, WordGoalScope::AllTime) => db.remembered_word_count(None, None)?,
        (GoalType::Word, WordGoalScope::GoalWindow) => db.remembered_word_count(start, end)?,
    };
    Ok(Progress::new(current_count, goal.target_count))
}
