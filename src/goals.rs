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

use crate::celebration::CelebrationTracker;
use crate::celebration::GoalCompleted;
use crate::config::Settings;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::invalid;
use crate::progress::Progress;
use crate::progress::compute_progress;
use crate::types::frequency::Frequency;
use crate::types::goal::Goal;
use crate::types::goal::GoalId;
use crate::types::goal_type::GoalType;
use crate::types::timestamp::Timestamp;

/// A goal together with its progress at the last refresh.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct GoalStatus {
    pub goal: Goal,
    pub progress: Progress,
}

/// The in-memory view of the user's goals.
///
/// The board holds the goals and their progress as of the last successful
/// [`GoalBoard::refresh`]. If a refresh fails the previous view is kept.
/// Goals that became complete during a refresh are queued as
/// [`GoalCompleted`] notifications until taken with
/// [`GoalBoard::take_celebrations`].
pub struct GoalBoard {
    db: Database,
    settings: Settings,
    celebrations: CelebrationTracker,
    all_goals: Vec<GoalStatus>,
    filtered_goals: Vec<GoalStatus>,
    hide_completed: bool,
    pending: Vec<GoalCompleted>,
}

impl GoalBoard {
    /// Create an empty board. Call `refresh` to load the goals.
    pub fn new(db: Database, settings: Settings) -> Self {
        let celebrations = CelebrationTracker::new(db.clone(), settings.messages.clone());
        Self {
            db,
            settings,
            celebrations,
            all_goals: Vec::new(),
            filtered_goals: Vec::new(),
            hide_completed: false,
            pending: Vec::new(),
        }
    }

    /// Reload the goals from the database and recompute their progress.
    pub fn refresh(&mut self) -> Fallible<()> {
        let goals = self.db.list_goals()?;
        let mut statuses = Vec::with_capacity(goals.len());
        for goal in goals {
            let progress = compute_progress(&goal, &self.db, self.settings.word_goal_scope)?;
            statuses.push(GoalStatus { goal, progress });
        }
        for status in statuses.iter_mut() {
            if let Some(event) = self.celebrations.check(&status.goal, &status.progress)? {
                status.goal.completion_acknowledged = true;
                self.pending.push(event);
            }
        }
        log::debug!("Refreshed {} goals.", statuses.len());
        self.all_goals = statuses;
        self.update_filtered_goals();
        Ok(())
    }

    pub fn toggle_hide_completed(&mut self) {
        self.hide_completed = !self.hide_completed;
        self.update_filtered_goals();
    }

    pub fn hide_completed(&self) -> bool {
        self.hide_completed
    }

    pub fn all_goals(&self) -> &[GoalStatus] {
        &self.all_goals
    }

    /// The goals to display: every goal, or only the incomplete ones when
    /// completed goals are hidden. Creation order is preserved.
    pub fn filtered_goals(&self) -> &[GoalStatus] {
        &self.filtered_goals
    }

    /// Validate the user's target count, derive the deadline from the
    /// frequency, and store the goal.
    pub fn create_goal(
        &mut self,
        goal_type: GoalType,
        target_input: &str,
        frequency: Frequency,
        now: Timestamp,
    ) -> Fallible<Goal> {
        let target_count = parse_target_count(target_input)?;
        let deadline = frequency.deadline_from(now);
        let goal = self
            .db
            .add_goal(goal_type, target_count, now, Some(deadline))?;
        self.refresh()?;
        Ok(goal)
    }

    pub fn delete_goal(&mut self, id: GoalId) -> Fallible<()> {
        self.db.delete_goal(id)?;
        self.refresh()
    }

    /// Drain the queued completion notifications.
    pub fn take_celebrations(&mut self) -> Vec<GoalCompleted> {
        std::mem::take(&mut self.pending)
    }

    fn update_filtered_goals(&mut self) {
        self.filtered_goals = if self.hide_completed {
            self.all_goals
                .iter()
                .filter(|status| status.progress.ratio() < 1.0)
                .cloned()
                .collect()
        } else {
            self.all_goals.clone()
        };
    }
}

fn parse_target_count(input: &str) -> Fallible<i64> {
    match input.trim().parse::<u32>() {
        Ok(count) if count > 0 => Ok(count as i64),
        _ => invalid("enter a valid goal count."),
    }
}
