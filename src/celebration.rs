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

use crate::config::Messages;
use crate::db::Database;
use crate::error::Fallible;
use crate::progress::Progress;
use crate::types::goal::Goal;
use crate::types::goal_type::GoalType;

/// Emitted once when a goal first reaches completion.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct GoalCompleted {
    pub goal: Goal,
    pub message: String,
}

/// Remembers which goals have been celebrated. The flag lives in the
/// database next to the goal, so it survives restarts.
pub struct CelebrationTracker {
    db: Database,
    messages: Messages,
}

impl CelebrationTracker {
    pub fn new(db: Database, messages: Messages) -> Self {
        Self { db, messages }
    }

    pub fn has_been_celebrated(&self, goal: &Goal) -> Fallible<bool> {
        self.db.has_been_celebrated(goal.id)
    }

    /// Returns true if this call was the one that marked the goal.
    pub fn mark_celebrated(&self, goal: &Goal) -> Fallible<bool> {
        self.db.mark_celebrated(goal.id)
    }

    /// If the goal is complete and has never been celebrated, mark it and
    /// return the notification. The mark happens before the notification
    /// is handed out.
    pub fn check(&self, goal: &Goal, progress: &Progress) -> Fallible<Option<GoalCompleted>> {
        if !progress.is_complete() || self.has_been_celebrated(goal)? {
            return Ok(None);
        }
        if !self.mark_celebrated(goal)? {
            return Ok(None);
        }
        log::info!("Goal {} completed.", goal.id);
        let mut goal = goal.clone();
        goal.completion_acknowledged = true;
        let message = self.message_for(&goal);
        Ok(Some(GoalCompleted { goal, message }))
    }

    fn message_for(&self, goal: &Goal) -> String {
        let template = match goal.goal_type {
            GoalType::Video => &self.messages.video_goal,
            GoalType::Word => &self.messages.word_goal,
        };
        template.replace("{count}", &goal.target_count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_check_fires_once() -> Fallible<()> {
        let db = Database::in_memory()?;
        let tracker = CelebrationTracker::new(db.clone(), Messages::default());
        let goal = db.add_goal(GoalType::Video, 2, Timestamp::now(), None)?;
        assert!(tracker.check(&goal, &Progress::new(1, 2))?.is_none());
        assert!(!tracker.has_been_celebrated(&goal)?);

        let event = tracker.check(&goal, &Progress::new(2, 2))?;
        let event = event.expect("first completion should be celebrated");
        assert_eq!(event.message, "Congratulations! You watched 2 videos.");
        assert!(event.goal.completion_acknowledged);
        assert!(tracker.has_been_celebrated(&goal)?);

        // A stale copy of the goal still does not fire again.
        for _ in 0..10 {
            assert!(tracker.check(&goal, &Progress::new(2, 2))?.is_none());
            assert!(tracker.has_been_celebrated(&goal)?);
        }
        Ok(())
    }

    #[test]
    fn test_mark_celebrated_directly() -> Fallible<()> {
        let db = Database::in_memory()?;
        let tracker = CelebrationTracker::new(db.clone(), Messages::default());
        let goal = db.add_goal(GoalType::Word, 5, Timestamp::now(), None)?;
        assert!(tracker.mark_celebrated(&goal)?);
        assert!(tracker.check(&goal, &Progress::new(5, 5))?.is_none());
        Ok(())
    }

    #[test]
    fn test_custom_message() -> Fallible<()> {
        let db = Database::in_memory()?;
        let messages = Messages {
            video_goal: "unused".to_string(),
            word_goal: "{count} words, well done".to_string(),
        };
        let tracker = CelebrationTracker::new(db.clone(), messages);
        let goal = db.add_goal(GoalType::Word, 7, Timestamp::now(), None)?;
        let event = tracker.check(&goal, &Progress::new(7, 7))?;
        assert_eq!(event.map(|e| e.message), Some("7 words, well done".to_string()));
        Ok(())
    }
}
