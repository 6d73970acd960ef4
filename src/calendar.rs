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

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::db::Database;
use crate::error::Fallible;
use crate::goals::GoalStatus;
use crate::types::date::Date;
use crate::types::goal::Goal;
use crate::types::month::Month;

/// Number of cells in a month grid: six Monday-first weeks.
pub const GRID_CELLS: usize = 42;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: Date,
    pub goals: Vec<Goal>,
    pub watched_count: usize,
    pub remembered_count: usize,
}

/// The goals whose window covers the given date.
pub fn goals_active_on(goals: &[GoalStatus], date: Date) -> Vec<&GoalStatus> {
    goals
        .iter()
        .filter(|status| status.goal.is_active_on(date))
        .collect()
}

/// True iff at least one goal is active on the date and every active goal
/// is complete. Completion is that of the goal as a whole, not of the day.
pub fn are_goals_completed_for_date(goals: &[GoalStatus], date: Date) -> bool {
    let active = goals_active_on(goals, date);
    !active.is_empty() && active.iter().all(|status| status.progress.is_complete())
}

/// What happened on a given day.
pub fn day_summary(db: &Database, goals: &[GoalStatus], date: Date) -> Fallible<DaySummary> {
    let start = Some(date.start_of_day());
    let end = Some(date.end_of_day());
    Ok(DaySummary {
        date,
        goals: goals_active_on(goals, date)
            .into_iter()
            .map(|status| status.goal.clone())
            .collect(),
        watched_count: db.watched_count(start, end)?,
        remembered_count: db.remembered_word_count(start, end)?,
    })
}

/// Completion flag for every day of a month.
pub fn calendar_completion_map(goals: &[GoalStatus], month: Month) -> BTreeMap<Date, bool> {
    month
        .days()
        .into_iter()
        .map(|date| (date, are_goals_completed_for_date(goals, date)))
        .collect()
}

/// The dates shown in a month view: six Monday-first weeks, starting with
/// the Monday on or before the first of the month.
pub fn month_grid(month: Month) -> Vec<Date> {
    let first = month.first_day();
    let shift = first.into_inner().weekday().num_days_from_monday() as i64;
    let start = first.plus_days(-shift);
    (0..GRID_CELLS as i64).map(|i| start.plus_days(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::goals::GoalBoard;
    use crate::types::frequency::Frequency;
    use crate::types::goal_type::GoalType;
    use crate::types::timestamp::Timestamp;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn noon(date: Date) -> Timestamp {
        date.start_of_day().plus_hours(12)
    }

    #[test]
    fn test_no_active_goals_is_not_complete() -> Fallible<()> {
        assert!(!are_goals_completed_for_date(&[], date("2025-01-01")));
        let db = Database::in_memory()?;
        let mut board = GoalBoard::new(db.clone(), Settings::default());
        board.create_goal(GoalType::Word, "1", Frequency::Daily, noon(date("2025-01-10")))?;
        db.record_remembered_word("a", "b", noon(date("2025-01-10")))?;
        board.refresh()?;
        assert!(are_goals_completed_for_date(board.all_goals(), date("2025-01-10")));
        assert!(!are_goals_completed_for_date(board.all_goals(), date("2025-01-05")));
        Ok(())
    }

    #[test]
    fn test_all_active_goals_must_be_complete() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut board = GoalBoard::new(db.clone(), Settings::default());
        let day0 = date("2025-03-03");
        board.create_goal(GoalType::Video, "1", Frequency::Weekly, noon(day0))?;
        board.create_goal(GoalType::Video, "2", Frequency::Daily, noon(day0))?;
        db.record_watched_video("a", noon(day0.plus_days(1)))?;
        board.refresh()?;

        // Both goals are active on day 0 and day 1; only the weekly one is done.
        assert!(!are_goals_completed_for_date(board.all_goals(), day0));
        assert!(!are_goals_completed_for_date(board.all_goals(), day0.plus_days(1)));
        // Only the weekly goal is active on day 3.
        assert!(are_goals_completed_for_date(board.all_goals(), day0.plus_days(3)));
        assert_eq!(goals_active_on(board.all_goals(), day0.plus_days(3)).len(), 1);
        Ok(())
    }

    #[test]
    fn test_day_summary() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut board = GoalBoard::new(db.clone(), Settings::default());
        let day0 = date("2025-05-12");
        board.create_goal(GoalType::Video, "3", Frequency::Weekly, noon(day0))?;
        db.record_watched_video("a", day0.start_of_day())?;
        db.record_watched_video("b", day0.end_of_day())?;
        db.record_watched_video("c", day0.succ().start_of_day())?;
        db.record_remembered_word("w", "k", noon(day0))?;
        board.refresh()?;

        let summary = day_summary(&db, board.all_goals(), day0)?;
        assert_eq!(summary.watched_count, 2);
        assert_eq!(summary.remembered_count, 1);
        assert_eq!(summary.goals.len(), 1);

        let summary = day_summary(&db, board.all_goals(), day0.plus_days(30))?;
        assert_eq!(summary.watched_count, 0);
        assert!(summary.goals.is_empty());
        Ok(())
    }

    #[test]
    fn test_deleted_goal_is_never_active() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut board = GoalBoard::new(db.clone(), Settings::default());
        let day0 = date("2025-07-01");
        let goal = board.create_goal(GoalType::Video, "1", Frequency::Monthly, noon(day0))?;
        assert!(!goals_active_on(board.all_goals(), day0.plus_days(10)).is_empty());
        board.delete_goal(goal.id)?;
        assert!(board.filtered_goals().is_empty());
        for offset in -5..40 {
            assert!(goals_active_on(board.all_goals(), day0.plus_days(offset)).is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_calendar_completion_map() -> Fallible<()> {
        let db = Database::in_memory()?;
        let mut board = GoalBoard::new(db.clone(), Settings::default());
        let day0 = date("2025-06-10");
        board.create_goal(GoalType::Word, "1", Frequency::Weekly, noon(day0))?;
        db.record_remembered_word("a", "b", noon(day0))?;
        board.refresh()?;

        let map = calendar_completion_map(board.all_goals(), "2025-06".parse()?);
        assert_eq!(map.len(), 30);
        let done: Vec<String> = map
            .iter()
            .filter(|(_, done)| **done)
            .map(|(date, _)| date.to_string())
            .collect();
        assert_eq!(done.first().map(String::as_str), Some("2025-06-10"));
        assert_eq!(done.last().map(String::as_str), Some("2025-06-17"));
        assert_eq!(done.len(), 8);
        Ok(())
    }

    #[test]
    fn test_month_grid() -> Fallible<()> {
        // June 2025 starts on a Sunday.
        let grid = month_grid("2025-06".parse()?);
        assert_eq!(grid.len(), GRID_CELLS);
        assert_eq!(grid[0].to_string(), "2025-05-26");
        assert_eq!(grid[6].to_string(), "2025-06-01");
        assert_eq!(grid[41].to_string(), "2025-07-06");
        // September 2025 starts on a Monday.
        let grid = month_grid("2025-09".parse()?);
        assert_eq!(grid[0].to_string(), "2025-09-01");
        Ok(())
    }
}
