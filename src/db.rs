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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::invalid;
use crate::types::goal::Goal;
use crate::types::goal::GoalId;
use crate::types::goal_type::GoalType;
use crate::types::record::RememberedWord;
use crate::types::record::WatchedVideo;
use crate::types::timestamp::Timestamp;

/// The record store. Cloning is cheap; all clones share one connection,
/// and every read or write holds the connection lock for its duration.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let conn = Connection::open(database_path)?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Fallible<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating database schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Record that a video was watched. Returns false if the video had
    /// already been recorded, in which case nothing changes.
    pub fn record_watched_video(&self, video_id: &str, watched_at: Timestamp) -> Fallible<bool> {
        let conn = self.acquire()?;
        let sql = "insert into watched_videos (video_id, watched_at) values (?, ?) on conflict (video_id) do nothing;";
        let changed = conn.execute(sql, (video_id, watched_at))?;
        if changed > 0 {
            log::debug!("Recorded watched video: {video_id}");
        }
        Ok(changed > 0)
    }

    pub fn is_watched(&self, video_id: &str) -> Fallible<bool> {
        let conn = self.acquire()?;
        let sql = "select count(*) from watched_videos where video_id = ?;";
        let count: i64 = conn.query_row(sql, [video_id], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Count watched videos in an inclusive, optionally open-ended range.
    pub fn watched_count(&self, start: Option<Timestamp>, end: Option<Timestamp>) -> Fallible<usize> {
        let sql = "select count(*) from watched_videos where (?1 is null or watched_at >= ?1) and (?2 is null or watched_at <= ?2);";
        self.count(sql, start, end)
    }

    /// All watched videos, oldest first.
    pub fn watched_videos(&self) -> Fallible<Vec<WatchedVideo>> {
        let conn = self.acquire()?;
        let mut stmt =
            conn.prepare("select video_id, watched_at from watched_videos order by watched_at;")?;
        let mut rows = stmt.query([])?;
        let mut videos = Vec::new();
        while let Some(row) = rows.next()? {
            videos.push(WatchedVideo {
                video_id: row.get(0)?,
                watched_at: row.get(1)?,
            });
        }
        Ok(videos)
    }

    /// Record that a word was memorized. Duplicates are allowed.
    pub fn record_remembered_word(
        &self,
        word: &str,
        translation: &str,
        remembered_at: Timestamp,
    ) -> Fallible<()> {
        let conn = self.acquire()?;
        let sql = "insert into remembered_words (word, translation, remembered_at) values (?, ?, ?);";
        conn.execute(sql, (word, translation, remembered_at))?;
        log::debug!("Recorded remembered word: {word}");
        Ok(())
    }

    /// Count remembered words in an inclusive, optionally open-ended range.
    pub fn remembered_word_count(
        &self,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Fallible<usize> {
        let sql = "select count(*) from remembered_words where (?1 is null or remembered_at >= ?1) and (?2 is null or remembered_at <= ?2);";
        self.count(sql, start, end)
    }

    /// All remembered words, in the order they were recorded.
    pub fn remembered_words(&self) -> Fallible<Vec<RememberedWord>> {
        let conn = self.acquire()?;
        let mut stmt = conn.prepare(
            "select word, translation, remembered_at from remembered_words order by word_id;",
        )?;
        let mut rows = stmt.query([])?;
        let mut words = Vec::new();
        while let Some(row) = rows.next()? {
            words.push(RememberedWord {
                word: row.get(0)?,
                translation: row.get(1)?,
                remembered_at: row.get(2)?,
            });
        }
        Ok(words)
    }

    /// All goals, in creation order.
    pub fn list_goals(&self) -> Fallible<Vec<Goal>> {
        let conn = self.acquire()?;
        let sql = "select goal_id, goal_type, target_count, created_at, deadline, completion_acknowledged from goals order by goal_id;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(Goal {
                id: row.get(0)?,
                goal_type: row.get(1)?,
                target_count: row.get(2)?,
                created_at: row.get(3)?,
                deadline: row.get(4)?,
                completion_acknowledged: row.get(5)?,
            });
        }
        Ok(goals)
    }

    /// Insert a new goal. The target count is not validated here.
    pub fn add_goal(
        &self,
        goal_type: GoalType,
        target_count: i64,
        created_at: Timestamp,
        deadline: Option<Timestamp>,
    ) -> Fallible<Goal> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let sql = "insert into goals (goal_type, target_count, created_at, deadline) values (?, ?, ?, ?) returning goal_id;";
        let id: GoalId = tx.query_row(
            sql,
            (goal_type, target_count, created_at, deadline),
            |row| row.get(0),
        )?;
        tx.commit()?;
        log::debug!("Added {goal_type} goal {id} with target {target_count}.");
        Ok(Goal {
            id,
            goal_type,
            target_count,
            created_at,
            deadline,
            completion_acknowledged: false,
        })
    }

    /// Delete a goal. If no goal with the given ID exists, returns an error.
    pub fn delete_goal(&self, id: GoalId) -> Fallible<()> {
        let conn = self.acquire()?;
        let changed = conn.execute("delete from goals where goal_id = ?;", [id])?;
        if changed == 0 {
            return invalid(format!("no goal with id {id}."));
        }
        log::debug!("Deleted goal {id}.");
        Ok(())
    }

    /// Whether the goal's completion has been acknowledged. Unknown goals
    /// have not.
    pub fn has_been_celebrated(&self, id: GoalId) -> Fallible<bool> {
        let conn = self.acquire()?;
        let sql = "select count(*) from goals where goal_id = ? and completion_acknowledged = 1;";
        let count: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Set the goal's acknowledged flag. Returns true only for the call
    /// that actually flipped it.
    pub fn mark_celebrated(&self, id: GoalId) -> Fallible<bool> {
        let conn = self.acquire()?;
        let sql = "update goals set completion_acknowledged = 1 where goal_id = ? and completion_acknowledged = 0;";
        let changed = conn.execute(sql, [id])?;
        Ok(changed > 0)
    }

    #[cfg(test)]
    pub fn execute_raw(&self, sql: &str) -> Fallible<()> {
        let conn = self.acquire()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    fn count(&self, sql: &str, start: Option<Timestamp>, end: Option<Timestamp>) -> Fallible<usize> {
        let conn = self.acquire()?;
        let count: i64 = conn.query_row(sql, (start, end), |row| row.get(0))?;
        Ok(count as usize)
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ErrorReport::storage("database lock poisoned"))
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["goals"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::date::Date;

    fn day(offset: i64) -> Timestamp {
        let day0: Date = "2025-04-01".parse().unwrap();
        day0.plus_days(offset).start_of_day()
    }

    #[test]
    fn test_record_watched_video_is_idempotent() -> Fallible<()> {
        let db = Database::in_memory()?;
        assert!(!db.is_watched("abc")?);
        assert!(db.record_watched_video("abc", day(0))?);
        assert!(!db.record_watched_video("abc", day(1))?);
        assert!(db.is_watched("abc")?);
        assert_eq!(db.watched_count(None, None)?, 1);
        let videos = db.watched_videos()?;
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].watched_at, day(0));
        Ok(())
    }

    #[test]
    fn test_watched_count_range() -> Fallible<()> {
        let db = Database::in_memory()?;
        db.record_watched_video("a", day(1))?;
        db.record_watched_video("b", day(3))?;
        db.record_watched_video("c", day(9))?;
        assert_eq!(db.watched_count(Some(day(0)), Some(day(7)))?, 2);
        assert_eq!(db.watched_count(Some(day(3)), None)?, 2);
        assert_eq!(db.watched_count(None, Some(day(3)))?, 2);
        // Bounds are inclusive.
        assert_eq!(db.watched_count(Some(day(3)), Some(day(3)))?, 1);
        assert_eq!(db.watched_count(Some(day(10)), None)?, 0);
        Ok(())
    }

    #[test]
    fn test_remembered_words_allow_duplicates() -> Fallible<()> {
        let db = Database::in_memory()?;
        db.record_remembered_word("apple", "elma", day(0))?;
        db.record_remembered_word("apple", "elma", day(2))?;
        db.record_remembered_word("book", "kitap", day(4))?;
        assert_eq!(db.remembered_word_count(None, None)?, 3);
        assert_eq!(db.remembered_word_count(Some(day(1)), Some(day(3)))?, 1);
        let words = db.remembered_words()?;
        assert_eq!(words.len(), 3);
        assert_eq!(words[2].word, "book");
        assert_eq!(words[2].translation, "kitap");
        Ok(())
    }

    #[test]
    fn test_goals() -> Fallible<()> {
        let db = Database::in_memory()?;
        let a = db.add_goal(GoalType::Video, 3, day(0), Some(day(7)))?;
        let b = db.add_goal(GoalType::Word, 5, day(1), None)?;
        let goals = db.list_goals()?;
        assert_eq!(goals, vec![a.clone(), b.clone()]);
        db.delete_goal(a.id)?;
        assert_eq!(db.list_goals()?, vec![b]);
        Ok(())
    }

    #[test]
    fn test_delete_unknown_goal() -> Fallible<()> {
        let db = Database::in_memory()?;
        let err = db.delete_goal(GoalId::new(99)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        Ok(())
    }

    #[test]
    fn test_mark_celebrated_flips_once() -> Fallible<()> {
        let db = Database::in_memory()?;
        let goal = db.add_goal(GoalType::Word, 1, day(0), None)?;
        assert!(!db.has_been_celebrated(goal.id)?);
        assert!(db.mark_celebrated(goal.id)?);
        assert!(!db.mark_celebrated(goal.id)?);
        assert!(db.has_been_celebrated(goal.id)?);
        assert!(db.list_goals()?[0].completion_acknowledged);
        Ok(())
    }

    #[test]
    fn test_reopen_keeps_data() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("test.db");
        let path = path.to_str().unwrap();
        {
            let db = Database::new(path)?;
            db.record_watched_video("abc", day(0))?;
            db.add_goal(GoalType::Video, 1, day(0), None)?;
        }
        let db = Database::new(path)?;
        assert!(db.is_watched("abc")?);
        assert_eq!(db.list_goals()?.len(), 1);
        Ok(())
    }
}
