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

use std::env::current_dir;
use std::path::PathBuf;

use crate::config::Settings;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::goals::GoalBoard;

/// Name of the database file inside a collection directory.
pub const DATABASE_FILE: &str = "lingogoals.db";

/// A directory holding a user's records, goals, and settings.
pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub settings: Settings,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let settings = Settings::load(&directory)?;

        let db_path: PathBuf = directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        log::debug!("Opening database at {db_path}");
        let db: Database = Database::new(db_path)?;

        Ok(Self {
            directory,
            db,
            settings,
        })
    }

    /// A goal board loaded with the current goals.
    pub fn board(&self) -> Fallible<GoalBoard> {
        let mut board = GoalBoard::new(self.db.clone(), self.settings.clone());
        board.refresh()?;
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;
    use crate::config::SETTINGS_FILE;
    use crate::config::WordGoalScope;
    use crate::helper::create_tmp_collection;

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::new(Some("./derpherp".to_string()));
        let err = result.err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("error: directory does not exist."));
    }

    #[test]
    fn test_creates_database() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let collection = Collection::new(Some(dir.path().display().to_string()))?;
        assert!(collection.directory.join(DATABASE_FILE).exists());
        assert_eq!(collection.settings, Settings::default());
        assert!(collection.board()?.all_goals().is_empty());
        Ok(())
    }

    #[test]
    fn test_reads_settings() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        write(
            dir.path().join(SETTINGS_FILE),
            "word_goal_scope = \"goal-window\"\n",
        )?;
        let collection = Collection::new(Some(dir.path().display().to_string()))?;
        assert_eq!(
            collection.settings.word_goal_scope,
            WordGoalScope::GoalWindow
        );
        Ok(())
    }

    #[test]
    fn test_bad_settings() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        write(dir.path().join(SETTINGS_FILE), "word_goal_scope = 3\n")?;
        assert!(Collection::new(Some(dir.path().display().to_string())).is_err());
        Ok(())
    }
}
