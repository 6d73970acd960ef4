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

use crate::calendar::day_summary;
use crate::cmd::format::OutputFormat;
use crate::cmd::format::print_json;
use crate::cmd::goals::announce_celebrations;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::goals::GoalBoard;
use crate::types::date::Date;

pub fn print_stats(directory: Option<String>, format: OutputFormat) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let mut board = collection.board()?;
    let stats = collect_stats(&collection, &board, Date::today())?;
    match format {
        OutputFormat::Text => {
            println!("Collection: {}", stats.directory);
            println!("Videos watched: {}", stats.watched_count);
            println!("Words memorized: {}", stats.remembered_count);
            println!(
                "Goals: {} ({} completed)",
                stats.goal_count, stats.completed_goal_count
            );
            println!(
                "Today: {} videos, {} words",
                stats.today_watched_count, stats.today_remembered_count
            );
        }
        OutputFormat::Json => print_json(&stats)?,
    }
    announce_celebrations(&mut board, format);
    Ok(())
}

fn collect_stats(collection: &Collection, board: &GoalBoard, today: Date) -> Fallible<Stats> {
    let today = day_summary(&collection.db, board.all_goals(), today)?;
    Ok(Stats {
        directory: collection.directory.display().to_string(),
        watched_count: collection.db.watched_count(None, None)?,
        remembered_count: collection.db.remembered_word_count(None, None)?,
        goal_count: board.all_goals().len(),
        completed_goal_count: board
            .all_goals()
            .iter()
            .filter(|status| status.progress.is_complete())
            .count(),
        today_watched_count: today.watched_count,
        today_remembered_count: today.remembered_count,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    directory: String,
    watched_count: usize,
    remembered_count: usize,
    goal_count: usize,
    completed_goal_count: usize,
    today_watched_count: usize,
    today_remembered_count: usize,
}
