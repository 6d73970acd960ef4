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

use crate::cmd::format::OutputFormat;
use crate::cmd::format::print_json;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::goals::GoalBoard;
use crate::goals::GoalStatus;
use crate::types::frequency::Frequency;
use crate::types::goal::GoalId;
use crate::types::goal_type::GoalType;
use crate::types::timestamp::Timestamp;

/// Print every pending completion message. With JSON output the messages
/// go to stderr so stdout stays parseable.
pub fn announce_celebrations(board: &mut GoalBoard, format: OutputFormat) {
    for event in board.take_celebrations() {
        match format {
            OutputFormat::Text => println!("{}", event.message),
            OutputFormat::Json => eprintln!("{}", event.message),
        }
    }
}

pub fn add_goal(
    directory: Option<String>,
    goal_type: GoalType,
    target: &str,
    frequency: Frequency,
) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let mut board = collection.board()?;
    let goal = board.create_goal(goal_type, target, frequency, Timestamp::now())?;
    println!("Added goal #{}.", goal.id);
    announce_celebrations(&mut board, OutputFormat::Text);
    Ok(())
}

pub fn delete_goal(directory: Option<String>, id: &str) -> Fallible<()> {
    let id: GoalId = id.parse()?;
    let collection = Collection::new(directory)?;
    let mut board = collection.board()?;
    board.delete_goal(id)?;
    println!("Deleted goal #{id}.");
    announce_celebrations(&mut board, OutputFormat::Text);
    Ok(())
}

pub fn list_goals(
    directory: Option<String>,
    hide_completed: bool,
    format: OutputFormat,
) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let mut board = collection.board()?;
    if hide_completed {
        board.toggle_hide_completed();
    }
    match format {
        OutputFormat::Text => {
            if board.all_goals().is_empty() {
                println!("No goals yet.");
            } else if board.filtered_goals().is_empty() && board.hide_completed() {
                println!("All goals completed.");
            }
            for status in board.filtered_goals() {
                println!("{}", goal_line(status));
            }
        }
        OutputFormat::Json => print_json(&board.filtered_goals())?,
    }
    announce_celebrations(&mut board, format);
    Ok(())
}

fn goal_line(status: &GoalStatus) -> String {
    let goal = &status.goal;
    let progress = &status.progress;
    let mut line = format!(
        "#{} {} {}/{} ({}%), {} remaining",
        goal.id,
        goal.goal_type,
        progress.current_count,
        goal.target_count,
        progress.percent(),
        progress.remaining(),
    );
    if let Some(deadline) = goal.deadline {
        line.push_str(&format!(", due {}", deadline.local_date()));
    }
    if progress.is_complete() {
        line.push_str(" [done]");
    }
    line
}
