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

use clap::Parser;
use clap::Subcommand;

use crate::cmd::calendar::show_calendar;
use crate::cmd::calendar::show_day;
use crate::cmd::format::OutputFormat;
use crate::cmd::goals::add_goal;
use crate::cmd::goals::delete_goal;
use crate::cmd::goals::list_goals;
use crate::cmd::records::list_unwatched;
use crate::cmd::records::list_videos;
use crate::cmd::records::list_words;
use crate::cmd::records::remember_word;
use crate::cmd::records::watch_video;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;
use crate::types::frequency::Frequency;
use crate::types::goal_type::GoalType;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long, global = true)]
    directory: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record that a video was watched.
    Watch {
        /// The video's ID.
        video_id: String,
    },
    /// Print the given video IDs that have not been watched yet.
    Unwatched {
        /// Video IDs to filter.
        video_ids: Vec<String>,
    },
    /// List watched videos.
    Videos {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Record that a word was memorized.
    Remember {
        /// The word.
        word: String,
        /// Its translation.
        translation: String,
    },
    /// List memorized words.
    Words {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Manage goals.
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },
    /// Summarize a single day.
    Day {
        /// The date, as YYYY-MM-DD.
        date: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the days of a month on which every goal was completed.
    Calendar {
        /// The month, as YYYY-MM. Defaults to the current month.
        month: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print collection statistics.
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Create a goal.
    Add {
        /// What the goal counts.
        #[arg(long = "type", value_enum)]
        goal_type: GoalType,
        /// How many videos or words.
        #[arg(long)]
        target: String,
        /// How long the goal runs for.
        #[arg(long, value_enum, default_value = "daily")]
        frequency: Frequency,
    },
    /// Delete a goal.
    Delete {
        /// The goal's ID.
        id: String,
    },
    /// List goals with their progress.
    List {
        /// Only show goals that are not yet complete.
        #[arg(long)]
        hide_completed: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let directory = cli.directory;
    match cli.command {
        Command::Watch { video_id } => watch_video(directory, &video_id),
        Command::Unwatched { video_ids } => list_unwatched(directory, &video_ids),
        Command::Videos { format } => list_videos(directory, format),
        Command::Remember { word, translation } => remember_word(directory, &word, &translation),
        Command::Words { format } => list_words(directory, format),
        Command::Goal { command } => match command {
            GoalCommand::Add {
                goal_type,
                target,
                frequency,
            } => add_goal(directory, goal_type, &target, frequency),
            GoalCommand::Delete { id } => delete_goal(directory, &id),
            GoalCommand::List {
                hide_completed,
                format,
            } => list_goals(directory, hide_completed, format),
        },
        Command::Day { date, format } => show_day(directory, &date, format),
        Command::Calendar { month, format } => show_calendar(directory, month, format),
        Command::Stats { format } => print_stats(directory, format),
    }
}
