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

use crate::calendar::DaySummary;
use crate::calendar::calendar_completion_map;
use crate::calendar::day_summary;
use crate::calendar::month_grid;
use crate::cmd::format::OutputFormat;
use crate::cmd::format::print_json;
use crate::cmd::goals::announce_celebrations;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::month::Month;

pub fn show_day(directory: Option<String>, date: &str, format: OutputFormat) -> Fallible<()> {
    let date: Date = date.parse()?;
    let collection = Collection::new(directory)?;
    let mut board = collection.board()?;
    let summary = day_summary(&collection.db, board.all_goals(), date)?;
    match format {
        OutputFormat::Text => print!("{}", render_day(&summary)),
        OutputFormat::Json => print_json(&summary)?,
    }
    announce_celebrations(&mut board, format);
    Ok(())
}

fn render_day(summary: &DaySummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", summary.date));
    out.push_str(&format!("Videos watched: {}\n", summary.watched_count));
    out.push_str(&format!("Words memorized: {}\n", summary.remembered_count));
    if summary.goals.is_empty() {
        out.push_str("No goals on this day.\n");
    } else {
        out.push_str("Goals:\n");
        for goal in &summary.goals {
            out.push_str(&format!(
                "  #{} {} (target {})\n",
                goal.id, goal.goal_type, goal.target_count
            ));
        }
    }
    out
}

pub fn show_calendar(
    directory: Option<String>,
    month: Option<String>,
    format: OutputFormat,
) -> Fallible<()> {
    let month: Month = match month {
        Some(month) => month.parse()?,
        None => Month::containing(Date::today()),
    };
    let collection = Collection::new(directory)?;
    let mut board = collection.board()?;
    let completion = calendar_completion_map(board.all_goals(), month);
    match format {
        OutputFormat::Text => print!("{}", render_month(month, &completion)),
        OutputFormat::Json => print_json(&completion)?,
    }
    announce_celebrations(&mut board, format);
    Ok(())
}

/// Render a Monday-first month view. Completed days are marked with `*`;
/// days of the neighbouring months are left blank.
fn render_month(month: Month, completion: &BTreeMap<Date, bool>) -> String {
    let mut out = format!("{month}\n Mo  Tu  We  Th  Fr  Sa  Su\n");
    for week in month_grid(month).chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|date| match completion.get(date) {
                Some(done) => {
                    let day = date.into_inner().format("%e").to_string();
                    format!("{day}{}", if *done { "*" } else { " " })
                }
                None => "   ".to_string(),
            })
            .collect();
        let line = format!(" {}", cells.join(" "));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::helper::create_tmp_collection;
    use crate::helper::directory_arg;

    #[test]
    fn test_invalid_inputs() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let err = show_day(directory_arg(&dir), "yesterday", OutputFormat::Text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = show_calendar(directory_arg(&dir), Some("2025-00".to_string()), OutputFormat::Text)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        Ok(())
    }

    #[test]
    fn test_far_future_dates_are_rejected() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        let err = show_day(directory_arg(&dir), "+262142-12-31", OutputFormat::Text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = show_calendar(directory_arg(&dir), Some("262142-12".to_string()), OutputFormat::Text)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        show_day(directory_arg(&dir), "9998-12-31", OutputFormat::Text)?;
        show_calendar(directory_arg(&dir), Some("9998-12".to_string()), OutputFormat::Text)?;
        Ok(())
    }

    #[test]
    fn test_show_day_and_calendar() -> Fallible<()> {
        let dir = create_tmp_collection()?;
        show_day(directory_arg(&dir), "2025-01-15", OutputFormat::Json)?;
        show_calendar(directory_arg(&dir), None, OutputFormat::Text)?;
        show_calendar(directory_arg(&dir), Some("2025-02".to_string()), OutputFormat::Json)?;
        Ok(())
    }

    #[test]
    fn test_render_day() -> Fallible<()> {
        let summary = DaySummary {
            date: "2025-01-15".parse()?,
            goals: Vec::new(),
            watched_count: 2,
            remembered_count: 0,
        };
        assert_eq!(
            render_day(&summary),
            "2025-01-15\nVideos watched: 2\nWords memorized: 0\nNo goals on this day.\n"
        );
        Ok(())
    }

    #[test]
    fn test_render_month() -> Fallible<()> {
        // September 2025 starts on a Monday and has 30 days.
        let month: Month = "2025-09".parse()?;
        let mut completion = BTreeMap::new();
        for date in month.days() {
            completion.insert(date, false);
        }
        completion.insert("2025-09-02".parse()?, true);
        let rendered = render_month(month, &completion);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "2025-09");
        assert_eq!(lines[2], "  1   2*  3   4   5   6   7");
        assert_eq!(lines[6], " 29  30");
        assert_eq!(lines[7], "");
        Ok(())
    }
}
