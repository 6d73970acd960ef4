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
use crate::cmd::goals::announce_celebrations;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::invalid;
use crate::types::timestamp::Timestamp;

/// Record a watched video, then refresh the goals so any goal it completes
/// is celebrated.
pub fn watch_video(directory: Option<String>, video_id: &str) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return invalid("video ID must not be empty.");
    }
    if collection.db.record_watched_video(video_id, Timestamp::now())? {
        println!("Marked {video_id} as watched.");
    } else {
        println!("{video_id} was already watched.");
    }
    let mut board = collection.board()?;
    announce_celebrations(&mut board, OutputFormat::Text);
    Ok(())
}

/// Print the video IDs that have not been watched yet, in the given order.
pub fn list_unwatched(directory: Option<String>, video_ids: &[String]) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    for video_id in unwatched(&collection, video_ids)? {
        println!("{video_id}");
    }
    Ok(())
}

fn unwatched<'a>(collection: &Collection, video_ids: &'a [String]) -> Fallible<Vec<&'a str>> {
    let mut result = Vec::new();
    for video_id in video_ids {
        if !collection.db.is_watched(video_id)? {
            result.push(video_id.as_str());
        }
    }
    Ok(result)
}

pub fn list_videos(directory: Option<String>, format: OutputFormat) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let videos = collection.db.watched_videos()?;
    match format {
        OutputFormat::Text => {
            for video in &videos {
                println!("{}  {}", video.watched_at.local_date(), video.video_id);
            }
        }
        OutputFormat::Json => print_json(&videos)?,
    }
    Ok(())
}

pub fn remember_word(directory: Option<String>, word: &str, translation: &str) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let word = word.trim();
    if word.is_empty() {
        return invalid("word must not be empty.");
    }
    collection
        .db
        .record_remembered_word(word, translation.trim(), Timestamp::now())?;
    println!("Remembered {word}.");
    let mut board = collection.board()?;
    announce_celebrations(&mut board, OutputFormat::Text);
    Ok(())
}

pub fn list_words(directory: Option<String>, format: OutputFormat) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let words = collection.db.remembered_words()?;
    match format {
        OutputFormat::Text => {
            for word in &words {
                println!("{} = {}", word.word, word.translation);
            }
        }
        OutputFormat::Json => print_json(&words)?,
    }
    Ok(())
}
