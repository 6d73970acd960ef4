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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;

/// Name of the optional settings file inside a collection directory.
pub const SETTINGS_FILE: &str = "lingogoals.toml";

/// Which remembered words count towards a word goal.
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WordGoalScope {
    /// Every word ever remembered.
    #[default]
    AllTime,
    /// Only words remembered inside the goal's window, like video goals.
    GoalWindow,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub video_goal: String,
    pub word_goal: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            video_goal: "Congratulations! You watched {count} videos.".to_string(),
            word_goal: "Congratulations! You memorized {count} words.".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub word_goal_scope: WordGoalScope,
    pub messages: Messages,
}

impl Settings {
    /// Load settings from the collection directory, falling back to the
    /// defaults when there is no settings file.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(SETTINGS_FILE);
        if !path.exists() {
            log::debug!("No settings file, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }
}
