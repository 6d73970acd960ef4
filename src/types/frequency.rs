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

use clap::ValueEnum;

use crate::types::timestamp::Timestamp;

/// How long a goal runs for.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Frequency {
    /// One day.
    Daily,
    /// Seven days.
    Weekly,
    /// One calendar month.
    Monthly,
}

impl Frequency {
    pub fn deadline_from(self, now: Timestamp) -> Timestamp {
        match self {
            Frequency::Daily => now.plus_days(1),
            Frequency::Weekly => now.plus_days(7),
            Frequency::Monthly => now.plus_months(1),
        }
    }
}
