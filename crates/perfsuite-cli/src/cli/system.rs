// Dweve Perfsuite - Benchmark Suite Inspection Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Host inspection and tuning commands.

use crate::commands;
use crate::error::CliError;
use crate::system::Action;
use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum SystemCommands {
    /// Print the metadata collected about this host
    Metadata {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show, tune or reset the system for benchmarking
    System {
        #[arg(value_enum, default_value_t = SystemAction::Show)]
        action: SystemAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SystemAction {
    /// Show the current state
    Show,
    /// Tune the system for stable benchmarks
    Tune,
    /// Restore the default settings
    Reset,
}

impl From<SystemAction> for Action {
    fn from(action: SystemAction) -> Self {
        match action {
            SystemAction::Show => Action::Show,
            SystemAction::Tune => Action::Tune,
            SystemAction::Reset => Action::Reset,
        }
    }
}

impl SystemCommands {
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            SystemCommands::Metadata { json } => commands::metadata(json),
            SystemCommands::System { action } => commands::system(action.into()),
        }
    }
}
