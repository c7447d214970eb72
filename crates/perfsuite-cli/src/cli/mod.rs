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

//! CLI command definitions and argument parsing.
//!
//! Commands are grouped by category and flattened into [`Commands`]:
//!
//! ```text
//! Commands
//! ├── Inspect (show, hist, stats, dump, slowest)
//! ├── Compare (compare, compare-to)
//! ├── Convert (convert)
//! ├── System (metadata, system)
//! └── Utility (completion)
//! ```

mod compare;
mod convert;
mod inspect;
mod system;
mod utility;

use crate::error::CliError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use compare::CompareCommands;
pub use convert::ConvertCommands;
pub use inspect::InspectCommands;
pub use system::{SystemAction, SystemCommands};
pub use utility::UtilityCommands;

/// Perfsuite - inspect and compare benchmark suite files
#[derive(Parser)]
#[command(name = "perfsuite")]
#[command(
    author,
    version,
    about = "Perfsuite - inspect and compare benchmark suite files",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Inspect(InspectCommands),

    #[command(flatten)]
    Compare(CompareCommands),

    #[command(flatten)]
    Convert(ConvertCommands),

    #[command(flatten)]
    System(SystemCommands),

    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    ///
    /// Returns the first error of the command: unreadable or invalid suite
    /// files, a missing benchmark, an impossible edit or failed system
    /// operations.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Inspect(cmd) => cmd.execute(),
            Commands::Compare(cmd) => cmd.execute(),
            Commands::Convert(cmd) => cmd.execute(),
            Commands::System(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}

/// Suite files and benchmark selection shared by the reading commands.
#[derive(Args, Debug, Clone)]
pub struct SuiteArgs {
    /// Only use the benchmark with this name
    #[arg(short = 'b', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Benchmark suite files (JSON, optionally gzipped)
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

impl SuiteArgs {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
