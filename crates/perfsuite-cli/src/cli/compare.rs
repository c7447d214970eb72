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

//! Suite comparison commands.

use super::SuiteArgs;
use crate::commands::{self, CompareDisplay};
use crate::error::CliError;
use clap::Subcommand;
use perfsuite_core::{CompareMode, CompareOptions};

#[derive(Subcommand)]
pub enum CompareCommands {
    /// Rank suites by speed for each common benchmark
    ///
    /// Every suite is compared with every other one; the fastest suite is
    /// used as the reference in the output.
    Compare {
        #[command(flatten)]
        suites: SuiteArgs,

        /// Hide benchmarks with no significant change
        #[arg(short, long)]
        quiet: bool,

        /// Show every compared pair
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare suites against the first one
    #[command(name = "compare-to")]
    CompareTo {
        #[command(flatten)]
        suites: SuiteArgs,

        /// Hide benchmarks with no significant change
        #[arg(short, long)]
        quiet: bool,

        /// List benchmarks with the same speed
        #[arg(short, long)]
        verbose: bool,

        /// Group faster, slower and same speed benchmarks (two suites only)
        #[arg(short = 'G', long)]
        group_by_speed: bool,

        /// Minimum change in percent to consider a benchmark faster or slower
        #[arg(long, value_name = "PERCENT")]
        min_speed: Option<f64>,
    },
}

impl CompareCommands {
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            CompareCommands::Compare {
                suites,
                quiet,
                verbose,
            } => {
                let options = CompareOptions {
                    mode: CompareMode::Ranked,
                    ..Default::default()
                };
                commands::compare(
                    &suites.files,
                    suites.name(),
                    &options,
                    CompareDisplay { quiet, verbose },
                )
            }
            CompareCommands::CompareTo {
                suites,
                quiet,
                verbose,
                group_by_speed,
                min_speed,
            } => {
                let options = CompareOptions {
                    mode: CompareMode::Baseline,
                    group_by_speed,
                    min_speed,
                };
                commands::compare(
                    &suites.files,
                    suites.name(),
                    &options,
                    CompareDisplay { quiet, verbose },
                )
            }
        }
    }
}
