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

//! Commands that print the content of suite files.

use super::SuiteArgs;
use crate::commands::{self, DumpOptions, ShowOptions};
use crate::error::CliError;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum InspectCommands {
    /// Summarize each benchmark (mean +- std dev)
    ///
    /// Switches to a detailed layout when metadata, histograms, statistics
    /// or runs are requested, or when a benchmark looks unstable.
    Show {
        #[command(flatten)]
        suites: SuiteArgs,

        /// Do not check stability
        #[arg(short, long)]
        quiet: bool,

        /// Show metadata
        #[arg(short, long)]
        metadata: bool,

        /// Show a histogram of the samples
        #[arg(short = 'g', long)]
        hist: bool,

        /// Show statistics
        #[arg(short = 't', long)]
        stats: bool,

        /// Show all runs
        #[arg(short, long)]
        dump: bool,
    },

    /// Render text histograms of the samples
    Hist {
        #[command(flatten)]
        suites: SuiteArgs,

        /// Number of histogram bars (default: 25, or less depending on the terminal size)
        #[arg(short = 'n', long, value_name = "BINS")]
        bins: Option<usize>,

        /// Use the full terminal width
        #[arg(long)]
        extend: bool,
    },

    /// Compute statistics of each benchmark
    Stats {
        #[command(flatten)]
        suites: SuiteArgs,
    },

    /// Print the runs of each benchmark
    Dump {
        #[command(flatten)]
        suites: SuiteArgs,

        /// Only show samples
        #[arg(short, long)]
        quiet: bool,

        /// Show run metadata
        #[arg(short, long)]
        verbose: bool,

        /// Print raw values in seconds
        #[arg(long)]
        raw: bool,
    },

    /// List the benchmarks which took the most time
    Slowest {
        #[command(flatten)]
        suites: SuiteArgs,

        /// Number of benchmarks per suite
        #[arg(short = 'n', default_value_t = 5)]
        count: usize,
    },
}

impl InspectCommands {
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            InspectCommands::Show {
                suites,
                quiet,
                metadata,
                hist,
                stats,
                dump,
            } => commands::show(
                &suites.files,
                suites.name(),
                ShowOptions {
                    quiet,
                    metadata,
                    hist,
                    stats,
                    dump,
                },
            ),
            InspectCommands::Hist {
                suites,
                bins,
                extend,
            } => commands::hist(&suites.files, suites.name(), bins, extend),
            InspectCommands::Stats { suites } => commands::stats(&suites.files, suites.name()),
            InspectCommands::Dump {
                suites,
                quiet,
                verbose,
                raw,
            } => commands::dump(
                &suites.files,
                suites.name(),
                DumpOptions {
                    quiet,
                    verbose,
                    raw,
                },
            ),
            InspectCommands::Slowest { suites, count } => {
                commands::slowest(&suites.files, suites.name(), count)
            }
        }
    }
}
