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

//! Suite editing command.

use crate::commands::{self, ConvertOptions};
use crate::error::CliError;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ConvertCommands {
    /// Modify a suite file and write the result
    ///
    /// Edits are applied in a fixed order: add runs, select benchmarks,
    /// select runs, remove warmups, update then extract metadata, remove
    /// all metadata and finally remove outliers.
    Convert {
        /// Input suite file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (gzip compressed when it ends with .gz)
        #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the result to stdout
        #[arg(long)]
        stdout: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        indent: bool,

        /// Add the runs of another suite file
        #[arg(long, value_name = "FILE")]
        add: Option<PathBuf>,

        /// Only keep the benchmark with this name
        #[arg(long, value_name = "NAME", conflicts_with = "exclude_benchmark")]
        include_benchmark: Option<String>,

        /// Remove the benchmark with this name
        #[arg(long, value_name = "NAME")]
        exclude_benchmark: Option<String>,

        /// Only keep these runs, e.g. 1-3,7 (1 is the first run)
        #[arg(long, value_name = "RUNS", conflicts_with = "exclude_runs")]
        include_runs: Option<String>,

        /// Remove these runs
        #[arg(long, value_name = "RUNS")]
        exclude_runs: Option<String>,

        /// Remove the warmup samples
        #[arg(long)]
        remove_warmups: bool,

        /// Set metadata, e.g. KEY1=VALUE1,KEY2=VALUE2
        #[arg(long, value_name = "METADATA")]
        update_metadata: Option<String>,

        /// Use the metadata NAME as the new samples
        #[arg(long, value_name = "NAME")]
        extract_metadata: Option<String>,

        /// Remove all metadata except the benchmark names
        #[arg(long)]
        remove_all_metadata: bool,

        /// Remove runs with a sample too far from the median
        #[arg(long)]
        remove_outliers: bool,
    },
}

impl ConvertCommands {
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            ConvertCommands::Convert {
                input,
                output,
                stdout,
                indent,
                add,
                include_benchmark,
                exclude_benchmark,
                include_runs,
                exclude_runs,
                remove_warmups,
                update_metadata,
                extract_metadata,
                remove_all_metadata,
                remove_outliers,
            } => commands::convert(
                &input,
                &ConvertOptions {
                    add,
                    include_benchmark,
                    exclude_benchmark,
                    include_runs,
                    exclude_runs,
                    remove_warmups,
                    update_metadata,
                    extract_metadata,
                    remove_all_metadata,
                    remove_outliers,
                    indent,
                    output,
                    stdout,
                },
            ),
        }
    }
}
