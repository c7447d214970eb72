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

//! CLI command implementations

mod compare;
mod completion;
mod convert;
mod dump;
mod hist;
mod metadata;
mod show;
mod slowest;
mod stats;
mod system;

pub use compare::{compare, compare_lines, ignored_lines, CompareDisplay};
pub use completion::{generate_completion_for_command, print_installation_instructions};
pub use convert::{convert, parse_metadata_updates, ConvertOptions};
pub use dump::{dump, DumpOptions};
pub use hist::{hist, hist_lines};
pub use metadata::metadata;
pub use show::{show, show_lines, ShowOptions};
pub use slowest::{slowest, slowest_lines};
pub use stats::{stats, stats_lines};
pub use system::system;

use crate::error::CliError;
use crate::render;
use perfsuite_core::{Diagnostics, SuiteCollection};
use std::io::{self, Write};
use std::path::PathBuf;

/// Load every file in order and narrow the suites to `name` when given.
///
/// Suite files are size checked and decompressed (`.gz`) by the core
/// storage layer; the limit is set with `PERFSUITE_MAX_FILE_SIZE`.
pub fn load_suites(files: &[PathBuf], name: Option<&str>) -> Result<SuiteCollection, CliError> {
    let mut data = SuiteCollection::new();
    data.load_all(files)?;
    if let Some(name) = name {
        data.include_benchmark(name)?;
    }
    tracing::debug!(suites = data.suite_count(), benchmarks = data.count(), "loaded suites");
    Ok(data)
}

/// Print lines on stdout. A closed pipe (`perfsuite show ... | head`) ends
/// the output quietly.
fn print_lines(lines: &[String]) -> Result<(), CliError> {
    write_lines(&mut io::stdout().lock(), lines)
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> Result<(), CliError> {
    let written = lines
        .iter()
        .try_for_each(|line| writeln!(out, "{}", line))
        .and_then(|()| out.flush());
    match written {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed, output truncated");
            Ok(())
        }
        Err(e) => Err(CliError::io_error("<stdout>", e)),
        Ok(()) => Ok(()),
    }
}

/// Print collected warnings and errors on stderr.
fn report_diagnostics(diagnostics: &Diagnostics) {
    for line in render::diagnostic_lines(diagnostics) {
        eprintln!("{}", line);
    }
}
