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

//! Dump command - every run of every benchmark

use super::{load_suites, print_lines};
use crate::error::CliError;
use crate::render::{runs_lines, title};
use perfsuite_core::{BenchmarkSuite, SuiteCollection};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    pub quiet: bool,
    pub verbose: bool,
    pub raw: bool,
}

pub fn dump(files: &[PathBuf], name: Option<&str>, options: DumpOptions) -> Result<(), CliError> {
    let data = load_suites(files, name)?;
    print_lines(&dump_lines(&data, options))?;
    Ok(())
}

fn dump_lines(data: &SuiteCollection, options: DumpOptions) -> Vec<String> {
    let use_titles =
        data.suite_count() > 1 || data.suites().first().map_or(false, |s| s.len() > 1);

    let mut lines = Vec::new();
    let mut previous: Option<&BenchmarkSuite> = None;
    for item in data {
        if use_titles {
            if previous.map_or(true, |p| !std::ptr::eq(p, item.suite)) {
                lines.extend(title(&item.label, 1));
            }
            lines.extend(title(item.benchmark.display_name(), 2));
        }
        previous = Some(item.suite);

        lines.extend(runs_lines(item.benchmark, options.quiet, options.verbose, options.raw));
        if !item.is_last {
            lines.push(String::new());
        }
    }
    lines
}
