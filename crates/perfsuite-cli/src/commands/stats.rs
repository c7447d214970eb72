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

//! Stats command - detailed statistics per benchmark and per suite

use super::{load_suites, print_lines};
use crate::error::CliError;
use crate::render::{self, title};
use perfsuite_core::format::format_seconds;
use perfsuite_core::{BenchmarkSuite, SuiteCollection};
use std::path::PathBuf;

pub fn stats(files: &[PathBuf], name: Option<&str>) -> Result<(), CliError> {
    let data = load_suites(files, name)?;
    print_lines(&stats_lines(&data))?;
    Ok(())
}

fn suite_header(suite: &BenchmarkSuite) -> Vec<String> {
    let mut lines = vec![
        format!("Number of benchmarks: {}", suite.len()),
        format!("Total duration: {}", format_seconds(suite.total_duration())),
    ];
    if let Some((start, end)) = suite.dates() {
        lines.push(format!("Start date: {}", start.format("%Y-%m-%dT%H:%M:%S")));
        lines.push(format!("End date: {}", end.format("%Y-%m-%dT%H:%M:%S")));
    }
    lines.push(String::new());
    lines
}

pub fn stats_lines(data: &SuiteCollection) -> Vec<String> {
    let use_titles =
        data.suite_count() > 1 || data.suites().first().map_or(false, |s| s.len() > 1);

    let mut lines = Vec::new();
    let mut previous: Option<&BenchmarkSuite> = None;
    for item in data {
        let new_suite = previous.map_or(true, |p| !std::ptr::eq(p, item.suite));
        previous = Some(item.suite);
        if use_titles {
            if new_suite {
                lines.extend(title(&item.label, 1));
                lines.extend(suite_header(item.suite));
            }
            lines.extend(title(item.benchmark.display_name(), 2));
        }

        lines.extend(render::stats_lines(item.benchmark));
        if !item.is_last {
            lines.push(String::new());
        }
    }
    lines
}
