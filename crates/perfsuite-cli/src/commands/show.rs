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

//! Show command - one result per benchmark, with optional details

use super::{load_suites, print_lines, report_diagnostics};
use crate::error::CliError;
use crate::render::{
    check_stability, histogram_lines, metadata_lines, runs_lines, stats_lines, terminal_columns,
    title,
};
use perfsuite_core::{common_metadata, BenchmarkSuite, Diagnostics, Metadata, SuiteCollection};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
pub struct ShowOptions {
    /// Skip stability checks.
    pub quiet: bool,
    pub metadata: bool,
    pub hist: bool,
    pub stats: bool,
    pub dump: bool,
}

impl ShowOptions {
    fn multiline(&self) -> bool {
        self.metadata || self.hist || self.stats || self.dump
    }
}

pub fn show(files: &[PathBuf], name: Option<&str>, options: ShowOptions) -> Result<(), CliError> {
    let data = load_suites(files, name)?;
    let mut diagnostics = Diagnostics::new();
    let lines = show_lines(&data, options, terminal_columns(), &mut diagnostics);
    print_lines(&lines)?;
    report_diagnostics(&diagnostics);
    Ok(())
}

/// Per-benchmark metadata with the entries shared by all benchmarks moved
/// into a "Common metadata" block.
fn split_metadata(data: &SuiteCollection, lines: &mut Vec<String>) -> Vec<Metadata> {
    let mut metadatas: Vec<Metadata> = data
        .iter()
        .map(|item| item.benchmark.get_metadata())
        .collect();
    if metadatas.len() < 2 {
        return metadatas;
    }

    // the name is already the title
    for metadata in &mut metadatas {
        metadata.remove("name");
    }
    let common = common_metadata(&metadatas);
    if !common.is_empty() {
        lines.extend(metadata_lines(&common, Some("Common metadata:")));
        lines.push(String::new());
    }
    for metadata in &mut metadatas {
        metadata.retain(|key, _| !common.contains_key(key));
    }
    metadatas
}

fn is_new_suite(previous: Option<&BenchmarkSuite>, suite: &BenchmarkSuite) -> bool {
    previous.map_or(true, |p| !std::ptr::eq(p, suite))
}

/// Render `show`. Stability warnings go to `diagnostics`; any of them
/// switches to the titled layout.
pub fn show_lines(
    data: &SuiteCollection,
    options: ShowOptions,
    columns: usize,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let mut lines = Vec::new();
    let metadatas = if options.metadata {
        split_metadata(data, &mut lines)
    } else {
        Vec::new()
    };

    let mut unstable = 0;
    if !options.quiet {
        for item in data {
            let subject = item
                .title
                .clone()
                .unwrap_or_else(|| item.benchmark.display_name().to_string());
            unstable += check_stability(item.benchmark, &subject, diagnostics);
        }
    }

    let mut previous: Option<&BenchmarkSuite> = None;
    if options.multiline() || unstable > 0 {
        let show_label = data.suite_count() > 1;
        let show_name = show_label || data.suites().first().map_or(false, |s| s.len() > 1);

        for (index, item) in data.iter().enumerate() {
            if show_label && is_new_suite(previous, item.suite) {
                lines.extend(title(&item.label, 1));
            }
            previous = Some(item.suite);
            if show_name {
                lines.extend(title(item.benchmark.display_name(), 2));
            }

            if let Some(metadata) = metadatas.get(index).filter(|m| !m.is_empty()) {
                lines.extend(metadata_lines(metadata, None));
                lines.push(String::new());
            }
            if options.hist {
                lines.extend(histogram_lines(&[(item.benchmark, None)], None, false, columns));
                lines.push(String::new());
            }
            if options.stats {
                lines.extend(stats_lines(item.benchmark));
                lines.push(String::new());
            }
            if options.dump {
                lines.extend(runs_lines(item.benchmark, false, false, false));
                lines.push(String::new());
            }

            lines.push(format!("Mean +- std dev: {}", item.benchmark));
            if !item.is_last {
                lines.push(String::new());
            }
        }
    } else {
        let use_titles = data.suite_count() > 1;
        for item in data {
            if use_titles && is_new_suite(previous, item.suite) {
                if previous.is_some() {
                    lines.push(String::new());
                }
                lines.extend(title(&item.label, 1));
            }
            previous = Some(item.suite);

            match item.title {
                Some(_) => lines.push(format!(
                    "{}: {}",
                    item.benchmark.display_name(),
                    item.benchmark
                )),
                None => lines.push(item.benchmark.to_string()),
            }
        }
    }
    lines
}
