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

//! Hist command - text histograms of benchmark samples

use super::{load_suites, print_lines};
use crate::error::CliError;
use crate::render::{histogram_lines, terminal_columns, title};
use perfsuite_core::{Benchmark, SuiteCollection};
use std::path::PathBuf;

pub fn hist(
    files: &[PathBuf],
    name: Option<&str>,
    bins: Option<usize>,
    extend: bool,
) -> Result<(), CliError> {
    if bins == Some(0) {
        return Err(CliError::invalid_input("the number of bins must be at least 1"));
    }
    let data = load_suites(files, name)?;
    print_lines(&hist_lines(&data, bins, extend, terminal_columns()))?;
    Ok(())
}

/// Benchmarks sharing a name are drawn on common buckets; the others are
/// drawn one by one afterwards.
pub fn hist_lines(
    data: &SuiteCollection,
    bins: Option<usize>,
    extend: bool,
    columns: usize,
) -> Vec<String> {
    let ignored = data.group_by_name_ignored();
    let groups = data.group_by_name();
    let show_label = data.suite_count() > 1;
    let show_group_name = groups.len() > 1;

    let mut lines = Vec::new();
    for group in &groups {
        if show_group_name {
            lines.extend(title(&group.name, 1));
        }
        let series: Vec<(&Benchmark, Option<&str>)> = group
            .members
            .iter()
            .map(|m| (m.benchmark, show_label.then_some(m.label.as_str())))
            .collect();
        lines.extend(histogram_lines(&series, bins, extend, columns));
        if !(group.is_last && ignored.is_empty()) {
            lines.push(String::new());
        }
    }

    let singles: Vec<&Benchmark> = ignored
        .iter()
        .flat_map(|entry| entry.benchmarks.iter().copied())
        .collect();
    for (index, benchmark) in singles.iter().copied().enumerate() {
        lines.push(format!("[ {} ]", benchmark.display_name()));
        lines.extend(histogram_lines(&[(benchmark, None)], bins, extend, columns));
        if index + 1 < singles.len() {
            lines.push(String::new());
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsuite_core::{BenchmarkSuite, Run};

    fn bench(name: &str, samples: Vec<f64>) -> Benchmark {
        Benchmark::new(Some(name), vec![Run::new(samples)])
    }

    #[test]
    fn test_common_benchmark_histograms_share_buckets() {
        let mut data = SuiteCollection::new();
        data.push(BenchmarkSuite::new("a.json", vec![bench("x", vec![1.0, 2.0])]).unwrap());
        data.push(BenchmarkSuite::new("b.json", vec![bench("x", vec![3.0, 4.0])]).unwrap());

        let lines = hist_lines(&data, Some(3), false, 80);
        assert_eq!(lines[0], "[ a ]");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "[ b ]");
        assert_eq!(lines.len(), 9);
        assert!(lines[1].starts_with("1.00 sec: 1"));
        assert!(lines[6].starts_with("1.00 sec: 0"));
    }

    #[test]
    fn test_ignored_benchmarks_drawn_separately() {
        let mut data = SuiteCollection::new();
        let a = vec![bench("x", vec![1.0]), bench("only_a", vec![2.0])];
        data.push(BenchmarkSuite::new("a.json", a).unwrap());
        data.push(BenchmarkSuite::new("b.json", vec![bench("x", vec![1.0])]).unwrap());

        let lines = hist_lines(&data, None, false, 80);
        assert!(lines.contains(&"[ only_a ]".to_string()));
        assert_eq!(lines.last().map(|l| l.starts_with("2.00 sec: 1")), Some(true));
    }
}
