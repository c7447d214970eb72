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

//! Slowest command - benchmarks that took most of the time

use super::{load_suites, print_lines};
use crate::error::CliError;
use crate::render::title;
use perfsuite_core::format::format_timedelta;
use perfsuite_core::{Benchmark, SuiteCollection};
use std::path::PathBuf;

pub fn slowest(files: &[PathBuf], name: Option<&str>, count: usize) -> Result<(), CliError> {
    let data = load_suites(files, name)?;
    print_lines(&slowest_lines(&data, count))?;
    Ok(())
}

/// Top `count` benchmarks of each suite by total duration, longest first.
pub fn slowest_lines(data: &SuiteCollection, count: usize) -> Vec<String> {
    let use_titles = data.suite_count() > 1;
    let mut lines = Vec::new();
    for entry in data.iter_suites() {
        if use_titles {
            lines.extend(title(&entry.label, 1));
        }

        let mut benchmarks: Vec<(f64, &Benchmark)> = entry
            .suite
            .benchmarks()
            .iter()
            .map(|b| (b.total_duration(), b))
            .collect();
        benchmarks.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (rank, (duration, benchmark)) in benchmarks.into_iter().take(count).enumerate() {
            lines.push(format!(
                "#{}: {} ({})",
                rank + 1,
                benchmark.display_name(),
                format_timedelta(duration)
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsuite_core::{BenchmarkSuite, Run};

    #[test]
    fn test_slowest_order_and_limit() {
        let bench =
            |name: &str, total: f64| Benchmark::new(Some(name), vec![Run::new(vec![total])]);
        let mut data = SuiteCollection::new();
        data.push(
            BenchmarkSuite::new(
                "a.json",
                vec![bench("fast", 0.5), bench("slow", 3.0), bench("medium", 1.5)],
            )
            .unwrap(),
        );

        assert_eq!(
            slowest_lines(&data, 2),
            vec!["#1: slow (3.00 sec)", "#2: medium (1.50 sec)"]
        );
        assert_eq!(slowest_lines(&data, 10).len(), 3);
    }
}
