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

//! Property-based tests for Perfsuite CLI operations using proptest.
//!
//! - Metadata updates keep every key with its parsed value
//! - `slowest` lists at most N benchmarks, longest first
//! - `convert --include-runs` keeps exactly the selected runs

use perfsuite_cli::commands::{convert, parse_metadata_updates, slowest_lines, ConvertOptions};
use perfsuite_core::{Benchmark, BenchmarkSuite, MetadataValue, Run, SuiteCollection};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tempfile::TempDir;

// ===== Property-Based Test Generators =====

fn identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").expect("Failed to create identifier regex")
}

fn durations() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.001f64..10.0, 1..12)
}

fn suite_with_runs(nrun: usize) -> BenchmarkSuite {
    let runs = (0..nrun)
        .map(|i| Run::new(vec![0.010 + i as f64 * 1e-4]))
        .collect();
    BenchmarkSuite::new("runs.json", vec![Benchmark::new(Some("bench"), runs)]).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_metadata_updates_keep_values(
        entries in prop::collection::btree_map(identifier(), any::<i64>(), 1..8)
    ) {
        let text = entries
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",");

        let metadata = parse_metadata_updates(&text).unwrap();
        prop_assert_eq!(metadata.len(), entries.len());
        for (key, value) in &entries {
            prop_assert_eq!(metadata.get(key), Some(&MetadataValue::Int(*value)));
        }
    }

    #[test]
    fn prop_slowest_is_bounded_and_sorted(totals in durations(), count in 1usize..6) {
        let benchmarks = totals
            .iter()
            .enumerate()
            .map(|(i, total)| {
                Benchmark::new(Some(format!("b{}", i).as_str()), vec![Run::new(vec![*total])])
            })
            .collect();
        let mut data = SuiteCollection::new();
        data.push(BenchmarkSuite::new("suite.json", benchmarks).unwrap());

        let lines = slowest_lines(&data, count);
        prop_assert_eq!(lines.len(), count.min(totals.len()));

        let mut sorted = totals.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let expected: BTreeMap<String, f64> = totals
            .iter()
            .enumerate()
            .map(|(i, total)| (format!("b{}", i), *total))
            .collect();
        for (rank, line) in lines.iter().enumerate() {
            let name = line
                .split(": ")
                .nth(1)
                .and_then(|rest| rest.split(' ').next())
                .unwrap();
            prop_assert_eq!(expected[name], sorted[rank]);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_include_runs_keeps_selected_runs(
        nrun in 1usize..8,
        picks in prop::collection::btree_set(1usize..8, 1..5)
    ) {
        let selected: BTreeSet<usize> = picks.into_iter().filter(|&p| p <= nrun).collect();
        prop_assume!(!selected.is_empty());

        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        suite_with_runs(nrun).dump(&input, true).unwrap();

        let list = selected.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(",");
        let options = ConvertOptions {
            include_runs: Some(list),
            output: Some(output.clone()),
            ..Default::default()
        };
        convert(&input, &options).unwrap();

        let edited = BenchmarkSuite::load(&output).unwrap();
        let bench = edited.get_benchmark("bench").unwrap();
        prop_assert_eq!(bench.nrun(), selected.len());
        let kept: Vec<f64> = bench.runs().iter().map(|r| r.samples()[0]).collect();
        let expected: Vec<f64> = selected.iter().map(|p| 0.010 + (p - 1) as f64 * 1e-4).collect();
        prop_assert_eq!(kept, expected);
    }
}
