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

//! Grouping benchmarks by name across suites.
//!
//! Only names present in every suite can be compared; the remaining
//! benchmarks are reported as ignored.

use crate::benchmark::Benchmark;
use crate::collection::SuiteCollection;
use crate::suite::BenchmarkSuite;
use std::collections::{BTreeSet, HashSet};

/// One suite's instance of a grouped benchmark.
#[derive(Debug, Clone)]
pub struct GroupMember<'a> {
    pub benchmark: &'a Benchmark,
    pub title: Option<String>,
    /// Display label of the owning suite.
    pub label: String,
}

/// All instances of one common benchmark name, one per suite in load order.
#[derive(Debug, Clone)]
pub struct BenchmarkGroup<'a> {
    pub name: String,
    pub members: Vec<GroupMember<'a>>,
    /// True for the group of the last name in lexicographic order.
    pub is_last: bool,
}

/// Benchmarks of one suite that are not shared by every suite.
#[derive(Debug, Clone)]
pub struct IgnoredBenchmarks<'a> {
    pub suite: &'a BenchmarkSuite,
    pub label: String,
    pub benchmarks: Vec<&'a Benchmark>,
}

impl SuiteCollection {
    /// Names of the benchmarks present in every suite.
    ///
    /// Anonymous benchmarks never take part. Computed on each call.
    pub fn common_names(&self) -> BTreeSet<String> {
        let mut name_sets = self.suites().iter().map(BenchmarkSuite::benchmark_names);
        let Some(first) = name_sets.next() else {
            return BTreeSet::new();
        };
        name_sets
            .fold(first, |acc: HashSet<&str>, names| {
                acc.intersection(&names).copied().collect()
            })
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Group the common benchmarks by name, names ascending.
    pub fn group_by_name(&self) -> Vec<BenchmarkGroup<'_>> {
        let labels = self.labels();
        let names = self.common_names();
        let show_name = names.len() > 1;
        let show_label = self.suite_count() > 1;

        let total = names.len();
        names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let members = self
                    .suites()
                    .iter()
                    .zip(&labels)
                    .filter_map(|(suite, label)| {
                        let benchmark = suite.get_benchmark(&name)?;
                        let title = match (show_name, show_label) {
                            (false, _) => None,
                            (true, false) => Some(name.clone()),
                            // the name is shown once at the group level
                            (true, true) => Some(label.clone()),
                        };
                        Some(GroupMember {
                            benchmark,
                            title,
                            label: label.clone(),
                        })
                    })
                    .collect();
                BenchmarkGroup {
                    name,
                    members,
                    is_last: index + 1 == total,
                }
            })
            .collect()
    }

    /// Per suite, the benchmarks left out of [`group_by_name`](Self::group_by_name).
    /// Suites without ignored benchmarks are omitted.
    pub fn group_by_name_ignored(&self) -> Vec<IgnoredBenchmarks<'_>> {
        let names = self.common_names();
        self.suites()
            .iter()
            .zip(self.labels())
            .filter_map(|(suite, label)| {
                let benchmarks: Vec<&Benchmark> = suite
                    .benchmarks()
                    .iter()
                    .filter(|b| b.name().map_or(true, |name| !names.contains(name)))
                    .collect();
                if benchmarks.is_empty() {
                    None
                } else {
                    Some(IgnoredBenchmarks {
                        suite,
                        label,
                        benchmarks,
                    })
                }
            })
            .collect()
    }
}
