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

//! The suite collection: every suite loaded by one command invocation.
//!
//! The collection owns its suites, offers name-based narrowing and walks
//! them in display order. Suite labels are derived from the whole set of
//! sources, so they are recomputed from the current suites every time they
//! are needed.

use crate::benchmark::Benchmark;
use crate::error::{Result, SuiteError};
use crate::suite::BenchmarkSuite;
use std::collections::HashSet;
use std::path::Path;

/// How suite sources are turned into display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// Sources as given (two sources share a basename).
    FullPath,
    /// Basenames (two basenames share a stem).
    Basename,
    /// Basenames without their last extension.
    Stem,
}

fn basename(source: &str) -> &str {
    Path::new(source)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(source)
}

fn stem(source: &str) -> &str {
    let base = basename(source);
    Path::new(base)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(base)
}

impl LabelPolicy {
    /// Pick the shortest policy keeping labels distinct for these sources.
    pub fn for_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
        let sources: Vec<&str> = sources.into_iter().collect();

        let basenames: HashSet<&str> = sources.iter().map(|s| basename(s)).collect();
        if basenames.len() != sources.len() {
            return LabelPolicy::FullPath;
        }

        let stems: HashSet<&str> = basenames.iter().map(|s| stem(s)).collect();
        if stems.len() != basenames.len() {
            return LabelPolicy::Basename;
        }

        LabelPolicy::Stem
    }

    pub fn apply(self, source: &str) -> String {
        match self {
            LabelPolicy::FullPath => source.to_string(),
            LabelPolicy::Basename => basename(source).to_string(),
            LabelPolicy::Stem => stem(source).to_string(),
        }
    }
}

/// One (suite, benchmark) pair in display order.
#[derive(Debug, Clone)]
pub struct DataItem<'a> {
    pub suite: &'a BenchmarkSuite,
    /// Display label of the suite.
    pub label: String,
    pub benchmark: &'a Benchmark,
    pub name: Option<&'a str>,
    /// Title distinguishing this item from the others, `None` when there is
    /// a single benchmark overall.
    pub title: Option<String>,
    /// True for the final item of the sequence.
    pub is_last: bool,
}

/// A suite paired with its display label.
#[derive(Debug, Clone)]
pub struct IterSuite<'a> {
    pub label: String,
    pub suite: &'a BenchmarkSuite,
}

/// Lazy iterator over every benchmark of every suite.
#[derive(Debug)]
pub struct Items<'a> {
    suites: &'a [BenchmarkSuite],
    labels: Vec<String>,
    show_name: bool,
    show_label: bool,
    suite_index: usize,
    bench_index: usize,
    remaining: usize,
}

impl<'a> Iterator for Items<'a> {
    type Item = DataItem<'a>;

    fn next(&mut self) -> Option<DataItem<'a>> {
        loop {
            let suite = self.suites.get(self.suite_index)?;
            let Some(benchmark) = suite.benchmarks().get(self.bench_index) else {
                self.suite_index += 1;
                self.bench_index = 0;
                continue;
            };
            self.bench_index += 1;
            self.remaining -= 1;

            let label = self.labels[self.suite_index].clone();
            let title = match (self.show_name, self.show_label) {
                (false, _) => None,
                (true, false) => Some(benchmark.display_name().to_string()),
                (true, true) => Some(format!("{}:{}", label, benchmark.display_name())),
            };
            return Some(DataItem {
                suite,
                label,
                benchmark,
                name: benchmark.name(),
                title,
                is_last: self.remaining == 0,
            });
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Items<'_> {}

/// Every benchmark suite loaded for one command.
#[derive(Debug, Clone, Default)]
pub struct SuiteCollection {
    suites: Vec<BenchmarkSuite>,
}

impl SuiteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a suite from `path` and append it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let suite = BenchmarkSuite::load(path)?;
        self.suites.push(suite);
        Ok(())
    }

    /// Load several suites in order, stopping at the first failure.
    pub fn load_all<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) -> Result<()> {
        for path in paths {
            self.load(path)?;
        }
        Ok(())
    }

    /// Append an already loaded suite.
    pub fn push(&mut self, suite: BenchmarkSuite) {
        self.suites.push(suite);
    }

    /// Keep only the benchmark called `name` in every suite.
    ///
    /// Every suite is checked before any is modified: on error the
    /// collection is unchanged.
    pub fn include_benchmark(&mut self, name: &str) -> Result<()> {
        if let Some(suite) = self.suites.iter().find(|s| s.get_benchmark(name).is_none()) {
            return Err(SuiteError::MissingBenchmark {
                suite: suite.source().to_string(),
                name: name.to_string(),
            });
        }
        for suite in &mut self.suites {
            suite.include_benchmark(name)?;
        }
        tracing::debug!(name, suites = self.suites.len(), "narrowed suites to one benchmark");
        Ok(())
    }

    /// Total number of benchmarks across suites (not deduplicated).
    pub fn count(&self) -> usize {
        self.suites.iter().map(BenchmarkSuite::len).sum()
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    pub fn suites(&self) -> &[BenchmarkSuite] {
        &self.suites
    }

    pub fn label_policy(&self) -> LabelPolicy {
        LabelPolicy::for_sources(self.suites.iter().map(BenchmarkSuite::source))
    }

    /// Display label of `source` given the currently loaded sources.
    pub fn format_label(&self, source: &str) -> String {
        self.label_policy().apply(source)
    }

    /// Labels of all suites, in load order.
    pub fn labels(&self) -> Vec<String> {
        let policy = self.label_policy();
        self.suites.iter().map(|s| policy.apply(s.source())).collect()
    }

    /// Every (suite, benchmark) pair in display order.
    pub fn iter(&self) -> Items<'_> {
        Items {
            suites: &self.suites,
            labels: self.labels(),
            show_name: self.count() > 1,
            show_label: self.suite_count() > 1,
            suite_index: 0,
            bench_index: 0,
            remaining: self.count(),
        }
    }

    /// Suites paired with their labels.
    pub fn iter_suites(&self) -> impl Iterator<Item = IterSuite<'_>> {
        self.suites
            .iter()
            .zip(self.labels())
            .map(|(suite, label)| IterSuite { label, suite })
    }
}

impl<'a> IntoIterator for &'a SuiteCollection {
    type Item = DataItem<'a>;
    type IntoIter = Items<'a>;

    fn into_iter(self) -> Items<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::Run;

    fn suite(source: &str, names: &[Option<&str>]) -> BenchmarkSuite {
        let benchmarks = names
            .iter()
            .map(|name| Benchmark::new(*name, vec![Run::new(vec![1.0])]))
            .collect();
        BenchmarkSuite::new(source, benchmarks).unwrap()
    }

    fn collection(suites: Vec<BenchmarkSuite>) -> SuiteCollection {
        let mut data = SuiteCollection::new();
        for s in suites {
            data.push(s);
        }
        data
    }

    #[test]
    fn test_label_policy_stems() {
        let policy = LabelPolicy::for_sources(["a/py36.json", "b/py37.json"]);
        assert_eq!(policy, LabelPolicy::Stem);
        assert_eq!(policy.apply("a/py36.json"), "py36");
    }

    #[test]
    fn test_label_policy_same_basename_uses_full_path() {
        let policy = LabelPolicy::for_sources(["a/bench.json", "b/bench.json"]);
        assert_eq!(policy, LabelPolicy::FullPath);
        assert_eq!(policy.apply("b/bench.json"), "b/bench.json");
    }

    #[test]
    fn test_label_policy_same_stem_uses_basename() {
        let policy = LabelPolicy::for_sources(["x/bench.json", "x/bench.json.gz"]);
        // stems are "bench" and "bench.json": still distinct
        assert_eq!(policy, LabelPolicy::Stem);

        let policy = LabelPolicy::for_sources(["bench.json", "bench.txt"]);
        assert_eq!(policy, LabelPolicy::Basename);
        assert_eq!(policy.apply("dir/bench.txt"), "bench.txt");
    }

    #[test]
    fn test_labels_follow_current_sources() {
        let mut data = collection(vec![suite("a/bench.json", &[Some("x")])]);
        assert_eq!(data.format_label("a/bench.json"), "bench");
        data.push(suite("b/bench.json", &[Some("x")]));
        assert_eq!(data.format_label("a/bench.json"), "a/bench.json");
    }

    #[test]
    fn test_count_and_suite_count() {
        let data = collection(vec![
            suite("a.json", &[Some("x"), Some("y")]),
            suite("b.json", &[Some("x")]),
        ]);
        assert_eq!(data.count(), 3);
        assert_eq!(data.suite_count(), 2);
    }

    #[test]
    fn test_single_benchmark_has_no_title() {
        let data = collection(vec![suite("a.json", &[Some("x")])]);
        let items: Vec<_> = data.iter().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, None);
        assert!(items[0].is_last);
    }

    #[test]
    fn test_titles_with_one_suite() {
        let data = collection(vec![suite("a.json", &[Some("x"), None])]);
        let titles: Vec<_> = data.iter().map(|item| item.title).collect();
        assert_eq!(
            titles,
            vec![Some("x".to_string()), Some("<no name>".to_string())]
        );
    }

    #[test]
    fn test_titles_and_last_flag_with_several_suites() {
        let data = collection(vec![
            suite("a.json", &[Some("x"), Some("y")]),
            suite("b.json", &[Some("x")]),
        ]);
        let items: Vec<_> = data.iter().collect();
        let titles: Vec<_> = items.iter().map(|i| i.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["a:x", "a:y", "b:x"]);
        let last: Vec<_> = items.iter().map(|i| i.is_last).collect();
        assert_eq!(last, vec![false, false, true]);
        assert_eq!(items[2].label, "b");
        assert_eq!(items[1].name, Some("y"));
    }

    #[test]
    fn test_last_flag_skips_trailing_empty_suite() {
        let data = collection(vec![
            suite("a.json", &[Some("x"), Some("y")]),
            BenchmarkSuite::new("b.json", vec![]).unwrap(),
        ]);
        let last: Vec<_> = data.iter().map(|i| i.is_last).collect();
        assert_eq!(last, vec![false, true]);
    }

    #[test]
    fn test_iter_suites() {
        let data = collection(vec![suite("a.json", &[Some("x")]), suite("b.json", &[])]);
        let labels: Vec<_> = data.iter_suites().map(|s| s.label).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn test_include_benchmark() {
        let mut data = collection(vec![
            suite("a.json", &[Some("x"), Some("y")]),
            suite("b.json", &[Some("y"), Some("z")]),
        ]);
        data.include_benchmark("y").unwrap();
        assert_eq!(data.count(), 2);
    }

    #[test]
    fn test_include_missing_benchmark_does_not_mutate() {
        let mut data = collection(vec![
            suite("a.json", &[Some("x"), Some("y")]),
            suite("b.json", &[Some("z")]),
        ]);
        let err = data.include_benchmark("x").unwrap_err();
        assert_eq!(
            err,
            SuiteError::MissingBenchmark {
                suite: "b.json".to_string(),
                name: "x".to_string()
            }
        );
        assert_eq!(data.count(), 3);
        assert_eq!(data.suites()[0].len(), 2);
    }
}
