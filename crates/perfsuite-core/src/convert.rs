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

//! In-place suite conversions used by the `convert` command.
//!
//! Each operation validates the whole suite before mutating it, so a failed
//! conversion leaves the suite exactly as it was.

use crate::benchmark::Run;
use crate::error::{Result, SuiteError};
use crate::metadata::{Metadata, MetadataValue};
use crate::ranges::RunList;
use crate::stats;
use crate::suite::BenchmarkSuite;

/// Relative distance from the median beyond which a sample is an outlier.
pub const OUTLIER_TOLERANCE: f64 = 0.05;

impl BenchmarkSuite {
    /// Append the runs of every benchmark of `other` to the same-named
    /// benchmark, adding benchmarks that do not exist yet.
    pub fn add_runs_from(&mut self, other: &BenchmarkSuite) -> Result<()> {
        for benchmark in other.benchmarks() {
            match self.get_benchmark_mut(benchmark.name()) {
                Some(existing) => existing.add_runs(benchmark),
                None => self.add_benchmark(benchmark.clone())?,
            }
        }
        Ok(())
    }

    /// Keep only the benchmark called `name`.
    pub fn include_benchmark(&mut self, name: &str) -> Result<()> {
        if self.get_benchmark(name).is_none() {
            return Err(SuiteError::MissingBenchmark {
                suite: self.source().to_string(),
                name: name.to_string(),
            });
        }
        self.benchmarks_mut().retain(|b| b.name() == Some(name));
        Ok(())
    }

    /// Remove the benchmark called `name`. Removing the last benchmark fails.
    pub fn exclude_benchmark(&mut self, name: &str) -> Result<()> {
        let remaining = self
            .benchmarks()
            .iter()
            .filter(|b| b.name() != Some(name))
            .count();
        if remaining == self.len() {
            tracing::warn!(suite = %self.source(), name, "no benchmark to exclude");
            return Ok(());
        }
        if remaining == 0 {
            return Err(SuiteError::NoMoreBenchmark {
                suite: self.source().to_string(),
            });
        }
        self.benchmarks_mut().retain(|b| b.name() != Some(name));
        Ok(())
    }

    /// Keep (`include`) or drop (`!include`) the selected runs in every
    /// benchmark.
    pub fn filter_runs(&mut self, include: bool, selection: &RunList) -> Result<()> {
        let keep = |index: usize| selection.contains(index) == include;

        for benchmark in self.benchmarks() {
            if !(0..benchmark.nrun()).any(keep) {
                return Err(SuiteError::NoMoreRuns {
                    name: benchmark.display_name().to_string(),
                });
            }
        }

        for benchmark in self.benchmarks_mut() {
            let runs = std::mem::take(benchmark.runs_mut());
            *benchmark.runs_mut() = runs
                .into_iter()
                .enumerate()
                .filter(|(index, _)| keep(*index))
                .map(|(_, run)| run)
                .collect();
        }
        Ok(())
    }

    pub fn remove_warmups(&mut self) {
        for benchmark in self.benchmarks_mut() {
            benchmark.runs_mut().iter_mut().for_each(Run::clear_warmups);
        }
    }

    /// Set metadata on every benchmark. The `name` key cannot be updated.
    pub fn update_metadata(&mut self, updates: &Metadata) -> Result<()> {
        if updates.contains_key("name") {
            return Err(SuiteError::InvalidMetadata {
                key: "name".to_string(),
                message: "the benchmark name cannot be modified".to_string(),
            });
        }

        for benchmark in self.benchmarks_mut() {
            for (key, value) in updates.iter() {
                benchmark.own_metadata_mut().insert(key, value.clone());
                for run in benchmark.runs_mut() {
                    if run.metadata().contains_key(key) {
                        run.metadata_mut().insert(key, value.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// Replace the samples of each run by the numeric metadata `key`.
    pub fn extract_metadata(&mut self, key: &str) -> Result<()> {
        let mut extracted = Vec::with_capacity(self.len());
        for benchmark in self.benchmarks() {
            let mut values = Vec::with_capacity(benchmark.nrun());
            for run in benchmark.runs() {
                let value = run.metadata().get(key).ok_or_else(|| SuiteError::MissingMetadata {
                    benchmark: benchmark.display_name().to_string(),
                    key: key.to_string(),
                })?;
                let number = value.as_f64().ok_or_else(|| SuiteError::InvalidMetadata {
                    key: key.to_string(),
                    message: format!(
                        "value '{}' of benchmark '{}' is not a number",
                        value,
                        benchmark.display_name()
                    ),
                })?;
                values.push(number);
            }
            extracted.push(values);
        }

        for (benchmark, values) in self.benchmarks_mut().iter_mut().zip(extracted) {
            for (run, value) in benchmark.runs_mut().iter_mut().zip(values) {
                run.set_samples(vec![value]);
                run.clear_warmups();
            }
        }
        Ok(())
    }

    /// Drop all metadata except the benchmark names.
    pub fn remove_all_metadata(&mut self) {
        self.clear_metadata();
        for benchmark in self.benchmarks_mut() {
            let name = benchmark.name().map(str::to_string);
            let metadata = benchmark.own_metadata_mut();
            metadata.clear();
            if let Some(name) = name {
                metadata.insert("name", MetadataValue::Str(name));
            }
            for run in benchmark.runs_mut() {
                run.metadata_mut().clear();
            }
        }
    }

    /// Drop runs containing a sample further than [`OUTLIER_TOLERANCE`] from
    /// the benchmark median.
    pub fn remove_outliers(&mut self) -> Result<()> {
        let mut kept = Vec::with_capacity(self.len());
        for benchmark in self.benchmarks() {
            let Some(median) = stats::median(&benchmark.samples()) else {
                kept.push(None);
                continue;
            };
            let low = median * (1.0 - OUTLIER_TOLERANCE);
            let high = median * (1.0 + OUTLIER_TOLERANCE);
            let mask: Vec<bool> = benchmark
                .runs()
                .iter()
                .map(|run| run.samples().iter().all(|v| (low..=high).contains(v)))
                .collect();
            if !mask.iter().any(|&keep| keep) {
                return Err(SuiteError::NoMoreRuns {
                    name: benchmark.display_name().to_string(),
                });
            }
            kept.push(Some(mask));
        }

        for (benchmark, mask) in self.benchmarks_mut().iter_mut().zip(kept) {
            let Some(mask) = mask else { continue };
            let runs = std::mem::take(benchmark.runs_mut());
            *benchmark.runs_mut() = runs
                .into_iter()
                .zip(mask)
                .filter_map(|(run, keep)| keep.then_some(run))
                .collect();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::Benchmark;

    fn runs(indices: &[usize]) -> RunList {
        indices.iter().copied().collect()
    }

    fn suite() -> BenchmarkSuite {
        let mut run = Run::new(vec![1.0, 1.01]).with_warmups(vec![2.0]);
        run.metadata_mut().insert("loops", 8i64);
        run.metadata_mut().insert("cpu", "x86");
        BenchmarkSuite::new(
            "suite.json",
            vec![
                Benchmark::new(
                    Some("a"),
                    vec![run.clone(), Run::new(vec![1.0]), Run::new(vec![1.5])],
                ),
                Benchmark::new(Some("b"), vec![run, Run::new(vec![0.99])]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_include_benchmark() {
        let mut s = suite();
        s.include_benchmark("b").unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.benchmarks()[0].name(), Some("b"));
    }

    #[test]
    fn test_include_missing_benchmark_leaves_suite_untouched() {
        let mut s = suite();
        let err = s.include_benchmark("missing").unwrap_err();
        assert!(matches!(err, SuiteError::MissingBenchmark { .. }));
        assert_eq!(s, suite());
    }

    #[test]
    fn test_exclude_benchmark() {
        let mut s = suite();
        s.exclude_benchmark("a").unwrap();
        assert_eq!(s.len(), 1);
        let err = s.exclude_benchmark("b").unwrap_err();
        assert!(matches!(err, SuiteError::NoMoreBenchmark { .. }));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_filter_runs() {
        let mut s = suite();
        s.filter_runs(true, &runs(&[0, 2])).unwrap();
        assert_eq!(s.benchmarks()[0].nrun(), 2);
        assert_eq!(s.benchmarks()[1].nrun(), 1);

        let mut s = suite();
        s.filter_runs(false, &runs(&[0])).unwrap();
        assert_eq!(s.benchmarks()[0].samples(), vec![1.0, 1.5]);
    }

    #[test]
    fn test_filter_runs_refuses_to_empty_a_benchmark() {
        let mut s = suite();
        let err = s.filter_runs(true, &runs(&[2])).unwrap_err();
        assert_eq!(err, SuiteError::NoMoreRuns { name: "b".to_string() });
        assert_eq!(s, suite());
    }

    #[test]
    fn test_remove_warmups() {
        let mut s = suite();
        s.remove_warmups();
        assert!(s.benchmarks().iter().all(|b| b.runs().iter().all(|r| r.warmups().is_empty())));
    }

    #[test]
    fn test_update_metadata() {
        let mut s = suite();
        let updates: Metadata = [("cpu", "arm")].into_iter().collect();
        s.update_metadata(&updates).unwrap();
        let metadata = s.benchmarks()[0].get_metadata();
        assert_eq!(metadata.get("cpu"), Some(&MetadataValue::from("arm")));
        assert_eq!(
            s.benchmarks()[0].runs()[0].metadata().get("cpu"),
            Some(&MetadataValue::from("arm"))
        );

        let rename: Metadata = [("name", "other")].into_iter().collect();
        assert!(s.update_metadata(&rename).is_err());
    }

    #[test]
    fn test_non_finite_update_survives_dump_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("updated.json");
        let mut s = suite();
        let updates: Metadata = [("note", MetadataValue::parse("nan"))].into_iter().collect();
        s.update_metadata(&updates).unwrap();
        s.dump(&path, true).unwrap();

        let loaded = BenchmarkSuite::load(&path).unwrap();
        assert_eq!(
            loaded.benchmarks()[0].get_metadata().get("note"),
            Some(&MetadataValue::from("nan"))
        );
    }

    #[test]
    fn test_extract_metadata() {
        let mut s = suite();
        s.include_benchmark("a").unwrap();
        s.filter_runs(true, &runs(&[0])).unwrap();
        s.extract_metadata("loops").unwrap();
        assert_eq!(s.benchmarks()[0].samples(), vec![8.0]);
        assert!(s.benchmarks()[0].runs()[0].warmups().is_empty());
    }

    #[test]
    fn test_extract_metadata_errors() {
        let mut s = suite();
        let err = s.extract_metadata("loops").unwrap_err();
        assert!(matches!(err, SuiteError::MissingMetadata { .. }));
        assert_eq!(s, suite());

        let mut s = suite();
        s.filter_runs(true, &runs(&[0])).unwrap();
        let err = s.extract_metadata("cpu").unwrap_err();
        assert!(matches!(err, SuiteError::InvalidMetadata { .. }));
    }

    #[test]
    fn test_remove_all_metadata_keeps_names() {
        let mut s = suite();
        s.remove_all_metadata();
        let a = &s.benchmarks()[0];
        assert_eq!(a.name(), Some("a"));
        assert_eq!(a.own_metadata().len(), 1);
        assert!(a.runs()[0].metadata().is_empty());
    }

    #[test]
    fn test_remove_outliers() {
        let mut s = suite();
        s.remove_outliers().unwrap();
        // median of a is 1.005: the 1.5 run is dropped
        assert_eq!(s.benchmarks()[0].nrun(), 2);
        assert_eq!(s.benchmarks()[1].nrun(), 2);
    }

    #[test]
    fn test_add_runs_from() {
        let mut s = suite();
        let other = BenchmarkSuite::new(
            "other.json",
            vec![
                Benchmark::new(Some("a"), vec![Run::new(vec![2.0])]),
                Benchmark::new(Some("c"), vec![Run::new(vec![3.0])]),
            ],
        )
        .unwrap();
        s.add_runs_from(&other).unwrap();
        assert_eq!(s.get_benchmark("a").unwrap().nrun(), 4);
        assert_eq!(s.get_benchmark("c").unwrap().nrun(), 1);
        assert_eq!(s.len(), 3);
    }
}
