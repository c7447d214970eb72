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

//! Speed comparison of benchmarks across suites.
//!
//! For every benchmark name shared by all suites, the mean and standard
//! deviation of each suite's samples are compared. A change is expressed as
//! a ratio `reference_mean / changed_mean` (above 1: the changed suite is
//! faster) and as a percentage of the reference mean.

use crate::benchmark::Benchmark;
use crate::collection::SuiteCollection;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{Result, SuiteError};
use crate::stats;
use std::cmp::Ordering;
use std::fmt;

/// How suites are compared with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// Every pair of suites, plus a ranking from fastest to slowest.
    Ranked,
    /// Every suite against the first loaded one.
    Baseline,
}

/// Comparison settings, validated before any computation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    pub mode: CompareMode,
    /// Partition results into faster/slower/same buckets (two suites only).
    pub group_by_speed: bool,
    /// Minimum absolute change, in percent, to call a benchmark faster or
    /// slower. `None` means 0.
    pub min_speed: Option<f64>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            mode: CompareMode::Baseline,
            group_by_speed: false,
            min_speed: None,
        }
    }
}

impl CompareOptions {
    /// Check the options against the number of loaded suites.
    pub fn validate(&self, suite_count: usize) -> Result<()> {
        if suite_count < 2 {
            return Err(SuiteError::InsufficientSuites { count: suite_count });
        }
        if self.group_by_speed {
            if self.mode != CompareMode::Baseline {
                return Err(SuiteError::unsupported(
                    "grouping by speed requires a comparison to the first file",
                ));
            }
            if suite_count != 2 {
                return Err(SuiteError::unsupported(
                    "grouping by speed only works on two benchmark files",
                ));
            }
        }
        if let Some(min_speed) = self.min_speed {
            if !min_speed.is_finite() || min_speed < 0.0 {
                return Err(SuiteError::unsupported(format!(
                    "minimum speed must be a non-negative percentage, got {}",
                    min_speed
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Faster,
    Slower,
    Same,
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Speed::Faster => "faster",
            Speed::Slower => "slower",
            Speed::Same => "same speed",
        })
    }
}

/// Central tendency and dispersion of one benchmark's samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub mean: f64,
    pub stdev: f64,
}

impl Timing {
    /// `None` when the benchmark cannot produce a dispersion estimate:
    /// fewer than two runs, fewer than two samples, or a non-positive mean.
    pub fn of(benchmark: &Benchmark) -> Option<Timing> {
        if benchmark.nrun() < 2 {
            return None;
        }
        let samples = benchmark.samples();
        let mean = stats::mean(&samples)?;
        let stdev = stats::stdev(&samples)?;
        if !(mean.is_finite() && mean > 0.0) {
            return None;
        }
        Some(Timing { mean, stdev })
    }
}

/// Timing of one suite for a compared benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteTiming {
    pub label: String,
    /// `None` when the suite lacks data for this benchmark.
    pub timing: Option<Timing>,
}

/// Change between a reference suite and another suite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedChange {
    /// Index of the reference suite.
    pub reference: usize,
    /// Index of the compared suite.
    pub changed: usize,
    /// `reference_mean / changed_mean`.
    pub ratio: f64,
    /// `(changed_mean - reference_mean) / reference_mean * 100`.
    pub percent: f64,
    pub speed: Speed,
}

impl SpeedChange {
    /// Compare two means. `|percent| < min_speed` is the same speed: a
    /// difference exactly equal to the threshold is significant.
    pub fn between(
        reference: usize,
        changed: usize,
        reference_mean: f64,
        changed_mean: f64,
        min_speed: f64,
    ) -> Self {
        let ratio = reference_mean / changed_mean;
        let percent = (changed_mean - reference_mean) / reference_mean * 100.0;
        let speed = if min_speed > 0.0 && percent.abs() < min_speed {
            Speed::Same
        } else {
            match ratio.partial_cmp(&1.0) {
                Some(Ordering::Greater) => Speed::Faster,
                Some(Ordering::Less) => Speed::Slower,
                _ => Speed::Same,
            }
        };
        SpeedChange {
            reference,
            changed,
            ratio,
            percent,
            speed,
        }
    }

    /// Text such as `2.00x faster` or `1.25x slower`.
    pub fn describe(&self) -> String {
        match self.speed {
            Speed::Faster => format!("{:.2}x faster", self.ratio),
            Speed::Slower => format!("{:.2}x slower", 1.0 / self.ratio),
            Speed::Same => "not significant".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Changes(Vec<SpeedChange>),
    /// At least one suite lacks the runs or samples to compare.
    NotEnoughData,
}

/// Comparison of one benchmark name across all suites.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareRow {
    pub name: String,
    /// One entry per suite, in load order.
    pub timings: Vec<SuiteTiming>,
    /// Suite indices from fastest to slowest (ranked mode with data only).
    pub ranking: Vec<usize>,
    pub verdict: Verdict,
}

impl CompareRow {
    pub fn changes(&self) -> &[SpeedChange] {
        match &self.verdict {
            Verdict::Changes(changes) => changes,
            Verdict::NotEnoughData => &[],
        }
    }
}

/// A benchmark classified into a speed bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedChange {
    pub name: String,
    pub change: SpeedChange,
}

/// Results partitioned by speed, largest effect first in each bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedGroups {
    pub faster: Vec<GroupedChange>,
    pub slower: Vec<GroupedChange>,
    pub same: Vec<GroupedChange>,
}

impl SpeedGroups {
    fn from_rows(rows: &[CompareRow]) -> Self {
        let mut groups = SpeedGroups::default();
        for row in rows {
            for change in row.changes() {
                let entry = GroupedChange {
                    name: row.name.clone(),
                    change: *change,
                };
                match change.speed {
                    Speed::Faster => groups.faster.push(entry),
                    Speed::Slower => groups.slower.push(entry),
                    Speed::Same => groups.same.push(entry),
                }
            }
        }
        for bucket in [&mut groups.faster, &mut groups.slower, &mut groups.same] {
            bucket.sort_by(|a, b| {
                b.change
                    .percent
                    .abs()
                    .total_cmp(&a.change.percent.abs())
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
        groups
    }
}

/// Outcome of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareReport {
    pub mode: CompareMode,
    /// Suite labels, in load order.
    pub labels: Vec<String>,
    /// Significance threshold in percent (0 when not set).
    pub min_speed: f64,
    /// One row per common benchmark name, names ascending.
    pub rows: Vec<CompareRow>,
    /// Present when grouping by speed was requested.
    pub groups: Option<SpeedGroups>,
}

/// Compare the common benchmarks of every suite in `data`.
///
/// Options are validated first; benchmarks without enough data are listed
/// as [`Verdict::NotEnoughData`] and reported to `diagnostics`.
pub fn compare_suites(
    data: &SuiteCollection,
    options: &CompareOptions,
    diagnostics: &mut Diagnostics,
) -> Result<CompareReport> {
    options.validate(data.suite_count())?;
    let min_speed = options.min_speed.unwrap_or(0.0);
    let labels = data.labels();

    let mut rows = Vec::new();
    for group in data.group_by_name() {
        let timings: Vec<SuiteTiming> = group
            .members
            .iter()
            .map(|member| SuiteTiming {
                label: member.label.clone(),
                timing: Timing::of(member.benchmark),
            })
            .collect();

        let means: Option<Vec<f64>> = timings.iter().map(|t| t.timing.map(|t| t.mean)).collect();
        let Some(means) = means else {
            for (member, timing) in group.members.iter().zip(&timings) {
                if timing.timing.is_none() {
                    diagnostics.warn(
                        DiagnosticKind::InsufficientData,
                        group.name.clone(),
                        format!(
                            "{}: not enough data to compare ({} runs, {} samples)",
                            member.label,
                            member.benchmark.nrun(),
                            member.benchmark.nsample()
                        ),
                    );
                }
            }
            rows.push(CompareRow {
                name: group.name,
                timings,
                ranking: Vec::new(),
                verdict: Verdict::NotEnoughData,
            });
            continue;
        };

        let (changes, ranking) = match options.mode {
            CompareMode::Baseline => {
                let changes = (1..means.len())
                    .map(|j| SpeedChange::between(0, j, means[0], means[j], min_speed))
                    .collect();
                (changes, Vec::new())
            }
            CompareMode::Ranked => {
                let mut changes = Vec::new();
                for i in 0..means.len() {
                    for j in i + 1..means.len() {
                        changes.push(SpeedChange::between(i, j, means[i], means[j], min_speed));
                    }
                }
                let mut ranking: Vec<usize> = (0..means.len()).collect();
                ranking.sort_by(|&a, &b| means[a].total_cmp(&means[b]));
                (changes, ranking)
            }
        };

        rows.push(CompareRow {
            name: group.name,
            timings,
            ranking,
            verdict: Verdict::Changes(changes),
        });
    }

    let groups = options.group_by_speed.then(|| SpeedGroups::from_rows(&rows));
    tracing::debug!(
        rows = rows.len(),
        suites = data.suite_count(),
        mode = ?options.mode,
        "compared benchmark suites"
    );

    Ok(CompareReport {
        mode: options.mode,
        labels,
        min_speed,
        rows,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::Run;
    use crate::suite::BenchmarkSuite;

    /// Benchmark with two runs whose samples average to `mean`.
    fn bench(name: &str, mean: f64) -> Benchmark {
        Benchmark::new(
            Some(name),
            vec![
                Run::new(vec![mean * 0.99, mean * 1.01]),
                Run::new(vec![mean * 1.01, mean * 0.99]),
            ],
        )
    }

    fn collection(suites: Vec<(&str, Vec<Benchmark>)>) -> SuiteCollection {
        let mut data = SuiteCollection::new();
        for (source, benchmarks) in suites {
            data.push(BenchmarkSuite::new(source, benchmarks).unwrap());
        }
        data
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_requires_two_suites() {
        let data = collection(vec![("a.json", vec![bench("x", 1.0)])]);
        let err =
            compare_suites(&data, &CompareOptions::default(), &mut Diagnostics::new()).unwrap_err();
        assert_eq!(err, SuiteError::InsufficientSuites { count: 1 });
    }

    #[test]
    fn test_group_by_speed_requires_exactly_two_suites() {
        let data = collection(vec![
            ("a.json", vec![bench("x", 1.0)]),
            ("b.json", vec![bench("x", 1.0)]),
            ("c.json", vec![bench("x", 1.0)]),
        ]);
        let options = CompareOptions {
            group_by_speed: true,
            ..Default::default()
        };
        let err = compare_suites(&data, &options, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, SuiteError::UnsupportedConfig(_)));

        let ranked = CompareOptions {
            mode: CompareMode::Ranked,
            group_by_speed: true,
            min_speed: None,
        };
        assert!(ranked.validate(2).is_err());
    }

    #[test]
    fn test_negative_min_speed_rejected() {
        let options = CompareOptions {
            min_speed: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(options.validate(2), Err(SuiteError::UnsupportedConfig(_))));
    }

    #[test]
    fn test_ranked_reports_two_times_faster() {
        let data = collection(vec![
            ("a.json", vec![bench("x", 1.0)]),
            ("b.json", vec![bench("x", 0.5)]),
        ]);
        let options = CompareOptions {
            mode: CompareMode::Ranked,
            ..Default::default()
        };
        let report = compare_suites(&data, &options, &mut Diagnostics::new()).unwrap();
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.ranking, vec![1, 0]);
        let change = row.changes()[0];
        assert_eq!((change.reference, change.changed), (0, 1));
        assert!(approx(change.ratio, 2.0));
        assert_eq!(change.speed, Speed::Faster);
        assert_eq!(change.describe(), "2.00x faster");
    }

    #[test]
    fn test_ranked_compares_every_pair() {
        let data = collection(vec![
            ("a.json", vec![bench("x", 1.0)]),
            ("b.json", vec![bench("x", 2.0)]),
            ("c.json", vec![bench("x", 4.0)]),
        ]);
        let options = CompareOptions {
            mode: CompareMode::Ranked,
            ..Default::default()
        };
        let report = compare_suites(&data, &options, &mut Diagnostics::new()).unwrap();
        let pairs: Vec<_> = report.rows[0]
            .changes()
            .iter()
            .map(|c| (c.reference, c.changed, c.speed))
            .collect();
        assert_eq!(
            pairs,
            vec![(0, 1, Speed::Slower), (0, 2, Speed::Slower), (1, 2, Speed::Slower)]
        );
        assert_eq!(report.rows[0].ranking, vec![0, 1, 2]);
    }

    #[test]
    fn test_threshold_classification_and_grouping() {
        let data = collection(vec![
            ("ref.json", vec![bench("w", 1.0), bench("y", 1.0), bench("z", 1.0), bench("v", 1.0)]),
            ("new.json", vec![bench("w", 0.5), bench("y", 1.03), bench("z", 1.2), bench("v", 0.9)]),
        ]);
        let options = CompareOptions {
            mode: CompareMode::Baseline,
            group_by_speed: true,
            min_speed: Some(5.0),
        };
        let report = compare_suites(&data, &options, &mut Diagnostics::new()).unwrap();
        let speed_of = |name: &str| {
            report
                .rows
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.changes()[0].speed)
                .unwrap()
        };
        assert_eq!(speed_of("y"), Speed::Same);
        assert_eq!(speed_of("z"), Speed::Slower);

        let groups = report.groups.unwrap();
        let faster: Vec<_> = groups.faster.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(faster, vec!["w", "v"]);
        assert_eq!(groups.slower[0].name, "z");
        assert_eq!(groups.same[0].name, "y");
    }

    #[test]
    fn test_threshold_boundary_is_significant() {
        let change = SpeedChange::between(0, 1, 1.0, 1.25, 25.0);
        assert_eq!(change.speed, Speed::Slower);
        let change = SpeedChange::between(0, 1, 1.0, 1.2, 25.0);
        assert_eq!(change.speed, Speed::Same);
        let equal = SpeedChange::between(0, 1, 1.0, 1.0, 0.0);
        assert_eq!(equal.speed, Speed::Same);
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let data = collection(vec![
            ("a.json", vec![bench("b", 1.0), bench("a", 1.0)]),
            ("b.json", vec![bench("b", 2.0), bench("a", 2.0)]),
        ]);
        let options = CompareOptions {
            group_by_speed: true,
            ..Default::default()
        };
        let report = compare_suites(&data, &options, &mut Diagnostics::new()).unwrap();
        let slower: Vec<_> = report.groups.unwrap().slower.into_iter().map(|g| g.name).collect();
        assert_eq!(slower, vec!["a", "b"]);
    }

    #[test]
    fn test_not_enough_data_is_listed_and_reported() {
        let single_run = Benchmark::new(Some("x"), vec![Run::new(vec![1.0, 1.1])]);
        let empty = Benchmark::new(Some("y"), vec![Run::new(vec![]), Run::new(vec![])]);
        let data = collection(vec![
            ("a.json", vec![single_run, bench("y", 1.0), bench("z", 1.0)]),
            ("b.json", vec![bench("x", 1.0), empty, bench("z", 2.0)]),
        ]);
        let options = CompareOptions {
            group_by_speed: true,
            ..Default::default()
        };
        let mut diagnostics = Diagnostics::new();
        let report = compare_suites(&data, &options, &mut diagnostics).unwrap();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].verdict, Verdict::NotEnoughData);
        assert!(report.rows[0].timings[0].timing.is_none());
        assert!(report.rows[0].timings[1].timing.is_some());
        assert_eq!(report.rows[1].verdict, Verdict::NotEnoughData);

        let groups = report.groups.unwrap();
        assert_eq!(groups.faster.len() + groups.slower.len() + groups.same.len(), 1);

        assert_eq!(diagnostics.warnings().count(), 2);
        assert_eq!(diagnostics.about(DiagnosticKind::InsufficientData, "x").count(), 1);
    }
}
