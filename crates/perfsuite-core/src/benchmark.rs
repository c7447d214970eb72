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

//! Benchmarks and their runs.

use crate::metadata::{common_metadata, Metadata, MetadataValue};
use crate::stats::{self, Summary};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display name used for a benchmark without a `name` metadata entry.
pub const ANONYMOUS_BENCHMARK: &str = "<no name>";

/// One execution of a benchmark: its warmup and measured samples (seconds)
/// and the metadata collected while it ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warmups: Vec<f64>,
    #[serde(default)]
    samples: Vec<f64>,
}

impl Run {
    pub fn new(samples: Vec<f64>) -> Self {
        Run {
            metadata: Metadata::new(),
            warmups: Vec::new(),
            samples,
        }
    }

    pub fn with_warmups(mut self, warmups: Vec<f64>) -> Self {
        self.warmups = warmups;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn warmups(&self) -> &[f64] {
        &self.warmups
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub(crate) fn set_samples(&mut self, samples: Vec<f64>) {
        self.samples = samples;
    }

    pub(crate) fn clear_warmups(&mut self) {
        self.warmups.clear();
    }

    /// Wall-clock duration of the run: the `duration` metadata when recorded,
    /// otherwise the sum of warmups and samples.
    pub fn duration(&self) -> f64 {
        self.metadata
            .get("duration")
            .and_then(MetadataValue::as_f64)
            .unwrap_or_else(|| self.warmups.iter().chain(&self.samples).sum())
    }

    /// Date of the run, from the `date` metadata (ISO 8601).
    pub fn date(&self) -> Option<NaiveDateTime> {
        let text = self.metadata.get("date")?.as_str()?;
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }
}

/// A named series of runs measuring one workload.
///
/// The name lives in the `name` metadata key; a benchmark without it is the
/// suite's anonymous benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
    #[serde(default)]
    runs: Vec<Run>,
}

impl Benchmark {
    /// Create a benchmark; `None` creates the anonymous benchmark.
    pub fn new(name: Option<&str>, runs: Vec<Run>) -> Self {
        let mut metadata = Metadata::new();
        if let Some(name) = name {
            metadata.insert("name", name);
        }
        Benchmark { metadata, runs }
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(MetadataValue::as_str)
    }

    /// Name for display, with a placeholder for the anonymous benchmark.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(ANONYMOUS_BENCHMARK)
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub(crate) fn runs_mut(&mut self) -> &mut Vec<Run> {
        &mut self.runs
    }

    /// Benchmark-level metadata only, without the run metadata.
    pub fn own_metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn own_metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Benchmark metadata merged with the metadata shared by all its runs.
    pub fn get_metadata(&self) -> Metadata {
        let run_metadata: Vec<Metadata> = self.runs.iter().map(|r| r.metadata.clone()).collect();
        let shared = match run_metadata.as_slice() {
            [single] => single.clone(),
            many => common_metadata(many),
        };

        let mut metadata = self.metadata.clone();
        for (key, value) in shared.iter() {
            if !metadata.contains_key(key) {
                metadata.insert(key, value.clone());
            }
        }
        metadata
    }

    /// All samples of all runs, in run order.
    pub fn samples(&self) -> Vec<f64> {
        self.runs.iter().flat_map(|r| r.samples.iter().copied()).collect()
    }

    pub fn nrun(&self) -> usize {
        self.runs.len()
    }

    pub fn nsample(&self) -> usize {
        self.runs.iter().map(|r| r.samples.len()).sum()
    }

    pub fn total_duration(&self) -> f64 {
        self.runs.iter().map(Run::duration).sum()
    }

    pub fn summary(&self) -> Option<Summary> {
        Summary::from_samples(&self.samples())
    }

    pub fn mean(&self) -> Option<f64> {
        stats::mean(&self.samples())
    }

    pub fn median(&self) -> Option<f64> {
        stats::median(&self.samples())
    }

    /// Earliest and latest run dates.
    pub fn dates(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let dates: Vec<NaiveDateTime> = self.runs.iter().filter_map(Run::date).collect();
        let start = dates.iter().min()?;
        let end = dates.iter().max()?;
        Some((*start, *end))
    }

    /// Append the runs of another benchmark.
    pub fn add_runs(&mut self, other: &Benchmark) {
        self.runs.extend(other.runs.iter().cloned());
    }
}

impl std::fmt::Display for Benchmark {
    /// One-line summary, e.g. `1.50 sec +- 0.50 sec`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::format::format_run_result(&self.samples(), false))
    }
}
