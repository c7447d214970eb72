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

//! Benchmark suites and their JSON representation.

use crate::benchmark::Benchmark;
use crate::error::{Result, SuiteError};
use crate::metadata::Metadata;
use crate::storage;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Version written into dumped suites. Files with another major version are
/// rejected at load time.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Serialize, Deserialize)]
struct SuiteFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
    benchmarks: Vec<Benchmark>,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// An ordered collection of benchmarks loaded from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSuite {
    source: String,
    metadata: Metadata,
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkSuite {
    /// Build a suite in memory. Fails if two benchmarks share a name.
    pub fn new(source: impl Into<String>, benchmarks: Vec<Benchmark>) -> Result<Self> {
        let mut suite = BenchmarkSuite {
            source: source.into(),
            metadata: Metadata::new(),
            benchmarks: Vec::with_capacity(benchmarks.len()),
        };
        for benchmark in benchmarks {
            suite.add_benchmark(benchmark)?;
        }
        Ok(suite)
    }

    /// Load a suite from a JSON file (gzip-compressed when ending in `.gz`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = storage::read_source(path)?;
        let suite = Self::from_json_str(path.display().to_string(), &content)?;
        tracing::debug!(
            source = %suite.source,
            benchmarks = suite.len(),
            "loaded benchmark suite"
        );
        Ok(suite)
    }

    /// Parse a suite from JSON text; `source` identifies it in errors and labels.
    pub fn from_json_str(source: impl Into<String>, content: &str) -> Result<Self> {
        let source = source.into();
        let file: SuiteFile =
            serde_json::from_str(content).map_err(|e| SuiteError::load(&source, e.to_string()))?;

        let major = file.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(SuiteError::load(
                &source,
                format!("unsupported format version '{}'", file.version),
            ));
        }

        let mut suite = BenchmarkSuite::new(source.clone(), file.benchmarks)
            .map_err(|e| SuiteError::load(&source, e.to_string()))?;
        suite.metadata = file.metadata;
        Ok(suite)
    }

    /// Serialize to JSON, compact or indented.
    pub fn to_json_string(&self, compact: bool) -> Result<String> {
        let file = SuiteFile {
            version: FORMAT_VERSION.to_string(),
            metadata: self.metadata.clone(),
            benchmarks: self.benchmarks.clone(),
        };
        let encoded = if compact {
            serde_json::to_string(&file)
        } else {
            serde_json::to_string_pretty(&file)
        };
        let mut text = encoded.map_err(|e| SuiteError::Serialize {
            source_id: self.source.clone(),
            message: e.to_string(),
        })?;
        text.push('\n');
        Ok(text)
    }

    /// Write the suite to a file.
    pub fn dump(&self, path: impl AsRef<Path>, compact: bool) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_json_string(compact)?;
        storage::write_output(path, &text)?;
        tracing::debug!(path = %path.display(), "dumped benchmark suite");
        Ok(())
    }

    /// The origin of the suite (usually the path it was loaded from).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn clear_metadata(&mut self) {
        self.metadata.clear();
    }

    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    pub(crate) fn benchmarks_mut(&mut self) -> &mut Vec<Benchmark> {
        &mut self.benchmarks
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    pub fn get_benchmark(&self, name: &str) -> Option<&Benchmark> {
        self.benchmarks.iter().find(|b| b.name() == Some(name))
    }

    pub(crate) fn get_benchmark_mut(&mut self, name: Option<&str>) -> Option<&mut Benchmark> {
        self.benchmarks.iter_mut().find(|b| b.name() == name)
    }

    /// Non-empty benchmark names; the anonymous benchmark is skipped.
    pub fn benchmark_names(&self) -> HashSet<&str> {
        self.benchmarks
            .iter()
            .filter_map(Benchmark::name)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Append a benchmark, keeping names unique.
    pub fn add_benchmark(&mut self, benchmark: Benchmark) -> Result<()> {
        if self.benchmarks.iter().any(|b| b.name() == benchmark.name()) {
            return Err(SuiteError::DuplicateBenchmark {
                suite: self.source.clone(),
                name: benchmark.display_name().to_string(),
            });
        }
        self.benchmarks.push(benchmark);
        Ok(())
    }

    /// Sum of the benchmarks' total durations, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.benchmarks.iter().map(Benchmark::total_duration).sum()
    }

    /// Earliest and latest run dates across the suite.
    pub fn dates(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let ranges: Vec<_> = self.benchmarks.iter().filter_map(Benchmark::dates).collect();
        let start = ranges.iter().map(|(start, _)| *start).min()?;
        let end = ranges.iter().map(|(_, end)| *end).max()?;
        Some((start, end))
    }
}
