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

//! Data model and analysis engine for benchmark suites.
//!
//! A suite is a JSON document holding named benchmarks, each made of runs of
//! timing samples with free-form metadata. This crate loads and writes suites
//! (optionally gzip-compressed), edits them, and compares several suites
//! against each other.
//!
//! # Overview
//!
//! - [`BenchmarkSuite`] and [`Benchmark`] model one file and its content
//! - [`SuiteCollection`] holds every loaded suite, labels them, and groups
//!   benchmarks sharing a name
//! - [`compare_suites`] classifies each common benchmark as faster, slower
//!   or unchanged
//! - [`Diagnostics`] collects warnings raised along the way instead of
//!   printing them
//!
//! ```
//! use perfsuite_core::{Benchmark, BenchmarkSuite, Run, SuiteCollection};
//!
//! let bench = Benchmark::new(Some("startup"), vec![Run::new(vec![0.5, 0.6])]);
//! let suite = BenchmarkSuite::new("ref.json", vec![bench]).unwrap();
//!
//! let mut data = SuiteCollection::new();
//! data.push(suite);
//! assert_eq!(data.count(), 1);
//! ```

mod benchmark;
pub mod collection;
pub mod compare;
mod convert;
mod diagnostics;
mod error;
pub mod format;
mod grouping;
mod metadata;
pub mod ranges;
pub mod stats;
pub mod storage;
mod suite;

pub use benchmark::{Benchmark, Run, ANONYMOUS_BENCHMARK};
pub use collection::{DataItem, IterSuite, LabelPolicy, SuiteCollection};
pub use compare::{
    compare_suites, CompareMode, CompareOptions, CompareReport, CompareRow, GroupedChange, Speed,
    SpeedChange, SpeedGroups, SuiteTiming, Timing, Verdict,
};
pub use convert::OUTLIER_TOLERANCE;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{Result, SuiteError};
pub use grouping::{BenchmarkGroup, GroupMember, IgnoredBenchmarks};
pub use metadata::{common_metadata, Metadata, MetadataValue};
pub use suite::{BenchmarkSuite, FORMAT_VERSION};
