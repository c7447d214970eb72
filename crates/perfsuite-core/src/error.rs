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

//! Error types for suite loading, filtering and comparison.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the suite model, the storage layer and the comparison
/// engine.
///
/// Every variant is fatal for the command that triggered it. Non-fatal
/// conditions (unstable benchmarks, missing data for a comparison) are
/// reported through [`crate::Diagnostics`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SuiteError {
    /// The suite source could not be read or parsed.
    #[error("Failed to load benchmark suite '{source_id}': {message}")]
    Load {
        /// Source identifier (path) of the suite
        source_id: String,
        /// Description of the failure
        message: String,
    },

    /// A name-based filter matched nothing in a suite.
    #[error("The benchmark suite {suite} doesn't contain a benchmark called '{name}'")]
    MissingBenchmark {
        /// Source identifier of the offending suite
        suite: String,
        /// The requested benchmark name
        name: String,
    },

    /// A comparison was requested with fewer than two suites.
    #[error("need at least two benchmark files, got {count}")]
    InsufficientSuites {
        /// Number of loaded suites
        count: usize,
    },

    /// The requested comparison options cannot be honoured.
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfig(String),

    /// Two benchmarks of one suite share a name.
    #[error("The benchmark suite {suite} contains the benchmark '{name}' more than once")]
    DuplicateBenchmark {
        /// Source identifier of the suite
        suite: String,
        /// The duplicated name
        name: String,
    },

    /// Removing a benchmark would leave the suite empty.
    #[error("After modification, the benchmark suite {suite} has no more benchmark")]
    NoMoreBenchmark {
        /// Source identifier of the suite
        suite: String,
    },

    /// Filtering left a benchmark without any run.
    #[error("Benchmark '{name}' has no more run")]
    NoMoreRuns {
        /// Display name of the benchmark
        name: String,
    },

    /// A run lacks the requested metadata key.
    #[error("Benchmark '{benchmark}' has no metadata '{key}'")]
    MissingMetadata {
        /// Display name of the benchmark
        benchmark: String,
        /// The missing key
        key: String,
    },

    /// A metadata value has the wrong type or is not allowed.
    #[error("Invalid metadata '{key}': {message}")]
    InvalidMetadata {
        /// Metadata key
        key: String,
        /// Description of the problem
        message: String,
    },

    /// A run list such as `1-3,5` could not be parsed.
    #[error("{message} (runs: '{input}')")]
    InvalidRunList {
        /// The raw user input
        input: String,
        /// Description of the problem
        message: String,
    },

    /// A suite could not be encoded as JSON.
    #[error("Failed to serialize benchmark suite '{source_id}': {message}")]
    Serialize {
        /// Identifier of the suite
        source_id: String,
        /// The serializer message
        message: String,
    },

    /// Writing a suite failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// The error message
        message: String,
    },
}

impl SuiteError {
    /// Create a load error for a source.
    pub fn load(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an unsupported configuration error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedConfig(msg.into())
    }

    pub fn invalid_run_list(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRunList {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SuiteError>;
