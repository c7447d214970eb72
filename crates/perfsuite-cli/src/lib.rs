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

//! Perfsuite CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! ## Inspection
//!
//! - **show**: one line per benchmark, or a detailed layout with metadata,
//!   histograms, statistics and runs
//! - **hist**: text histograms, shared buckets for benchmarks of the same name
//! - **stats**: per-suite and per-benchmark statistics
//! - **dump**: runs with warmups, samples and metadata
//! - **slowest**: benchmarks with the longest total duration
//!
//! ## Comparison
//!
//! - **compare-to**: compare every suite with the first one
//! - **compare**: rank all suites for each common benchmark
//!
//! ## Editing
//!
//! - **convert**: filter benchmarks and runs, edit metadata, remove outliers
//!
//! ## Host
//!
//! - **metadata**: host metadata (CPU, kernel command line, ...)
//! - **system**: show, tune or reset the system for benchmarking
//!
//! ## Utilities
//!
//! - **completion**: shell completion scripts
//!
//! # Example
//!
//! ```no_run
//! use perfsuite_cli::commands::{show, ShowOptions};
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), perfsuite_cli::error::CliError> {
//! let files = vec![PathBuf::from("main.json"), PathBuf::from("patch.json")];
//! show(&files, None, ShowOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod render;
pub mod system;
