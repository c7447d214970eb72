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

//! Convert command - edit a suite file and write it back

use super::print_lines;
use crate::error::CliError;
use perfsuite_core::ranges::parse_run_list;
use perfsuite_core::{BenchmarkSuite, Metadata, MetadataValue};
use std::path::{Path, PathBuf};

/// Edits applied by [`convert`], in the order they are listed.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Suite whose runs are appended to the input
    pub add: Option<PathBuf>,
    pub include_benchmark: Option<String>,
    pub exclude_benchmark: Option<String>,
    /// 1-based run list such as `1-3,7`
    pub include_runs: Option<String>,
    pub exclude_runs: Option<String>,
    pub remove_warmups: bool,
    /// `KEY=VALUE` pairs separated by commas
    pub update_metadata: Option<String>,
    pub extract_metadata: Option<String>,
    pub remove_all_metadata: bool,
    pub remove_outliers: bool,
    /// Pretty-print the JSON output
    pub indent: bool,
    pub output: Option<PathBuf>,
    pub stdout: bool,
}

/// Load `input`, apply the requested edits and write the result.
///
/// # Errors
///
/// Fails when no output is selected, when the input or `--add` file cannot
/// be loaded, or when an edit would leave a benchmark or the suite empty.
pub fn convert(input: &Path, options: &ConvertOptions) -> Result<(), CliError> {
    if options.output.is_none() && !options.stdout {
        return Err(CliError::invalid_input(
            "select an output with -o FILE or --stdout",
        ));
    }

    let mut suite = BenchmarkSuite::load(input)?;
    apply_edits(&mut suite, options)?;

    let compact = !options.indent;
    match &options.output {
        Some(path) => {
            suite.dump(path, compact)?;
            tracing::info!(output = %path.display(), benchmarks = suite.len(), "suite written");
        }
        None => {
            let text = suite.to_json_string(compact)?;
            print_lines(&[text.trim_end().to_string()])?;
        }
    }
    Ok(())
}

fn apply_edits(suite: &mut BenchmarkSuite, options: &ConvertOptions) -> Result<(), CliError> {
    if let Some(path) = &options.add {
        let other = BenchmarkSuite::load(path)?;
        suite.add_runs_from(&other)?;
    }

    if let Some(name) = &options.include_benchmark {
        suite.include_benchmark(name)?;
    } else if let Some(name) = &options.exclude_benchmark {
        suite.exclude_benchmark(name)?;
    }

    if let Some(list) = &options.include_runs {
        suite.filter_runs(true, &parse_run_list(list)?)?;
    } else if let Some(list) = &options.exclude_runs {
        suite.filter_runs(false, &parse_run_list(list)?)?;
    }

    if options.remove_warmups {
        suite.remove_warmups();
    }

    if let Some(updates) = &options.update_metadata {
        suite.update_metadata(&parse_metadata_updates(updates)?)?;
    }

    if let Some(key) = &options.extract_metadata {
        suite.extract_metadata(key)?;
    }

    if options.remove_all_metadata {
        suite.remove_all_metadata();
    }

    if options.remove_outliers {
        suite.remove_outliers()?;
    }
    Ok(())
}

/// Parse `KEY=VALUE,KEY2=VALUE2` into metadata.
///
/// Values become integers or floats when they parse as such.
///
/// ```rust
/// use perfsuite_cli::commands::parse_metadata_updates;
///
/// let metadata = parse_metadata_updates("loops=16, python=3.12").unwrap();
/// assert_eq!(metadata.len(), 2);
/// assert!(parse_metadata_updates("=1").is_err());
/// ```
pub fn parse_metadata_updates(text: &str) -> Result<Metadata, CliError> {
    let mut metadata = Metadata::new();
    for item in text.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let (key, value) = item.split_once('=').unwrap_or((item, ""));
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::invalid_input(format!(
                "empty metadata key in '{}'",
                item
            )));
        }
        metadata.insert(key, MetadataValue::parse(value.trim()));
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsuite_core::{Benchmark, Run, SuiteError};

    fn suite() -> BenchmarkSuite {
        let run = |samples: Vec<f64>| {
            let mut metadata = Metadata::new();
            metadata.insert("loops", MetadataValue::Int(8));
            Run::new(samples).with_metadata(metadata)
        };
        BenchmarkSuite::new(
            "suite.json",
            vec![
                Benchmark::new(
                    Some("a"),
                    vec![run(vec![1.0]), run(vec![1.01]), run(vec![2.0])],
                ),
                Benchmark::new(Some("b"), vec![run(vec![3.0]), run(vec![3.0])]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_metadata_updates() {
        let metadata = parse_metadata_updates("loops=16,ratio=0.5,tag=fast,,").unwrap();
        assert_eq!(metadata.get("loops"), Some(&MetadataValue::Int(16)));
        assert_eq!(metadata.get("ratio"), Some(&MetadataValue::Float(0.5)));
        assert_eq!(metadata.get("tag").and_then(|v| v.as_str()), Some("fast"));
    }

    #[test]
    fn test_parse_metadata_updates_keeps_non_finite_text() {
        let metadata = parse_metadata_updates("note=nan,limit=inf").unwrap();
        assert_eq!(metadata.get("note").and_then(|v| v.as_str()), Some("nan"));
        assert_eq!(metadata.get("limit").and_then(|v| v.as_str()), Some("inf"));
    }

    #[test]
    fn test_parse_metadata_updates_rejects_empty_key() {
        let err = parse_metadata_updates("a=1, =2").unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_convert_requires_output() {
        let err = convert(Path::new("missing.json"), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_include_runs_is_one_based() {
        let mut suite = suite();
        let options = ConvertOptions {
            include_runs: Some("1-2".to_string()),
            ..Default::default()
        };
        apply_edits(&mut suite, &options).unwrap();
        assert_eq!(suite.get_benchmark("a").unwrap().nrun(), 2);
        assert_eq!(suite.get_benchmark("b").unwrap().nrun(), 2);
    }

    #[test]
    fn test_exclude_all_runs_fails() {
        let mut suite = suite();
        let options = ConvertOptions {
            exclude_runs: Some("1-2".to_string()),
            ..Default::default()
        };
        let err = apply_edits(&mut suite, &options).unwrap_err();
        assert!(matches!(err, CliError::Suite(SuiteError::NoMoreRuns { .. })));
    }

    #[test]
    fn test_update_metadata_rejects_name() {
        let mut suite = suite();
        let options = ConvertOptions {
            update_metadata: Some("name=other".to_string()),
            ..Default::default()
        };
        assert!(apply_edits(&mut suite, &options).is_err());
    }

    #[test]
    fn test_edits_chain_in_order() {
        let mut suite = suite();
        let options = ConvertOptions {
            include_benchmark: Some("a".to_string()),
            update_metadata: Some("loops=16".to_string()),
            remove_outliers: true,
            ..Default::default()
        };
        apply_edits(&mut suite, &options).unwrap();

        assert_eq!(suite.len(), 1);
        let bench = suite.get_benchmark("a").unwrap();
        assert_eq!(bench.nrun(), 2);
        assert!(bench
            .runs()
            .iter()
            .all(|run| run.metadata().get("loops") == Some(&MetadataValue::Int(16))));
    }
}
