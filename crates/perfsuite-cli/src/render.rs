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

//! Text rendering shared by the inspection commands.
//!
//! Functions here return lines instead of printing so that commands decide
//! where output goes and tests can check it.

use colored::Colorize;
use perfsuite_core::format::{format_mean_stdev, format_number, format_seconds, format_timedelta};
use perfsuite_core::{stats, Benchmark, DiagnosticKind, Diagnostics, Metadata, Severity};

/// Terminal width used when `COLUMNS` is unset or invalid.
pub const DEFAULT_COLUMNS: usize = 80;

/// Histogram bars when neither `--bins` nor `--extend` is given.
pub const DEFAULT_BINS: usize = 25;

/// Standard deviation, relative to the mean, above which a benchmark is unstable.
pub const UNSTABLE_STDEV_RATIO: f64 = 0.10;

/// Samples shorter than this (in seconds) are too short to be reliable.
pub const MIN_SAMPLE_DURATION: f64 = 1e-3;

/// Width of the terminal, read from `COLUMNS`.
pub fn terminal_columns() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_COLUMNS)
}

/// Underlined title followed by an empty line. Level 1 uses `=`, deeper
/// levels use `-`.
pub fn title(text: &str, level: u8) -> Vec<String> {
    let underline = if level <= 1 { "=" } else { "-" };
    vec![
        text.bold().to_string(),
        underline.repeat(text.chars().count()),
        String::new(),
    ]
}

/// One `- key: value` line per entry, under an optional header.
pub fn metadata_lines(metadata: &Metadata, header: Option<&str>) -> Vec<String> {
    let mut lines = Vec::with_capacity(metadata.len() + 1);
    if let Some(header) = header {
        lines.push(header.to_string());
    }
    lines.extend(
        metadata
            .iter()
            .map(|(key, value)| format!("- {}: {}", key.cyan(), value)),
    );
    lines
}

/// Push a warning for each sign of an unreliable benchmark and return how
/// many were pushed.
pub fn check_stability(
    benchmark: &Benchmark,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> usize {
    let before = diagnostics.len();
    let samples = benchmark.samples();

    if let (Some(mean), Some(stdev)) = (stats::mean(&samples), stats::stdev(&samples)) {
        if mean > 0.0 && stdev >= mean * UNSTABLE_STDEV_RATIO {
            diagnostics.warn(
                DiagnosticKind::Unstable,
                subject,
                format!(
                    "the standard deviation ({}) is {:.0}% of the mean ({})",
                    format_timedelta(stdev),
                    stdev / mean * 100.0,
                    format_timedelta(mean)
                ),
            );
        }
    }

    if benchmark.nrun() == 1 {
        diagnostics.warn(
            DiagnosticKind::Unstable,
            subject,
            "the benchmark only has one run, results may not be reproducible",
        );
    }

    if let Some(shortest) = stats::min(&samples) {
        if shortest < MIN_SAMPLE_DURATION {
            diagnostics.warn(
                DiagnosticKind::Unstable,
                subject,
                format!(
                    "the shortest sample only took {} (minimum recommended: {})",
                    format_timedelta(shortest),
                    format_timedelta(MIN_SAMPLE_DURATION)
                ),
            );
        }
    }

    diagnostics.len() - before
}

/// `WARNING: subject: message` and `ERROR: subject: message` lines.
pub fn diagnostic_lines(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| {
            let prefix = match d.severity {
                Severity::Warning => "WARNING:".yellow().bold(),
                Severity::Error => "ERROR:".red().bold(),
            };
            format!("{} {}", prefix, d)
        })
        .collect()
}

/// Statistics of one benchmark, one value per line.
pub fn stats_lines(benchmark: &Benchmark) -> Vec<String> {
    let mut lines = vec![format!(
        "Total duration: {}",
        format_seconds(benchmark.total_duration())
    )];
    if let Some((start, end)) = benchmark.dates() {
        lines.push(format!("Start date: {}", start.format("%Y-%m-%d %H:%M:%S")));
        lines.push(format!("End date: {}", end.format("%Y-%m-%d %H:%M:%S")));
    }

    lines.push(format!("Number of runs: {}", benchmark.nrun()));
    lines.push(format!("Total number of samples: {}", benchmark.nsample()));
    let nwarmup: usize = benchmark.runs().iter().map(|r| r.warmups().len()).sum();
    if nwarmup > 0 {
        lines.push(format!("Total number of warmups: {}", nwarmup));
    }

    let Some(summary) = benchmark.summary() else {
        lines.push("No sample".to_string());
        return lines;
    };
    lines.push(String::new());
    lines.push(format!("Minimum: {}", format_timedelta(summary.min)));
    lines.push(format!("Median: {}", format_timedelta(summary.median)));
    let mean = match summary.stdev {
        Some(stdev) => format_mean_stdev(summary.mean, stdev),
        None => format_timedelta(summary.mean),
    };
    lines.push(format!("Mean +- std dev: {}", mean));
    lines.push(format!("Maximum: {}", format_timedelta(summary.max)));

    lines.push(String::new());
    for (rank, value) in [
        ("5th", summary.p5),
        ("25th", summary.p25),
        ("75th", summary.p75),
        ("95th", summary.p95),
    ] {
        let delta = (value - summary.mean) / summary.mean * 100.0;
        lines.push(format!(
            "{} percentile: {} ({:+.0}% of the mean)",
            rank,
            format_timedelta(value),
            delta
        ));
    }
    lines
}

fn format_values(values: &[f64], raw: bool) -> String {
    values
        .iter()
        .map(|&v| if raw { v.to_string() } else { format_timedelta(v) })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs of one benchmark. `quiet` shows samples only, `verbose` adds the
/// metadata of each run, `raw` prints values in seconds without units.
pub fn runs_lines(benchmark: &Benchmark, quiet: bool, verbose: bool, raw: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, run) in benchmark.runs().iter().enumerate() {
        let samples = format_values(run.samples(), raw);
        if quiet {
            lines.push(format!("Run {}: {}", index + 1, samples));
            continue;
        }

        let mut line = format!("Run {}: ", index + 1);
        if !run.warmups().is_empty() {
            line.push_str(&format!(
                "{}: {}; ",
                format_number(run.warmups().len() as u64, "warmup"),
                format_values(run.warmups(), raw)
            ));
        }
        line.push_str(&format!(
            "{}: {}",
            format_number(run.samples().len() as u64, "sample"),
            samples
        ));
        lines.push(line);

        if verbose {
            lines.extend(
                metadata_lines(run.metadata(), None)
                    .into_iter()
                    .map(|l| format!("  {}", l)),
            );
        }
    }
    lines
}

/// Text histogram of one or more benchmarks sharing the same buckets.
///
/// Each series gets a `[ label ]` header when a label is given. Without
/// `extend`, the width is capped to [`DEFAULT_COLUMNS`].
pub fn histogram_lines(
    series: &[(&Benchmark, Option<&str>)],
    bins: Option<usize>,
    extend: bool,
    columns: usize,
) -> Vec<String> {
    let samples: Vec<Vec<f64>> = series.iter().map(|(b, _)| b.samples()).collect();
    let all: Vec<f64> = samples.iter().flatten().copied().collect();
    let (Some(low), Some(high)) = (stats::min(&all), stats::max(&all)) else {
        return vec!["<no sample>".to_string()];
    };

    let columns = if extend { columns } else { columns.min(DEFAULT_COLUMNS) };
    let nbins = if high > low {
        bins.unwrap_or_else(|| {
            if extend {
                columns / 3
            } else {
                (columns / 3).min(DEFAULT_BINS)
            }
        })
        .max(1)
    } else {
        1
    };
    let bucket_width = (high - low) / nbins as f64;
    let labels: Vec<String> = (0..nbins)
        .map(|i| format_timedelta(low + bucket_width * i as f64))
        .collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut lines = Vec::new();
    for (index, (values, (_, name))) in samples.iter().zip(series).enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        if let Some(name) = name {
            lines.push(format!("[ {} ]", name));
        }

        let mut counts = vec![0usize; nbins];
        for value in values {
            let bucket = if bucket_width > 0.0 {
                ((value - low) / bucket_width) as usize
            } else {
                0
            };
            counts[bucket.min(nbins - 1)] += 1;
        }
        let max_count = counts.iter().copied().max().unwrap_or(0);
        let count_width = max_count.to_string().len();
        let bar_width = columns.saturating_sub(label_width + count_width + 3).max(1);

        for (label, &count) in labels.iter().zip(&counts) {
            // round up so that any non-empty bucket gets a visible bar
            let bar = if max_count == 0 {
                0
            } else {
                (count * bar_width + max_count - 1) / max_count
            };
            let line = format!(
                "{:>lw$}: {:>cw$} {}",
                label,
                count,
                "#".repeat(bar),
                lw = label_width,
                cw = count_width
            );
            lines.push(line.trim_end().to_string());
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsuite_core::Run;

    fn bench(runs: Vec<Vec<f64>>) -> Benchmark {
        Benchmark::new(Some("telco"), runs.into_iter().map(Run::new).collect())
    }

    #[test]
    fn test_title_underline_matches_length() {
        let lines = title("telco", 1);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("telco"));
        assert_eq!(lines[1], "=====");
        assert_eq!(title("go", 2)[1], "--");
    }

    #[test]
    fn test_metadata_lines_keep_order() {
        let metadata: Metadata = [("b", "2"), ("a", "1")].into_iter().collect();
        let lines = metadata_lines(&metadata, Some("Common metadata:"));
        assert_eq!(lines[0], "Common metadata:");
        assert!(lines[1].contains('b') && lines[1].ends_with(": 2"));
        assert!(lines[2].contains('a') && lines[2].ends_with(": 1"));
    }

    #[test]
    fn test_stable_benchmark_has_no_warning() {
        let benchmark = bench(vec![vec![0.020, 0.0201], vec![0.0202, 0.0199]]);
        let mut diagnostics = Diagnostics::new();
        assert_eq!(check_stability(&benchmark, "telco", &mut diagnostics), 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unstable_benchmark_warnings() {
        let benchmark = bench(vec![vec![0.0001, 0.0005]]);
        let mut diagnostics = Diagnostics::new();
        assert_eq!(check_stability(&benchmark, "telco", &mut diagnostics), 3);
        assert_eq!(diagnostics.about(DiagnosticKind::Unstable, "telco").count(), 3);
        let lines = diagnostic_lines(&diagnostics);
        assert!(lines.iter().all(|l| l.contains("telco: ")));
        assert!(lines[0].contains("the standard deviation"));
    }

    #[test]
    fn test_stats_lines() {
        let benchmark = bench(vec![vec![1.0, 1.5], vec![2.0]]);
        let lines = stats_lines(&benchmark);
        assert!(lines.contains(&"Number of runs: 2".to_string()));
        assert!(lines.contains(&"Total number of samples: 3".to_string()));
        assert!(lines.contains(&"Mean +- std dev: 1.50 sec +- 0.50 sec".to_string()));
        assert!(lines.contains(&"Minimum: 1.00 sec".to_string()));
    }

    #[test]
    fn test_runs_lines_modes() {
        let benchmark = Benchmark::new(
            Some("telco"),
            vec![Run::new(vec![0.020, 0.021]).with_warmups(vec![0.030])],
        );
        assert_eq!(
            runs_lines(&benchmark, false, false, false),
            vec!["Run 1: 1 warmup: 30.0 ms; 2 samples: 20.0 ms, 21.0 ms"]
        );
        assert_eq!(
            runs_lines(&benchmark, true, false, false),
            vec!["Run 1: 20.0 ms, 21.0 ms"]
        );
        assert_eq!(
            runs_lines(&benchmark, true, false, true),
            vec!["Run 1: 0.02, 0.021"]
        );
    }

    #[test]
    fn test_histogram_counts_every_sample() {
        let benchmark = bench(vec![vec![1.0, 1.0, 2.0], vec![3.0, 4.0]]);
        let lines = histogram_lines(&[(&benchmark, None)], Some(3), false, 80);
        assert_eq!(lines.len(), 3);
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| {
                let after = l.split(": ").nth(1).unwrap();
                after.split_whitespace().next().unwrap().parse().unwrap()
            })
            .collect();
        assert_eq!(counts, vec![2, 1, 2]);
        assert!(lines.iter().all(|l| l.len() <= 80));
    }

    #[test]
    fn test_histogram_with_labels_and_constant_samples() {
        let a = bench(vec![vec![1.0, 1.0]]);
        let b = bench(vec![vec![1.0]]);
        let lines = histogram_lines(&[(&a, Some("a")), (&b, Some("b"))], None, false, 80);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "[ a ]");
        assert!(lines[1].starts_with("1.00 sec: 2 #"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "[ b ]");
        assert!(lines[4].starts_with("1.00 sec: 1 #"));
    }

    #[test]
    fn test_histogram_without_samples() {
        let empty = Benchmark::new(Some("x"), Vec::new());
        assert_eq!(histogram_lines(&[(&empty, None)], None, false, 80), vec!["<no sample>"]);
    }
}
