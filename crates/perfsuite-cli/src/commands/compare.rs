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

//! Compare command - speed of the benchmarks shared by several suites

use super::{load_suites, print_lines, report_diagnostics};
use crate::error::CliError;
use perfsuite_core::format::format_mean_stdev;
use perfsuite_core::{
    compare_suites, CompareMode, CompareOptions, CompareReport, CompareRow, Diagnostics,
    GroupedChange, Speed, SpeedChange, SpeedGroups, SuiteCollection, Verdict,
};
use std::path::PathBuf;

/// Output switches of `compare` and `compare-to`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareDisplay {
    /// Hide benchmarks whose change is not significant.
    pub quiet: bool,
    /// List not significant changes and every compared pair.
    pub verbose: bool,
}

/// Compare the suites loaded from `files` and print the result.
pub fn compare(
    files: &[PathBuf],
    name: Option<&str>,
    options: &CompareOptions,
    display: CompareDisplay,
) -> Result<(), CliError> {
    let data = load_suites(files, name)?;
    let mut diagnostics = Diagnostics::new();
    let report = compare_suites(&data, options, &mut diagnostics)?;

    let mut lines = compare_lines(&report, display);
    let ignored = ignored_lines(&data);
    if !lines.is_empty() && !ignored.is_empty() {
        lines.push(String::new());
    }
    lines.extend(ignored);

    print_lines(&lines)?;
    report_diagnostics(&diagnostics);
    Ok(())
}

fn timing_text(row: &CompareRow, suite: usize) -> String {
    match row.timings.get(suite).and_then(|t| t.timing) {
        Some(timing) => format_mean_stdev(timing.mean, timing.stdev),
        None => "<not enough data>".to_string(),
    }
}

fn change_text(change: &SpeedChange) -> String {
    format!("{} ({:+.0}%)", change.describe(), change.percent)
}

fn is_significant(change: &SpeedChange) -> bool {
    change.speed != Speed::Same
}

/// Render a comparison report.
pub fn compare_lines(report: &CompareReport, display: CompareDisplay) -> Vec<String> {
    if let Some(groups) = &report.groups {
        return grouped_lines(report, groups, display.verbose);
    }

    let mut lines = Vec::new();
    for row in &report.rows {
        let row_lines = match (&row.verdict, report.mode) {
            (Verdict::NotEnoughData, _) => {
                vec![format!("{}: not enough data to compare", row.name)]
            }
            (Verdict::Changes(changes), CompareMode::Baseline) => {
                if display.quiet && !changes.iter().any(is_significant) {
                    continue;
                }
                baseline_lines(report, row, changes)
            }
            (Verdict::Changes(changes), CompareMode::Ranked) => {
                match ranked_lines(report, row, changes, display) {
                    Some(lines) => lines,
                    None => continue,
                }
            }
        };
        if row_lines.len() > 1 && !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(row_lines);
    }
    lines
}

fn baseline_lines(
    report: &CompareReport,
    row: &CompareRow,
    changes: &[SpeedChange],
) -> Vec<String> {
    let reference = &report.labels[0];
    if let [change] = changes {
        return vec![format!(
            "{}: Mean +- std dev: [{}] {} -> [{}] {}: {}",
            row.name,
            reference,
            timing_text(row, 0),
            report.labels[change.changed],
            timing_text(row, change.changed),
            change_text(change)
        )];
    }

    let mut lines = vec![format!(
        "{}: Mean +- std dev: [{}] {}",
        row.name,
        reference,
        timing_text(row, 0)
    )];
    for change in changes {
        lines.push(format!(
            "  -> [{}] {}: {}",
            report.labels[change.changed],
            timing_text(row, change.changed),
            change_text(change)
        ));
    }
    lines
}

/// `None` when quiet and nothing differs significantly from the fastest.
fn ranked_lines(
    report: &CompareReport,
    row: &CompareRow,
    changes: &[SpeedChange],
    display: CompareDisplay,
) -> Option<Vec<String>> {
    let (&fastest, others) = row.ranking.split_first()?;
    let mean_of = |suite: usize| row.timings[suite].timing.map_or(f64::NAN, |t| t.mean);

    let relative: Vec<(usize, SpeedChange)> = others
        .iter()
        .map(|&suite| {
            let change = SpeedChange::between(
                fastest,
                suite,
                mean_of(fastest),
                mean_of(suite),
                report.min_speed,
            );
            (suite, change)
        })
        .collect();
    if display.quiet && !relative.iter().any(|(_, c)| is_significant(c)) {
        return None;
    }

    let mut lines = vec![format!(
        "{}: [{}] {} is the fastest",
        row.name,
        report.labels[fastest],
        timing_text(row, fastest)
    )];
    for (suite, change) in &relative {
        lines.push(format!(
            "  [{}] {}: {}",
            report.labels[*suite],
            timing_text(row, *suite),
            change_text(change)
        ));
    }
    if display.verbose {
        for change in changes {
            lines.push(format!(
                "  [{}] -> [{}]: {}",
                report.labels[change.reference],
                report.labels[change.changed],
                change_text(change)
            ));
        }
    }
    Some(lines)
}

fn grouped_lines(report: &CompareReport, groups: &SpeedGroups, verbose: bool) -> Vec<String> {
    let mut sections: Vec<Vec<String>> = Vec::new();

    let mut bucket = |title: &str, entries: &[GroupedChange]| {
        if entries.is_empty() {
            return;
        }
        let mut lines = vec![format!("{} ({}):", title, entries.len())];
        for entry in entries {
            let Some(row) = report.rows.iter().find(|r| r.name == entry.name) else {
                continue;
            };
            lines.push(format!(
                "- {}: {} -> {}: {}",
                entry.name,
                timing_text(row, entry.change.reference),
                timing_text(row, entry.change.changed),
                change_text(&entry.change)
            ));
        }
        sections.push(lines);
    };
    bucket("Faster", &groups.faster);
    bucket("Slower", &groups.slower);
    if verbose {
        bucket("Same speed", &groups.same);
    }

    if !verbose && !groups.same.is_empty() {
        let names: Vec<&str> = groups.same.iter().map(|e| e.name.as_str()).collect();
        sections.push(vec![format!(
            "Benchmark hidden because not significant ({}): {}",
            names.len(),
            names.join(", ")
        )]);
    }

    let missing: Vec<&str> = report
        .rows
        .iter()
        .filter(|r| r.verdict == Verdict::NotEnoughData)
        .map(|r| r.name.as_str())
        .collect();
    if !missing.is_empty() {
        sections.push(vec![format!(
            "Not enough data ({}): {}",
            missing.len(),
            missing.join(", ")
        )]);
    }

    sections.join(&String::new())
}

/// One line per suite listing the benchmarks left out of the comparison.
pub fn ignored_lines(data: &SuiteCollection) -> Vec<String> {
    data.group_by_name_ignored()
        .into_iter()
        .map(|ignored| {
            let names: Vec<&str> = ignored.benchmarks.iter().map(|b| b.display_name()).collect();
            format!(
                "Ignored benchmarks ({}) of {}: {}",
                names.len(),
                ignored.label,
                names.join(", ")
            )
        })
        .collect()
}
