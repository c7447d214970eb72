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

//! Parsing and formatting of run lists (`1-3,5`) and CPU lists (`0-3,6`).

use crate::error::{Result, SuiteError};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// CPU numbers at or above this bound are rejected.
const MAX_CPUS: u32 = 1 << 16;

/// Parse a comma separated list of numbers and inclusive ranges.
fn parse_ranges(text: &str) -> std::result::Result<Vec<RangeInclusive<u32>>, String> {
    let mut ranges = Vec::new();
    for part in text.trim().split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('-') {
            Some((first, last)) => {
                let first: u32 = first.trim().parse().map_err(|_| "invalid range".to_string())?;
                let last: u32 = last.trim().parse().map_err(|_| "invalid range".to_string())?;
                if first > last {
                    return Err(format!("invalid range {}-{}", first, last));
                }
                ranges.push(first..=last);
            }
            None => {
                let number = part.parse().map_err(|_| format!("invalid number '{}'", part))?;
                ranges.push(number..=number);
            }
        }
    }
    Ok(ranges)
}

/// A selection of runs, kept as 0-based index ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunList {
    ranges: Vec<RangeInclusive<usize>>,
}

impl RunList {
    pub fn contains(&self, index: usize) -> bool {
        self.ranges.iter().any(|range| range.contains(&index))
    }
}

impl FromIterator<usize> for RunList {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        RunList {
            ranges: iter.into_iter().map(|index| index..=index).collect(),
        }
    }
}

/// Parse a 1-based run list such as `1-3,5`.
///
/// ```
/// use perfsuite_core::ranges::parse_run_list;
///
/// let runs = parse_run_list("1-3,5").unwrap();
/// assert!(runs.contains(0) && runs.contains(2) && runs.contains(4));
/// assert!(!runs.contains(3));
/// ```
pub fn parse_run_list(text: &str) -> Result<RunList> {
    let ranges = parse_ranges(text)
        .map_err(|_| SuiteError::invalid_run_list(text, "invalid list of runs"))?;
    if ranges.is_empty() {
        return Err(SuiteError::invalid_run_list(text, "empty list of runs"));
    }
    if ranges.iter().any(|range| *range.start() < 1) {
        return Err(SuiteError::invalid_run_list(text, "number of runs starts at 1"));
    }
    Ok(RunList {
        ranges: ranges
            .into_iter()
            .map(|range| (*range.start() as usize - 1)..=(*range.end() as usize - 1))
            .collect(),
    })
}

/// Parse a CPU list such as the content of `isolated` or `isolcpus=`.
pub fn parse_cpu_list(text: &str) -> Option<BTreeSet<u32>> {
    let ranges = parse_ranges(text).ok()?;
    if ranges.iter().any(|range| *range.end() >= MAX_CPUS) {
        return None;
    }
    Some(ranges.into_iter().flatten().collect())
}

/// Format CPUs compactly, merging consecutive numbers into ranges.
pub fn format_cpu_list<'a>(cpus: impl IntoIterator<Item = &'a u32>) -> String {
    let sorted: BTreeSet<u32> = cpus.into_iter().copied().collect();
    let mut parts = Vec::new();
    let mut iter = sorted.into_iter().peekable();
    while let Some(first) = iter.next() {
        let mut last = first;
        while iter.peek() == Some(&(last + 1)) {
            last += 1;
            iter.next();
        }
        if first == last {
            parts.push(first.to_string());
        } else {
            parts.push(format!("{}-{}", first, last));
        }
    }
    parts.join(",")
}
