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

//! Human readable formatting of durations and counts.

use crate::stats;

const UNITS: [(&str, f64); 4] = [("sec", 1.0), ("ms", 1e-3), ("us", 1e-6), ("ns", 1e-9)];

/// Pick the unit and the number of decimals from a reference value.
fn scale_for(reference: f64) -> (&'static str, f64, usize) {
    let reference = reference.abs();
    let (unit, factor) = UNITS
        .iter()
        .copied()
        .find(|(_, factor)| reference >= *factor)
        .unwrap_or(UNITS[UNITS.len() - 1]);

    let scaled = reference / factor;
    let decimals = if scaled >= 100.0 {
        0
    } else if scaled >= 10.0 {
        1
    } else {
        2
    };
    (unit, factor, decimals)
}

/// Format a duration in seconds with three significant digits.
///
/// ```
/// use perfsuite_core::format::format_timedelta;
///
/// assert_eq!(format_timedelta(1e-3), "1.00 ms");
/// assert_eq!(format_timedelta(316e-4), "31.6 ms");
/// ```
pub fn format_timedelta(seconds: f64) -> String {
    let (unit, factor, decimals) = scale_for(seconds);
    format!("{:.*} {}", decimals, seconds / factor, unit)
}

/// Format several durations using the unit and precision of the first one.
pub fn format_timedeltas(values: &[f64]) -> Vec<String> {
    let Some(first) = values.first() else {
        return Vec::new();
    };
    let (unit, factor, decimals) = scale_for(*first);
    values
        .iter()
        .map(|v| format!("{:.*} {}", decimals, v / factor, unit))
        .collect()
}

/// Format `mean +- stdev`.
pub fn format_mean_stdev(mean: f64, stdev: f64) -> String {
    let parts = format_timedeltas(&[mean, stdev]);
    format!("{} +- {}", parts[0], parts[1])
}

/// Format a long duration: seconds below one minute, then minutes and hours.
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 60.0 {
        return format_timedelta(seconds);
    }

    let total = seconds.round() as u64;
    let (hours, rem) = (total / 3600, total % 3600);
    let (minutes, secs) = (rem / 60, rem % 60);
    if hours > 0 {
        format!("{} hour {} min {} sec", hours, minutes, secs)
    } else {
        format!("{} min {} sec", minutes, secs)
    }
}

/// Format a count followed by a unit, pluralised, with `10^k` shorthand for
/// large powers of ten.
pub fn format_number(n: u64, unit: &str) -> String {
    let plural = if n > 1 { "s" } else { "" };
    if n >= 10_000 {
        let mut k = 0u32;
        let mut rest = n;
        while rest % 10 == 0 {
            rest /= 10;
            k += 1;
        }
        if rest == 1 {
            return format!("10^{} {}{}", k, unit, plural);
        }
    }
    format!("{} {}{}", n, unit, plural)
}

/// Format the samples of one run: `mean +- stdev`, with min/max when verbose.
pub fn format_run_result(samples: &[f64], verbose: bool) -> String {
    let Some(mean) = stats::mean(samples) else {
        return "<no sample>".to_string();
    };
    let mut text = match stats::stdev(samples) {
        Some(stdev) => format_mean_stdev(mean, stdev),
        None => format_timedelta(mean),
    };
    if verbose {
        if let (Some(min), Some(max)) = (stats::min(samples), stats::max(samples)) {
            text.push_str(&format!(
                " (min: {}, max: {})",
                format_timedelta(min),
                format_timedelta(max)
            ));
        }
    }
    text
}
