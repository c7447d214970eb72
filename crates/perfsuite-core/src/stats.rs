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

//! Statistics over benchmark samples.
//!
//! All functions take samples in seconds and return `None` when the input
//! cannot produce a meaningful value (empty input, or fewer than two
//! samples for the standard deviation).

/// Arithmetic mean.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample standard deviation (Bessel's correction).
pub fn stdev(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let mean = mean(samples)?;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (samples.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Median of the samples.
pub fn median(samples: &[f64]) -> Option<f64> {
    percentile(samples, 50.0)
}

/// Percentile using linear interpolation between closest ranks.
///
/// `p` is clamped to `0.0..=100.0`.
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn min(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().min_by(|a, b| a.total_cmp(b))
}

pub fn max(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().max_by(|a, b| a.total_cmp(b))
}

/// Statistical summary of a benchmark's samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of samples.
    pub count: usize,
    pub mean: f64,
    /// Standard deviation, absent with a single sample.
    pub stdev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl Summary {
    /// Summarise samples; `None` when there are no samples at all.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        Some(Summary {
            count: samples.len(),
            mean: mean(samples)?,
            stdev: stdev(samples),
            min: min(samples)?,
            max: max(samples)?,
            median: median(samples)?,
            p5: percentile(samples, 5.0)?,
            p25: percentile(samples, 25.0)?,
            p75: percentile(samples, 75.0)?,
            p95: percentile(samples, 95.0)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 1.5, 2.0]), Some(1.5));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_stdev() {
        assert_eq!(stdev(&[1.0, 1.5, 2.0]), Some(0.5));
        assert_eq!(stdev(&[1.0]), None);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[test]
    fn test_percentile_bounds() {
        let samples = [5.0, 1.0, 3.0];
        assert_eq!(percentile(&samples, 0.0), Some(1.0));
        assert_eq!(percentile(&samples, 100.0), Some(5.0));
        assert_eq!(percentile(&samples, 250.0), Some(5.0));
    }

    #[test]
    fn test_summary() {
        let summary = Summary::from_samples(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.p25, 2.0);
        assert_eq!(summary.p75, 4.0);
        assert!(Summary::from_samples(&[]).is_none());
    }
}
