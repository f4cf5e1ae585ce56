//! Descriptive statistics for score sets.

use std::fmt;

use serde::Serialize;

/// Descriptive statistics for one set of scores.
///
/// An empty input produces the sentinel summary: zero count, mean, median
/// and standard deviation, no mode, minimum positive infinity and maximum
/// 0. Those are placeholders signaling "no data", not computed statistics,
/// and report consumers rely on them verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: Option<f64>,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Count: {}", self.count)?;
        writeln!(f, "Mean: {:.2}", self.mean)?;
        writeln!(f, "Median: {:.2}", self.median)?;
        match self.mode {
            Some(mode) => writeln!(f, "Mode: {:.2}", mode)?,
            None => writeln!(f, "Mode: undefined")?,
        }
        writeln!(f, "Standard Deviation: {:.2}", self.stdev)?;
        writeln!(f, "Minimum: {}", self.min)?;
        write!(f, "Maximum: {}", self.max)
    }
}

/// Summarize `scores` with descriptive statistics.
pub fn summarize(scores: &[f64]) -> ScoreSummary {
    if scores.is_empty() {
        return ScoreSummary {
            count: 0,
            mean: 0.0,
            median: 0.0,
            mode: None,
            stdev: 0.0,
            min: f64::INFINITY,
            max: 0.0,
        };
    }

    let count = scores.len();
    let mean = scores.iter().sum::<f64>() / count as f64;

    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    ScoreSummary {
        count,
        mean,
        median,
        mode: unique_mode(&sorted),
        stdev: sample_stdev(scores),
        min: sorted[0],
        max: sorted[count - 1],
    }
}

/// Quantile `q` of `sorted` by linear interpolation between order
/// statistics. Empty input yields 0.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    if base + 1 < sorted.len() {
        sorted[base] + rest * (sorted[base + 1] - sorted[base])
    } else {
        sorted[base]
    }
}

/// Bessel-corrected sample standard deviation; 0 for fewer than 2 scores.
pub(crate) fn sample_stdev(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let ss: f64 = scores.iter().map(|s| (s - mean).powi(2)).sum();
    (ss / (scores.len() - 1) as f64).sqrt()
}

/// The single most frequent value of a sorted slice, or `None` when the
/// highest frequency is shared between values.
fn unique_mode(sorted: &[f64]) -> Option<f64> {
    let mut best = f64::NAN;
    let mut best_count = 0usize;
    let mut tied = false;

    let mut idx = 0;
    while idx < sorted.len() {
        let value = sorted[idx];
        let mut run = 1;
        while idx + run < sorted.len() && sorted[idx + run] == value {
            run += 1;
        }
        if run > best_count {
            best = value;
            best_count = run;
            tied = false;
        } else if run == best_count {
            tied = true;
        }
        idx += run;
    }

    if tied || best_count == 0 {
        None
    } else {
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_empty_summary_is_the_sentinel() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.median, 0.0);
        assert_eq!(summary.mode, None);
        assert_eq!(summary.stdev, 0.0);
        assert_eq!(summary.min, f64::INFINITY);
        assert_eq!(summary.max, 0.0);
    }

    #[rstest]
    fn test_single_score() {
        let summary = summarize(&[4.2]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, 4.2);
        assert_eq!(summary.median, 4.2);
        assert_eq!(summary.mode, Some(4.2));
        assert_eq!(summary.stdev, 0.0);
        assert_eq!(summary.min, 4.2);
        assert_eq!(summary.max, 4.2);
    }

    #[rstest]
    fn test_odd_and_even_medians() {
        assert_eq!(summarize(&[3.0, 1.0, 2.0]).median, 2.0);
        assert_eq!(summarize(&[4.0, 1.0, 2.0, 3.0]).median, 2.5);
    }

    #[rstest]
    fn test_mode_picks_the_unique_most_frequent() {
        let summary = summarize(&[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(summary.mode, Some(2.0));
    }

    #[rstest]
    fn test_mode_is_undefined_on_ties() {
        // two values at the top frequency
        assert_eq!(summarize(&[1.0, 1.0, 2.0, 2.0, 3.0]).mode, None);
        // all distinct is an n-way tie
        assert_eq!(summarize(&[1.0, 2.0, 3.0]).mode, None);
    }

    #[rstest]
    fn test_sample_stdev_uses_bessel_correction() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        // variance 32/7 under the n-1 formula
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((summary.stdev - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.25, 1.75)]
    #[case(0.5, 2.5)]
    #[case(0.75, 3.25)]
    #[case(1.0, 4.0)]
    fn test_quantile_interpolates(#[case] q: f64, #[case] expected: f64) {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&sorted, q) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn test_quantile_of_empty_is_zero() {
        assert_eq!(quantile(&[], 0.5), 0.0);
    }

    #[rstest]
    fn test_display_matches_report_format() {
        let summary = summarize(&[1.0, 2.0, 2.0, 3.5]);
        let expected = "\
Count: 4
Mean: 2.12
Median: 2.00
Mode: 2.00
Standard Deviation: 1.03
Minimum: 1
Maximum: 3.5";
        assert_eq!(summary.to_string(), expected);
    }

    #[rstest]
    fn test_display_of_empty_summary() {
        let summary = summarize(&[]);
        let expected = "\
Count: 0
Mean: 0.00
Median: 0.00
Mode: undefined
Standard Deviation: 0.00
Minimum: inf
Maximum: 0";
        assert_eq!(summary.to_string(), expected);
    }
}
