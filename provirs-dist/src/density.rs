//! Gaussian kernel density estimation for score distributions.
//!
//! Curves are meant to be drawn over a count histogram of the same
//! scores, so estimation returns `None` for inputs no density can be fit
//! to (instead of an error), and [`DensityCurve::scale_to_counts`] lifts
//! the probability density onto the histogram's vertical scale.

use serde::Serialize;
use statrs::distribution::{Continuous, Normal};

use crate::summary::{quantile, sample_stdev};

/// Number of evaluation points used by [`estimate_density`].
pub const DEFAULT_DENSITY_POINTS: usize = 1000;

/// Spread below which a score set is treated as degenerate.
const MIN_RANGE: f64 = 1e-10;

/// Hard floor for the kernel bandwidth.
const MIN_BANDWIDTH: f64 = 0.01;

/// A smoothed density curve evaluated on an even grid.
#[derive(Debug, Clone, Serialize)]
pub struct DensityCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl DensityCurve {
    /// Rescale the curve so its peak matches the tallest histogram bar.
    ///
    /// Multiplies every density value by `max_count * bin_width / peak`.
    /// An empty curve, or one whose peak is 0, is left unscaled.
    pub fn scale_to_counts(&mut self, max_count: u64, bin_width: f64) {
        if self.y.is_empty() {
            return;
        }
        let peak = self.y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if peak == 0.0 {
            return;
        }
        let factor = max_count as f64 * bin_width / peak;
        for y in &mut self.y {
            *y *= factor;
        }
    }
}

/// Gaussian kernel density estimator with a normalized bandwidth factor.
///
/// The effective kernel bandwidth is `bw_factor` times the sample
/// standard deviation of the data, matching estimators that take their
/// bandwidth relative to the data spread.
pub struct GaussianKde {
    data: Vec<f64>,
    bandwidth: f64,
    kernel: Normal,
}

impl GaussianKde {
    /// Build an estimator over `data`, or `None` when the data or the
    /// factor cannot support one.
    pub fn new(data: Vec<f64>, bw_factor: f64) -> Option<GaussianKde> {
        if data.len() < 2 {
            return None;
        }
        let stdev = sample_stdev(&data);
        if !stdev.is_finite() || stdev == 0.0 {
            return None;
        }
        let bandwidth = bw_factor * stdev;
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return None;
        }
        let kernel = Normal::new(0.0, 1.0).ok()?;
        Some(GaussianKde {
            data,
            bandwidth,
            kernel,
        })
    }

    /// The effective kernel bandwidth.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density estimate at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let sum: f64 = self
            .data
            .iter()
            .map(|xi| self.kernel.pdf((x - xi) / self.bandwidth))
            .sum();
        sum / (self.data.len() as f64 * self.bandwidth)
    }
}

/// Silverman's rule-of-thumb bandwidth with an interquartile-range guard.
///
/// Expects sorted input. Returns the absolute bandwidth; dividing it by
/// the sample standard deviation gives the normalized factor
/// [`GaussianKde::new`] expects.
pub fn silverman_bandwidth(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    let stdev = sample_stdev(sorted);
    let iqr = quantile(sorted, 0.75) - quantile(sorted, 0.25);

    let scale = if iqr == 0.0 { stdev } else { stdev.min(iqr / 1.34) };
    let h = 0.9 * scale * n.powf(-0.2);

    if !h.is_finite() || h <= 0.0 {
        (stdev * 0.1).max(MIN_BANDWIDTH)
    } else {
        h.max(MIN_BANDWIDTH)
    }
}

/// Estimate a smoothed density for `scores` on the default grid.
///
/// Returns `None` for degenerate inputs: fewer than two scores, zero or
/// non-finite sample standard deviation, spread below 1e-10, or a
/// numerically failed evaluation. Degeneracy is an expected outcome for
/// small or constant subpopulations, not an error.
pub fn estimate_density(scores: &[f64]) -> Option<DensityCurve> {
    estimate_density_grid(scores, DEFAULT_DENSITY_POINTS)
}

/// [`estimate_density`] with an explicit grid size.
pub fn estimate_density_grid(scores: &[f64], num_points: usize) -> Option<DensityCurve> {
    if scores.len() < 2 || num_points < 2 {
        return None;
    }

    let stdev = sample_stdev(scores);
    if !stdev.is_finite() || stdev == 0.0 {
        return None;
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let range = max - min;
    if range < MIN_RANGE {
        return None;
    }

    let bandwidth = silverman_bandwidth(&sorted);
    let kde = GaussianKde::new(scores.to_vec(), bandwidth / stdev)?;

    // evaluate over the data span padded by 10% of the range on each side
    let lo = min - 0.1 * range;
    let hi = max + 0.1 * range;
    let step = (hi - lo) / (num_points - 1) as f64;

    let mut x = Vec::with_capacity(num_points);
    let mut y = Vec::with_capacity(num_points);
    for i in 0..num_points {
        let xi = lo + step * i as f64;
        let yi = kde.evaluate(xi);
        if !yi.is_finite() {
            return None;
        }
        x.push(xi);
        y.push(yi);
    }

    Some(DensityCurve { x, y })
}

/// Histogram counts over equal-width bins.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Bin edges; one more than the number of bins.
    pub edges: Vec<f64>,
    /// Occupancy of each bin.
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Width of one bin.
    pub fn bin_width(&self) -> f64 {
        if self.edges.len() < 2 {
            return 0.0;
        }
        self.edges[1] - self.edges[0]
    }

    /// Occupancy of the fullest bin.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Count `scores` into `bins` equal-width bins.
///
/// With no explicit `range` the data bounds are used; a zero-width data
/// range is widened by 0.5 on each side, and an empty input falls back
/// to [0, 1]. Bins are half-open except the last, which also takes
/// scores equal to the upper edge; scores outside the range are dropped.
pub fn bin_counts(scores: &[f64], bins: usize, range: Option<(f64, f64)>) -> Histogram {
    let bins = bins.max(1);

    let (lo, hi) = match range {
        Some((lo, hi)) => (lo, hi),
        None => {
            if scores.is_empty() {
                (0.0, 1.0)
            } else {
                let lo = scores.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if hi - lo == 0.0 { (lo - 0.5, hi + 0.5) } else { (lo, hi) }
            }
        }
    };

    let width = (hi - lo) / bins as f64;
    let mut edges = Vec::with_capacity(bins + 1);
    for i in 0..=bins {
        edges.push(lo + width * i as f64);
    }

    let mut counts = vec![0u64; bins];
    for &score in scores {
        if score < lo || score > hi {
            continue;
        }
        let mut idx = ((score - lo) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}
