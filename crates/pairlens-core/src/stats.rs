//! Descriptive statistics and Pearson correlation over return vectors.

use serde::Serialize;

use crate::AnalysisError;

/// Summary of one return series: count, mean, sample std, min, quartiles, max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// # Errors
    ///
    /// [`AnalysisError::InsufficientData`] for fewer than two values, where the
    /// sample standard deviation is undefined.
    pub fn from_values(what: &str, values: &[f64]) -> Result<Self, AnalysisError> {
        if values.len() < 2 {
            return Err(AnalysisError::insufficient(
                format!("statistics of {what}"),
                2,
                values.len(),
            ));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Ok(Self {
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted[0],
            p25: percentile_sorted(&sorted, 0.25),
            p50: percentile_sorted(&sorted, 0.50),
            p75: percentile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; zero for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile `q` in `[0, 1]` of an ascending slice, interpolating linearly
/// between the two closest ranks.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let position = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let fraction = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}

/// Pearson correlation of two equally long vectors.
///
/// # Errors
///
/// [`AnalysisError::InsufficientData`] when the vectors differ in length,
/// fewer than two pairs exist, or either side has zero variance (the
/// coefficient is undefined).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, AnalysisError> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::insufficient(
            "correlation (unpaired values)",
            xs.len().max(ys.len()),
            xs.len().min(ys.len()),
        ));
    }
    let n = xs.len();
    if n < 2 {
        return Err(AnalysisError::insufficient("correlation", 2, n));
    }

    let mx = mean(xs);
    let my = mean(ys);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    for (side, values, spread) in [("first", xs, sxx), ("second", ys, syy)] {
        if is_constant(values) || spread == 0.0 {
            return Err(AnalysisError::insufficient(
                format!("correlation (zero variance in {side} series)"),
                2,
                n,
            ));
        }
    }

    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}
