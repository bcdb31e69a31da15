//! Small numeric helpers shared by the metric calculations.
//!
//! Missing values are skipped the way a column-wise mean or standard
//! deviation over a sparse table would skip them.

/// Division that returns NaN instead of ±inf when the denominator is zero.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Mean of the non-NaN values; NaN when there are none.
pub fn nan_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Sample (n - 1) standard deviation of the non-NaN values; NaN below two values.
pub fn nan_sample_std<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
