pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Divide-by-n variance around a precomputed mean.
pub fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64
    }
}

/// Divide-by-n covariance. Extra elements of the longer slice are ignored.
pub fn population_covariance(xs: &[f64], x_mean: f64, ys: &[f64], y_mean: f64) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0_f64;
    }

    xs.iter()
        .zip(ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum::<f64>()
        / n as f64
}

pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

pub fn round_float(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
