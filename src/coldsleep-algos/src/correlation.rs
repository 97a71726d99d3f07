use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::helpers::stats::{is_constant, mean, population_covariance, population_variance};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    Sleep,
    ColdBath,
}

impl Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Series::Sleep => f.write_str("sleep"),
            Series::ColdBath => f.write_str("cold bath"),
        }
    }
}

/// Cases where the coefficient is undefined.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("insufficient data: {count} paired day(s), at least 2 required")]
    InsufficientData { count: usize },
    #[error("degenerate variance: {series} series is constant")]
    DegenerateVariance { series: Series },
}

impl CorrelationError {
    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            CorrelationError::InsufficientData { .. } => "insufficient_data",
            CorrelationError::DegenerateVariance { .. } => "degenerate_variance",
        }
    }
}

/// Population Pearson correlation between a sleep value and a cold-bath
/// indicator (`true` = 1, `false` = 0). The result is not rounded.
pub fn correlate(paired: &[(f64, bool)]) -> Result<f64, CorrelationError> {
    if paired.len() < 2 {
        return Err(CorrelationError::InsufficientData {
            count: paired.len(),
        });
    }

    let (sleep, baths): (Vec<f64>, Vec<f64>) = paired
        .iter()
        .map(|&(value, is_cold_bath)| (value, if is_cold_bath { 1.0 } else { 0.0 }))
        .unzip();

    // Exact check on the raw values, a float variance of a constant series
    // is not always exactly zero.
    if is_constant(&sleep) {
        return Err(CorrelationError::DegenerateVariance {
            series: Series::Sleep,
        });
    }
    if is_constant(&baths) {
        return Err(CorrelationError::DegenerateVariance {
            series: Series::ColdBath,
        });
    }

    let sleep_mean = mean(&sleep);
    let bath_mean = mean(&baths);

    let sleep_std = population_variance(&sleep, sleep_mean).sqrt();
    let bath_std = population_variance(&baths, bath_mean).sqrt();
    let covariance = population_covariance(&sleep, sleep_mean, &baths, bath_mean);

    Ok((covariance / (sleep_std * bath_std)).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    const EPSILON: f64 = 1e-12;

    fn pairs(values: &[(f64, u8)]) -> Vec<(f64, bool)> {
        values.iter().map(|&(v, b)| (v, b == 1)).collect()
    }

    #[test]
    fn shorter_sleep_on_bath_days_is_negative() {
        let paired = pairs(&[(480.0, 0), (420.0, 1), (450.0, 0), (400.0, 1)]);
        let r = correlate(&paired).unwrap();

        assert!((-1.0..0.0).contains(&r), "expected negative r, got {}", r);
        // cov = -13.75, std sleep = sqrt(918.75), std baths = 0.5
        let expected = -13.75 / (918.75_f64.sqrt() * 0.5);
        assert!((r - expected).abs() < EPSILON);
    }

    #[test]
    fn longer_sleep_on_bath_days_is_positive() {
        let paired = pairs(&[(400.0, 0), (470.0, 1), (410.0, 0), (465.0, 1), (430.0, 0)]);
        let r = correlate(&paired).unwrap();
        assert!(r > 0.0 && r <= 1.0);
    }

    #[test]
    fn perfect_split_reaches_one() {
        let paired = pairs(&[(400.0, 0), (500.0, 1), (400.0, 0), (500.0, 1)]);
        let r = correlate(&paired).unwrap();
        assert!((r - 1.0).abs() < EPSILON);
    }

    #[test]
    fn single_pair_is_insufficient() {
        assert_eq!(
            correlate(&pairs(&[(480.0, 1)])),
            Err(CorrelationError::InsufficientData { count: 1 })
        );
    }

    #[test]
    fn empty_is_insufficient() {
        assert_eq!(
            correlate(&[]),
            Err(CorrelationError::InsufficientData { count: 0 })
        );
    }

    #[test]
    fn constant_indicator_is_degenerate() {
        assert_eq!(
            correlate(&pairs(&[(480.0, 0), (420.0, 0), (450.0, 0)])),
            Err(CorrelationError::DegenerateVariance {
                series: Series::ColdBath
            })
        );
        assert_eq!(
            correlate(&pairs(&[(480.0, 1), (420.0, 1)])),
            Err(CorrelationError::DegenerateVariance {
                series: Series::ColdBath
            })
        );
    }

    #[test]
    fn constant_sleep_is_degenerate() {
        assert_eq!(
            correlate(&pairs(&[(0.1, 0), (0.1, 1), (0.1, 0)])),
            Err(CorrelationError::DegenerateVariance {
                series: Series::Sleep
            })
        );
    }

    #[test]
    fn reversed_rows_give_same_coefficient() {
        let paired = pairs(&[(480.0, 0), (420.0, 1), (450.0, 0), (400.0, 1), (455.0, 1)]);
        let mut reversed = paired.clone();
        reversed.reverse();

        let r = correlate(&paired).unwrap();
        let r_rev = correlate(&reversed).unwrap();
        assert!((r - r_rev).abs() < EPSILON);
    }

    #[test]
    fn random_series_stay_in_range_and_order_independent() {
        let mut rng = rand::rng();

        for _ in 0..200 {
            let len = rng.random_range(2..=30);
            let mut paired: Vec<(f64, bool)> = (0..len)
                .map(|_| (rng.random_range(240.0..600.0), rng.random_bool(0.4)))
                .collect();
            // keep both series non-constant
            paired[0].1 = true;
            paired[1].1 = false;
            paired[0].0 = 300.0;
            paired[1].0 = 500.0;

            let r = correlate(&paired).unwrap();
            assert!((-1.0..=1.0).contains(&r), "r out of range: {}", r);

            paired.reverse();
            let r_rev = correlate(&paired).unwrap();
            assert!((r - r_rev).abs() < 1e-9, "{} vs {}", r, r_rev);
        }
    }

    #[test]
    fn error_kinds_and_messages() {
        let insufficient = CorrelationError::InsufficientData { count: 1 };
        assert_eq!(insufficient.kind(), "insufficient_data");
        assert_eq!(
            insufficient.to_string(),
            "insufficient data: 1 paired day(s), at least 2 required"
        );

        let degenerate = CorrelationError::DegenerateVariance {
            series: Series::ColdBath,
        };
        assert_eq!(degenerate.kind(), "degenerate_variance");
        assert_eq!(
            degenerate.to_string(),
            "degenerate variance: cold bath series is constant"
        );
    }
}
