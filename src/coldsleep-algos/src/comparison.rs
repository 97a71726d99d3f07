use std::fmt::Display;

use coldsleep_types::sleep::SleepMetric;
use serde::Serialize;

use crate::{
    PairedDay, PairedSeries,
    helpers::{format_hm::FormatHM, stats::mean},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupMetric {
    pub count: usize,
    pub mean: Option<f64>,
}

/// Mean sleep value on cold-bath days against the remaining paired days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SleepComparison {
    pub metric: SleepMetric,
    pub cold_bath: GroupMetric,
    pub other: GroupMetric,
}

impl GroupMetric {
    fn new(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: (!values.is_empty()).then(|| mean(values)),
        }
    }
}

impl SleepComparison {
    pub fn new(series: &PairedSeries) -> Self {
        let (cold_bath, other): (Vec<_>, Vec<_>) =
            series.days().iter().partition(|d| d.is_cold_bath);

        let values = |days: Vec<&PairedDay>| days.iter().map(|d| d.value).collect::<Vec<_>>();

        Self {
            metric: series.metric,
            cold_bath: GroupMetric::new(&values(cold_bath)),
            other: GroupMetric::new(&values(other)),
        }
    }

    /// Cold-bath mean minus the other days' mean.
    pub fn difference(&self) -> Option<f64> {
        Some(self.cold_bath.mean? - self.other.mean?)
    }

    fn format_value(&self, value: Option<f64>) -> String {
        match value {
            None => "n/a".to_string(),
            Some(v) if self.metric.is_duration() => v.format_hm(),
            Some(v) => format!("{:.1} bpm", v),
        }
    }
}

impl Display for SleepComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Cold-bath days: {} (mean {})\nOther days: {} (mean {})\nDifference: {}",
            self.cold_bath.count,
            self.format_value(self.cold_bath.mean),
            self.other.count,
            self.format_value(self.other.mean),
            self.format_value(self.difference()),
        ))
    }
}
