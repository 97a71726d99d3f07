use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub date: NaiveDate,
    pub total_sleep_minutes: f64,
    #[serde(default)]
    pub deep_sleep_minutes: Option<f64>,
    #[serde(default)]
    pub resting_heart_rate: Option<f64>,
}

/// Which sleep value gets correlated against cold baths.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SleepMetric {
    #[default]
    TotalSleep,
    DeepSleep,
    RestingHeartRate,
}

impl SleepMetric {
    pub fn label(&self) -> &'static str {
        match self {
            SleepMetric::TotalSleep => "sleep duration",
            SleepMetric::DeepSleep => "deep sleep duration",
            SleepMetric::RestingHeartRate => "resting heart rate",
        }
    }

    /// Metric is a duration in minutes rather than a rate.
    pub fn is_duration(&self) -> bool {
        !matches!(self, SleepMetric::RestingHeartRate)
    }
}

impl SleepRecord {
    pub fn new(date: NaiveDate, total_sleep_minutes: f64) -> Self {
        Self {
            date,
            total_sleep_minutes,
            deep_sleep_minutes: None,
            resting_heart_rate: None,
        }
    }

    pub fn with_deep_sleep(mut self, minutes: f64) -> Self {
        self.deep_sleep_minutes = Some(minutes);
        self
    }

    pub fn with_resting_heart_rate(mut self, bpm: f64) -> Self {
        self.resting_heart_rate = Some(bpm);
        self
    }

    pub fn value(&self, metric: SleepMetric) -> Option<f64> {
        match metric {
            SleepMetric::TotalSleep => Some(self.total_sleep_minutes),
            SleepMetric::DeepSleep => self.deep_sleep_minutes,
            SleepMetric::RestingHeartRate => self.resting_heart_rate,
        }
    }

    /// Combines two sleep periods recorded for the same date (e.g. a nap).
    /// Durations add up, resting heart rate keeps the lowest reading.
    pub fn merge(self, other: SleepRecord) -> SleepRecord {
        let add = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };

        SleepRecord {
            date: self.date,
            total_sleep_minutes: self.total_sleep_minutes + other.total_sleep_minutes,
            deep_sleep_minutes: add(self.deep_sleep_minutes, other.deep_sleep_minutes),
            resting_heart_rate: match (self.resting_heart_rate, other.resting_heart_rate) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }
}
