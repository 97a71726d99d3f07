use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single workout or session as reported by the wearable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: f64,
    /// Vendor label for the session ("cycling", "other", ...). Never used for classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

impl DailyActivity {
    pub fn new(date: NaiveDate, start_time: NaiveTime, duration_minutes: f64) -> Self {
        Self {
            date,
            start_time,
            duration_minutes,
            activity: None,
        }
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }
}
