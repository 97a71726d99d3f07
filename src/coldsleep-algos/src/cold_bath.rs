use chrono::{NaiveDate, NaiveTime};
use coldsleep_types::{activities::DailyActivity, cold_bath::ColdBathDays};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ClassifierError {
    #[error("start window is empty: {earliest} is not before {latest}")]
    InvalidWindow {
        earliest: NaiveTime,
        latest: NaiveTime,
    },
    #[error("invalid duration bounds: {min} to {max} minutes")]
    InvalidDuration { min: f64, max: f64 },
}

/// Infers cold baths from workout records: a short session started in the
/// morning window. Start window is half-open `[earliest, latest)`, duration
/// bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColdBathClassifier {
    earliest: NaiveTime,
    latest: NaiveTime,
    min_minutes: f64,
    max_minutes: f64,
}

impl ColdBathClassifier {
    pub const EARLIEST_HOUR: u32 = 6;
    pub const LATEST_HOUR: u32 = 10;
    pub const MIN_MINUTES: f64 = 2.0;
    pub const MAX_MINUTES: f64 = 5.0;

    pub fn new(
        earliest: NaiveTime,
        latest: NaiveTime,
        min_minutes: f64,
        max_minutes: f64,
    ) -> Result<Self, ClassifierError> {
        if earliest >= latest {
            return Err(ClassifierError::InvalidWindow { earliest, latest });
        }

        if !min_minutes.is_finite()
            || !max_minutes.is_finite()
            || min_minutes < 0.0
            || min_minutes > max_minutes
        {
            return Err(ClassifierError::InvalidDuration {
                min: min_minutes,
                max: max_minutes,
            });
        }

        Ok(Self {
            earliest,
            latest,
            min_minutes,
            max_minutes,
        })
    }

    pub fn earliest(&self) -> NaiveTime {
        self.earliest
    }

    pub fn latest(&self) -> NaiveTime {
        self.latest
    }

    pub fn duration_bounds(&self) -> (f64, f64) {
        (self.min_minutes, self.max_minutes)
    }

    pub fn is_qualifying(&self, activity: &DailyActivity) -> bool {
        let start = activity.start_time;
        let duration = activity.duration_minutes;

        start >= self.earliest
            && start < self.latest
            && duration >= self.min_minutes
            && duration <= self.max_minutes
    }

    /// One flag per date that has any activity. Dates without records are
    /// left out rather than reported as `false`.
    pub fn classify(&self, activities: &[DailyActivity]) -> ColdBathDays {
        activities
            .iter()
            .fold(ColdBathDays::new(), |mut days, activity| {
                *days.entry(activity.date).or_insert(false) |= self.is_qualifying(activity);
                days
            })
    }
}

impl Default for ColdBathClassifier {
    fn default() -> Self {
        let hour = |h| NaiveTime::from_hms_opt(h, 0, 0).expect("Invalid time");

        Self {
            earliest: hour(Self::EARLIEST_HOUR),
            latest: hour(Self::LATEST_HOUR),
            min_minutes: Self::MIN_MINUTES,
            max_minutes: Self::MAX_MINUTES,
        }
    }
}

/// Classifies with the default morning window and duration bounds.
pub fn classify(activities: &[DailyActivity]) -> ColdBathDays {
    ColdBathClassifier::default().classify(activities)
}

/// Flags built from an explicit log of cold-bath dates.
pub fn flags_from_dates<I>(dates: I) -> ColdBathDays
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates.into_iter().map(|date| (date, true)).collect()
}
