use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, NaiveTime};
use coldsleep_types::{activities::DailyActivity, sleep::SleepRecord};
use serde::{Deserialize, de::DeserializeOwned};

/// `date,start_time,duration_minutes[,activity]`
#[derive(Deserialize)]
struct ActivityRow {
    date: NaiveDate,
    start_time: String,
    duration_minutes: f64,
    #[serde(default)]
    activity: Option<String>,
}

/// Only the `date` column is read, anything else is ignored.
#[derive(Deserialize)]
struct ColdBathRow {
    date: NaiveDate,
}

/// Accepts `HH:MM` as well as `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| anyhow!("invalid time of day `{s}`, expected HH:MM or HH:MM:SS"))
}

pub fn load_activities(path: &Path) -> Result<Vec<DailyActivity>> {
    read_rows::<ActivityRow>(path)?
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let context = || format!("{}: row {}", path.display(), i + 1);
            let start_time = parse_time(&row.start_time).with_context(context)?;
            let duration_minutes =
                ensure_finite(row.duration_minutes, "duration_minutes").with_context(context)?;

            Ok(DailyActivity {
                date: row.date,
                start_time,
                duration_minutes,
                activity: row.activity.filter(|a| !a.is_empty()),
            })
        })
        .collect()
}

pub fn load_cold_bath_dates(path: &Path) -> Result<Vec<NaiveDate>> {
    Ok(read_rows::<ColdBathRow>(path)?
        .into_iter()
        .map(|row| row.date)
        .collect())
}

/// `date,total_sleep_minutes[,deep_sleep_minutes,resting_heart_rate]`
pub fn load_sleep(path: &Path) -> Result<Vec<SleepRecord>> {
    let rows = read_rows::<SleepRecord>(path)?;

    for (i, row) in rows.iter().enumerate() {
        let context = || format!("{}: row {}", path.display(), i + 1);
        ensure_finite(row.total_sleep_minutes, "total_sleep_minutes").with_context(context)?;
        if let Some(deep) = row.deep_sleep_minutes {
            ensure_finite(deep, "deep_sleep_minutes").with_context(context)?;
        }
        if let Some(rhr) = row.resting_heart_rate {
            ensure_finite(rhr, "resting_heart_rate").with_context(context)?;
        }
    }

    Ok(rows)
}

/// `NaN` and `inf` parse as floats but would poison every mean and correlation.
fn ensure_finite(value: f64, column: &str) -> Result<f64> {
    if !value.is_finite() {
        bail!("`{column}` must be a finite number, got {value}");
    }
    Ok(value)
}

fn read_rows<T>(path: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let rows = reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("{}: row {}", path.display(), i + 1)))
        .collect::<Result<Vec<T>>>()?;

    debug!("loaded {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}
