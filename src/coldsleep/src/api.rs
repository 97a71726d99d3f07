use std::time::Duration;

use anyhow::{Context, bail};
use chrono::{DateTime, FixedOffset, NaiveDate};
use coldsleep_types::{activities::DailyActivity, sleep::SleepRecord, window::ObservationWindow};
use serde::{Deserialize, de::DeserializeOwned};

pub const API_BASE: &str = "https://api.ouraring.com";

const SLEEP_PATH: &str = "/v2/usercollection/sleep";
const WORKOUT_PATH: &str = "/v2/usercollection/workout";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Deserialize)]
struct OuraSleep {
    #[serde(alias = "summary_date")]
    day: NaiveDate,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    total_sleep_duration: Option<f64>,
    #[serde(default)]
    deep_sleep_duration: Option<f64>,
    #[serde(default, alias = "resting_heart_rate")]
    lowest_heart_rate: Option<f64>,
}

#[derive(Deserialize)]
struct OuraWorkout {
    day: NaiveDate,
    start_datetime: DateTime<FixedOffset>,
    end_datetime: DateTime<FixedOffset>,
    #[serde(default)]
    activity: Option<String>,
}

impl From<OuraSleep> for SleepRecord {
    fn from(value: OuraSleep) -> Self {
        // durations arrive in seconds
        SleepRecord {
            date: value.day,
            total_sleep_minutes: value.total_sleep_duration.unwrap_or_default() / 60.0,
            deep_sleep_minutes: value.deep_sleep_duration.map(|s| s / 60.0),
            resting_heart_rate: value.lowest_heart_rate,
        }
    }
}

impl From<OuraWorkout> for DailyActivity {
    fn from(value: OuraWorkout) -> Self {
        let duration = value.end_datetime - value.start_datetime;

        DailyActivity {
            date: value.day,
            // wall-clock time at the recorded offset
            start_time: value.start_datetime.time(),
            duration_minutes: duration.num_milliseconds() as f64 / 60_000.0,
            activity: value.activity,
        }
    }
}

/// Read-only client for the Oura v2 user collection endpoints,
/// authenticated with a personal access token.
pub struct OuraApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl OuraApiClient {
    pub fn new(token: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_base_url(token, API_BASE)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub async fn fetch_sleep(&self, window: ObservationWindow) -> anyhow::Result<Vec<SleepRecord>> {
        let periods: Vec<OuraSleep> = self.fetch_collection(SLEEP_PATH, window).await?;
        let total = periods.len();

        let records = periods
            .into_iter()
            .filter(|p| p.kind.as_deref() != Some("deleted"))
            .map(SleepRecord::from)
            .collect::<Vec<_>>();

        info!(
            "fetched {} sleep period(s) ({} skipped) for {} to {}",
            records.len(),
            total - records.len(),
            window.start,
            window.end
        );
        Ok(records)
    }

    pub async fn fetch_workouts(
        &self,
        window: ObservationWindow,
    ) -> anyhow::Result<Vec<DailyActivity>> {
        let workouts: Vec<OuraWorkout> = self.fetch_collection(WORKOUT_PATH, window).await?;
        info!(
            "fetched {} workout(s) for {} to {}",
            workouts.len(),
            window.start,
            window.end
        );

        Ok(workouts.into_iter().map(DailyActivity::from).collect())
    }

    async fn fetch_collection<T>(&self, path: &str, window: ObservationWindow) -> anyhow::Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut items = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("start_date", window.start.to_string()),
                ("end_date", window.end.to_string()),
            ];
            if let Some(token) = next_token.take() {
                query.push(("next_token", token));
            }

            let resp = self
                .client
                .get(&url)
                .query(&query)
                .bearer_auth(&self.token)
                .send()
                .await
                .with_context(|| format!("failed to reach Oura endpoint {path}"))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                bail!("Oura request {path} failed ({status}): {body}");
            }

            let page: Page<T> = resp
                .json()
                .await
                .with_context(|| format!("invalid response from {path}"))?;

            debug!("{}: page with {} record(s)", path, page.data.len());
            items.extend(page.data);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(items)
    }
}
