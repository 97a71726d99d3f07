use std::fmt::Display;

use chrono::NaiveDate;
use coldsleep_algos::{
    ColdBathClassifier, CorrelationError, PairedSeries, SleepComparison, correlate,
    flags_from_dates, helpers::stats::round_float,
};
use coldsleep_types::{
    activities::DailyActivity,
    cold_bath::{ColdBathDays, MissingDays},
    sleep::{SleepMetric, SleepRecord},
    window::ObservationWindow,
};
use serde::Serialize;

/// Where cold-bath days come from.
pub enum BathSource {
    /// Workout records, classified by the morning-session heuristic.
    Activities(Vec<DailyActivity>),
    /// An explicit log of cold-bath dates.
    Log(Vec<NaiveDate>),
}

#[derive(Clone, Copy, Debug)]
pub struct AnalysisOptions {
    pub window: ObservationWindow,
    pub metric: SleepMetric,
    /// `None` picks the policy that suits the bath source.
    pub missing: Option<MissingDays>,
    pub classifier: ColdBathClassifier,
}

impl AnalysisOptions {
    pub fn new(window: ObservationWindow) -> Self {
        Self {
            window,
            metric: SleepMetric::default(),
            missing: None,
            classifier: ColdBathClassifier::default(),
        }
    }
}

pub struct Analysis {
    pub window: ObservationWindow,
    pub series: PairedSeries,
    pub correlation: Result<f64, CorrelationError>,
    pub comparison: SleepComparison,
}

#[derive(Serialize)]
pub struct Report<'a> {
    pub metric: SleepMetric,
    pub window: ObservationWindow,
    pub pairs: usize,
    pub cold_bath_days: usize,
    pub excluded: usize,
    pub correlation: Option<f64>,
    pub undefined: Option<&'static str>,
    pub comparison: &'a SleepComparison,
}

impl BathSource {
    /// A log only names bath days, so every other sleep day counts as no bath.
    /// Classified workouts omit days without sessions, which stay out of the join.
    pub fn default_missing_days(&self) -> MissingDays {
        match self {
            BathSource::Activities(_) => MissingDays::Exclude,
            BathSource::Log(_) => MissingDays::NoBath,
        }
    }

    pub fn into_flags(self, options: &AnalysisOptions) -> ColdBathDays {
        let window = options.window;

        match self {
            BathSource::Activities(activities) => {
                let activities = activities
                    .into_iter()
                    .filter(|a| window.contains(a.date))
                    .collect::<Vec<_>>();
                let days = options.classifier.classify(&activities);
                info!(
                    "classified {} session(s) over {} day(s), {} cold-bath day(s)",
                    activities.len(),
                    days.len(),
                    days.values().filter(|flag| **flag).count()
                );
                days
            }
            BathSource::Log(dates) => {
                let days = flags_from_dates(dates.into_iter().filter(|d| window.contains(*d)));
                info!("{} logged cold-bath day(s) in window", days.len());
                days
            }
        }
    }
}

impl Analysis {
    pub fn run(sleep: Vec<SleepRecord>, baths: BathSource, options: &AnalysisOptions) -> Self {
        let window = options.window;
        let total = sleep.len();
        let sleep = sleep
            .into_iter()
            .filter(|s| window.contains(s.date))
            .collect::<Vec<_>>();
        if sleep.len() < total {
            debug!("dropped {} sleep record(s) outside the window", total - sleep.len());
        }

        let missing = options
            .missing
            .unwrap_or_else(|| baths.default_missing_days());
        debug!("pairing missing days with policy {}", missing);

        let flags = baths.into_flags(options);
        let series = PairedSeries::join(&sleep, &flags, options.metric, missing);
        if series.excluded > 0 {
            info!("{} sleep day(s) without a matching cold-bath flag or metric", series.excluded);
        }

        let correlation = correlate(&series.pairs());
        let comparison = SleepComparison::new(&series);

        Self {
            window,
            series,
            correlation,
            comparison,
        }
    }

    pub fn report(&self) -> Report<'_> {
        Report {
            metric: self.series.metric,
            window: self.window,
            pairs: self.series.len(),
            cold_bath_days: self.series.cold_bath_days(),
            excluded: self.series.excluded,
            correlation: self.correlation.ok(),
            undefined: self.correlation.err().map(|e| e.kind()),
            comparison: &self.comparison,
        }
    }
}

impl Display for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Window: {} to {} ({} paired day(s), {} cold-bath day(s))",
            self.window.start,
            self.window.end,
            self.series.len(),
            self.series.cold_bath_days()
        )?;

        let label = self.series.metric.label();
        match self.correlation {
            Ok(r) => writeln!(
                f,
                "Correlation between cold baths and {}: {:.2}",
                label,
                round_float(r)
            )?,
            Err(e) => writeln!(f, "Correlation between cold baths and {}: undefined ({})", label, e)?,
        }

        write!(f, "{}", self.comparison)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use coldsleep_algos::Series;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn options() -> AnalysisOptions {
        AnalysisOptions::new(ObservationWindow::new(date(1), date(30)))
    }

    fn sleep() -> Vec<SleepRecord> {
        vec![
            SleepRecord::new(date(1), 480.0),
            SleepRecord::new(date(2), 420.0),
            SleepRecord::new(date(3), 450.0),
            SleepRecord::new(date(4), 400.0),
        ]
    }

    fn session(day: u32, h: u32, minutes: f64) -> DailyActivity {
        DailyActivity::new(date(day), NaiveTime::from_hms_opt(h, 15, 0).unwrap(), minutes)
    }

    #[test]
    fn activities_are_classified_and_correlated() {
        let activities = vec![
            session(1, 18, 40.0),
            session(2, 7, 3.0),
            session(3, 12, 3.0),
            session(4, 6, 4.0),
        ];

        let analysis = Analysis::run(sleep(), BathSource::Activities(activities), &options());

        assert_eq!(analysis.series.len(), 4);
        assert_eq!(analysis.series.cold_bath_days(), 2);
        let r = analysis.correlation.unwrap();
        assert!((-1.0..0.0).contains(&r));
        assert!(analysis.to_string().contains("Correlation between cold baths and sleep duration: -0.91"));
    }

    #[test]
    fn log_with_exclude_policy_is_degenerate() {
        // every paired day is a logged bath day
        let mut options = options();
        options.missing = Some(MissingDays::Exclude);

        let analysis = Analysis::run(sleep(), BathSource::Log(vec![date(2), date(4)]), &options);

        assert_eq!(analysis.series.len(), 2);
        assert_eq!(
            analysis.correlation,
            Err(CorrelationError::DegenerateVariance {
                series: Series::ColdBath
            })
        );
        assert_eq!(analysis.report().undefined, Some("degenerate_variance"));
        assert_eq!(analysis.report().correlation, None);
    }

    #[test]
    fn log_with_no_bath_policy_matches_activities() {
        let mut options = options();
        options.missing = Some(MissingDays::NoBath);

        let analysis = Analysis::run(sleep(), BathSource::Log(vec![date(2), date(4)]), &options);

        assert_eq!(analysis.series.len(), 4);
        let r = analysis.correlation.unwrap();
        assert!((r - -0.9073).abs() < 1e-4);
    }

    #[test]
    fn log_defaults_to_no_bath_for_unlogged_days() {
        let sleep = (1..=10)
            .map(|day| SleepRecord::new(date(day), 400.0 + f64::from(day) * 7.0))
            .collect();

        let analysis = Analysis::run(
            sleep,
            BathSource::Log(vec![date(2), date(5), date(7)]),
            &options(),
        );

        assert_eq!(analysis.series.len(), 10);
        assert_eq!(analysis.series.cold_bath_days(), 3);
        assert_eq!(analysis.series.excluded, 0);
        assert!(analysis.correlation.is_ok());
    }

    #[test]
    fn activities_default_to_excluding_days_without_sessions() {
        let analysis = Analysis::run(
            sleep(),
            BathSource::Activities(vec![session(1, 18, 40.0), session(2, 7, 3.0)]),
            &options(),
        );

        assert_eq!(analysis.series.len(), 2);
        assert_eq!(analysis.series.excluded, 2);
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let mut options = options();
        options.window = ObservationWindow::new(date(2), date(3));

        let analysis = Analysis::run(
            sleep(),
            BathSource::Activities(vec![session(1, 7, 3.0), session(2, 7, 3.0), session(3, 20, 3.0)]),
            &options,
        );

        let dates: Vec<_> = analysis.series.days().iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2), date(3)]);
    }

    #[test]
    fn empty_input_is_insufficient() {
        let analysis = Analysis::run(Vec::new(), BathSource::Activities(Vec::new()), &options());

        assert_eq!(
            analysis.correlation,
            Err(CorrelationError::InsufficientData { count: 0 })
        );
        assert!(analysis.to_string().contains("undefined (insufficient data"));
    }

    #[test]
    fn report_serializes_to_json() {
        let activities = vec![session(1, 18, 40.0), session(2, 7, 3.0)];
        let analysis = Analysis::run(sleep(), BathSource::Activities(activities), &options());

        let json = serde_json::to_value(analysis.report()).unwrap();
        assert_eq!(json["metric"], "total-sleep");
        assert_eq!(json["pairs"], 2);
        assert_eq!(json["excluded"], 2);
        assert_eq!(json["correlation"], -1.0);
        assert!(json["undefined"].is_null());
        assert_eq!(json["window"]["start"], "2025-06-01");
        assert_eq!(json["comparison"]["cold_bath"]["count"], 1);
    }
}
