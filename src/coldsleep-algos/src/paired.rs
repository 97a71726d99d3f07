use std::collections::BTreeMap;

use chrono::NaiveDate;
use coldsleep_types::{
    cold_bath::{ColdBathDays, MissingDays},
    sleep::{SleepMetric, SleepRecord},
};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PairedDay {
    pub date: NaiveDate,
    pub value: f64,
    pub is_cold_bath: bool,
}

/// Sleep values joined with cold-bath flags by date, in date order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PairedSeries {
    pub metric: SleepMetric,
    days: Vec<PairedDay>,
    /// Sleep dates dropped because the metric or the flag was missing.
    pub excluded: usize,
}

impl PairedSeries {
    pub fn join(
        sleep: &[SleepRecord],
        flags: &ColdBathDays,
        metric: SleepMetric,
        missing: MissingDays,
    ) -> Self {
        let mut nights: BTreeMap<NaiveDate, SleepRecord> = BTreeMap::new();
        for record in sleep {
            match nights.remove(&record.date) {
                Some(night) => nights.insert(record.date, night.merge(record.clone())),
                None => nights.insert(record.date, record.clone()),
            };
        }

        let mut days = Vec::with_capacity(nights.len());
        let mut excluded = 0;

        for (date, night) in nights {
            let Some(value) = night.value(metric) else {
                excluded += 1;
                continue;
            };

            let is_cold_bath = match (flags.get(&date), missing) {
                (Some(flag), _) => *flag,
                (None, MissingDays::NoBath) => false,
                (None, MissingDays::Exclude) => {
                    excluded += 1;
                    continue;
                }
            };

            days.push(PairedDay {
                date,
                value,
                is_cold_bath,
            });
        }

        Self {
            metric,
            days,
            excluded,
        }
    }

    pub fn days(&self) -> &[PairedDay] {
        &self.days
    }

    /// `(sleep value, is cold bath)` in date order.
    pub fn pairs(&self) -> Vec<(f64, bool)> {
        self.days.iter().map(|d| (d.value, d.is_cold_bath)).collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn cold_bath_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_cold_bath).count()
    }
}
