use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Cold-bath flag per observed date. A date is only present when the
/// source had at least one record for it.
pub type ColdBathDays = BTreeMap<NaiveDate, bool>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColdBathFlag {
    pub date: NaiveDate,
    pub is_cold_bath: bool,
}

impl From<(&NaiveDate, &bool)> for ColdBathFlag {
    fn from((date, is_cold_bath): (&NaiveDate, &bool)) -> Self {
        Self {
            date: *date,
            is_cold_bath: *is_cold_bath,
        }
    }
}

/// What to do with sleep dates that have no cold-bath flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MissingDays {
    /// Drop the date from the paired series.
    #[default]
    Exclude,
    /// Pair the date as a day without a cold bath.
    NoBath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_days_parses_kebab_case() {
        assert_eq!("exclude".parse::<MissingDays>().unwrap(), MissingDays::Exclude);
        assert_eq!("no-bath".parse::<MissingDays>().unwrap(), MissingDays::NoBath);
        assert!("nobath".parse::<MissingDays>().is_err());
        assert_eq!(MissingDays::NoBath.to_string(), "no-bath");
    }

    #[test]
    fn flag_from_map_entry() {
        let mut days = ColdBathDays::new();
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        days.insert(date, true);

        let flags: Vec<ColdBathFlag> = days.iter().map(ColdBathFlag::from).collect();
        assert_eq!(
            flags,
            vec![ColdBathFlag {
                date,
                is_cold_bath: true
            }]
        );
    }
}
