use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::entities::tariff::{day_number, TariffWindow, TimeOfDay, MINUTES_PER_DAY};
use crate::error::{configuration_error, Error};

/// A minute of the week that no window, or more than one window, claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekMinute {
    pub day: u8,
    pub time: TimeOfDay,
}

/// Ordered tariff windows. On overlap the earlier window wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TariffTable {
    windows: Vec<TariffWindow>,
}

impl TariffTable {
    pub fn new(windows: Vec<TariffWindow>) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> &[TariffWindow] {
        &self.windows
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Returns the first window matching the wall-clock time of `date_time` in `zone`.
    pub fn find_tariff<Tz: TimeZone, Z: TimeZone>(
        &self,
        date_time: &DateTime<Tz>,
        zone: &Z,
    ) -> Result<&TariffWindow, Error> {
        let WeekMinute { day, time } = week_minute_of(date_time, zone);

        self.windows
            .iter()
            .find(|window| window.matches(day, time))
            .ok_or_else(|| {
                let err = configuration_error(format!(
                    "no tariff window covers day {} {}",
                    day, time
                ));
                tracing::error!(day, %time, "{}", err.message);
                err
            })
    }

    /// Every minute of the week not covered by any window.
    pub fn coverage_gaps(&self) -> Vec<WeekMinute> {
        self.scan_week(|matches| matches == 0)
    }

    /// Every minute of the week covered by more than one window.
    pub fn overlaps(&self) -> Vec<WeekMinute> {
        self.scan_week(|matches| matches > 1)
    }

    fn scan_week<F: Fn(usize) -> bool>(&self, predicate: F) -> Vec<WeekMinute> {
        let mut found = Vec::new();

        for day in 0..7u8 {
            for minute in 0..MINUTES_PER_DAY {
                // `minute` is always below MINUTES_PER_DAY
                let time = match TimeOfDay::from_minutes(minute) {
                    Some(time) => time,
                    None => continue,
                };

                let matches = self
                    .windows
                    .iter()
                    .filter(|window| window.matches(day, time))
                    .count();

                if predicate(matches) {
                    found.push(WeekMinute { day, time });
                }
            }
        }

        found
    }
}

/// Day and minute of the wall-clock time of `date_time` in `zone`.
pub fn week_minute_of<Tz: TimeZone, Z: TimeZone>(date_time: &DateTime<Tz>, zone: &Z) -> WeekMinute {
    let local = date_time.with_timezone(zone).naive_local();

    WeekMinute {
        day: day_number(&local),
        time: TimeOfDay::of(&local),
    }
}
