use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::entities::Money;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minute of the day, `00:00` through `23:59`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }

        Some(Self(hour * 60 + minute))
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }

        Some(Self(minutes))
    }

    pub fn of(date_time: &NaiveDateTime) -> Self {
        Self((date_time.hour() * 60 + date_time.minute()) as u16)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid time of day {:?}, expected HH:MM", s);

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }

        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;

        TimeOfDay::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// Day number used by tariff windows, 0 = Sunday through 6 = Saturday.
pub fn day_number(date_time: &NaiveDateTime) -> u8 {
    date_time.weekday().num_days_from_sunday() as u8
}

fn previous_day(day: u8) -> u8 {
    (day + 6) % 7
}

/// A day/time range with its rates.
///
/// Windows are half-open: `start_time` is inclusive and `end_time` exclusive. A window whose
/// start is later than its end wraps past midnight, and its `days_of_week` name the day on
/// which it starts, so a Friday 23:00-06:00 window still applies at 02:00 on Saturday. A
/// window whose start equals its end covers the whole day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffWindow {
    pub name: String,
    pub days_of_week: BTreeSet<u8>,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub base_fare: Money,
    /// Rate per configured distance unit (mile or kilometre).
    pub per_distance_unit: Money,
    /// Rate per minute.
    pub per_duration_unit: Money,
}

impl TariffWindow {
    pub fn wraps_midnight(&self) -> bool {
        self.start_time > self.end_time
    }

    pub fn matches(&self, day: u8, time: TimeOfDay) -> bool {
        let (start, end) = (self.start_time, self.end_time);

        if start == end {
            return self.days_of_week.contains(&day);
        }

        if self.wraps_midnight() {
            return (self.days_of_week.contains(&day) && time >= start)
                || (self.days_of_week.contains(&previous_day(day)) && time < end);
        }

        self.days_of_week.contains(&day) && start <= time && time < end
    }
}
