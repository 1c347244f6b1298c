use crate::error::{PlannerError, PlannerResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// One calendar day read from the uploaded calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub weekday: Weekday,
}

impl CalendarEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            weekday: date.weekday(),
        }
    }

    pub fn day_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

impl fmt::Display for CalendarEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.date.format("%Y-%m-%d"), self.day_name())
    }
}

/// The weekdays on which a subject is taught.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct TeachingWeek {
    days: HashSet<Weekday>,
}

impl TeachingWeek {
    pub const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn new<I>(days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Parse a comma separated list such as `Monday,wed, Fri`.
    pub fn parse_list(input: &str) -> PlannerResult<Self> {
        let mut days = HashSet::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            days.insert(parse_weekday(part)?);
        }
        Ok(Self { days })
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }

    pub fn is_teaching_day(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Selected days, Monday first.
    pub fn days(&self) -> Vec<Weekday> {
        Self::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| self.days.contains(day))
            .collect()
    }

    pub fn describe(&self) -> String {
        self.days()
            .into_iter()
            .map(weekday_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Vec<Weekday>> for TeachingWeek {
    fn from(days: Vec<Weekday>) -> Self {
        Self::new(days)
    }
}

impl From<TeachingWeek> for Vec<Weekday> {
    fn from(week: TeachingWeek) -> Self {
        week.days()
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Accepts full or three letter English names, any case.
pub fn parse_weekday(input: &str) -> PlannerResult<Weekday> {
    let lowered = input.trim().to_ascii_lowercase();
    TeachingWeek::ALL_WEEKDAYS
        .into_iter()
        .find(|day| {
            let full = weekday_name(*day).to_ascii_lowercase();
            lowered == full || (lowered.len() == 3 && full.starts_with(&lowered))
        })
        .ok_or_else(|| PlannerError::invalid(format!("unknown weekday '{}'", input.trim())))
}

pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse every raw calendar value. The first malformed row aborts the whole read.
pub fn parse_calendar_dates<S: AsRef<str>>(raw: &[S]) -> PlannerResult<Vec<NaiveDate>> {
    raw.iter()
        .enumerate()
        .map(|(row, value)| {
            parse_calendar_date(value.as_ref()).ok_or_else(|| PlannerError::Parse {
                row,
                value: value.as_ref().to_string(),
            })
        })
        .collect()
}

/// Keep the dates that fall on a selected weekday, ascending by date.
///
/// The sort is stable, so repeated dates keep their input order. An empty
/// selection yields an empty sequence.
pub fn filter_teaching_days(dates: &[NaiveDate], week: &TeachingWeek) -> Vec<CalendarEntry> {
    let mut entries: Vec<CalendarEntry> = dates
        .iter()
        .copied()
        .filter(|date| week.is_teaching_day(*date))
        .map(CalendarEntry::new)
        .collect();
    entries.sort_by_key(|entry| entry.date);
    tracing::debug!(
        input = dates.len(),
        retained = entries.len(),
        days = %week.describe(),
        "filtered calendar to teaching days"
    );
    entries
}
