use crate::calendar::{self, CalendarEntry};
use crate::error::PlannerError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LessonStatus {
    #[default]
    Upcoming,
    Completed,
    Missed,
}

impl LessonStatus {
    pub const ALL: [LessonStatus; 3] = [
        LessonStatus::Upcoming,
        LessonStatus::Completed,
        LessonStatus::Missed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::Upcoming => "Upcoming",
            LessonStatus::Completed => "Completed",
            LessonStatus::Missed => "Missed",
        }
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonStatus {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().to_ascii_lowercase() == lowered)
            .ok_or_else(|| PlannerError::invalid(format!("unknown lesson status '{}'", s.trim())))
    }
}

/// A single scheduled lesson and the teacher's notes on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LessonRecord {
    pub date: NaiveDate,
    #[serde(rename = "Day", with = "weekday_name_serde")]
    pub weekday: Weekday,
    pub topic: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub homework: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: LessonStatus,
}

impl LessonRecord {
    pub fn new(date: NaiveDate, topic: impl Into<String>) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            topic: topic.into(),
            activity: String::new(),
            homework: String::new(),
            notes: String::new(),
            status: LessonStatus::Upcoming,
        }
    }

    pub fn for_entry(entry: &CalendarEntry, topic: impl Into<String>) -> Self {
        Self {
            weekday: entry.weekday,
            ..Self::new(entry.date, topic)
        }
    }

    pub fn day_name(&self) -> &'static str {
        calendar::weekday_name(self.weekday)
    }

    pub fn apply(&mut self, update: &LessonUpdate) {
        if let Some(activity) = &update.activity {
            self.activity = activity.clone();
        }
        if let Some(homework) = &update.homework {
            self.homework = homework.clone();
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// Fields a teacher may overwrite on an existing lesson. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LessonStatus>,
}

impl LessonUpdate {
    pub fn status(status: LessonStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.activity.is_none()
            && self.homework.is_none()
            && self.notes.is_none()
            && self.status.is_none()
    }
}

mod weekday_name_serde {
    use crate::calendar;
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(calendar::weekday_name(*weekday))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        calendar::parse_weekday(&raw).map_err(serde::de::Error::custom)
    }
}
