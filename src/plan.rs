use crate::distribution::DistributionStrategy;
use crate::lesson::{LessonRecord, LessonStatus};
use crate::pacing::Pacing;
use crate::store::ClassKey;
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of one curriculum build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub class_key: ClassKey,
    pub subject: String,
    pub grade: String,
    pub pacing: Pacing,
    pub strategy: DistributionStrategy,
    pub lessons: Vec<LessonRecord>,
}

impl LessonPlan {
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Topics in lesson order.
    pub fn topics(&self) -> Vec<&str> {
        self.lessons.iter().map(|l| l.topic.as_str()).collect()
    }

    pub fn dataframe(&self) -> PolarsResult<DataFrame> {
        lessons_dataframe(&self.lessons)
    }
}

/// Tabular view of a lesson sequence, one row per lesson.
pub fn lessons_dataframe(lessons: &[LessonRecord]) -> PolarsResult<DataFrame> {
    let index: Vec<u32> = (0..lessons.len() as u32).collect();
    let dates: Vec<i32> = lessons.iter().map(|l| date_to_i32(l.date)).collect();
    let days: Vec<&str> = lessons.iter().map(|l| l.day_name()).collect();
    let topics: Vec<&str> = lessons.iter().map(|l| l.topic.as_str()).collect();
    let activities: Vec<&str> = lessons.iter().map(|l| l.activity.as_str()).collect();
    let homework: Vec<&str> = lessons.iter().map(|l| l.homework.as_str()).collect();
    let notes: Vec<&str> = lessons.iter().map(|l| l.notes.as_str()).collect();
    let statuses: Vec<&str> = lessons.iter().map(|l| l.status.as_str()).collect();

    let columns: Vec<Column> = vec![
        Series::new(PlSmallStr::from_static("#"), index).into_column(),
        Series::new(PlSmallStr::from_static("Date"), dates)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("Day"), days).into_column(),
        Series::new(PlSmallStr::from_static("Topic"), topics).into_column(),
        Series::new(PlSmallStr::from_static("Activity"), activities).into_column(),
        Series::new(PlSmallStr::from_static("Homework"), homework).into_column(),
        Series::new(PlSmallStr::from_static("Notes"), notes).into_column(),
        Series::new(PlSmallStr::from_static("Status"), statuses).into_column(),
    ];
    DataFrame::new(columns)
}

/// Rebuild lesson records from a frame produced by [`lessons_dataframe`].
pub fn lessons_from_dataframe(df: &DataFrame) -> PolarsResult<Vec<LessonRecord>> {
    let dates = df.column("Date")?.date()?;
    let topics = df.column("Topic")?.str()?;
    let activities = df.column("Activity")?.str()?;
    let homework = df.column("Homework")?.str()?;
    let notes = df.column("Notes")?.str()?;
    let statuses = df.column("Status")?.str()?;

    let mut lessons = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let date = dates
            .get(row_idx)
            .map(date_from_i32)
            .ok_or_else(|| PolarsError::ComputeError("lesson row missing date".into()))?;
        let mut lesson = LessonRecord::new(date, topics.get(row_idx).unwrap_or(""));
        lesson.activity = activities.get(row_idx).unwrap_or("").to_string();
        lesson.homework = homework.get(row_idx).unwrap_or("").to_string();
        lesson.notes = notes.get(row_idx).unwrap_or("").to_string();
        lesson.status = statuses
            .get(row_idx)
            .unwrap_or("")
            .parse::<LessonStatus>()
            .map_err(|err| PolarsError::ComputeError(err.to_string().into()))?;
        lessons.push(lesson);
    }
    Ok(lessons)
}

fn date_to_i32(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

fn date_from_i32(days: i32) -> NaiveDate {
    unix_epoch() + Duration::days(days as i64)
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::default()
}
