use super::{PersistenceError, PersistenceResult, StatusStore};
use crate::calendar;
use crate::error::{PlannerError, PlannerResult};
use crate::lesson::LessonRecord;
use crate::store::CurriculumStatusStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const DATE_COLUMN: &str = "Date";

/// Status store kept as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStatusStore {
    path: PathBuf,
}

impl JsonStatusStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusStore for JsonStatusStore {
    fn save_store(&self, store: &CurriculumStatusStore) -> PersistenceResult<()> {
        super::validate_store(store)?;
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, store)?;
        tracing::info!(path = %self.path.display(), classes = store.len(), "saved status store");
        Ok(())
    }

    fn load_store(&self) -> PersistenceResult<Option<CurriculumStatusStore>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no status store on disk yet");
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let store: CurriculumStatusStore = serde_json::from_reader(file)?;
        super::validate_store(&store)?;
        Ok(Some(store))
    }
}

/// Read the `Date` column of an uploaded calendar.
pub fn read_calendar_dates<R: Read>(reader: R) -> PlannerResult<Vec<NaiveDate>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().map_err(PersistenceError::from)?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == DATE_COLUMN)
        .ok_or_else(|| PlannerError::invalid("calendar file has no 'Date' column"))?;

    let mut raw = Vec::new();
    for record in reader.records() {
        let record = record.map_err(PersistenceError::from)?;
        raw.push(record.get(date_idx).unwrap_or_default().to_string());
    }
    calendar::parse_calendar_dates(&raw)
}

pub fn load_calendar_from_csv<P: AsRef<Path>>(path: P) -> PlannerResult<Vec<NaiveDate>> {
    let file = File::open(path.as_ref()).map_err(PersistenceError::from)?;
    let dates = read_calendar_dates(file)?;
    tracing::info!(path = %path.as_ref().display(), rows = dates.len(), "loaded calendar");
    Ok(dates)
}

/// Column set of a lesson plan download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportLayout {
    /// `Date, Day, Subject, Topic`
    #[default]
    Summary,
    /// `Date, Day, Topic, Activity, Homework, Notes, Status`
    Full,
}

impl std::str::FromStr for ExportLayout {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(ExportLayout::Summary),
            "full" => Ok(ExportLayout::Full),
            other => Err(PlannerError::invalid(format!(
                "unknown export layout '{other}' (expected summary or full)"
            ))),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SummaryCsvRecord<'a> {
    date: String,
    day: &'a str,
    subject: &'a str,
    topic: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FullCsvRecord<'a> {
    date: String,
    day: &'a str,
    topic: &'a str,
    activity: &'a str,
    homework: &'a str,
    notes: &'a str,
    status: &'a str,
}

pub fn write_lessons_csv<W: Write>(
    writer: W,
    subject: &str,
    lessons: &[LessonRecord],
    layout: ExportLayout,
) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for lesson in lessons {
        let date = format_date(lesson.date);
        match layout {
            ExportLayout::Summary => writer.serialize(SummaryCsvRecord {
                date,
                day: lesson.day_name(),
                subject,
                topic: &lesson.topic,
            })?,
            ExportLayout::Full => writer.serialize(FullCsvRecord {
                date,
                day: lesson.day_name(),
                topic: &lesson.topic,
                activity: &lesson.activity,
                homework: &lesson.homework,
                notes: &lesson.notes,
                status: lesson.status.as_str(),
            })?,
        }
    }
    if lessons.is_empty() {
        writer.write_record(layout_headers(layout))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_lessons_to_csv<P: AsRef<Path>>(
    path: P,
    subject: &str,
    lessons: &[LessonRecord],
    layout: ExportLayout,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_lessons_csv(file, subject, lessons, layout)
}

fn layout_headers(layout: ExportLayout) -> &'static [&'static str] {
    match layout {
        ExportLayout::Summary => &["Date", "Day", "Subject", "Topic"],
        ExportLayout::Full => &[
            "Date", "Day", "Topic", "Activity", "Homework", "Notes", "Status",
        ],
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
