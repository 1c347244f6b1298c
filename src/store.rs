use crate::error::{PlannerError, PlannerResult};
use crate::lesson::{LessonRecord, LessonStatus, LessonUpdate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one stored lesson sequence: the subject, optionally with its grade.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassKey(String);

impl ClassKey {
    pub fn subject(subject: &str) -> Self {
        Self(subject.trim().to_string())
    }

    /// `"Biology - Grade 10"`
    pub fn subject_grade(subject: &str, grade: &str) -> Self {
        Self(format!("{} - {}", subject.trim(), grade.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ClassKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Progress counts for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub class_key: ClassKey,
    pub total: usize,
    pub upcoming: usize,
    pub completed: usize,
    pub missed: usize,
}

impl StatusSummary {
    /// Share of lessons marked completed, 0.0 when the class has no lessons.
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "lessons={}, completed={}, missed={}, upcoming={}, progress={:.0}%",
            self.total,
            self.completed,
            self.missed,
            self.upcoming,
            self.completion_ratio() * 100.0
        )
    }
}

/// Every class's lesson sequence, in the shape it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurriculumStatusStore {
    classes: BTreeMap<ClassKey, Vec<LessonRecord>>,
}

impl CurriculumStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was stored for `key`.
    pub fn set_lessons(&mut self, key: ClassKey, lessons: Vec<LessonRecord>) {
        self.classes.insert(key, lessons);
    }

    pub fn lessons(&self, key: &str) -> Option<&[LessonRecord]> {
        self.classes
            .get(&ClassKey::from(key))
            .map(Vec::as_slice)
    }

    pub fn class_keys(&self) -> impl Iterator<Item = &ClassKey> {
        self.classes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClassKey, &[LessonRecord])> {
        self.classes
            .iter()
            .map(|(key, lessons)| (key, lessons.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Overwrite the provided fields of lesson `index` in `key`.
    ///
    /// Any status may replace any other.
    pub fn update_lesson(
        &mut self,
        key: &str,
        index: usize,
        update: &LessonUpdate,
    ) -> PlannerResult<&LessonRecord> {
        let lessons = self
            .classes
            .get_mut(&ClassKey::from(key))
            .ok_or_else(|| PlannerError::UnknownClass(key.to_string()))?;
        let len = lessons.len();
        let lesson = lessons
            .get_mut(index)
            .ok_or_else(|| PlannerError::LessonIndexOutOfRange {
                class_key: key.to_string(),
                index,
                len,
            })?;
        lesson.apply(update);
        Ok(lesson)
    }

    pub fn summary(&self, key: &str) -> PlannerResult<StatusSummary> {
        let lessons = self
            .lessons(key)
            .ok_or_else(|| PlannerError::UnknownClass(key.to_string()))?;
        let count = |status: LessonStatus| lessons.iter().filter(|l| l.status == status).count();
        Ok(StatusSummary {
            class_key: ClassKey::from(key),
            total: lessons.len(),
            upcoming: count(LessonStatus::Upcoming),
            completed: count(LessonStatus::Completed),
            missed: count(LessonStatus::Missed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn class_keys_trim_their_parts() {
        assert_eq!(ClassKey::subject(" Biology ").as_str(), "Biology");
        assert_eq!(
            ClassKey::subject_grade("Biology ", " Grade 10").as_str(),
            "Biology - Grade 10"
        );
    }

    #[test]
    fn empty_class_has_zero_progress() {
        let mut store = CurriculumStatusStore::new();
        store.set_lessons(ClassKey::subject("Art"), Vec::new());
        let summary = store.summary("Art").unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completion_ratio(), 0.0);
    }

    #[test]
    fn update_leaves_unset_fields_alone() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let mut lesson = LessonRecord::new(date, "Poetry");
        lesson.notes = "keep me".into();
        let mut store = CurriculumStatusStore::new();
        store.set_lessons(ClassKey::subject("English"), vec![lesson]);

        let updated = store
            .update_lesson("English", 0, &LessonUpdate::status(LessonStatus::Missed))
            .unwrap();
        assert_eq!(updated.status, LessonStatus::Missed);
        assert_eq!(updated.notes, "keep me");
    }
}
