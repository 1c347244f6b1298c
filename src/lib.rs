pub mod bank;
pub mod calendar;
pub mod config;
pub mod distribution;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod lesson;
pub mod pacing;
pub mod persistence;
pub mod plan;
pub mod planner;
pub mod store;

pub use bank::{BankEntry, CurriculumBank, grade_levels};
pub use calendar::{
    CalendarEntry, TeachingWeek, filter_teaching_days, parse_calendar_dates, parse_weekday,
    weekday_name,
};
pub use config::{PlannerConfig, StoreBackend};
pub use distribution::{
    DEFAULT_FALLBACK_LABEL, DistributionStrategy, distribute, stride_cursor_positions,
};
pub use error::{PlannerError, PlannerResult};
pub use lesson::{LessonRecord, LessonStatus, LessonUpdate};
pub use pacing::Pacing;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteStatusStore;
pub use persistence::{
    ExportLayout, JsonStatusStore, PersistenceError, StatusStore, load_calendar_from_csv,
    read_calendar_dates, save_lessons_to_csv, write_lessons_csv,
};
pub use plan::{LessonPlan, lessons_dataframe, lessons_from_dataframe};
pub use planner::{CurriculumRequest, Planner, TopicSource, parse_topic_list};
pub use store::{ClassKey, CurriculumStatusStore, StatusSummary};
