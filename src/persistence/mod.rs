use crate::store::CurriculumStatusStore;
use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable home of the status store. Every save rewrites the whole store.
pub trait StatusStore {
    fn save_store(&self, store: &CurriculumStatusStore) -> PersistenceResult<()>;
    /// `None` when nothing has been saved yet.
    fn load_store(&self) -> PersistenceResult<Option<CurriculumStatusStore>>;

    fn load_or_default(&self) -> PersistenceResult<CurriculumStatusStore> {
        Ok(self.load_store()?.unwrap_or_default())
    }
}

/// Sanity checks applied before writing and after reading.
pub fn validate_store(store: &CurriculumStatusStore) -> PersistenceResult<()> {
    for (key, lessons) in store.iter() {
        if key.as_str().trim().is_empty() {
            return Err(PersistenceError::InvalidData(
                "class key must not be blank".into(),
            ));
        }
        if let Some(pair) = lessons.windows(2).find(|pair| pair[1].date < pair[0].date) {
            return Err(PersistenceError::InvalidData(format!(
                "lessons for '{key}' are out of date order ({} after {})",
                pair[1].date, pair[0].date
            )));
        }
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    ExportLayout, JsonStatusStore, load_calendar_from_csv, read_calendar_dates,
    save_lessons_to_csv, write_lessons_csv,
};
