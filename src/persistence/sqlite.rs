use super::{PersistenceError, PersistenceResult, StatusStore};
use crate::lesson::LessonRecord;
use crate::store::{ClassKey, CurriculumStatusStore};
use rusqlite::{Connection, params};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

pub struct SqliteStatusStore {
    connection: Mutex<Connection>,
}

impl SqliteStatusStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS store_meta (
                id INTEGER PRIMARY KEY CHECK (id = 1)
            );
            CREATE TABLE IF NOT EXISTS classes (
                class_key TEXT PRIMARY KEY,
                position INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS lessons (
                class_key TEXT NOT NULL,
                position INTEGER NOT NULL,
                record_json TEXT NOT NULL,
                PRIMARY KEY (class_key, position)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection lock poisoned".into()))
    }
}

impl StatusStore for SqliteStatusStore {
    fn save_store(&self, store: &CurriculumStatusStore) -> PersistenceResult<()> {
        super::validate_store(store)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM lessons", [])?;
        tx.execute("DELETE FROM classes", [])?;
        tx.execute("DELETE FROM store_meta", [])?;
        tx.execute("INSERT INTO store_meta (id) VALUES (1)", [])?;
        {
            let mut class_stmt =
                tx.prepare("INSERT INTO classes (class_key, position) VALUES (?1, ?2)")?;
            let mut lesson_stmt = tx.prepare(
                "INSERT INTO lessons (class_key, position, record_json) VALUES (?1, ?2, ?3)",
            )?;
            for (class_position, (key, lessons)) in store.iter().enumerate() {
                class_stmt.execute(params![key.as_str(), class_position as i64])?;
                for (position, lesson) in lessons.iter().enumerate() {
                    let json = serde_json::to_string(lesson)?;
                    lesson_stmt.execute(params![key.as_str(), position as i64, json])?;
                }
            }
        }
        tx.commit()?;
        tracing::info!(classes = store.len(), "saved status store to sqlite");
        Ok(())
    }

    fn load_store(&self) -> PersistenceResult<Option<CurriculumStatusStore>> {
        let conn = self.lock()?;

        let saved: i64 = conn.query_row("SELECT COUNT(*) FROM store_meta", [], |row| row.get(0))?;
        if saved == 0 {
            return Ok(None);
        }

        // every saved class has a row in `classes`, including classes with no lessons
        let mut grouped: BTreeMap<String, Vec<LessonRecord>> = BTreeMap::new();
        let mut class_stmt = conn.prepare("SELECT class_key FROM classes ORDER BY position ASC")?;
        for key in class_stmt.query_map([], |row| row.get::<_, String>(0))? {
            grouped.insert(key?, Vec::new());
        }

        let mut lesson_stmt = conn.prepare(
            "SELECT class_key, record_json FROM lessons ORDER BY class_key ASC, position ASC",
        )?;
        let rows = lesson_stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, json) = row?;
            let lesson: LessonRecord = serde_json::from_str(&json)?;
            grouped
                .get_mut(&key)
                .ok_or_else(|| {
                    PersistenceError::InvalidData(format!(
                        "lesson row references unknown class '{key}'"
                    ))
                })?
                .push(lesson);
        }

        let mut store = CurriculumStatusStore::new();
        for (key, lessons) in grouped {
            store.set_lessons(ClassKey::from(key), lessons);
        }
        super::validate_store(&store)?;
        Ok(Some(store))
    }
}
