use crate::bank::CurriculumBank;
use crate::calendar::{self, TeachingWeek};
use crate::config::{PlannerConfig, StoreBackend};
use crate::distribution::{self, DEFAULT_FALLBACK_LABEL, DistributionStrategy};
use crate::error::{PlannerError, PlannerResult};
use crate::lesson::{LessonRecord, LessonUpdate};
use crate::pacing::Pacing;
use crate::persistence::{JsonStatusStore, StatusStore};
use crate::plan::LessonPlan;
use crate::store::{ClassKey, CurriculumStatusStore, StatusSummary};
use chrono::NaiveDate;
use std::path::Path;

/// Where the topics for a build come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TopicSource {
    /// Look the topics up in the curriculum bank by subject and grade.
    #[default]
    Bank,
    /// Topics typed in by the teacher.
    Custom(Vec<String>),
}

/// Everything the teacher selects before building a curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurriculumRequest {
    pub subject: String,
    pub grade: String,
    pub pacing: Pacing,
    pub week: TeachingWeek,
    pub topics: TopicSource,
}

impl CurriculumRequest {
    pub fn class_key(&self) -> ClassKey {
        ClassKey::subject_grade(&self.subject, &self.grade)
    }

    /// Reject incomplete selections before anything is computed.
    pub fn validate(&self) -> PlannerResult<()> {
        let mut missing = Vec::new();
        if self.subject.trim().is_empty() {
            missing.push("subject");
        }
        if self.grade.trim().is_empty() {
            missing.push("grade");
        }
        if self.week.is_empty() {
            missing.push("teaching days");
        }
        if let TopicSource::Custom(topics) = &self.topics {
            if topics.iter().all(|t| t.trim().is_empty()) {
                missing.push("topics");
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PlannerError::invalid(format!(
                "please complete all required fields (missing: {})",
                missing.join(", ")
            )))
        }
    }
}

/// Split free text into topics: one per line or `;`, blanks dropped.
pub fn parse_topic_list(text: &str) -> Vec<String> {
    text.split(['\n', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Builds curricula and records lesson progress, saving after every change.
pub struct Planner {
    store: CurriculumStatusStore,
    backend: Box<dyn StatusStore + Send + Sync>,
    bank: CurriculumBank,
    fallback_label: String,
    strategy: DistributionStrategy,
}

impl Planner {
    /// Load the store from `backend`, starting empty when nothing was saved.
    pub fn open(backend: Box<dyn StatusStore + Send + Sync>) -> PlannerResult<Self> {
        let store = backend.load_or_default()?;
        tracing::info!(classes = store.len(), "opened status store");
        Ok(Self {
            store,
            backend,
            bank: CurriculumBank::builtin(),
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            strategy: DistributionStrategy::default(),
        })
    }

    pub fn with_json_store<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        Self::open(Box::new(JsonStatusStore::new(path)))
    }

    pub fn from_config(config: &PlannerConfig) -> PlannerResult<Self> {
        let backend: Box<dyn StatusStore + Send + Sync> = match config.store_backend {
            StoreBackend::Json => Box::new(JsonStatusStore::new(&config.store_path)),
            #[cfg(feature = "sqlite")]
            StoreBackend::Sqlite => Box::new(crate::persistence::sqlite::SqliteStatusStore::new(
                &config.store_path,
            )?),
            #[cfg(not(feature = "sqlite"))]
            StoreBackend::Sqlite => {
                return Err(PlannerError::invalid(
                    "sqlite store requested but the `sqlite` feature is disabled",
                ));
            }
        };
        let mut bank = CurriculumBank::builtin();
        if let Some(path) = &config.bank_path {
            bank.merge(CurriculumBank::from_json_file(path)?);
        }
        Ok(Self::open(backend)?
            .with_bank(bank)
            .with_fallback_label(config.fallback_label.clone())
            .with_strategy(config.strategy))
    }

    pub fn with_bank(mut self, bank: CurriculumBank) -> Self {
        self.bank = bank;
        self
    }

    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback_label = label.into();
        self
    }

    pub fn with_strategy(mut self, strategy: DistributionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn set_strategy(&mut self, strategy: DistributionStrategy) {
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> DistributionStrategy {
        self.strategy
    }

    pub fn fallback_label(&self) -> &str {
        &self.fallback_label
    }

    pub fn bank(&self) -> &CurriculumBank {
        &self.bank
    }

    pub fn store(&self) -> &CurriculumStatusStore {
        &self.store
    }

    pub fn lessons(&self, class_key: &str) -> PlannerResult<&[LessonRecord]> {
        self.store
            .lessons(class_key)
            .ok_or_else(|| PlannerError::UnknownClass(class_key.to_string()))
    }

    /// Build and store the curriculum for `request` over `calendar_dates`.
    ///
    /// Validation and bank lookups happen first; on failure the store is left
    /// exactly as it was.
    pub fn build(
        &mut self,
        request: &CurriculumRequest,
        calendar_dates: &[NaiveDate],
    ) -> PlannerResult<LessonPlan> {
        if let Err(err) = request.validate() {
            tracing::warn!(%err, "rejected curriculum request");
            return Err(err);
        }
        let topics: Vec<String> = match &request.topics {
            TopicSource::Bank => self
                .bank
                .lookup(&request.subject, &request.grade)
                .inspect_err(|err| tracing::warn!(%err, "curriculum lookup failed"))?
                .to_vec(),
            TopicSource::Custom(topics) => topics
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        };
        if self.strategy == DistributionStrategy::Stride && topics.is_empty() {
            return Err(PlannerError::invalid(
                "stride distribution needs at least one topic",
            ));
        }

        let teaching_days = calendar::filter_teaching_days(calendar_dates, &request.week);
        let lessons = distribution::distribute(
            &topics,
            request.pacing,
            &teaching_days,
            &self.fallback_label,
            self.strategy,
        )?;

        let plan = LessonPlan {
            class_key: request.class_key(),
            subject: request.subject.trim().to_string(),
            grade: request.grade.trim().to_string(),
            pacing: request.pacing,
            strategy: self.strategy,
            lessons,
        };
        let mut candidate = self.store.clone();
        candidate.set_lessons(plan.class_key.clone(), plan.lessons.clone());
        self.commit(candidate)?;
        tracing::info!(
            class = %plan.class_key,
            lessons = plan.len(),
            topics = topics.len(),
            "built curriculum"
        );
        Ok(plan)
    }

    /// Edit one lesson addressed by class key and position, then save.
    pub fn update_lesson(
        &mut self,
        class_key: &str,
        index: usize,
        update: &LessonUpdate,
    ) -> PlannerResult<LessonRecord> {
        let mut candidate = self.store.clone();
        let updated = candidate.update_lesson(class_key, index, update)?.clone();
        self.commit(candidate)?;
        tracing::debug!(class = class_key, index, status = %updated.status, "updated lesson");
        Ok(updated)
    }

    pub fn summary(&self, class_key: &str) -> PlannerResult<StatusSummary> {
        self.store.summary(class_key)
    }

    /// Save `candidate` and only then make it the in-memory store, so a failed
    /// write leaves the previous state in place.
    fn commit(&mut self, candidate: CurriculumStatusStore) -> PlannerResult<()> {
        if let Err(err) = self.backend.save_store(&candidate) {
            tracing::error!(%err, "could not save status store; change discarded");
            return Err(err.into());
        }
        self.store = candidate;
        Ok(())
    }
}
