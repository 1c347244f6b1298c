use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    BankEntry, CurriculumRequest, LessonPlan, LessonRecord, LessonUpdate, Pacing, Planner,
    PlannerError, StatusSummary, TeachingWeek, TopicSource, calendar,
};

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(RwLock::new(planner)),
        }
    }

    fn planner(&self) -> Arc<RwLock<Planner>> {
        self.planner.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl From<PlannerError> for ApiError {
    fn from(value: PlannerError) -> Self {
        let message = value.to_string();
        match value {
            PlannerError::Parse { .. } | PlannerError::InvalidInput(_) => {
                ApiError::Invalid(message)
            }
            PlannerError::LookupMiss { .. }
            | PlannerError::UnknownClass(_)
            | PlannerError::LessonIndexOutOfRange { .. } => ApiError::NotFound(message),
            PlannerError::Persistence(_) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Body of `POST /curricula`. Omitting `topics` uses the curriculum bank.
#[derive(Debug, Deserialize)]
pub struct BuildPayload {
    pub subject: String,
    pub grade: String,
    #[serde(default)]
    pub pacing: Pacing,
    pub days: Vec<String>,
    pub dates: Vec<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
}

impl BuildPayload {
    fn into_request(self) -> Result<(CurriculumRequest, Vec<String>), PlannerError> {
        let week = self
            .days
            .iter()
            .map(|day| calendar::parse_weekday(day))
            .collect::<Result<Vec<_>, _>>()?;
        let request = CurriculumRequest {
            subject: self.subject,
            grade: self.grade,
            pacing: self.pacing,
            week: TeachingWeek::new(week),
            topics: self.topics.map_or(TopicSource::Bank, TopicSource::Custom),
        };
        Ok((request, self.dates))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/bank", get(list_bank))
        .route("/curricula", post(build_curriculum))
        .route("/classes", get(list_classes))
        .route("/classes/:key/lessons", get(list_lessons))
        .route(
            "/classes/:key/lessons/:index",
            get(get_lesson).put(update_lesson),
        )
        .route("/classes/:key/summary", get(class_summary))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, planner: Planner) -> std::io::Result<()> {
    let state = AppState::new(planner);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_bank(State(state): State<AppState>) -> Json<Vec<BankEntry>> {
    let planner = state.planner();
    let entries = planner.read().bank().entries();
    Json(entries)
}

async fn build_curriculum(
    State(state): State<AppState>,
    Json(payload): Json<BuildPayload>,
) -> Result<(StatusCode, Json<LessonPlan>), ApiError> {
    let (request, raw_dates) = payload.into_request()?;
    let dates = calendar::parse_calendar_dates(&raw_dates)?;
    let planner = state.planner();
    let plan = {
        let mut guard = planner.write();
        guard.build(&request, &dates)?
    };
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<StatusSummary>>, ApiError> {
    let planner = state.planner();
    let guard = planner.read();
    let summaries = guard
        .store()
        .class_keys()
        .map(|key| guard.summary(key.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(summaries))
}

async fn list_lessons(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<LessonRecord>>, ApiError> {
    let planner = state.planner();
    let lessons = planner.read().lessons(&key)?.to_vec();
    Ok(Json(lessons))
}

async fn get_lesson(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, usize)>,
) -> Result<Json<LessonRecord>, ApiError> {
    let planner = state.planner();
    let guard = planner.read();
    let lessons = guard.lessons(&key)?;
    lessons
        .get(index)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            ApiError::from(PlannerError::LessonIndexOutOfRange {
                class_key: key.clone(),
                index,
                len: lessons.len(),
            })
        })
}

async fn update_lesson(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, usize)>,
    Json(update): Json<LessonUpdate>,
) -> Result<Json<LessonRecord>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::Invalid("update carries no fields".into()));
    }
    let planner = state.planner();
    let updated = {
        let mut guard = planner.write();
        guard.update_lesson(&key, index, &update)?
    };
    Ok(Json(updated))
}

async fn class_summary(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StatusSummary>, ApiError> {
    let planner = state.planner();
    let summary = planner.read().summary(&key)?;
    Ok(Json(summary))
}
