use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{delete, patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

#[derive(Deserialize)]
struct UpcomingQueryParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Serialize)]
struct AccessResponse {
    accessible: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses/{id}", delete(delete_course))
        .route("/courses/{id}/occurrences", get(list_occurrences))
        .route("/courses/{id}/schedule", post(generate_schedule))
        .route("/users/{id}/upcoming", get(list_upcoming))
        .route("/occurrences/{id}", patch(reschedule))
        .route("/occurrences/{id}/access", get(access))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> StatusCode {
    if state.service.slots().await.is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

async fn list_occurrences(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OccurrenceView>>, AppError> {
    let occurrences = state.service.list_occurrences(&id, Utc::now()).await?;
    Ok(Json(occurrences))
}

async fn generate_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Vec<LectureOccurrence>>), AppError> {
    let occurrences = state.service.generate_schedule(&id).await?;
    Ok((StatusCode::CREATED, Json(occurrences)))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.delete_course(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_upcoming(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UpcomingQueryParams>,
) -> Result<Json<Vec<OccurrenceView>>, AppError> {
    let occurrences = state.service.list_upcoming(&id, params.limit, Utc::now()).await?;
    Ok(Json(occurrences))
}

async fn access(State(state): State<AppState>, Path(id): Path<String>) -> Json<AccessResponse> {
    let accessible = state.service.is_accessible(&id, Utc::now()).await;
    Json(AccessResponse { accessible })
}

async fn reschedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<LectureOccurrence>, AppError> {
    let occurrence = state.service.reschedule(&id, req.date, &req.slot_id).await?;
    Ok(Json(occurrence))
}
