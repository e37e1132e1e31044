//! JSON API handlers.
//!
//! Every handler reloads the document through [`schedule_store::Schedule`];
//! nothing is cached between requests.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use schedule_core::{Error, LessonQuery, NewLesson};

use crate::api::{
    CurrentLessonResponse, LessonCreatedResponse, MessageResponse, ScheduleResponse,
    INVALID_REQUEST, LESSON_DELETED, LESSON_NOT_FOUND, SAVE_FAILED,
};
use crate::server::AppState;

// === Error Response ===

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(MessageResponse::failure(message))).into_response()
}

/// Maps a schedule error to a response.
///
/// Client mistakes get a 4xx with a specific message. Storage failures get a
/// 500 with a generic message; details stay in the logs.
pub(crate) fn schedule_error_response(err: &Error) -> Response {
    match err {
        Error::InvalidField { field, .. } => error_response(
            StatusCode::BAD_REQUEST,
            format!("Некорректное значение поля «{field}»"),
        ),
        Error::InvalidRequest { .. } => error_response(StatusCode::BAD_REQUEST, INVALID_REQUEST),
        Error::LessonNotFound { .. } => error_response(StatusCode::NOT_FOUND, LESSON_NOT_FOUND),
        Error::Io(_) | Error::Serialization(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
        },
    }
}

// === Health ===

pub(crate) async fn health() -> &'static str {
    "OK"
}

// === Schedule API ===

pub(crate) async fn list_lessons(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LessonQuery>,
) -> Json<ScheduleResponse> {
    tracing::debug!(?query, filtered = !query.is_empty(), "Schedule request");

    let listing = state.schedule.find(&query).await;
    Json(ScheduleResponse::from(listing))
}

pub(crate) async fn add_lesson(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected lesson payload");
            return error_response(StatusCode::BAD_REQUEST, INVALID_REQUEST);
        },
    };

    let new = match NewLesson::from_json(&payload) {
        Ok(new) => new,
        Err(e) => {
            tracing::debug!(error = %e, "Invalid lesson payload");
            return schedule_error_response(&e);
        },
    };

    match state.schedule.add_lesson(new).await {
        Ok(lesson) => Json(LessonCreatedResponse::new(lesson)).into_response(),
        Err(e) => schedule_error_response(&e),
    }
}

pub(crate) async fn delete_lesson(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    // Non-numeric ids can never match a lesson.
    let Ok(id) = raw_id.parse::<i64>() else {
        return error_response(StatusCode::NOT_FOUND, LESSON_NOT_FOUND);
    };

    match state.schedule.remove_lesson(id).await {
        Ok(_) => Json(MessageResponse::ok(LESSON_DELETED)).into_response(),
        Err(e) => {
            if e.is_not_found() {
                tracing::debug!(id, "Delete of unknown lesson");
            }
            schedule_error_response(&e)
        },
    }
}

pub(crate) async fn current_lesson(
    State(state): State<Arc<AppState>>,
) -> Json<CurrentLessonResponse> {
    let now = chrono::Local::now();
    let current = state.schedule.current_lesson(&now).await;
    Json(CurrentLessonResponse::from(current))
}
