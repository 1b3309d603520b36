use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use super::{AppState, pages};
use crate::domain::Countdown;

/// Body of `GET /api/events/{id}/countdown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownResponse {
    /// The event counted down to.
    pub event_id: i64,
    /// Its start time.
    pub target: DateTime<Utc>,
    /// State as of the request.
    pub countdown: Countdown,
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

/// The countdown to a published event, evaluated at request time.
#[instrument(skip(state))]
pub async fn countdown(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = pages::parse_id(&raw_id) else {
        return not_found("Event not found");
    };
    let Some(event) = state.catalog().fetch_published_event_by_id(id).await else {
        return not_found("Event not found");
    };
    let Some(target) = event.date else {
        return not_found("No start time has been announced");
    };

    Json(CountdownResponse {
        event_id: event.id,
        target,
        countdown: Countdown::at(target, state.now()),
    })
    .into_response()
}
