use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    state::AppState,
};

use super::history_models::{History, HistoryRequest};

#[utoipa::path(
    get,
    path = "/api/history",
    responses((status = 200, description = "Collection history", body = Vec<History>)),
    tag = "history",
    security(("bearer_auth" = []))
)]
pub async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<History>>> {
    Ok(Json(state.history.find_all().await?))
}

/// Record a completed collection for an existing schedule
#[utoipa::path(
    post,
    path = "/api/history",
    request_body = HistoryRequest,
    responses(
        (status = 201, description = "History entry created", body = History),
        (status = 400, description = "Validation error or unknown schedule")
    ),
    tag = "history",
    security(("bearer_auth" = []))
)]
pub async fn create_history(
    State(state): State<AppState>,
    Json(payload): Json<HistoryRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    if state.schedules.find_by_id(&payload.schedule_id).await?.is_none() {
        return Err(AppError::BadRequest(format!(
            "Unknown schedule: {}",
            payload.schedule_id
        )));
    }

    let entry = state
        .history
        .create(History {
            history_id: String::new(),
            collection_date: Some(payload.collection_date),
            notes: payload.notes,
            schedule_id: Some(payload.schedule_id),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}
