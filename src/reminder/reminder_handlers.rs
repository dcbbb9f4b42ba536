use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{error::Result, middleware::AuthUser, state::AppState};

use super::{reminder_dto::ReminderRequest, reminder_models::Reminder};

/// List all reminders
#[utoipa::path(
    get,
    path = "/api/reminder",
    responses(
        (status = 200, description = "List of reminders", body = Vec<Reminder>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn get_reminders(State(state): State<AppState>) -> Result<Json<Vec<Reminder>>> {
    Ok(Json(state.reminder_service.list_reminders().await?))
}

/// List the caller's reminders
#[utoipa::path(
    get,
    path = "/api/reminder/user",
    responses(
        (status = 200, description = "Reminders owned by the caller", body = Vec<Reminder>)
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn get_user_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Reminder>>> {
    Ok(Json(state.reminder_service.list_for_user(&auth.id).await?))
}

/// Get a reminder by ID
#[utoipa::path(
    get,
    path = "/api/reminder/{id}",
    params(("id" = String, Path, description = "Reminder ID")),
    responses(
        (status = 200, description = "Reminder", body = Reminder),
        (status = 404, description = "Reminder not found")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn get_reminder(
    State(state): State<AppState>,
    Path(reminder_id): Path<String>,
) -> Result<Json<Reminder>> {
    Ok(Json(state.reminder_service.get_reminder(&reminder_id).await?))
}

/// Create a reminder owned by the caller
#[utoipa::path(
    post,
    path = "/api/reminder",
    request_body = ReminderRequest,
    responses(
        (status = 201, description = "Reminder created", body = Reminder),
        (status = 400, description = "Validation error")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn create_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ReminderRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let reminder = state.reminder_service.create_reminder(&auth, payload).await?;

    Ok((StatusCode::CREATED, Json(reminder)))
}

/// Update a reminder
#[utoipa::path(
    put,
    path = "/api/reminder/{id}",
    params(("id" = String, Path, description = "Reminder ID")),
    request_body = ReminderRequest,
    responses(
        (status = 200, description = "Reminder updated", body = Reminder),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Reminder not found")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn update_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(reminder_id): Path<String>,
    Json(payload): Json<ReminderRequest>,
) -> Result<Json<Reminder>> {
    payload.validate()?;

    let reminder = state
        .reminder_service
        .update_reminder(&auth, &reminder_id, payload)
        .await?;

    Ok(Json(reminder))
}

/// Delete a reminder
#[utoipa::path(
    delete,
    path = "/api/reminder/{id}",
    params(("id" = String, Path, description = "Reminder ID")),
    responses(
        (status = 204, description = "Reminder deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Reminder not found")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn delete_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(reminder_id): Path<String>,
) -> Result<StatusCode> {
    state
        .reminder_service
        .delete_reminder(&auth, &reminder_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
