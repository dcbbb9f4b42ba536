use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

use super::{
    schedule_dto::ScheduleRequest,
    schedule_models::{Schedule, DEFAULT_STATUS},
};

async fn load_schedule(state: &AppState, schedule_id: &str) -> Result<Schedule> {
    state
        .schedules
        .find_by_id(schedule_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".into()))
}

/// List all pickup schedules
#[utoipa::path(
    get,
    path = "/api/schedule",
    responses((status = 200, description = "All schedules", body = Vec<Schedule>)),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn get_schedules(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>> {
    Ok(Json(state.schedules.find_all().await?))
}

/// List the caller's pickup schedules
#[utoipa::path(
    get,
    path = "/api/schedule/user",
    responses((status = 200, description = "Schedules owned by the caller", body = Vec<Schedule>)),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn get_user_schedules(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Schedule>>> {
    Ok(Json(state.schedules.find_by_field("userId", auth.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/schedule/{id}",
    params(("id" = String, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule", body = Schedule),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> Result<Json<Schedule>> {
    Ok(Json(load_schedule(&state, &schedule_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/schedule",
    request_body = ScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = Schedule),
        (status = 400, description = "Validation error")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ScheduleRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let schedule = state
        .schedules
        .create(Schedule {
            schedule_id: String::new(),
            title: payload.title,
            pickup_date: payload.pickup_date,
            pickup_time: payload.pickup_time,
            location_id: payload.location_id,
            status: payload.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            user_id: auth.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    put,
    path = "/api/schedule/{id}",
    params(("id" = String, Path, description = "Schedule ID")),
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Schedule updated", body = Schedule),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(schedule_id): Path<String>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<Schedule>> {
    payload.validate()?;

    let mut schedule = load_schedule(&state, &schedule_id).await?;
    auth.ensure_owner(&schedule.user_id, "update this schedule")?;

    schedule.title = payload.title;
    schedule.pickup_date = payload.pickup_date;
    schedule.pickup_time = payload.pickup_time;
    schedule.location_id = payload.location_id;
    if let Some(status) = payload.status {
        schedule.status = status;
    }

    Ok(Json(state.schedules.update(&schedule_id, &schedule).await?))
}

#[utoipa::path(
    delete,
    path = "/api/schedule/{id}",
    params(("id" = String, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "schedules",
    security(("bearer_auth" = []))
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(schedule_id): Path<String>,
) -> Result<StatusCode> {
    let schedule = load_schedule(&state, &schedule_id).await?;
    auth.ensure_owner(&schedule.user_id, "delete this schedule")?;

    state.schedules.delete(&schedule_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
