use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

use super::{missed_dto::MissedPickupRequest, missed_models::MissedPickup};

async fn load_report(state: &AppState, missed_id: &str) -> Result<MissedPickup> {
    state
        .missed_pickups
        .find_by_id(missed_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Missed pickup report not found".into()))
}

#[utoipa::path(
    get,
    path = "/api/missed",
    responses((status = 200, description = "All missed pickup reports", body = Vec<MissedPickup>)),
    tag = "missed",
    security(("bearer_auth" = []))
)]
pub async fn get_missed_pickups(State(state): State<AppState>) -> Result<Json<Vec<MissedPickup>>> {
    Ok(Json(state.missed_pickups.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/missed/{id}",
    params(("id" = String, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Missed pickup report", body = MissedPickup),
        (status = 404, description = "Report not found")
    ),
    tag = "missed",
    security(("bearer_auth" = []))
)]
pub async fn get_missed_pickup(
    State(state): State<AppState>,
    Path(missed_id): Path<String>,
) -> Result<Json<MissedPickup>> {
    Ok(Json(load_report(&state, &missed_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/missed/schedule/{schedule_id}",
    params(("schedule_id" = String, Path, description = "Schedule ID")),
    responses((status = 200, description = "Reports for the schedule", body = Vec<MissedPickup>)),
    tag = "missed",
    security(("bearer_auth" = []))
)]
pub async fn get_missed_by_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> Result<Json<Vec<MissedPickup>>> {
    Ok(Json(
        state.missed_pickups.find_by_field("scheduleId", schedule_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/missed/user/{user_id}",
    params(("user_id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Reports filed by the user", body = Vec<MissedPickup>)),
    tag = "missed",
    security(("bearer_auth" = []))
)]
pub async fn get_missed_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<MissedPickup>>> {
    Ok(Json(state.missed_pickups.find_by_field("userId", user_id).await?))
}

/// Report a missed pickup
#[utoipa::path(
    post,
    path = "/api/missed",
    request_body = MissedPickupRequest,
    responses(
        (status = 201, description = "Report filed", body = MissedPickup),
        (status = 400, description = "Validation error")
    ),
    tag = "missed",
    security(("bearer_auth" = []))
)]
pub async fn create_missed_pickup(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<MissedPickupRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let report = state
        .missed_pickups
        .create(MissedPickup {
            missed_id: String::new(),
            title: payload.title,
            description: payload.description,
            report_date_time: Some(payload.report_date_time.unwrap_or_else(Utc::now)),
            schedule_id: payload.schedule_id,
            user_id: auth.id,
        })
        .await?;

    tracing::info!("Missed pickup {} reported by {}", report.missed_id, report.user_id);
    Ok((StatusCode::CREATED, Json(report)))
}

#[utoipa::path(
    put,
    path = "/api/missed/{id}",
    params(("id" = String, Path, description = "Report ID")),
    request_body = MissedPickupRequest,
    responses(
        (status = 200, description = "Report updated", body = MissedPickup),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Report not found")
    ),
    tag = "missed",
    security(("bearer_auth" = []))
)]
pub async fn update_missed_pickup(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(missed_id): Path<String>,
    Json(payload): Json<MissedPickupRequest>,
) -> Result<Json<MissedPickup>> {
    payload.validate()?;

    let mut report = load_report(&state, &missed_id).await?;
    auth.ensure_owner(&report.user_id, "update this report")?;

    report.title = payload.title;
    report.description = payload.description;
    report.schedule_id = payload.schedule_id;
    if payload.report_date_time.is_some() {
        report.report_date_time = payload.report_date_time;
    }

    Ok(Json(state.missed_pickups.update(&missed_id, &report).await?))
}

#[utoipa::path(
    delete,
    path = "/api/missed/{id}",
    params(("id" = String, Path, description = "Report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Report not found")
    ),
    tag = "missed",
    security(("bearer_auth" = []))
)]
pub async fn delete_missed_pickup(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(missed_id): Path<String>,
) -> Result<StatusCode> {
    let report = load_report(&state, &missed_id).await?;
    auth.ensure_owner(&report.user_id, "delete this report")?;

    if !state.missed_pickups.delete(&missed_id).await? {
        return Err(AppError::NotFound("Missed pickup report not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
