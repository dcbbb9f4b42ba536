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

use super::{
    feedback_dto::FeedbackRequest,
    feedback_models::{Feedback, FeedbackResponse, DEFAULT_STATUS},
};

async fn load_feedback(state: &AppState, id: &str) -> Result<Feedback> {
    state
        .feedback
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback not found".into()))
}

async fn to_response(state: &AppState, feedback: Feedback) -> Result<FeedbackResponse> {
    let email = state.user_service.email_of(&feedback.user_id).await?;
    Ok(FeedbackResponse::new(feedback, email))
}

/// List all feedback
#[utoipa::path(
    get,
    path = "/api/feedback",
    responses((status = 200, description = "All feedback", body = Vec<FeedbackResponse>)),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn get_all_feedback(State(state): State<AppState>) -> Result<Json<Vec<FeedbackResponse>>> {
    let mut responses = Vec::new();
    for feedback in state.feedback.find_all().await? {
        responses.push(to_response(&state, feedback).await?);
    }
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback", body = FeedbackResponse),
        (status = 404, description = "Feedback not found")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeedbackResponse>> {
    let feedback = load_feedback(&state, &id).await?;
    Ok(Json(to_response(&state, feedback).await?))
}

/// Submit feedback
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback submitted", body = FeedbackResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<FeedbackRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let now = Utc::now();
    let feedback = state
        .feedback
        .create(Feedback {
            id: String::new(),
            title: payload.title,
            description: payload.description,
            status: payload.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            created_at: Some(now),
            updated_at: Some(now),
            user_id: auth.id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse::new(feedback, Some(auth.email))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback ID")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback updated", body = FeedbackResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Feedback not found")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn update_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>> {
    payload.validate()?;

    let mut feedback = load_feedback(&state, &id).await?;
    auth.ensure_owner(&feedback.user_id, "update this feedback")?;

    feedback.title = payload.title;
    feedback.description = payload.description;
    if let Some(status) = payload.status {
        feedback.status = status;
    }
    feedback.updated_at = Some(Utc::now());

    let feedback = state.feedback.update(&id, &feedback).await?;
    Ok(Json(FeedbackResponse::new(feedback, Some(auth.email))))
}

#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback ID")),
    responses(
        (status = 204, description = "Feedback deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Feedback not found")
    ),
    tag = "feedback",
    security(("bearer_auth" = []))
)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let feedback = load_feedback(&state, &id).await?;
    auth.ensure_owner(&feedback.user_id, "delete this feedback")?;

    state.feedback.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
