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
    tip_dto::TipRequest,
    tip_models::{Tip, TipResponse},
};

const PUBLISHED: &str = "PUBLISHED";

async fn load_tip(state: &AppState, id: &str) -> Result<Tip> {
    state
        .tips
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tip not found".into()))
}

#[utoipa::path(
    get,
    path = "/api/tip",
    responses((status = 200, description = "All tips", body = Vec<TipResponse>)),
    tag = "tips",
    security(("bearer_auth" = []))
)]
pub async fn get_tips(State(state): State<AppState>) -> Result<Json<Vec<TipResponse>>> {
    let mut responses = Vec::new();
    for tip in state.tips.find_all().await? {
        let email = state.user_service.email_of(&tip.user_id).await?;
        responses.push(TipResponse::new(tip, email));
    }
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/tip/{id}",
    params(("id" = String, Path, description = "Tip ID")),
    responses(
        (status = 200, description = "Tip", body = TipResponse),
        (status = 404, description = "Tip not found")
    ),
    tag = "tips",
    security(("bearer_auth" = []))
)]
pub async fn get_tip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TipResponse>> {
    let tip = load_tip(&state, &id).await?;
    let email = state.user_service.email_of(&tip.user_id).await?;
    Ok(Json(TipResponse::new(tip, email)))
}

#[utoipa::path(
    post,
    path = "/api/tip",
    request_body = TipRequest,
    responses(
        (status = 201, description = "Tip created", body = TipResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "tips",
    security(("bearer_auth" = []))
)]
pub async fn create_tip(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TipRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let now = Utc::now();
    let tip = state
        .tips
        .create(Tip {
            id: String::new(),
            title: payload.title,
            description: payload.description,
            status: payload.status.unwrap_or_else(|| PUBLISHED.to_string()),
            created_at: Some(now),
            updated_at: Some(now),
            user_id: auth.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TipResponse::new(tip, Some(auth.email)))))
}

#[utoipa::path(
    put,
    path = "/api/tip/{id}",
    params(("id" = String, Path, description = "Tip ID")),
    request_body = TipRequest,
    responses(
        (status = 200, description = "Tip updated", body = TipResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Tip not found")
    ),
    tag = "tips",
    security(("bearer_auth" = []))
)]
pub async fn update_tip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<TipRequest>,
) -> Result<Json<TipResponse>> {
    payload.validate()?;

    let mut tip = load_tip(&state, &id).await?;
    auth.ensure_owner(&tip.user_id, "update this tip")?;

    tip.title = payload.title;
    tip.description = payload.description;
    if let Some(status) = payload.status {
        tip.status = status;
    }
    tip.updated_at = Some(Utc::now());

    let tip = state.tips.update(&id, &tip).await?;
    Ok(Json(TipResponse::new(tip, Some(auth.email))))
}

#[utoipa::path(
    delete,
    path = "/api/tip/{id}",
    params(("id" = String, Path, description = "Tip ID")),
    responses(
        (status = 204, description = "Tip deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Tip not found")
    ),
    tag = "tips",
    security(("bearer_auth" = []))
)]
pub async fn delete_tip(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let tip = load_tip(&state, &id).await?;
    auth.ensure_owner(&tip.user_id, "delete this tip")?;

    state.tips.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
