use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    state::AppState,
};

use super::location_models::{PickupLocation, PickupLocationRequest};

#[utoipa::path(
    get,
    path = "/api/pickup-locations",
    responses((status = 200, description = "All pickup locations", body = Vec<PickupLocation>)),
    tag = "pickup-locations",
    security(("bearer_auth" = []))
)]
pub async fn get_locations(State(state): State<AppState>) -> Result<Json<Vec<PickupLocation>>> {
    Ok(Json(state.locations.find_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/pickup-locations/{id}",
    params(("id" = String, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Pickup location", body = PickupLocation),
        (status = 404, description = "Location not found")
    ),
    tag = "pickup-locations",
    security(("bearer_auth" = []))
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PickupLocation>> {
    state
        .locations
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Pickup location not found".into()))
}

#[utoipa::path(
    post,
    path = "/api/pickup-locations",
    request_body = PickupLocationRequest,
    responses(
        (status = 201, description = "Location created", body = PickupLocation),
        (status = 400, description = "Validation error")
    ),
    tag = "pickup-locations",
    security(("bearer_auth" = []))
)]
pub async fn create_location(
    State(state): State<AppState>,
    Json(payload): Json<PickupLocationRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let location = state
        .locations
        .create(payload.into_location(String::new()))
        .await?;

    Ok((StatusCode::CREATED, Json(location)))
}

#[utoipa::path(
    put,
    path = "/api/pickup-locations/{id}",
    params(("id" = String, Path, description = "Location ID")),
    request_body = PickupLocationRequest,
    responses(
        (status = 200, description = "Location updated", body = PickupLocation),
        (status = 404, description = "Location not found")
    ),
    tag = "pickup-locations",
    security(("bearer_auth" = []))
)]
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PickupLocationRequest>,
) -> Result<Json<PickupLocation>> {
    payload.validate()?;

    let location = payload.into_location(id.clone());
    Ok(Json(state.locations.update(&id, &location).await?))
}

#[utoipa::path(
    delete,
    path = "/api/pickup-locations/{id}",
    params(("id" = String, Path, description = "Location ID")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 404, description = "Location not found")
    ),
    tag = "pickup-locations",
    security(("bearer_auth" = []))
)]
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.locations.delete(&id).await? {
        return Err(AppError::NotFound("Pickup location not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
