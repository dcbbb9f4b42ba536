use crate::{error::Result, state::AppState};
use super::auth_dto::{AuthResponse, LoginRequest, MessageResponse, PasswordResetRequest, RegisterRequest};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let response = state.auth_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    let response = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(response))
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/api/auth/request-password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Request accepted", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .auth_service
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(MessageResponse {
        message: "If an account exists for that email, a password reset link has been sent."
            .to_string(),
    }))
}
