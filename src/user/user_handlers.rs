use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
    user::{
        user_dto::{
            EmailRequest, EmailResponse, NotificationSettings, ProfileRequest, ProfileResponse,
            UpdateFcmTokenRequest, UpdateTimezoneRequest, UserRequest,
        },
        user_models::UserResponse,
    },
};

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_all_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(mut payload): Json<UserRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !auth.is_admin() {
        payload.role = None;
    }

    let user = state.user_service.create_user(payload).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.user_service.get_user(&user_id).await?;
    Ok(Json(user.into()))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Not the account owner or an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UserRequest>,
) -> Result<Json<UserResponse>> {
    if !auth.is_admin() {
        auth.ensure_owner(&user_id, "update this user")?;
    }
    payload.validate()?;

    let user = state
        .user_service
        .update_user(&user_id, payload, auth.is_admin())
        .await?;
    Ok(Json(user.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    auth.ensure_owner(&user_id, "delete this user")?;
    state.user_service.delete_user(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a user's profile
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/profile",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile retrieved", body = ProfileRequest),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    Ok(Json(state.user_service.get_profile(&user_id).await?))
}

/// Update names and phone number
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/profile",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileRequest),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    auth.ensure_owner(&user_id, "update this profile")?;
    payload.validate()?;

    Ok(Json(state.user_service.update_profile(&user_id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/profile/email",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Current email", body = EmailRequest),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_email(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<EmailResponse>> {
    let user = state.user_service.get_user(&user_id).await?;
    Ok(Json(EmailResponse { email: user.email }))
}

/// Change the login email
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/profile/email",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Email updated", body = EmailRequest),
        (status = 403, description = "Not the account owner"),
        (status = 409, description = "Email already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<EmailRequest>,
) -> Result<Json<EmailResponse>> {
    auth.ensure_owner(&user_id, "update this email")?;
    payload.validate()?;

    let user = state.user_service.update_email(&user_id, payload.email).await?;
    Ok(Json(EmailResponse { email: user.email }))
}

/// Get notification settings
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/profile/notifications",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Current settings", body = NotificationSettings),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_notification_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NotificationSettings>> {
    let user = state.user_service.get_user(&user_id).await?;
    Ok(Json(NotificationSettings {
        notifications_enabled: user.notifications_enabled,
    }))
}

/// Enable or disable push notifications
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/profile/notifications",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = NotificationSettings,
    responses(
        (status = 200, description = "Settings updated", body = NotificationSettings),
        (status = 403, description = "Not the account owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_notification_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<NotificationSettings>,
) -> Result<Json<NotificationSettings>> {
    auth.ensure_owner(&user_id, "change these settings")?;

    let user = state
        .user_service
        .update_notification_settings(&user_id, payload.notifications_enabled)
        .await?;

    Ok(Json(NotificationSettings {
        notifications_enabled: user.notifications_enabled,
    }))
}

/// Register the device push token
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/fcm-token",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = UpdateFcmTokenRequest,
    responses(
        (status = 204, description = "Token stored"),
        (status = 403, description = "Not the account owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_fcm_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateFcmTokenRequest>,
) -> Result<StatusCode> {
    auth.ensure_owner(&user_id, "change this push token")?;
    payload.validate()?;

    state
        .user_service
        .update_fcm_token(&user_id, payload.fcm_token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Set the timezone reminders are interpreted in
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/timezone",
    tag = "users",
    params(("user_id" = String, Path, description = "User ID")),
    request_body = UpdateTimezoneRequest,
    responses(
        (status = 200, description = "Timezone stored", body = UserResponse),
        (status = 400, description = "Unknown timezone"),
        (status = 403, description = "Not the account owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_timezone(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateTimezoneRequest>,
) -> Result<Json<UserResponse>> {
    auth.ensure_owner(&user_id, "change this timezone")?;

    let user = state
        .user_service
        .update_timezone(&user_id, payload.timezone)
        .await?;

    Ok(Json(user.into()))
}
