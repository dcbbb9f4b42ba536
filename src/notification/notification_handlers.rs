use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{error::Result, state::AppState};

use super::notification_dto::{MulticastRequest, MulticastResponse, NotificationRequest, SendResponse};

/// Send a push notification to one device
#[utoipa::path(
    post,
    path = "/api/notifications/send",
    request_body = NotificationRequest,
    responses(
        (status = 200, description = "Notification sent", body = SendResponse),
        (status = 502, description = "Push provider rejected the message", body = SendResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn send_notification(
    State(state): State<AppState>,
    Json(payload): Json<NotificationRequest>,
) -> Result<(StatusCode, Json<SendResponse>)> {
    payload.validate()?;

    let result = state
        .notification_service
        .sender()
        .send(&payload.token, &payload.title, &payload.body)
        .await;

    Ok(match result {
        Ok(message_id) => (
            StatusCode::OK,
            Json(SendResponse {
                success: true,
                message_id: Some(message_id),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to send notification: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(SendResponse {
                    success: false,
                    message_id: None,
                    error: Some("Failed to send notification".to_string()),
                }),
            )
        }
    })
}

/// Send a push notification to several devices
#[utoipa::path(
    post,
    path = "/api/notifications/send-multicast",
    request_body = MulticastRequest,
    responses(
        (status = 200, description = "Delivery summary", body = MulticastResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn send_multicast_notification(
    State(state): State<AppState>,
    Json(payload): Json<MulticastRequest>,
) -> Result<Json<MulticastResponse>> {
    payload.validate()?;

    let success_count = state
        .notification_service
        .sender()
        .send_multicast(&payload.tokens, &payload.title, &payload.body)
        .await;

    Ok(Json(MulticastResponse {
        success_count,
        total: payload.tokens.len(),
    }))
}
