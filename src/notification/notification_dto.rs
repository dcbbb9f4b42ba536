use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NotificationRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MulticastRequest {
    #[validate(length(min = 1))]
    pub tokens: Vec<String>,
    #[validate(length(min = 1))]
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MulticastResponse {
    pub success_count: usize,
    pub total: usize,
}
