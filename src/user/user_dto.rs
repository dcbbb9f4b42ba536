use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: String,
    /// Omit or leave empty to keep the current password on update.
    pub password: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 30))]
    pub phone_number: Option<String>,
}

pub type ProfileResponse = ProfileRequest;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

pub type EmailResponse = EmailRequest;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub notifications_enabled: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFcmTokenRequest {
    #[validate(length(min = 1))]
    pub fcm_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTimezoneRequest {
    pub timezone: String,
}
