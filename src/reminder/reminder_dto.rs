use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub reminder_message: String,
    /// Local date-time without offset, e.g. `2024-06-01T14:30:00`.
    #[validate(length(min = 1, message = "Reminder date cannot be empty"))]
    pub reminder_date: String,
    pub schedule_id: Option<String>,
}
