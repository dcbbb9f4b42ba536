use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Document;

/// A user-owned reminder. `reminder_date` is a local date-time without an
/// offset (`2024-06-01T14:30:00`); it is interpreted in the owner's timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(default)]
    pub reminder_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub reminder_message: String,
    #[serde(default)]
    pub reminder_date: String,
    #[serde(default)]
    pub user_id: String,
    pub schedule_id: Option<String>,
}

impl Document for Reminder {
    const COLLECTION: &'static str = "reminders";

    fn set_id(&mut self, id: String) {
        self.reminder_id = id;
    }
}
