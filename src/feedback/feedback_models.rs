use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Document;

pub const DEFAULT_STATUS: &str = "PENDING";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: String,
}

impl Document for Feedback {
    const COLLECTION: &'static str = "feedback";

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Feedback as returned to clients, with the author's email resolved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: String,
    pub user_email: Option<String>,
}

impl FeedbackResponse {
    pub fn new(feedback: Feedback, user_email: Option<String>) -> Self {
        Self {
            id: feedback.id,
            title: feedback.title,
            description: feedback.description,
            status: feedback.status,
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
            user_id: feedback.user_id,
            user_email,
        }
    }
}
