use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Document;

/// A recycling or waste-reduction tip shared by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
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

impl Document for Tip {
    const COLLECTION: &'static str = "tips";

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TipResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: String,
    pub user_email: Option<String>,
}

impl TipResponse {
    pub fn new(tip: Tip, user_email: Option<String>) -> Self {
        Self {
            id: tip.id,
            title: tip.title,
            description: tip.description,
            status: tip.status,
            created_at: tip.created_at,
            updated_at: tip.updated_at,
            user_id: tip.user_id,
            user_email,
        }
    }
}
