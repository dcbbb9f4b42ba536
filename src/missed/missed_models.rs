use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Document;

/// A resident's report that a scheduled pickup did not happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissedPickup {
    #[serde(default)]
    pub missed_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub report_date_time: Option<DateTime<Utc>>,
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub user_id: String,
}

impl Document for MissedPickup {
    const COLLECTION: &'static str = "missed";

    fn set_id(&mut self, id: String) {
        self.missed_id = id;
    }
}
