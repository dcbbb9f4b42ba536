use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Document;

pub const DEFAULT_STATUS: &str = "PENDING";

/// A planned pickup at one of the pickup locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub schedule_id: String,
    #[serde(default)]
    pub title: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub pickup_date: String,
    /// `HH:MM`
    #[serde(default)]
    pub pickup_time: String,
    pub location_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user_id: String,
}

impl Document for Schedule {
    const COLLECTION: &'static str = "schedules";

    fn set_id(&mut self, id: String) {
        self.schedule_id = id;
    }
}
