use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;

/// A completed collection, recorded against its schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct History {
    #[serde(default)]
    pub history_id: String,
    pub collection_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub schedule_id: Option<String>,
}

impl Document for History {
    const COLLECTION: &'static str = "history";

    fn set_id(&mut self, id: String) {
        self.history_id = id;
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub collection_date: NaiveDate,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(length(min = 1))]
    pub schedule_id: String,
}
