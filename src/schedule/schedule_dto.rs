use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(custom(function = "validate_pickup_date"))]
    pub pickup_date: String,
    #[validate(custom(function = "validate_pickup_time"))]
    pub pickup_time: String,
    pub location_id: Option<String>,
    pub status: Option<String>,
}

fn validate_pickup_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::new("pickup_date_format"))
}

fn validate_pickup_time(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map(|_| ())
        .map_err(|_| ValidationError::new("pickup_time_format"))
}
