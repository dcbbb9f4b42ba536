use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupLocation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub waste_type: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl Document for PickupLocation {
    const COLLECTION: &'static str = "pickup_locations";

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupLocationRequest {
    #[validate(length(min = 1, message = "Site name is required"))]
    pub site_name: String,
    #[validate(length(min = 1, message = "Waste type is required"))]
    pub waste_type: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

impl PickupLocationRequest {
    pub fn into_location(self, id: String) -> PickupLocation {
        PickupLocation {
            id,
            site_name: self.site_name,
            waste_type: self.waste_type,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
