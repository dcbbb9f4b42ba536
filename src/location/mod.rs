pub mod location_handlers;
pub mod location_models;

pub use location_models::PickupLocation;
