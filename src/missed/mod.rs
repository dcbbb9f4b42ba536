pub mod missed_dto;
pub mod missed_handlers;
pub mod missed_models;

pub use missed_models::MissedPickup;
