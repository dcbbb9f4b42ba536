pub mod tip_dto;
pub mod tip_handlers;
pub mod tip_models;

pub use tip_models::Tip;
