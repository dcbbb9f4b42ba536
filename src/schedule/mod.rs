pub mod schedule_dto;
pub mod schedule_handlers;
pub mod schedule_models;

pub use schedule_models::Schedule;
