pub mod feedback_dto;
pub mod feedback_handlers;
pub mod feedback_models;

pub use feedback_models::Feedback;
