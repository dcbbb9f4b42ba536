pub mod history_handlers;
pub mod history_models;

pub use history_models::History;
