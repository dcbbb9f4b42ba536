pub mod reminder_dto;
pub mod reminder_handlers;
pub mod reminder_models;
pub mod reminder_service;

pub use reminder_models::Reminder;
pub use reminder_service::ReminderService;
