// Declare submodules
pub mod fcm;
pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_service;
pub mod sender;

// Re-export public items
pub use fcm::{FcmSender, ServiceAccount};
pub use notification_service::{DeliveryOutcome, NotificationService};
pub use sender::{LogSender, NotificationSender};
