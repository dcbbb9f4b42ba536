pub mod clock;
pub mod evaluator;
pub mod reminder_scheduler;
pub mod timezone;

pub use clock::SystemClock;
pub use reminder_scheduler::{start_reminder_scheduler, ReminderScheduler};
pub use timezone::UserTimezoneResolver;
