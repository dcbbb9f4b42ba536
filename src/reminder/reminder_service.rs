use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::reminder::{reminder_dto::ReminderRequest, reminder_models::Reminder};
use crate::scheduler::evaluator::parse_due_timestamp;
use crate::store::Repository;

/// Service layer for reminder records.
#[derive(Clone)]
pub struct ReminderService {
    repo: Repository<Reminder>,
}

impl ReminderService {
    pub fn new(repo: Repository<Reminder>) -> Self {
        Self { repo }
    }

    pub async fn list_reminders(&self) -> Result<Vec<Reminder>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Reminder>> {
        Ok(self.repo.find_by_field("userId", user_id).await?)
    }

    pub async fn get_reminder(&self, reminder_id: &str) -> Result<Reminder> {
        self.repo
            .find_by_id(reminder_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reminder not found".into()))
    }

    pub async fn create_reminder(&self, user: &AuthUser, payload: ReminderRequest) -> Result<Reminder> {
        ensure_valid_date(&payload.reminder_date)?;

        let reminder = self
            .repo
            .create(Reminder {
                reminder_id: String::new(),
                title: payload.title,
                reminder_message: payload.reminder_message,
                reminder_date: payload.reminder_date,
                user_id: user.id.clone(),
                schedule_id: payload.schedule_id,
            })
            .await?;

        tracing::info!("User {} created reminder {}", user.id, reminder.reminder_id);
        Ok(reminder)
    }

    pub async fn update_reminder(
        &self,
        user: &AuthUser,
        reminder_id: &str,
        payload: ReminderRequest,
    ) -> Result<Reminder> {
        let mut reminder = self.get_reminder(reminder_id).await?;
        user.ensure_owner(&reminder.user_id, "update this reminder")?;
        ensure_valid_date(&payload.reminder_date)?;

        reminder.title = payload.title;
        reminder.reminder_message = payload.reminder_message;
        reminder.reminder_date = payload.reminder_date;
        reminder.schedule_id = payload.schedule_id;

        Ok(self.repo.update(reminder_id, &reminder).await?)
    }

    pub async fn delete_reminder(&self, user: &AuthUser, reminder_id: &str) -> Result<()> {
        let reminder = self.get_reminder(reminder_id).await?;
        user.ensure_owner(&reminder.user_id, "delete this reminder")?;

        if !self.repo.delete(reminder_id).await? {
            return Err(AppError::NotFound("Reminder not found".into()));
        }
        Ok(())
    }
}

fn ensure_valid_date(raw: &str) -> Result<()> {
    parse_due_timestamp(raw)
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("Invalid reminder date: {}", raw)))
}
