use std::sync::Arc;

use crate::store::Repository;
use crate::user::User;

use super::sender::{NotificationError, NotificationSender};

/// Why a delivery was deliberately not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UserNotFound,
    NotificationsDisabled,
    NoPushToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent { message_id: String },
    Skipped(SkipReason),
}

/// Routes notifications addressed to a user to that user's device.
#[derive(Clone)]
pub struct NotificationService {
    users: Repository<User>,
    sender: Arc<dyn NotificationSender>,
}

impl NotificationService {
    pub fn new(users: Repository<User>, sender: Arc<dyn NotificationSender>) -> Self {
        Self { users, sender }
    }

    pub fn sender(&self) -> &Arc<dyn NotificationSender> {
        &self.sender
    }

    /// Sends to the user's registered device. A missing user, disabled
    /// notifications or an absent push token are expected and reported as
    /// [`DeliveryOutcome::Skipped`], not as errors.
    pub async fn send_to_user(
        &self,
        user_id: &str,
        title: &str,
        body: &str,
    ) -> Result<DeliveryOutcome, NotificationError> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            tracing::warn!("Notification not sent: user {} not found", user_id);
            return Ok(DeliveryOutcome::Skipped(SkipReason::UserNotFound));
        };

        if !user.notifications_enabled {
            tracing::info!("Notification not sent: user {} has notifications disabled", user_id);
            return Ok(DeliveryOutcome::Skipped(SkipReason::NotificationsDisabled));
        }

        let Some(token) = user.push_token() else {
            tracing::warn!("Notification not sent: user {} has no push token", user_id);
            return Ok(DeliveryOutcome::Skipped(SkipReason::NoPushToken));
        };

        let message_id = self.sender.send(token, title, body).await?;
        tracing::info!("Sent notification to user {}", user_id);
        Ok(DeliveryOutcome::Sent { message_id })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSender;
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn service_with(user: serde_json::Value) -> (NotificationService, Arc<RecordingSender>, String) {
        let users: Repository<User> = Repository::new(Arc::new(MemoryStore::new()));
        let user: User = serde_json::from_value(user).unwrap();
        let id = users.create(user).await.unwrap().user_id;
        let sender = Arc::new(RecordingSender::default());
        (NotificationService::new(users, sender.clone()), sender, id)
    }

    #[tokio::test]
    async fn test_sends_to_registered_token() {
        let (service, sender, id) =
            service_with(json!({"fcmToken": "device-1", "notificationsEnabled": true})).await;

        let outcome = service.send_to_user(&id, "Pickup", "Bins out").await.unwrap();
        assert!(matches!(outcome, DeliveryOutcome::Sent { .. }));
        assert_eq!(
            sender.sent(),
            vec![("device-1".into(), "Pickup".into(), "Bins out".into())]
        );
    }

    #[tokio::test]
    async fn test_disabled_user_is_skipped() {
        let (service, sender, id) =
            service_with(json!({"fcmToken": "device-1", "notificationsEnabled": false})).await;

        let outcome = service.send_to_user(&id, "Pickup", "Bins out").await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Skipped(SkipReason::NotificationsDisabled));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_missing_user_is_skipped() {
        let (service, sender, _) = service_with(json!({"fcmToken": "device-1"})).await;

        let outcome = service.send_to_user("ghost", "Pickup", "Bins out").await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Skipped(SkipReason::UserNotFound));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_user_without_token_is_skipped() {
        let (service, sender, id) = service_with(json!({"notificationsEnabled": true})).await;

        let outcome = service.send_to_user(&id, "Pickup", "Bins out").await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Skipped(SkipReason::NoPushToken));
        assert!(sender.sent().is_empty());
    }
}
