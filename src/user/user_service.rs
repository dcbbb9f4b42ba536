use chrono::Utc;
use chrono_tz::Tz;

use crate::{
    auth::{hash_password, verify_password},
    error::{AppError, Result},
    store::Repository,
    user::{
        user_dto::{ProfileRequest, UserRequest},
        user_models::{User, DEFAULT_ROLE},
    },
};

/// Service layer for user records and their profile sub-resources.
#[derive(Clone)]
pub struct UserService {
    users: Repository<User>,
}

impl UserService {
    pub fn new(users: Repository<User>) -> Self {
        Self { users }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.find_all().await?)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Email of the given user, `None` if the user no longer exists.
    pub async fn email_of(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.users.find_by_id(user_id).await?.map(|user| user.email))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .find_by_field("email", email)
            .await?
            .into_iter()
            .next())
    }

    /// Stores a new user with a hashed password, the default role when none is
    /// given and notifications switched on.
    pub async fn create_user(&self, payload: UserRequest) -> Result<User> {
        let password = payload
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("Password is required".to_string()))?;

        if self.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::Conflict("Email already in use.".to_string()));
        }

        let user = User {
            user_id: String::new(),
            username: payload.username,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: hash_password(password)?,
            role: payload
                .role
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            created_at: Some(Utc::now()),
            location: payload.location,
            phone_number: payload.phone_number,
            notifications_enabled: true,
            fcm_token: None,
            timezone: None,
        };

        let user = self.users.create(user).await?;
        tracing::info!("Created user {}", user.user_id);
        Ok(user)
    }

    /// Full update. The password is only re-hashed when a different one is
    /// supplied; the creation timestamp is always preserved. The stored role is
    /// kept unless `allow_role_change` is set.
    pub async fn update_user(
        &self,
        user_id: &str,
        payload: UserRequest,
        allow_role_change: bool,
    ) -> Result<User> {
        let mut user = self.get_user(user_id).await?;

        if payload.email != user.email {
            self.ensure_email_free(user_id, &payload.email).await?;
        }

        if let Some(password) = payload.password.as_deref().filter(|p| !p.is_empty()) {
            if !verify_password(password, &user.password) {
                user.password = hash_password(password)?;
            }
        }

        user.username = payload.username;
        user.first_name = payload.first_name;
        user.last_name = payload.last_name;
        user.email = payload.email;
        match payload.role.filter(|r| !r.is_empty()) {
            Some(role) if allow_role_change => user.role = role,
            Some(role) if role != user.role => {
                tracing::warn!("Ignoring role change to {} for user {}", role, user_id);
            }
            _ => {}
        }
        user.location = payload.location;
        user.phone_number = payload.phone_number;

        Ok(self.users.update(user_id, &user).await?)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        if !self.users.delete(user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!("Deleted user {}", user_id);
        Ok(())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<ProfileRequest> {
        let user = self.get_user(user_id).await?;
        Ok(ProfileRequest {
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
        })
    }

    pub async fn update_profile(&self, user_id: &str, profile: ProfileRequest) -> Result<ProfileRequest> {
        let mut user = self.get_user(user_id).await?;
        user.first_name = profile.first_name;
        user.last_name = profile.last_name;
        user.phone_number = profile.phone_number;

        let user = self.users.update(user_id, &user).await?;
        Ok(ProfileRequest {
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
        })
    }

    pub async fn update_email(&self, user_id: &str, email: String) -> Result<User> {
        self.ensure_email_free(user_id, &email).await?;

        let mut user = self.get_user(user_id).await?;
        user.email = email;
        let user = self.users.update(user_id, &user).await?;
        tracing::info!("Updated email for user {}", user_id);
        Ok(user)
    }

    pub async fn update_notification_settings(&self, user_id: &str, enabled: bool) -> Result<User> {
        let mut user = self.get_user(user_id).await?;
        user.notifications_enabled = enabled;
        let user = self.users.update(user_id, &user).await?;
        tracing::info!("Notifications for user {} set to {}", user_id, enabled);
        Ok(user)
    }

    pub async fn update_fcm_token(&self, user_id: &str, fcm_token: String) -> Result<User> {
        let mut user = self.get_user(user_id).await?;
        user.fcm_token = Some(fcm_token);
        let user = self.users.update(user_id, &user).await?;
        tracing::info!("Updated push token for user {}", user_id);
        Ok(user)
    }

    pub async fn update_timezone(&self, user_id: &str, timezone: String) -> Result<User> {
        let zone: Tz = timezone
            .parse()
            .map_err(|_| AppError::Validation(format!("Unknown timezone: {}", timezone)))?;

        let mut user = self.get_user(user_id).await?;
        user.timezone = Some(zone.name().to_string());
        Ok(self.users.update(user_id, &user).await?)
    }

    async fn ensure_email_free(&self, user_id: &str, email: &str) -> Result<()> {
        match self.find_by_email(email).await? {
            Some(other) if other.user_id != user_id => {
                tracing::warn!("Email {} is already used by user {}", email, other.user_id);
                Err(AppError::Conflict("Email is already in use by another user.".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> UserService {
        UserService::new(Repository::new(Arc::new(MemoryStore::new())))
    }

    fn request(email: &str) -> UserRequest {
        UserRequest {
            username: "collector".into(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: email.into(),
            password: Some("secret123".into()),
            role: None,
            location: None,
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_defaults_role() {
        let users = service();
        let user = users.create_user(request("ada@x.io")).await.unwrap();

        assert_eq!(user.role, DEFAULT_ROLE);
        assert!(user.notifications_enabled);
        assert!(user.created_at.is_some());
        assert_ne!(user.password, "secret123");
        assert!(verify_password("secret123", &user.password));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let users = service();
        users.create_user(request("ada@x.io")).await.unwrap();
        let err = users.create_user(request("ada@x.io")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash_and_created_at() {
        let users = service();
        let user = users.create_user(request("ada@x.io")).await.unwrap();

        let mut change = request("ada@x.io");
        change.password = None;
        change.username = "renamed".into();
        let updated = users.update_user(&user.user_id, change, false).await.unwrap();

        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.password, user.password);
        assert_eq!(updated.created_at, user.created_at);
    }

    #[tokio::test]
    async fn test_update_email_rejects_address_of_another_user() {
        let users = service();
        let ada = users.create_user(request("ada@x.io")).await.unwrap();
        users.create_user(request("bob@x.io")).await.unwrap();

        let err = users
            .update_email(&ada.user_id, "bob@x.io".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let same = users.update_email(&ada.user_id, "ada@x.io".into()).await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn test_update_timezone_validates_iana_name() {
        let users = service();
        let user = users.create_user(request("ada@x.io")).await.unwrap();

        let err = users
            .update_timezone(&user.user_id, "Mars/Olympus".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let updated = users
            .update_timezone(&user.user_id, "Asia/Manila".into())
            .await
            .unwrap();
        assert_eq!(updated.timezone.as_deref(), Some("Asia/Manila"));
    }

    #[tokio::test]
    async fn test_role_only_changes_when_allowed() {
        let users = service();
        let user = users.create_user(request("ada@x.io")).await.unwrap();

        let mut change = request("ada@x.io");
        change.role = Some("ADMIN".into());
        let updated = users
            .update_user(&user.user_id, change, false)
            .await
            .unwrap();
        assert_eq!(updated.role, DEFAULT_ROLE);

        let mut change = request("ada@x.io");
        change.role = Some("ADMIN".into());
        let promoted = users
            .update_user(&user.user_id, change, true)
            .await
            .unwrap();
        assert_eq!(promoted.role, "ADMIN");
    }
}
