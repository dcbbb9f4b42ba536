use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Document;

pub const DEFAULT_ROLE: &str = "USER";

fn enabled_by_default() -> bool {
    true
}

/// Stored user document. Carries the password hash, so it is never returned
/// from a handler directly; see [`UserResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    pub created_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub notifications_enabled: bool,
    pub fcm_token: Option<String>,
    pub timezone: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }

    /// The push token, if one is registered and non-empty.
    pub fn push_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn set_id(&mut self, id: String) {
        self.user_id = id;
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub role: String,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub notifications_enabled: bool,
    pub timezone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            location: user.location,
            phone_number: user.phone_number,
            notifications_enabled: user.notifications_enabled,
            timezone: user.timezone,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_notification_flag_defaults_to_enabled() {
        let user: User = serde_json::from_value(json!({"email": "a@b.io"})).unwrap();
        assert!(user.notifications_enabled);
        assert!(user.push_token().is_none());
    }

    #[test]
    fn test_blank_push_token_counts_as_absent() {
        let user: User = serde_json::from_value(json!({"fcmToken": "  "})).unwrap();
        assert!(user.push_token().is_none());
    }

    #[test]
    fn test_response_omits_password() {
        let user: User = serde_json::from_value(json!({
            "email": "a@b.io",
            "password": "$2b$12$hash",
        }))
        .unwrap();
        let body = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["email"], "a@b.io");
    }
}
