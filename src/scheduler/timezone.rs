use async_trait::async_trait;

use crate::store::{Repository, StoreResult};
use crate::user::User;

/// Looks up the IANA zone name a user's reminders are written in.
#[async_trait]
pub trait TimezoneResolver: Send + Sync {
    /// `Ok(None)` when the user is unknown or has no zone set.
    async fn timezone_for(&self, user_id: &str) -> StoreResult<Option<String>>;
}

/// Reads the zone from the owner's user document.
pub struct UserTimezoneResolver {
    users: Repository<User>,
}

impl UserTimezoneResolver {
    pub fn new(users: Repository<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl TimezoneResolver for UserTimezoneResolver {
    async fn timezone_for(&self, user_id: &str) -> StoreResult<Option<String>> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .and_then(|user| user.timezone))
    }
}
