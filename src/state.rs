use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use chrono_tz::Tz;

use crate::{
    auth::{AuthService, TokenService},
    feedback::Feedback,
    history::History,
    location::PickupLocation,
    missed::MissedPickup,
    notification::{NotificationSender, NotificationService},
    reminder::ReminderService,
    schedule::Schedule,
    scheduler::{ReminderScheduler, SystemClock, UserTimezoneResolver},
    store::{RecordStore, Repository},
    tip::Tip,
    user::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecordStore>,
    pub tokens: Arc<TokenService>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub reminder_service: ReminderService,
    pub notification_service: NotificationService,
    pub schedules: Repository<Schedule>,
    pub missed_pickups: Repository<MissedPickup>,
    pub feedback: Repository<Feedback>,
    pub tips: Repository<Tip>,
    pub history: Repository<History>,
    pub locations: Repository<PickupLocation>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn RecordStore>,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        let tokens = Arc::new(TokenService::from_config(
            config.jwt_secret.as_deref(),
            Duration::milliseconds(config.jwt_expiration_ms),
        ));

        let user_service = UserService::new(Repository::new(store.clone()));
        let auth_service = AuthService::new(user_service.clone(), tokens.clone());
        let notification_service = NotificationService::new(Repository::new(store.clone()), sender);

        Self {
            tokens,
            auth_service,
            user_service,
            notification_service,
            reminder_service: ReminderService::new(Repository::new(store.clone())),
            schedules: Repository::new(store.clone()),
            missed_pickups: Repository::new(store.clone()),
            feedback: Repository::new(store.clone()),
            tips: Repository::new(store.clone()),
            history: Repository::new(store.clone()),
            locations: Repository::new(store.clone()),
            store,
            config,
        }
    }

    /// Reminder scheduler wired to this state's store and sender, on the
    /// system clock.
    pub fn reminder_scheduler(&self) -> ReminderScheduler {
        ReminderScheduler::new(
            Repository::new(self.store.clone()),
            self.notification_service.clone(),
            Arc::new(UserTimezoneResolver::new(Repository::new(self.store.clone()))),
            Arc::new(SystemClock),
            self.config.default_timezone,
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Unset means records are kept in memory only.
    pub database_url: Option<String>,
    /// Base64-encoded HS512 key.
    pub jwt_secret: Option<String>,
    pub jwt_expiration_ms: i64,
    pub default_timezone: Tz,
    pub reminder_cron: String,
    pub firebase_project_id: Option<String>,
    /// Path to the service-account JSON file.
    pub firebase_credentials: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: None,
            jwt_secret: None,
            jwt_expiration_ms: 3_600_000,
            default_timezone: chrono_tz::UTC,
            reminder_cron: "0 * * * * *".to_string(),
            firebase_project_id: None,
            firebase_credentials: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: env_or("HOST", defaults.host),
            port: parse_env("PORT", defaults.port)?,
            database_url: optional_env("DATABASE_URL"),
            jwt_secret: optional_env("JWT_SECRET"),
            jwt_expiration_ms: parse_env("JWT_EXPIRATION_MS", defaults.jwt_expiration_ms)?,
            default_timezone: match optional_env("DEFAULT_TIMEZONE") {
                Some(name) => name
                    .parse::<Tz>()
                    .map_err(|e| anyhow::anyhow!("DEFAULT_TIMEZONE: {}", e))?,
                None => defaults.default_timezone,
            },
            reminder_cron: env_or("REMINDER_CRON", defaults.reminder_cron),
            firebase_project_id: optional_env("FIREBASE_PROJECT_ID"),
            firebase_credentials: optional_env("FIREBASE_CREDENTIALS"),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: String) -> String {
    optional_env(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
