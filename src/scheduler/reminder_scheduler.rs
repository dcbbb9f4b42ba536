use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, warn};

use crate::notification::{DeliveryOutcome, NotificationService};
use crate::reminder::Reminder;
use crate::store::{Repository, StoreError};

use super::clock::Clock;
use super::evaluator::{resolve_zone, select_due};
use super::timezone::TimezoneResolver;

/// Upper bound on one delivery attempt, so a stalled send cannot hold the
/// in-flight flag forever.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Counters for one evaluation cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub scanned: usize,
    pub due: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Scans every reminder once per tick and notifies the owners of the ones
/// that fall due. Holds no state between ticks apart from the in-flight flag.
pub struct ReminderScheduler {
    reminders: Repository<Reminder>,
    notifications: NotificationService,
    timezones: Arc<dyn TimezoneResolver>,
    clock: Arc<dyn Clock>,
    default_zone: Tz,
    dispatch_timeout: Duration,
    running: AtomicBool,
}

impl ReminderScheduler {
    pub fn new(
        reminders: Repository<Reminder>,
        notifications: NotificationService,
        timezones: Arc<dyn TimezoneResolver>,
        clock: Arc<dyn Clock>,
        default_zone: Tz,
    ) -> Self {
        Self {
            reminders,
            notifications,
            timezones,
            clock,
            default_zone,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            running: AtomicBool::new(false),
        }
    }

    pub fn with_dispatch_timeout(mut self, dispatch_timeout: Duration) -> Self {
        self.dispatch_timeout = dispatch_timeout;
        self
    }

    /// One timer firing. Skipped while the previous cycle is still running;
    /// errors are logged and never propagate to the timer.
    pub async fn tick(&self) -> Option<CycleReport> {
        let Some(_guard) = InFlight::acquire(&self.running) else {
            warn!("Previous reminder cycle still running, skipping this tick");
            return None;
        };

        match self.run_cycle().await {
            Ok(report) => {
                if report.due > 0 {
                    info!(
                        "Reminder cycle: {} due, {} sent, {} skipped, {} failed",
                        report.due, report.sent, report.skipped, report.failed
                    );
                } else {
                    debug!("Reminder cycle: {} scanned, none due", report.scanned);
                }
                Some(report)
            }
            Err(e) => {
                error!("Reminder cycle aborted, could not load reminders: {}", e);
                None
            }
        }
    }

    /// Evaluates all reminders against the clock and dispatches the due ones.
    /// Only a failure to load the reminder list is returned as an error.
    pub async fn run_cycle(&self) -> Result<CycleReport, StoreError> {
        let now = self.clock.now();
        let reminders = self.reminders.find_all().await?;

        let mut zones: HashMap<String, Tz> = HashMap::new();
        let mut candidates = Vec::with_capacity(reminders.len());
        for reminder in reminders {
            let zone = match zones.get(&reminder.user_id) {
                Some(zone) => *zone,
                None => {
                    let zone = self.zone_for(&reminder.user_id).await;
                    zones.insert(reminder.user_id.clone(), zone);
                    zone
                }
            };
            candidates.push((reminder, zone));
        }

        let due = select_due(now, &candidates);
        let mut report = CycleReport {
            scanned: candidates.len(),
            due: due.len(),
            ..CycleReport::default()
        };

        for reminder in due {
            let delivery = tokio::time::timeout(
                self.dispatch_timeout,
                self.notifications.send_to_user(
                    &reminder.user_id,
                    &reminder.title,
                    &reminder.reminder_message,
                ),
            )
            .await;

            let Ok(delivery) = delivery else {
                error!(
                    "Delivery of reminder {} timed out after {:?}",
                    reminder.reminder_id, self.dispatch_timeout
                );
                report.failed += 1;
                continue;
            };

            match delivery {
                Ok(DeliveryOutcome::Sent { .. }) => {
                    info!("Reminder {} delivered to user {}", reminder.reminder_id, reminder.user_id);
                    report.sent += 1;
                }
                Ok(DeliveryOutcome::Skipped(reason)) => {
                    debug!("Reminder {} not delivered: {:?}", reminder.reminder_id, reason);
                    report.skipped += 1;
                }
                Err(e) => {
                    error!("Failed to deliver reminder {}: {}", reminder.reminder_id, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    async fn zone_for(&self, user_id: &str) -> Tz {
        match self.timezones.timezone_for(user_id).await {
            Ok(name) => resolve_zone(name.as_deref(), self.default_zone),
            Err(e) => {
                warn!("Timezone lookup for user {} failed: {}", user_id, e);
                self.default_zone
            }
        }
    }
}

/// Clears the in-flight flag when the cycle ends, including on panic.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Registers the scheduler on a cron timer and starts it. The returned
/// [`JobScheduler`] must be kept alive for the timer to keep firing.
pub async fn start_reminder_scheduler(
    scheduler: Arc<ReminderScheduler>,
    cron: &str,
) -> anyhow::Result<JobScheduler> {
    let jobs = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _l| {
        let scheduler = scheduler.clone();

        Box::pin(async move {
            scheduler.tick().await;
        })
    })?;

    jobs.add(job).await?;
    jobs.start().await?;

    info!("Reminder scheduler started ({})", cron);
    Ok(jobs)
}
