//! Periodic tick host built on `tokio-cron-scheduler`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::watch;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use alerthub_core::config::SchedulerConfig;
use alerthub_core::error::AppError;

use crate::report::TickReport;
use crate::scheduler::ReminderScheduler;

/// Invokes [`ReminderScheduler::tick`] every
/// `scheduler.tick_interval_seconds`.
///
/// A tick that is still running when the next one is due causes the
/// newer run to be skipped. Shutdown cancels an in-flight tick between
/// pairs and then stops the job scheduler.
pub struct ReminderHost {
    scheduler: JobScheduler,
    reminders: Arc<ReminderScheduler>,
    config: SchedulerConfig,
    running: Arc<AtomicBool>,
    started: AtomicBool,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
}

impl std::fmt::Debug for ReminderHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderHost")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReminderHost {
    /// Create a new host
    pub async fn new(
        reminders: Arc<ReminderScheduler>,
        config: SchedulerConfig,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;
        let (cancel_tx, cancel_rx) = watch::channel(false);

        Ok(Self {
            scheduler,
            reminders,
            config,
            running: Arc::new(AtomicBool::new(false)),
            started: AtomicBool::new(false),
            cancel_tx,
            cancel_rx,
        })
    }

    /// Register the tick job and start the scheduler.
    ///
    /// Does nothing when the scheduler is disabled in configuration;
    /// ticks can still be run by hand through [`Self::trigger`].
    pub async fn start(&self) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!("Reminder scheduler disabled, not registering tick job");
            return Ok(());
        }

        self.register_tick().await?;
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;
        self.started.store(true, Ordering::SeqCst);

        tracing::info!(
            interval_seconds = self.config.tick_interval_seconds,
            "Reminder host started"
        );
        Ok(())
    }

    /// Run one tick now, outside the schedule.
    pub async fn trigger(&self) -> Result<TickReport, AppError> {
        let cancel = self.cancel_rx.clone();
        let report = self
            .reminders
            .tick_until_cancelled(Utc::now(), &cancel)
            .await?;
        report.log();
        Ok(report)
    }

    /// Cancel any in-flight tick and stop the scheduler if it was started.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.cancel_tx.send_replace(true);
        if !self.started.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Reminder host shut down");
        Ok(())
    }

    async fn register_tick(&self) -> Result<(), AppError> {
        let reminders = Arc::clone(&self.reminders);
        let running = Arc::clone(&self.running);
        let cancel_rx = self.cancel_rx.clone();

        let job = CronJob::new_repeated_async(self.config.tick_interval(), move |_uuid, _lock| {
            let reminders = Arc::clone(&reminders);
            let running = Arc::clone(&running);
            let cancel = cancel_rx.clone();
            Box::pin(async move {
                let Some(_guard) = RunningGuard::acquire(&running) else {
                    tracing::warn!("Previous reminder tick still running, skipping");
                    return;
                };
                match reminders.tick_until_cancelled(Utc::now(), &cancel).await {
                    Ok(report) => report.log(),
                    Err(e) => tracing::error!("Reminder tick failed: {}", e),
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create reminder tick job: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add reminder tick job: {}", e)))?;

        tracing::info!(
            "Registered: reminder_tick (every {}s)",
            self.config.tick_interval_seconds
        );
        Ok(())
    }
}

/// Marks a scheduled tick as in flight. The flag is cleared on drop, so a
/// panicking tick does not block later ones.
struct RunningGuard(Arc<AtomicBool>);

impl RunningGuard {
    /// `None` when another tick already holds the flag.
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerthub_core::config::AppConfig;
    use alerthub_entity::alert::AlertDefinition;
    use alerthub_entity::directory::User;
    use alerthub_service::ServiceContext;
    use alerthub_store::MemoryStore;

    #[tokio::test]
    async fn test_disabled_host_still_triggers_manually() {
        let store = MemoryStore::new();
        let mut config = AppConfig::default();
        config.scheduler.enabled = false;
        config.reminders.deliver_on_create = false;
        let ctx = ServiceContext::new(&store, &config).unwrap();
        store.directory.add_user(User::new("Alice", [])).unwrap();
        ctx.alerts
            .create(AlertDefinition::new("All", ""), Utc::now())
            .await
            .unwrap();

        let reminders = Arc::new(ReminderScheduler::new(&ctx, &config.reminders));
        let mut host = ReminderHost::new(reminders, config.scheduler.clone())
            .await
            .unwrap();
        host.start().await.unwrap();

        let report = host.trigger().await.unwrap();
        assert_eq!(report.deliveries_sent, 1);

        host.shutdown().await.unwrap();
        let after = host.trigger().await.unwrap();
        assert!(after.cancelled);
    }

    #[test]
    fn test_running_guard_skips_overlap() {
        let flag = Arc::new(AtomicBool::new(false));
        let first = RunningGuard::acquire(&flag).unwrap();
        assert!(RunningGuard::acquire(&flag).is_none());
        drop(first);
        assert!(!flag.load(Ordering::SeqCst));
        assert!(RunningGuard::acquire(&flag).is_some());
    }

    #[test]
    fn test_running_guard_released_when_tick_panics() {
        let flag = Arc::new(AtomicBool::new(false));
        let inner = Arc::clone(&flag);
        let outcome = std::panic::catch_unwind(move || {
            let _guard = RunningGuard::acquire(&inner).unwrap();
            panic!("tick blew up");
        });
        assert!(outcome.is_err());
        assert!(!flag.load(Ordering::SeqCst));
        assert!(RunningGuard::acquire(&flag).is_some());
    }
}
