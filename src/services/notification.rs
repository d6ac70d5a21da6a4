use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::services::scheduler::{NotificationScheduler, SweepReport};

/// Runs the notification sweep on a fixed interval in the background.
pub struct NotificationService {
    notifications: Arc<NotificationScheduler>,
    scheduler: JobScheduler,
    interval: Duration,
}

impl NotificationService {
    pub async fn new(
        notifications: Arc<NotificationScheduler>,
        interval: Duration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            notifications,
            scheduler,
            interval,
        })
    }

    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let notifications = self.notifications.clone();

        let sweep_job = Job::new_repeated_async(self.interval, move |_uuid, _l| {
            let notifications = notifications.clone();
            Box::pin(async move {
                if let Err(e) = notifications.run_sweep().await {
                    tracing::error!("Notification sweep failed: {}", e);
                }
            })
        })?;

        self.scheduler.add(sweep_job).await?;
        self.scheduler.start().await?;

        tracing::info!(
            "Notification service started - sweeping every {}s",
            self.interval.as_secs()
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    /// Runs one sweep immediately, outside the timer.
    pub async fn sweep_now(&self) -> Result<SweepReport, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.notifications.run_sweep().await?)
    }
}
