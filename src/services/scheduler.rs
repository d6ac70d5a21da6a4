use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::{BotError, BotResult};
use crate::services::delivery::{Delivery, DeliveryReport};
use crate::services::llm::TextGenerator;
use crate::services::templates::TemplateRegistry;
use crate::storage::json_file::JsonFile;
use crate::storage::models::{JobContent, NotificationKind, ScheduledJob};

/// What one sweep did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub sent: usize,
    pub dropped: usize,
    pub deliveries: usize,
    pub delivery_failures: usize,
}

/// Pending broadcast jobs persisted in one JSON file, plus the sweep that
/// delivers them.
///
/// Due jobs are removed from the file before delivery starts, so each one is
/// attempted at most once. A job whose text cannot be generated is dropped
/// without retry. A `cancel` that lands after a sweep has loaded the file
/// cannot stop that sweep from sending the job.
pub struct NotificationScheduler {
    jobs: JsonFile<Vec<ScheduledJob>>,
    templates: Arc<TemplateRegistry>,
    generator: Arc<dyn TextGenerator>,
    delivery: Arc<dyn Delivery>,
    generation_timeout: Duration,
    sweep_guard: Mutex<()>,
}

impl NotificationScheduler {
    pub fn new(
        path: impl Into<PathBuf>,
        templates: Arc<TemplateRegistry>,
        generator: Arc<dyn TextGenerator>,
        delivery: Arc<dyn Delivery>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            jobs: JsonFile::new(path),
            templates,
            generator,
            delivery,
            generation_timeout,
            sweep_guard: Mutex::new(()),
        }
    }

    /// Queues a job whose text is generated when it is sent.
    pub async fn schedule(
        &self,
        send_at: DateTime<Utc>,
        kind: NotificationKind,
        recipients: Vec<i64>,
    ) -> BotResult<String> {
        self.schedule_with_message(send_at, kind, recipients, None).await
    }

    /// Queues a template-kind job with an optional text fixed now.
    pub async fn schedule_with_message(
        &self,
        send_at: DateTime<Utc>,
        kind: NotificationKind,
        recipients: Vec<i64>,
        message: Option<String>,
    ) -> BotResult<String> {
        if kind == NotificationKind::Custom {
            return Err(BotError::validation(
                "Custom notifications need their text, use schedule_custom",
            ));
        }
        self.push(ScheduledJob::generated(kind, send_at, recipients, message))
            .await
    }

    /// Queues a literal message; never calls the generator.
    pub async fn schedule_custom(
        &self,
        send_at: DateTime<Utc>,
        text: &str,
        recipients: Vec<i64>,
    ) -> BotResult<String> {
        if text.trim().is_empty() {
            return Err(BotError::validation("Notification text cannot be empty"));
        }
        self.push(ScheduledJob::custom(text.to_string(), send_at, recipients))
            .await
    }

    async fn push(&self, job: ScheduledJob) -> BotResult<String> {
        let id = job.id.clone();
        let kind = job.kind;
        let send_at = job.send_at;

        self.jobs
            .update(Vec::new, |jobs| {
                jobs.push(job);
                Ok(())
            })
            .await?;

        tracing::info!("Scheduled {} notification {} for {}", kind, id, send_at);
        Ok(id)
    }

    /// Removes the job with `job_id`. Returns `false` if there was none.
    pub async fn cancel(&self, job_id: &str) -> BotResult<bool> {
        let removed = self
            .jobs
            .update(Vec::new, |jobs| {
                let before = jobs.len();
                jobs.retain(|job| job.id != job_id);
                Ok(jobs.len() < before)
            })
            .await?;

        if removed {
            tracing::info!("Cancelled notification {}", job_id);
        } else {
            tracing::debug!("Cancel for unknown notification {}", job_id);
        }
        Ok(removed)
    }

    /// All pending jobs in the order they were scheduled.
    pub async fn list(&self) -> BotResult<Vec<ScheduledJob>> {
        Ok(self.jobs.read().await?.unwrap_or_default())
    }

    pub async fn run_sweep(&self) -> BotResult<SweepReport> {
        self.sweep(Utc::now()).await
    }

    /// Sends every job due at `now` and drops it from the file.
    ///
    /// Returns an empty report if another sweep is still running.
    pub async fn sweep(&self, now: DateTime<Utc>) -> BotResult<SweepReport> {
        let Ok(_running) = self.sweep_guard.try_lock() else {
            tracing::debug!("Sweep already in progress, skipping");
            return Ok(SweepReport::default());
        };

        let due = self
            .jobs
            .update(Vec::new, |jobs| {
                let (due, pending): (Vec<_>, Vec<_>) =
                    std::mem::take(jobs).into_iter().partition(|job| job.is_due(now));
                *jobs = pending;
                Ok(due)
            })
            .await?;

        let mut report = SweepReport {
            due: due.len(),
            ..SweepReport::default()
        };

        if due.is_empty() {
            return Ok(report);
        }
        tracing::info!("Sweep found {} due notification(s)", due.len());

        for job in &due {
            match self.deliver_job(job).await {
                Ok(delivery) => {
                    report.sent += 1;
                    report.deliveries += delivery.delivered;
                    report.delivery_failures += delivery.failed;
                    tracing::info!(
                        "Notification {} ({}) delivered to {} user(s), {} failed",
                        job.id,
                        job.kind,
                        delivery.delivered,
                        delivery.failed
                    );
                }
                Err(e) => {
                    report.dropped += 1;
                    tracing::warn!("Dropping notification {} ({}): {}", job.id, job.kind, e);
                }
            }
        }

        Ok(report)
    }

    async fn deliver_job(&self, job: &ScheduledJob) -> BotResult<DeliveryReport> {
        let text = match job.content() {
            JobContent::Literal(text) => text.to_string(),
            JobContent::Generate(kind) => {
                self.templates
                    .generate(kind, self.generator.as_ref(), self.generation_timeout)
                    .await?
            }
        };

        if job.is_broadcast() {
            self.delivery.deliver_to_all(&text).await
        } else {
            Ok(self.delivery.deliver_to_many(&job.recipients, &text).await)
        }
    }

    /// Generates a `kind` message now and sends it to every known user.
    pub async fn broadcast_now(&self, kind: NotificationKind) -> BotResult<DeliveryReport> {
        let text = self
            .templates
            .generate(kind, self.generator.as_ref(), self.generation_timeout)
            .await?;
        self.delivery.deliver_to_all(&text).await
    }
}
