use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;

use crate::error::{BotError, BotResult};
use crate::storage::users::UserDirectory;

/// Outcome of a best-effort fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn record(&mut self, result: &BotResult<()>) {
        match result {
            Ok(()) => self.delivered += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Outbound message channel.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver_to_user(&self, user_id: i64, text: &str) -> BotResult<()>;

    /// Everyone a broadcast should reach.
    async fn known_users(&self) -> BotResult<Vec<i64>>;

    /// Sends `text` to each of `user_ids`; individual failures are logged and
    /// counted, never returned.
    async fn deliver_to_many(&self, user_ids: &[i64], text: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for &user_id in user_ids {
            let result = self.deliver_to_user(user_id, text).await;
            if let Err(e) = &result {
                tracing::warn!("Delivery to user {} failed: {}", user_id, e);
            }
            report.record(&result);
        }
        report
    }

    async fn deliver_to_all(&self, text: &str) -> BotResult<DeliveryReport> {
        let users = self.known_users().await?;
        Ok(self.deliver_to_many(&users, text).await)
    }
}

/// Delivers through the Telegram Bot API to the users in the directory.
pub struct TelegramDelivery {
    bot: Bot,
    users: Arc<UserDirectory>,
}

impl TelegramDelivery {
    pub fn new(bot: Bot, users: Arc<UserDirectory>) -> Self {
        Self { bot, users }
    }
}

#[async_trait]
impl Delivery for TelegramDelivery {
    async fn deliver_to_user(&self, user_id: i64, text: &str) -> BotResult<()> {
        self.bot
            .send_message(ChatId(user_id), text)
            .await
            .map(|_| ())
            .map_err(|e| BotError::Delivery {
                user_id,
                reason: e.to_string(),
            })
    }

    async fn known_users(&self) -> BotResult<Vec<i64>> {
        self.users.all().await
    }
}
