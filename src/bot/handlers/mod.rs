pub mod callback;
pub mod message;

use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::actions::Action;
use crate::bot::router::Router;
use crate::services::llm::TextGenerator;
use crate::services::scheduler::NotificationScheduler;
use crate::services::templates::TemplateRegistry;
use crate::session::SessionStore;
use crate::storage::users::UserDirectory;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_access_denied;

pub type HandlerResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Shared services every handler can reach.
pub struct AppContext {
    pub sessions: Arc<SessionStore>,
    pub notifications: Arc<NotificationScheduler>,
    pub templates: Arc<TemplateRegistry>,
    pub users: Arc<UserDirectory>,
    pub generator: Arc<dyn TextGenerator>,
    pub router: Router<Action>,
    pub offset: FixedOffset,
    pub rate_limit_window: Duration,
    pub llm_timeout: Duration,
}

/// One inbound message or callback, with who sent it and where to answer.
pub struct EventContext {
    pub bot: Bot,
    pub chat_id: ChatId,
    pub user_id: i64,
    pub username: String,
    pub app: Arc<AppContext>,
}

impl EventContext {
    pub fn new(bot: Bot, chat_id: ChatId, user: &teloxide::types::User, app: Arc<AppContext>) -> Self {
        Self {
            bot,
            chat_id,
            user_id: user.id.0 as i64,
            username: user
                .username
                .clone()
                .unwrap_or_else(|| user.first_name.clone()),
            app,
        }
    }

    pub fn feedback(&self) -> CommandFeedback {
        CommandFeedback::new(self.bot.clone(), self.chat_id)
    }

    /// Replies with a generic denial and returns `false` for non-admins.
    pub async fn require_admin(&self, action: &str) -> HandlerResult<bool> {
        if self.app.sessions.is_admin(self.user_id) {
            return Ok(true);
        }
        log_access_denied(action, &self.username, self.user_id);
        self.feedback().denied().await?;
        Ok(false)
    }

    /// Registers the sender as a broadcast recipient.
    pub async fn register_user(&self) {
        match self.app.users.register(self.user_id).await {
            Ok(true) => tracing::info!("New user {}({}) registered", self.username, self.user_id),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to register user {}: {}", self.user_id, e),
        }
    }
}

pub struct BotHandler {
    pub app: Arc<AppContext>,
}

impl BotHandler {
    pub fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let app_message = self.app.clone();
        let app_callback = self.app.clone();

        dptree::entry()
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let app = app_message.clone();
                async move { message::message_handler(bot, msg, app).await }
            }))
            .branch(
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let app = app_callback.clone();
                    async move { callback::callback_handler(bot, q, app).await }
                }),
            )
    }
}
