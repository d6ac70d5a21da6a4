//! # Wellbeing Bot Main Entry Point
//!
//! Initializes logging, loads configuration, opens the JSON stores, starts
//! the notification sweep and runs the Telegram bot next to the health server.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wellbeing_bot::bot::actions::standard_router;
use wellbeing_bot::bot::commands::Command;
use wellbeing_bot::bot::handlers::{AppContext, BotHandler};
use wellbeing_bot::config::Config;
use wellbeing_bot::services::delivery::TelegramDelivery;
use wellbeing_bot::services::health::HealthService;
use wellbeing_bot::services::llm::{LlmClient, TextGenerator};
use wellbeing_bot::services::notification::NotificationService;
use wellbeing_bot::services::scheduler::NotificationScheduler;
use wellbeing_bot::services::templates::TemplateRegistry;
use wellbeing_bot::session::SessionStore;
use wellbeing_bot::storage::users::UserDirectory;
use wellbeing_bot::utils::datetime::reference_offset;
use wellbeing_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellbeing_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let offset = reference_offset(config.tz_offset_hours)?;

    info!("Starting Wellbeing Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Data dir: {}, HTTP Port: {}, admins: {}",
        config.data_dir.display(),
        config.http_port,
        config.admin_ids.len()
    );
    if config.llm_api_key.is_empty() {
        tracing::warn!("LLM_API_KEY is empty, text generation will most likely fail");
    }

    // Stores
    let users = Arc::new(UserDirectory::new(config.users_path()));
    let templates = Arc::new(TemplateRegistry::load_or_seed(config.templates_path()).await?);
    let sessions = Arc::new(SessionStore::new(config.admin_ids.iter().copied()));

    // Collaborators
    let generator: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(
        &config.llm_api_url,
        &config.llm_api_key,
        &config.llm_model,
    ));
    let bot = Bot::new(&config.telegram_bot_token);
    let delivery = Arc::new(TelegramDelivery::new(bot.clone(), users.clone()));

    let notifications = Arc::new(NotificationScheduler::new(
        config.schedule_path(),
        templates.clone(),
        generator.clone(),
        delivery,
        config.llm_timeout,
    ));

    let app = Arc::new(AppContext {
        sessions,
        notifications: notifications.clone(),
        templates,
        users: users.clone(),
        generator,
        router: standard_router()?,
        offset,
        rate_limit_window: config.rate_limit_window,
        llm_timeout: config.llm_timeout,
    });
    let handler = BotHandler::new(app);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    // Initialize and start the notification sweep
    info!("Initializing notification service...");
    let mut notification_service =
        match NotificationService::new(notifications.clone(), config.sweep_interval).await {
            Ok(service) => service,
            Err(e) => {
                tracing::error!("Failed to create notification service: {}", e);
                return Err(anyhow::anyhow!("Failed to create notification service: {}", e));
            }
        };

    if let Err(e) = notification_service.start().await {
        tracing::error!("Failed to start notification service: {}", e);
    }

    // Deliver whatever fell due while the bot was down.
    match notification_service.sweep_now().await {
        Ok(report) if report.due > 0 => log_system_event(
            "Startup sweep",
            Some(&format!("{} due, {} sent, {} dropped", report.due, report.sent, report.dropped)),
        ),
        Ok(_) => {}
        Err(e) => tracing::error!("Startup sweep failed: {}", e),
    }

    // Initialize health service
    let health_service = HealthService::new(notifications, users);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);
    log_system_event("Bot started", None);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    // Wait for either task to complete (which would indicate shutdown)
    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    if let Err(e) = notification_service.stop().await {
        tracing::warn!("Error stopping notification service: {}", e);
    }

    log_system_event("Application stopped", None);
    Ok(())
}
