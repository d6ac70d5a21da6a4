use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::BotResult;
use crate::services::scheduler::NotificationScheduler;
use crate::storage::users::UserDirectory;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub storage: StorageHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageHealth {
    pub status: String,
    pub pending_jobs: usize,
    pub known_users: usize,
    pub response_time_ms: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub notifications: Arc<NotificationScheduler>,
    pub users: Arc<UserDirectory>,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(notifications: Arc<NotificationScheduler>, users: Arc<UserDirectory>) -> Self {
        let state = AppState {
            notifications,
            users,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let counts = storage_counts(&state).await;
    let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let uptime = u64::try_from(
        Utc::now()
            .signed_duration_since(state.start_time)
            .num_seconds(),
    )
    .unwrap_or(0);

    let (storage_status, pending_jobs, known_users) = match counts {
        Ok((jobs, users)) => ("healthy", jobs, users),
        Err(e) => {
            tracing::warn!("Health check storage probe failed: {}", e);
            ("unhealthy", 0, 0)
        }
    };

    if storage_status != "healthy" {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: storage_status.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: StorageHealth {
            status: storage_status.to_string(),
            pending_jobs,
            known_users,
            response_time_ms,
        },
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match storage_counts(&state).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn storage_counts(state: &AppState) -> BotResult<(usize, usize)> {
    let jobs = state.notifications.list().await?.len();
    let users = state.users.count().await?;
    Ok((jobs, users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::delivery::Delivery;
    use crate::services::llm::TextGenerator;
    use crate::services::templates::TemplateRegistry;
    use crate::storage::models::NotificationKind;
    use async_trait::async_trait;
    use axum_test::TestServer;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Silent;

    #[async_trait]
    impl TextGenerator for Silent {
        async fn generate(&self, _prompt: &str) -> BotResult<String> {
            Ok(String::new())
        }
    }

    #[async_trait]
    impl Delivery for Silent {
        async fn deliver_to_user(&self, _user_id: i64, _text: &str) -> BotResult<()> {
            Ok(())
        }

        async fn known_users(&self) -> BotResult<Vec<i64>> {
            Ok(Vec::new())
        }
    }

    async fn create_test_health_service() -> (HealthService, Arc<NotificationScheduler>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let templates = Arc::new(
            TemplateRegistry::load_or_seed(temp_dir.path().join("templates.json"))
                .await
                .expect("Failed to seed templates"),
        );
        let silent = Arc::new(Silent);
        let notifications = Arc::new(NotificationScheduler::new(
            temp_dir.path().join("schedule.json"),
            templates,
            silent.clone(),
            silent,
            Duration::from_secs(1),
        ));
        let users = Arc::new(UserDirectory::new(temp_dir.path().join("users.json")));
        users.register(11).await.expect("Failed to register user");

        (
            HealthService::new(notifications.clone(), users),
            notifications,
            temp_dir,
        )
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (health_service, notifications, _temp_dir) = create_test_health_service().await;
        notifications
            .schedule(Utc::now() + chrono::Duration::hours(1), NotificationKind::Diary, vec![])
            .await
            .expect("Failed to schedule");
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let health_response: HealthResponse = response.json();
        assert_eq!(health_response.status, "healthy");
        assert_eq!(health_response.storage.pending_jobs, 1);
        assert_eq!(health_response.storage.known_users, 1);
        assert_eq!(health_response.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_health_reports_corrupt_schedule() {
        let (health_service, _notifications, temp_dir) = create_test_health_service().await;
        std::fs::write(temp_dir.path().join("schedule.json"), "not json").expect("write");
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_readiness_endpoint() {
        let (health_service, _notifications, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/ready").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let ready_response: String = response.json();
        assert_eq!(ready_response, "ready");
    }

    #[tokio::test]
    async fn test_liveness_endpoint() {
        let (health_service, _notifications, _temp_dir) = create_test_health_service().await;
        let server = TestServer::new(health_service.router).expect("Failed to create test server");

        let response = server.get("/health/live").await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let alive_response: String = response.json();
        assert_eq!(alive_response, "alive");
    }
}
