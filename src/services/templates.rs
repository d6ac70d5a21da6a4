use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

use crate::error::{BotError, BotResult};
use crate::services::llm::{generate_with_timeout, TextGenerator};
use crate::storage::json_file::JsonFile;
use crate::storage::models::{NotificationKind, NotificationTemplate};

/// Prompt templates for generated notifications, persisted as one JSON array.
pub struct TemplateRegistry {
    file: JsonFile<Vec<NotificationTemplate>>,
}

impl TemplateRegistry {
    /// Opens the registry at `path`, writing the default templates if the
    /// file does not exist yet.
    pub async fn load_or_seed(path: impl Into<PathBuf>) -> BotResult<Self> {
        let registry = Self {
            file: JsonFile::new(path),
        };

        registry
            .file
            .update(NotificationTemplate::defaults, |_| Ok(()))
            .await?;

        tracing::info!(
            "Template registry ready at {}",
            registry.file.path().display()
        );
        Ok(registry)
    }

    pub async fn list(&self) -> BotResult<Vec<NotificationTemplate>> {
        Ok(self.file.read().await?.unwrap_or_default())
    }

    /// Prompt of the first active template for `kind`.
    pub async fn resolve(&self, kind: NotificationKind) -> BotResult<String> {
        self.list()
            .await?
            .into_iter()
            .find(|t| t.kind == kind && t.active)
            .map(|t| t.prompt)
            .ok_or(BotError::NoActiveTemplate(kind))
    }

    /// Changes the prompt and active flag of an existing template.
    pub async fn update(
        &self,
        kind: NotificationKind,
        prompt: &str,
        active: bool,
    ) -> BotResult<NotificationTemplate> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(BotError::validation("Template prompt cannot be empty"));
        }

        let updated = self
            .file
            .update(Vec::new, |templates| {
                let template = templates
                    .iter_mut()
                    .find(|t| t.kind == kind)
                    .ok_or(BotError::UnknownTemplate(kind))?;
                template.prompt = prompt.to_string();
                template.active = active;
                template.updated_at = Utc::now();
                Ok(template.clone())
            })
            .await?;

        tracing::info!("Template '{}' updated (active: {})", kind, active);
        Ok(updated)
    }

    /// Only flips the active flag, keeping the prompt.
    pub async fn set_active(&self, kind: NotificationKind, active: bool) -> BotResult<NotificationTemplate> {
        let current = self
            .list()
            .await?
            .into_iter()
            .find(|t| t.kind == kind)
            .ok_or(BotError::UnknownTemplate(kind))?;
        self.update(kind, &current.prompt, active).await
    }

    /// Resolves the template for `kind` and asks `generator` for fresh text.
    pub async fn generate(
        &self,
        kind: NotificationKind,
        generator: &dyn TextGenerator,
        timeout: Duration,
    ) -> BotResult<String> {
        let prompt = self.resolve(kind).await?;
        generate_with_timeout(generator, &prompt, timeout).await
    }
}
