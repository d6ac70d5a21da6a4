use crate::bot::handlers::{EventContext, HandlerResult};
use crate::storage::models::NotificationKind;
use crate::utils::logging::{log_command_error, log_command_success, log_validation_error};
use crate::utils::markdown::preview;
use crate::utils::validation::validate_template_prompt;

const USAGE: &str = "Usage: /template <diary|exercise|motivation> <on|off> [new prompt]";

pub async fn handle_templates(ev: &EventContext) -> HandlerResult {
    if !ev.require_admin("templates").await? {
        return Ok(());
    }

    let templates = match ev.app.templates.list().await {
        Ok(templates) => templates,
        Err(e) => {
            log_command_error("templates", &ev.username, ev.user_id, &e.to_string());
            ev.feedback().error("Could not read the templates.").await?;
            return Ok(());
        }
    };

    if templates.is_empty() {
        ev.feedback().info("No templates are defined.").await?;
        return Ok(());
    }

    let mut text = String::from("Notification templates:\n");
    for template in &templates {
        text.push_str(&format!(
            "\n{} {} ({})\n{}\n",
            if template.active { "🟢" } else { "⚪" },
            template.name,
            template.kind,
            preview(&template.prompt, 160)
        ));
    }
    text.push_str(&format!("\n{USAGE}"));

    ev.feedback().info(&text).await?;
    Ok(())
}

/// Parsed `/template` arguments.
#[derive(Debug, PartialEq, Eq)]
struct TemplateEdit {
    kind: NotificationKind,
    active: bool,
    prompt: Option<String>,
}

fn parse_template_args(args: &str) -> Result<TemplateEdit, String> {
    let mut parts = args.trim().splitn(3, char::is_whitespace);

    let kind: NotificationKind = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Template kind is missing".to_string())?
        .parse()
        .map_err(|e: anyhow::Error| e.to_string())?;
    if kind == NotificationKind::Custom {
        return Err("Custom notifications have no template".to_string());
    }

    let active = match parts.next().map(str::to_lowercase).as_deref() {
        Some("on") => true,
        Some("off") => false,
        Some(other) => return Err(format!("Expected 'on' or 'off', got '{other}'")),
        None => return Err("Expected 'on' or 'off'".to_string()),
    };

    let prompt = parts
        .next()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(validate_template_prompt)
        .transpose()
        .map_err(|e| e.to_string())?;

    Ok(TemplateEdit { kind, active, prompt })
}

pub async fn handle_template_update(ev: &EventContext, args: &str) -> HandlerResult {
    if !ev.require_admin("template").await? {
        return Ok(());
    }

    let edit = match parse_template_args(args) {
        Ok(edit) => edit,
        Err(e) => {
            log_validation_error("template", args, &e, &ev.username, ev.user_id);
            ev.feedback().validation_error(&e, USAGE).await?;
            return Ok(());
        }
    };

    let result = match &edit.prompt {
        Some(prompt) => ev.app.templates.update(edit.kind, prompt, edit.active).await,
        None => ev.app.templates.set_active(edit.kind, edit.active).await,
    };

    match result {
        Ok(template) => {
            log_command_success("template", &ev.username, ev.user_id, Some(template.kind.as_str()));
            ev.feedback()
                .success(&format!(
                    "Template '{}' is now {}.",
                    template.name,
                    if template.active { "active" } else { "inactive" }
                ))
                .await?;
        }
        Err(e) => {
            log_command_error("template", &ev.username, ev.user_id, &e.to_string());
            ev.feedback().error(&e.to_string()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggle_only() {
        let edit = parse_template_args("diary off").unwrap();
        assert_eq!(
            edit,
            TemplateEdit {
                kind: NotificationKind::Diary,
                active: false,
                prompt: None
            }
        );
    }

    #[test]
    fn test_parse_with_prompt() {
        let edit = parse_template_args("motivation ON  Write one encouraging sentence.").unwrap();
        assert_eq!(edit.kind, NotificationKind::Motivation);
        assert!(edit.active);
        assert_eq!(edit.prompt.as_deref(), Some("Write one encouraging sentence."));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_template_args("").is_err());
        assert!(parse_template_args("custom on").is_err());
        assert!(parse_template_args("weather on").is_err());
        assert!(parse_template_args("diary maybe").is_err());
        assert!(parse_template_args("diary").is_err());
        // shorter than the minimum prompt length
        assert!(parse_template_args("diary on hi").is_err());
    }
}
