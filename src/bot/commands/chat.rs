use teloxide::prelude::*;

use crate::bot::handlers::{EventContext, HandlerResult};
use crate::services::llm::generate_with_timeout;
use crate::session::ConversationState;
use crate::utils::feedback::RATE_LIMITED;
use crate::utils::logging::{log_command_error, log_command_success};

pub async fn handle_chat(ev: &EventContext) -> HandlerResult {
    ev.app
        .sessions
        .set_conversation_state(ev.user_id, &ConversationState::Chat)
        .await;
    ev.feedback()
        .info("I'm listening. Tell me what is on your mind, or use /stop to finish.")
        .await?;
    Ok(())
}

/// Sends `prompt` to the generator and answers with the result, unless the
/// user is over the rate limit.
pub async fn reply_generated(ev: &EventContext, context: &str, prompt: &str) -> HandlerResult {
    if ev
        .app
        .sessions
        .is_rate_limited(ev.user_id, ev.app.rate_limit_window)
        .await
    {
        ev.feedback().warning(RATE_LIMITED).await?;
        return Ok(());
    }

    ev.bot
        .send_chat_action(ev.chat_id, teloxide::types::ChatAction::Typing)
        .await?;

    match generate_with_timeout(ev.app.generator.as_ref(), prompt, ev.app.llm_timeout).await {
        Ok(reply) => {
            ev.bot.send_message(ev.chat_id, reply).await?;
            log_command_success(context, &ev.username, ev.user_id, None);
        }
        Err(e) => {
            log_command_error(context, &ev.username, ev.user_id, &e.to_string());
            ev.feedback()
                .error("I couldn't come up with an answer right now. Please try again a bit later.")
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_chat_message(ev: &EventContext, text: &str) -> HandlerResult {
    reply_generated(ev, "chat", text).await
}
