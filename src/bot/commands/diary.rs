use crate::bot::commands::chat::reply_generated;
use crate::bot::handlers::{EventContext, HandlerResult};
use crate::bot::keyboards;
use crate::bot::payload;
use crate::session::{ConversationState, DiaryKind, Gender};
use crate::storage::models::NotificationKind;
use crate::utils::feedback::{FeedbackType, RATE_LIMITED};
use crate::utils::logging::{log_command_error, log_validation_error};

pub async fn handle_diary(ev: &EventContext) -> HandlerResult {
    ev.app
        .sessions
        .set_conversation_state(ev.user_id, &ConversationState::Diary)
        .await;
    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            "Which diary would you like to write in?",
            keyboards::diary_types(),
        )
        .await?;
    Ok(())
}

pub async fn handle_diary_type(ev: &EventContext, data: &str) -> HandlerResult {
    let kind = match payload::parse_diary_type(data) {
        Ok(kind) => kind,
        Err(e) => {
            log_validation_error("diary_type", data, &e.to_string(), &ev.username, ev.user_id);
            ev.feedback().invalid_data().await?;
            return Ok(());
        }
    };

    ev.feedback()
        .send_with_keyboard(
            FeedbackType::Info,
            &format!("{}: how should I address you?", kind.label()),
            keyboards::diary_genders(kind),
        )
        .await?;
    Ok(())
}

pub async fn handle_diary_gender(ev: &EventContext, data: &str) -> HandlerResult {
    let (kind, gender) = match payload::parse_diary_gender(data) {
        Ok(parsed) => parsed,
        Err(e) => {
            log_validation_error("diary_gender", data, &e.to_string(), &ev.username, ev.user_id);
            ev.feedback().invalid_data().await?;
            return Ok(());
        }
    };

    ev.app
        .sessions
        .set_conversation_state(ev.user_id, &ConversationState::DiaryEntry { kind, gender })
        .await;
    ev.feedback().info(entry_invitation(kind)).await?;
    Ok(())
}

fn entry_invitation(kind: DiaryKind) -> &'static str {
    match kind {
        DiaryKind::Personal => "Write about your day, anything that feels important.",
        DiaryKind::Gratitude => "Name three things you are grateful for today.",
        DiaryKind::Emotions => "Describe what you are feeling right now and where you notice it.",
    }
}

/// Prompt asking for a short, supportive reflection on a diary entry.
pub fn diary_prompt(kind: DiaryKind, gender: Gender, entry: &str) -> String {
    let focus = match kind {
        DiaryKind::Personal => "a personal diary entry",
        DiaryKind::Gratitude => "a gratitude list",
        DiaryKind::Emotions => "a description of the writer's emotions",
    };
    format!(
        "The user wrote {focus}. Reply in 2-4 sentences: acknowledge what they shared, \
         reflect one thing back and ask one gentle follow-up question. \
         Address the writer using {gender} grammatical forms where the language requires it.\n\n\
         Entry:\n{entry}",
        gender = gender.as_str(),
    )
}

pub async fn handle_diary_entry(
    ev: &EventContext,
    kind: DiaryKind,
    gender: Gender,
    text: &str,
) -> HandlerResult {
    reply_generated(ev, "diary_entry", &diary_prompt(kind, gender, text)).await
}

pub async fn handle_exercise(ev: &EventContext) -> HandlerResult {
    if ev
        .app
        .sessions
        .is_rate_limited(ev.user_id, ev.app.rate_limit_window)
        .await
    {
        ev.feedback().warning(RATE_LIMITED).await?;
        return Ok(());
    }

    let generated = ev
        .app
        .templates
        .generate(
            NotificationKind::Exercise,
            ev.app.generator.as_ref(),
            ev.app.llm_timeout,
        )
        .await;

    match generated {
        Ok(exercise) => {
            ev.app
                .sessions
                .set_conversation_state(ev.user_id, &ConversationState::Exercise)
                .await;
            ev.feedback().send(FeedbackType::Info, &exercise).await?;
            ev.feedback()
                .info("When you're done, tell me how it went.")
                .await?;
        }
        Err(e) => {
            log_command_error("exercise", &ev.username, ev.user_id, &e.to_string());
            ev.feedback()
                .error("Exercises are not available right now. Please try again later.")
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_exercise_feedback(ev: &EventContext, text: &str) -> HandlerResult {
    let prompt = format!(
        "The user just finished a short breathing or grounding exercise and shared how it \
         went. Respond warmly in 1-3 sentences.\n\nTheir words:\n{text}"
    );
    reply_generated(ev, "exercise_feedback", &prompt).await
}
