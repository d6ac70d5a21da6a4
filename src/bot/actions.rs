use anyhow::Result;

use crate::bot::router::{EventKind, Router};

/// What the bot does in response to a routed command or callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Help,
    Menu,
    Stop,
    Chat,
    Diary,
    Exercise,
    DiaryType,
    DiaryGender,
    NotifyMenu,
    NotifyKind,
    NotifyList,
    NotifyCustom,
    NotifyCustomAt,
    NotifySendAll,
    NotifySchedulePreset,
    ScheduleType,
    CancelJob,
    Templates,
    TemplateUpdate,
}

impl Action {
    /// Actions whose handlers refuse non-admins.
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Action::NotifyMenu
                | Action::NotifyKind
                | Action::NotifyList
                | Action::NotifyCustom
                | Action::NotifyCustomAt
                | Action::NotifySendAll
                | Action::NotifySchedulePreset
                | Action::ScheduleType
                | Action::CancelJob
                | Action::Templates
                | Action::TemplateUpdate
        )
    }
}

/// The bot's full routing table.
pub fn standard_router() -> Result<Router<Action>> {
    use EventKind::{Callback, Command};

    Router::builder()
        .exact(Command, "start", Action::Start)
        .exact(Command, "help", Action::Help)
        .exact(Command, "menu", Action::Menu)
        .exact(Command, "stop", Action::Stop)
        .exact(Command, "chat", Action::Chat)
        .exact(Command, "diary", Action::Diary)
        .exact(Command, "exercise", Action::Exercise)
        .exact(Command, "notify", Action::NotifyMenu)
        .exact(Command, "jobs", Action::NotifyList)
        .exact(Command, "cancel", Action::CancelJob)
        .exact(Command, "templates", Action::Templates)
        .exact(Command, "template", Action::TemplateUpdate)
        .exact(Callback, "menu", Action::Menu)
        .exact(Callback, "chat_start", Action::Chat)
        .exact(Callback, "diary_start", Action::Diary)
        .exact(Callback, "exercise_start", Action::Exercise)
        .exact(Callback, "notify_menu", Action::NotifyMenu)
        .exact(Callback, "notify_list", Action::NotifyList)
        .exact(Callback, "notify_custom", Action::NotifyCustom)
        .prefix(Callback, "diary_type_", Action::DiaryType)
        .prefix(Callback, "diary_gender_", Action::DiaryGender)
        .prefix(Callback, "schedule_type_", Action::ScheduleType)
        .prefix(Callback, "notify_", Action::NotifyMenu)
        .prefix(Callback, "notify_kind_", Action::NotifyKind)
        .prefix(Callback, "notify_cancel_", Action::CancelJob)
        .prefix(Callback, "notify_send_all_", Action::NotifySendAll)
        .prefix(Callback, "notify_custom_at_", Action::NotifyCustomAt)
        .prefix(Callback, "notify_schedule_preset_", Action::NotifySchedulePreset)
        .build()
}
