pub mod state;
pub mod store;

pub use state::{ConversationState, DiaryKind, Gender};
pub use store::{SessionStore, UserSession};
