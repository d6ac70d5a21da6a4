pub mod delivery;
pub mod health;
pub mod llm;
pub mod notification;
pub mod scheduler;
pub mod templates;
