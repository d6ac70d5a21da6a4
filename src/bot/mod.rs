pub mod actions;
pub mod commands;
pub mod handlers;
pub mod keyboards;
pub mod payload;
pub mod router;
