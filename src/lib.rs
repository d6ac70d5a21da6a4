//! # Wellbeing Bot
//!
//! A Telegram companion bot for emotional support and self-reflection.
//!
//! ## Features
//! - Free-form supportive chat backed by an OpenAI-compatible model
//! - Guided diary entries with generated reflections
//! - Short breathing and grounding exercises
//! - Scheduled and immediate broadcast notifications for admins
//! - Editable prompt templates, persisted as JSON files

/// Routing, command handlers and keyboards
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Error type shared by storage and services
pub mod error;
/// Background services: notification sweep, delivery, text generation, health
pub mod services;
/// Per-user conversation state and rate limiting
pub mod session;
/// JSON-file persistence and stored models
pub mod storage;
/// Utility functions for datetime, validation, and formatting
pub mod utils;
