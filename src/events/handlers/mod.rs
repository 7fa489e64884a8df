// src/events/handlers/mod.rs
//
// Event Handlers
//
// Handlers use closure-based subscription via EventBus::subscribe.

pub mod activity_log_handler;

pub use activity_log_handler::register_activity_log;
