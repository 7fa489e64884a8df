// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between a front end (the CLI) and the services
// - Translates between user input, DTOs and domain entities
// - Owns the user-facing error format

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType};
pub use state::AppState;
