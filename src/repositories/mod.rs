// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only

pub mod book_repository;
pub mod statistics_repository;

pub use book_repository::{BookRepository, SqliteBookRepository};
pub use statistics_repository::{SqliteStatisticsRepository, StatisticsRepository};
