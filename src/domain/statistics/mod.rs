//! Critical Statistics Invariants:
//!
//! 1. Statistics are ALWAYS derived from the library, NEVER primary
//! 2. Statistics can be recalculated or deleted at any time
//! 3. Only finished books feed the reading figures

pub mod entity;
pub use entity::{
    reader_title, BookDuration, ReadingStatistics, StatisticsSnapshot, StatisticsType, UserStats,
};
