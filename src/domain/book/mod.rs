pub mod entity;
pub mod invariants;

pub use entity::{legacy_string_hash, now_millis, Book, BookId, Language, ReadingStatus};
pub use invariants::validate_book;
