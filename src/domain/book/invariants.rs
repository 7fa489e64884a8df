use super::entity::Book;
use crate::domain::{DomainError, DomainResult};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Validates all Book invariants
pub fn validate_book(book: &Book) -> DomainResult<()> {
    validate_title(&book.title)?;
    validate_rating(book.rating)?;
    validate_dates(book)?;
    validate_review(book.review.as_deref())?;
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Book title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_rating(rating: Option<u8>) -> DomainResult<()> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => {
            Err(DomainError::InvariantViolation(format!(
                "Rating {} is outside {}..={}",
                r, MIN_RATING, MAX_RATING
            )))
        }
        _ => Ok(()),
    }
}

/// A book cannot be finished before it was started
fn validate_dates(book: &Book) -> DomainResult<()> {
    if let (Some(start), Some(finish)) = (book.start_date, book.finish_date) {
        if start > finish {
            return Err(DomainError::InvariantViolation(format!(
                "Start date {} cannot be after finish date {}",
                start.format("%Y-%m-%d"),
                finish.format("%Y-%m-%d")
            )));
        }
    }
    Ok(())
}

fn validate_review(review: Option<&str>) -> DomainResult<()> {
    if let Some(text) = review {
        if text.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Review cannot be blank".to_string(),
            ));
        }
    }
    Ok(())
}
