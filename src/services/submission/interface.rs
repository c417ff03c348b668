use chrono::NaiveDate;

use crate::models::bookings::{BookingConfirmation, BookingDraft, PriceQuote};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("booking service unavailable: {0}")]
    Unavailable(String),
    #[error("booking rejected: {0}")]
    Rejected(String),
}

/// A validated booking ready to be handed to the booking backend.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub draft: BookingDraft,
    pub tour_date: NaiveDate,
    pub quote: PriceQuote,
}

pub trait BookingSubmitter {
    async fn submit(&self, request: SubmissionRequest)
        -> Result<BookingConfirmation, SubmissionError>;
}
