use std::path::PathBuf;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::language::UnsupportedLanguage;

/// Failure to load the catalog document as a whole.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog must be a JSON array of tour records")]
    NotAnArray,
}

/// Why a single catalog record was rejected at load time.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("missing English text for `{field}`")]
    MissingEnglish { field: String },
    #[error("open trip has no valid openTripDate")]
    MissingOpenTripDate,
    #[error("minBookingHours {hours} exceeds the {max} hour limit")]
    LeadTimeTooLong { hours: u32, max: u32 },
    #[error("duplicate tour id `{0}`")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("tour `{0}` not found")]
    TourNotFound(String),
    #[error("booking session {0} not found")]
    SessionNotFound(Uuid),
    #[error("booking can no longer be edited")]
    NotEditable,
    #[error("a submission is already in progress for this booking")]
    SubmissionInFlight,
    #[error("at least one adult is required")]
    NoAdults,
    #[error("a tour date is required")]
    DateRequired,
    #[error("tour date {date} is before the earliest bookable date {earliest}")]
    DateTooEarly { date: NaiveDate, earliest: NaiveDate },
    #[error("bookings for this trip closed on {last_date}")]
    BookingClosed { last_date: NaiveDate },
    #[error("this trip only departs on {fixed}")]
    FixedDateMismatch { fixed: NaiveDate },
    #[error("tour has no bookable schedule")]
    Unschedulable,
    #[error("`{0}` is required")]
    MissingGuestField(&'static str),
    #[error("booking submission failed: {0}")]
    SubmissionFailed(String),
    #[error("booking was rejected: {0}")]
    SubmissionRejected(String),
}

impl BookingError {
    fn status(&self) -> StatusCode {
        match self {
            BookingError::TourNotFound(_) | BookingError::SessionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            BookingError::NotEditable | BookingError::SubmissionInFlight => StatusCode::CONFLICT,
            BookingError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Language(#[from] UnsupportedLanguage),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Language(_) | ApiError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ApiError::Booking(err) => err.status(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_error_status_codes() {
        let in_flight = ApiError::from(BookingError::SubmissionInFlight);
        assert_eq!(in_flight.status_code(), StatusCode::CONFLICT);

        let missing = ApiError::from(BookingError::TourNotFound("x".to_string()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let early = ApiError::from(BookingError::DateRequired);
        assert_eq!(early.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_language_error_is_bad_request() {
        let err = ApiError::from(UnsupportedLanguage("fr".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "unsupported language code: fr");
    }
}
