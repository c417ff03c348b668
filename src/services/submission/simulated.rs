use std::time::Duration;

use chrono::Utc;
use log::info;
use uuid::Uuid;

use super::interface::{BookingSubmitter, SubmissionError, SubmissionRequest};
use crate::models::bookings::BookingConfirmation;

/// Stands in for a booking backend: waits, then confirms every request.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl BookingSubmitter for SimulatedSubmitter {
    async fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Result<BookingConfirmation, SubmissionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let confirmation = BookingConfirmation {
            reference: Uuid::new_v4(),
            tour_id: request.draft.tour_id,
            tour_date: request.tour_date,
            participants: request.draft.participants,
            total: request.quote.total,
            submitted_at: Utc::now(),
        };
        info!(
            "Confirmed booking {} for tour {} on {}",
            confirmation.reference, confirmation.tour_id, confirmation.tour_date
        );
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bookings::{BookingDraft, PriceQuote};
    use chrono::NaiveDate;

    #[test]
    fn test_simulated_submission_confirms_request() {
        let submitter = SimulatedSubmitter::new(Duration::ZERO);
        let mut draft = BookingDraft::new("phi-phi");
        draft.participants.adult = 2;
        let request = SubmissionRequest {
            draft,
            tour_date: NaiveDate::from_ymd_opt(2099, 1, 10).unwrap(),
            quote: PriceQuote {
                subtotal: 2000.0,
                discount_percent: 0.0,
                discount_amount: 0.0,
                total: 2000.0,
                infants_free: 0,
            },
        };

        let confirmation = tokio_test::block_on(submitter.submit(request)).unwrap();
        assert_eq!(confirmation.tour_id, "phi-phi");
        assert_eq!(confirmation.participants.adult, 2);
        assert_eq!(confirmation.total, 2000.0);
        assert_eq!(confirmation.tour_date, NaiveDate::from_ymd_opt(2099, 1, 10).unwrap());
    }
}
