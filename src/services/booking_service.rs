use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::error::BookingError;
use crate::models::bookings::{
    BookingConfirmation, BookingDraft, BookingDraftPatch, BookingWindow, PriceQuote,
};
use crate::models::tour::SourceTour;
use crate::services::catalog_service::Catalog;
use crate::services::pricing_service::PricingService;
use crate::services::submission::{BookingSubmitter, SubmissionError, SubmissionRequest};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BookingPhase {
    Editing,
    Submitting,
    Confirmed { confirmation: BookingConfirmation },
}

/// One guest's booking form. Only one submission may be in flight at a time.
#[derive(Debug, Clone)]
pub struct BookingSession {
    id: Uuid,
    draft: BookingDraft,
    phase: BookingPhase,
    touched: DateTime<Utc>,
}

impl BookingSession {
    pub fn new(tour_id: impl Into<String>) -> Self {
        Self::opened_at(tour_id, Utc::now())
    }

    pub fn opened_at(tour_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            draft: BookingDraft::new(tour_id),
            phase: BookingPhase::Editing,
            touched: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn phase(&self) -> &BookingPhase {
        &self.phase
    }

    pub fn last_touched(&self) -> DateTime<Utc> {
        self.touched
    }

    /// Idle for longer than `timeout` at `now`. A submitting session never is.
    pub fn is_idle(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        if self.phase == BookingPhase::Submitting {
            return false;
        }
        (now - self.touched)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    pub fn update(&mut self, patch: BookingDraftPatch) -> Result<(), BookingError> {
        match self.phase {
            BookingPhase::Editing => self.draft.apply(patch),
            BookingPhase::Submitting => Err(BookingError::SubmissionInFlight),
            BookingPhase::Confirmed { .. } => Err(BookingError::NotEditable),
        }
    }

    /// Validates the draft against the tour and marks the session as submitting.
    pub fn begin_submission(
        &mut self,
        tour: &SourceTour,
        now: DateTime<Utc>,
    ) -> Result<SubmissionRequest, BookingError> {
        match self.phase {
            BookingPhase::Editing => {}
            BookingPhase::Submitting => return Err(BookingError::SubmissionInFlight),
            BookingPhase::Confirmed { .. } => return Err(BookingError::NotEditable),
        }

        self.draft.participants.validate()?;
        if let Some(field) = self.draft.guest.missing_required_field() {
            return Err(BookingError::MissingGuestField(field));
        }
        let schedule = tour.schedule().ok_or(BookingError::Unschedulable)?;
        let tour_date = PricingService::check_tour_date(&schedule, self.draft.selected_date, now)?;
        let quote = PricingService::quote(
            &self.draft.participants,
            &tour.price,
            tour.promotion.as_ref(),
            now.date_naive(),
        );

        self.phase = BookingPhase::Submitting;
        Ok(SubmissionRequest {
            draft: self.draft.clone(),
            tour_date,
            quote,
        })
    }

    pub fn complete(&mut self, confirmation: BookingConfirmation) -> Result<(), BookingError> {
        if self.phase != BookingPhase::Submitting {
            return Err(BookingError::NotEditable);
        }
        self.draft = BookingDraft::new(self.draft.tour_id.clone());
        self.phase = BookingPhase::Confirmed { confirmation };
        Ok(())
    }

    /// Returns to editing after a failed submission, keeping the draft.
    pub fn abort_submission(&mut self) {
        if self.phase == BookingPhase::Submitting {
            self.phase = BookingPhase::Editing;
        }
    }

    /// Starts over with an empty draft for the same tour.
    pub fn reset(&mut self) -> Result<(), BookingError> {
        if self.phase == BookingPhase::Submitting {
            return Err(BookingError::SubmissionInFlight);
        }
        self.draft = BookingDraft::new(self.draft.tour_id.clone());
        self.phase = BookingPhase::Editing;
        Ok(())
    }
}

/// Client-facing view of a session with the numbers the booking form shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    pub id: Uuid,
    #[serde(flatten)]
    pub phase: BookingPhase,
    pub draft: BookingDraft,
    pub quote: PriceQuote,
    pub window: Option<BookingWindow>,
    pub promotion_applied: bool,
}

/// Holds the open booking sessions. Each session is only reachable through
/// its own id. Idle sessions are evicted, and the oldest idle-capable one
/// makes room when the desk is full.
pub struct BookingDesk<S> {
    catalog: Arc<Catalog>,
    submitter: S,
    sessions: Mutex<HashMap<Uuid, BookingSession>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl<S: BookingSubmitter> BookingDesk<S> {
    pub fn new(catalog: Arc<Catalog>, submitter: S) -> Self {
        Self {
            catalog,
            submitter,
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_limits(mut self, idle_timeout: Duration, max_sessions: usize) -> Self {
        self.idle_timeout = idle_timeout;
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions().len()
    }

    pub fn open(&self, tour_id: &str, now: DateTime<Utc>) -> Result<BookingSnapshot, BookingError> {
        let tour = self.tour(tour_id)?;
        let session = BookingSession::opened_at(tour_id, now);
        let snapshot = snapshot(&session, tour, now);
        info!("Opened booking session {} for tour {}", session.id, tour_id);

        let mut sessions = self.sessions();
        self.evict_idle(&mut sessions, now);
        if sessions.len() >= self.max_sessions {
            self.evict_oldest(&mut sessions);
        }
        sessions.insert(session.id, session);
        Ok(snapshot)
    }

    pub fn get(&self, id: Uuid, now: DateTime<Utc>) -> Result<BookingSnapshot, BookingError> {
        self.with_session(id, now, |session, tour| Ok(snapshot(session, tour, now)))
    }

    pub fn update(
        &self,
        id: Uuid,
        patch: BookingDraftPatch,
        now: DateTime<Utc>,
    ) -> Result<BookingSnapshot, BookingError> {
        self.with_session(id, now, |session, tour| {
            session.update(patch)?;
            Ok(snapshot(session, tour, now))
        })
    }

    pub fn reset(&self, id: Uuid, now: DateTime<Utc>) -> Result<BookingSnapshot, BookingError> {
        self.with_session(id, now, |session, tour| {
            session.reset()?;
            Ok(snapshot(session, tour, now))
        })
    }

    pub fn discard(&self, id: Uuid) -> Result<(), BookingError> {
        let mut sessions = self.sessions();
        match sessions.get(&id) {
            None => Err(BookingError::SessionNotFound(id)),
            Some(session) if session.phase == BookingPhase::Submitting => {
                Err(BookingError::SubmissionInFlight)
            }
            Some(_) => {
                sessions.remove(&id);
                Ok(())
            }
        }
    }

    /// Runs the submission without holding the session lock while the
    /// submitter works.
    pub async fn submit(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<BookingConfirmation, BookingError> {
        let request =
            self.with_session(id, now, |session, tour| session.begin_submission(tour, now))?;

        let result = self.submitter.submit(request).await;

        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&id)
            .ok_or(BookingError::SessionNotFound(id))?;
        match result {
            Ok(confirmation) => {
                session.complete(confirmation.clone())?;
                Ok(confirmation)
            }
            Err(err) => {
                warn!("Booking submission for session {} failed: {}", id, err);
                session.abort_submission();
                Err(match err {
                    SubmissionError::Rejected(reason) => BookingError::SubmissionRejected(reason),
                    SubmissionError::Unavailable(reason) => BookingError::SubmissionFailed(reason),
                })
            }
        }
    }

    fn tour(&self, tour_id: &str) -> Result<&SourceTour, BookingError> {
        self.catalog
            .get(tour_id)
            .ok_or_else(|| BookingError::TourNotFound(tour_id.to_string()))
    }

    fn with_session<R>(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut BookingSession, &SourceTour) -> Result<R, BookingError>,
    ) -> Result<R, BookingError> {
        let mut sessions = self.sessions();
        self.evict_idle(&mut sessions, now);
        let session = sessions
            .get_mut(&id)
            .ok_or(BookingError::SessionNotFound(id))?;
        session.touched = now;
        let tour = self.tour(&session.draft.tour_id)?;
        f(session, tour)
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, BookingSession>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, self.idle_timeout));
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle booking sessions", evicted);
        }
    }

    fn evict_oldest(&self, sessions: &mut HashMap<Uuid, BookingSession>) {
        let oldest = sessions
            .values()
            .filter(|session| session.phase != BookingPhase::Submitting)
            .min_by_key(|session| session.touched)
            .map(|session| session.id);
        if let Some(id) = oldest {
            warn!("Booking desk is full; dropping session {}", id);
            sessions.remove(&id);
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, BookingSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn snapshot(session: &BookingSession, tour: &SourceTour, now: DateTime<Utc>) -> BookingSnapshot {
    let today = now.date_naive();
    let quote = PricingService::quote(
        &session.draft.participants,
        &tour.price,
        tour.promotion.as_ref(),
        today,
    );
    BookingSnapshot {
        id: session.id,
        phase: session.phase.clone(),
        draft: session.draft.clone(),
        quote,
        window: tour
            .schedule()
            .map(|schedule| PricingService::booking_window(&schedule, now)),
        promotion_applied: quote.discount_percent > 0.0,
    }
}
