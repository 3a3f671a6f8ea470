use chrono::NaiveDate;
use tracing::debug;
use ulid::Ulid;

use crate::limits;
use crate::model::{Booking, BookingStatus, Span};
use crate::observability;

use super::conflict::{check_no_conflict, validate_span};
use super::{Engine, EngineError};

impl Engine {
    /// Admit a new booking, or report exactly what stands in its way.
    ///
    /// The conflict check and the insert run under the same day write
    /// lock, so of two racing calls for overlapping spans exactly one
    /// wins; the loser gets [`EngineError::Conflict`] naming the winner.
    /// New bookings start [`Scheduled`](BookingStatus::Scheduled).
    pub async fn schedule(
        &self,
        id: Ulid,
        provider: Ulid,
        date: NaiveDate,
        span: Span,
    ) -> Result<(), EngineError> {
        validate_span(&span)?;
        if self.booking_key(&id).is_some() {
            return Err(EngineError::AlreadyExists(id));
        }
        let day = self.day_or_create(provider, date)?;
        let mut guard = day.write().await;
        if guard.bookings.len() >= limits::MAX_BOOKINGS_PER_DAY {
            return Err(EngineError::LimitExceeded("daily booking cap reached"));
        }
        if let Err(e) = check_no_conflict(&guard, &span, None) {
            metrics::counter!(observability::CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }

        guard.insert_booking(Booking {
            id,
            provider,
            date,
            span,
            status: BookingStatus::Scheduled,
        });
        self.index_booking(id, provider, date);
        metrics::counter!(observability::RESERVATIONS_TOTAL).increment(1);
        debug!(%id, %provider, %date, start = span.start, end = span.end, "booking scheduled");
        Ok(())
    }

    /// Move a booking to a new lifecycle status.
    ///
    /// Any transition is legal as far as the calendar is concerned, with
    /// one guard: a booking re-entering the calendar (non-blocking to
    /// blocking, e.g. un-cancelling) must pass the same conflict check a
    /// new booking would, because its interval may have been rebooked in
    /// the meantime.
    pub async fn set_status(&self, id: Ulid, status: BookingStatus) -> Result<(), EngineError> {
        let mut guard = self.resolve_booking_write(&id).await?;
        let (was, span) = match guard.booking(id) {
            Some(b) => (b.status, b.span),
            None => return Err(EngineError::NotFound(id)),
        };
        if !was.blocks()
            && status.blocks()
            && let Err(e) = check_no_conflict(&guard, &span, Some(id))
        {
            metrics::counter!(observability::CONFLICTS_TOTAL).increment(1);
            return Err(e);
        }
        if let Some(b) = guard.booking_mut(id) {
            b.status = status;
        }
        metrics::counter!(observability::TRANSITIONS_TOTAL).increment(1);
        debug!(%id, from = ?was, to = ?status, "booking status changed");
        Ok(())
    }

    pub async fn confirm(&self, id: Ulid) -> Result<(), EngineError> {
        self.set_status(id, BookingStatus::Confirmed).await
    }

    pub async fn cancel(&self, id: Ulid) -> Result<(), EngineError> {
        self.set_status(id, BookingStatus::Cancelled).await
    }

    pub async fn complete(&self, id: Ulid) -> Result<(), EngineError> {
        self.set_status(id, BookingStatus::Completed).await
    }

    pub async fn mark_no_show(&self, id: Ulid) -> Result<(), EngineError> {
        self.set_status(id, BookingStatus::NoShow).await
    }
}
