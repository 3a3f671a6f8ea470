//! The read seam between slot arithmetic and whatever stores bookings.
//!
//! Everything here is advisory: answers reflect the bookings the source
//! returned, which may be stale by the time the caller acts on them. The
//! only authoritative admission decision is
//! [`Engine::schedule`](crate::engine::Engine::schedule), which re-checks
//! under a write lock.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;
use ulid::Ulid;

use crate::engine::{annotate_slots, generate_slots, span_is_free};
use crate::hours::WorkingHours;
use crate::model::{Booking, Slot, Span};
use crate::observability;

pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Read access to a provider's bookings for one date.
///
/// Implementations return every booking regardless of status; deciding
/// which statuses occupy the calendar is this crate's job, not the
/// store's. [`Engine`](crate::engine::Engine) implements this against its
/// own calendars.
#[async_trait]
pub trait BookingSource: Send + Sync {
    async fn fetch_bookings(
        &self,
        provider: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, SourceError>;
}

/// Advisory check: is `span` free of blocking bookings right now?
///
/// Two callers can both see `true` for the same span and race to book it.
/// Treat the answer as a hint for UI and pre-validation, never as a
/// reservation.
pub async fn is_available<S>(
    source: &S,
    provider: Ulid,
    date: NaiveDate,
    span: &Span,
) -> Result<bool, SourceError>
where
    S: BookingSource + ?Sized,
{
    let bookings = source.fetch_bookings(provider, date).await?;
    let free = span_is_free(span, &bookings);
    metrics::counter!(observability::ADMISSION_CHECKS_TOTAL).increment(1);
    debug!(%provider, %date, start = span.start, end = span.end, free, "advisory availability check");
    Ok(free)
}

/// The provider's slot grid for a date, annotated against the source.
///
/// An empty grid (malformed or slotless hours) skips the fetch entirely.
pub async fn available_slots<S>(
    source: &S,
    hours: &WorkingHours,
    provider: Ulid,
    date: NaiveDate,
) -> Result<Vec<Slot>, SourceError>
where
    S: BookingSource + ?Sized,
{
    let slots = generate_slots(hours);
    if slots.is_empty() {
        return Ok(slots);
    }
    let bookings = source.fetch_bookings(provider, date).await?;
    Ok(annotate_slots(slots, &bookings))
}
