use ulid::Ulid;

use crate::model::{Booking, DayCalendar, Span, DAY_END};

use super::EngineError;

pub(crate) fn validate_span(span: &Span) -> Result<(), EngineError> {
    if span.start < 0 || span.end > DAY_END {
        return Err(EngineError::LimitExceeded("span outside the civil day"));
    }
    if span.start >= span.end {
        return Err(EngineError::LimitExceeded("span start must be before end"));
    }
    Ok(())
}

/// The authoritative conflict check, run under the day's write lock.
///
/// A span conflicts iff it overlaps a blocking booking (scheduled or
/// confirmed). `exclude` skips one booking id so a status flip can
/// re-check its own interval without tripping over itself.
pub(crate) fn check_no_conflict(
    day: &DayCalendar,
    span: &Span,
    exclude: Option<Ulid>,
) -> Result<(), EngineError> {
    for booking in day.overlapping(span) {
        if exclude == Some(booking.id) {
            continue;
        }
        if booking.status.blocks() {
            return Err(EngineError::Conflict(booking.id));
        }
    }
    Ok(())
}

/// Advisory form of the same predicate over a plain booking list.
///
/// This is the racy pre-check: two callers can both see `true` for the
/// same span. Only [`Engine::schedule`](super::Engine::schedule) settles
/// who actually gets the interval.
pub fn span_is_free(span: &Span, bookings: &[Booking]) -> bool {
    bookings
        .iter()
        .all(|b| !b.status.blocks() || !b.span.overlaps(span))
}
