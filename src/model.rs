use std::fmt;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::Ulid;

/// Minutes since midnight — the only intra-day time type.
///
/// Wall-clock `HH:MM` strings exist solely at the boundary
/// ([`parse_hhmm`]/[`fmt_hhmm`]); everything inside the crate compares
/// plain numbers, so ordering never depends on string formatting.
pub type Minute = i32;

/// Exclusive end of the civil day: 24:00 as a minute count.
pub const DAY_END: Minute = 24 * 60;

/// A wall-clock string that is not zero-padded `HH:MM` in `00:00`–`23:59`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    input: String,
}

impl TimeParseError {
    fn new(input: &str) -> Self {
        Self { input: input.to_string() }
    }
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid wall-clock time {:?}: expected zero-padded HH:MM",
            self.input
        )
    }
}

impl std::error::Error for TimeParseError {}

/// Parse a zero-padded `HH:MM` wall-clock string into minutes since midnight.
///
/// Rejects anything that is not exactly two digits, a colon, two digits,
/// with hours `00`–`23` and minutes `00`–`59`. Callers validate here once,
/// at the boundary, instead of trusting string ordering downstream.
pub fn parse_hhmm(s: &str) -> Result<Minute, TimeParseError> {
    let b = s.as_bytes();
    if b.len() != 5
        || b[2] != b':'
        || !b[0].is_ascii_digit()
        || !b[1].is_ascii_digit()
        || !b[3].is_ascii_digit()
        || !b[4].is_ascii_digit()
    {
        return Err(TimeParseError::new(s));
    }
    let h = ((b[0] - b'0') * 10 + (b[1] - b'0')) as Minute;
    let m = ((b[3] - b'0') * 10 + (b[4] - b'0')) as Minute;
    if h > 23 || m > 59 {
        return Err(TimeParseError::new(s));
    }
    Ok(h * 60 + m)
}

/// Format minutes since midnight as zero-padded `HH:MM`.
/// `DAY_END` renders as `24:00` (only valid as an exclusive span end).
pub fn fmt_hhmm(m: Minute) -> String {
    debug_assert!((0..=DAY_END).contains(&m), "minute out of day range");
    format!("{:02}:{:02}", m / 60, m % 60)
}

// `24:00` is accepted for span ends only; `parse_hhmm` itself stays strict.
fn parse_span_end(s: &str) -> Result<Minute, TimeParseError> {
    if s == "24:00" {
        return Ok(DAY_END);
    }
    parse_hhmm(s)
}

/// Half-open wall-clock interval `[start, end)` within one civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Minute,
    pub end: Minute,
}

impl Span {
    pub fn new(start: Minute, end: Minute) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> Minute {
        self.end - self.start
    }

    /// Standard half-open overlap: `a.start < b.end && b.start < a.end`.
    /// Spans that merely touch do not overlap, so back-to-back bookings
    /// are always allowed.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("Span", 2)?;
        st.serialize_field("start", &fmt_hhmm(self.start))?;
        st.serialize_field("end", &fmt_hhmm(self.end))?;
        st.end()
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            start: String,
            end: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        let start = parse_hhmm(&raw.start).map_err(D::Error::custom)?;
        let end = parse_span_end(&raw.end).map_err(D::Error::custom)?;
        if start >= end {
            return Err(D::Error::custom("span start must be before end"));
        }
        Ok(Span { start, end })
    }
}

/// Where a booking sits in its lifecycle. The booking workflow owns the
/// transitions; this crate only cares whether a status occupies the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Whether a booking in this status occupies its slot.
    /// Cancelled, completed, and no-show bookings free the interval.
    pub fn blocks(self) -> bool {
        matches!(self, BookingStatus::Scheduled | BookingStatus::Confirmed)
    }
}

/// One appointment on a provider's calendar. Read-mostly from this crate's
/// perspective: created through [`crate::engine::Engine::schedule`] or an
/// external store, status-flipped by the booking workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub provider: Ulid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub span: Span,
    pub status: BookingStatus,
}

/// A candidate bookable interval. Derived per call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(flatten)]
    pub span: Span,
    pub available: bool,
}

/// One provider's bookings for one civil date, sorted by `span.start`.
/// Every status is kept; callers filter with [`BookingStatus::blocks`].
#[derive(Debug, Clone)]
pub struct DayCalendar {
    pub provider: Ulid,
    pub date: NaiveDate,
    pub bookings: Vec<Booking>,
}

impl DayCalendar {
    pub fn new(provider: Ulid, date: NaiveDate) -> Self {
        Self {
            provider,
            date,
            bookings: Vec::new(),
        }
    }

    /// Insert a booking maintaining sort order by span start.
    pub fn insert_booking(&mut self, booking: Booking) {
        let pos = self
            .bookings
            .binary_search_by_key(&booking.span.start, |b| b.span.start)
            .unwrap_or_else(|e| e);
        self.bookings.insert(pos, booking);
    }

    pub fn booking(&self, id: Ulid) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Status flips never move a booking, so sort order is preserved.
    pub fn booking_mut(&mut self, id: Ulid) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == id)
    }

    /// Return only bookings whose span overlaps the query window.
    /// Uses binary search to skip bookings starting at or after `query.end`.
    pub fn overlapping(&self, query: &Span) -> impl Iterator<Item = &Booking> {
        // Everything at index >= right_bound starts at or after query.end → can't overlap.
        let right_bound = self
            .bookings
            .partition_point(|b| b.span.start < query.end);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.span.end > query.start)
    }
}
