//! rota — slot availability and booking conflict checking for
//! provider-day calendars.
//!
//! Three layers, from pure to stateful:
//!
//! - [`engine::slots`]: expand a [`hours::WorkingHours`] config into the
//!   day's slot grid and annotate it against bookings. Pure functions.
//! - [`source`]: advisory availability over any [`source::BookingSource`].
//!   Answers are hints; they can go stale before the caller acts.
//! - [`engine::Engine`]: the in-memory reservation ledger. Its
//!   [`schedule`](engine::Engine::schedule) call checks and inserts under
//!   one write lock per provider-day, making insertion the authoritative
//!   conflict signal.
//!
//! Times are minutes since midnight throughout; `HH:MM` strings appear
//! only at the serde boundary ([`model::parse_hhmm`], [`model::fmt_hhmm`]).

pub mod engine;
pub mod hours;
pub mod limits;
pub mod model;
pub mod observability;
pub mod source;

pub use engine::{annotate_slots, generate_slots, span_is_free, Engine, EngineError};
pub use hours::{HoursBook, WorkingHours};
pub use model::{Booking, BookingStatus, DayCalendar, Minute, Slot, Span};
pub use source::{available_slots, is_available, BookingSource, SourceError};
