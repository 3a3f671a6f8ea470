//! Hard caps on configuration and calendar growth. Exceeding one returns
//! [`EngineError::LimitExceeded`](crate::engine::EngineError::LimitExceeded).

use crate::model::Minute;

/// Longest slot a working-hours config may define (one full day).
pub const MAX_SLOT_MINUTES: Minute = 24 * 60;

/// Bookings a single provider-day calendar will hold.
pub const MAX_BOOKINGS_PER_DAY: usize = 512;

/// Provider-day calendars the engine keeps in memory at once.
pub const MAX_PROVIDER_DAYS: usize = 100_000;

/// Per-provider working-hours overrides in one hours book.
pub const MAX_HOURS_OVERRIDES: usize = 4_096;
