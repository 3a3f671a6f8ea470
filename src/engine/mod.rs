mod conflict;
mod error;
mod mutations;
mod queries;
pub mod slots;

pub use conflict::span_is_free;
pub use error::EngineError;
pub use slots::{annotate_slots, generate_slots};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use ulid::Ulid;

use crate::limits;
use crate::model::{Booking, DayCalendar};
use crate::source::{BookingSource, SourceError};

pub type SharedDayCalendar = Arc<RwLock<DayCalendar>>;

/// In-memory reservation ledger with per-day write locking.
///
/// Each (provider, date) pair owns an independent [`DayCalendar`] behind
/// its own `RwLock`, so contention is scoped to one provider's one day.
/// All admission goes through [`schedule`](Engine::schedule), which runs
/// the conflict check and the insert under the same write guard. That
/// makes insertion the authoritative answer; any advisory check taken
/// outside the lock can go stale the moment it returns.
pub struct Engine {
    /// One calendar per (provider, date), locked independently.
    days: DashMap<(Ulid, NaiveDate), SharedDayCalendar>,
    /// Reverse lookup: booking id → the calendar holding it.
    booking_index: DashMap<Ulid, (Ulid, NaiveDate)>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            days: DashMap::new(),
            booking_index: DashMap::new(),
        }
    }

    pub fn day(&self, provider: Ulid, date: NaiveDate) -> Option<SharedDayCalendar> {
        self.days.get(&(provider, date)).map(|e| e.value().clone())
    }

    pub(super) fn day_or_create(
        &self,
        provider: Ulid,
        date: NaiveDate,
    ) -> Result<SharedDayCalendar, EngineError> {
        let key = (provider, date);
        if !self.days.contains_key(&key) && self.days.len() >= limits::MAX_PROVIDER_DAYS {
            return Err(EngineError::LimitExceeded("provider-day cap reached"));
        }
        let shared = self
            .days
            .entry(key)
            .or_insert_with(|| Arc::new(RwLock::new(DayCalendar::new(provider, date))))
            .value()
            .clone();
        metrics::gauge!(crate::observability::DAYS_ACTIVE).set(self.days.len() as f64);
        Ok(shared)
    }

    /// Lookup booking → calendar, acquire the calendar's write lock.
    pub(super) async fn resolve_booking_write(
        &self,
        booking_id: &Ulid,
    ) -> Result<OwnedRwLockWriteGuard<DayCalendar>, EngineError> {
        let (provider, date) = self
            .booking_index
            .get(booking_id)
            .map(|e| *e.value())
            .ok_or(EngineError::NotFound(*booking_id))?;
        let day = self
            .day(provider, date)
            .ok_or(EngineError::NotFound(*booking_id))?;
        Ok(day.write_owned().await)
    }

    pub(super) fn index_booking(&self, id: Ulid, provider: Ulid, date: NaiveDate) {
        self.booking_index.insert(id, (provider, date));
    }

    pub(super) fn booking_key(&self, id: &Ulid) -> Option<(Ulid, NaiveDate)> {
        self.booking_index.get(id).map(|e| *e.value())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine doubles as its own booking source, so advisory helpers and
/// slot annotation run against live calendars without a store round-trip.
#[async_trait]
impl BookingSource for Engine {
    async fn fetch_bookings(
        &self,
        provider: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, SourceError> {
        match self.day(provider, date) {
            Some(day) => Ok(day.read().await.bookings.clone()),
            None => Ok(Vec::new()),
        }
    }
}
